use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Parse a `YYYY-MM` period into (year, month).
pub fn parse_month(p: &str) -> AppResult<(i32, u32)> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", p.trim()), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(format!("Invalid month period: {}", p)))?;
    Ok((d.year(), d.month()))
}

pub fn current_month() -> (i32, u32) {
    let t = today();
    (t.year(), t.month())
}

pub fn first_of_month(year: i32, month: u32) -> AppResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::InvalidDate(format!("{}-{:02}", year, month)))
}

/// First day of the following month.
pub fn first_of_next_month(year: i32, month: u32) -> AppResult<NaiveDate> {
    if month == 12 {
        first_of_month(year + 1, 1)
    } else {
        first_of_month(year, month + 1)
    }
}

/// Last calendar day of a month.
pub fn last_of_month(year: i32, month: u32) -> AppResult<NaiveDate> {
    first_of_next_month(year, month)?
        .pred_opt()
        .ok_or_else(|| AppError::InvalidDate(format!("{}-{:02}", year, month)))
}

/// Half-open range `[local midnight of the 1st, local midnight of the next 1st)`.
pub fn month_bounds(year: i32, month: u32) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = local_midnight(first_of_month(year, month)?)?;
    let end = local_midnight(first_of_next_month(year, month)?)?;
    Ok((start, end))
}

fn local_midnight(d: NaiveDate) -> AppResult<DateTime<Utc>> {
    let naive = d
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::InvalidDate(d.to_string()))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::InvalidDate(format!("{} has no local midnight", d)))
}
