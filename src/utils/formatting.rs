//! Formatting utilities shared by the CLI screens.
//! Output strings are part of the presentation contract: dates are
//! `YYYY-MM-DD`, clock times `HH:MM`, durations `H:MM`.

use chrono::{DateTime, Local, NaiveDate, Utc};

pub const TIME_PLACEHOLDER: &str = "--:--";
pub const DIFF_PLACEHOLDER: &str = "--";

pub fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Local wall-clock time of a timestamp, or `--:--`.
pub fn format_time(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(t) => t.with_timezone(&Local).format("%H:%M").to_string(),
        None => TIME_PLACEHOLDER.to_string(),
    }
}

/// Minutes → `H:MM`, with a leading `-` for negative values.
/// Hours are not zero-padded: 125 → `2:05`, -30 → `-0:30`.
pub fn format_hm(mins: i64) -> String {
    let sign = if mins < 0 { "-" } else { "" };
    let abs_m = mins.abs();
    format!("{}{}:{:02}", sign, abs_m / 60, abs_m % 60)
}

/// Work minutes cell, `--:--` when undefined.
pub fn format_work(work: Option<i64>) -> String {
    work.map(format_hm)
        .unwrap_or_else(|| TIME_PLACEHOLDER.to_string())
}

/// Signed diff for the monthly table: `+2:00`, `-0:30`, `±0:00` or `--`.
pub fn format_diff(diff: Option<i64>) -> String {
    match diff {
        None => DIFF_PLACEHOLDER.to_string(),
        Some(d) if d > 0 => format!("+{}", format_hm(d)),
        Some(d) if d < 0 => format_hm(d),
        Some(_) => "±0:00".to_string(),
    }
}

/// Diff with its label, as shown on the daily status screen.
pub fn diff_label(diff: Option<i64>) -> String {
    match diff {
        None => DIFF_PLACEHOLDER.to_string(),
        Some(d) if d > 0 => format!("+{}（残業）", format_hm(d)),
        Some(d) if d < 0 => format!("{}（早上がり）", format_hm(d)),
        Some(_) => "±0:00（定時）".to_string(),
    }
}

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hm_formatting() {
        assert_eq!(format_hm(0), "0:00");
        assert_eq!(format_hm(125), "2:05");
        assert_eq!(format_hm(-30), "-0:30");
        assert_eq!(format_hm(600), "10:00");
    }

    #[test]
    fn diff_labels() {
        assert_eq!(diff_label(Some(0)), "±0:00（定時）");
        assert_eq!(diff_label(Some(120)), "+2:00（残業）");
        assert_eq!(diff_label(Some(-45)), "-0:45（早上がり）");
        assert_eq!(diff_label(None), "--");
    }

    #[test]
    fn table_cells() {
        assert_eq!(format_diff(Some(120)), "+2:00");
        assert_eq!(format_diff(Some(-30)), "-0:30");
        assert_eq!(format_diff(Some(0)), "±0:00");
        assert_eq!(format_diff(None), "--");
        assert_eq!(format_work(None), "--:--");
        assert_eq!(format_time(None), "--:--");
    }

    #[test]
    fn date_is_iso() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(format_date(d), "2025-01-05");
    }
}
