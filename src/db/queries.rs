use crate::errors::{AppError, AppResult};
use crate::models::session::Session;
use crate::models::session_state::SessionState;
use crate::utils::time::from_millis;
use chrono::{DateTime, Local, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const SELECT_SESSION: &str =
    "SELECT id, user_id, work_date, start_at, end_at, state FROM sessions";

fn conversion_error(err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
}

pub fn map_row(row: &Row) -> Result<Session> {
    let date_str: String = row.get("work_date")?;
    let work_date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(AppError::InvalidDate(date_str.clone())))?;

    let state_str: String = row.get("state")?;
    let state = SessionState::from_db_str(&state_str)
        .ok_or_else(|| conversion_error(AppError::InvalidState(state_str.clone())))?;

    let start_at: Option<i64> = row.get("start_at")?;
    let end_at: Option<i64> = row.get("end_at")?;

    Ok(Session {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        work_date,
        start_at: start_at.and_then(from_millis),
        end_at: end_at.and_then(from_millis),
        state,
    })
}

/// Insert or update a session by id.
pub fn upsert_session(conn: &Connection, s: &Session) -> AppResult<()> {
    if s.id.trim().is_empty() {
        return Err(AppError::InvalidSessionId);
    }

    conn.execute(
        "INSERT INTO sessions (id, user_id, work_date, start_at, end_at, state, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(id) DO UPDATE SET
            user_id    = excluded.user_id,
            work_date  = excluded.work_date,
            start_at   = excluded.start_at,
            end_at     = excluded.end_at,
            state      = excluded.state,
            updated_at = excluded.updated_at",
        params![
            s.id,
            s.user_id,
            s.work_date_str(),
            s.start_at.map(|t| t.timestamp_millis()),
            s.end_at.map(|t| t.timestamp_millis()),
            s.state.to_db_str(),
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn find_working(conn: &Connection, user_id: &str) -> AppResult<Option<Session>> {
    let sql = format!(
        "{} WHERE user_id = ?1 AND state = 'WORKING' LIMIT 1",
        SELECT_SESSION
    );
    let found = conn
        .prepare_cached(&sql)?
        .query_row([user_id], map_row)
        .optional()?;
    Ok(found)
}

pub fn find_by_date(conn: &Connection, user_id: &str, date: &NaiveDate) -> AppResult<Option<Session>> {
    let sql = format!("{} WHERE user_id = ?1 AND work_date = ?2", SELECT_SESSION);
    let found = conn
        .prepare_cached(&sql)?
        .query_row(
            params![user_id, date.format("%Y-%m-%d").to_string()],
            map_row,
        )
        .optional()?;
    Ok(found)
}

/// Sessions whose clock-in lies in `[from, to)`, ordered by clock-in.
pub fn list_started_between(
    conn: &Connection,
    user_id: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> AppResult<Vec<Session>> {
    let sql = format!(
        "{} WHERE user_id = ?1 AND start_at >= ?2 AND start_at < ?3 ORDER BY start_at ASC",
        SELECT_SESSION
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(
        params![user_id, from.timestamp_millis(), to.timestamp_millis()],
        map_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use chrono::TimeZone;

    fn conn() -> Connection {
        let c = Connection::open_in_memory().unwrap();
        init_db(&c).unwrap();
        c
    }

    fn at(d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 4, d, h, 0, 0).unwrap()
    }

    #[test]
    fn upsert_then_lookup() {
        let c = conn();
        let mut s = Session::clock_in("u1", at(3, 9));
        upsert_session(&c, &s).unwrap();

        assert_eq!(find_working(&c, "u1").unwrap().as_ref(), Some(&s));
        assert_eq!(find_working(&c, "u2").unwrap(), None);

        s.set_times(s.start_at, Some(at(3, 18).with_timezone(&Utc)));
        upsert_session(&c, &s).unwrap();

        assert_eq!(find_working(&c, "u1").unwrap(), None);
        let by_date = find_by_date(&c, "u1", &s.work_date).unwrap().unwrap();
        assert_eq!(by_date, s);
    }

    #[test]
    fn empty_id_is_rejected() {
        let c = conn();
        let mut s = Session::clock_in("u1", at(3, 9));
        s.id = String::new();
        assert!(matches!(upsert_session(&c, &s), Err(AppError::InvalidSessionId)));
    }

    #[test]
    fn second_session_same_day_violates_unique_index() {
        let c = conn();
        let mut a = Session::clock_in("u1", at(3, 9));
        a.set_times(a.start_at, Some(at(3, 17).with_timezone(&Utc)));
        upsert_session(&c, &a).unwrap();

        let b = Session::clock_in("u1", at(3, 19));
        assert!(upsert_session(&c, &b).is_err());
    }

    #[test]
    fn range_is_half_open() {
        let c = conn();
        for d in [1, 15, 30] {
            let mut s = Session::clock_in("u1", at(d, 9));
            s.set_times(s.start_at, Some(at(d, 18).with_timezone(&Utc)));
            upsert_session(&c, &s).unwrap();
        }

        let from = at(1, 9).with_timezone(&Utc);
        let to = at(30, 9).with_timezone(&Utc);
        let got = list_started_between(&c, "u1", from, to).unwrap();
        let days: Vec<String> = got.iter().map(|s| s.work_date_str()).collect();
        assert_eq!(days, vec!["2025-04-01", "2025-04-15"]);
    }
}
