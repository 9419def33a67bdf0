use super::session_state::SessionState;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Session {
    pub id: String,                     // ⇔ sessions.id (TEXT, uuid v4)
    pub user_id: String,                // ⇔ sessions.user_id
    pub work_date: NaiveDate,           // ⇔ sessions.work_date (TEXT "YYYY-MM-DD")
    pub start_at: Option<DateTime<Utc>>, // ⇔ sessions.start_at (INTEGER epoch ms)
    pub end_at: Option<DateTime<Utc>>,  // ⇔ sessions.end_at (INTEGER epoch ms, NULL while open)
    pub state: SessionState,            // ⇔ sessions.state ('WORKING' | 'DONE')
}

impl Session {
    /// New open session for a clock-in at `now`.
    /// The work date is the local calendar day of `now`.
    pub fn clock_in(user_id: &str, now: DateTime<Local>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            work_date: now.date_naive(),
            start_at: Some(now.with_timezone(&Utc)),
            end_at: None,
            state: SessionState::Working,
        }
    }

    pub fn is_working(&self) -> bool {
        self.state.is_working()
    }

    pub fn work_date_str(&self) -> String {
        self.work_date.format("%Y-%m-%d").to_string()
    }

    /// Set both timestamps and derive the state from `end_at`.
    pub fn set_times(&mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) {
        self.start_at = start;
        self.end_at = end;
        self.state = SessionState::for_end(self.end_at.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn clock_in_opens_session_on_local_day() {
        let now = Local.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
        let s = Session::clock_in("u1", now);

        assert!(s.is_working());
        assert_eq!(s.end_at, None);
        assert_eq!(s.work_date_str(), "2025-03-14");
        assert_eq!(s.start_at, Some(now.with_timezone(&Utc)));
        assert!(!s.id.is_empty());
    }

    #[test]
    fn set_times_keeps_state_consistent() {
        let now = Local.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap();
        let mut s = Session::clock_in("u1", now);
        let end = now.with_timezone(&Utc) + chrono::Duration::hours(9);

        s.set_times(s.start_at, Some(end));
        assert_eq!(s.state, SessionState::Done);

        s.set_times(s.start_at, None);
        assert_eq!(s.state, SessionState::Working);
    }
}
