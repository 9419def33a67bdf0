//! In-memory remote table for tests.

use super::{RemoteRow, RemoteSessions};
use crate::errors::{AppError, AppResult};
use crate::models::session_state::SessionState;
use chrono::{Datelike, NaiveDate};
use std::sync::Mutex;

/// Rows keyed by `(user_id, work_date)` like the real table; `offline`
/// makes every call fail.
#[derive(Default)]
pub struct FakeRemote {
    pub rows: Mutex<Vec<RemoteRow>>,
    pub offline: bool,
}

impl FakeRemote {
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Default::default()
        }
    }

    pub fn with_rows(rows: Vec<RemoteRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            offline: false,
        }
    }

    pub fn snapshot(&self) -> Vec<RemoteRow> {
        self.rows.lock().unwrap().clone()
    }

    fn reachable(&self) -> AppResult<()> {
        if self.offline {
            Err(AppError::RemoteUnavailable("offline".into()))
        } else {
            Ok(())
        }
    }

    fn find(&self, pred: impl Fn(&RemoteRow) -> bool) -> Option<RemoteRow> {
        self.rows.lock().unwrap().iter().find(|r| pred(r)).cloned()
    }
}

impl RemoteSessions for FakeRemote {
    fn working_session(&self, user_id: &str) -> AppResult<Option<RemoteRow>> {
        self.reachable()?;
        Ok(self.find(|r| r.user_id == user_id && r.state == SessionState::Working))
    }

    fn session_by_date(&self, user_id: &str, date: NaiveDate) -> AppResult<Option<RemoteRow>> {
        self.reachable()?;
        Ok(self.find(|r| r.user_id == user_id && r.work_date == date))
    }

    fn sessions_in_month(&self, user_id: &str, year: i32, month: u32) -> AppResult<Vec<RemoteRow>> {
        self.reachable()?;
        let mut rows: Vec<RemoteRow> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id && r.work_date.year() == year && r.work_date.month() == month)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.work_date);
        Ok(rows)
    }

    fn upsert(&self, row: &RemoteRow) -> AppResult<()> {
        self.reachable()?;
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|r| r.user_id == row.user_id && r.work_date == row.work_date)
        {
            Some(existing) => *existing = row.clone(),
            None => rows.push(row.clone()),
        }
        Ok(())
    }
}
