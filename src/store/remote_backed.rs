use super::{LocalStore, SessionRepository};
use crate::errors::AppResult;
use crate::models::session::Session;
use crate::remote::{RemoteRow, RemoteSessions};
use chrono::NaiveDate;
use std::sync::Arc;

enum Mode {
    /// Remote first; empty, failed or missing remote falls back to local.
    Merged(Option<Arc<dyn RemoteSessions>>),
    /// Remote answers are final, remote failures are errors.
    Authoritative(Arc<dyn RemoteSessions>),
}

/// Remote-first reads over a [`LocalStore`]. Writes go to the local store.
pub struct RemoteBacked {
    local: LocalStore,
    mode: Mode,
}

impl RemoteBacked {
    pub fn merged(local: LocalStore, remote: Option<Arc<dyn RemoteSessions>>) -> Self {
        Self {
            local,
            mode: Mode::Merged(remote),
        }
    }

    pub fn authoritative(local: LocalStore, remote: Arc<dyn RemoteSessions>) -> Self {
        Self {
            local,
            mode: Mode::Authoritative(remote),
        }
    }

    fn is_authoritative(&self) -> bool {
        matches!(self.mode, Mode::Authoritative(_))
    }

    /// Run `query` against the remote. `Ok(None)` means "no usable answer,
    /// ask the local store".
    fn ask<T>(
        &self,
        what: &str,
        query: impl FnOnce(&dyn RemoteSessions) -> AppResult<T>,
    ) -> AppResult<Option<T>> {
        match &self.mode {
            Mode::Authoritative(remote) => query(remote.as_ref()).map(Some),
            Mode::Merged(None) => Ok(None),
            Mode::Merged(Some(remote)) => match query(remote.as_ref()) {
                Ok(v) => Ok(Some(v)),
                Err(e) => {
                    tracing::warn!(query = what, error = %e, "remote read failed, using local store");
                    Ok(None)
                }
            },
        }
    }

    fn adopt(&self, user_id: &str, row: RemoteRow) -> AppResult<Session> {
        let id = self.local.local_id_for(user_id, row.work_date)?;
        Ok(row.into_session(id, user_id))
    }
}

impl SessionRepository for RemoteBacked {
    fn working_session(&self, user_id: &str) -> AppResult<Option<Session>> {
        match self.ask("working_session", |r| r.working_session(user_id))? {
            Some(Some(row)) => self.adopt(user_id, row).map(Some),
            Some(None) if self.is_authoritative() => Ok(None),
            _ => self.local.working_session(user_id),
        }
    }

    fn session_by_date(&self, user_id: &str, date: NaiveDate) -> AppResult<Option<Session>> {
        match self.ask("session_by_date", |r| r.session_by_date(user_id, date))? {
            Some(Some(row)) => self.adopt(user_id, row).map(Some),
            Some(None) if self.is_authoritative() => Ok(None),
            _ => self.local.session_by_date(user_id, date),
        }
    }

    fn sessions_in_month(&self, user_id: &str, year: i32, month: u32) -> AppResult<Vec<Session>> {
        match self.ask("sessions_in_month", |r| r.sessions_in_month(user_id, year, month))? {
            Some(rows) if !rows.is_empty() || self.is_authoritative() => {
                rows.into_iter().map(|r| self.adopt(user_id, r)).collect()
            }
            _ => self.local.sessions_in_month(user_id, year, month),
        }
    }

    fn save(&self, session: &Session) -> AppResult<()> {
        self.local.save(session)
    }

    fn local(&self) -> &LocalStore {
        &self.local
    }
}
