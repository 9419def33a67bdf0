use crate::models::session::Session;
use crate::models::session_state::SessionState;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One row of the remote `sessions` table.
/// Timestamps travel as ISO-8601 strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoteRow {
    pub user_id: String,
    pub work_date: NaiveDate,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub state: SessionState,
}

impl RemoteRow {
    /// Row for `session`, owned by the remote (authenticated) user.
    pub fn from_session(session: &Session, remote_user_id: &str) -> Self {
        Self {
            user_id: remote_user_id.to_string(),
            work_date: session.work_date,
            start_at: session.start_at,
            end_at: session.end_at,
            state: session.state,
        }
    }

    /// Session for a local user; `id` comes from the local counterpart
    /// when one exists.
    pub fn into_session(self, id: String, user_id: &str) -> Session {
        Session {
            id,
            user_id: user_id.to_string(),
            work_date: self.work_date,
            start_at: self.start_at,
            end_at: self.end_at,
            state: self.state,
        }
    }
}
