//! Remote session table (PostgREST / Supabase style HTTP API).
//!
//! [`RemoteClient`] talks to `<url>/rest/v1/sessions` for reads and
//! upserts, and to `<url>/auth/v1/token` for password login.

pub mod client;
#[cfg(test)]
pub mod fake;
pub mod mirror;
pub mod row;

pub use client::RemoteClient;
pub use mirror::Mirror;
pub use row::RemoteRow;

use crate::errors::AppResult;
use chrono::NaiveDate;

/// Remote operations the repository and the mirror rely on.
pub trait RemoteSessions: Send + Sync {
    fn working_session(&self, user_id: &str) -> AppResult<Option<RemoteRow>>;

    fn session_by_date(&self, user_id: &str, date: NaiveDate) -> AppResult<Option<RemoteRow>>;

    /// Rows whose `work_date` lies in the month, ordered by `work_date`.
    fn sessions_in_month(&self, user_id: &str, year: i32, month: u32) -> AppResult<Vec<RemoteRow>>;

    /// Upsert keyed by `(user_id, work_date)`.
    fn upsert(&self, row: &RemoteRow) -> AppResult<()>;
}
