//! Session repository: one read/write surface over the local store and,
//! depending on [`ReadPolicy`], the remote table.

pub mod local;
pub mod remote_backed;

pub use local::LocalStore;
pub use remote_backed::RemoteBacked;

use crate::errors::{AppError, AppResult};
use crate::models::session::Session;
use crate::remote::RemoteSessions;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where reads are answered from. Writes always go to the local store
/// first and are mirrored best-effort.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReadPolicy {
    /// Local store only.
    Local,
    /// Remote is authoritative; no local fallback. Needs a configured
    /// remote and a valid login.
    Remote,
    /// Remote first, local when the remote has nothing or is unreachable.
    #[default]
    Merged,
}

pub trait SessionRepository {
    /// The session currently WORKING for the user, if any.
    fn working_session(&self, user_id: &str) -> AppResult<Option<Session>>;

    fn session_by_date(&self, user_id: &str, date: NaiveDate) -> AppResult<Option<Session>>;

    /// Sessions of a calendar month, unordered.
    fn sessions_in_month(&self, user_id: &str, year: i32, month: u32) -> AppResult<Vec<Session>>;

    /// Upsert by id.
    fn save(&self, session: &Session) -> AppResult<()>;

    /// The underlying local store (connection, meta, log, mirror).
    fn local(&self) -> &LocalStore;
}

/// Build the repository for `policy` once, at context construction.
///
/// `Remote` without a remote client is refused: every read would come back
/// empty while the local rows keep enforcing the one-session rules.
pub fn build_repository(
    policy: ReadPolicy,
    local: LocalStore,
    remote: Option<Arc<dyn RemoteSessions>>,
) -> AppResult<Box<dyn SessionRepository>> {
    Ok(match policy {
        ReadPolicy::Local => Box::new(local),
        ReadPolicy::Merged => Box::new(RemoteBacked::merged(local, remote)),
        ReadPolicy::Remote => {
            let remote = remote.ok_or_else(|| {
                AppError::RemoteUnavailable(
                    "read_policy 'remote' needs a configured remote store and a valid login (run `deosil login`)"
                        .into(),
                )
            })?;
            Box::new(RemoteBacked::authoritative(local, remote))
        }
    })
}
