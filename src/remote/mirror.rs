//! Best-effort mirroring of local writes to the remote table.
//!
//! Every push runs one upsert on a background thread: at most once, no
//! retry. Failures are logged and never reach the caller of the local
//! write. [`Mirror::drain`] joins the threads still in flight; the
//! application context calls it on teardown.

use super::{RemoteRow, RemoteSessions};
use crate::models::session::Session;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

pub struct Mirror {
    remote: Option<Arc<dyn RemoteSessions>>,
    remote_user: Option<String>,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl Mirror {
    pub fn new(remote: Option<Arc<dyn RemoteSessions>>, remote_user: Option<String>) -> Self {
        Self {
            remote,
            remote_user,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Mirror that never sends anything.
    pub fn disabled() -> Self {
        Self::new(None, None)
    }

    pub fn is_enabled(&self) -> bool {
        self.remote.is_some() && self.remote_user.is_some()
    }

    /// Schedule an upsert of `session`. Returns immediately.
    pub fn push(&self, session: &Session) {
        let Some(remote) = self.remote.clone() else {
            tracing::debug!(session = %session.id, "remote store not configured, mirror skipped");
            return;
        };
        let Some(user) = self.remote_user.as_deref() else {
            tracing::info!(session = %session.id, "not authenticated, mirror skipped");
            return;
        };

        let row = RemoteRow::from_session(session, user);
        let handle = thread::spawn(move || {
            tracing::debug!(work_date = %row.work_date, state = ?row.state, "mirroring session");
            if let Err(e) = remote.upsert(&row) {
                tracing::warn!(
                    work_date = %row.work_date,
                    error = %e,
                    "remote upsert failed"
                );
            }
        });

        match self.pending.lock() {
            Ok(mut pending) => pending.push(handle),
            Err(poisoned) => poisoned.into_inner().push(handle),
        }
    }

    /// Wait for every in-flight upsert. Returns how many were joined.
    pub fn drain(&self) -> usize {
        let handles: Vec<JoinHandle<()>> = match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        };

        let count = handles.len();
        for h in handles {
            if h.join().is_err() {
                tracing::warn!("mirror thread panicked");
            }
        }
        count
    }
}

impl Drop for Mirror {
    fn drop(&mut self) {
        self.drain();
    }
}
