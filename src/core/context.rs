//! Application context: the store, the repository, the current user and
//! the clock busy flag. Built once by the entry point, passed to every
//! operation, torn down with [`AppContext::shutdown`].

use crate::auth;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppResult, LifecycleError, LifecycleResult};
use crate::models::user::AuthUser;
use crate::remote::{Mirror, RemoteClient, RemoteSessions};
use crate::store::{LocalStore, SessionRepository, build_repository};
use rusqlite::Connection;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct AppContext {
    pub config: Config,
    repo: Box<dyn SessionRepository>,
    user: Option<AuthUser>,
    busy: AtomicBool,
}

/// Held while a clock operation runs; clears the busy flag on drop.
pub struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl AppContext {
    /// Open the database, run migrations, resolve the user and wire the
    /// repository selected by `config.read_policy`.
    pub fn open(config: Config) -> AppResult<Self> {
        let pool = DbPool::new(&config.database)?;
        init_db(&pool.conn)?;

        let (user, token) = {
            let provider = auth::provider(config.identity, &pool.conn);
            (provider.current_user()?, provider.access_token()?)
        };

        // remote calls only make sense on behalf of an authenticated user
        let remote: Option<Arc<dyn RemoteSessions>> = match (config.remote(), &token) {
            (Some(rc), Some(_)) => Some(Arc::new(RemoteClient::new(rc, token.clone())?)),
            (Some(_), None) => {
                tracing::info!("remote store configured but not authenticated; working locally");
                None
            }
            _ => None,
        };
        let remote_user = remote.as_ref().and(user.as_ref()).map(|u| u.id.clone());

        let mirror = Mirror::new(remote.clone(), remote_user);
        let local = LocalStore::new(pool, mirror);
        let repo = build_repository(config.read_policy, local, remote)?;

        Ok(Self::from_parts(config, repo, user))
    }

    pub fn from_parts(config: Config, repo: Box<dyn SessionRepository>, user: Option<AuthUser>) -> Self {
        Self {
            config,
            repo,
            user,
            busy: AtomicBool::new(false),
        }
    }

    pub fn repo(&self) -> &dyn SessionRepository {
        self.repo.as_ref()
    }

    pub fn conn(&self) -> &Connection {
        self.repo.local().conn()
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn require_user(&self) -> LifecycleResult<&AuthUser> {
        self.user.as_ref().ok_or(LifecycleError::MissingUser)
    }

    /// Claim the busy flag, or fail with `Busy` if a clock operation is
    /// already running.
    pub fn try_busy(&self) -> LifecycleResult<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BusyGuard { flag: &self.busy })
            .map_err(|_| LifecycleError::Busy)
    }

    /// Wait for pending mirror uploads and release the store.
    /// Returns how many uploads were waited for.
    pub fn shutdown(self) -> usize {
        let joined = self.repo.local().mirror().drain();
        if joined > 0 {
            tracing::debug!(joined, "mirror uploads finished");
        }
        joined
    }
}
