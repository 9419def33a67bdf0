//! Authentication provider: who the lifecycle acts for.

pub mod login;

use crate::db::meta::{
    self, KEY_AUTH_ACCESS_TOKEN, KEY_AUTH_EMAIL, KEY_AUTH_EXPIRES_AT, KEY_AUTH_USER_ID,
};
use crate::errors::AppResult;
use crate::models::user::AuthUser;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

/// Which identity source the application uses.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Identity {
    /// User stored by `login`.
    #[default]
    Login,
    /// Anonymous per-installation tester id.
    Tester,
}

pub trait AuthProvider {
    /// Current user, or `None` when nobody is signed in.
    fn current_user(&self) -> AppResult<Option<AuthUser>>;

    /// Bearer token for remote calls, when one is held and still valid.
    fn access_token(&self) -> AppResult<Option<String>> {
        Ok(None)
    }
}

/// Login persisted in the `meta` table.
pub struct StoredLogin<'a> {
    conn: &'a Connection,
}

impl<'a> StoredLogin<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn expires_at(&self) -> AppResult<Option<DateTime<Utc>>> {
        Ok(meta::get_meta(self.conn, KEY_AUTH_EXPIRES_AT)?
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }
}

impl AuthProvider for StoredLogin<'_> {
    fn current_user(&self) -> AppResult<Option<AuthUser>> {
        let Some(id) = meta::get_meta(self.conn, KEY_AUTH_USER_ID)? else {
            return Ok(None);
        };
        let email = meta::get_meta(self.conn, KEY_AUTH_EMAIL)?;
        Ok(Some(AuthUser { id, email }))
    }

    fn access_token(&self) -> AppResult<Option<String>> {
        let token = meta::get_meta(self.conn, KEY_AUTH_ACCESS_TOKEN)?;
        match self.expires_at()? {
            Some(exp) if exp > Utc::now() => Ok(token),
            _ => {
                if token.is_some() {
                    tracing::warn!("stored access token expired; run `deosil login` again");
                }
                Ok(None)
            }
        }
    }
}

/// Legacy anonymous identity, created on first use.
pub struct TesterIdentity<'a> {
    conn: &'a Connection,
}

impl<'a> TesterIdentity<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl AuthProvider for TesterIdentity<'_> {
    fn current_user(&self) -> AppResult<Option<AuthUser>> {
        let id = meta::get_or_create_tester_id(self.conn)?;
        Ok(Some(AuthUser { id, email: None }))
    }
}

/// Provider for the configured identity source.
pub fn provider<'a>(identity: Identity, conn: &'a Connection) -> Box<dyn AuthProvider + 'a> {
    match identity {
        Identity::Login => Box::new(StoredLogin::new(conn)),
        Identity::Tester => Box::new(TesterIdentity::new(conn)),
    }
}
