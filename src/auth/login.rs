use crate::db::meta::{
    self, KEY_AUTH_ACCESS_TOKEN, KEY_AUTH_EMAIL, KEY_AUTH_EXPIRES_AT, KEY_AUTH_USER_ID,
};
use crate::errors::AppResult;
use crate::remote::client::LoginGrant;
use rusqlite::Connection;

/// Persist a successful login.
pub fn store_login(conn: &Connection, grant: &LoginGrant) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;
    meta::set_meta(&tx, KEY_AUTH_USER_ID, &grant.user.id)?;
    match &grant.user.email {
        Some(email) => meta::set_meta(&tx, KEY_AUTH_EMAIL, email)?,
        None => meta::delete_meta(&tx, KEY_AUTH_EMAIL)?,
    }
    meta::set_meta(&tx, KEY_AUTH_ACCESS_TOKEN, &grant.access_token)?;
    meta::set_meta(&tx, KEY_AUTH_EXPIRES_AT, &grant.expires_at.to_rfc3339())?;
    tx.commit()?;
    Ok(())
}

/// Forget the stored login. Sessions stay in the local store.
pub fn clear_login(conn: &Connection) -> AppResult<()> {
    for key in [
        KEY_AUTH_USER_ID,
        KEY_AUTH_EMAIL,
        KEY_AUTH_ACCESS_TOKEN,
        KEY_AUTH_EXPIRES_AT,
    ] {
        meta::delete_meta(conn, key)?;
    }
    Ok(())
}
