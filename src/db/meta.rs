//! Key/value `meta` table: legacy tester id and the stored login.

use crate::errors::AppResult;
use rusqlite::{Connection, OptionalExtension, params};

pub const KEY_TESTER_ID: &str = "tester_id";
pub const KEY_AUTH_USER_ID: &str = "auth_user_id";
pub const KEY_AUTH_EMAIL: &str = "auth_email";
pub const KEY_AUTH_ACCESS_TOKEN: &str = "auth_access_token";
pub const KEY_AUTH_EXPIRES_AT: &str = "auth_expires_at";

pub fn get_meta(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM meta WHERE key = ?1", [key], |row| {
            row.get::<_, String>(0)
        })
        .optional()?;
    Ok(value.filter(|v| !v.is_empty()))
}

pub fn set_meta(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn delete_meta(conn: &Connection, key: &str) -> AppResult<()> {
    conn.execute("DELETE FROM meta WHERE key = ?1", [key])?;
    Ok(())
}

/// Anonymous per-installation id, created on first use.
pub fn get_or_create_tester_id(conn: &Connection) -> AppResult<String> {
    if let Some(existing) = get_meta(conn, KEY_TESTER_ID)? {
        return Ok(existing);
    }

    let id = uuid::Uuid::new_v4().to_string();
    set_meta(conn, KEY_TESTER_ID, &id)?;
    Ok(id)
}
