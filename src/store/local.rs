use super::SessionRepository;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::session::Session;
use crate::remote::Mirror;
use crate::utils::date::month_bounds;
use chrono::NaiveDate;
use rusqlite::Connection;

/// SQLite-backed sessions. Successful writes are handed to the mirror.
pub struct LocalStore {
    pool: DbPool,
    mirror: Mirror,
}

impl LocalStore {
    pub fn new(pool: DbPool, mirror: Mirror) -> Self {
        Self { pool, mirror }
    }

    pub fn conn(&self) -> &Connection {
        &self.pool.conn
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    /// Id to use for a session coming from the remote table: the id of the
    /// local session of the same user and day, or a fresh one.
    pub fn local_id_for(&self, user_id: &str, date: NaiveDate) -> AppResult<String> {
        Ok(queries::find_by_date(self.conn(), user_id, &date)?
            .map(|s| s.id)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()))
    }
}

impl SessionRepository for LocalStore {
    fn working_session(&self, user_id: &str) -> AppResult<Option<Session>> {
        queries::find_working(self.conn(), user_id)
    }

    fn session_by_date(&self, user_id: &str, date: NaiveDate) -> AppResult<Option<Session>> {
        queries::find_by_date(self.conn(), user_id, &date)
    }

    fn sessions_in_month(&self, user_id: &str, year: i32, month: u32) -> AppResult<Vec<Session>> {
        let (from, to) = month_bounds(year, month)?;
        queries::list_started_between(self.conn(), user_id, from, to)
    }

    fn save(&self, session: &Session) -> AppResult<()> {
        queries::upsert_session(self.conn(), session)?;
        self.mirror.push(session);
        Ok(())
    }

    fn local(&self) -> &LocalStore {
        self
    }
}
