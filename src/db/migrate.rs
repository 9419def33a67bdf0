use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// A schema step, applied once and recorded in the `log` table.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250105_0001_create_sessions",
        description: "Created sessions table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id         TEXT PRIMARY KEY NOT NULL,
            user_id    TEXT NOT NULL,
            work_date  TEXT NOT NULL,
            start_at   INTEGER,
            end_at     INTEGER,
            state      TEXT NOT NULL CHECK(state IN ('WORKING','DONE')),
            updated_at TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_sessions_user_date  ON sessions(user_id, work_date);
        CREATE INDEX        IF NOT EXISTS idx_sessions_user_state ON sessions(user_id, state);
        CREATE INDEX        IF NOT EXISTS idx_sessions_user_start ON sessions(user_id, start_at);
        "#,
    },
    Migration {
        version: "20250105_0002_create_meta",
        description: "Created meta table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS meta (
            key   TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250212_0003_single_working_session",
        description: "At most one WORKING session per user",
        sql: r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_sessions_one_working
            ON sessions(user_id) WHERE state = 'WORKING';
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;
    tx.commit()
}

/// Public entry point: run all pending migrations.
///
/// Called by `db::initialize::init_db()` and on every context start, so it
/// must stay idempotent. Returns the number of migrations applied.
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        success(format!("Migration applied: {} → {}", m.version, m.description));
        applied += 1;
    }

    Ok(applied)
}
