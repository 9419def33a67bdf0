//! Unified application error types.
//! Storage, config and remote layers return `AppError`; the session
//! lifecycle wraps it into `LifecycleError`, whose messages are shown
//! to the user as-is.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("Session has no id; refusing to save")]
    InvalidSessionId,

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid session state: {0}")]
    InvalidState(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    // ---------------------------
    // Remote store / auth
    // ---------------------------
    #[error("Remote store unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Remote store returned HTTP {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    #[error("Login failed: {0}")]
    Login(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::RemoteUnavailable(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Failures of clock-in / clock-out / edit.
///
/// These are expected outcomes of a user action, not crashes: callers
/// display the message and stop.
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("You are still clocked in. Clock out first.")]
    AlreadyWorking,

    #[error("Today already has a record (one session per day).")]
    AlreadyRecordedToday,

    #[error("Today's session is already closed.")]
    AlreadyDoneToday,

    #[error("No clock-in recorded.")]
    NotWorking,

    #[error("No user is logged in.")]
    MissingUser,

    #[error("Invalid edit: {0}")]
    InvalidEdit(String),

    #[error("Another clock operation is in progress.")]
    Busy,

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<rusqlite::Error> for LifecycleError {
    fn from(e: rusqlite::Error) -> Self {
        LifecycleError::Store(AppError::Db(e))
    }
}

pub type LifecycleResult<T> = Result<T, LifecycleError>;
