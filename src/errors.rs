//! Unified application error type.
//! All modules (db, core, terminal, cli) return AppError to keep the error
//! handling consistent; the terminal loop uses `category()` to decide
//! whether to retry, report and continue, or stop.

use rusqlite::ErrorCode;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Reader device error: {0}")]
    Device(String),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Data integrity
    // ---------------------------
    #[error("User {user_id} bound to tag '{tag}' is missing from the database")]
    MissingUser { user_id: i64, tag: String },

    #[error("Unknown user id: {0}")]
    UnknownUser(i64),

    #[error(
        "Ledger out of order for user {user_id}: event {event_id} is older than event {previous_id}"
    )]
    LedgerOutOfOrder {
        user_id: i64,
        event_id: i64,
        previous_id: i64,
    },

    #[error("Status of user {user_id} changed concurrently (expected {expected}, found {found})")]
    AppendConflict {
        user_id: i64,
        expected: u8,
        found: u8,
    },

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid timestamp in ledger: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid country code: {0}")]
    InvalidCountry(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// How the terminal loop reacts to a failed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Store or reader temporarily unavailable: retry with backoff.
    Transient,
    /// Inconsistent data: report, abort the current operation, keep running.
    Integrity,
    /// Bad configuration: report and keep running.
    Configuration,
    /// Anything else: surface and stop the process.
    Fatal,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Io(_) | AppError::Device(_) => ErrorCategory::Transient,
            AppError::Db(e) => db_error_category(e),

            AppError::MissingUser { .. }
            | AppError::UnknownUser(_)
            | AppError::LedgerOutOfOrder { .. }
            | AppError::AppendConflict { .. }
            | AppError::InvalidTimestamp(_) => ErrorCategory::Integrity,

            AppError::InvalidCountry(_) | AppError::Config(_) => ErrorCategory::Configuration,

            _ => ErrorCategory::Fatal,
        }
    }
}

fn db_error_category(e: &rusqlite::Error) -> ErrorCategory {
    match e.sqlite_error_code() {
        Some(
            ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::CannotOpen
            | ErrorCode::SystemIoFailure
            | ErrorCode::OutOfMemory,
        ) => ErrorCategory::Transient,
        _ => ErrorCategory::Fatal,
    }
}
