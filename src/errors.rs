//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

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

    #[error("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: i64 },

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    #[error("Invalid value: {0}")]
    InvalidInput(String),

    // ---------------------------
    // Business rules
    // ---------------------------
    #[error("Membership of {name} expired on {expiry}")]
    ExpiredMembership { name: String, expiry: String },

    #[error("{name} has no remaining hours")]
    InsufficientBalance { name: String },

    #[error("{0} is already checked in")]
    AlreadyCheckedIn(String),

    #[error("Booking #{0} is already completed")]
    BookingCompleted(i64),

    // ---------------------------
    // Session
    // ---------------------------
    #[error("No operator signed in. Run `dmdhub login --operator <name>` first")]
    NotSignedIn,

    #[error("Session of {0} has expired, please sign in again")]
    SessionExpired(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

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
