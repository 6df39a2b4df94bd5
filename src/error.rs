//! Error types for the data core.
//!
//! Errors are classified by where they stop:
//! - `DateError`: malformed day/clock strings, rejected at the boundary
//! - `StoreError`: persistence failures and invariant violations, surfaced
//!   to the edit flow
//! - `MirrorError`: remote transport failures, caught and logged inside the
//!   mirror and never propagated to store callers
//!
//! Absence (no active user, missing key, empty collection) is never an
//! error; those paths resolve to empty/default values.

use thiserror::Error;

/// Malformed date/time input at a subsystem boundary.
#[derive(Debug, Error)]
pub enum DateError {
    #[error("Invalid day string `{0}`: expected YYYY-MM-DD")]
    InvalidDay(String),

    #[error("Invalid clock string `{0}`: expected HH:MM")]
    InvalidClock(String),
}

/// Errors surfaced by the local store and its typed helpers.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create data directory: {0}")]
    CreateDir(std::io::Error),

    #[error(transparent)]
    Date(#[from] DateError),

    #[error("Event ends on {end}, before it starts on {start}")]
    InvalidEventRange { start: String, end: String },

    #[error("Same-day timed event must end after it starts ({start} to {end})")]
    InvalidTimeRange { start: String, end: String },

    #[error("Birthdays only support yearly recurrence")]
    InvalidBirthdayRule,

    #[error("Task references unknown objective `{0}`")]
    UnknownObjective(String),

    #[error("Importance must be between 1 and 4, got {0}")]
    InvalidImportance(u8),

    #[error("`{0}` uses a reserved identifier prefix")]
    ReservedId(String),
}

/// Errors internal to the cloud mirror. These never cross the mirror
/// boundary: push failures degrade to no-ops, pull failures to absent.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote API error {status}: {message}")]
    Api { status: u16, message: String },
}
