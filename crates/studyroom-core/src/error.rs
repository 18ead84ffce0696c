//! Core error types for studyroom-core.
//!
//! The focus timer itself is infallible; errors only arise at the edges
//! (session sinks, SQLite storage, configuration files).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studyroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A session sink refused a completed session
    #[error("Session sink error: {0}")]
    Sink(#[from] SinkError),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Errors returned by a [`SessionSink`](crate::session::SessionSink).
#[derive(Error, Debug)]
pub enum SinkError {
    /// The sink refused the record
    #[error("Session rejected: {0}")]
    Rejected(String),

    /// The backing store failed
    #[error("Session storage failed: {0}")]
    Storage(#[from] DatabaseError),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg) => {
                if code.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for SinkError {
    fn from(err: rusqlite::Error) -> Self {
        SinkError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_error_wraps_database_error() {
        let err: SinkError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, SinkError::Storage(DatabaseError::QueryFailed(_))));
        let core: CoreError = err.into();
        assert!(core.to_string().starts_with("Session sink error"));
    }

    #[test]
    fn config_error_messages_name_the_key() {
        let err = ConfigError::UnknownKey("ui.theme".into());
        assert_eq!(err.to_string(), "Unknown configuration key: ui.theme");
    }
}
