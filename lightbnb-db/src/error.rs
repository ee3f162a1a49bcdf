//! Error types for lightbnb-db
//!
//! Every repository operation returns [`Result`]. A lookup that matches no
//! row is `Ok(None)`, never an error, so callers can tell "not found" apart
//! from a failed query.

use std::io;

use thiserror::Error;

use crate::models::ValidationError;

/// PostgreSQL SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Database error type
#[derive(Debug, Error)]
pub enum DbError {
    /// Driver, connectivity, or query failure (pool timeout, network loss, bad SQL)
    #[error("database error: {0}")]
    Sqlx(#[source] sqlx::Error),

    /// A constraint rejected the write (e.g. duplicate email)
    #[error("conflict: {resource} {detail}")]
    Conflict { resource: &'static str, detail: String },

    /// Input rejected before reaching the database
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Missing or malformed configuration value
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// Property fixture could not be parsed
    #[error("fixture error at {context}: {source}")]
    Fixture {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for lightbnb-db operations
pub type Result<T> = std::result::Result<T, DbError>;

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        Self::Sqlx(err)
    }
}

impl DbError {
    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create a fixture error with context
    pub fn fixture(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Fixture {
            context: context.into(),
            source,
        }
    }

    /// Map a failed write, turning unique violations into [`DbError::Conflict`].
    pub fn from_write(resource: &'static str, err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                let detail = db_err
                    .constraint()
                    .map(|c| format!("violates constraint '{}'", c))
                    .unwrap_or_else(|| db_err.message().to_owned());
                tracing::warn!(resource, %detail, "write rejected by unique constraint");
                Self::Conflict { resource, detail }
            }
            _ => Self::Sqlx(err),
        }
    }

    /// True when the failure was a constraint conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
