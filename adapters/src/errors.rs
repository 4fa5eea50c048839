//! Error types returned by the store.
//!
//! Failures are sorted into the kinds a caller can act on: the database could
//! not be reached, a write broke a table constraint, or the statement failed
//! for some other reason. A lookup that matches no row is not an error; the
//! store returns `Ok(None)` or an empty list for it.

use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database unavailable: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("constraint {} violated: {message}", .constraint.as_deref().unwrap_or("<unnamed>"))]
    Constraint {
        constraint: Option<String>,
        message: String,
    },

    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),
}

/// Coarse classification of a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Connection,
    Constraint,
    Query,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Connection(_) => StoreErrorKind::Connection,
            StoreError::Constraint { .. } => StoreErrorKind::Constraint,
            StoreError::Query(_) => StoreErrorKind::Query,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => StoreError::Constraint {
                    constraint: db_err.constraint().map(str::to_owned),
                    message: db_err.message().to_owned(),
                },
                _ => StoreError::Query(sqlx::Error::Database(db_err)),
            },
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_) => StoreError::Connection(err),
            other => StoreError::Query(other),
        }
    }
}
