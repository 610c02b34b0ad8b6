//! Repository implementations for database access
//!
//! Each repository borrows the shared pool and runs one statement per call.
//! Integrity (foreign keys, NOT NULL) is left to the database.

pub mod catalog;

pub use catalog::CatalogRepo;

use super::ConnectionError;

/// Failure of a single data-access call
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("error creating database connection: {0}")]
    Connection(#[from] ConnectionError),

    #[error("game category {0} does not exist")]
    UnknownCategory(i32),

    #[error("error {op}: {source}")]
    Query {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl DataError {
    pub fn query(op: &'static str, source: sqlx::Error) -> Self {
        Self::Query { op, source }
    }
}
