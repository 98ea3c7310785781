//! Repository Module
//!
//! Per-table data access over the shared SQLite pool. The persistent
//! store is the source of truth for machine and order state; all
//! contended transitions go through conditional UPDATEs here rather
//! than in-process locks, so multiple server instances stay correct.

pub mod machine;
pub mod order;
pub mod route;
pub mod tracking;

// Re-exports
pub use machine::MachineRepository;
pub use order::OrderRepository;
pub use route::RouteRepository;
pub use tracking::TrackingRepository;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepoError::NotFound("row not found".into()),
            other => RepoError::Database(other.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
