//! Domain-level error types.

use std::time::Duration;

use thiserror::Error;

/// Service outcomes other than success.
///
/// Each variant carries the short public message sent to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Malformed id, malformed body or a failed field constraint.
    #[error("{0}")]
    BadInput(String),

    /// The targeted post does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The store failed, timed out or returned something undecodable.
    #[error("{0}")]
    StoreFailure(String),
}

impl DomainError {
    /// The request body could not be decoded into a post.
    pub fn invalid_body() -> Self {
        DomainError::BadInput("could not bind json".to_string())
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Stored document could not be decoded: {0}")]
    Decode(String),

    #[error("Store call exceeded {0:?}")]
    Timeout(Duration),
}
