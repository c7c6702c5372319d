//! Store outcome to service outcome mapping.

use crate::error::{DomainError, RepoError};

pub(crate) const NOT_FOUND: &str = "could not find a blog";
pub(crate) const FETCH_FAILED: &str = "could not fetch a blog";

/// Map a failed store call onto the service taxonomy.
///
/// `NotFound` from the store stays `NotFound`; everything else becomes a
/// `StoreFailure` carrying `message`. The driver's own text is logged here
/// and goes no further.
pub(crate) fn store_error(
    operation: &'static str,
    message: &'static str,
    err: RepoError,
) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::NotFound(NOT_FOUND.to_string()),
        other => {
            tracing::error!(operation, error = %other, "store call failed");
            DomainError::StoreFailure(message.to_string())
        }
    }
}

/// A write that touched no document means the id was unknown.
pub(crate) fn require_match(affected: u64) -> Result<(), DomainError> {
    if affected == 0 {
        Err(DomainError::NotFound(NOT_FOUND.to_string()))
    } else {
        Ok(())
    }
}

/// A lookup that found nothing.
pub(crate) fn require_found<T>(found: Option<T>) -> Result<T, DomainError> {
    found.ok_or_else(|| DomainError::NotFound(NOT_FOUND.to_string()))
}
