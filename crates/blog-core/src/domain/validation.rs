//! Field constraints for posts.

use super::{Blog, BlogDraft};
use crate::error::DomainError;

pub const TITLE_MIN_CHARS: usize = 2;
pub const TITLE_MAX_CHARS: usize = 30;

/// Which constraint a candidate post failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title must be between 2 and 30 characters")]
    TitleLength,

    #[error("content is required")]
    ContentMissing,
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::BadInput(err.to_string())
    }
}

/// Title length is counted in characters, not bytes.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    let len = title.chars().count();
    if (TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::TitleLength)
    }
}

/// Validate a complete post before it is inserted.
pub fn validate(blog: &Blog) -> Result<(), ValidationError> {
    validate_title(&blog.title)?;
    if blog.content.is_empty() {
        return Err(ValidationError::ContentMissing);
    }
    Ok(())
}

/// Validate the fields an update actually supplies.
pub fn validate_partial(draft: &BlogDraft) -> Result<(), ValidationError> {
    if !draft.title.is_empty() {
        validate_title(&draft.title)?;
    }
    Ok(())
}
