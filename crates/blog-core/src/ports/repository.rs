use async_trait::async_trait;

use crate::builder::{SearchFilter, UpdateSet};
use crate::domain::{Blog, BlogId};
use crate::error::RepoError;

/// Handle to the collection holding posts.
///
/// Implementations must be safe to share across concurrent requests; each
/// method is a single-document (or single-query) store call.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Insert a complete document.
    async fn insert_one(&self, blog: &Blog) -> Result<(), RepoError>;

    /// Merge `update` into the document with `id`.
    /// Returns how many documents matched (0 or 1).
    async fn update_one(&self, id: BlogId, update: &UpdateSet) -> Result<u64, RepoError>;

    /// Remove the document with `id`. Returns how many were deleted.
    async fn delete_one(&self, id: BlogId) -> Result<u64, RepoError>;

    /// Find a document by its id.
    async fn find_one(&self, id: BlogId) -> Result<Option<Blog>, RepoError>;

    /// All documents matching `filter`, in store iteration order.
    /// Fails as a whole if any single document cannot be decoded.
    async fn find_many(&self, filter: &SearchFilter) -> Result<Vec<Blog>, RepoError>;
}
