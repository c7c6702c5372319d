//! In-memory post collection - used when no database is configured.

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use tokio::sync::RwLock;

use blog_core::builder::{SearchFilter, UpdateSet};
use blog_core::domain::{Blog, BlogId};
use blog_core::error::RepoError;
use blog_core::ports::BlogRepository;

/// In-memory document collection behind an async RwLock.
///
/// Documents are kept in insertion order, which is the order `find_many`
/// returns them in.
/// Note: Data is lost on process restart.
pub struct InMemoryBlogRepository {
    docs: RwLock<Vec<Blog>>,
}

impl InMemoryBlogRepository {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }

    fn compile(pattern: &str) -> Result<Regex, RepoError> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| RepoError::Query(format!("invalid search pattern: {e}")))
    }

    fn matches(re: &Regex, blog: &Blog) -> bool {
        re.is_match(&blog.title)
            || re.is_match(&blog.content)
            || blog
                .tags
                .as_deref()
                .is_some_and(|tags| tags.iter().any(|tag| re.is_match(tag)))
    }
}

impl Default for InMemoryBlogRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn insert_one(&self, blog: &Blog) -> Result<(), RepoError> {
        let mut docs = self.docs.write().await;
        if docs.iter().any(|doc| doc.id == blog.id) {
            return Err(RepoError::Constraint(format!("duplicate id {}", blog.id)));
        }
        docs.push(blog.clone());
        Ok(())
    }

    async fn update_one(&self, id: BlogId, update: &UpdateSet) -> Result<u64, RepoError> {
        let mut docs = self.docs.write().await;
        match docs.iter_mut().find(|doc| doc.id == id) {
            Some(doc) => {
                update.apply_to(doc);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_one(&self, id: BlogId) -> Result<u64, RepoError> {
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|doc| doc.id != id);
        Ok((before - docs.len()) as u64)
    }

    async fn find_one(&self, id: BlogId) -> Result<Option<Blog>, RepoError> {
        let docs = self.docs.read().await;
        Ok(docs.iter().find(|doc| doc.id == id).cloned())
    }

    async fn find_many(&self, filter: &SearchFilter) -> Result<Vec<Blog>, RepoError> {
        let docs = self.docs.read().await;
        match filter {
            SearchFilter::All => Ok(docs.clone()),
            SearchFilter::Pattern(pattern) => {
                let re = Self::compile(pattern)?;
                Ok(docs
                    .iter()
                    .filter(|doc| Self::matches(&re, doc))
                    .cloned()
                    .collect())
            }
        }
    }
}
