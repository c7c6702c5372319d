//! Resource operations over posts.
//!
//! Every operation runs against one deadline taken at its start. Update
//! reuses that deadline for both of its store calls. Dropping the returned
//! future (for example when the client disconnects) abandons whatever store
//! call is in flight; work the store already committed is not undone.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::builder::{build_search_filter, build_update};
use crate::domain::{Blog, BlogDraft, BlogId, timestamp_now, validation};
use crate::error::{DomainError, RepoError};
use crate::mapper::{FETCH_FAILED, require_found, require_match, store_error};
use crate::ports::BlogRepository;

/// Upper bound on the store work of a single operation.
pub const STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// The five post operations, bound to one store handle.
#[derive(Clone)]
pub struct BlogService {
    repo: Arc<dyn BlogRepository>,
    timeout: Duration,
}

impl BlogService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self {
            repo,
            timeout: STORE_TIMEOUT,
        }
    }

    /// Override the per-operation store budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn deadline(&self) -> Instant {
        Instant::now() + self.timeout
    }

    async fn bounded<T>(
        &self,
        deadline: Instant,
        call: impl Future<Output = Result<T, RepoError>>,
    ) -> Result<T, RepoError> {
        match tokio::time::timeout_at(deadline, call).await {
            Ok(result) => result,
            Err(_) => Err(RepoError::Timeout(self.timeout)),
        }
    }

    /// Create a post from a draft.
    #[tracing::instrument(skip_all)]
    pub async fn create(&self, draft: BlogDraft) -> Result<Blog, DomainError> {
        let deadline = self.deadline();

        let blog = Blog::from_draft(draft, timestamp_now());
        validation::validate(&blog)?;

        self.bounded(deadline, self.repo.insert_one(&blog))
            .await
            .map_err(|e| store_error("create", "could not insert", e))?;

        tracing::info!(blog_id = %blog.id, "Blog created");
        Ok(blog)
    }

    /// Merge the supplied fields into an existing post and return the
    /// stored result.
    #[tracing::instrument(skip(self, draft), fields(blog_id = %id))]
    pub async fn update(&self, id: BlogId, draft: BlogDraft) -> Result<Blog, DomainError> {
        let deadline = self.deadline();

        validation::validate_partial(&draft)?;
        let update = build_update(draft, timestamp_now());
        tracing::debug!(fields = ?update.fields(), "Applying partial update");

        let matched = self
            .bounded(deadline, self.repo.update_one(id, &update))
            .await
            .map_err(|e| store_error("update", "could not update", e))?;
        require_match(matched)?;

        // The write has landed; any read-back failure is reported as missing.
        match self.bounded(deadline, self.repo.find_one(id)).await {
            Ok(Some(blog)) => Ok(blog),
            Ok(None) => {
                tracing::warn!("Blog disappeared between update and read-back");
                Err(DomainError::NotFound(FETCH_FAILED.to_string()))
            }
            Err(err) => {
                tracing::warn!(error = %err, "Update applied but read-back failed");
                Err(DomainError::NotFound(FETCH_FAILED.to_string()))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(blog_id = %id))]
    pub async fn delete(&self, id: BlogId) -> Result<(), DomainError> {
        let deadline = self.deadline();

        let deleted = self
            .bounded(deadline, self.repo.delete_one(id))
            .await
            .map_err(|e| store_error("delete", "could not delete", e))?;
        require_match(deleted)?;

        tracing::info!("Blog deleted");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(blog_id = %id))]
    pub async fn get(&self, id: BlogId) -> Result<Blog, DomainError> {
        let deadline = self.deadline();

        let found = self
            .bounded(deadline, self.repo.find_one(id))
            .await
            .map_err(|e| store_error("get", FETCH_FAILED, e))?;
        require_found(found)
    }

    /// List every post, or only those matching `term`.
    ///
    /// Either the full result is returned or an error; a failure part way
    /// through never yields a truncated list.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, term: Option<&str>) -> Result<Vec<Blog>, DomainError> {
        let deadline = self.deadline();

        let filter = build_search_filter(term);
        let blogs = self
            .bounded(deadline, self.repo.find_many(&filter))
            .await
            .map_err(|e| match e {
                RepoError::Decode(_) => store_error("list", FETCH_FAILED, e),
                other => store_error("list", "could not find blogs", other),
            })?;

        tracing::debug!(count = blogs.len(), "Blogs listed");
        Ok(blogs)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::builder::{SearchFilter, UpdateSet};

    /// Store stand-in whose answers are fixed up front.
    struct ScriptedRepo {
        delay: Duration,
        matched: u64,
        stored: Option<Blog>,
        read_error: Option<fn() -> RepoError>,
        write_error: Option<fn() -> RepoError>,
        inserts: AtomicUsize,
        reads: AtomicUsize,
    }

    impl Default for ScriptedRepo {
        fn default() -> Self {
            Self {
                delay: Duration::ZERO,
                matched: 1,
                stored: None,
                read_error: None,
                write_error: None,
                inserts: AtomicUsize::new(0),
                reads: AtomicUsize::new(0),
            }
        }
    }

    impl ScriptedRepo {
        async fn pause(&self) {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        fn write_result(&self) -> Result<(), RepoError> {
            match self.write_error {
                Some(make) => Err(make()),
                None => Ok(()),
            }
        }

        fn read_result(&self) -> Result<(), RepoError> {
            match self.read_error {
                Some(make) => Err(make()),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl BlogRepository for ScriptedRepo {
        async fn insert_one(&self, _blog: &Blog) -> Result<(), RepoError> {
            self.pause().await;
            self.write_result()?;
            self.inserts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn update_one(&self, _id: BlogId, _update: &UpdateSet) -> Result<u64, RepoError> {
            self.pause().await;
            self.write_result()?;
            Ok(self.matched)
        }

        async fn delete_one(&self, _id: BlogId) -> Result<u64, RepoError> {
            self.pause().await;
            self.write_result()?;
            Ok(self.matched)
        }

        async fn find_one(&self, _id: BlogId) -> Result<Option<Blog>, RepoError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.pause().await;
            self.read_result()?;
            Ok(self.stored.clone())
        }

        async fn find_many(&self, _filter: &SearchFilter) -> Result<Vec<Blog>, RepoError> {
            self.pause().await;
            self.read_result()?;
            Ok(self.stored.clone().into_iter().collect())
        }
    }

    fn draft(title: &str, content: &str) -> BlogDraft {
        BlogDraft {
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    fn sample() -> Blog {
        Blog::from_draft(draft("Hi", "World"), timestamp_now())
    }

    fn service(repo: ScriptedRepo) -> (BlogService, Arc<ScriptedRepo>) {
        let repo = Arc::new(repo);
        (BlogService::new(repo.clone()), repo)
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_without_touching_store() {
        let (svc, repo) = service(ScriptedRepo::default());

        let err = svc.create(draft("H", "World")).await.unwrap_err();
        assert!(matches!(err, DomainError::BadInput(_)));

        let err = svc.create(draft("Hi", "")).await.unwrap_err();
        assert!(matches!(err, DomainError::BadInput(_)));

        assert_eq!(repo.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_create_store_failure() {
        let (svc, _) = service(ScriptedRepo {
            write_error: Some(|| RepoError::Connection("refused".into())),
            ..Default::default()
        });

        let err = svc.create(draft("Hi", "World")).await.unwrap_err();
        assert_eq!(err, DomainError::StoreFailure("could not insert".into()));
    }

    #[tokio::test]
    async fn test_update_with_no_match_skips_read_back() {
        let (svc, repo) = service(ScriptedRepo {
            matched: 0,
            ..Default::default()
        });

        let err = svc.update(BlogId::generate(), BlogDraft::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(repo.reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_update_read_back_failure_is_not_found() {
        let (svc, _) = service(ScriptedRepo {
            read_error: Some(|| RepoError::Query("cursor closed".into())),
            ..Default::default()
        });

        let err = svc.update(BlogId::generate(), BlogDraft::default()).await.unwrap_err();
        assert_eq!(err, DomainError::NotFound(FETCH_FAILED.into()));
    }

    #[tokio::test]
    async fn test_update_read_back_of_vanished_post_is_fetch_failure() {
        let (svc, repo) = service(ScriptedRepo {
            stored: None,
            ..Default::default()
        });

        let err = svc.update(BlogId::generate(), BlogDraft::default()).await.unwrap_err();
        assert_eq!(err, DomainError::NotFound(FETCH_FAILED.into()));
        assert_eq!(repo.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_rejects_bad_title() {
        let (svc, _) = service(ScriptedRepo::default());
        let err = svc
            .update(BlogId::generate(), draft(&"t".repeat(31), ""))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::BadInput(_)));
    }

    #[tokio::test]
    async fn test_update_write_failure_is_store_failure() {
        let (svc, _) = service(ScriptedRepo {
            write_error: Some(|| RepoError::Query("boom".into())),
            ..Default::default()
        });
        let err = svc.update(BlogId::generate(), BlogDraft::default()).await.unwrap_err();
        assert_eq!(err, DomainError::StoreFailure("could not update".into()));
    }

    #[tokio::test]
    async fn test_get_distinguishes_missing_from_failure() {
        let (svc, _) = service(ScriptedRepo::default());
        let err = svc.get(BlogId::generate()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let (svc, _) = service(ScriptedRepo {
            read_error: Some(|| RepoError::Connection("gone".into())),
            ..Default::default()
        });
        let err = svc.get(BlogId::generate()).await.unwrap_err();
        assert_eq!(err, DomainError::StoreFailure(FETCH_FAILED.into()));
    }

    #[tokio::test]
    async fn test_list_decode_failure_discards_everything() {
        let (svc, _) = service(ScriptedRepo {
            stored: Some(sample()),
            read_error: Some(|| RepoError::Decode("tags is not a list".into())),
            ..Default::default()
        });
        let err = svc.list(None).await.unwrap_err();
        assert_eq!(err, DomainError::StoreFailure(FETCH_FAILED.into()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_store_times_out_as_store_failure() {
        let (svc, _) = service(ScriptedRepo {
            delay: Duration::from_secs(11),
            stored: Some(sample()),
            ..Default::default()
        });

        let err = svc.get(BlogId::generate()).await.unwrap_err();
        assert!(matches!(err, DomainError::StoreFailure(_)));

        let err = svc.list(Some("hi")).await.unwrap_err();
        assert!(matches!(err, DomainError::StoreFailure(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_calls_share_one_deadline() {
        // Each call fits the budget alone, the pair does not.
        let (svc, repo) = service(ScriptedRepo {
            delay: Duration::from_secs(6),
            stored: Some(sample()),
            ..Default::default()
        });

        let err = svc.update(BlogId::generate(), BlogDraft::default()).await.unwrap_err();
        assert_eq!(err, DomainError::NotFound(FETCH_FAILED.into()));
        assert_eq!(repo.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_timeout() {
        let repo = Arc::new(ScriptedRepo {
            delay: Duration::from_millis(50),
            ..Default::default()
        });
        let svc = BlogService::new(repo).with_timeout(Duration::from_millis(10));
        assert_eq!(svc.timeout(), Duration::from_millis(10));

        let err = svc.delete(BlogId::generate()).await.unwrap_err();
        assert_eq!(err, DomainError::StoreFailure("could not delete".into()));
    }
}
