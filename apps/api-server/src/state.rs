//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::BlogService;
use blog_core::ports::BlogRepository;
use blog_infra::{DatabaseConfig, InMemoryBlogRepository};

#[cfg(feature = "postgres")]
use blog_infra::PostgresBlogRepository;

/// Which store backs the running server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Postgres => "postgres",
            StoreKind::Memory => "memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blogs: BlogService,
    pub store: StoreKind,
}

impl AppState {
    /// State over an already-built store handle.
    pub fn with_repository(repo: Arc<dyn BlogRepository>, store: StoreKind) -> Self {
        Self {
            blogs: BlogService::new(repo),
            store,
        }
    }

    fn in_memory() -> Self {
        Self::with_repository(Arc::new(InMemoryBlogRepository::new()), StoreKind::Memory)
    }

    /// Build the application state, falling back to the in-memory store
    /// when no database is configured or reachable.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        let state = match db_config {
            Some(config) => match Self::postgres(config).await {
                Ok(state) => state,
                Err(e) => {
                    tracing::error!(
                        "Failed to set up database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let state = {
            if db_config.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without postgres feature");
            }
            Self::in_memory()
        };

        tracing::info!(store = state.store.as_str(), "Application state initialized");
        state
    }

    #[cfg(feature = "postgres")]
    async fn postgres(config: &DatabaseConfig) -> Result<Self, blog_core::RepoError> {
        let repo = PostgresBlogRepository::connect(config).await?;
        Ok(Self::with_repository(Arc::new(repo), StoreKind::Postgres))
    }
}
