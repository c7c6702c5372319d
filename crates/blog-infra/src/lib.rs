//! # Blog Infrastructure
//!
//! Concrete implementations of the [`blog_core::ports::BlogRepository`] port.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL store via SeaORM; without it only
//!   the in-memory store is built

pub mod database;
pub mod memory;

pub use database::DatabaseConfig;
pub use memory::InMemoryBlogRepository;

#[cfg(feature = "postgres")]
pub use database::PostgresBlogRepository;
