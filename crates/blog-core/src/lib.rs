//! # Blog Core
//!
//! The domain layer of the blog platform.
//! This crate holds the post entity, its validation rules, the update and
//! search builders, and the resource operations. Storage is reached only
//! through the [`ports::BlogRepository`] trait.

pub mod builder;
pub mod domain;
pub mod error;
mod mapper;
pub mod ports;
pub mod service;

pub use error::{DomainError, RepoError};
pub use service::{BlogService, STORE_TIMEOUT};
