//! Domain entities - the core business objects.

mod blog;
pub mod validation;

pub use blog::{Blog, BlogDraft, BlogId, timestamp_now};
pub use validation::ValidationError;
