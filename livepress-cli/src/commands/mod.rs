//! CLI command implementations.

pub mod list;
pub mod serve;

pub use list::list_posts;
pub use serve::serve;
