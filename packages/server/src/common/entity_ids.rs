//! Typed ID definitions for domain entities.

pub use super::id::Id;

/// Marker type for Post entities (top-level posts and replies share one table).
pub struct Post;

/// Typed ID for Post entities.
pub type PostId = Id<Post>;
