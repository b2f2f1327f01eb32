//! Post actions - entry-point functions for post operations
//!
//! These are called directly from the GraphQL resolvers. Actions are
//! self-contained: they take raw input, handle ID parsing and precondition
//! checks, delegate to the post store and return projected views.

pub mod mutation;
pub mod query;

pub use mutation::{create_post, delete_post, like_post, unlike_post, CreatePostInput};
pub use query::{get_post_with_replies, get_replies, list_posts, search_posts, SearchInput};

use crate::common::PostId;
use crate::domains::posts::errors::{PostError, PostResult};

/// Parse a non-empty raw ID, naming the argument in the error
fn parse_post_id(field: &str, raw: &str) -> PostResult<PostId> {
    PostId::parse(raw)
        .map_err(|_| PostError::validation(format!("{} is not a valid post id", field)))
}

/// Parse an optional ID argument; empty strings count as absent
fn parse_optional_post_id(field: &str, raw: Option<&str>) -> PostResult<Option<PostId>> {
    raw.filter(|s| !s.is_empty())
        .map(|s| parse_post_id(field, s))
        .transpose()
}
