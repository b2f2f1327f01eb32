//! Post mutations: like, unlike, create and delete.
//!
//! Every action runs `authorize` first; storage is only called once the
//! viewer and the required ids have been checked.

use tracing::info;

use super::{parse_optional_post_id, parse_post_id};
use crate::common::authorize;
use crate::domains::posts::data::{project, PostView};
use crate::domains::posts::errors::{PostError, PostResult};
use crate::domains::posts::models::{MediaUpload, NewPost};
use crate::kernel::ServerDeps;

/// Raw input for creating a post or reply
#[derive(Debug, Clone, Default)]
pub struct CreatePostInput {
    pub text: String,
    /// When set, the new post is a reply to this post
    pub parent_id: Option<String>,
    pub media: Option<Vec<u8>>,
    /// Mime type of `media`; required whenever `media` is set
    pub media_type: Option<String>,
}

/// Like a post. Liking twice leaves the liker set unchanged.
/// Returns the id as given.
pub async fn like_post(id: &str, viewer: Option<&str>, deps: &ServerDeps) -> PostResult<String> {
    let viewer = authorize(viewer, &[("id", id)])?;
    let post_id = parse_post_id("id", id)?;

    info!(post_id = %post_id, viewer = %viewer, "Liking post");
    deps.posts().like(post_id, viewer).await?;

    Ok(id.to_string())
}

/// Remove a like. Unliking a post the viewer never liked is a no-op.
pub async fn unlike_post(id: &str, viewer: Option<&str>, deps: &ServerDeps) -> PostResult<String> {
    let viewer = authorize(viewer, &[("id", id)])?;
    let post_id = parse_post_id("id", id)?;

    info!(post_id = %post_id, viewer = %viewer, "Unliking post");
    deps.posts().unlike(post_id, viewer).await?;

    Ok(id.to_string())
}

/// Create a post, or a reply when `parent_id` is set, and return it as the
/// creator sees it.
///
/// Empty text is accepted.
pub async fn create_post(
    input: CreatePostInput,
    viewer: Option<&str>,
    deps: &ServerDeps,
) -> PostResult<PostView> {
    let viewer = authorize(viewer, &[])?;

    let media = match (input.media, input.media_type) {
        (Some(bytes), Some(media_type)) if !media_type.is_empty() => {
            Some(MediaUpload { bytes, media_type })
        }
        (Some(_), _) => {
            return Err(PostError::validation(
                "mediaType is required when media is set",
            ))
        }
        (None, _) => None,
    };
    let parent_id = parse_optional_post_id("parentId", input.parent_id.as_deref())?;

    info!(
        viewer = %viewer,
        parent_id = ?parent_id,
        has_media = media.is_some(),
        "Creating post"
    );

    let record = deps
        .posts()
        .create(NewPost {
            creator: viewer.to_string(),
            text: input.text,
            parent_id,
            media,
        })
        .await?;

    Ok(project(record, Some(viewer)))
}

/// Soft-delete a post. Only its creator may do so; the store enforces that.
pub async fn delete_post(id: &str, viewer: Option<&str>, deps: &ServerDeps) -> PostResult<String> {
    let viewer = authorize(viewer, &[("id", id)])?;
    let post_id = parse_post_id("id", id)?;

    info!(post_id = %post_id, viewer = %viewer, "Deleting post");
    deps.posts().delete(post_id, viewer).await?;

    Ok(id.to_string())
}
