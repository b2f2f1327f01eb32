// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Projection, pagination and mutation preconditions live in domains/posts.
//
// Naming convention: Base* for trait names (e.g., BasePostStore)

use async_trait::async_trait;

use crate::common::{PostId, ValidatedOffsetArgs};
use crate::domains::posts::errors::PostResult;
use crate::domains::posts::models::{NewPost, PostRecord, PostThread, RecordPage, SearchParams, StoredMedia};

// =============================================================================
// Post Storage Trait (Infrastructure - persistence of posts, likes, deletes)
// =============================================================================

/// Persistence for posts and replies.
///
/// Implementations return raw records; projection happens in the caller.
/// Likes must have set semantics (adding twice or removing a non-liker is a
/// no-op) and each call must be atomic with respect to concurrent callers.
#[async_trait]
pub trait BasePostStore: Send + Sync {
    /// Top-level posts (no replies), newest first, deleted ones included.
    /// `newer_than` keeps only posts created after that post; an unknown id
    /// is `NotFound`.
    async fn list(
        &self,
        args: ValidatedOffsetArgs,
        newer_than: Option<PostId>,
    ) -> PostResult<RecordPage>;

    /// Posts and replies matching `params`
    async fn search(&self, params: &SearchParams, args: ValidatedOffsetArgs)
        -> PostResult<RecordPage>;

    /// A post and its direct replies, oldest reply first
    async fn get_post_with_replies(&self, id: PostId) -> PostResult<PostThread>;

    async fn like(&self, id: PostId, user_id: &str) -> PostResult<()>;

    async fn unlike(&self, id: PostId, user_id: &str) -> PostResult<()>;

    /// Store a new post or reply. A missing parent is `NotFound`.
    async fn create(&self, post: NewPost) -> PostResult<PostRecord>;

    /// Soft delete. Only the creator may delete (`Forbidden` otherwise).
    async fn delete(&self, id: PostId, user_id: &str) -> PostResult<()>;

    /// Media bytes of a live post, if any
    async fn media(&self, id: PostId) -> PostResult<Option<StoredMedia>>;
}
