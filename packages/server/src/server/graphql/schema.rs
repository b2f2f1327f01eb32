//! GraphQL schema definition.

use super::context::GraphQLContext;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use juniper::{EmptySubscription, RootNode, ID};

use crate::common::{OffsetArgs, ValidatedOffsetArgs};
use crate::domains::posts::actions as post_actions;
use crate::domains::posts::actions::{CreatePostInput, SearchInput};
use crate::domains::posts::data::{ListResult, PostView, SingleResult};
use crate::domains::posts::PostError;

fn validate_page(offset: Option<i32>, limit: Option<i32>) -> Result<ValidatedOffsetArgs, PostError> {
    OffsetArgs { offset, limit }
        .validate()
        .map_err(PostError::validation)
}

pub struct Query;

#[juniper::graphql_object(context = GraphQLContext)]
impl Query {
    // =========================================================================
    // Feed Queries
    // =========================================================================

    /// Page through top-level posts, newest first
    ///
    /// Arguments:
    /// - offset: records to skip (default 0)
    /// - limit: page size, 1 to 1000 (default 100)
    /// - newerThan: only posts created after this post
    async fn posts(
        ctx: &GraphQLContext,
        offset: Option<i32>,
        limit: Option<i32>,
        newer_than: Option<ID>,
    ) -> Result<ListResult, PostError> {
        let args = validate_page(offset, limit)?;
        post_actions::list_posts(args, newer_than.as_deref(), ctx.viewer(), ctx.deps()).await
    }

    /// Search posts and replies by text, creator or parent
    async fn search(
        ctx: &GraphQLContext,
        text: Option<String>,
        creator: Option<String>,
        parent_id: Option<ID>,
        offset: Option<i32>,
        limit: Option<i32>,
    ) -> Result<ListResult, PostError> {
        let args = validate_page(offset, limit)?;
        let input = SearchInput {
            text,
            creator,
            parent_id: parent_id.map(|id| id.to_string()),
        };
        post_actions::search_posts(input, args, ctx.viewer(), ctx.deps()).await
    }

    /// Get a single post with its direct replies
    async fn post(ctx: &GraphQLContext, id: ID) -> Result<SingleResult, PostError> {
        post_actions::get_post_with_replies(&id, ctx.viewer(), ctx.deps()).await
    }

    /// Get the direct replies of a post
    async fn replies(ctx: &GraphQLContext, id: ID) -> Result<Vec<PostView>, PostError> {
        post_actions::get_replies(&id, ctx.viewer(), ctx.deps()).await
    }
}

pub struct Mutation;

#[juniper::graphql_object(context = GraphQLContext)]
impl Mutation {
    /// Like a post as the current viewer
    async fn like(ctx: &GraphQLContext, id: ID) -> Result<ID, PostError> {
        post_actions::like_post(&id, ctx.viewer(), ctx.deps())
            .await
            .map(ID::new)
    }

    /// Remove the current viewer's like
    async fn unlike(ctx: &GraphQLContext, id: ID) -> Result<ID, PostError> {
        post_actions::unlike_post(&id, ctx.viewer(), ctx.deps())
            .await
            .map(ID::new)
    }

    /// Create a post, or a reply when parentId is given.
    /// `media` is base64 encoded.
    async fn create(
        ctx: &GraphQLContext,
        text: String,
        parent_id: Option<ID>,
        media: Option<String>,
        media_type: Option<String>,
    ) -> Result<PostView, PostError> {
        let media = media
            .map(|m| STANDARD.decode(m.as_bytes()))
            .transpose()
            .map_err(|_| PostError::validation("media must be base64 encoded"))?;

        let input = CreatePostInput {
            text,
            parent_id: parent_id.map(|id| id.to_string()),
            media,
            media_type,
        };
        post_actions::create_post(input, ctx.viewer(), ctx.deps()).await
    }

    /// Delete a post. Only its creator may do so.
    async fn delete(ctx: &GraphQLContext, id: ID) -> Result<ID, PostError> {
        post_actions::delete_post(&id, ctx.viewer(), ctx.deps())
            .await
            .map(ID::new)
    }
}

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<GraphQLContext>>;

pub fn create_schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
