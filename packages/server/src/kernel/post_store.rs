//! PostgreSQL-backed post storage.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::common::{PostId, ValidatedOffsetArgs};
use crate::domains::posts::errors::{PostError, PostResult};
use crate::domains::posts::models::{
    NewPost, PostRecord, PostThread, RecordPage, SearchParams, StoredMedia,
};
use crate::kernel::BasePostStore;

pub struct PgPostStore {
    pool: PgPool,
    media_base_url: String,
}

impl PgPostStore {
    pub fn new(pool: PgPool, media_base_url: impl Into<String>) -> Self {
        Self {
            pool,
            media_base_url: media_base_url.into(),
        }
    }

    fn media_url(&self, id: PostId) -> String {
        format!("{}/{}", self.media_base_url.trim_end_matches('/'), id)
    }

    async fn ensure_exists(&self, id: PostId) -> PostResult<()> {
        if PostRecord::exists(id, &self.pool).await? {
            Ok(())
        } else {
            Err(PostError::NotFound(id.to_string()))
        }
    }
}

#[async_trait]
impl BasePostStore for PgPostStore {
    async fn list(
        &self,
        args: ValidatedOffsetArgs,
        newer_than: Option<PostId>,
    ) -> PostResult<RecordPage> {
        let since = match newer_than {
            Some(id) => Some(
                PostRecord::find_by_id(id, &self.pool)
                    .await?
                    .ok_or_else(|| PostError::NotFound(id.to_string()))?
                    .created_at,
            ),
            None => None,
        };

        let count = PostRecord::count_top_level(since, &self.pool).await?;
        let posts = PostRecord::find_top_level(
            since,
            i64::from(args.limit),
            i64::from(args.offset),
            &self.pool,
        )
        .await?;

        Ok(RecordPage { count, posts })
    }

    async fn search(
        &self,
        params: &SearchParams,
        args: ValidatedOffsetArgs,
    ) -> PostResult<RecordPage> {
        let (posts, count) = PostRecord::search(
            params,
            i64::from(args.limit),
            i64::from(args.offset),
            &self.pool,
        )
        .await?;

        Ok(RecordPage { count, posts })
    }

    async fn get_post_with_replies(&self, id: PostId) -> PostResult<PostThread> {
        let post = PostRecord::find_by_id(id, &self.pool)
            .await?
            .ok_or_else(|| PostError::NotFound(id.to_string()))?;
        let replies = PostRecord::find_replies(id, &self.pool).await?;

        Ok(PostThread { post, replies })
    }

    async fn like(&self, id: PostId, user_id: &str) -> PostResult<()> {
        self.ensure_exists(id).await?;
        PostRecord::add_like(id, user_id, &self.pool).await?;
        Ok(())
    }

    async fn unlike(&self, id: PostId, user_id: &str) -> PostResult<()> {
        self.ensure_exists(id).await?;
        PostRecord::remove_like(id, user_id, &self.pool).await?;
        Ok(())
    }

    async fn create(&self, post: NewPost) -> PostResult<PostRecord> {
        if let Some(parent_id) = post.parent_id {
            self.ensure_exists(parent_id).await?;
        }

        let id = PostId::new();
        let media_url = post.media.as_ref().map(|_| self.media_url(id));
        debug!(post_id = %id, has_media = post.media.is_some(), "Inserting post");

        Ok(PostRecord::create(&post, media_url, id, &self.pool).await?)
    }

    async fn delete(&self, id: PostId, user_id: &str) -> PostResult<()> {
        let creator = PostRecord::find_creator(id, &self.pool)
            .await?
            .ok_or_else(|| PostError::NotFound(id.to_string()))?;

        if creator != user_id {
            return Err(PostError::Forbidden);
        }

        PostRecord::soft_delete(id, &self.pool).await?;
        Ok(())
    }

    async fn media(&self, id: PostId) -> PostResult<Option<StoredMedia>> {
        Ok(PostRecord::find_media(id, &self.pool).await?)
    }
}
