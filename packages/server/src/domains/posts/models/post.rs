use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::PostId;

/// Stored post or reply, together with its aggregated like/reply state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostRecord {
    pub id: PostId,
    /// Identity (JWT subject) of the author
    pub creator: String,
    pub text: String,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    /// Set iff the record is a reply
    pub parent_id: Option<PostId>,
    pub deleted: bool,
    pub likers: Vec<String>,
    /// Non-deleted direct replies; only meaningful for live top-level posts
    pub reply_count: i64,
    pub created_at: DateTime<Utc>,
}

impl PostRecord {
    /// A fresh, unliked, top-level record. Mostly useful for tests.
    pub fn new(creator: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: PostId::new(),
            creator: creator.into(),
            text: text.into(),
            media_url: None,
            media_type: None,
            parent_id: None,
            deleted: false,
            likers: Vec::new(),
            reply_count: 0,
            created_at: Utc::now(),
        }
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// Input for creating a post or reply
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub creator: String,
    pub text: String,
    pub parent_id: Option<PostId>,
    pub media: Option<MediaUpload>,
}

/// Raw media attached to a new post
#[derive(Debug, Clone, PartialEq)]
pub struct MediaUpload {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

/// Stored media bytes for serving
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct StoredMedia {
    pub media_data: Vec<u8>,
    pub media_type: String,
}

/// Filters for post search; every field is optional and they combine with AND
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParams {
    /// Case-insensitive substring of the post text
    pub text: Option<String>,
    pub creator: Option<String>,
    /// Only replies to this post
    pub parent_id: Option<PostId>,
}

/// A page of records plus the total number of matches
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPage {
    pub count: i64,
    pub posts: Vec<PostRecord>,
}

/// A post together with its direct replies
#[derive(Debug, Clone, PartialEq)]
pub struct PostThread {
    pub post: PostRecord,
    pub replies: Vec<PostRecord>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

const SELECT_RECORD: &str = r#"
    SELECT
        p.id,
        p.creator,
        p.text,
        p.media_url,
        p.media_type,
        p.parent_id,
        p.deleted,
        COALESCE(
            (SELECT array_agg(l.user_id ORDER BY l.created_at)
             FROM post_likes l WHERE l.post_id = p.id),
            '{}'::text[]
        ) AS likers,
        (SELECT COUNT(*) FROM posts r WHERE r.parent_id = p.id AND NOT r.deleted) AS reply_count,
        p.created_at
    FROM posts p
"#;

impl PostRecord {
    /// Find a post or reply by ID
    pub async fn find_by_id(id: PostId, pool: &PgPool) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, PostRecord>(&format!("{SELECT_RECORD} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a post with this ID exists (deleted or not)
    pub async fn exists(id: PostId, pool: &PgPool) -> sqlx::Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM posts WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Count top-level posts, optionally only those newer than a timestamp
    pub async fn count_top_level(
        newer_than: Option<DateTime<Utc>>,
        pool: &PgPool,
    ) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM posts
             WHERE parent_id IS NULL
               AND ($1::timestamptz IS NULL OR created_at > $1)",
        )
        .bind(newer_than)
        .fetch_one(pool)
        .await
    }

    /// Page through top-level posts, newest first. Deleted posts are included.
    pub async fn find_top_level(
        newer_than: Option<DateTime<Utc>>,
        limit: i64,
        offset: i64,
        pool: &PgPool,
    ) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, PostRecord>(&format!(
            "{SELECT_RECORD}
             WHERE p.parent_id IS NULL
               AND ($1::timestamptz IS NULL OR p.created_at > $1)
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(newer_than)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Direct replies to a post, oldest first
    pub async fn find_replies(parent_id: PostId, pool: &PgPool) -> sqlx::Result<Vec<Self>> {
        sqlx::query_as::<_, PostRecord>(&format!(
            "{SELECT_RECORD}
             WHERE p.parent_id = $1
             ORDER BY p.created_at ASC, p.id ASC"
        ))
        .bind(parent_id)
        .fetch_all(pool)
        .await
    }

    /// Search posts and replies. Deleted records never match.
    ///
    /// The text filter is a literal substring; `%` and `_` have no special meaning.
    pub async fn search(
        params: &SearchParams,
        limit: i64,
        offset: i64,
        pool: &PgPool,
    ) -> sqlx::Result<(Vec<Self>, i64)> {
        const FILTER: &str = "
             WHERE NOT p.deleted
               AND ($1::text IS NULL OR strpos(lower(p.text), lower($1)) > 0)
               AND ($2::text IS NULL OR p.creator = $2)
               AND ($3::uuid IS NULL OR p.parent_id = $3)";

        let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM posts p {FILTER}"))
            .bind(params.text.as_deref())
            .bind(params.creator.as_deref())
            .bind(params.parent_id)
            .fetch_one(pool)
            .await?;

        let posts = sqlx::query_as::<_, PostRecord>(&format!(
            "{SELECT_RECORD} {FILTER}
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT $4 OFFSET $5"
        ))
        .bind(params.text.as_deref())
        .bind(params.creator.as_deref())
        .bind(params.parent_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok((posts, count))
    }

    /// Insert a new post or reply and return the stored record
    pub async fn create(
        post: &NewPost,
        media_url: Option<String>,
        id: PostId,
        pool: &PgPool,
    ) -> sqlx::Result<Self> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, creator, text, parent_id, media_url, media_type, media_data)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(&post.creator)
        .bind(&post.text)
        .bind(post.parent_id)
        .bind(media_url)
        .bind(post.media.as_ref().map(|m| m.media_type.as_str()))
        .bind(post.media.as_ref().map(|m| m.bytes.as_slice()))
        .execute(pool)
        .await?;

        Self::find_by_id(id, pool)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Add a liker. Liking twice is a no-op.
    pub async fn add_like(id: PostId, user_id: &str, pool: &PgPool) -> sqlx::Result<()> {
        sqlx::query(
            "INSERT INTO post_likes (post_id, user_id) VALUES ($1, $2)
             ON CONFLICT (post_id, user_id) DO NOTHING",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove a liker. Removing a non-liker is a no-op.
    pub async fn remove_like(id: PostId, user_id: &str, pool: &PgPool) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Creator of a post, if it exists
    pub async fn find_creator(id: PostId, pool: &PgPool) -> sqlx::Result<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT creator FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Soft delete: keep id and creator so threads stay intact
    pub async fn soft_delete(id: PostId, pool: &PgPool) -> sqlx::Result<()> {
        sqlx::query(
            "UPDATE posts SET deleted = true, deleted_at = NOW()
             WHERE id = $1 AND NOT deleted",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Raw media bytes of a live post, if it has any
    pub async fn find_media(id: PostId, pool: &PgPool) -> sqlx::Result<Option<StoredMedia>> {
        sqlx::query_as::<_, StoredMedia>(
            "SELECT media_data, media_type FROM posts
             WHERE id = $1 AND NOT deleted
               AND media_data IS NOT NULL AND media_type IS NOT NULL",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
