// TestDependencies - in-process implementations for testing
//
// Provides an in-memory BasePostStore that can be injected into ServerDeps
// for tests and local runs without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, RwLock};

use crate::common::{PostId, ValidatedOffsetArgs};
use crate::domains::posts::errors::{PostError, PostResult};
use crate::domains::posts::models::{
    NewPost, PostRecord, PostThread, RecordPage, SearchParams, StoredMedia,
};
use crate::kernel::BasePostStore;

// =============================================================================
// In-memory post store
// =============================================================================

#[derive(Debug, Clone)]
struct StoredPost {
    seq: u64,
    id: PostId,
    creator: String,
    text: String,
    parent_id: Option<PostId>,
    media_url: Option<String>,
    media_type: Option<String>,
    media_data: Option<Vec<u8>>,
    deleted: bool,
    likers: BTreeSet<String>,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    posts: HashMap<PostId, StoredPost>,
    next_seq: u64,
}

impl State {
    fn get(&self, id: PostId) -> PostResult<&StoredPost> {
        self.posts
            .get(&id)
            .ok_or_else(|| PostError::NotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: PostId) -> PostResult<&mut StoredPost> {
        self.posts
            .get_mut(&id)
            .ok_or_else(|| PostError::NotFound(id.to_string()))
    }

    fn record(&self, post: &StoredPost) -> PostRecord {
        let reply_count = self
            .posts
            .values()
            .filter(|r| r.parent_id == Some(post.id) && !r.deleted)
            .count();

        PostRecord {
            id: post.id,
            creator: post.creator.clone(),
            text: post.text.clone(),
            media_url: post.media_url.clone(),
            media_type: post.media_type.clone(),
            parent_id: post.parent_id,
            deleted: post.deleted,
            likers: post.likers.iter().cloned().collect(),
            reply_count: reply_count as i64,
            created_at: post.created_at,
        }
    }

    /// Matching posts, newest first
    fn select(&self, keep: impl Fn(&StoredPost) -> bool) -> Vec<&StoredPost> {
        let mut matches: Vec<&StoredPost> = self.posts.values().filter(|p| keep(p)).collect();
        matches.sort_by(|a, b| b.seq.cmp(&a.seq));
        matches
    }

    fn page(&self, matches: Vec<&StoredPost>, args: ValidatedOffsetArgs) -> RecordPage {
        let count = matches.len() as i64;
        let posts = matches
            .into_iter()
            .skip(args.offset as usize)
            .take(args.limit as usize)
            .map(|p| self.record(p))
            .collect();
        RecordPage { count, posts }
    }
}

/// Post storage held in process memory.
///
/// Every operation takes the lock once, so likes and deletes are atomic with
/// respect to each other. Method names of all calls are recorded and can be
/// inspected with [`InMemoryPostStore::calls`].
#[derive(Clone, Default)]
pub struct InMemoryPostStore {
    state: Arc<RwLock<State>>,
    calls: Arc<Mutex<Vec<String>>>,
    media_base_url: String,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self {
            media_base_url: "/media".to_string(),
            ..Default::default()
        }
    }

    /// Seed a record as-is (bypasses the mutation path)
    pub fn with_record(self, record: PostRecord) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.next_seq += 1;
            let seq = state.next_seq;
            state.posts.insert(
                record.id,
                StoredPost {
                    seq,
                    id: record.id,
                    creator: record.creator,
                    text: record.text,
                    parent_id: record.parent_id,
                    media_url: record.media_url,
                    media_type: record.media_type,
                    media_data: None,
                    deleted: record.deleted,
                    likers: record.likers.into_iter().collect(),
                    created_at: record.created_at,
                },
            );
        }
        self
    }

    /// Names of the store methods called so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Current liker set of a post, if it exists
    pub fn likers(&self, id: PostId) -> Option<BTreeSet<String>> {
        let state = self.state.read().ok()?;
        state.posts.get(&id).map(|p| p.likers.clone())
    }

    fn track(&self, name: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(name.to_string());
        }
    }

    fn read(&self) -> PostResult<std::sync::RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| PostError::Internal(anyhow::anyhow!("post store lock poisoned")))
    }

    fn write(&self) -> PostResult<std::sync::RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| PostError::Internal(anyhow::anyhow!("post store lock poisoned")))
    }
}

#[async_trait]
impl BasePostStore for InMemoryPostStore {
    async fn list(
        &self,
        args: ValidatedOffsetArgs,
        newer_than: Option<PostId>,
    ) -> PostResult<RecordPage> {
        self.track("list");
        let state = self.read()?;

        let since = match newer_than {
            Some(id) => Some(state.get(id)?.seq),
            None => None,
        };

        let matches = state.select(|p| p.parent_id.is_none() && since.map_or(true, |s| p.seq > s));
        Ok(state.page(matches, args))
    }

    async fn search(
        &self,
        params: &SearchParams,
        args: ValidatedOffsetArgs,
    ) -> PostResult<RecordPage> {
        self.track("search");
        let state = self.read()?;

        let needle = params.text.as_ref().map(|t| t.to_lowercase());
        let matches = state.select(|p| {
            !p.deleted
                && needle
                    .as_ref()
                    .map_or(true, |n| p.text.to_lowercase().contains(n.as_str()))
                && params.creator.as_ref().map_or(true, |c| &p.creator == c)
                && params.parent_id.map_or(true, |parent| p.parent_id == Some(parent))
        });
        Ok(state.page(matches, args))
    }

    async fn get_post_with_replies(&self, id: PostId) -> PostResult<PostThread> {
        self.track("get_post_with_replies");
        let state = self.read()?;

        let post = state.record(state.get(id)?);
        let mut replies = state.select(|p| p.parent_id == Some(id));
        replies.reverse();
        let replies = replies.into_iter().map(|r| state.record(r)).collect();

        Ok(PostThread { post, replies })
    }

    async fn like(&self, id: PostId, user_id: &str) -> PostResult<()> {
        self.track("like");
        let mut state = self.write()?;
        state.get_mut(id)?.likers.insert(user_id.to_string());
        Ok(())
    }

    async fn unlike(&self, id: PostId, user_id: &str) -> PostResult<()> {
        self.track("unlike");
        let mut state = self.write()?;
        state.get_mut(id)?.likers.remove(user_id);
        Ok(())
    }

    async fn create(&self, post: NewPost) -> PostResult<PostRecord> {
        self.track("create");
        let mut state = self.write()?;

        if let Some(parent_id) = post.parent_id {
            state.get(parent_id)?;
        }

        state.next_seq += 1;
        let id = PostId::new();
        let stored = StoredPost {
            seq: state.next_seq,
            id,
            creator: post.creator,
            text: post.text,
            parent_id: post.parent_id,
            media_url: post
                .media
                .as_ref()
                .map(|_| format!("{}/{}", self.media_base_url, id)),
            media_type: post.media.as_ref().map(|m| m.media_type.clone()),
            media_data: post.media.map(|m| m.bytes),
            deleted: false,
            likers: BTreeSet::new(),
            created_at: Utc::now(),
        };

        let record = state.record(&stored);
        state.posts.insert(id, stored);
        Ok(record)
    }

    async fn delete(&self, id: PostId, user_id: &str) -> PostResult<()> {
        self.track("delete");
        let mut state = self.write()?;
        let post = state.get_mut(id)?;

        if post.creator != user_id {
            return Err(PostError::Forbidden);
        }

        post.deleted = true;
        Ok(())
    }

    async fn media(&self, id: PostId) -> PostResult<Option<StoredMedia>> {
        self.track("media");
        let state = self.read()?;
        Ok(state
            .posts
            .get(&id)
            .filter(|p| !p.deleted)
            .and_then(|p| match (&p.media_data, &p.media_type) {
                (Some(data), Some(media_type)) => Some(StoredMedia {
                    media_data: data.clone(),
                    media_type: media_type.clone(),
                }),
                _ => None,
            }))
    }
}
