//! Projection of stored records into the per-viewer response shapes.

use super::types::{DeletedPostData, PostData, PostView, ReplyData};
use crate::domains::posts::models::PostRecord;

fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Map a stored record to the view seen by `viewer`.
///
/// Deletion wins over everything else, so a deleted reply is a
/// `Deleted` view, never a `Reply`. Anonymous viewers never see
/// `liked_by_user = true`.
pub fn project(record: PostRecord, viewer: Option<&str>) -> PostView {
    let liked_by_user = viewer.is_some_and(|v| record.likers.iter().any(|l| l == v));
    let like_count = count(record.likers.len());

    match (record.deleted, record.parent_id) {
        (true, _) => PostView::Deleted(DeletedPostData {
            id: record.id.into(),
            creator: record.creator,
        }),
        (false, Some(parent_id)) => PostView::Reply(ReplyData {
            id: record.id.into(),
            creator: record.creator,
            text: record.text,
            media_url: record.media_url,
            media_type: record.media_type,
            like_count,
            liked_by_user,
            parent_id: parent_id.into(),
        }),
        (false, None) => PostView::Post(PostData {
            id: record.id.into(),
            creator: record.creator,
            text: record.text,
            media_url: record.media_url,
            media_type: record.media_type,
            like_count,
            liked_by_user,
            reply_count: i32::try_from(record.reply_count).unwrap_or(i32::MAX),
        }),
    }
}

/// Project a batch of records for the same viewer, keeping their order
pub fn project_all(records: Vec<PostRecord>, viewer: Option<&str>) -> Vec<PostView> {
    records.into_iter().map(|r| project(r, viewer)).collect()
}
