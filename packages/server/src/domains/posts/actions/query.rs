//! Feed queries: list, search and thread lookups.
//!
//! All of these accept an anonymous viewer.

use tracing::debug;

use super::{parse_optional_post_id, parse_post_id};
use crate::common::{window, GuardError, ValidatedOffsetArgs};
use crate::domains::posts::data::{project, project_all, ListResult, PostView, SingleResult};
use crate::domains::posts::errors::PostResult;
use crate::domains::posts::models::{RecordPage, SearchParams};
use crate::kernel::ServerDeps;

/// Raw search filters as received from the API
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    pub text: Option<String>,
    pub creator: Option<String>,
    pub parent_id: Option<String>,
}

fn to_list_result(page: RecordPage, args: ValidatedOffsetArgs, viewer: Option<&str>) -> ListResult {
    let w = window(args.offset, args.limit, page.count);

    ListResult {
        count: i32::try_from(page.count).unwrap_or(i32::MAX),
        data: project_all(page.posts, viewer),
        next_page_offset: w.next_offset,
        previous_page_offset: w.previous_offset,
    }
}

/// Page through top-level posts, newest first. Deleted posts are included
/// (as deleted views) so the feed does not shift under the reader.
pub async fn list_posts(
    args: ValidatedOffsetArgs,
    newer_than: Option<&str>,
    viewer: Option<&str>,
    deps: &ServerDeps,
) -> PostResult<ListResult> {
    let newer_than = parse_optional_post_id("newerThan", newer_than)?;
    debug!(offset = args.offset, limit = args.limit, newer_than = ?newer_than, "Listing posts");

    let page = deps.posts().list(args, newer_than).await?;
    Ok(to_list_result(page, args, viewer))
}

/// Search posts and replies
pub async fn search_posts(
    input: SearchInput,
    args: ValidatedOffsetArgs,
    viewer: Option<&str>,
    deps: &ServerDeps,
) -> PostResult<ListResult> {
    let params = SearchParams {
        text: input.text.filter(|t| !t.is_empty()),
        creator: input.creator.filter(|c| !c.is_empty()),
        parent_id: parse_optional_post_id("parentId", input.parent_id.as_deref())?,
    };
    debug!(params = ?params, offset = args.offset, limit = args.limit, "Searching posts");

    let page = deps.posts().search(&params, args).await?;
    Ok(to_list_result(page, args, viewer))
}

/// Fetch a post and its direct replies
pub async fn get_post_with_replies(
    id: &str,
    viewer: Option<&str>,
    deps: &ServerDeps,
) -> PostResult<SingleResult> {
    if id.is_empty() {
        return Err(GuardError::required("id").into());
    }
    let post_id = parse_post_id("id", id)?;

    let thread = deps.posts().get_post_with_replies(post_id).await?;

    Ok(SingleResult {
        post: project(thread.post, viewer),
        replies: project_all(thread.replies, viewer),
    })
}

/// Fetch only the replies of a post
pub async fn get_replies(
    id: &str,
    viewer: Option<&str>,
    deps: &ServerDeps,
) -> PostResult<Vec<PostView>> {
    Ok(get_post_with_replies(id, viewer, deps).await?.replies)
}
