use juniper::{GraphQLObject, GraphQLUnion, ID};

/// GraphQL type for a post that has been deleted
#[derive(Debug, Clone, PartialEq, GraphQLObject)]
#[graphql(
    name = "DeletedPost",
    description = "A deleted post or reply. Only the id and the creator are kept."
)]
pub struct DeletedPostData {
    pub id: ID,
    pub creator: String,
}

/// GraphQL type for a reply to another post
#[derive(Debug, Clone, PartialEq, GraphQLObject)]
#[graphql(name = "Reply", description = "A reply to another post")]
pub struct ReplyData {
    pub id: ID,
    pub creator: String,
    pub text: String,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub like_count: i32,
    /// Whether the requesting user liked this reply
    pub liked_by_user: bool,
    pub parent_id: ID,
}

/// GraphQL type for a top-level post
#[derive(Debug, Clone, PartialEq, GraphQLObject)]
#[graphql(name = "Post", description = "A top-level post")]
pub struct PostData {
    pub id: ID,
    pub creator: String,
    pub text: String,
    pub media_url: Option<String>,
    pub media_type: Option<String>,
    pub like_count: i32,
    /// Whether the requesting user liked this post
    pub liked_by_user: bool,
    pub reply_count: i32,
}

/// What a caller gets for one stored record
#[derive(Debug, Clone, PartialEq, GraphQLUnion)]
#[graphql(name = "PostResult")]
pub enum PostView {
    Deleted(DeletedPostData),
    Reply(ReplyData),
    Post(PostData),
}

impl PostView {
    pub fn id(&self) -> &ID {
        match self {
            PostView::Deleted(p) => &p.id,
            PostView::Reply(p) => &p.id,
            PostView::Post(p) => &p.id,
        }
    }
}

/// A page of posts with offsets of the neighbouring pages
#[derive(Debug, Clone, PartialEq, GraphQLObject)]
#[graphql(name = "ListResult")]
pub struct ListResult {
    /// Total number of matching records, across all pages
    pub count: i32,
    pub data: Vec<PostView>,
    pub next_page_offset: Option<i32>,
    pub previous_page_offset: Option<i32>,
}

/// A post and its replies
#[derive(Debug, Clone, PartialEq, GraphQLObject)]
#[graphql(name = "SingleResult")]
pub struct SingleResult {
    pub post: PostView,
    pub replies: Vec<PostView>,
}
