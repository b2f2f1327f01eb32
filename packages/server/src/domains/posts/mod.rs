pub mod actions;
pub mod data;
pub mod errors;
pub mod models;

// Re-export data types (GraphQL types)
pub use data::{DeletedPostData, ListResult, PostData, PostView, ReplyData, SingleResult};

// Re-export errors
pub use errors::{PostError, PostResult};

// Re-export models (domain models)
pub use models::{NewPost, PostRecord, SearchParams};
