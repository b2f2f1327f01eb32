pub mod types;
pub mod view;

pub use types::{DeletedPostData, ListResult, PostData, PostView, ReplyData, SingleResult};
pub use view::{project, project_all};
