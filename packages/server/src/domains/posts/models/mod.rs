pub mod post;

pub use post::{MediaUpload, NewPost, PostRecord, PostThread, RecordPage, SearchParams, StoredMedia};
