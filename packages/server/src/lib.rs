// Posts Feed Server - API Core
//
// This crate provides the backend API for a small social feed: posts,
// replies, likes and soft deletion, exposed through GraphQL.
// Storage sits behind the BasePostStore trait (kernel/traits.rs).

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
