//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod post_store;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use post_store::PgPostStore;
pub use test_dependencies::InMemoryPostStore;
pub use traits::*;
