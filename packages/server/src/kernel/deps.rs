//! Server dependencies for actions (using traits for testability)
//!
//! This module provides the central dependency container used by the post
//! actions. Storage sits behind a trait so tests can swap in the in-memory
//! store.

use std::sync::Arc;

use crate::domains::auth::JwtService;
use crate::kernel::BasePostStore;

/// Server dependencies accessible to actions
#[derive(Clone)]
pub struct ServerDeps {
    pub post_store: Arc<dyn BasePostStore>,
    /// JWT service the auth middleware verifies bearer tokens with
    pub jwt_service: Arc<JwtService>,
}

impl ServerDeps {
    pub fn new(post_store: Arc<dyn BasePostStore>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            post_store,
            jwt_service,
        }
    }

    pub fn posts(&self) -> &dyn BasePostStore {
        self.post_store.as_ref()
    }
}
