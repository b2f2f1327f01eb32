use std::sync::Arc;

use crate::kernel::ServerDeps;
use crate::server::middleware::AuthUser;

/// GraphQL request context
///
/// Contains shared resources available to all resolvers plus the
/// per-request viewer.
#[derive(Clone)]
pub struct GraphQLContext {
    pub server_deps: Arc<ServerDeps>,
    pub auth_user: Option<AuthUser>,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(server_deps: Arc<ServerDeps>, auth_user: Option<AuthUser>) -> Self {
        Self {
            server_deps,
            auth_user,
        }
    }

    pub fn deps(&self) -> &ServerDeps {
        &self.server_deps
    }

    /// The viewer identity, if the request carried a valid token
    pub fn viewer(&self) -> Option<&str> {
        self.auth_user.as_ref().map(|u| u.user_id.as_str())
    }
}
