//! GraphQL client for integration testing.
//!
//! Executes GraphQL queries directly against the schema without HTTP overhead.
//! Storage is an [`InMemoryPostStore`]; clones share the same posts, so
//! several clients acting as different viewers see one feed.

use juniper::Variables;
use posts_core::domains::auth::JwtService;
use posts_core::kernel::{InMemoryPostStore, ServerDeps};
use posts_core::server::graphql::{create_schema, GraphQLContext, Schema};
use posts_core::server::middleware::AuthUser;
use serde_json::Value;
use std::sync::Arc;

/// GraphQL client for executing queries and mutations in tests.
pub struct GraphQLClient {
    schema: Schema,
    context: GraphQLContext,
}

/// A single GraphQL error with its extension code.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    pub message: String,
    pub code: Option<String>,
    pub status: Option<i64>,
}

/// Result of a GraphQL execution.
#[derive(Debug)]
pub struct GraphQLResult {
    pub data: Option<Value>,
    pub errors: Vec<GraphQLError>,
}

impl GraphQLResult {
    /// Returns true if the execution had no errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Unwraps the data, panicking if there were errors.
    pub fn unwrap(self) -> Value {
        if !self.errors.is_empty() {
            panic!("GraphQL errors: {:?}", self.errors);
        }
        self.data.expect("No data returned")
    }

    /// Extension code of the first error, if any.
    pub fn error_code(&self) -> Option<&str> {
        self.errors.first().and_then(|e| e.code.as_deref())
    }

    /// Gets a value at the given JSON path.
    ///
    /// # Example
    /// ```ignore
    /// let count = result.get("posts.count").as_i64();
    /// ```
    pub fn get(&self, path: &str) -> Value {
        let data = self.data.as_ref().expect("No data returned");
        let mut current = data;
        for key in path.split('.') {
            current = &current[key];
        }
        current.clone()
    }
}

impl GraphQLClient {
    /// Creates an anonymous client over the given store.
    pub fn new(store: &InMemoryPostStore) -> Self {
        Self::with_context(GraphQLContext::new(test_server_deps(store), None))
    }

    /// Creates a client acting as the given viewer.
    pub fn with_auth_user(store: &InMemoryPostStore, user_id: &str) -> Self {
        let auth_user = AuthUser {
            user_id: user_id.to_string(),
        };
        Self::with_context(GraphQLContext::new(test_server_deps(store), Some(auth_user)))
    }

    /// Creates a new GraphQL client with a custom context.
    pub fn with_context(context: GraphQLContext) -> Self {
        Self {
            schema: create_schema(),
            context,
        }
    }

    /// Execute a GraphQL query/mutation.
    pub async fn execute(&self, query: &str) -> GraphQLResult {
        self.execute_with_vars(query, Variables::new()).await
    }

    /// Execute a GraphQL query/mutation with variables.
    pub async fn execute_with_vars(&self, query: &str, variables: Variables) -> GraphQLResult {
        let (result, errors) =
            juniper::execute(query, None, &self.schema, &variables, &self.context)
                .await
                .expect("GraphQL execution failed");

        // Convert juniper::Value to serde_json::Value
        let data = Some(serde_json::to_value(&result).expect("Failed to serialize GraphQL result"));

        let errors = errors
            .iter()
            .map(|e| {
                let json = serde_json::to_value(e).expect("Failed to serialize GraphQL error");
                GraphQLError {
                    message: e.error().message().to_string(),
                    code: json["extensions"]["code"].as_str().map(String::from),
                    status: json["extensions"]["status"].as_i64(),
                }
            })
            .collect();

        GraphQLResult { data, errors }
    }

    /// Execute a query and expect success, returning the data.
    pub async fn query(&self, query: &str) -> Value {
        self.execute(query).await.unwrap()
    }

    /// Execute a query with variables and expect success.
    pub async fn query_with_vars(&self, query: &str, variables: Variables) -> Value {
        self.execute_with_vars(query, variables).await.unwrap()
    }
}

fn test_server_deps(store: &InMemoryPostStore) -> Arc<ServerDeps> {
    let jwt_service = Arc::new(JwtService::new("test_secret_key", "test_issuer".to_string()));
    Arc::new(ServerDeps::new(Arc::new(store.clone()), jwt_service))
}
