//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::{Extension, Request},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domains::auth::JwtService;
use crate::kernel::{PgPostStore, ServerDeps};
use crate::server::graphql::{create_schema, GraphQLContext};
use crate::server::middleware::{jwt_auth_middleware, AuthUser};
use crate::server::routes::{graphql_handler, graphql_playground, health_handler, media_handler};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub db_pool: PgPool,
    pub server_deps: Arc<ServerDeps>,
}

/// Middleware to create GraphQLContext per-request
async fn create_graphql_context(
    Extension(state): Extension<AxumAppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Populated by jwt_auth_middleware
    let auth_user = request.extensions().get::<AuthUser>().cloned();

    let context = GraphQLContext::new(state.server_deps.clone(), auth_user);
    request.extensions_mut().insert(context);

    next.run(request).await
}

/// CORS for the configured origins, or any origin when none are configured
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

/// Build the Axum application router backed by Postgres
pub fn build_app(
    pool: PgPool,
    jwt_secret: String,
    jwt_issuer: String,
    media_base_url: String,
    allowed_origins: Vec<String>,
) -> Router {
    let jwt_service = Arc::new(JwtService::new(&jwt_secret, jwt_issuer));
    let post_store = Arc::new(PgPostStore::new(pool.clone(), media_base_url));
    let server_deps = Arc::new(ServerDeps::new(post_store, jwt_service));

    let app_state = AxumAppState {
        db_pool: pool,
        server_deps,
    };

    build_router(app_state, &allowed_origins)
}

/// Routes and middleware over an already assembled state
pub fn build_router(app_state: AxumAppState, allowed_origins: &[String]) -> Router {
    // Create GraphQL schema (singleton)
    let schema = Arc::new(create_schema());
    let jwt_service = app_state.server_deps.jwt_service.clone();

    let mut router = Router::new().route("/graphql", post(graphql_handler));

    // GraphQL playground only in debug builds (development)
    #[cfg(debug_assertions)]
    {
        router = router.route("/graphql", get(graphql_playground));
    }

    router
        .route("/health", get(health_handler))
        .route("/media/:id", get(media_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(create_graphql_context))
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::posts::models::{MediaUpload, NewPost};
    use crate::kernel::{BasePostStore, InMemoryPostStore};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    fn test_router(store: &InMemoryPostStore, allowed_origins: &[String]) -> (Router, Arc<JwtService>) {
        let jwt_service = Arc::new(JwtService::new("test_secret_key", "test_issuer".to_string()));
        let server_deps = Arc::new(ServerDeps::new(Arc::new(store.clone()), jwt_service.clone()));
        // Never connects; only /health touches the pool
        let db_pool = PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost/unused")
            .unwrap();

        let state = AxumAppState {
            db_pool,
            server_deps,
        };
        (build_router(state, allowed_origins), jwt_service)
    }

    fn graphql_request(query: &str, token: Option<&str>, origin: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/graphql")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(origin) = origin {
            builder = builder.header(header::ORIGIN, origin);
        }
        builder
            .body(Body::from(json!({ "query": query }).to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_graphql_uses_bearer_token_as_viewer() {
        let store = InMemoryPostStore::new();
        let (app, jwt_service) = test_router(&store, &[]);
        let token = jwt_service.create_token("user-1").unwrap();

        let response = app
            .clone()
            .oneshot(graphql_request(
                r#"mutation { create(text: "hi") { ... on Post { creator likedByUser } } }"#,
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["create"]["creator"], "user-1");

        // Without a token the same mutation is rejected
        let response = app
            .oneshot(graphql_request(
                r#"mutation { create(text: "hi") { __typename } }"#,
                None,
                None,
            ))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["errors"][0]["extensions"]["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_cors_allows_only_configured_origins() {
        let store = InMemoryPostStore::new();
        let (app, _) = test_router(&store, &["http://localhost:3000".to_string()]);
        let query = "{ posts { count } }";

        let allowed = app
            .clone()
            .oneshot(graphql_request(query, None, Some("http://localhost:3000")))
            .await
            .unwrap();
        assert_eq!(
            allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );

        let other = app
            .oneshot(graphql_request(query, None, Some("https://elsewhere.example")))
            .await
            .unwrap();
        assert!(other.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin_when_unconfigured() {
        let store = InMemoryPostStore::new();
        let (app, _) = test_router(&store, &["bad\norigin".to_string()]);

        let response = app
            .oneshot(graphql_request("{ posts { count } }", None, Some("https://elsewhere.example")))
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_media_route_serves_stored_bytes() {
        let store = InMemoryPostStore::new();
        let post = store
            .create(NewPost {
                creator: "user-1".to_string(),
                text: "pic".to_string(),
                parent_id: None,
                media: Some(MediaUpload {
                    bytes: b"hello".to_vec(),
                    media_type: "text/plain".to_string(),
                }),
            })
            .await
            .unwrap();
        let (app, _) = test_router(&store, &[]);

        let get = |uri: String| Request::builder().uri(uri).body(Body::empty()).unwrap();

        let response = app
            .clone()
            .oneshot(get(format!("/media/{}", post.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "text/plain");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"hello");

        let missing = app
            .clone()
            .oneshot(get(format!("/media/{}", crate::common::PostId::new())))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let malformed = app.oneshot(get("/media/p1".to_string())).await.unwrap();
        assert_eq!(malformed.status(), StatusCode::NOT_FOUND);
    }
}
