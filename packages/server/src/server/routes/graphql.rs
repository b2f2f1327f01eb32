use crate::server::graphql::{GraphQLContext, Schema};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use juniper::http::{graphiql::graphiql_source, GraphQLRequest};
use std::sync::Arc;
use tracing::debug;

/// GraphQL POST endpoint
///
/// Field errors come back with 200 and an `errors` array; only requests that
/// fail to parse or validate get 400.
pub async fn graphql_handler(
    State(schema): State<Arc<Schema>>,
    Extension(context): Extension<GraphQLContext>,
    Json(request): Json<GraphQLRequest>,
) -> Response {
    debug!(
        operation = request.operation_name().unwrap_or("anonymous"),
        viewer = context.viewer().unwrap_or("-"),
        "Executing GraphQL request"
    );

    let response = request.execute(&schema, &context).await;
    let status = if response.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    (status, Json(response)).into_response()
}

/// GraphiQL page pointed at `/graphql`
pub async fn graphql_playground() -> Html<String> {
    Html(graphiql_source("/graphql", None))
}
