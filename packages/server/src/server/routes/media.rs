use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::common::PostId;
use crate::server::app::AxumAppState;

/// Serve the media attached to a post
///
/// Responds 404 for unknown ids, posts without media and deleted posts.
pub async fn media_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> Response {
    let Ok(post_id) = PostId::parse(&id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match state.server_deps.posts().media(post_id).await {
        Ok(Some(media)) => (
            [(header::CONTENT_TYPE, media.media_type)],
            media.media_data,
        )
            .into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            error!(post_id = %post_id, error = %e, "Failed to load media");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
