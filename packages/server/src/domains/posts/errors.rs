use juniper::{graphql_value, FieldError, IntoFieldError, ScalarValue};
use thiserror::Error;

use crate::common::GuardError;

pub type PostResult<T> = Result<T, PostError>;

/// Errors surfaced by post queries and mutations
#[derive(Error, Debug)]
pub enum PostError {
    /// Missing viewer on a write, or a write the viewer may not perform
    #[error("Forbidden")]
    Forbidden,

    /// Bad client input (missing id, media without mediaType, ...)
    #[error("{0}")]
    Validation(String),

    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl PostError {
    pub fn validation(message: impl Into<String>) -> Self {
        PostError::Validation(message.into())
    }

    /// Machine-readable code placed in the GraphQL error extensions
    pub fn code(&self) -> &'static str {
        match self {
            PostError::Forbidden => "FORBIDDEN",
            PostError::Validation(_) => "BAD_USER_INPUT",
            PostError::NotFound(_) => "NOT_FOUND",
            PostError::Database(_) | PostError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// HTTP-equivalent status for the error
    pub fn status(&self) -> i32 {
        match self {
            PostError::Forbidden => 403,
            PostError::Validation(_) => 400,
            PostError::NotFound(_) => 404,
            PostError::Database(_) | PostError::Internal(_) => 500,
        }
    }
}

impl From<GuardError> for PostError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::Forbidden => PostError::Forbidden,
            GuardError::Validation(message) => PostError::Validation(message),
        }
    }
}

impl<S: ScalarValue> IntoFieldError<S> for PostError {
    fn into_field_error(self) -> FieldError<S> {
        if self.status() >= 500 {
            tracing::error!(error = %self, "Post operation failed");
        }

        let code = self.code();
        let status = self.status();
        FieldError::new(self.to_string(), graphql_value!({ "code": code, "status": status }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_errors_keep_their_category() {
        let forbidden: PostError = GuardError::Forbidden.into();
        assert!(matches!(forbidden, PostError::Forbidden));
        assert_eq!(forbidden.status(), 403);

        let invalid: PostError = GuardError::required("id").into();
        assert_eq!(invalid.to_string(), "id is required");
        assert_eq!(invalid.code(), "BAD_USER_INPUT");
    }

    #[test]
    fn test_field_error_carries_code() {
        let err: FieldError = PostError::NotFound("p1".to_string()).into_field_error();
        assert_eq!(err.message(), "Post not found: p1");
        assert_eq!(
            err.extensions(),
            &graphql_value!({ "code": "NOT_FOUND", "status": 404 })
        );
    }
}
