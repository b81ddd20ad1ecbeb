//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cluezy_core::CoreError;
use serde_json::json;

pub type Result<T> = std::result::Result<T, WebError>;

/// Message returned for failures whose details stay in the logs
pub const INTERNAL_ERROR: &str = "Internal Server Error";

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A route-specific status and message
    #[error("{1}")]
    Status(StatusCode, String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WebError {
    pub fn status(code: StatusCode, message: impl Into<String>) -> Self {
        WebError::Status(code, message.into())
    }

    fn parts(&self) -> (StatusCode, String) {
        match self {
            WebError::Core(CoreError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            WebError::Core(CoreError::NotFound(msg)) => (StatusCode::NOT_FOUND, msg.clone()),
            WebError::Core(CoreError::FeatureDisabled(msg)) => (StatusCode::FORBIDDEN, msg.clone()),
            WebError::Core(CoreError::RateLimited(msg)) => {
                (StatusCode::TOO_MANY_REQUESTS, msg.clone())
            }
            WebError::Status(code, msg) => (*code, msg.clone()),
            WebError::Core(CoreError::Upstream(_)) | WebError::Config(_) | WebError::Io(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
            }
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CoreError::Validation("v".into()), StatusCode::BAD_REQUEST),
            (CoreError::NotFound("n".into()), StatusCode::NOT_FOUND),
            (CoreError::FeatureDisabled("f".into()), StatusCode::FORBIDDEN),
            (CoreError::RateLimited("r".into()), StatusCode::TOO_MANY_REQUESTS),
            (CoreError::Upstream("u".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(WebError::from(err).parts().0, status);
        }
    }

    #[test]
    fn test_upstream_details_are_hidden() {
        let (_, message) = WebError::from(CoreError::Upstream("db password wrong".into())).parts();
        assert_eq!(message, INTERNAL_ERROR);
    }
}
