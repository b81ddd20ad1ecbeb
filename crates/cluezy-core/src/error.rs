//! Error taxonomy shared by every layer above the collaborators

use crate::rate_limit::is_rate_limit_message;
use crate::traits::llm::LlmError;
use crate::traits::store::StoreError;
use crate::traits::tools::ToolError;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Core errors
///
/// Validation and not-found errors are handled at the boundary closest to
/// where they are detected and never reach the model invocation layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Malformed or missing input; the operation was not attempted
    #[error("{0}")]
    Validation(String),

    /// The chat or message does not exist, or is not owned by the requester
    #[error("{0}")]
    NotFound(String),

    /// A chat mutation was attempted while history saving is off
    #[error("{0}")]
    FeatureDisabled(String),

    /// An external collaborator failed or timed out
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The model provider reported that a usage limit was reached
    #[error("Rate limit reached: {0}")]
    RateLimited(String),
}

impl CoreError {
    /// Wrap an upstream failure message, promoting rate-limit phrasing
    pub fn upstream(message: impl Into<String>) -> Self {
        let message = message.into();
        if is_rate_limit_message(&message) {
            CoreError::RateLimited(message)
        } else {
            CoreError::Upstream(message)
        }
    }

    /// Whether the error should be shown as the "daily limit reached" prompt
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, CoreError::RateLimited(_))
    }
}

impl From<LlmError> for CoreError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::RateLimited(message) => CoreError::RateLimited(message),
            other => CoreError::upstream(other.to_string()),
        }
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => CoreError::NotFound("Chat not found".to_string()),
            StoreError::Backend(message) => CoreError::Upstream(message),
        }
    }
}

impl From<ToolError> for CoreError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::InvalidParameters(message) => CoreError::Validation(message),
            other => CoreError::upstream(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_detects_rate_limit_phrase() {
        let err = CoreError::upstream("You reached the limit of 10 requests, please wait until tomorrow");
        assert!(err.is_rate_limit());
        assert!(!CoreError::upstream("connection reset").is_rate_limit());
    }

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let err: CoreError = StoreError::NotFound("abc".to_string()).into();
        assert_eq!(err, CoreError::NotFound("Chat not found".to_string()));
    }
}
