//! Model provider abstraction
//!
//! A provider turns an [`LlmRequest`] into a stream of [`LlmEvent`]s (one
//! agent step) or a single completion.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::tools::ToolDefinition;

/// Result type for provider operations
pub type LlmResult<T> = Result<T, LlmError>;

/// Provider errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),
}

/// A tool call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// Provider-level message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum LlmMessage {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    Tool {
        tool_call_id: String,
        content: String,
    },
}

/// One model call
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    /// `provider:model`
    pub model: String,
    pub system: String,
    pub messages: Vec<LlmMessage>,
    /// Tools the model may call; empty disables tool calling
    pub tools: Vec<ToolDefinition>,
    /// Ask for a JSON object response
    pub json_output: bool,
}

impl LlmRequest {
    pub fn new(model: impl Into<String>, system: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            messages: Vec::new(),
            tools: Vec::new(),
            json_output: false,
        }
    }

    pub fn with_messages(mut self, messages: Vec<LlmMessage>) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(LlmMessage::User {
            content: content.into(),
        });
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn json(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// Streamed event of one model call
#[derive(Debug, Clone, PartialEq)]
pub enum LlmEvent {
    TextDelta(String),
    /// A complete tool call (arguments fully accumulated)
    ToolCall(ToolCall),
    Finish { reason: String },
}

/// Model provider
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Stream one model call
    fn stream(&self, request: LlmRequest) -> BoxStream<'static, LlmResult<LlmEvent>>;

    /// Single non-streaming completion, returning the text
    async fn generate(&self, request: LlmRequest) -> LlmResult<String>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;
}
