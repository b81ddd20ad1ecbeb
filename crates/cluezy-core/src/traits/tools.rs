//! Tool execution abstraction
//!
//! A [`ToolExecutor`] owns the fixed tool catalog. Definitions depend on the
//! target model because some models only accept strict parameter schemas.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::ToolOutput;

/// Result type for tool operations
pub type ToolResult<T> = Result<T, ToolError>;

/// Tool execution errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// How a tool reports an upstream failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolPolicy {
    /// Failure becomes a `{ result: { error } }` payload the model can read
    Contained,
    /// Failure aborts the turn
    Rethrow,
    /// Never executed by the agent; the user resolves it
    Interactive,
}

/// Tool metadata handed to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name the model calls the tool by
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// Parameter schema (JSON Schema)
    pub parameters: serde_json::Value,

    /// Failure policy
    pub policy: ToolPolicy,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
        policy: ToolPolicy,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            policy,
        }
    }
}

/// Tool catalog and executor
///
/// Implementations must be `Send + Sync`; tools are stateless and a single
/// agent step may execute several concurrently.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Definitions of every tool, with schemas for `model`
    ///
    /// Fails when `model` is not a valid `provider:model` identifier.
    fn list_tools(&self, model: &str) -> ToolResult<Vec<ToolDefinition>>;

    /// Execute a tool
    ///
    /// Contained failures come back as `Ok(ToolOutput::Error { .. })`. An
    /// `Err` from a [`ToolPolicy::Rethrow`] tool aborts the turn; the agent
    /// contains any other `Err` as an error payload.
    async fn execute_tool(&self, name: &str, args: serde_json::Value) -> ToolResult<ToolOutput>;
}
