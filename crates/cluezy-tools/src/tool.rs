//! Single-tool abstraction used by the registry

use async_trait::async_trait;
use cluezy_core::traits::tools::{ToolDefinition, ToolPolicy, ToolResult};
use cluezy_core::types::ToolOutput;
use serde_json::Value;

/// One tool backed by one external API
///
/// `execute` validates its arguments before any network call and reports
/// every failure as an `Err`; the registry applies [`ToolPolicy`].
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn policy(&self) -> ToolPolicy {
        ToolPolicy::Contained
    }

    /// Parameter schema; `strict` for models that reject optional fields
    fn parameters(&self, strict: bool) -> Value;

    async fn execute(&self, args: Value) -> ToolResult<ToolOutput>;

    fn definition(&self, strict: bool) -> ToolDefinition {
        ToolDefinition::new(
            self.name(),
            self.description(),
            self.parameters(strict),
            self.policy(),
        )
    }
}
