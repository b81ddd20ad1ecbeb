//! Agent Configuration Builder
//!
//! Composes the descriptor for one agent turn. Building is pure: it reads the
//! injected clock and the tool catalog but never contacts the model provider.

use std::sync::Arc;

use tracing::{debug, error};

use super::prompts::researcher_system_prompt;
use crate::clock::Clock;
use crate::error::{CoreError, CoreResult};
use crate::traits::tools::{ToolDefinition, ToolExecutor};
use crate::types::Message;

/// Step budget with search mode on
pub const SEARCH_MAX_STEPS: usize = 5;

/// Step budget with search mode off: one direct answer
pub const DIRECT_MAX_STEPS: usize = 1;

/// Everything the streaming model call needs
#[derive(Debug, Clone, PartialEq)]
pub struct AgentDescriptor {
    pub model: String,
    pub system_prompt: String,
    /// Active tools; empty when search mode is off
    pub tools: Vec<ToolDefinition>,
    /// Maximum sequential tool-call rounds
    pub max_steps: usize,
    pub messages: Vec<Message>,
}

impl AgentDescriptor {
    pub fn active_tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }
}

/// Builds [`AgentDescriptor`]s
#[derive(Clone)]
pub struct AgentBuilder {
    tools: Arc<dyn ToolExecutor>,
    clock: Arc<dyn Clock>,
}

impl AgentBuilder {
    pub fn new(tools: Arc<dyn ToolExecutor>, clock: Arc<dyn Clock>) -> Self {
        Self { tools, clock }
    }

    /// Compose a descriptor
    ///
    /// With search mode on, every tool is active with a budget of
    /// [`SEARCH_MAX_STEPS`]. Off, no tool is active and the budget is
    /// [`DIRECT_MAX_STEPS`] whatever the model. Tool construction errors are
    /// returned, never papered over with a smaller tool set.
    pub fn build(
        &self,
        messages: &[Message],
        model: &str,
        search_mode: bool,
    ) -> CoreResult<AgentDescriptor> {
        let system_prompt = researcher_system_prompt(self.clock.now());

        let (tools, max_steps) = if search_mode {
            let tools = self.tools.list_tools(model).map_err(|e| {
                error!(model, error = %e, "Failed to construct tools");
                CoreError::from(e)
            })?;
            (tools, SEARCH_MAX_STEPS)
        } else {
            (Vec::new(), DIRECT_MAX_STEPS)
        };

        debug!(model, search_mode, tools = tools.len(), max_steps, "Built agent descriptor");

        Ok(AgentDescriptor {
            model: model.to_string(),
            system_prompt,
            tools,
            max_steps,
            messages: messages.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::traits::tools::{ToolError, ToolPolicy, ToolResult};
    use crate::types::{ModelId, ToolOutput};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    struct TwoTools;

    #[async_trait]
    impl ToolExecutor for TwoTools {
        fn list_tools(&self, model: &str) -> ToolResult<Vec<ToolDefinition>> {
            ModelId::parse(model).map_err(|e| ToolError::InvalidParameters(e.to_string()))?;
            Ok(vec![
                ToolDefinition::new("search", "web", json!({}), ToolPolicy::Contained),
                ToolDefinition::new("ask_question", "ask", json!({}), ToolPolicy::Interactive),
            ])
        }

        async fn execute_tool(&self, name: &str, _args: serde_json::Value) -> ToolResult<ToolOutput> {
            Err(ToolError::NotFound(name.to_string()))
        }
    }

    fn builder() -> AgentBuilder {
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        AgentBuilder::new(Arc::new(TwoTools), Arc::new(FixedClock(at)))
    }

    #[test]
    fn test_search_mode_activates_all_tools() {
        let d = builder()
            .build(&[Message::user("hi")], "openai:gpt-4o", true)
            .unwrap();
        assert_eq!(d.active_tool_names(), ["search", "ask_question"]);
        assert_eq!(d.max_steps, SEARCH_MAX_STEPS);
        assert_eq!(d.messages.len(), 1);
    }

    #[test]
    fn test_direct_mode_has_no_tools_for_any_model() {
        for model in ["openai:gpt-4o", "openai:o3-mini", "not-a-model"] {
            let d = builder().build(&[], model, false).unwrap();
            assert!(d.tools.is_empty());
            assert_eq!(d.max_steps, DIRECT_MAX_STEPS);
        }
    }

    #[test]
    fn test_prompt_uses_injected_clock() {
        let d = builder().build(&[], "openai:gpt-4o", false).unwrap();
        assert!(d.system_prompt.starts_with("Current date and time: 2025-01-02 03:04:05 UTC"));
    }

    #[test]
    fn test_tool_construction_failure_propagates() {
        let err = builder().build(&[], "gpt-4o", true).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
