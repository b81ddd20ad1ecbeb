//! The fixed tool catalog

use std::sync::Arc;

use async_trait::async_trait;
use cluezy_config::ToolsConfig;
use cluezy_core::traits::tools::{
    ToolDefinition, ToolError, ToolExecutor, ToolPolicy, ToolResult,
};
use cluezy_core::types::{ModelId, ToolOutput};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::academic::AcademicSearchTool;
use crate::datetime::DateTimeTool;
use crate::file_search::{FileSearchTool, FileType};
use crate::http::ApiClient;
use crate::product::ProductSearchTool;
use crate::question::AskQuestionTool;
use crate::retrieve::RetrieveTool;
use crate::search::SearchTool;
use crate::tool::Tool;
use crate::video_search::VideoSearchTool;
use crate::weather::WeatherTool;
use crate::youtube::YoutubeAnalysisTool;

/// Registry of every tool the research agent can call
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Registry with the full catalog, in a stable order
    pub fn new(config: ToolsConfig) -> ToolResult<Self> {
        let client = Arc::new(ApiClient::new(config)?);
        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(SearchTool::new(client.clone())),
            Arc::new(AcademicSearchTool::new(client.clone())),
            Arc::new(RetrieveTool::new(client.clone())),
            Arc::new(VideoSearchTool::new(client.clone())),
            Arc::new(AskQuestionTool),
            Arc::new(WeatherTool::new(client.clone())),
            Arc::new(DateTimeTool::new(client.clone())),
            Arc::new(YoutubeAnalysisTool::new(client.clone())),
            Arc::new(ProductSearchTool::new(client.clone())),
            Arc::new(FileSearchTool::new(client.clone(), FileType::Pdf)),
            Arc::new(FileSearchTool::new(client.clone(), FileType::Doc)),
            Arc::new(FileSearchTool::new(client, FileType::Ppt)),
        ];
        info!(count = tools.len(), "Tool registry initialized");
        Ok(Self { tools })
    }

    /// Registry over an explicit tool list
    pub fn with_tools(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    fn find(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }
}

#[async_trait]
impl ToolExecutor for ToolRegistry {
    fn list_tools(&self, model: &str) -> ToolResult<Vec<ToolDefinition>> {
        let model =
            ModelId::parse(model).map_err(|e| ToolError::InvalidParameters(e.to_string()))?;
        let strict = model.requires_strict_schema();
        debug!(%model, strict, "Listing tools");
        Ok(self.tools.iter().map(|t| t.definition(strict)).collect())
    }

    async fn execute_tool(&self, name: &str, args: Value) -> ToolResult<ToolOutput> {
        let tool = self
            .find(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        info!(tool = name, "Executing tool");
        match tool.execute(args).await {
            Ok(output) => Ok(output),
            Err(ToolError::InvalidParameters(msg)) => Err(ToolError::InvalidParameters(msg)),
            Err(err) if tool.policy() == ToolPolicy::Contained => {
                warn!(tool = name, error = %err, "Tool failed, returning error payload");
                Ok(ToolOutput::error(name, error_message(&err)))
            }
            Err(err) => {
                warn!(tool = name, error = %err, "Tool failed");
                Err(err)
            }
        }
    }
}

/// Message without the error-kind prefix
fn error_message(err: &ToolError) -> String {
    match err {
        ToolError::NotFound(m)
        | ToolError::InvalidParameters(m)
        | ToolError::Upstream(m)
        | ToolError::Internal(m) => m.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Failing(ToolPolicy);

    #[async_trait]
    impl Tool for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn description(&self) -> &str {
            "always fails"
        }

        fn policy(&self) -> ToolPolicy {
            self.0
        }

        fn parameters(&self, _strict: bool) -> Value {
            json!({ "type": "object" })
        }

        async fn execute(&self, args: Value) -> ToolResult<ToolOutput> {
            if args.is_null() {
                return Err(ToolError::InvalidParameters("missing".into()));
            }
            Err(ToolError::Upstream("503 Service Unavailable".into()))
        }
    }

    fn registry(policy: ToolPolicy) -> ToolRegistry {
        ToolRegistry::with_tools(vec![Arc::new(Failing(policy))])
    }

    #[tokio::test]
    async fn test_contained_failure_becomes_payload() {
        let out = registry(ToolPolicy::Contained)
            .execute_tool("failing", json!({}))
            .await
            .unwrap();
        assert_eq!(out, ToolOutput::error("failing", "503 Service Unavailable"));
    }

    #[tokio::test]
    async fn test_rethrow_failure_propagates() {
        let err = registry(ToolPolicy::Rethrow)
            .execute_tool("failing", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_never_contained() {
        let err = registry(ToolPolicy::Contained)
            .execute_tool("failing", Value::Null)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameters(_)));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let err = registry(ToolPolicy::Contained)
            .execute_tool("nope", json!({}))
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::NotFound("nope".into()));
    }

    #[test]
    fn test_list_tools_rejects_bad_model() {
        assert!(registry(ToolPolicy::Contained).list_tools("gpt-4o").is_err());
    }
}
