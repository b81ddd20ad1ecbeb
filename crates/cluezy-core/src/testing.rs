//! Test doubles for the collaborator traits
//!
//! Enabled for this crate's tests and, through the `test-utils` feature, for
//! dependants' tests.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde_json::{json, Value};

use crate::traits::llm::{LlmError, LlmEvent, LlmProvider, LlmRequest, LlmResult};
use crate::traits::tools::{ToolDefinition, ToolError, ToolExecutor, ToolPolicy, ToolResult};
use crate::types::output::SearchResults;
use crate::types::{ModelId, ToolOutput};

/// Provider that replays one scripted event list per model call
pub struct ScriptedLlm {
    steps: Mutex<VecDeque<Vec<LlmEvent>>>,
    generated: Mutex<LlmResult<String>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    pub fn new(steps: Vec<Vec<LlmEvent>>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            generated: Mutex::new(Ok(String::new())),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Text returned by [`LlmProvider::generate`]
    pub fn with_generated(self, text: impl Into<String>) -> Self {
        *lock(&self.generated) = Ok(text.into());
        self
    }

    /// Make [`LlmProvider::generate`] fail
    pub fn with_generate_error(self, err: LlmError) -> Self {
        *lock(&self.generated) = Err(err);
        self
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<LlmRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn stream(&self, request: LlmRequest) -> BoxStream<'static, LlmResult<LlmEvent>> {
        lock(&self.requests).push(request);
        let events = lock(&self.steps).pop_front().unwrap_or_default();
        futures::stream::iter(events.into_iter().map(Ok)).boxed()
    }

    async fn generate(&self, request: LlmRequest) -> LlmResult<String> {
        lock(&self.requests).push(request);
        lock(&self.generated).clone()
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

/// Small catalog with one tool per failure policy
#[derive(Default)]
pub struct StaticTools {
    failing: HashSet<String>,
}

impl StaticTools {
    /// Make `name` fail with an upstream error
    pub fn failing(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }
}

#[async_trait]
impl ToolExecutor for StaticTools {
    fn list_tools(&self, model: &str) -> ToolResult<Vec<ToolDefinition>> {
        ModelId::parse(model).map_err(|e| ToolError::InvalidParameters(e.to_string()))?;
        let schema = json!({ "type": "object" });
        Ok(vec![
            ToolDefinition::new("search", "Web search", schema.clone(), ToolPolicy::Contained),
            ToolDefinition::new("acadamicSearch", "Papers", schema.clone(), ToolPolicy::Rethrow),
            ToolDefinition::new("weather", "Weather", schema.clone(), ToolPolicy::Contained),
            ToolDefinition::new("ask_question", "Clarify", schema, ToolPolicy::Interactive),
        ])
    }

    async fn execute_tool(&self, name: &str, args: Value) -> ToolResult<ToolOutput> {
        if self.failing.contains(name) {
            return Err(ToolError::Upstream(format!("{name} is down")));
        }
        let query = args["query"].as_str().unwrap_or_default().to_string();
        Ok(ToolOutput::Search(SearchResults {
            query,
            ..Default::default()
        }))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
