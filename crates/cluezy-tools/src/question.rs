//! Clarifying questions resolved by the user

use async_trait::async_trait;
use cluezy_core::traits::tools::{ToolError, ToolPolicy, ToolResult};
use cluezy_core::types::ToolOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::schema::parameters_schema;
use crate::tool::Tool;

pub const NAME: &str = "ask_question";

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct QuestionOption {
    /// Option value
    pub value: String,
    /// Option label
    pub label: String,
}

/// Arguments the model supplies when it needs clarification
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionParams {
    /// The main question to ask the user
    #[validate(length(min = 1))]
    pub question: String,
    /// Possible answers the user can pick from
    pub options: Vec<QuestionOption>,
    /// Whether free-form input is accepted as well
    pub allows_input: bool,
    /// Label of the free-form input
    #[serde(default)]
    pub input_label: Option<String>,
    /// Placeholder of the free-form input
    #[serde(default)]
    pub input_placeholder: Option<String>,
}

/// Interactive tool; the agent never executes it
pub struct AskQuestionTool;

#[async_trait]
impl Tool for AskQuestionTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Ask a clarifying question with multiple options when the user query is ambiguous"
    }

    fn policy(&self) -> ToolPolicy {
        ToolPolicy::Interactive
    }

    fn parameters(&self, strict: bool) -> Value {
        parameters_schema::<QuestionParams>(strict)
    }

    async fn execute(&self, _args: Value) -> ToolResult<ToolOutput> {
        Err(ToolError::Internal(format!("{NAME} is answered by the user")))
    }
}
