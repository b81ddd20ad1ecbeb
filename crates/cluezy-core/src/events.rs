//! Events emitted while a turn streams
//!
//! The same enum is the wire format of the streaming chat endpoint: each
//! event becomes one SSE message named after its `type`.

use serde::{Deserialize, Serialize};

use crate::types::{ToolInvocation, ToolOutput};

/// Why a turn ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The model answered without requesting more tools
    Stop,
    /// The step budget ran out
    StepLimit,
    /// A clarifying question waits for the user
    AwaitingInput,
}

/// One streamed turn event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum TurnEvent {
    TextDelta { text: String },
    /// The model requested a tool; the invocation is in `call` state
    ToolCall { invocation: ToolInvocation },
    /// Output for an earlier `ToolCall`, correlated by id
    ToolResult { tool_call_id: String, result: ToolOutput },
    StepFinish { step: usize },
    RelatedQuestions { items: Vec<String> },
    Error { message: String },
    Finish { reason: FinishReason },
}

impl TurnEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            TurnEvent::TextDelta { .. } => "text_delta",
            TurnEvent::ToolCall { .. } => "tool_call",
            TurnEvent::ToolResult { .. } => "tool_result",
            TurnEvent::StepFinish { .. } => "step_finish",
            TurnEvent::RelatedQuestions { .. } => "related_questions",
            TurnEvent::Error { .. } => "error",
            TurnEvent::Finish { .. } => "finish",
        }
    }
}
