use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::output::ToolOutput;

/// Lifecycle of a tool invocation
///
/// `Call` is the only non-terminal state. Declined and skipped questions are
/// `Result`s carrying a [`super::QuestionOutcome`], not extra states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum InvocationState {
    Call,
    Result { result: ToolOutput },
}

/// Invalid state transition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvocationError {
    #[error("Tool call {0} already has a result")]
    AlreadyResolved(String),
}

/// One tool call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocation {
    pub tool_call_id: String,
    pub tool_name: String,
    #[serde(default)]
    pub args: Value,
    #[serde(flatten)]
    state: InvocationState,
}

impl ToolInvocation {
    /// New invocation in the `call` state
    pub fn call(tool_call_id: impl Into<String>, tool_name: impl Into<String>, args: Value) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            args,
            state: InvocationState::Call,
        }
    }

    pub fn state(&self) -> &InvocationState {
        &self.state
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, InvocationState::Result { .. })
    }

    pub fn result(&self) -> Option<&ToolOutput> {
        match &self.state {
            InvocationState::Result { result } => Some(result),
            InvocationState::Call => None,
        }
    }

    /// Attach the output; the only transition, and it happens once
    pub fn resolve(&mut self, output: ToolOutput) -> Result<(), InvocationError> {
        if self.is_resolved() {
            return Err(InvocationError::AlreadyResolved(self.tool_call_id.clone()));
        }
        self.state = InvocationState::Result { result: output };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::output::{QuestionAnswer, QuestionOutcome};
    use serde_json::json;

    fn skipped() -> ToolOutput {
        ToolOutput::AskQuestion(QuestionAnswer {
            outcome: QuestionOutcome::Skipped,
        })
    }

    #[test]
    fn test_resolves_exactly_once() {
        let mut inv = ToolInvocation::call("c1", "ask_question", json!({}));
        assert!(!inv.is_resolved());
        inv.resolve(skipped()).unwrap();
        assert!(inv.is_resolved());

        let err = inv.resolve(ToolOutput::error("ask_question", "late")).unwrap_err();
        assert_eq!(err, InvocationError::AlreadyResolved("c1".to_string()));
        assert_eq!(inv.result(), Some(&skipped()));
    }

    #[test]
    fn test_wire_shape() {
        let inv = ToolInvocation::call("c1", "search", json!({ "query": "rust" }));
        let wire = serde_json::to_value(&inv).unwrap();
        assert_eq!(wire["state"], "call");
        assert_eq!(wire["toolCallId"], "c1");
        assert!(wire.get("result").is_none());

        let back: ToolInvocation = serde_json::from_value(wire).unwrap();
        assert_eq!(back, inv);
    }
}
