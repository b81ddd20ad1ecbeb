//! Folding streamed [`TurnEvent`]s into the message list

use tracing::warn;

use crate::error::{CoreError, CoreResult};
use crate::events::{FinishReason, TurnEvent};
use crate::types::{Message, Part};

/// Progress of one streaming turn
///
/// The assistant message is created on the first event that needs it and
/// appended to the list right away, so whatever arrived before a stop or a
/// failure stays in place.
#[derive(Debug, Default)]
pub struct TurnState {
    assistant_index: Option<usize>,
    related: Vec<String>,
    finish: Option<FinishReason>,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event; an `Error` event becomes an `Err`
    pub fn apply(&mut self, messages: &mut Vec<Message>, event: TurnEvent) -> CoreResult<()> {
        match event {
            TurnEvent::TextDelta { text } => {
                self.assistant(messages).push_text(&text);
            }
            TurnEvent::ToolCall { invocation } => {
                self.assistant(messages).parts.push(Part::ToolInvocation {
                    tool_invocation: invocation,
                });
            }
            TurnEvent::ToolResult {
                tool_call_id,
                result,
            } => {
                // Newest first: a resolved question may live in an earlier turn
                let target = messages
                    .iter_mut()
                    .rev()
                    .filter(|m| m.is_assistant())
                    .find_map(|m| m.tool_invocation_mut(&tool_call_id));

                match target {
                    Some(invocation) => {
                        if let Err(err) = invocation.resolve(result) {
                            warn!(%tool_call_id, error = %err, "Ignoring duplicate tool result");
                        }
                    }
                    None => warn!(%tool_call_id, "Tool result for unknown call"),
                }
            }
            TurnEvent::RelatedQuestions { items } => self.related = items,
            TurnEvent::StepFinish { .. } => {}
            TurnEvent::Error { message } => return Err(CoreError::upstream(message)),
            TurnEvent::Finish { reason } => self.finish = Some(reason),
        }
        Ok(())
    }

    /// Assistant message produced by this turn, if any event created one
    pub fn assistant_message<'a>(&self, messages: &'a [Message]) -> Option<&'a Message> {
        self.assistant_index.and_then(|i| messages.get(i))
    }

    pub fn related(&self) -> &[String] {
        &self.related
    }

    pub fn take_related(&mut self) -> Vec<String> {
        std::mem::take(&mut self.related)
    }

    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.finish
    }

    fn assistant<'a>(&mut self, messages: &'a mut Vec<Message>) -> &'a mut Message {
        let index = match self.assistant_index {
            Some(index) if index < messages.len() => index,
            _ => {
                messages.push(Message::assistant());
                let index = messages.len() - 1;
                self.assistant_index = Some(index);
                index
            }
        };
        &mut messages[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{QuestionAnswer, QuestionOutcome, ToolInvocation, ToolOutput};
    use serde_json::json;

    fn result(id: &str) -> TurnEvent {
        TurnEvent::ToolResult {
            tool_call_id: id.to_string(),
            result: ToolOutput::error("search", "down"),
        }
    }

    #[test]
    fn test_streams_into_single_assistant_message() {
        let mut messages = vec![Message::user("hi")];
        let mut turn = TurnState::new();
        turn.apply(&mut messages, TurnEvent::TextDelta { text: "Hel".into() })
            .unwrap();
        turn.apply(&mut messages, TurnEvent::TextDelta { text: "lo".into() })
            .unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, "Hello");
        assert_eq!(turn.assistant_message(&messages).unwrap().content, "Hello");
    }

    #[test]
    fn test_results_attach_by_call_id_not_position() {
        let mut messages = vec![Message::user("hi")];
        let mut turn = TurnState::new();
        for id in ["a", "b"] {
            turn.apply(
                &mut messages,
                TurnEvent::ToolCall {
                    invocation: ToolInvocation::call(id, "search", json!({})),
                },
            )
            .unwrap();
        }
        turn.apply(&mut messages, result("b")).unwrap();

        let invocations: Vec<_> = messages[1].tool_invocations().collect();
        assert!(!invocations[0].is_resolved());
        assert!(invocations[1].is_resolved());
    }

    #[test]
    fn test_duplicate_result_keeps_first() {
        let mut messages = vec![Message::user("hi")];
        let mut turn = TurnState::new();
        turn.apply(
            &mut messages,
            TurnEvent::ToolCall {
                invocation: ToolInvocation::call("q", "ask_question", json!({})),
            },
        )
        .unwrap();
        let skipped = ToolOutput::AskQuestion(QuestionAnswer {
            outcome: QuestionOutcome::Skipped,
        });
        turn.apply(
            &mut messages,
            TurnEvent::ToolResult {
                tool_call_id: "q".into(),
                result: skipped.clone(),
            },
        )
        .unwrap();
        turn.apply(&mut messages, result("q")).unwrap();

        let inv = messages[1].tool_invocations().next().unwrap();
        assert_eq!(inv.result(), Some(&skipped));
    }

    #[test]
    fn test_error_event_fails_but_keeps_partial() {
        let mut messages = vec![Message::user("hi")];
        let mut turn = TurnState::new();
        turn.apply(&mut messages, TurnEvent::TextDelta { text: "part".into() })
            .unwrap();
        let err = turn
            .apply(&mut messages, TurnEvent::Error { message: "boom".into() })
            .unwrap_err();
        assert_eq!(err, CoreError::Upstream("boom".into()));
        assert_eq!(messages[1].content, "part");
    }
}
