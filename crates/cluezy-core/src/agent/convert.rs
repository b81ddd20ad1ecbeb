//! Conversion of conversation messages into provider messages

use crate::traits::llm::{LlmMessage, ToolCall};
use crate::types::{Message, Part, Role};

/// Flatten a conversation for the model
///
/// Resolved tool invocations become an assistant tool-call message followed by
/// one tool message per result. Unresolved invocations (an unanswered
/// question) are left out, since providers reject calls without results.
pub fn to_llm_messages(messages: &[Message]) -> Vec<LlmMessage> {
    let mut out = Vec::with_capacity(messages.len());

    for message in messages {
        match message.role {
            Role::System => out.push(LlmMessage::System {
                content: message.content.clone(),
            }),
            Role::User => out.push(LlmMessage::User {
                content: message.content.clone(),
            }),
            Role::Assistant if message.parts.is_empty() => out.push(LlmMessage::Assistant {
                content: message.content.clone(),
                tool_calls: Vec::new(),
            }),
            Role::Assistant => flatten_assistant(message, &mut out),
        }
    }

    out
}

fn flush(
    text: &mut String,
    calls: &mut Vec<ToolCall>,
    results: &mut Vec<LlmMessage>,
    out: &mut Vec<LlmMessage>,
) {
    if text.is_empty() && calls.is_empty() {
        return;
    }
    out.push(LlmMessage::Assistant {
        content: std::mem::take(text),
        tool_calls: std::mem::take(calls),
    });
    out.append(results);
}

fn flatten_assistant(message: &Message, out: &mut Vec<LlmMessage>) {
    let mut text = String::new();
    let mut calls = Vec::new();
    let mut results = Vec::new();

    for part in &message.parts {
        match part {
            Part::Text { text: delta } => {
                if !calls.is_empty() {
                    flush(&mut text, &mut calls, &mut results, out);
                }
                text.push_str(delta);
            }
            Part::ToolInvocation { tool_invocation } => {
                let Some(result) = tool_invocation.result() else {
                    continue;
                };
                calls.push(ToolCall {
                    id: tool_invocation.tool_call_id.clone(),
                    name: tool_invocation.tool_name.clone(),
                    arguments: tool_invocation.args.clone(),
                });
                results.push(LlmMessage::Tool {
                    tool_call_id: tool_invocation.tool_call_id.clone(),
                    content: result.payload().to_string(),
                });
            }
        }
    }
    flush(&mut text, &mut calls, &mut results, out);
}
