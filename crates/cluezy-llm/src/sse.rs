//! Server-sent event decoding for streamed completions

use std::collections::BTreeMap;

use cluezy_core::traits::llm::{LlmError, LlmResult, ToolCall};
use serde::Deserialize;
use serde_json::Value;

/// Splits a server-sent event byte stream into `data:` payloads
///
/// Other fields (`event:`, `id:`, comments) are dropped.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Feed bytes, returning the payloads of every completed line
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut payloads = Vec::new();
        while let Some(end) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=end).collect();
            let line = String::from_utf8_lossy(&line);
            if let Some(data) = line.trim().strip_prefix("data:") {
                payloads.push(data.trim().to_string());
            }
        }
        payloads
    }

    /// Payload of a trailing line without a newline, if any
    pub fn finish(&mut self) -> Option<String> {
        let rest = String::from_utf8_lossy(&std::mem::take(&mut self.buffer)).into_owned();
        rest.trim().strip_prefix("data:").map(|d| d.trim().to_string())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Chunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCallDelta>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ToolCallDelta {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub function: Option<FunctionDelta>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FunctionDelta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Default)]
struct PartialCall {
    id: String,
    name: String,
    arguments: String,
}

/// Accumulates tool-call fragments keyed by their index
#[derive(Debug, Default)]
pub(crate) struct ToolCallAccumulator {
    calls: BTreeMap<u32, PartialCall>,
}

impl ToolCallAccumulator {
    pub fn push(&mut self, delta: ToolCallDelta) {
        let call = self.calls.entry(delta.index).or_default();
        if let Some(id) = delta.id {
            call.id = id;
        }
        if let Some(function) = delta.function {
            if let Some(name) = function.name {
                call.name.push_str(&name);
            }
            if let Some(arguments) = function.arguments {
                call.arguments.push_str(&arguments);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Completed calls in index order; arguments must be valid JSON
    pub fn finish(&mut self) -> LlmResult<Vec<ToolCall>> {
        std::mem::take(&mut self.calls)
            .into_values()
            .map(|call| {
                let arguments = if call.arguments.trim().is_empty() {
                    Value::Object(Default::default())
                } else {
                    serde_json::from_str(&call.arguments).map_err(|e| {
                        LlmError::InvalidResponse(format!(
                            "tool call {} has malformed arguments: {e}",
                            call.name
                        ))
                    })?
                };
                Ok(ToolCall {
                    id: call.id,
                    name: call.name,
                    arguments,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decoder_handles_split_lines() {
        let mut decoder = SseDecoder::default();
        assert!(decoder.push(b"data: {\"a\"").is_empty());
        let payloads = decoder.push(b":1}\n\n: keep-alive\ndata: [DONE]\n");
        assert_eq!(payloads, vec!["{\"a\":1}", "[DONE]"]);
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_decoder_keeps_multibyte_chars_across_chunks() {
        let mut decoder = SseDecoder::default();
        let line = "data: héllo\n".as_bytes();
        let split = line.iter().position(|b| *b == 0xc3).unwrap() + 1;
        assert!(decoder.push(&line[..split]).is_empty());
        assert_eq!(decoder.push(&line[split..]), vec!["héllo"]);
    }

    #[test]
    fn test_accumulator_joins_fragments() {
        let mut acc = ToolCallAccumulator::default();
        let delta = |index, id: Option<&str>, name: Option<&str>, args: &str| ToolCallDelta {
            index,
            id: id.map(String::from),
            function: Some(FunctionDelta {
                name: name.map(String::from),
                arguments: Some(args.to_string()),
            }),
        };
        acc.push(delta(1, Some("call_b"), Some("weather"), ""));
        acc.push(delta(0, Some("call_a"), Some("search"), "{\"que"));
        acc.push(delta(0, None, None, "ry\":\"rust\"}"));
        acc.push(delta(1, None, None, "{\"location\":\"Oslo\"}"));

        let calls = acc.finish().unwrap();
        assert_eq!(calls[0].id, "call_a");
        assert_eq!(calls[0].arguments, json!({ "query": "rust" }));
        assert_eq!(calls[1].name, "weather");
        assert!(acc.is_empty());
    }

    #[test]
    fn test_malformed_arguments() {
        let mut acc = ToolCallAccumulator::default();
        acc.push(ToolCallDelta {
            index: 0,
            id: Some("c".into()),
            function: Some(FunctionDelta {
                name: Some("search".into()),
                arguments: Some("{oops".into()),
            }),
        });
        assert!(matches!(acc.finish(), Err(LlmError::InvalidResponse(_))));
    }
}
