//! OpenAI-compatible chat provider

use std::time::Duration;

use async_stream::stream;
use async_trait::async_trait;
use cluezy_config::ChatConfig;
use cluezy_core::rate_limit::is_rate_limit_message;
use cluezy_core::traits::llm::{
    LlmError, LlmEvent, LlmMessage, LlmProvider, LlmRequest, LlmResult,
};
use cluezy_core::traits::tools::ToolDefinition;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::sse::{Chunk, SseDecoder, ToolCallAccumulator};

/// Chat provider speaking the OpenAI `/chat/completions` protocol
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl OpenAiProvider {
    /// Create a provider from chat configuration
    pub fn new(config: &ChatConfig) -> LlmResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Http(e.to_string()))?;
        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn post(&self, body: &Value) -> reqwest::RequestBuilder {
        let request = self
            .client
            .post(self.completions_url())
            .json(body)
            .timeout(self.timeout);
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

/// Model name without its `provider:` prefix
pub fn model_name(model: &str) -> &str {
    model.split_once(':').map_or(model, |(_, name)| name)
}

fn message_json(message: &LlmMessage) -> Value {
    match message {
        LlmMessage::System { content } => json!({ "role": "system", "content": content }),
        LlmMessage::User { content } => json!({ "role": "user", "content": content }),
        LlmMessage::Assistant {
            content,
            tool_calls,
        } => {
            let mut msg = json!({ "role": "assistant", "content": content });
            if !tool_calls.is_empty() {
                msg["tool_calls"] = tool_calls
                    .iter()
                    .map(|call| {
                        json!({
                            "id": call.id,
                            "type": "function",
                            "function": {
                                "name": call.name,
                                "arguments": call.arguments.to_string(),
                            }
                        })
                    })
                    .collect();
            }
            msg
        }
        LlmMessage::Tool {
            tool_call_id,
            content,
        } => json!({ "role": "tool", "tool_call_id": tool_call_id, "content": content }),
    }
}

fn tool_json(tool: &ToolDefinition) -> Value {
    json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        }
    })
}

/// Request body for `request`
pub fn request_body(request: &LlmRequest, stream: bool) -> Value {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    if !request.system.is_empty() {
        messages.push(json!({ "role": "system", "content": request.system }));
    }
    messages.extend(request.messages.iter().map(message_json));

    let mut body = json!({
        "model": model_name(&request.model),
        "messages": messages,
        "stream": stream,
    });
    if !request.tools.is_empty() {
        body["tools"] = request.tools.iter().map(tool_json).collect();
    }
    if request.json_output {
        body["response_format"] = json!({ "type": "json_object" });
    }
    body
}

/// Map an error status and body to an [`LlmError`]
fn api_error(status: u16, body: &str) -> LlmError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string());

    if status == 429 || is_rate_limit_message(&message) {
        LlmError::RateLimited(message)
    } else {
        LlmError::Api { status, message }
    }
}

async fn check_status(response: reqwest::Response) -> LlmResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(api_error(status.as_u16(), &body))
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn stream(&self, request: LlmRequest) -> BoxStream<'static, LlmResult<LlmEvent>> {
        let body = request_body(&request, true);
        let pending = self.post(&body).send();
        debug!(model = %request.model, tools = request.tools.len(), "Starting completion stream");

        Box::pin(stream! {
            let response = match pending.await {
                Ok(response) => response,
                Err(e) => {
                    yield Err(LlmError::Http(e.to_string()));
                    return;
                }
            };
            let response = match check_status(response).await {
                Ok(response) => response,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let mut bytes = response.bytes_stream();
            let mut decoder = SseDecoder::default();
            let mut calls = ToolCallAccumulator::default();
            let mut finish_reason: Option<String> = None;
            let mut done = false;

            while !done {
                let payloads = match bytes.next().await {
                    Some(Ok(chunk)) => decoder.push(&chunk),
                    Some(Err(e)) => {
                        yield Err(LlmError::Http(e.to_string()));
                        return;
                    }
                    None => {
                        done = true;
                        decoder.finish().into_iter().collect()
                    }
                };

                for payload in payloads {
                    if payload == "[DONE]" {
                        done = true;
                        break;
                    }
                    let chunk: Chunk = match serde_json::from_str(&payload) {
                        Ok(chunk) => chunk,
                        Err(e) => {
                            yield Err(LlmError::InvalidResponse(format!("Failed to parse stream: {e}")));
                            return;
                        }
                    };
                    if let Some(error) = chunk.error {
                        warn!(message = %error.message, "Provider reported an error mid-stream");
                        yield Err(api_error(500, &json!({ "error": { "message": error.message } }).to_string()));
                        return;
                    }
                    for choice in chunk.choices {
                        if let Some(text) = choice.delta.content.filter(|t| !t.is_empty()) {
                            yield Ok(LlmEvent::TextDelta(text));
                        }
                        for delta in choice.delta.tool_calls {
                            calls.push(delta);
                        }
                        if choice.finish_reason.is_some() {
                            finish_reason = choice.finish_reason;
                        }
                    }
                }
            }

            match calls.finish() {
                Ok(completed) => {
                    for call in completed {
                        yield Ok(LlmEvent::ToolCall(call));
                    }
                }
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
            yield Ok(LlmEvent::Finish {
                reason: finish_reason.unwrap_or_else(|| "stop".to_string()),
            });
        })
    }

    async fn generate(&self, request: LlmRequest) -> LlmResult<String> {
        let body = request_body(&request, false);
        debug!(model = %request.model, "Requesting completion");

        let response = self
            .post(&body)
            .send()
            .await
            .map_err(|e| LlmError::Http(e.to_string()))?;
        let parsed: CompletionResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }
}
