//! Agent step loop
//!
//! One model call per step. Text deltas are forwarded as they arrive; tool
//! calls of a step run concurrently and each result is folded back by its
//! call id. The loop ends when a step requests no tools, a clarifying
//! question is pending, or the step budget runs out.

use std::sync::Arc;

use futures::future::join_all;
use futures::stream::BoxStream;
use futures::StreamExt;
use tracing::{debug, info, warn};

use super::builder::{AgentBuilder, AgentDescriptor};
use super::convert::to_llm_messages;
use super::related::RelatedQuestions;
use crate::error::{CoreError, CoreResult};
use crate::events::{FinishReason, TurnEvent};
use crate::session::{TurnInvoker, TurnRequest};
use crate::traits::llm::{LlmEvent, LlmMessage, LlmProvider, LlmRequest, ToolCall};
use crate::traits::tools::{ToolExecutor, ToolPolicy};
use crate::types::{ToolInvocation, ToolOutput};

/// Runs agent turns locally
#[derive(Clone)]
pub struct AgentRunner {
    builder: AgentBuilder,
    llm: Arc<dyn LlmProvider>,
    tools: Arc<dyn ToolExecutor>,
    related: Option<RelatedQuestions>,
}

impl AgentRunner {
    pub fn new(builder: AgentBuilder, llm: Arc<dyn LlmProvider>, tools: Arc<dyn ToolExecutor>) -> Self {
        Self {
            builder,
            llm,
            tools,
            related: None,
        }
    }

    /// Offer follow-up questions after completed search-mode turns
    pub fn with_related_questions(mut self) -> Self {
        self.related = Some(RelatedQuestions::new(self.llm.clone()));
        self
    }

    /// Stream one turn
    ///
    /// Builder, provider and re-throw tool failures end the stream with an
    /// `Err`; everything before it has already been yielded.
    pub fn run(&self, request: TurnRequest) -> BoxStream<'static, CoreResult<TurnEvent>> {
        let runner = self.clone();

        let stream = async_stream::stream! {
            let descriptor = match runner
                .builder
                .build(&request.messages, &request.model, request.search_mode)
            {
                Ok(descriptor) => descriptor,
                Err(err) => {
                    yield Err(err);
                    return;
                }
            };

            info!(
                chat_id = %request.chat_id,
                model = %descriptor.model,
                tools = descriptor.tools.len(),
                max_steps = descriptor.max_steps,
                "Starting agent turn"
            );

            let mut history = to_llm_messages(&descriptor.messages);
            let mut finish = FinishReason::StepLimit;

            for step in 1..=descriptor.max_steps {
                let llm_request = LlmRequest::new(&descriptor.model, &descriptor.system_prompt)
                    .with_messages(history.clone())
                    .with_tools(descriptor.tools.clone());

                let mut text = String::new();
                let mut calls: Vec<ToolCall> = Vec::new();
                let mut events = runner.llm.stream(llm_request);

                while let Some(event) = events.next().await {
                    match event {
                        Ok(LlmEvent::TextDelta(delta)) => {
                            text.push_str(&delta);
                            yield Ok(TurnEvent::TextDelta { text: delta });
                        }
                        Ok(LlmEvent::ToolCall(call)) => calls.push(call),
                        Ok(LlmEvent::Finish { reason }) => debug!(step, %reason, "Model call finished"),
                        Err(err) => {
                            warn!(step, error = %err, "Model stream failed");
                            yield Err(CoreError::from(err));
                            return;
                        }
                    }
                }

                if calls.is_empty() {
                    info!(step, "Agent step finished without tool calls");
                    yield Ok(TurnEvent::StepFinish { step });
                    finish = FinishReason::Stop;
                    break;
                }

                for call in &calls {
                    yield Ok(TurnEvent::ToolCall {
                        invocation: ToolInvocation::call(&call.id, &call.name, call.arguments.clone()),
                    });
                }

                let (interactive, executable): (Vec<&ToolCall>, Vec<&ToolCall>) = calls
                    .iter()
                    .partition(|call| policy_of(&descriptor, &call.name) == Some(ToolPolicy::Interactive));

                let outputs = join_all(
                    executable
                        .iter()
                        .map(|call| runner.tools.execute_tool(&call.name, call.arguments.clone())),
                )
                .await;

                let mut tool_messages = Vec::with_capacity(executable.len());
                for (call, output) in executable.iter().zip(outputs) {
                    let output = match output {
                        Ok(output) => output,
                        Err(err) if policy_of(&descriptor, &call.name) == Some(ToolPolicy::Rethrow) => {
                            warn!(tool = %call.name, error = %err, "Tool failed, aborting turn");
                            yield Err(CoreError::upstream(format!("{}: {}", call.name, err)));
                            return;
                        }
                        Err(err) => {
                            warn!(tool = %call.name, error = %err, "Tool failed, returning error to model");
                            ToolOutput::error(&call.name, err.to_string())
                        }
                    };

                    tool_messages.push(LlmMessage::Tool {
                        tool_call_id: call.id.clone(),
                        content: output.payload().to_string(),
                    });
                    yield Ok(TurnEvent::ToolResult {
                        tool_call_id: call.id.clone(),
                        result: output,
                    });
                }

                info!(step, tool_calls = calls.len(), pending = interactive.len(), "Agent step finished");
                yield Ok(TurnEvent::StepFinish { step });

                if !interactive.is_empty() {
                    finish = FinishReason::AwaitingInput;
                    break;
                }

                history.push(LlmMessage::Assistant {
                    content: text,
                    tool_calls: calls.clone(),
                });
                history.extend(tool_messages);
            }

            if finish != FinishReason::AwaitingInput && request.search_mode {
                if let Some(related) = &runner.related {
                    match related.generate(&descriptor.model, &descriptor.messages).await {
                        Ok(items) if !items.is_empty() => {
                            yield Ok(TurnEvent::RelatedQuestions { items });
                        }
                        Ok(_) => {}
                        Err(err) => warn!(error = %err, "Skipping related questions"),
                    }
                }
            }

            yield Ok(TurnEvent::Finish { reason: finish });
        };

        stream.boxed()
    }
}

impl TurnInvoker for AgentRunner {
    fn invoke(&self, request: TurnRequest) -> BoxStream<'static, CoreResult<TurnEvent>> {
        self.run(request)
    }
}

fn policy_of(descriptor: &AgentDescriptor, name: &str) -> Option<ToolPolicy> {
    descriptor.tool(name).map(|tool| tool.policy)
}
