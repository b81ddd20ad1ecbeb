//! # Cluezy LLM
//!
//! [`OpenAiProvider`] implements [`cluezy_core::LlmProvider`] against any
//! OpenAI-compatible `/chat/completions` endpoint. Streaming responses are
//! decoded from server-sent events; tool-call argument fragments are
//! accumulated per call index and surfaced as complete
//! [`ToolCall`](cluezy_core::traits::ToolCall)s when the choice finishes.
//! [`SseDecoder`] is shared with clients of the Cluezy chat endpoint.

pub mod openai;
mod sse;

pub use openai::OpenAiProvider;
pub use sse::SseDecoder;
