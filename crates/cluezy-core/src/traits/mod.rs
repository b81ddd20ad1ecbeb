//! Collaborator traits
//!
//! Core defines the interfaces; the tools, llm and web crates provide the
//! implementations and the binary wires them together.

pub mod identity;
pub mod llm;
pub mod store;
pub mod tools;

pub use identity::{Credentials, HeaderIdentity, IdentityProvider, ANONYMOUS_USER};
pub use llm::{LlmError, LlmEvent, LlmMessage, LlmProvider, LlmRequest, LlmResult, ToolCall};
pub use store::{ChatStore, StoreError, StoreResult};
pub use tools::{ToolDefinition, ToolError, ToolExecutor, ToolPolicy, ToolResult};
