//! Data model
//!
//! - [`Message`] and its [`Part`]s form the persisted conversation
//! - [`ToolInvocation`] is the two-state record of one tool call
//! - [`ToolOutput`] is the per-tool result union
//! - [`Chat`] is the persisted envelope, [`ChatSummary`]/[`ChatPage`] its list view
//! - [`ModelId`] is a parsed `provider:model` identifier

mod chat;
mod invocation;
mod message;
mod model;
pub mod output;

pub use chat::{chat_path, Chat, ChatPage, ChatSummary};
pub use invocation::{InvocationError, InvocationState, ToolInvocation};
pub use message::{Message, Part, Role};
pub use model::ModelId;
pub use output::{QuestionAnswer, QuestionOutcome, ToolOutput};
