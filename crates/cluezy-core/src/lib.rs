//! # Cluezy Core
//!
//! Conversation model and agent orchestration for the Cluezy search
//! assistant.
//!
//! - [`session`]: message sections and the Session/Turn Model
//! - [`agent`]: descriptor building and the tool-calling step loop
//! - [`history`]: the chat-list cache
//! - [`gateway`]: gated rename/delete of persisted chats
//! - [`traits`]: collaborators (model provider, tools, store, identity)
//!
//! Implementations of the collaborators live in other crates; core only
//! depends on their traits.

pub mod agent;
pub mod clock;
pub mod error;
pub mod events;
pub mod gateway;
pub mod history;
pub mod rate_limit;
pub mod session;
pub mod storage;
pub mod traits;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use agent::{AgentBuilder, AgentDescriptor, AgentRunner, PromptEnhancer, RelatedQuestions};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, CoreResult};
pub use events::{FinishReason, TurnEvent};
pub use gateway::ChatMutationGateway;
pub use history::{HistoryCache, HistorySource};
pub use rate_limit::is_rate_limit_message;
pub use session::{
    group_sections, ChatSession, SearchModePreference, Section, StopHandle, TurnInvoker,
    TurnOutcome, TurnRequest,
};
pub use storage::InMemoryChatStore;
pub use traits::{
    ChatStore, IdentityProvider, LlmError, LlmProvider, StoreError, ToolError, ToolExecutor,
};
pub use types::{
    Chat, ChatPage, ChatSummary, Message, ModelId, Part, QuestionOutcome, Role, ToolInvocation,
    ToolOutput,
};
