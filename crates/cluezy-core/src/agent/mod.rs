//! Agent orchestration: descriptor building, the step loop and helpers
//! around it (related questions, prompt enhancement)

mod builder;
mod convert;
mod enhance;
pub mod prompts;
mod related;
mod runner;

pub use builder::{AgentBuilder, AgentDescriptor, DIRECT_MAX_STEPS, SEARCH_MAX_STEPS};
pub use convert::to_llm_messages;
pub use enhance::{PromptEnhancer, PROMPT_NOT_FOUND};
pub use related::{parse_related, RelatedQuestions, RELATED_QUESTION_COUNT};
pub use runner::AgentRunner;
