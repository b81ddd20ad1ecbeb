//! Conversation state: sections, the session model and its preferences

mod conversation;
mod preference;
mod sections;
mod turn;

pub use conversation::{
    ChatSession, StopHandle, TurnInvoker, TurnOutcome, TurnRequest, ASK_QUESTION_TOOL,
};
pub use preference::{SearchModePreference, SEARCH_MODE_FILE};
pub use sections::{group_sections, Section};
pub use turn::TurnState;
