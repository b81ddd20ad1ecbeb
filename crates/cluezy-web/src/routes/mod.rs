mod chat;
mod enhance;
mod health;
mod history;

pub use chat::{chat_routes, ChatRequest, TITLE_MAX_CHARS};
pub use enhance::enhance_routes;
pub use health::health_routes;
pub use history::history_routes;
