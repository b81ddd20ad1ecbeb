//! Chat persistence abstraction

use async_trait::async_trait;

use crate::types::{Chat, ChatPage};

/// Result type for persistence operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No chat with this id is owned by the requesting user
    #[error("Chat not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Chat record store
///
/// Every operation is scoped by `user_id`. A chat owned by someone else is
/// reported exactly like a missing one.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Create or replace a chat wholesale
    async fn save(&self, chat: Chat) -> StoreResult<()>;

    async fn get(&self, chat_id: &str, user_id: &str) -> StoreResult<Chat>;

    /// Newest first
    async fn list(&self, user_id: &str, offset: usize, limit: usize) -> StoreResult<ChatPage>;

    async fn delete(&self, chat_id: &str, user_id: &str) -> StoreResult<()>;

    async fn rename(&self, chat_id: &str, title: &str, user_id: &str) -> StoreResult<()>;
}
