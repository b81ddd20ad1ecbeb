//! Chat mutation gateway
//!
//! Rename and delete of persisted chats, gated by the history-saving flag.
//! Ownership is enforced by the [`ChatStore`]; the gateway validates input
//! and maps store outcomes onto [`CoreError`].

use std::sync::Arc;

use tracing::{error, info};

use crate::error::{CoreError, CoreResult};
use crate::traits::store::{ChatStore, StoreError};

/// Message returned when history saving is off
pub const SAVING_DISABLED: &str = "Chat history saving is disabled.";

/// Message for a missing chat id
pub const CHAT_ID_REQUIRED: &str = "Chat ID is required";

/// Message for a blank title
pub const TITLE_REQUIRED: &str = "Valid title is required";

/// Message for a chat that is missing or owned by someone else
pub const CHAT_NOT_FOUND: &str = "Chat not found";

/// Gated rename/delete of persisted chats
#[derive(Clone)]
pub struct ChatMutationGateway {
    store: Arc<dyn ChatStore>,
    enabled: bool,
}

impl ChatMutationGateway {
    pub fn new(store: Arc<dyn ChatStore>, enabled: bool) -> Self {
        Self { store, enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Delete a chat owned by `user_id`
    ///
    /// Deleting an already-deleted chat is `NotFound`, never a second success.
    pub async fn delete(&self, chat_id: &str, user_id: &str) -> CoreResult<()> {
        self.check_preconditions(chat_id)?;

        self.store
            .delete(chat_id, user_id)
            .await
            .map_err(|e| map_store_error(chat_id, "delete", e))?;

        info!(chat_id, user_id, "Chat deleted");
        Ok(())
    }

    /// Rename a chat owned by `user_id`; the title is trimmed
    pub async fn rename(&self, chat_id: &str, title: &str, user_id: &str) -> CoreResult<()> {
        self.check_preconditions(chat_id)?;

        let title = title.trim();
        if title.is_empty() {
            return Err(CoreError::Validation(TITLE_REQUIRED.to_string()));
        }

        self.store
            .rename(chat_id, title, user_id)
            .await
            .map_err(|e| map_store_error(chat_id, "rename", e))?;

        info!(chat_id, user_id, "Chat renamed");
        Ok(())
    }

    fn check_preconditions(&self, chat_id: &str) -> CoreResult<()> {
        if !self.enabled {
            return Err(CoreError::FeatureDisabled(SAVING_DISABLED.to_string()));
        }
        if chat_id.trim().is_empty() {
            return Err(CoreError::Validation(CHAT_ID_REQUIRED.to_string()));
        }
        Ok(())
    }
}

fn map_store_error(chat_id: &str, operation: &str, err: StoreError) -> CoreError {
    match err {
        StoreError::NotFound(_) => CoreError::NotFound(CHAT_NOT_FOUND.to_string()),
        StoreError::Backend(message) => {
            error!(chat_id, operation, error = %message, "Chat store failed");
            CoreError::Upstream(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryChatStore;
    use crate::traits::store::StoreResult;
    use crate::types::{Chat, ChatPage};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that counts calls and fails them all
    #[derive(Default)]
    struct CountingStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ChatStore for CountingStore {
        async fn save(&self, _chat: Chat) -> StoreResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        async fn get(&self, id: &str, _user: &str) -> StoreResult<Chat> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::NotFound(id.to_string()))
        }
        async fn list(&self, _user: &str, _o: usize, _l: usize) -> StoreResult<ChatPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ChatPage::default())
        }
        async fn delete(&self, _id: &str, _user: &str) -> StoreResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Backend("disk on fire".to_string()))
        }
        async fn rename(&self, _id: &str, _t: &str, _user: &str) -> StoreResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Backend("disk on fire".to_string()))
        }
    }

    async fn seeded() -> ChatMutationGateway {
        let store = Arc::new(InMemoryChatStore::new());
        store
            .save(Chat::new("abc", "alice", "First", Vec::new()))
            .await
            .unwrap();
        ChatMutationGateway::new(store, true)
    }

    #[tokio::test]
    async fn test_disabled_flag_blocks_everything() {
        let store = Arc::new(CountingStore::default());
        let gateway = ChatMutationGateway::new(store.clone(), false);

        let err = gateway.delete("abc", "alice").await.unwrap_err();
        assert_eq!(err, CoreError::FeatureDisabled(SAVING_DISABLED.to_string()));
        assert!(gateway.rename("abc", "x", "alice").await.is_err());
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_not_owned_is_not_found() {
        let gateway = seeded().await;
        assert_eq!(
            gateway.delete("abc", "mallory").await.unwrap_err(),
            CoreError::NotFound(CHAT_NOT_FOUND.to_string())
        );
        assert_eq!(
            gateway.rename("abc", "Mine now", "mallory").await.unwrap_err(),
            CoreError::NotFound(CHAT_NOT_FOUND.to_string())
        );
    }

    #[tokio::test]
    async fn test_second_delete_is_not_found() {
        let gateway = seeded().await;
        gateway.delete("abc", "alice").await.unwrap();
        assert!(matches!(
            gateway.delete("abc", "alice").await,
            Err(CoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_title_never_reaches_store() {
        let store = Arc::new(CountingStore::default());
        let gateway = ChatMutationGateway::new(store.clone(), true);

        let err = gateway.rename("abc", "   ", "alice").await.unwrap_err();
        assert_eq!(err, CoreError::Validation(TITLE_REQUIRED.to_string()));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_id_is_validation_error() {
        let gateway = seeded().await;
        assert_eq!(
            gateway.delete("", "alice").await.unwrap_err(),
            CoreError::Validation(CHAT_ID_REQUIRED.to_string())
        );
    }

    #[tokio::test]
    async fn test_backend_failure_is_upstream() {
        let gateway = ChatMutationGateway::new(Arc::new(CountingStore::default()), true);
        assert!(matches!(
            gateway.delete("abc", "alice").await,
            Err(CoreError::Upstream(_))
        ));
    }
}
