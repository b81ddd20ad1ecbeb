use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::traits::store::{ChatStore, StoreError, StoreResult};
use crate::types::{Chat, ChatPage};

/// Process-local chat store
#[derive(Debug, Default)]
pub struct InMemoryChatStore {
    chats: RwLock<HashMap<String, Chat>>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn owned<'a>(
        chats: &'a HashMap<String, Chat>,
        chat_id: &str,
        user_id: &str,
    ) -> StoreResult<&'a Chat> {
        chats
            .get(chat_id)
            .filter(|chat| chat.user_id == user_id)
            .ok_or_else(|| StoreError::NotFound(chat_id.to_string()))
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn save(&self, chat: Chat) -> StoreResult<()> {
        let mut chats = self.chats.write().await;
        if let Some(existing) = chats.get(&chat.id) {
            if existing.user_id != chat.user_id {
                return Err(StoreError::NotFound(chat.id));
            }
        }
        debug!(chat_id = %chat.id, messages = chat.messages.len(), "Saving chat");
        chats.insert(chat.id.clone(), chat);
        Ok(())
    }

    async fn get(&self, chat_id: &str, user_id: &str) -> StoreResult<Chat> {
        let chats = self.chats.read().await;
        Self::owned(&chats, chat_id, user_id).cloned()
    }

    async fn list(&self, user_id: &str, offset: usize, limit: usize) -> StoreResult<ChatPage> {
        let chats = self.chats.read().await;
        let mut owned: Vec<&Chat> = chats.values().filter(|c| c.user_id == user_id).collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

        let total = owned.len();
        let page = owned
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(Chat::summary)
            .collect();
        let end = offset.saturating_add(limit);

        Ok(ChatPage {
            chats: page,
            next_offset: (end < total).then_some(end),
        })
    }

    async fn delete(&self, chat_id: &str, user_id: &str) -> StoreResult<()> {
        let mut chats = self.chats.write().await;
        Self::owned(&chats, chat_id, user_id)?;
        chats.remove(chat_id);
        Ok(())
    }

    async fn rename(&self, chat_id: &str, title: &str, user_id: &str) -> StoreResult<()> {
        let mut chats = self.chats.write().await;
        Self::owned(&chats, chat_id, user_id)?;
        if let Some(chat) = chats.get_mut(chat_id) {
            chat.title = title.to_string();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn chat(id: &str, user: &str, age_mins: i64) -> Chat {
        let mut chat = Chat::new(id, user, format!("title {id}"), Vec::new());
        chat.created_at = Utc::now() - Duration::minutes(age_mins);
        chat
    }

    #[tokio::test]
    async fn test_other_users_chat_is_not_found() {
        let store = InMemoryChatStore::new();
        store.save(chat("abc", "alice", 0)).await.unwrap();

        assert!(matches!(
            store.get("abc", "bob").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete("abc", "bob").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(store.get("abc", "alice").await.is_ok());
    }

    #[tokio::test]
    async fn test_list_is_newest_first_with_cursor() {
        let store = InMemoryChatStore::new();
        for (i, id) in ["old", "mid", "new"].iter().enumerate() {
            store.save(chat(id, "alice", 10 - i as i64)).await.unwrap();
        }
        store.save(chat("other", "bob", 0)).await.unwrap();

        let first = store.list("alice", 0, 2).await.unwrap();
        let ids: Vec<_> = first.chats.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["new", "mid"]);
        assert_eq!(first.next_offset, Some(2));

        let last = store.list("alice", 2, 2).await.unwrap();
        assert_eq!(last.chats.len(), 1);
        assert_eq!(last.next_offset, None);
    }

    #[tokio::test]
    async fn test_rename_then_delete() {
        let store = InMemoryChatStore::new();
        store.save(chat("abc", "alice", 0)).await.unwrap();
        store.rename("abc", "Renamed", "alice").await.unwrap();
        assert_eq!(store.get("abc", "alice").await.unwrap().title, "Renamed");

        store.delete("abc", "alice").await.unwrap();
        assert!(matches!(
            store.delete("abc", "alice").await,
            Err(StoreError::NotFound(_))
        ));
    }
}
