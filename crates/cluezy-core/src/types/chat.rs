use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::message::Message;

/// Navigation path of a chat
pub fn chat_path(id: &str) -> String {
    format!("/search/{id}")
}

/// Persisted conversation owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub messages: Vec<Message>,
    pub path: String,
}

impl Chat {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        title: impl Into<String>,
        messages: Vec<Message>,
    ) -> Self {
        let id = id.into();
        Self {
            path: chat_path(&id),
            id,
            user_id: user_id.into(),
            title: title.into(),
            created_at: Utc::now(),
            messages,
        }
    }

    pub fn summary(&self) -> ChatSummary {
        ChatSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            created_at: self.created_at,
            path: self.path.clone(),
        }
    }
}

/// Chat list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub path: String,
}

/// One page of the chat list; `next_offset` is `None` on the last page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPage {
    pub chats: Vec<ChatSummary>,
    pub next_offset: Option<usize>,
}
