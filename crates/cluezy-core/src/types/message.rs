use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::invocation::ToolInvocation;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One segment of a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Part {
    /// Plain text
    Text { text: String },
    /// A tool call and, once resolved, its result
    ToolInvocation {
        #[serde(rename = "toolInvocation")]
        tool_invocation: ToolInvocation,
    },
}

/// One conversational unit
///
/// `id` and `role` are fixed at creation. `content` changes only through an
/// explicit edit; `parts` grow while a turn streams and are frozen afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<Part>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Message with a fresh id
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            parts: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// User message with a fresh id
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Empty assistant message with a fresh id
    pub fn assistant() -> Self {
        Self::new(Role::Assistant, "")
    }

    /// Override the id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Override the creation time
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    /// Append streamed text, extending the trailing text part if there is one
    pub fn push_text(&mut self, delta: &str) {
        self.content.push_str(delta);
        if let Some(Part::Text { text }) = self.parts.last_mut() {
            text.push_str(delta);
        } else {
            self.parts.push(Part::Text {
                text: delta.to_string(),
            });
        }
    }

    /// Replace the content, collapsing text parts into the first one
    ///
    /// Tool invocation parts keep their position relative to the text.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        let mut kept = false;
        let content = &self.content;
        self.parts.retain_mut(|part| match part {
            Part::Text { text } if !kept => {
                kept = true;
                text.clone_from(content);
                true
            }
            Part::Text { .. } => false,
            Part::ToolInvocation { .. } => true,
        });
        if !kept && (!self.parts.is_empty() || self.role != Role::User) {
            self.parts.push(Part::Text {
                text: self.content.clone(),
            });
        }
    }

    /// Tool invocations in part order
    pub fn tool_invocations(&self) -> impl Iterator<Item = &ToolInvocation> {
        self.parts.iter().filter_map(|part| match part {
            Part::ToolInvocation { tool_invocation } => Some(tool_invocation),
            Part::Text { .. } => None,
        })
    }

    /// Find an invocation by its call id
    pub fn tool_invocation_mut(&mut self, tool_call_id: &str) -> Option<&mut ToolInvocation> {
        self.parts.iter_mut().find_map(|part| match part {
            Part::ToolInvocation { tool_invocation } if tool_invocation.tool_call_id == tool_call_id => {
                Some(tool_invocation)
            }
            _ => None,
        })
    }
}
