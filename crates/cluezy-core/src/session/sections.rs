//! Grouping of a flat message list into turns

use crate::types::{Message, Role};

/// One user message and the assistant messages answering it
///
/// A borrowed, derived view: rebuilt from the message list whenever needed
/// and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Section<'a> {
    /// Id of the opening user message
    pub id: &'a str,
    pub user_message: &'a Message,
    pub assistant_messages: Vec<&'a Message>,
}

/// Left-to-right scan: each user message opens a section, assistant messages
/// join the open one. System messages and assistant messages that precede the
/// first user message are ignored.
pub fn group_sections(messages: &[Message]) -> Vec<Section<'_>> {
    let mut sections: Vec<Section<'_>> = Vec::new();

    for message in messages {
        match message.role {
            Role::User => sections.push(Section {
                id: &message.id,
                user_message: message,
                assistant_messages: Vec::new(),
            }),
            Role::Assistant => {
                if let Some(open) = sections.last_mut() {
                    open.assistant_messages.push(message);
                }
            }
            Role::System => {}
        }
    }

    sections
}
