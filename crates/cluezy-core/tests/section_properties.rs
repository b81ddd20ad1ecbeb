//! Properties of section grouping

use cluezy_core::{group_sections, Message, Role};
use proptest::prelude::*;

fn role() -> impl Strategy<Value = Role> {
    prop_oneof![
        3 => Just(Role::User),
        4 => Just(Role::Assistant),
        1 => Just(Role::System),
    ]
}

fn conversation() -> impl Strategy<Value = Vec<Message>> {
    prop::collection::vec((role(), "[a-z ]{0,12}"), 0..40).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (role, text))| Message::new(role, text).with_id(format!("m{i}")))
            .collect()
    })
}

proptest! {
    #[test]
    fn grouping_is_pure(messages in conversation()) {
        prop_assert_eq!(group_sections(&messages), group_sections(&messages));
    }

    #[test]
    fn one_section_per_user_message(mut messages in conversation()) {
        messages.insert(0, Message::user("first").with_id("lead"));
        let users = messages.iter().filter(|m| m.role == Role::User).count();
        prop_assert_eq!(group_sections(&messages).len(), users);
    }

    #[test]
    fn sections_preserve_order_and_skip_system(messages in conversation()) {
        let sections = group_sections(&messages);
        let flattened: Vec<&str> = sections
            .iter()
            .flat_map(|s| {
                std::iter::once(s.user_message.id.as_str())
                    .chain(s.assistant_messages.iter().map(|m| m.id.as_str()))
            })
            .collect();

        let first_user = messages.iter().position(|m| m.role == Role::User);
        let expected: Vec<&str> = match first_user {
            Some(start) => messages[start..]
                .iter()
                .filter(|m| m.role != Role::System)
                .map(|m| m.id.as_str())
                .collect(),
            None => Vec::new(),
        };
        prop_assert_eq!(flattened, expected);

        for section in &sections {
            prop_assert_eq!(section.id, section.user_message.id.as_str());
            prop_assert!(section.assistant_messages.iter().all(|m| m.role == Role::Assistant));
        }
    }
}
