//! Properties of the Session/Turn Model operations

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cluezy_core::events::FinishReason;
use cluezy_core::{
    ChatSession, CoreResult, Message, Role, TurnEvent, TurnInvoker, TurnOutcome, TurnRequest,
};
use futures::stream::BoxStream;
use futures::StreamExt;
use proptest::prelude::*;

/// Counts invocations and records the history each one saw
#[derive(Default)]
struct Recorder {
    calls: AtomicUsize,
    seen: std::sync::Mutex<Vec<Vec<Message>>>,
}

impl TurnInvoker for Recorder {
    fn invoke(&self, request: TurnRequest) -> BoxStream<'static, CoreResult<TurnEvent>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.messages);
        futures::stream::iter(vec![Ok(TurnEvent::Finish {
            reason: FinishReason::Stop,
        })])
        .boxed()
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn history() -> impl Strategy<Value = Vec<Message>> {
    prop::collection::vec(any::<bool>(), 1..20).prop_map(|roles| {
        roles
            .into_iter()
            .enumerate()
            .map(|(i, user)| {
                let role = if user { Role::User } else { Role::Assistant };
                Message::new(role, format!("text {i}")).with_id(format!("m{i}"))
            })
            .collect()
    })
}

fn session_with(messages: Vec<Message>) -> (ChatSession, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let mut session = ChatSession::new(recorder.clone(), "openai:gpt-4o-mini", true);
    session.load(cluezy_core::Chat::new("c", "u", "t", messages));
    (session, recorder)
}

proptest! {
    #[test]
    fn edit_of_unknown_id_is_noop(messages in history()) {
        let (mut session, recorder) = session_with(messages.clone());
        let outcome = runtime()
            .block_on(session.edit_and_regenerate("missing", "new text"))
            .unwrap();

        prop_assert_eq!(outcome, TurnOutcome::Unchanged);
        prop_assert_eq!(session.messages(), messages.as_slice());
        prop_assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn edit_truncates_after_target(messages in history(), pick in any::<prop::sample::Index>()) {
        let i = pick.index(messages.len());
        let id = messages[i].id.clone();
        let (mut session, recorder) = session_with(messages);

        runtime().block_on(session.edit_and_regenerate(&id, "edited")).unwrap();

        let sent = recorder.seen.lock().unwrap()[0].clone();
        prop_assert_eq!(sent.len(), i + 1);
        prop_assert_eq!(sent[i].content.as_str(), "edited");
        prop_assert_eq!(session.messages().len(), i + 1);
    }

    #[test]
    fn reload_truncates_to_preceding_user(messages in history(), pick in any::<prop::sample::Index>()) {
        let i = pick.index(messages.len());
        let id = messages[i].id.clone();
        let nearest_user = messages[..i].iter().rposition(|m| m.role == Role::User);
        let (mut session, recorder) = session_with(messages.clone());

        runtime().block_on(session.reload_from(&id)).unwrap();

        let sent = recorder.seen.lock().unwrap()[0].clone();
        match nearest_user {
            Some(j) => {
                prop_assert_eq!(sent.len(), j + 1);
                prop_assert_eq!(sent[j].role, Role::User);
            }
            None => prop_assert_eq!(sent, messages),
        }
        prop_assert_eq!(recorder.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reload_of_unknown_id_sends_full_history(messages in history()) {
        let (mut session, recorder) = session_with(messages.clone());

        runtime().block_on(session.reload_from("missing")).unwrap();

        prop_assert_eq!(recorder.calls.load(Ordering::SeqCst), 1);
        prop_assert_eq!(recorder.seen.lock().unwrap()[0].clone(), messages);
    }

    #[test]
    fn blank_input_never_invokes(messages in history(), blank in "[ \t\n]{0,6}") {
        let (mut session, recorder) = session_with(messages.clone());
        let outcome = runtime().block_on(session.append(&blank)).unwrap();

        prop_assert_eq!(outcome, TurnOutcome::Unchanged);
        prop_assert_eq!(session.messages(), messages.as_slice());
        prop_assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn reload_without_preceding_user_keeps_everything() {
    let messages = vec![
        Message::new(Role::System, "sys").with_id("s"),
        Message::assistant().with_id("a"),
    ];
    let (mut session, recorder) = session_with(messages.clone());

    session.reload_from("a").await.unwrap();

    assert_eq!(recorder.seen.lock().unwrap()[0], messages);
}
