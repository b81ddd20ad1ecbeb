//! Session/Turn Model
//!
//! Append/rewrite rules for one conversation's message list. Order is
//! append/truncate only: no operation reorders messages or inserts one out of
//! sequence. Every model invocation goes through a [`TurnInvoker`], so the same
//! session drives a local agent or a remote server.

use std::sync::{Arc, Mutex};

use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::sections::{group_sections, Section};
use super::turn::TurnState;
use crate::error::CoreResult;
use crate::events::{FinishReason, TurnEvent};
use crate::types::{
    Chat, InvocationState, Message, QuestionAnswer, QuestionOutcome, ToolOutput,
};

/// Name of the clarifying-question tool
pub const ASK_QUESTION_TOOL: &str = "ask_question";

/// Input for one model invocation
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRequest {
    pub chat_id: String,
    pub messages: Vec<Message>,
    pub model: String,
    pub search_mode: bool,
}

/// Runs one turn against a message history
pub trait TurnInvoker: Send + Sync {
    fn invoke(&self, request: TurnRequest) -> BoxStream<'static, CoreResult<TurnEvent>>;
}

/// How an operation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Nothing happened (empty input, unknown message id)
    Unchanged,
    Completed,
    /// Stopped by the user; the partial answer is kept
    Stopped,
    /// The model asked a clarifying question
    AwaitingInput { tool_call_id: String },
}

/// Cancels the in-flight turn of a session
///
/// Cloneable and usable from another task (e.g. a Ctrl-C handler) while the
/// session itself is busy streaming.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    current: Arc<Mutex<CancellationToken>>,
}

impl StopHandle {
    /// Halt the current stream; no effect when idle
    pub fn stop(&self) {
        self.lock().cancel();
    }

    fn arm(&self) -> CancellationToken {
        let fresh = CancellationToken::new();
        *self.lock() = fresh.clone();
        fresh
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CancellationToken> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// One conversation in memory
pub struct ChatSession {
    id: String,
    messages: Vec<Message>,
    related: Vec<String>,
    model: String,
    search_mode: bool,
    invoker: Arc<dyn TurnInvoker>,
    events: Option<mpsc::UnboundedSender<TurnEvent>>,
    stop: StopHandle,
}

impl ChatSession {
    pub fn new(invoker: Arc<dyn TurnInvoker>, model: impl Into<String>, search_mode: bool) -> Self {
        Self {
            id: new_chat_id(),
            messages: Vec::new(),
            related: Vec::new(),
            model: model.into(),
            search_mode,
            invoker,
            events: None,
            stop: StopHandle::default(),
        }
    }

    /// Resume a persisted chat
    pub fn load(&mut self, chat: Chat) {
        self.id = chat.id;
        self.messages = chat.messages;
        self.related.clear();
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn sections(&self) -> Vec<Section<'_>> {
        group_sections(&self.messages)
    }

    /// Related questions offered after the last turn
    pub fn related(&self) -> &[String] {
        &self.related
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    pub fn search_mode(&self) -> bool {
        self.search_mode
    }

    pub fn set_search_mode(&mut self, enabled: bool) {
        self.search_mode = enabled;
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Receive every event as it streams
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<TurnEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    /// Send user input; blank input is a no-op
    pub async fn append(&mut self, content: &str) -> CoreResult<TurnOutcome> {
        if content.trim().is_empty() {
            return Ok(TurnOutcome::Unchanged);
        }
        self.messages.push(Message::user(content));
        self.related.clear();
        self.run_turn().await
    }

    /// Send the `index`th related question as a follow-up
    pub async fn select_related(&mut self, index: usize) -> CoreResult<TurnOutcome> {
        match self.related.get(index).cloned() {
            Some(question) => self.append(&question).await,
            None => Ok(TurnOutcome::Unchanged),
        }
    }

    /// Rewrite a message, drop everything after it and regenerate
    ///
    /// Unknown ids are a silent no-op. The truncation is not rolled back if
    /// the new invocation fails.
    pub async fn edit_and_regenerate(
        &mut self,
        message_id: &str,
        content: &str,
    ) -> CoreResult<TurnOutcome> {
        let Some(index) = self.position(message_id) else {
            debug!(message_id, "Edit target not found");
            return Ok(TurnOutcome::Unchanged);
        };

        self.messages[index].set_content(content);
        self.messages.truncate(index + 1);
        self.related.clear();
        info!(chat_id = %self.id, message_id, kept = index + 1, "Editing and regenerating");
        self.run_turn().await
    }

    /// Regenerate from the nearest user message strictly before `message_id`
    ///
    /// When the id is unknown, or no user message precedes it, the history is
    /// left as is and re-invoked.
    pub async fn reload_from(&mut self, message_id: &str) -> CoreResult<TurnOutcome> {
        match self.position(message_id) {
            Some(index) => {
                if let Some(user_index) = self.messages[..index].iter().rposition(Message::is_user)
                {
                    self.messages.truncate(user_index + 1);
                }
            }
            None => debug!(message_id, "Reload target not found, reloading full history"),
        }
        self.related.clear();
        info!(chat_id = %self.id, message_id, kept = self.messages.len(), "Reloading");
        self.run_turn().await
    }

    /// Settle a pending clarifying question and continue the turn
    pub async fn resolve_question(
        &mut self,
        tool_call_id: &str,
        outcome: QuestionOutcome,
    ) -> CoreResult<TurnOutcome> {
        let pending = self
            .messages
            .iter_mut()
            .rev()
            .filter(|m| m.is_assistant())
            .find_map(|m| m.tool_invocation_mut(tool_call_id))
            .filter(|inv| {
                inv.tool_name == ASK_QUESTION_TOOL && *inv.state() == InvocationState::Call
            });

        let Some(invocation) = pending else {
            debug!(tool_call_id, "No pending question with this id");
            return Ok(TurnOutcome::Unchanged);
        };

        if let Err(err) = invocation.resolve(ToolOutput::AskQuestion(QuestionAnswer { outcome })) {
            warn!(error = %err, "Question already answered");
            return Ok(TurnOutcome::Unchanged);
        }
        self.run_turn().await
    }

    /// Id of the clarifying question waiting for an answer, if any
    pub fn pending_question(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .filter(|m| m.is_assistant())
            .flat_map(|m| m.tool_invocations())
            .find(|inv| inv.tool_name == ASK_QUESTION_TOOL && !inv.is_resolved())
            .map(|inv| inv.tool_call_id.as_str())
    }

    /// Local reset to a blank session; nothing is persisted or deleted
    pub fn new_chat(&mut self) {
        self.stop.stop();
        self.messages.clear();
        self.related.clear();
        self.id = new_chat_id();
    }

    fn position(&self, message_id: &str) -> Option<usize> {
        self.messages.iter().position(|m| m.id == message_id)
    }

    async fn run_turn(&mut self) -> CoreResult<TurnOutcome> {
        let cancel = self.stop.arm();
        let request = TurnRequest {
            chat_id: self.id.clone(),
            messages: self.messages.clone(),
            model: self.model.clone(),
            search_mode: self.search_mode,
        };

        let mut stream = self.invoker.invoke(request);
        let mut turn = TurnState::new();

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(chat_id = %self.id, "Turn stopped, keeping partial answer");
                    return Ok(TurnOutcome::Stopped);
                }
                next = stream.next() => next,
            };

            let Some(event) = next else { break };
            let event = event?;
            if let Some(tx) = &self.events {
                let _ = tx.send(event.clone());
            }
            turn.apply(&mut self.messages, event)?;
        }

        self.related = turn.take_related();

        Ok(match turn.finish_reason() {
            Some(FinishReason::AwaitingInput) => match self.pending_question() {
                Some(id) => TurnOutcome::AwaitingInput {
                    tool_call_id: id.to_string(),
                },
                None => TurnOutcome::Completed,
            },
            _ => TurnOutcome::Completed,
        })
    }
}

fn new_chat_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::types::{Role, ToolInvocation};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays a fixed script and records every request
    #[derive(Default)]
    struct Scripted {
        script: Mutex<Vec<CoreResult<TurnEvent>>>,
        calls: AtomicUsize,
        last: Mutex<Option<TurnRequest>>,
    }

    impl Scripted {
        fn with(events: Vec<CoreResult<TurnEvent>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(events),
                ..Default::default()
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TurnInvoker for Scripted {
        fn invoke(&self, request: TurnRequest) -> BoxStream<'static, CoreResult<TurnEvent>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request);
            let events = self.script.lock().unwrap().clone();
            futures::stream::iter(events).boxed()
        }
    }

    fn answer(text: &str) -> Vec<CoreResult<TurnEvent>> {
        vec![
            Ok(TurnEvent::TextDelta { text: text.into() }),
            Ok(TurnEvent::Finish {
                reason: FinishReason::Stop,
            }),
        ]
    }

    #[tokio::test]
    async fn test_append_runs_turn() {
        let invoker = Scripted::with(answer("Hello"));
        let mut session = ChatSession::new(invoker.clone(), "openai:gpt-4o", true);

        let outcome = session.append("hi").await.unwrap();
        assert_eq!(outcome, TurnOutcome::Completed);
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].role, Role::Assistant);
        assert_eq!(session.messages()[1].content, "Hello");
        assert_eq!(invoker.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_append_is_noop() {
        let invoker = Scripted::with(answer("x"));
        let mut session = ChatSession::new(invoker.clone(), "openai:gpt-4o", true);

        assert_eq!(session.append("  \n\t").await.unwrap(), TurnOutcome::Unchanged);
        assert!(session.messages().is_empty());
        assert_eq!(invoker.calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_surfaces_and_keeps_history() {
        let invoker = Scripted::with(vec![
            Ok(TurnEvent::TextDelta { text: "par".into() }),
            Err(CoreError::Upstream("gone".into())),
        ]);
        let mut session = ChatSession::new(invoker, "openai:gpt-4o", true);

        let err = session.append("hi").await.unwrap_err();
        assert_eq!(err, CoreError::Upstream("gone".into()));
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].content, "par");
    }

    #[tokio::test]
    async fn test_related_questions_are_kept_and_selectable() {
        let mut events = answer("A");
        events.insert(
            1,
            Ok(TurnEvent::RelatedQuestions {
                items: vec!["q1?".into(), "q2?".into(), "q3?".into()],
            }),
        );
        let invoker = Scripted::with(events);
        let mut session = ChatSession::new(invoker.clone(), "openai:gpt-4o", true);

        session.append("hi").await.unwrap();
        assert_eq!(session.related().len(), 3);

        session.select_related(1).await.unwrap();
        assert_eq!(session.messages()[2].content, "q2?");
        assert_eq!(session.select_related(9).await.unwrap(), TurnOutcome::Unchanged);
    }

    #[tokio::test]
    async fn test_question_round_trip() {
        let invoker = Scripted::with(vec![
            Ok(TurnEvent::ToolCall {
                invocation: ToolInvocation::call(
                    "q1",
                    ASK_QUESTION_TOOL,
                    json!({ "question": "Which city?" }),
                ),
            }),
            Ok(TurnEvent::Finish {
                reason: FinishReason::AwaitingInput,
            }),
        ]);
        let mut session = ChatSession::new(invoker.clone(), "openai:gpt-4o", true);

        let outcome = session.append("weather?").await.unwrap();
        assert_eq!(
            outcome,
            TurnOutcome::AwaitingInput {
                tool_call_id: "q1".into()
            }
        );

        *invoker.script.lock().unwrap() = answer("Sunny");
        session
            .resolve_question("q1", QuestionOutcome::Declined)
            .await
            .unwrap();
        assert!(session.pending_question().is_none());

        let sent = invoker.last.lock().unwrap().clone().unwrap();
        let inv = sent.messages[1].tool_invocations().next().unwrap().clone();
        assert!(inv.is_resolved());

        // Resolving twice does nothing
        assert_eq!(
            session
                .resolve_question("q1", QuestionOutcome::Skipped)
                .await
                .unwrap(),
            TurnOutcome::Unchanged
        );
    }

    #[tokio::test]
    async fn test_new_chat_resets_locally() {
        let invoker = Scripted::with(answer("A"));
        let mut session = ChatSession::new(invoker.clone(), "openai:gpt-4o", true);
        session.append("hi").await.unwrap();
        let old_id = session.id().to_string();

        session.new_chat();
        assert!(session.messages().is_empty());
        assert_ne!(session.id(), old_id);
        assert_eq!(invoker.calls(), 1);
    }

    fn four_turns() -> Vec<Message> {
        let mut a0 = Message::assistant().with_id("a0");
        a0.push_text("first answer");
        let mut a1 = Message::assistant().with_id("a1");
        a1.push_text("second answer");
        vec![
            Message::user("first").with_id("u0"),
            a0,
            Message::user("second").with_id("u1"),
            a1,
        ]
    }

    fn sent_ids(invoker: &Scripted) -> Vec<String> {
        let last = invoker.last.lock().unwrap();
        let request = last.as_ref().expect("an invocation");
        request.messages.iter().map(|m| m.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_reload_from_earlier_user_message_keeps_prefix() {
        let invoker = Scripted::with(answer("again"));
        let mut session = ChatSession::new(invoker.clone(), "openai:gpt-4o", true);
        session.load(Chat::new("c", "u", "t", four_turns()));

        session.reload_from("a1").await.unwrap();
        assert_eq!(sent_ids(&invoker), vec!["u0", "a0", "u1"]);

        let invoker = Scripted::with(answer("again"));
        let mut session = ChatSession::new(invoker.clone(), "openai:gpt-4o", true);
        session.load(Chat::new("c", "u", "t", four_turns()));

        session.reload_from("u1").await.unwrap();
        assert_eq!(sent_ids(&invoker), vec!["u0"]);
        assert_eq!(session.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_reload_from_first_user_message_keeps_history() {
        let invoker = Scripted::with(answer("again"));
        let mut session = ChatSession::new(invoker.clone(), "openai:gpt-4o", true);
        session.load(Chat::new("c", "u", "t", four_turns()));

        let outcome = session.reload_from("u0").await.unwrap();
        assert_eq!(outcome, TurnOutcome::Completed);
        assert_eq!(sent_ids(&invoker), vec!["u0", "a0", "u1", "a1"]);
        assert_eq!(session.messages().len(), 5);
    }

    #[tokio::test]
    async fn test_reload_from_unknown_id_reinvokes_full_history() {
        let invoker = Scripted::with(answer("again"));
        let mut session = ChatSession::new(invoker.clone(), "openai:gpt-4o", true);
        session.load(Chat::new("c", "u", "t", four_turns()));

        let outcome = session.reload_from("gone").await.unwrap();
        assert_eq!(outcome, TurnOutcome::Completed);
        assert_eq!(invoker.calls(), 1);
        assert_eq!(sent_ids(&invoker), vec!["u0", "a0", "u1", "a1"]);
    }

    #[tokio::test]
    async fn test_edit_of_unknown_id_does_not_invoke() {
        let invoker = Scripted::with(answer("again"));
        let mut session = ChatSession::new(invoker.clone(), "openai:gpt-4o", true);
        session.load(Chat::new("c", "u", "t", four_turns()));

        let outcome = session.edit_and_regenerate("gone", "x").await.unwrap();
        assert_eq!(outcome, TurnOutcome::Unchanged);
        assert_eq!(invoker.calls(), 0);
        assert_eq!(session.messages().len(), 4);
    }

    #[tokio::test]
    async fn test_stop_keeps_partial_answer() {
        struct Endless;
        impl TurnInvoker for Endless {
            fn invoke(&self, _request: TurnRequest) -> BoxStream<'static, CoreResult<TurnEvent>> {
                futures::stream::iter(vec![Ok(TurnEvent::TextDelta { text: "Par".into() })])
                    .chain(futures::stream::pending())
                    .boxed()
            }
        }

        let mut session = ChatSession::new(Arc::new(Endless), "openai:gpt-4o", true);
        let mut rx = session.subscribe();
        let stop = session.stop_handle();
        tokio::spawn(async move {
            if rx.recv().await.is_some() {
                stop.stop();
            }
        });

        let outcome = session.append("hi").await.unwrap();
        assert_eq!(outcome, TurnOutcome::Stopped);
        assert_eq!(session.messages()[1].content, "Par");
    }
}
