//! `cluezy chat`: terminal client over the HTTP API

mod input;
mod render;

pub use input::Input;

use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use cluezy_core::{
    ChatPage, ChatSession, CoreError, CoreResult, HistoryCache, Message, SearchModePreference,
    StopHandle, TurnEvent, TurnOutcome,
};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use crate::remote::RemoteApi;

/// Chats fetched per history page
pub const HISTORY_PAGE_SIZE: usize = 20;

const DAILY_LIMIT: &str =
    "You have reached the daily limit for questions. Please try again later.";

pub struct ChatOptions {
    pub server: String,
    pub model: String,
    pub user: Option<String>,
    pub resume: Option<String>,
}

struct Repl {
    api: RemoteApi,
    history: HistoryCache<RemoteApi>,
    session: ChatSession,
    events: UnboundedReceiver<TurnEvent>,
    stop: StopHandle,
    preference: Option<SearchModePreference>,
}

pub async fn execute(options: ChatOptions) -> Result<()> {
    let mut api = RemoteApi::new(&options.server);
    if let Some(user) = &options.user {
        api = api.with_user(user);
    }

    let preference = SearchModePreference::default_location();
    let search_mode = preference.as_ref().map_or(true, SearchModePreference::load);
    let mut session = ChatSession::new(Arc::new(api.clone()), options.model.clone(), search_mode);
    let events = session.subscribe();
    let stop = session.stop_handle();

    let mut repl = Repl {
        history: HistoryCache::new(api.clone()),
        api,
        session,
        events,
        stop,
        preference,
    };

    println!(
        "cluezy chat ({}, model {}, search {}). /help for commands.",
        repl.api.base_url(),
        options.model,
        on_off(search_mode)
    );
    if let Some(id) = &options.resume {
        repl.open(id).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        if !repl.handle(Input::parse(&line)).await {
            break;
        }
    }

    println!();
    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

/// Full id of the message whose id is `prefix` or starts with it, if unique
fn resolve_message_id(messages: &[Message], prefix: &str) -> String {
    if messages.iter().any(|m| m.id == prefix) {
        return prefix.to_string();
    }
    let mut matches = messages.iter().filter(|m| m.id.starts_with(prefix));
    match (matches.next(), matches.next()) {
        (Some(only), None) => only.id.clone(),
        _ => prefix.to_string(),
    }
}

fn resolve_chat_id(page: &ChatPage, prefix: &str) -> String {
    if page.chats.iter().any(|c| c.id == prefix) {
        return prefix.to_string();
    }
    let mut matches = page.chats.iter().filter(|c| c.id.starts_with(prefix));
    match (matches.next(), matches.next()) {
        (Some(only), None) => only.id.clone(),
        _ => prefix.to_string(),
    }
}

/// Arguments of the invocation `tool_call_id`
fn invocation_args(messages: &[Message], tool_call_id: &str) -> Value {
    messages
        .iter()
        .rev()
        .flat_map(|m| m.tool_invocations())
        .find(|inv| inv.tool_call_id == tool_call_id)
        .map(|inv| inv.args.clone())
        .unwrap_or(Value::Null)
}

/// Prints streamed events as they arrive
#[derive(Default)]
struct Printer {
    mid_line: bool,
}

impl Printer {
    fn event(&mut self, event: &TurnEvent) {
        match event {
            TurnEvent::TextDelta { text } => {
                print!("{text}");
                let _ = std::io::stdout().flush();
                self.mid_line = !text.ends_with('\n');
            }
            TurnEvent::ToolCall { invocation } => {
                self.line(&format!("  {}", render::tool_call(invocation)));
            }
            TurnEvent::ToolResult { result, .. } => {
                self.line(&format!("    -> {}", render::tool_result(result)));
            }
            TurnEvent::StepFinish { step } => debug!(step, "Step finished"),
            TurnEvent::RelatedQuestions { .. } | TurnEvent::Error { .. } => {}
            TurnEvent::Finish { reason } => debug!(?reason, "Turn finished"),
        }
    }

    fn line(&mut self, text: &str) {
        if self.mid_line {
            println!();
            self.mid_line = false;
        }
        println!("{text}");
    }

    fn end(&mut self) {
        if self.mid_line {
            println!();
            self.mid_line = false;
        }
    }
}

/// Await a session operation while printing its events
///
/// Ctrl-C stops the stream; the session keeps the partial answer.
async fn drive<F>(turn: F, events: &mut UnboundedReceiver<TurnEvent>, stop: &StopHandle) -> CoreResult<TurnOutcome>
where
    F: Future<Output = CoreResult<TurnOutcome>>,
{
    tokio::pin!(turn);
    let mut printer = Printer::default();

    let result = loop {
        tokio::select! {
            result = &mut turn => break result,
            Some(event) = events.recv() => printer.event(&event),
            _ = tokio::signal::ctrl_c() => stop.stop(),
        }
    };

    while let Ok(event) = events.try_recv() {
        printer.event(&event);
    }
    printer.end();
    result
}

impl Repl {
    /// Run one input; `false` ends the loop
    async fn handle(&mut self, input: Input) -> bool {
        match input {
            Input::Message(text) => {
                let turn = self.session.append(&text);
                let result = drive(turn, &mut self.events, &self.stop).await;
                self.finish(result).await;
            }
            Input::Edit { id, text } => {
                let id = resolve_message_id(self.session.messages(), &id);
                let turn = self.session.edit_and_regenerate(&id, &text);
                let result = drive(turn, &mut self.events, &self.stop).await;
                self.finish(result).await;
            }
            Input::Reload { id } => {
                let id = resolve_message_id(self.session.messages(), &id);
                let turn = self.session.reload_from(&id);
                let result = drive(turn, &mut self.events, &self.stop).await;
                self.finish(result).await;
            }
            Input::Related(n) => {
                let turn = self.session.select_related(n - 1);
                let result = drive(turn, &mut self.events, &self.stop).await;
                self.finish(result).await;
            }
            Input::Answer(text) => {
                let args = self
                    .session
                    .pending_question()
                    .map(|id| invocation_args(self.session.messages(), id));
                let outcome = render::answer(args.as_ref().unwrap_or(&Value::Null), &text);
                self.settle(outcome).await;
            }
            Input::Decline => self.settle(cluezy_core::QuestionOutcome::Declined).await,
            Input::Skip => self.settle(cluezy_core::QuestionOutcome::Skipped).await,
            Input::New => {
                self.session.new_chat();
                println!("New chat {}.", render::short_id(self.session.id()));
            }
            Input::Search(setting) => {
                let enabled = setting.unwrap_or(!self.session.search_mode());
                self.session.set_search_mode(enabled);
                if let Some(preference) = &self.preference {
                    if let Err(e) = preference.save(enabled) {
                        warn!(error = %e, "Failed to save search-mode preference");
                    }
                }
                println!("Search mode {}.", on_off(enabled));
            }
            Input::History => match self.history.get(0, HISTORY_PAGE_SIZE).await {
                Ok(page) => println!("{}", render::history(&page)),
                Err(e) => report(&e),
            },
            Input::More => {
                if self.history.has_more().await {
                    match self.history.load_more(HISTORY_PAGE_SIZE).await {
                        Ok(page) => println!("{}", render::history(&page)),
                        Err(e) => report(&e),
                    }
                } else {
                    println!("No more chats.");
                }
            }
            Input::Open { id } => {
                let id = self.chat_id(&id).await;
                self.open(&id).await;
            }
            Input::Show => {
                let sections = self.session.sections();
                if sections.is_empty() {
                    println!("Nothing yet.");
                } else {
                    println!("{}", render::conversation(&sections));
                }
            }
            Input::Rename { id, title } => {
                let id = self.chat_id(&id).await;
                match self.api.rename_chat(&id, &title).await {
                    Ok(()) => {
                        self.history.invalidate().await;
                        println!("Chat title updated successfully.");
                    }
                    Err(e) => report(&e),
                }
            }
            Input::Delete { id } => {
                let id = self.chat_id(&id).await;
                match self.api.delete_chat(&id).await {
                    Ok(()) => {
                        self.history.invalidate().await;
                        if self.session.id() == id {
                            self.session.new_chat();
                        }
                        println!("Deleted.");
                    }
                    Err(e) => report(&e),
                }
            }
            Input::Help => println!("{}", input::HELP),
            Input::Invalid(usage) => println!("{usage}"),
            Input::Quit => return false,
        }
        true
    }

    async fn settle(&mut self, outcome: cluezy_core::QuestionOutcome) {
        let Some(id) = self.session.pending_question().map(str::to_string) else {
            println!("No question is waiting for an answer.");
            return;
        };
        let turn = self.session.resolve_question(&id, outcome);
        let result = drive(turn, &mut self.events, &self.stop).await;
        self.finish(result).await;
    }

    async fn open(&mut self, id: &str) {
        match self.api.get_chat(id).await {
            Ok(chat) => {
                println!("Opened \"{}\".", chat.title);
                self.session.load(chat);
                let sections = self.session.sections();
                if !sections.is_empty() {
                    println!("{}", render::conversation(&sections));
                }
            }
            Err(e) => report(&e),
        }
    }

    async fn chat_id(&self, prefix: &str) -> String {
        match self.history.get(0, HISTORY_PAGE_SIZE).await {
            Ok(page) => resolve_chat_id(&page, prefix),
            Err(_) => prefix.to_string(),
        }
    }

    async fn finish(&mut self, result: CoreResult<TurnOutcome>) {
        match result {
            Ok(TurnOutcome::Unchanged) => println!("Nothing to do."),
            Ok(TurnOutcome::Stopped) => {
                println!("(stopped)");
                self.history.invalidate().await;
            }
            Ok(TurnOutcome::Completed) => {
                if !self.session.related().is_empty() {
                    println!("{}", render::related(self.session.related()));
                }
                self.history.invalidate().await;
            }
            Ok(TurnOutcome::AwaitingInput { tool_call_id }) => {
                let args = invocation_args(self.session.messages(), &tool_call_id);
                println!("{}", render::question(&args));
                self.history.invalidate().await;
            }
            Err(e) => report(&e),
        }
    }
}

fn report(err: &CoreError) {
    if err.is_rate_limit() {
        println!("{DAILY_LIMIT}");
        return;
    }
    match err {
        CoreError::Validation(m) | CoreError::NotFound(m) | CoreError::FeatureDisabled(m) => {
            println!("{m}")
        }
        other => println!("Error: {other}"),
    }
}
