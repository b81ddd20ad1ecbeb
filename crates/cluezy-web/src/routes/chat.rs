//! Streaming chat endpoint

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::post;
use axum::{Json, Router};
use cluezy_core::session::TurnState;
use cluezy_core::traits::StoreError;
use cluezy_core::{Chat, ChatStore, CoreError, Message, ModelId, TurnEvent, TurnRequest};
use futures::stream::Stream;
use futures::StreamExt;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::{AppState, CurrentUser, Result};

/// Longest title derived from the first user message
pub const TITLE_MAX_CHARS: usize = 100;

/// Body of `POST /api/chat`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub search_mode: Option<bool>,
}

pub fn chat_routes() -> Router<AppState> {
    Router::new().route("/api/chat", post(chat_handler))
}

fn sse_event(event: &TurnEvent) -> Event {
    Event::default()
        .event(event.name())
        .data(serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string()))
}

/// Message text shown to the client for a failed turn
fn client_message(err: &CoreError) -> String {
    match err {
        CoreError::Upstream(msg) | CoreError::RateLimited(msg) => msg.clone(),
        other => other.to_string(),
    }
}

fn derive_title(messages: &[Message]) -> String {
    messages
        .iter()
        .find(|m| m.is_user())
        .map(|m| m.content.trim().chars().take(TITLE_MAX_CHARS).collect())
        .unwrap_or_default()
}

/// Store the finished turn; an existing chat keeps its title and creation time
async fn save_turn(
    store: &dyn ChatStore,
    chat_id: &str,
    user: &str,
    messages: Vec<Message>,
) -> std::result::Result<(), StoreError> {
    let chat = match store.get(chat_id, user).await {
        Ok(mut existing) => {
            existing.messages = messages;
            existing
        }
        Err(StoreError::NotFound(_)) => {
            let title = derive_title(&messages);
            Chat::new(chat_id, user, title, messages)
        }
        Err(err) => return Err(err),
    };
    store.save(chat).await
}

/// Run one turn and stream its events
async fn chat_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = std::result::Result<Event, Infallible>>>> {
    match request.messages.last() {
        None => return Err(CoreError::Validation("Messages are required".to_string()).into()),
        Some(last) if last.is_user() && last.content.trim().is_empty() => {
            return Err(CoreError::Validation("Message cannot be empty".to_string()).into());
        }
        Some(_) => {}
    }

    let model = request
        .model
        .unwrap_or_else(|| state.config.chat.model.clone());
    ModelId::parse(&model)?;

    let chat_id = request
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let search_mode = request.search_mode.unwrap_or(true);
    info!(%chat_id, %user, %model, search_mode, "Chat turn requested");

    let mut events = state.invoker.invoke(TurnRequest {
        chat_id: chat_id.clone(),
        messages: request.messages.clone(),
        model,
        search_mode,
    });
    let mut messages = request.messages;
    let store = state.store.clone();
    let saving = state.saving_enabled();

    let stream = async_stream::stream! {
        let mut turn = TurnState::new();
        while let Some(item) = events.next().await {
            match item {
                Ok(event) => {
                    yield Ok::<_, Infallible>(sse_event(&event));
                    if let Err(err) = turn.apply(&mut messages, event) {
                        warn!(%chat_id, error = %err, "Turn reported an error");
                        break;
                    }
                }
                Err(err) => {
                    warn!(%chat_id, error = %err, "Turn failed");
                    yield Ok::<_, Infallible>(sse_event(&TurnEvent::Error { message: client_message(&err) }));
                    break;
                }
            }
        }

        if saving && turn.finish_reason().is_some() {
            if let Err(err) = save_turn(store.as_ref(), &chat_id, &user, messages).await {
                error!(%chat_id, error = %err, "Failed to save chat");
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
