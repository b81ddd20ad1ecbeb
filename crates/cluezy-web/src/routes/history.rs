//! Saved chats: list, fetch, rename, delete

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use cluezy_core::{Chat, ChatPage, CoreError};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{AppState, CurrentUser, Result};

/// Page size when the query names none
pub const DEFAULT_LIMIT: usize = 20;

/// Largest page a client may request
pub const MAX_LIMIT: usize = 100;

pub fn history_routes() -> Router<AppState> {
    Router::new()
        .route("/api/chats", get(list_chats))
        .route(
            "/api/chat/{id}",
            get(get_chat).delete(delete_chat).patch(rename_chat),
        )
}

#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    offset: Option<usize>,
    limit: Option<usize>,
}

async fn list_chats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ChatPage>> {
    if !state.saving_enabled() {
        return Ok(Json(ChatPage::default()));
    }

    let offset = query.offset.unwrap_or(0);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let page = state
        .store
        .list(&user, offset, limit)
        .await
        .map_err(CoreError::from)?;
    Ok(Json(page))
}

async fn get_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Chat>> {
    let chat = state.store.get(&id, &user).await.map_err(CoreError::from)?;
    Ok(Json(chat))
}

async fn delete_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state.gateway.delete(&id, &user).await?;
    Ok(Json(json!({ "ok": true })))
}

/// The body is read leniently: a missing, non-string or unparsable `title`
/// is reported as an invalid title rather than a JSON rejection
async fn rename_chat(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>> {
    let title = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|v| v.get("title").and_then(Value::as_str).map(String::from))
        .unwrap_or_default();

    state.gateway.rename(&id, &title, &user).await?;
    Ok(Json(json!({ "ok": true, "message": "Chat title updated successfully." })))
}
