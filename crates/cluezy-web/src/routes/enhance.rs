//! Prompt enhancement

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use cluezy_core::agent::PROMPT_NOT_FOUND;
use serde_json::{json, Value};
use tracing::error;

use crate::{AppState, Result, WebError};

pub const ENHANCE_FAILED: &str = "Error generating prompt";

pub fn enhance_routes() -> Router<AppState> {
    Router::new().route("/api/enhance-prompt", post(enhance_prompt))
}

async fn enhance_prompt(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>> {
    let prompt = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|v| v.get("prompt").and_then(Value::as_str).map(String::from))
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| WebError::status(StatusCode::NOT_FOUND, PROMPT_NOT_FOUND))?;

    let enhanced = state.enhancer.enhance(&prompt).await.map_err(|e| {
        error!(error = %e, "Prompt enhancement failed");
        WebError::status(StatusCode::INTERNAL_SERVER_ERROR, ENHANCE_FAILED)
    })?;

    Ok(Json(json!({ "enhancedPrompt": enhanced })))
}
