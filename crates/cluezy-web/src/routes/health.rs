//! Liveness and readiness endpoints

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::debug;

use crate::AppState;

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "cluezy-web"
    }))
}

/// Ready once a model key is configured. Missing tool keys are reported
/// but only degrade the affected tools.
async fn ready_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let model_key = state.config.chat.has_api_key();
    let checks = json!({
        "model_api_key": model_key,
        "search_api_key": state.config.tools.has_search_key(),
        "chat_history": state.saving_enabled(),
    });

    if model_key {
        (StatusCode::OK, Json(json!({ "status": "ready", "checks": checks })))
    } else {
        debug!("Readiness check failed: no model API key");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not_ready", "checks": checks })),
        )
    }
}
