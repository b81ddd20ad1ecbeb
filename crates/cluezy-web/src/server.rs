use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, HeaderValue, Method, StatusCode};
use axum::routing::get_service;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::routes::{chat_routes, enhance_routes, health_routes, history_routes};
use crate::{AppState, Result, WebConfig, WebError, USER_ID_HEADER};

const MAX_BODY_SIZE_10MB: usize = 10 * 1024 * 1024;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(USER_ID_HEADER),
        ])
}

fn static_routes(dir: &str) -> Router {
    info!("Serving static assets from: {}", dir);
    Router::new().fallback_service(
        get_service(ServeDir::new(dir).append_index_html_on_directories(true))
            .handle_error(|_| async { StatusCode::INTERNAL_SERVER_ERROR }),
    )
}

/// Assemble every route over `state`
pub fn build_router(state: AppState, config: &WebConfig) -> Router {
    let mut app = Router::new()
        .merge(chat_routes())
        .merge(history_routes())
        .merge(enhance_routes())
        .merge(health_routes())
        .with_state(state);

    if let Some(dir) = config.static_dir.as_deref() {
        app = app.merge(static_routes(dir));
    }

    app.layer(DefaultBodyLimit::max(MAX_BODY_SIZE_10MB))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
}

pub async fn start_server(state: AppState, config: &WebConfig) -> Result<()> {
    let app = build_router(state, config);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| WebError::Config(format!("Invalid address: {e}")))?;

    info!("Starting web server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(WebError::Io)?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(WebError::Io)?;

    info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_origin_is_skipped() {
        // Building the layer must not panic on a bad entry
        let _ = cors_layer(&["http://localhost:3000".to_string(), "bad\norigin".to_string()]);
    }
}
