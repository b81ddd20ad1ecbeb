//! Shared HTTP plumbing for tools

use std::time::Duration;

use cluezy_config::ToolsConfig;
use cluezy_core::traits::tools::{ToolError, ToolResult};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

/// HTTP client plus provider configuration, shared by every tool
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ToolsConfig,
}

impl ApiClient {
    pub fn new(config: ToolsConfig) -> ToolResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("cluezy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ToolError::Internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ToolsConfig {
        &self.config
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.http.get(url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.http.post(url)
    }

    /// Send and decode a JSON body; non-2xx statuses are upstream errors
    pub async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ToolResult<T> {
        Self::send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ToolError::Upstream(format!("invalid response: {e}")))
    }

    /// Send and read the body as text, e.g. an HTML page
    pub async fn send_text(&self, request: RequestBuilder) -> ToolResult<String> {
        Self::send(request)
            .await?
            .text()
            .await
            .map_err(|e| ToolError::Upstream(format!("invalid response: {e}")))
    }

    async fn send(request: RequestBuilder) -> ToolResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ToolError::Upstream(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::Upstream(format!(
                "Network response was not ok: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }
        Ok(response)
    }
}

/// `base` joined with `path`, tolerating a trailing slash on `base`
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// A configured key, or an upstream error naming the variable to set
pub fn require_key<'a>(key: &'a Option<String>, var: &str) -> ToolResult<&'a str> {
    key.as_deref()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| ToolError::Upstream(format!("{var} is not set")))
}
