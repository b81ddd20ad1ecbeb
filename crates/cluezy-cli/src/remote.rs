//! Client for a running Cluezy server
//!
//! [`RemoteApi`] plays both collaborator roles the chat session needs:
//! [`TurnInvoker`] over the streaming `POST /api/chat` endpoint and
//! [`HistorySource`] over `GET /api/chats`.

use async_trait::async_trait;
use cluezy_core::{
    Chat, ChatPage, CoreError, CoreResult, HistorySource, TurnEvent, TurnInvoker, TurnRequest,
};
use cluezy_llm::SseDecoder;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

/// Header carrying the requesting user
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct RemoteApi {
    http: Client,
    base_url: String,
    user_id: Option<String>,
}

impl RemoteApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_chat(&self, chat_id: &str) -> CoreResult<Chat> {
        let response = send(self.request(reqwest::Method::GET, &chat_path(chat_id))).await?;
        decode(response).await
    }

    pub async fn delete_chat(&self, chat_id: &str) -> CoreResult<()> {
        send(self.request(reqwest::Method::DELETE, &chat_path(chat_id))).await?;
        Ok(())
    }

    pub async fn rename_chat(&self, chat_id: &str, title: &str) -> CoreResult<()> {
        let request = self
            .request(reqwest::Method::PATCH, &chat_path(chat_id))
            .json(&json!({ "title": title }));
        send(request).await?;
        Ok(())
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.user_id {
            Some(user) => request.header(USER_ID_HEADER, user),
            None => request,
        }
    }
}

fn chat_path(chat_id: &str) -> String {
    format!("/api/chat/{}", urlencoding::encode(chat_id))
}

/// Send and map a non-2xx reply onto the core error taxonomy
async fn send(request: RequestBuilder) -> CoreResult<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| CoreError::Upstream(format!("Request failed: {e}")))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or_else(|_| format!("{status} {body}"));
    debug!(%status, %message, "Server returned an error");

    Err(match status {
        StatusCode::BAD_REQUEST => CoreError::Validation(message),
        StatusCode::FORBIDDEN => CoreError::FeatureDisabled(message),
        StatusCode::NOT_FOUND => CoreError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => CoreError::RateLimited(message),
        _ => CoreError::upstream(message),
    })
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> CoreResult<T> {
    response
        .json()
        .await
        .map_err(|e| CoreError::Upstream(format!("Invalid response: {e}")))
}

fn parse_event(payload: &str) -> Option<TurnEvent> {
    match serde_json::from_str(payload) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!(error = %e, "Skipping unreadable chat event");
            None
        }
    }
}

impl TurnInvoker for RemoteApi {
    /// Stream a turn from the server
    ///
    /// An `error` event is passed through as-is; folding it into the session
    /// turns it into an `Err`.
    fn invoke(&self, request: TurnRequest) -> BoxStream<'static, CoreResult<TurnEvent>> {
        let body = json!({
            "id": request.chat_id,
            "messages": request.messages,
            "model": request.model,
            "searchMode": request.search_mode,
        });
        let builder = self.request(reqwest::Method::POST, "/api/chat").json(&body);

        let stream = async_stream::stream! {
            let response = match send(builder).await {
                Ok(response) => response,
                Err(err) => {
                    yield Err(err);
                    return;
                }
            };

            let mut decoder = SseDecoder::default();
            let mut bytes = response.bytes_stream();
            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(CoreError::Upstream(format!("Stream interrupted: {e}")));
                        return;
                    }
                };
                for payload in decoder.push(&chunk) {
                    if let Some(event) = parse_event(&payload) {
                        yield Ok(event);
                    }
                }
            }
            if let Some(event) = decoder.finish().as_deref().and_then(parse_event) {
                yield Ok(event);
            }
        };

        stream.boxed()
    }
}

#[async_trait]
impl HistorySource for RemoteApi {
    async fn fetch_page(&self, offset: usize, limit: usize) -> CoreResult<ChatPage> {
        let request = self
            .request(reqwest::Method::GET, "/api/chats")
            .query(&[("offset", offset), ("limit", limit)]);
        decode(send(request).await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_path_is_encoded() {
        assert_eq!(chat_path("a b/c"), "/api/chat/a%20b%2Fc");
    }

    #[test]
    fn test_base_url_is_normalised() {
        assert_eq!(RemoteApi::new("http://localhost:3000/").base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_parse_event_skips_garbage() {
        assert!(parse_event("not json").is_none());
        assert_eq!(
            parse_event(r#"{"type":"text_delta","text":"Hi"}"#),
            Some(TurnEvent::TextDelta { text: "Hi".into() })
        );
    }
}
