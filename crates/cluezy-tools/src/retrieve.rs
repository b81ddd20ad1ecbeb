//! Page retrieval via the Jina reader

use std::sync::Arc;

use async_trait::async_trait;
use cluezy_core::traits::tools::ToolResult;
use cluezy_core::types::output::{SearchResultItem, SearchResults};
use cluezy_core::types::ToolOutput;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::http::{endpoint, ApiClient};
use crate::schema::{parameters_schema, parse_args};
use crate::tool::Tool;

pub const NAME: &str = "retrieve";

/// Longest page body handed back to the model, in characters
const CONTENT_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct RetrieveParams {
    /// The URL to retrieve
    #[validate(url)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct ReaderResponse {
    data: ReaderPage,
}

#[derive(Debug, Deserialize)]
struct ReaderPage {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    url: Option<String>,
}

pub struct RetrieveTool {
    client: Arc<ApiClient>,
}

impl RetrieveTool {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for RetrieveTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Retrieve content from the web"
    }

    fn parameters(&self, _strict: bool) -> Value {
        parameters_schema::<RetrieveParams>(false)
    }

    async fn execute(&self, args: Value) -> ToolResult<ToolOutput> {
        let params: RetrieveParams = parse_args(args)?;
        let config = self.client.config();

        let mut request = self
            .client
            .get(&endpoint(&config.endpoints.jina, &params.url))
            .header("Accept", "application/json")
            .header("X-With-Generated-Alt", "true");
        if let Some(key) = config.jina_api_key.as_deref().filter(|k| !k.is_empty()) {
            request = request.bearer_auth(key);
        }

        let page = self.client.send_json::<ReaderResponse>(request).await?.data;
        if page.content.trim().is_empty() {
            return Ok(ToolOutput::error(NAME, format!("No content retrieved from {}", params.url)));
        }

        let content: String = page.content.chars().take(CONTENT_LIMIT).collect();
        Ok(ToolOutput::Retrieve(SearchResults {
            query: String::new(),
            results: vec![SearchResultItem {
                title: page.title,
                url: page.url.unwrap_or_else(|| params.url.clone()),
                content,
            }],
            images: Vec::new(),
            number_of_results: Some(1),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cluezy_config::{ToolEndpoints, ToolsConfig};
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tool(base: &str) -> RetrieveTool {
        let config = ToolsConfig {
            endpoints: ToolEndpoints::all(base),
            ..Default::default()
        };
        RetrieveTool::new(Arc::new(ApiClient::new(config).unwrap()))
    }

    #[tokio::test]
    async fn test_retrieve_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/https://example.com/post"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "data": { "title": "Post", "content": "Body text", "url": "https://example.com/post" }
            })))
            .mount(&server)
            .await;

        let out = tool(&server.uri())
            .execute(json!({ "url": "https://example.com/post" }))
            .await
            .unwrap();
        let ToolOutput::Retrieve(results) = out else {
            panic!("expected retrieve output");
        };
        assert_eq!(results.results[0].title, "Post");
        assert_eq!(results.results[0].content, "Body text");
    }

    #[tokio::test]
    async fn test_empty_page_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "content": "" } })))
            .mount(&server)
            .await;

        let out = tool(&server.uri())
            .execute(json!({ "url": "https://example.com" }))
            .await
            .unwrap();
        assert!(out.is_error());
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let err = tool("http://unused")
            .execute(json!({ "url": "not a url" }))
            .await
            .unwrap_err();
        assert!(matches!(err, cluezy_core::ToolError::InvalidParameters(_)));
    }
}
