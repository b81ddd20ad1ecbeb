//! Web search via Tavily

use std::sync::Arc;

use async_trait::async_trait;
use cluezy_core::traits::tools::ToolResult;
use cluezy_core::types::output::{SearchResultItem, SearchResults};
use cluezy_core::types::ToolOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;
use validator::Validate;

use crate::http::{endpoint, require_key, ApiClient};
use crate::schema::{parameters_schema, parse_args};
use crate::tool::Tool;

pub const NAME: &str = "search";

/// Search depth offered by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    #[default]
    Basic,
    Advanced,
}

/// Arguments of the `search` tool
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct SearchParams {
    /// The query to search for
    #[validate(length(min = 1))]
    pub query: String,
    /// The maximum number of results to return
    #[serde(default = "default_max_results")]
    #[validate(range(min = 1, max = 20))]
    pub max_results: u32,
    /// The depth of the search
    #[serde(default)]
    pub search_depth: SearchDepth,
    /// Only return results from these domains
    #[serde(default)]
    pub include_domains: Vec<String>,
    /// Never return results from these domains
    #[serde(default)]
    pub exclude_domains: Vec<String>,
}

fn default_max_results() -> u32 {
    20
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<SearchResultItem>,
    #[serde(default)]
    images: Vec<Value>,
}

/// Tavily-backed web search
pub struct SearchTool {
    client: Arc<ApiClient>,
}

impl SearchTool {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    async fn search(&self, params: SearchParams) -> ToolResult<SearchResults> {
        let config = self.client.config();
        let key = require_key(&config.tavily_api_key, "TAVILY_API_KEY")?;
        let url = endpoint(&config.endpoints.tavily, "search");

        let body = json!({
            "api_key": key,
            "query": params.query,
            "max_results": params.max_results,
            "search_depth": params.search_depth,
            "include_images": true,
            "include_domains": params.include_domains,
            "exclude_domains": params.exclude_domains,
        });
        let response: TavilyResponse = self.client.send_json(self.client.post(&url).json(&body)).await?;

        // images come back as plain URLs or as {url, description}
        let images = response
            .images
            .into_iter()
            .filter_map(|image| match image {
                Value::String(url) => Some(url),
                Value::Object(map) => map.get("url").and_then(Value::as_str).map(String::from),
                _ => None,
            })
            .collect();

        debug!(results = response.results.len(), "Search complete");
        Ok(SearchResults {
            number_of_results: Some(response.results.len()),
            query: params.query,
            results: response.results,
            images,
        })
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Search the web for information"
    }

    fn parameters(&self, strict: bool) -> Value {
        parameters_schema::<SearchParams>(strict)
    }

    async fn execute(&self, args: Value) -> ToolResult<ToolOutput> {
        let params: SearchParams = parse_args(args)?;
        Ok(ToolOutput::Search(self.search(params).await?))
    }
}
