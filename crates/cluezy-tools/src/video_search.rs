//! Video search via Serper

use std::sync::Arc;

use async_trait::async_trait;
use cluezy_core::traits::tools::ToolResult;
use cluezy_core::types::output::{VideoItem, VideoSearchResults};
use cluezy_core::types::ToolOutput;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::http::{endpoint, require_key, ApiClient};
use crate::schema::{parameters_schema, parse_args};
use crate::tool::Tool;

pub const NAME: &str = "videoSearch";

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct VideoSearchParams {
    /// The query to search for videos
    #[validate(length(min = 1))]
    pub query: String,
}

#[derive(Debug, Deserialize)]
struct SerperVideos {
    #[serde(default)]
    videos: Vec<VideoItem>,
}

pub struct VideoSearchTool {
    client: Arc<ApiClient>,
}

impl VideoSearchTool {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for VideoSearchTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Search for videos from YouTube"
    }

    fn parameters(&self, strict: bool) -> Value {
        parameters_schema::<VideoSearchParams>(strict)
    }

    async fn execute(&self, args: Value) -> ToolResult<ToolOutput> {
        let params: VideoSearchParams = parse_args(args)?;
        let config = self.client.config();
        let key = require_key(&config.serper_api_key, "SERPER_API_KEY")?;

        let request = self
            .client
            .post(&endpoint(&config.endpoints.serper, "videos"))
            .header("X-API-KEY", key)
            .json(&json!({ "q": params.query }));
        let response: SerperVideos = self.client.send_json(request).await?;

        Ok(ToolOutput::VideoSearch(VideoSearchResults {
            query: params.query,
            videos: response.videos,
        }))
    }
}
