//! Visual product search via Serper Lens

use std::sync::Arc;

use async_trait::async_trait;
use cluezy_core::traits::tools::ToolResult;
use cluezy_core::types::output::{ProductMatch, ProductSearchResults};
use cluezy_core::types::ToolOutput;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::http::{endpoint, require_key, ApiClient};
use crate::schema::{parameters_schema, parse_args};
use crate::tool::Tool;

pub const NAME: &str = "productSearch";

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct ProductSearchParams {
    /// Image URL of the product to find
    #[validate(url)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LensResponse {
    #[serde(default, alias = "organic")]
    visual_matches: Vec<ProductMatch>,
}

pub struct ProductSearchTool {
    client: Arc<ApiClient>,
}

impl ProductSearchTool {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ProductSearchTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Find products visually matching an image URL"
    }

    fn parameters(&self, _strict: bool) -> Value {
        parameters_schema::<ProductSearchParams>(false)
    }

    async fn execute(&self, args: Value) -> ToolResult<ToolOutput> {
        let params: ProductSearchParams = parse_args(args)?;
        let config = self.client.config();
        let key = require_key(&config.serper_api_key, "SERPER_API_KEY")?;

        let request = self
            .client
            .post(&endpoint(&config.endpoints.serper, "lens"))
            .header("X-API-KEY", key)
            .json(&json!({ "url": params.url }));
        let response: LensResponse = self.client.send_json(request).await?;

        Ok(ToolOutput::ProductSearch(ProductSearchResults {
            url: params.url,
            visual_matches: response.visual_matches,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cluezy_config::{ToolEndpoints, ToolsConfig};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_lens_matches() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/lens"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "organic": [{
                    "title": "Trail shoe",
                    "link": "https://shop.example/shoe",
                    "source": "Shop",
                    "price": "$120",
                    "imageUrl": "https://shop.example/shoe.jpg"
                }]
            })))
            .mount(&server)
            .await;

        let config = ToolsConfig {
            serper_api_key: Some("serper-1".into()),
            endpoints: ToolEndpoints::all(server.uri()),
            ..Default::default()
        };
        let tool = ProductSearchTool::new(Arc::new(ApiClient::new(config).unwrap()));
        let out = tool
            .execute(json!({ "url": "https://img.example/shoe.png" }))
            .await
            .unwrap();

        let ToolOutput::ProductSearch(results) = out else {
            panic!("expected product output");
        };
        assert_eq!(results.visual_matches[0].price.as_deref(), Some("$120"));
        assert_eq!(results.url, "https://img.example/shoe.png");
    }
}
