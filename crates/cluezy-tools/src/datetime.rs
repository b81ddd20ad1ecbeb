//! Current date and time via WorldTimeAPI

use std::sync::Arc;

use async_trait::async_trait;
use cluezy_core::traits::tools::ToolResult;
use cluezy_core::types::output::DateTimeInfo;
use cluezy_core::types::ToolOutput;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::http::{endpoint, ApiClient};
use crate::schema::{parameters_schema, parse_args};
use crate::tool::Tool;

pub const NAME: &str = "datetime";

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct DateTimeParams {
    /// IANA timezone such as "Europe/Berlin"
    #[serde(default = "default_timezone")]
    #[validate(length(min = 1))]
    pub timezone: String,
}

fn default_timezone() -> String {
    "Etc/UTC".to_string()
}

#[derive(Debug, Deserialize)]
struct WorldTime {
    timezone: String,
    datetime: String,
    utc_offset: String,
    day_of_week: u32,
    week_number: u32,
    unixtime: i64,
}

pub struct DateTimeTool {
    client: Arc<ApiClient>,
}

impl DateTimeTool {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for DateTimeTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Get the current date and time in a timezone"
    }

    fn parameters(&self, _strict: bool) -> Value {
        parameters_schema::<DateTimeParams>(false)
    }

    async fn execute(&self, args: Value) -> ToolResult<ToolOutput> {
        let params: DateTimeParams = parse_args(args)?;
        let base = &self.client.config().endpoints.worldtime;
        // Zone names keep their slashes; each segment is escaped
        let zone: Vec<_> = params
            .timezone
            .trim()
            .split('/')
            .map(urlencoding::encode)
            .collect();
        let url = endpoint(base, &format!("api/timezone/{}", zone.join("/")));

        let time: WorldTime = self.client.send_json(self.client.get(&url)).await?;
        Ok(ToolOutput::Datetime(DateTimeInfo {
            timezone: time.timezone,
            datetime: time.datetime,
            utc_offset: time.utc_offset,
            day_of_week: time.day_of_week,
            week_number: time.week_number,
            unixtime: time.unixtime,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cluezy_config::{ToolEndpoints, ToolsConfig};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_defaults_to_utc() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/timezone/Etc/UTC"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "timezone": "Etc/UTC",
                "datetime": "2026-10-16T09:30:00.000000+00:00",
                "utc_offset": "+00:00",
                "day_of_week": 5,
                "week_number": 42,
                "unixtime": 1792143000
            })))
            .mount(&server)
            .await;

        let config = ToolsConfig {
            endpoints: ToolEndpoints::all(server.uri()),
            ..Default::default()
        };
        let tool = DateTimeTool::new(Arc::new(ApiClient::new(config).unwrap()));

        let out = tool.execute(json!({})).await.unwrap();
        let ToolOutput::Datetime(info) = out else {
            panic!("expected datetime output");
        };
        assert_eq!(info.week_number, 42);
        assert_eq!(info.utc_offset, "+00:00");
    }
}
