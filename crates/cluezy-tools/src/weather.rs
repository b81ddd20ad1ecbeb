//! Current weather via OpenWeatherMap

use std::sync::Arc;

use async_trait::async_trait;
use cluezy_core::traits::tools::ToolResult;
use cluezy_core::types::output::WeatherReport;
use cluezy_core::types::ToolOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::http::{endpoint, require_key, ApiClient};
use crate::schema::{parameters_schema, parse_args};
use crate::tool::Tool;

pub const NAME: &str = "weather";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    fn as_str(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct WeatherParams {
    /// City name, optionally with country code (e.g. "Paris,FR")
    #[validate(length(min = 1))]
    pub location: String,
    /// Measurement units
    #[serde(default)]
    pub units: Units,
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    name: String,
    #[serde(default)]
    sys: Option<OwmSys>,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmCondition>,
    #[serde(default)]
    wind: Option<OwmWind>,
}

#[derive(Debug, Deserialize)]
struct OwmSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    humidity: u32,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

pub struct WeatherTool {
    client: Arc<ApiClient>,
}

impl WeatherTool {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Get the current weather for a location"
    }

    fn parameters(&self, _strict: bool) -> Value {
        parameters_schema::<WeatherParams>(false)
    }

    async fn execute(&self, args: Value) -> ToolResult<ToolOutput> {
        let params: WeatherParams = parse_args(args)?;
        let config = self.client.config();
        let key = require_key(&config.openweather_api_key, "OPENWEATHER_API_KEY")?;

        let request = self
            .client
            .get(&endpoint(&config.endpoints.openweather, "data/2.5/weather"))
            .query(&[
                ("q", params.location.as_str()),
                ("appid", key),
                ("units", params.units.as_str()),
            ]);
        let response: OwmResponse = self.client.send_json(request).await?;

        Ok(ToolOutput::Weather(WeatherReport {
            location: response.name,
            country: response.sys.and_then(|s| s.country),
            temperature: response.main.temp,
            feels_like: response.main.feels_like,
            humidity: response.main.humidity,
            description: response
                .weather
                .into_iter()
                .next()
                .map(|w| w.description)
                .unwrap_or_default(),
            wind_speed: response.wind.map(|w| w.speed).unwrap_or_default(),
            units: params.units.as_str().to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cluezy_config::{ToolEndpoints, ToolsConfig};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tool(base: &str) -> WeatherTool {
        let config = ToolsConfig {
            openweather_api_key: Some("owm-1".into()),
            endpoints: ToolEndpoints::all(base),
            ..Default::default()
        };
        WeatherTool::new(Arc::new(ApiClient::new(config).unwrap()))
    }

    #[tokio::test]
    async fn test_weather_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Paris"))
            .and(query_param("appid", "owm-1"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Paris",
                "sys": { "country": "FR" },
                "main": { "temp": 64.2, "feels_like": 63.0, "humidity": 72 },
                "weather": [{ "description": "light rain" }],
                "wind": { "speed": 8.1 }
            })))
            .mount(&server)
            .await;

        let out = tool(&server.uri())
            .execute(json!({ "location": "Paris", "units": "imperial" }))
            .await
            .unwrap();
        let ToolOutput::Weather(report) = out else {
            panic!("expected weather output");
        };
        assert_eq!(report.country.as_deref(), Some("FR"));
        assert_eq!(report.humidity, 72);
        assert_eq!(report.description, "light rain");
        assert_eq!(report.units, "imperial");
    }

    #[tokio::test]
    async fn test_unknown_city_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"city not found"}"#))
            .mount(&server)
            .await;

        let err = tool(&server.uri())
            .execute(json!({ "location": "Atlantis" }))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
