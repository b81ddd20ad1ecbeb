//! Tool provider configuration
//!
//! Each tool talks to exactly one external API. Keys are only checked for
//! presence; endpoints can be overridden for self-hosted proxies and tests.

use serde::{Deserialize, Serialize};

/// Default timeout for a single tool request
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 30;

/// API keys and timeouts for tool providers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolsConfig {
    /// Tavily web search key
    #[serde(default, skip_serializing)]
    pub tavily_api_key: Option<String>,
    /// Serper (Google) key: videos, lens, file-type search
    #[serde(default, skip_serializing)]
    pub serper_api_key: Option<String>,
    /// Exa key: academic search
    #[serde(default, skip_serializing)]
    pub exa_api_key: Option<String>,
    /// OpenWeatherMap key
    #[serde(default, skip_serializing)]
    pub openweather_api_key: Option<String>,
    /// Jina reader key (optional, raises rate limits)
    #[serde(default, skip_serializing)]
    pub jina_api_key: Option<String>,
    /// Per-request timeout
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Endpoint overrides
    #[serde(default)]
    pub endpoints: ToolEndpoints,
}

fn default_timeout() -> u64 {
    DEFAULT_TOOL_TIMEOUT_SECS
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            tavily_api_key: None,
            serper_api_key: None,
            exa_api_key: None,
            openweather_api_key: None,
            jina_api_key: None,
            timeout_secs: default_timeout(),
            endpoints: ToolEndpoints::default(),
        }
    }
}

impl ToolsConfig {
    /// Whether the web search key is present
    pub fn has_search_key(&self) -> bool {
        present(&self.tavily_api_key)
    }

    /// Whether the Serper key is present
    pub fn has_serper_key(&self) -> bool {
        present(&self.serper_api_key)
    }

    /// Whether the Exa key is present
    pub fn has_exa_key(&self) -> bool {
        present(&self.exa_api_key)
    }
}

fn present(key: &Option<String>) -> bool {
    key.as_deref().is_some_and(|k| !k.is_empty())
}

/// Base URLs of the external APIs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolEndpoints {
    /// Tavily API
    #[serde(default = "default_tavily")]
    pub tavily: String,
    /// Exa API
    #[serde(default = "default_exa")]
    pub exa: String,
    /// Serper API
    #[serde(default = "default_serper")]
    pub serper: String,
    /// Jina reader
    #[serde(default = "default_jina")]
    pub jina: String,
    /// OpenWeatherMap API
    #[serde(default = "default_openweather")]
    pub openweather: String,
    /// WorldTimeAPI
    #[serde(default = "default_worldtime")]
    pub worldtime: String,
    /// YouTube (timedtext captions)
    #[serde(default = "default_youtube")]
    pub youtube: String,
}

fn default_tavily() -> String {
    "https://api.tavily.com".to_string()
}

fn default_exa() -> String {
    "https://api.exa.ai".to_string()
}

fn default_serper() -> String {
    "https://google.serper.dev".to_string()
}

fn default_jina() -> String {
    "https://r.jina.ai".to_string()
}

fn default_openweather() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_worldtime() -> String {
    "https://worldtimeapi.org".to_string()
}

fn default_youtube() -> String {
    "https://www.youtube.com".to_string()
}

impl Default for ToolEndpoints {
    fn default() -> Self {
        Self {
            tavily: default_tavily(),
            exa: default_exa(),
            serper: default_serper(),
            jina: default_jina(),
            openweather: default_openweather(),
            worldtime: default_worldtime(),
            youtube: default_youtube(),
        }
    }
}

impl ToolEndpoints {
    /// Point every endpoint at one base URL (mock servers in tests)
    pub fn all(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            tavily: base.clone(),
            exa: base.clone(),
            serper: base.clone(),
            jina: base.clone(),
            openweather: base.clone(),
            worldtime: base.clone(),
            youtube: base,
        }
    }
}
