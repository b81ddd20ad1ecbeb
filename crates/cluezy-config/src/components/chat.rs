//! Model provider configuration

use serde::{Deserialize, Serialize};

/// Default model identifier, `provider:model`
pub const DEFAULT_CHAT_MODEL: &str = "openai:gpt-4o-mini";

/// Default model used by prompt enhancement
pub const DEFAULT_ENHANCE_MODEL: &str = "openai:gpt-4o-mini";

/// Default OpenAI-compatible endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default request timeout for model calls
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Chat model configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatConfig {
    /// Model used when a request does not name one
    #[serde(default = "default_model")]
    pub model: String,
    /// Model used by `/api/enhance-prompt`
    #[serde(default = "default_enhance_model")]
    pub enhance_model: String,
    /// OpenAI-compatible base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Provider API key
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Timeout for a single model request
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}

fn default_enhance_model() -> String {
    DEFAULT_ENHANCE_MODEL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            enhance_model: default_enhance_model(),
            endpoint: default_endpoint(),
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

impl ChatConfig {
    /// Whether a provider key has been supplied
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}
