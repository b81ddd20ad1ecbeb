//! # Cluezy Configuration
//!
//! Typed configuration for the Cluezy search assistant.
//!
//! Values are resolved in three layers:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file (`~/.config/cluezy/config.toml` or `--config`)
//! 3. Environment variables (`ENABLE_SAVE_CHAT_HISTORY`, `OPENAI_API_KEY`, ...)
//!
//! ```rust,no_run
//! use cluezy_config::ConfigLoader;
//!
//! let config = ConfigLoader::new().load(None)?;
//! println!("listening on {}:{}", config.web.host, config.web.port);
//! # Ok::<(), cluezy_config::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod components;
mod error;
mod loader;

pub use components::*;
pub use error::{ConfigError, ConfigResult};
pub use loader::{default_config_dir, ConfigLoader};

use serde::{Deserialize, Serialize};

/// Root configuration for every Cluezy component
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// HTTP server settings
    #[serde(default)]
    pub web: WebConfig,
    /// Model provider settings
    #[serde(default)]
    pub chat: ChatConfig,
    /// External API keys and endpoints used by tools
    #[serde(default)]
    pub tools: ToolsConfig,
    /// Feature flags
    #[serde(default)]
    pub features: FeatureConfig,
}

impl AppConfig {
    /// Check the invariants that serde cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        if self.web.port == 0 {
            return Err(ConfigError::Invalid("web.port must be non-zero".to_string()));
        }
        if !self.chat.model.contains(':') {
            return Err(ConfigError::Invalid(format!(
                "chat.model must be of the form provider:model, got '{}'",
                self.chat.model
            )));
        }
        Ok(())
    }
}
