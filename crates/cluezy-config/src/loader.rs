//! Configuration loading: defaults, then file, then environment

use crate::components::parse_flag;
use crate::{AppConfig, ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Default configuration directory (`~/.config/cluezy`)
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cluezy"))
}

/// Loads [`AppConfig`] from a TOML file and the process environment
pub struct ConfigLoader {
    env: EnvLookup,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader reading the real process environment
    pub fn new() -> Self {
        Self {
            env: Box::new(|key| std::env::var(key).ok()),
        }
    }

    /// Loader with a custom environment lookup
    pub fn with_env<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            env: Box::new(lookup),
        }
    }

    /// Load configuration
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used only if the file is present.
    pub fn load(&self, path: Option<&Path>) -> ConfigResult<AppConfig> {
        let mut config = match path {
            Some(path) => Self::read_file(path)?,
            None => match default_config_dir().map(|dir| dir.join("config.toml")) {
                Some(default) if default.exists() => Self::read_file(&default)?,
                _ => {
                    debug!("No config file found, using defaults");
                    AppConfig::default()
                }
            },
        };

        self.apply_env(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string (no environment applied)
    pub fn from_toml_str(content: &str) -> ConfigResult<AppConfig> {
        Ok(toml::from_str(content)?)
    }

    fn read_file(path: &Path) -> ConfigResult<AppConfig> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded config file");
        Self::from_toml_str(&content)
    }

    /// Overlay environment variables onto `config`
    pub fn apply_env(&self, config: &mut AppConfig) -> ConfigResult<()> {
        if let Some(flag) = self.var("ENABLE_SAVE_CHAT_HISTORY") {
            config.features.save_chat_history = parse_flag(&flag);
        }

        if let Some(host) = self.var("CLUEZY_HOST") {
            config.web.host = host;
        }
        if let Some(port) = self.var("CLUEZY_PORT") {
            config.web.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("CLUEZY_PORT is not a port: {port}")))?;
        }

        if let Some(model) = self.var("CLUEZY_MODEL") {
            config.chat.model = model;
        }
        if let Some(endpoint) = self.var("OPENAI_BASE_URL") {
            config.chat.endpoint = endpoint;
        }
        set_secret(&mut config.chat.api_key, self.var("OPENAI_API_KEY"));

        set_secret(&mut config.tools.tavily_api_key, self.var("TAVILY_API_KEY"));
        set_secret(&mut config.tools.serper_api_key, self.var("SERPER_API_KEY"));
        set_secret(&mut config.tools.exa_api_key, self.var("EXA_API_KEY"));
        set_secret(
            &mut config.tools.openweather_api_key,
            self.var("OPENWEATHER_API_KEY"),
        );
        set_secret(&mut config.tools.jina_api_key, self.var("JINA_API_KEY"));

        Ok(())
    }

    fn var(&self, key: &str) -> Option<String> {
        (self.env)(key).filter(|value| !value.is_empty())
    }
}

fn set_secret(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}
