//! HTTP server configuration

use serde::{Deserialize, Serialize};

/// Default bind address
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port
pub const DEFAULT_PORT: u16 = 3000;

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed by CORS
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Directory with a built frontend to serve as a fallback
    #[serde(default)]
    pub static_dir: Option<String>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            static_dir: None,
        }
    }
}

impl WebConfig {
    /// `host:port` string suitable for `SocketAddr` parsing
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL a local client would use to reach this server
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
