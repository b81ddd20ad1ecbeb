//! `cluezy serve`

use anyhow::{Context, Result};
use cluezy_config::AppConfig;
use cluezy_web::{start_server, AppState};
use tracing::info;

pub struct ServeOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<String>,
}

/// Apply command-line overrides on top of the loaded configuration
pub fn apply_overrides(config: &mut AppConfig, options: ServeOptions) {
    if let Some(host) = options.host {
        config.web.host = host;
    }
    if let Some(port) = options.port {
        config.web.port = port;
    }
    if let Some(dir) = options.static_dir {
        config.web.static_dir = Some(dir);
    }
}

pub async fn execute(mut config: AppConfig, options: ServeOptions) -> Result<()> {
    apply_overrides(&mut config, options);
    let web = config.web.clone();

    let state = AppState::from_config(config).context("Failed to initialise server state")?;
    info!(address = %web.bind_address(), "Serving Cluezy API");
    start_server(state, &web).await.context("Server failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_only_given_values() {
        let mut config = AppConfig::default();
        let original_host = config.web.host.clone();
        apply_overrides(
            &mut config,
            ServeOptions {
                host: None,
                port: Some(9000),
                static_dir: Some("public".into()),
            },
        );
        assert_eq!(config.web.host, original_host);
        assert_eq!(config.web.port, 9000);
        assert_eq!(config.web.static_dir.as_deref(), Some("public"));
    }
}
