use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cluezy_cli::cli::{Cli, Commands};
use cluezy_cli::commands::{chat, serve};
use cluezy_config::ConfigLoader;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the flags
    let env_filter = EnvFilter::builder()
        .with_default_directive(cli.level().into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = ConfigLoader::new().load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Serve {
            host,
            port,
            static_dir,
        }) => {
            let options = serve::ServeOptions {
                host,
                port,
                static_dir: static_dir.map(|d| d.display().to_string()),
            };
            serve::execute(config, options).await?
        }
        Some(Commands::Chat {
            server,
            model,
            user,
            resume,
        }) => {
            let options = chat::ChatOptions {
                server: server.unwrap_or_else(|| config.web.base_url()),
                model: model.unwrap_or_else(|| config.chat.model.clone()),
                user,
                resume,
            };
            chat::execute(options).await?
        }
        None => {
            let options = chat::ChatOptions {
                server: config.web.base_url(),
                model: config.chat.model.clone(),
                user: None,
                resume: None,
            };
            chat::execute(options).await?
        }
    }

    Ok(())
}
