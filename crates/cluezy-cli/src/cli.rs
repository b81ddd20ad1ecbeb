use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Parser)]
#[command(name = "cluezy")]
#[command(about = "cluezy - conversational search assistant")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute (defaults to chat if not provided)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/cluezy/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Level used when `RUST_LOG` is unset
    ///
    /// The server logs at info by default; the chat client stays quiet so
    /// log lines do not interleave with streamed answers.
    pub fn level(&self) -> LevelFilter {
        if let Some(level) = self.log_level {
            return level.into();
        }
        if self.verbose {
            return LevelFilter::DEBUG;
        }
        match self.command {
            Some(Commands::Serve { .. }) => LevelFilter::INFO,
            _ => LevelFilter::WARN,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Bind host (overrides config and CLUEZY_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config and CLUEZY_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory of static assets served for unmatched paths
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Interactive chat against a running server
    Chat {
        /// Server base URL (defaults to the configured host and port)
        #[arg(short, long)]
        server: Option<String>,

        /// Model as provider:name (defaults to the configured model)
        #[arg(short, long)]
        model: Option<String>,

        /// User id sent as the x-user-id header
        #[arg(short, long)]
        user: Option<String>,

        /// Resume a saved chat by id
        #[arg(short, long)]
        resume: Option<String>,
    },
}
