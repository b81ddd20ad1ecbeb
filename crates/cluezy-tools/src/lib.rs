//! # Cluezy Tools
//!
//! The research agent's tool catalog. Each tool wraps exactly one external
//! API and returns a tagged [`ToolOutput`](cluezy_core::ToolOutput).
//!
//! | tool | API | on failure |
//! |---|---|---|
//! | `search` | Tavily | error payload |
//! | `acadamicSearch` | Exa | error |
//! | `retrieve` | Jina reader | error payload |
//! | `videoSearch` | Serper videos | error payload |
//! | `ask_question` | answered by the user | n/a |
//! | `weather` | OpenWeatherMap | error payload |
//! | `datetime` | WorldTimeAPI | error payload |
//! | `youtubeVideoAnalysis` | YouTube captions | error for a bad URL, `analysis.error` otherwise |
//! | `productSearch` | Serper lens | error payload |
//! | `pdfSearch`, `docSearch`, `pptSearch` | Serper search | error payload |
//!
//! ```rust,no_run
//! use cluezy_config::ToolsConfig;
//! use cluezy_core::ToolExecutor;
//! use cluezy_tools::ToolRegistry;
//!
//! # async fn run() -> Result<(), cluezy_core::ToolError> {
//! let registry = ToolRegistry::new(ToolsConfig::default())?;
//! let tools = registry.list_tools("openai:gpt-4o-mini")?;
//! let weather = registry
//!     .execute_tool("weather", serde_json::json!({ "location": "Oslo" }))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod academic;
pub mod datetime;
pub mod file_search;
mod http;
pub mod product;
pub mod question;
mod registry;
pub mod retrieve;
pub mod schema;
pub mod search;
mod tool;
pub mod video_search;
pub mod weather;
pub mod youtube;

pub use http::ApiClient;
pub use registry::ToolRegistry;
pub use tool::Tool;
