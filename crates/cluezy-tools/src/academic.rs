//! Research-paper search via Exa
//!
//! Failures propagate: an academic search that silently returns nothing
//! would mislead the model.

use std::sync::Arc;

use async_trait::async_trait;
use cluezy_core::traits::tools::{ToolPolicy, ToolResult};
use cluezy_core::types::output::{AcademicResults, Paper};
use cluezy_core::types::ToolOutput;
use lazy_static::lazy_static;
use regex::Regex;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::http::{endpoint, require_key, ApiClient};
use crate::schema::{parameters_schema, parse_args};
use crate::tool::Tool;

/// Registered name; the spelling is part of the model-facing contract
pub const NAME: &str = "acadamicSearch";

const RESULT_COUNT: u32 = 20;

lazy_static! {
    static ref SUMMARY_PREFIX: Regex = Regex::new(r"(?i)^Summary:\s*").expect("valid regex");
    static ref TITLE_SUFFIX: Regex = Regex::new(r"\s\[.*?\]$").expect("valid regex");
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct AcademicSearchParams {
    /// The search query
    #[validate(length(min = 1))]
    pub query: String,
}

#[derive(Debug, Deserialize)]
struct ExaResponse {
    #[serde(default)]
    results: Vec<ExaResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExaResult {
    url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    published_date: Option<String>,
}

/// Drop duplicate URLs and summary-less papers, clean titles and summaries
fn clean_results(results: Vec<ExaResult>) -> Vec<Paper> {
    let mut papers: Vec<Paper> = Vec::with_capacity(results.len());
    for result in results {
        let Some(summary) = result.summary.filter(|s| !s.is_empty()) else {
            continue;
        };
        if papers.iter().any(|p| p.url == result.url) {
            continue;
        }
        let title = result
            .title
            .map(|t| TITLE_SUFFIX.replace(&t, "").into_owned())
            .unwrap_or_default();
        papers.push(Paper {
            title,
            url: result.url,
            summary: SUMMARY_PREFIX.replace(&summary, "").into_owned(),
            author: result.author,
            published_date: result.published_date,
        });
    }
    papers
}

pub struct AcademicSearchTool {
    client: Arc<ApiClient>,
}

impl AcademicSearchTool {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for AcademicSearchTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Search academic papers and research."
    }

    fn policy(&self) -> ToolPolicy {
        ToolPolicy::Rethrow
    }

    fn parameters(&self, _strict: bool) -> Value {
        parameters_schema::<AcademicSearchParams>(false)
    }

    async fn execute(&self, args: Value) -> ToolResult<ToolOutput> {
        let params: AcademicSearchParams = parse_args(args)?;
        let config = self.client.config();
        let key = require_key(&config.exa_api_key, "EXA_API_KEY")?;

        let body = json!({
            "query": params.query,
            "type": "auto",
            "numResults": RESULT_COUNT,
            "category": "research paper",
            "contents": { "summary": { "query": "Abstract of the Paper" } },
        });
        let request = self
            .client
            .post(&endpoint(&config.endpoints.exa, "search"))
            .header("x-api-key", key)
            .json(&body);
        let response: ExaResponse = self.client.send_json(request).await?;

        Ok(ToolOutput::AcademicSearch(AcademicResults {
            results: clean_results(response.results),
        }))
    }
}
