//! Document search restricted to one file type

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use cluezy_core::traits::tools::ToolResult;
use cluezy_core::types::output::{FileResult, FileSearchResults};
use cluezy_core::types::ToolOutput;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::http::{endpoint, require_key, ApiClient};
use crate::schema::{parameters_schema, parse_args};
use crate::tool::Tool;

/// Searchable document types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Doc,
    Ppt,
}

impl FileType {
    pub fn extension(self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Doc => "doc",
            FileType::Ppt => "ppt",
        }
    }

    pub fn tool_name(self) -> &'static str {
        match self {
            FileType::Pdf => "pdfSearch",
            FileType::Doc => "docSearch",
            FileType::Ppt => "pptSearch",
        }
    }

    fn wrap(self, results: FileSearchResults) -> ToolOutput {
        match self {
            FileType::Pdf => ToolOutput::PdfSearch(results),
            FileType::Doc => ToolOutput::DocSearch(results),
            FileType::Ppt => ToolOutput::PptSearch(results),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
pub struct FileSearchParams {
    /// The query used to find documents
    #[validate(length(min = 1))]
    pub query: String,
}

#[derive(Debug, Deserialize)]
struct SerperSearch {
    #[serde(default)]
    organic: Vec<FileResult>,
}

pub struct FileSearchTool {
    client: Arc<ApiClient>,
    file_type: FileType,
    description: String,
}

impl FileSearchTool {
    pub fn new(client: Arc<ApiClient>, file_type: FileType) -> Self {
        Self {
            client,
            file_type,
            description: format!("Search for {file_type} documents on Google"),
        }
    }
}

#[async_trait]
impl Tool for FileSearchTool {
    fn name(&self) -> &str {
        self.file_type.tool_name()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self, _strict: bool) -> Value {
        parameters_schema::<FileSearchParams>(false)
    }

    async fn execute(&self, args: Value) -> ToolResult<ToolOutput> {
        let params: FileSearchParams = parse_args(args)?;
        let config = self.client.config();
        let key = require_key(&config.serper_api_key, "SERPER_API_KEY")?;

        let q = format!("{} filetype:{}", params.query, self.file_type);
        let request = self
            .client
            .post(&endpoint(&config.endpoints.serper, "search"))
            .header("X-API-KEY", key)
            .json(&json!({ "q": q }));
        let response: SerperSearch = self.client.send_json(request).await?;

        Ok(self.file_type.wrap(FileSearchResults {
            query: params.query,
            file_type: self.file_type.extension().to_string(),
            results: response.organic,
        }))
    }
}
