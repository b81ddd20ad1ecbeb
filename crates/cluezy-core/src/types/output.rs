//! Tool results
//!
//! Every tool returns a differently shaped payload. [`ToolOutput`] tags each
//! shape with the producing tool so consumers dispatch on the variant instead
//! of probing properties.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of one tool execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolOutput {
    Search(SearchResults),
    AcademicSearch(AcademicResults),
    Retrieve(SearchResults),
    VideoSearch(VideoSearchResults),
    AskQuestion(QuestionAnswer),
    Weather(WeatherReport),
    Datetime(DateTimeInfo),
    YoutubeVideoAnalysis(VideoAnalysis),
    ProductSearch(ProductSearchResults),
    PdfSearch(FileSearchResults),
    DocSearch(FileSearchResults),
    PptSearch(FileSearchResults),
    /// An upstream failure contained by the tool
    Error {
        #[serde(rename = "toolName")]
        tool_name: String,
        result: ErrorPayload,
    },
}

/// `{ "error": message }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
}

impl ToolOutput {
    /// Contained failure of `tool_name`
    pub fn error(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        ToolOutput::Error {
            tool_name: tool_name.into(),
            result: ErrorPayload {
                error: message.into(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutput::Error { .. })
    }

    /// Payload without the variant tag, as handed back to the model
    pub fn payload(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => {
                map.remove("tool");
                if let ToolOutput::Error { .. } = self {
                    map.remove("toolName");
                }
                Value::Object(map)
            }
            Ok(other) => other,
            Err(_) => Value::Null,
        }
    }
}

/// One web result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub title: String,
    pub url: String,
    pub content: String,
}

/// Web search or page retrieval
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<SearchResultItem>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_results: Option<usize>,
}

/// One research paper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    pub title: String,
    pub url: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
}

/// Academic search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcademicResults {
    pub results: Vec<Paper>,
}

/// One video hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Video search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoSearchResults {
    pub query: String,
    pub videos: Vec<VideoItem>,
}

/// How the user settled a clarifying question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum QuestionOutcome {
    Answered {
        #[serde(default)]
        selected: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        other: Option<String>,
    },
    Declined,
    Skipped,
}

impl QuestionOutcome {
    /// Free-form answer
    pub fn answer(text: impl Into<String>) -> Self {
        QuestionOutcome::Answered {
            selected: Vec::new(),
            other: Some(text.into()),
        }
    }
}

/// Result of the clarifying-question tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub outcome: QuestionOutcome,
}

/// Current weather at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub location: String,
    #[serde(default)]
    pub country: Option<String>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u32,
    pub description: String,
    pub wind_speed: f64,
    pub units: String,
}

/// Current time in a timezone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeInfo {
    pub timezone: String,
    pub datetime: String,
    pub utc_offset: String,
    pub day_of_week: u32,
    pub week_number: u32,
    pub unixtime: i64,
}

/// Static details of a YouTube video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub thumbnail_url: String,
    pub provider_name: String,
    pub provider_url: String,
}

/// What the analysis managed to extract
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub has_captions: bool,
    pub has_timestamps: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Transcript and chapter analysis of one video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysis {
    pub video_id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<VideoDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captions: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timestamps: Vec<String>,
    pub analysis: AnalysisSummary,
}

/// One visual match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMatch {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Visual product search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchResults {
    pub url: String,
    pub visual_matches: Vec<ProductMatch>,
}

/// One document hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileResult {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Document search restricted to one file type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSearchResults {
    pub query: String,
    pub file_type: String,
    pub results: Vec<FileResult>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_payload_shape() {
        let out = ToolOutput::error("weather", "boom");
        assert_eq!(out.payload(), json!({ "result": { "error": "boom" } }));
        let wire = serde_json::to_value(&out).unwrap();
        assert_eq!(wire["tool"], "error");
        assert_eq!(wire["toolName"], "weather");
    }

    #[test]
    fn test_question_outcome_tags() {
        let declined = ToolOutput::AskQuestion(QuestionAnswer {
            outcome: QuestionOutcome::Declined,
        });
        let wire = serde_json::to_value(&declined).unwrap();
        assert_eq!(wire, json!({ "tool": "ask_question", "outcome": { "status": "declined" } }));
        let back: ToolOutput = serde_json::from_value(wire).unwrap();
        assert_eq!(back, declined);
    }

    #[test]
    fn test_payload_strips_tag() {
        let out = ToolOutput::Search(SearchResults {
            query: "rust".to_string(),
            ..Default::default()
        });
        let payload = out.payload();
        assert!(payload.get("tool").is_none());
        assert_eq!(payload["query"], "rust");
    }
}
