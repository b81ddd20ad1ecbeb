//! YouTube transcript and chapter analysis
//!
//! The title comes from oEmbed and the description from the watch page;
//! either may be missing. Chapters listed in the description win over ones
//! derived from captions.
//!
//! An unrecognised URL is an error. Once the video id is known a caption
//! failure is folded into `analysis.error` so the model still gets the base
//! result.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use cluezy_core::traits::tools::{ToolError, ToolPolicy, ToolResult};
use cluezy_core::types::output::{AnalysisSummary, VideoAnalysis, VideoDetails};
use cluezy_core::types::ToolOutput;
use lazy_static::lazy_static;
use regex::Regex;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use validator::Validate;

use crate::http::{endpoint, ApiClient};
use crate::schema::{parameters_schema, parse_args};
use crate::tool::Tool;

pub const NAME: &str = "youtubeVideoAnalysis";

const UNKNOWN_TITLE: &str = "Unknown Title";
const CHAPTER_TARGET: u64 = 8;
const MIN_CHAPTER_INTERVAL: u64 = 30;
const MIN_FRAGMENT_CHARS: usize = 5;
const CHAPTER_TEXT_CHARS: usize = 50;

lazy_static! {
    static ref VIDEO_ID: Regex =
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&?/]+)")
            .expect("valid regex");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid regex");
    static ref DESCRIPTION_CHAPTER: Regex =
        Regex::new(r"^\s*((?:\d+:)?\d{1,2}:\d{2})\s*[-|–—]?\s*(.+)$").expect("valid regex");
    static ref SHORT_DESCRIPTION: Regex =
        Regex::new(r#""shortDescription":"((?:[^"\\]|\\.)*)""#).expect("valid regex");
}

#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysisParams {
    /// The specific YouTube video URL to analyze
    #[validate(length(min = 1))]
    pub video_url: String,
}

/// Video id from a watch, short or embed URL
pub fn extract_video_id(url: &str) -> Option<&str> {
    VIDEO_ID
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// `time - title` lines of a description that lists chapters
pub fn chapters_from_description(description: &str) -> Vec<String> {
    description
        .lines()
        .filter_map(|line| {
            let caps = DESCRIPTION_CHAPTER.captures(line)?;
            let title = caps[2].trim();
            (!title.is_empty()).then(|| format!("{} - {title}", &caps[1]))
        })
        .collect()
}

/// Description JSON string embedded in a watch page
fn description_from_watch_page(html: &str) -> Option<String> {
    let raw = SHORT_DESCRIPTION.captures(html)?.get(1)?.as_str();
    serde_json::from_str::<String>(&format!("\"{raw}\""))
        .ok()
        .filter(|d| !d.trim().is_empty())
}

/// One caption fragment, times in seconds
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub start: f64,
    pub duration: f64,
    pub text: String,
}

/// Evenly spaced chapter markers derived from captions
pub fn chapters_from_fragments(fragments: &[Fragment]) -> Vec<String> {
    let Some(last) = fragments.last() else {
        return Vec::new();
    };
    let total = (last.start + last.duration).max(0.0);
    if total <= 1.0 {
        return Vec::new();
    }

    let interval = MIN_CHAPTER_INTERVAL.max((total / CHAPTER_TARGET as f64).floor() as u64);
    let mut chapters = Vec::new();
    let mut used = HashSet::new();

    let mut t = interval;
    while (t as f64) < total {
        let chosen = fragments
            .iter()
            .find(|f| f.start >= t as f64)
            .unwrap_or(last);
        t += interval;

        let text = WHITESPACE.replace_all(chosen.text.trim(), " ");
        let length = text.chars().count();
        if length < MIN_FRAGMENT_CHARS {
            continue;
        }

        let key = chosen.start.floor() as u64;
        if !used.insert(key) {
            continue;
        }

        let cut: String = text.chars().take(CHAPTER_TEXT_CHARS).collect();
        let ellipsis = if length > CHAPTER_TEXT_CHARS { "..." } else { "" };
        chapters.push(format!("{} - {cut}{ellipsis}", format_timestamp(key.max(1))));

        if chapters.len() as u64 >= CHAPTER_TARGET {
            break;
        }
    }
    chapters
}

/// `h:mm:ss` when at least an hour, else `m:ss`
pub fn format_timestamp(seconds: u64) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimedTextEvent {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<TimedTextSeg>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSeg {
    #[serde(default)]
    utf8: String,
}

impl TimedText {
    fn into_fragments(self) -> Vec<Fragment> {
        self.events
            .into_iter()
            .filter_map(|event| {
                let text: String = event.segs.into_iter().map(|s| s.utf8).collect();
                let text = text.trim().to_string();
                (!text.is_empty()).then(|| Fragment {
                    start: event.t_start_ms as f64 / 1000.0,
                    duration: event.d_duration_ms as f64 / 1000.0,
                    text,
                })
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct OEmbed {
    title: String,
}

/// Title and description, each best effort
#[derive(Debug, Default)]
struct Metadata {
    title: Option<String>,
    description: Option<String>,
}

pub struct YoutubeAnalysisTool {
    client: Arc<ApiClient>,
}

impl YoutubeAnalysisTool {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    async fn fetch_fragments(&self, video_id: &str) -> ToolResult<Vec<Fragment>> {
        let base = &self.client.config().endpoints.youtube;
        let request = self
            .client
            .get(&endpoint(base, "api/timedtext"))
            .query(&[("v", video_id), ("lang", "en"), ("fmt", "json3")]);
        let captions: TimedText = self.client.send_json(request).await?;
        Ok(captions.into_fragments())
    }

    async fn fetch_title(&self, video_id: &str) -> ToolResult<String> {
        let base = &self.client.config().endpoints.youtube;
        let url = watch_url(video_id);
        let request = self
            .client
            .get(&endpoint(base, "oembed"))
            .query(&[("url", url.as_str()), ("format", "json")]);
        let oembed: OEmbed = self.client.send_json(request).await?;
        Ok(oembed.title)
    }

    async fn fetch_description(&self, video_id: &str) -> ToolResult<Option<String>> {
        let base = &self.client.config().endpoints.youtube;
        let request = self
            .client
            .get(&endpoint(base, "watch"))
            .query(&[("v", video_id), ("hl", "en")]);
        let html = self.client.send_text(request).await?;
        Ok(description_from_watch_page(&html))
    }

    async fn fetch_metadata(&self, video_id: &str) -> Metadata {
        let title = match self.fetch_title(video_id).await {
            Ok(title) => Some(title).filter(|t| !t.trim().is_empty()),
            Err(err) => {
                warn!(video_id, error = %err, "Video title lookup failed");
                None
            }
        };
        let description = match self.fetch_description(video_id).await {
            Ok(description) => description,
            Err(err) => {
                warn!(video_id, error = %err, "Video description lookup failed");
                None
            }
        };
        Metadata { title, description }
    }

    fn analyse(video_id: &str, metadata: Metadata, fragments: Vec<Fragment>) -> VideoAnalysis {
        let captions = (!fragments.is_empty()).then(|| {
            fragments
                .iter()
                .map(|f| f.text.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        });
        let mut timestamps = metadata
            .description
            .as_deref()
            .map(chapters_from_description)
            .unwrap_or_default();
        if timestamps.is_empty() && captions.is_some() {
            timestamps = chapters_from_fragments(&fragments);
        } else if !timestamps.is_empty() {
            debug!(video_id, count = timestamps.len(), "Using chapters from description");
        }

        VideoAnalysis {
            video_id: video_id.to_string(),
            url: watch_url(video_id),
            details: Some(VideoDetails {
                title: metadata.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
                description: metadata.description,
                thumbnail_url: format!("https://img.youtube.com/vi/{video_id}/hqdefault.jpg"),
                provider_name: "YouTube".to_string(),
                provider_url: "https://www.youtube.com".to_string(),
            }),
            analysis: AnalysisSummary {
                has_captions: captions.is_some(),
                has_timestamps: !timestamps.is_empty(),
                caption_length: captions.as_ref().map(|c| c.chars().count()),
                timestamp_count: (!timestamps.is_empty()).then_some(timestamps.len()),
                error: None,
            },
            captions,
            timestamps,
        }
    }
}

fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

#[async_trait]
impl Tool for YoutubeAnalysisTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Get detailed analysis of a specific YouTube video including captions, timestamps, and full metadata. Use when user provides a specific YouTube URL."
    }

    fn policy(&self) -> ToolPolicy {
        ToolPolicy::Rethrow
    }

    fn parameters(&self, _strict: bool) -> Value {
        parameters_schema::<VideoAnalysisParams>(false)
    }

    async fn execute(&self, args: Value) -> ToolResult<ToolOutput> {
        let params: VideoAnalysisParams = parse_args(args)?;
        let video_id = extract_video_id(&params.video_url).ok_or_else(|| {
            ToolError::InvalidParameters(
                "Invalid YouTube URL. Please provide a valid YouTube video URL.".to_string(),
            )
        })?;
        debug!(video_id, "Analyzing video");

        let metadata = self.fetch_metadata(video_id).await;
        let analysis = match self.fetch_fragments(video_id).await {
            Ok(fragments) => Self::analyse(video_id, metadata, fragments),
            Err(err) => {
                warn!(video_id, error = %err, "Caption processing failed");
                VideoAnalysis {
                    video_id: video_id.to_string(),
                    url: watch_url(video_id),
                    details: None,
                    captions: None,
                    timestamps: Vec::new(),
                    analysis: AnalysisSummary {
                        error: Some(err.to_string()),
                        ..Default::default()
                    },
                }
            }
        };
        Ok(ToolOutput::YoutubeVideoAnalysis(analysis))
    }
}
