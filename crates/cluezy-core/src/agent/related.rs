//! Follow-up question generation

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use super::prompts::RELATED_QUESTIONS_PROMPT;
use crate::error::{CoreError, CoreResult};
use crate::traits::llm::{LlmProvider, LlmRequest};
use crate::types::Message;

/// Number of follow-up questions offered after a turn
pub const RELATED_QUESTION_COUNT: usize = 3;

const FALLBACK_QUERY: &str = "Generate related search questions";

#[derive(Debug, Deserialize)]
struct RelatedResponse {
    items: Vec<RelatedItem>,
}

#[derive(Debug, Deserialize)]
struct RelatedItem {
    query: String,
}

/// Asks the model for follow-up questions about the original query
#[derive(Clone)]
pub struct RelatedQuestions {
    llm: Arc<dyn LlmProvider>,
}

impl RelatedQuestions {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Up to [`RELATED_QUESTION_COUNT`] questions derived from the first user
    /// message of `messages`
    pub async fn generate(&self, model: &str, messages: &[Message]) -> CoreResult<Vec<String>> {
        let original = messages
            .iter()
            .find(|m| m.is_user())
            .map(|m| m.content.as_str())
            .unwrap_or(FALLBACK_QUERY);

        let request = LlmRequest::new(model, RELATED_QUESTIONS_PROMPT)
            .with_user(original)
            .json();
        let raw = self.llm.generate(request).await?;

        let questions = parse_related(&raw)?;
        debug!(count = questions.len(), "Generated related questions");
        Ok(questions)
    }
}

/// Parse `{"items": [{"query": ...}]}`, tolerating a markdown code fence
pub fn parse_related(raw: &str) -> CoreResult<Vec<String>> {
    let body = strip_code_fence(raw.trim());
    let response: RelatedResponse = serde_json::from_str(body)
        .map_err(|e| CoreError::Upstream(format!("Invalid related questions: {e}")))?;

    Ok(response
        .items
        .into_iter()
        .map(|item| item.query.trim().to_string())
        .filter(|q| !q.is_empty())
        .take(RELATED_QUESTION_COUNT)
        .collect())
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
