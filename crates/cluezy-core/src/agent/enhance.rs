//! Prompt enhancement

use std::sync::Arc;

use tracing::info;

use super::prompts::enhance_system_prompt;
use crate::clock::Clock;
use crate::error::{CoreError, CoreResult};
use crate::traits::llm::{LlmProvider, LlmRequest};

/// Message returned for an empty prompt
pub const PROMPT_NOT_FOUND: &str = "Prompt not found!";

/// Rewrites a user prompt into a more specific one
#[derive(Clone)]
pub struct PromptEnhancer {
    llm: Arc<dyn LlmProvider>,
    clock: Arc<dyn Clock>,
    model: String,
}

impl PromptEnhancer {
    pub fn new(llm: Arc<dyn LlmProvider>, clock: Arc<dyn Clock>, model: impl Into<String>) -> Self {
        Self {
            llm,
            clock,
            model: model.into(),
        }
    }

    pub async fn enhance(&self, prompt: &str) -> CoreResult<String> {
        if prompt.trim().is_empty() {
            return Err(CoreError::Validation(PROMPT_NOT_FOUND.to_string()));
        }

        let request = LlmRequest::new(&self.model, enhance_system_prompt(self.clock.now()))
            .with_user(prompt);
        let text = self.llm.generate(request).await?;

        info!(model = %self.model, chars = text.len(), "Prompt enhanced");
        Ok(text.trim().to_string())
    }
}
