use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// `provider:model` identifier, e.g. `openai:gpt-4o-mini`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelId {
    pub provider: String,
    pub name: String,
}

impl ModelId {
    /// Parse `provider:model`; both halves must be non-empty
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.split_once(':') {
            Some((provider, name)) if !provider.trim().is_empty() && !name.trim().is_empty() => {
                Ok(Self {
                    provider: provider.trim().to_string(),
                    name: name.trim().to_string(),
                })
            }
            _ => Err(CoreError::Validation(format!(
                "Invalid model identifier '{raw}', expected provider:model"
            ))),
        }
    }

    /// OpenAI/Azure reasoning models only accept strict tool schemas
    pub fn requires_strict_schema(&self) -> bool {
        matches!(self.provider.as_str(), "openai" | "azure") && self.name.starts_with('o')
    }
}

impl FromStr for ModelId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.name)
    }
}
