//! Feature flags

use serde::{Deserialize, Serialize};

/// Global feature switches
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureConfig {
    /// Persist chats and allow rename/delete (`ENABLE_SAVE_CHAT_HISTORY`)
    #[serde(default)]
    pub save_chat_history: bool,
}

/// Parse a boolean flag the way the environment spells it
///
/// Only the literal string `"true"` (any case, surrounding whitespace
/// ignored) enables a flag.
pub fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
