//! Persisted search-mode toggle

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// File name under the config directory
pub const SEARCH_MODE_FILE: &str = "search-mode";

/// Search-mode preference stored as a one-line boolean file
///
/// Read once when a session starts and written on every toggle. A missing or
/// unreadable file means search mode is on.
#[derive(Debug, Clone)]
pub struct SearchModePreference {
    path: PathBuf,
}

impl SearchModePreference {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.config/cluezy/search-mode`
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join("cluezy").join(SEARCH_MODE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> bool {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => match content.trim() {
                "false" => false,
                "true" => true,
                other => {
                    warn!(value = other, "Unrecognised search-mode preference, using default");
                    true
                }
            },
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "No search-mode preference");
                true
            }
        }
    }

    pub fn save(&self, enabled: bool) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, format!("{enabled}\n"))
    }
}
