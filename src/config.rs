//! Inspector configuration, read from `~/.netscope/config.yaml`.
//!
//! Every field has a default, so a missing or partial file is fine. A file
//! that does not parse is logged and ignored.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::matching::MatchOptions;
use crate::constants::{
    CONFIG_DIR_NAME, DEFAULT_CHUNK_SIZE, DEFAULT_ERROR_STATUS, DEFAULT_LOG_FILE,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Maximum chars per displayed body segment
    pub chunk_size: usize,
    /// Statuses at or above this count as errors for the errors-only filter
    pub error_status_threshold: i32,
    /// Also match search text against raw request bodies
    pub search_request_body: bool,
    pub log_file: String,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        InspectorConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            error_status_threshold: DEFAULT_ERROR_STATUS,
            search_request_body: false,
            log_file: String::from(DEFAULT_LOG_FILE),
        }
    }
}

impl InspectorConfig {
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
            .join("config.yaml")
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Ignoring invalid config");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: InspectorConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            error_status: self.error_status_threshold,
            search_request_body: self.search_request_body,
        }
    }
}
