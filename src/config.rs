use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{WidgetError, WidgetResult};
use crate::playback_clock::DEFAULT_POLL_INTERVAL;

/// Widget settings loaded from `~/.video_edit_view/config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    pub poll_interval_ms: u64,
    /// Overrides the cursor element's measured width when set
    pub cursor_width: Option<i32>,
    pub video_duration: u64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        WidgetConfig {
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            cursor_width: None,
            video_duration: 0,
        }
    }
}

impl WidgetConfig {
    /// Get the path to the default config file.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var("HOME").ok().map(|home| {
            PathBuf::from(home)
                .join(".video_edit_view")
                .join("config.json")
        })
    }

    pub fn load(path: &Path) -> WidgetResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| WidgetError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| WidgetError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the default config file, falling back to defaults when it is
    /// missing or unreadable.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded widget config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{}; using default config", e);
                Self::default()
            }
        }
    }

    fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Poll interval, never shorter than one millisecond.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}
