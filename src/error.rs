//! Error types for the cursor widget

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the widget's configuration and lifecycle calls
#[derive(Error, Debug)]
pub enum WidgetError {
    /// Track or cursor width that cannot produce a sensible cursor offset
    #[error("Invalid track geometry: track_width={track_width}px, cursor_width={cursor_width}px")]
    InvalidGeometry { track_width: i32, cursor_width: i32 },

    /// The OS refused to create the position polling thread
    #[error("Failed to spawn position poll thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// Config file could not be read
    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config file is not valid JSON for `WidgetConfig`
    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Result type for widget operations
pub type WidgetResult<T> = Result<T, WidgetError>;
