//! Draggable playback cursor for a video timeline.
//!
//! A background clock polls the current playback position and moves the
//! cursor; dragging the cursor pauses the clock and reports where it was
//! dropped as a fraction of the track width.

pub mod config;
pub mod cursor;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod playback_clock;
pub mod source;
pub mod widget;

pub use config::WidgetConfig;
pub use cursor::{CursorBounds, CursorElement, ElementId};
pub use drag::{DragListener, DragState};
pub use error::{WidgetError, WidgetResult};
pub use geometry::TrackGeometry;
pub use playback_clock::{PlaybackState, PositionUpdate};
pub use source::PositionSource;
pub use widget::VideoEditView;
