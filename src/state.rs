use std::sync::mpsc;

use video_edit_view::{CursorElement, ElementId, VideoEditView};

use crate::progress::DemoProgress;

/// Id of the canvas-drawn cursor; anything else on the track is not draggable.
pub const CURSOR_ID: ElementId = ElementId(1);
/// Id reported when a press lands on the bare track.
pub const TRACK_ID: ElementId = ElementId(0);

/// Video length in demo units (one unit per 100ms)
pub const DEMO_DURATION: u64 = 100;

/// Cursor drawn on the timeline canvas.
#[derive(Debug, Clone)]
pub struct CanvasCursor {
    pub left: i32,
    pub right: i32,
    pub width: i32,
}

impl CanvasCursor {
    pub fn new(width: i32) -> Self {
        CanvasCursor {
            left: -width / 2,
            right: width - width / 2,
            width,
        }
    }

    pub fn contains(&self, x: f32) -> bool {
        x >= self.left as f32 && x <= self.right as f32
    }
}

impl CursorElement for CanvasCursor {
    fn id(&self) -> ElementId {
        CURSOR_ID
    }

    fn measured_width(&self) -> i32 {
        self.width
    }

    fn width(&self) -> i32 {
        self.right - self.left
    }

    fn set_horizontal_bounds(&mut self, left: i32, right: i32) {
        self.left = left;
        self.right = right;
    }

    // iced rebuilds the view after every message
    fn invalidate(&mut self) {}
}

/// Application state for the demo host.
pub struct App {
    pub view: VideoEditView<CanvasCursor>,
    pub progress: Option<DemoProgress>,
    pub drag_done: mpsc::Receiver<f32>,
    /// Pointer x minus cursor left while a drag is in progress
    pub grab_offset: Option<f32>,
    pub error: Option<String>,
    pub status: String,
}
