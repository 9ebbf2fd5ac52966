//! Track geometry shared by the cursor positioner and the drag clamp.

use crate::error::{WidgetError, WidgetResult};

/// Horizontal layout of the timeline track and its cursor.
///
/// `track_width` is zero until the host has laid the track out. Once it is
/// non-zero, `track_width >= cursor_width >= 0` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackGeometry {
    track_width: i32,
    cursor_width: i32,
    total_duration: u64,
}

impl TrackGeometry {
    pub fn new(track_width: i32, cursor_width: i32, total_duration: u64) -> WidgetResult<Self> {
        validate(track_width, cursor_width)?;
        Ok(TrackGeometry {
            track_width,
            cursor_width,
            total_duration,
        })
    }

    pub fn track_width(&self) -> i32 {
        self.track_width
    }

    pub fn cursor_width(&self) -> i32 {
        self.cursor_width
    }

    /// Half of the cursor width, using the same integer division as the offsets.
    pub fn half_cursor(&self) -> i32 {
        self.cursor_width / 2
    }

    pub fn total_duration(&self) -> u64 {
        self.total_duration
    }

    pub fn set_track_width(&mut self, track_width: i32) -> WidgetResult<()> {
        validate(track_width, self.cursor_width)?;
        self.track_width = track_width;
        Ok(())
    }

    pub fn set_cursor_width(&mut self, cursor_width: i32) -> WidgetResult<()> {
        validate(self.track_width, cursor_width)?;
        self.cursor_width = cursor_width;
        Ok(())
    }

    pub fn set_total_duration(&mut self, total_duration: u64) {
        self.total_duration = total_duration;
    }
}

fn validate(track_width: i32, cursor_width: i32) -> WidgetResult<()> {
    let negative = track_width < 0 || cursor_width < 0;
    // An unmeasured track (width 0) accepts any cursor width
    let too_wide = track_width > 0 && cursor_width > track_width;
    if negative || too_wide {
        return Err(WidgetError::InvalidGeometry {
            track_width,
            cursor_width,
        });
    }
    Ok(())
}
