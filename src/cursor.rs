//! Cursor positioning on the timeline track.
//!
//! Maps a playback position onto horizontal pixel bounds for the cursor
//! element. The computation is pure; [`position_cursor`] applies it to a
//! host element and must only be called from the UI context.

use crate::geometry::TrackGeometry;

/// Identity of a host view element, used to decide whether a gesture
/// grabbed the draggable cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// Host-side handle to the draggable cursor element.
pub trait CursorElement {
    fn id(&self) -> ElementId;

    /// Natural width of the element before any override.
    fn measured_width(&self) -> i32;

    /// Current laid-out width.
    fn width(&self) -> i32;

    fn set_horizontal_bounds(&mut self, left: i32, right: i32);

    /// Request a redraw of the element.
    fn invalidate(&mut self);
}

/// Horizontal pixel bounds of the cursor element relative to the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorBounds {
    pub left: i32,
    pub right: i32,
}

impl CursorBounds {
    /// Pixel offset of the cursor's visual centre.
    pub fn center(&self) -> i32 {
        self.left + (self.right - self.left) / 2
    }
}

/// Fraction of the track covered by `position`, in `[0, 1]`.
///
/// A zero duration yields 0 rather than dividing by zero.
pub fn position_rate(position: u64, total_duration: u64) -> f64 {
    if total_duration == 0 {
        return 0.0;
    }
    (position as f64 / total_duration as f64).clamp(0.0, 1.0)
}

/// Compute cursor bounds so that its centre sits at the position's pixel offset.
pub fn cursor_bounds(position: u64, geometry: &TrackGeometry) -> CursorBounds {
    let rate = position_rate(position, geometry.total_duration());
    let left = (geometry.track_width() as f64 * rate).round() as i32 - geometry.half_cursor();
    CursorBounds {
        left,
        right: left + geometry.cursor_width(),
    }
}

/// Move `element` to the bounds for `position` and mark it for redraw.
pub fn position_cursor<E: CursorElement>(
    element: &mut E,
    position: u64,
    geometry: &TrackGeometry,
) -> CursorBounds {
    let bounds = cursor_bounds(position, geometry);
    log::trace!(
        "Seek cursor: position={}, left={}, right={}",
        position,
        bounds.left,
        bounds.right
    );
    element.set_horizontal_bounds(bounds.left, bounds.right);
    element.invalidate();
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingElement {
        bounds: Option<(i32, i32)>,
        invalidations: usize,
    }

    impl CursorElement for RecordingElement {
        fn id(&self) -> ElementId {
            ElementId(1)
        }

        fn measured_width(&self) -> i32 {
            20
        }

        fn width(&self) -> i32 {
            20
        }

        fn set_horizontal_bounds(&mut self, left: i32, right: i32) {
            self.bounds = Some((left, right));
        }

        fn invalidate(&mut self) {
            self.invalidations += 1;
        }
    }

    fn geometry() -> TrackGeometry {
        TrackGeometry::new(200, 20, 100).unwrap()
    }

    #[test]
    fn test_midpoint_bounds() {
        let bounds = cursor_bounds(50, &geometry());
        assert_eq!(bounds, CursorBounds { left: 90, right: 110 });
        assert_eq!(bounds.center(), 100);
    }

    #[test]
    fn test_track_extremes() {
        assert_eq!(cursor_bounds(0, &geometry()).left, -10);
        assert_eq!(cursor_bounds(100, &geometry()).left, 190);
    }

    #[test]
    fn test_zero_duration_is_start_of_track() {
        let geometry = TrackGeometry::new(200, 20, 0).unwrap();
        assert_eq!(position_rate(42, 0), 0.0);
        assert_eq!(cursor_bounds(42, &geometry).left, -10);
    }

    #[test]
    fn test_position_past_duration_stays_on_track() {
        assert_eq!(cursor_bounds(250, &geometry()).center(), 200);
    }

    #[test]
    fn test_center_within_track_for_all_positions() {
        for (track, cursor, duration) in [(200, 20, 100), (333, 17, 7), (640, 0, 12_345)] {
            let geometry = TrackGeometry::new(track, cursor, duration).unwrap();
            for position in 0..=duration {
                let bounds = cursor_bounds(position, &geometry);
                let center = bounds.left + geometry.half_cursor();
                assert!(
                    (0..=track).contains(&center),
                    "center {} outside track {} at position {}",
                    center,
                    track,
                    position
                );
                assert_eq!(bounds.right - bounds.left, cursor);
            }
        }
    }

    #[test]
    fn test_position_cursor_updates_element() {
        let mut element = RecordingElement::default();
        position_cursor(&mut element, 25, &geometry());
        assert_eq!(element.bounds, Some((40, 60)));
        assert_eq!(element.invalidations, 1);
    }
}
