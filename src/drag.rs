//! Drag session handling for the timeline cursor.
//!
//! The host's gesture plumbing reports capture attempts, state changes and
//! position changes; this module decides what they mean for playback.

use log::debug;

use crate::cursor::ElementId;
use crate::geometry::TrackGeometry;
use crate::playback_clock::PlaybackClock;

/// Callback invoked once per completed drag with the cursor centre as a
/// fraction of the track width, in `[0, 1]`.
pub type DragListener = Box<dyn FnMut(f32) + Send>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    /// No gesture in progress
    #[default]
    Idle,
    /// Pointer is holding the cursor
    Dragging,
    /// Pointer released, cursor is flinging or snapping into place
    Settling,
}

/// The subset of playback control a drag needs.
pub trait PlaybackControl {
    fn is_pausing(&self) -> bool;
    fn pause(&self);
}

impl PlaybackControl for PlaybackClock {
    fn is_pausing(&self) -> bool {
        PlaybackClock::is_pausing(self)
    }

    fn pause(&self) {
        PlaybackClock::pause(self);
    }
}

/// A widget that was never started has nothing to pause.
impl PlaybackControl for Option<PlaybackClock> {
    fn is_pausing(&self) -> bool {
        self.as_ref().is_some_and(PlaybackClock::is_pausing)
    }

    fn pause(&self) {
        if let Some(clock) = self {
            clock.pause();
        }
    }
}

#[derive(Default)]
pub struct DragController {
    state: DragState,
    cursor_id: Option<ElementId>,
    /// Cursor centre at the last reported position
    last_left: i32,
    listener: Option<DragListener>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_cursor_element(&mut self, id: ElementId) {
        self.cursor_id = Some(id);
    }

    pub fn set_listener(&mut self, listener: Option<DragListener>) {
        self.listener = listener;
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Only the registered cursor element may start a drag.
    pub fn try_capture(&self, candidate: ElementId) -> bool {
        self.cursor_id == Some(candidate)
    }

    /// Apply a gesture state change.
    ///
    /// Returns the fraction reported to the listener when this change
    /// completed a drag.
    pub fn on_state_changed(
        &mut self,
        new_state: DragState,
        geometry: &TrackGeometry,
        playback: &dyn PlaybackControl,
    ) -> Option<f32> {
        let previous = self.state;
        self.state = new_state;
        if previous != new_state {
            debug!("Drag state: {:?} -> {:?}", previous, new_state);
        }

        match new_state {
            DragState::Dragging => {
                if !playback.is_pausing() {
                    playback.pause();
                }
                None
            }
            DragState::Idle if previous != DragState::Idle => {
                let fraction = drag_fraction(self.last_left, geometry.track_width());
                debug!(
                    "Drag done: center={}px of {}px, fraction={:.3}",
                    self.last_left,
                    geometry.track_width(),
                    fraction
                );
                if let Some(listener) = self.listener.as_mut() {
                    listener(fraction);
                }
                Some(fraction)
            }
            DragState::Idle | DragState::Settling => None,
        }
    }

    /// Record the element's new left offset.
    pub fn on_position_changed(&mut self, left: i32, geometry: &TrackGeometry) {
        self.last_left = left + geometry.half_cursor();
    }

    /// Constrain a proposed left offset so the cursor centre can reach both
    /// ends of the track but no further.
    pub fn clamp_horizontal(
        &self,
        proposed_left: i32,
        element_width: i32,
        geometry: &TrackGeometry,
    ) -> i32 {
        let half_cursor = geometry.half_cursor();
        if proposed_left < 0 && proposed_left.abs() > half_cursor {
            return -half_cursor;
        }

        let max_left = geometry.track_width() - element_width / 2;
        if proposed_left > max_left {
            return max_left;
        }

        proposed_left
    }

    /// Drags are horizontal only.
    pub fn clamp_vertical(&self, _proposed_top: i32, current_top: i32) -> i32 {
        current_top
    }
}

/// Normalize a cursor centre offset against the track width.
pub fn drag_fraction(center: i32, track_width: i32) -> f32 {
    if track_width <= 0 {
        return 0.0;
    }
    (center as f32 / track_width as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakePlayback {
        pausing: Cell<bool>,
        pause_calls: Cell<usize>,
    }

    impl PlaybackControl for FakePlayback {
        fn is_pausing(&self) -> bool {
            self.pausing.get()
        }

        fn pause(&self) {
            self.pausing.set(true);
            self.pause_calls.set(self.pause_calls.get() + 1);
        }
    }

    fn geometry() -> TrackGeometry {
        TrackGeometry::new(200, 20, 100).unwrap()
    }

    fn controller_with_log() -> (DragController, Arc<Mutex<Vec<f32>>>) {
        let reported = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reported);
        let mut controller = DragController::new();
        controller.set_cursor_element(ElementId(7));
        controller.set_listener(Some(Box::new(move |fraction| {
            sink.lock().unwrap().push(fraction);
        })));
        (controller, reported)
    }

    #[test]
    fn test_capture_only_registered_cursor() {
        let mut controller = DragController::new();
        assert!(!controller.try_capture(ElementId(7)));
        controller.set_cursor_element(ElementId(7));
        assert!(controller.try_capture(ElementId(7)));
        assert!(!controller.try_capture(ElementId(8)));
    }

    #[test]
    fn test_drag_start_pauses_once() {
        let (mut controller, _) = controller_with_log();
        let playback = FakePlayback::default();
        controller.on_state_changed(DragState::Dragging, &geometry(), &playback);
        controller.on_state_changed(DragState::Dragging, &geometry(), &playback);
        assert!(playback.is_pausing());
        assert_eq!(playback.pause_calls.get(), 1);
    }

    #[test]
    fn test_drag_start_when_already_paused() {
        let (mut controller, _) = controller_with_log();
        let playback = FakePlayback::default();
        playback.pausing.set(true);
        controller.on_state_changed(DragState::Dragging, &geometry(), &playback);
        assert_eq!(playback.pause_calls.get(), 0);
    }

    #[test]
    fn test_drag_done_reports_center_fraction() {
        let (mut controller, reported) = controller_with_log();
        let playback = FakePlayback::default();
        let geometry = geometry();

        controller.on_state_changed(DragState::Dragging, &geometry, &playback);
        controller.on_position_changed(40, &geometry);
        controller.on_state_changed(DragState::Settling, &geometry, &playback);
        let fraction = controller.on_state_changed(DragState::Idle, &geometry, &playback);

        assert_eq!(fraction, Some(0.25));
        assert_eq!(*reported.lock().unwrap(), vec![0.25]);
        assert_eq!(controller.state(), DragState::Idle);
    }

    #[test]
    fn test_idle_without_drag_reports_nothing() {
        let (mut controller, reported) = controller_with_log();
        let playback = FakePlayback::default();
        assert_eq!(
            controller.on_state_changed(DragState::Idle, &geometry(), &playback),
            None
        );
        assert!(reported.lock().unwrap().is_empty());
    }

    #[test]
    fn test_fraction_at_track_extremes() {
        let (mut controller, reported) = controller_with_log();
        let playback = FakePlayback::default();
        let geometry = geometry();

        let left = controller.clamp_horizontal(-500, 20, &geometry);
        assert_eq!(left, -10);
        controller.on_state_changed(DragState::Dragging, &geometry, &playback);
        controller.on_position_changed(left, &geometry);
        controller.on_state_changed(DragState::Idle, &geometry, &playback);

        let right = controller.clamp_horizontal(900, 20, &geometry);
        assert_eq!(right, 190);
        controller.on_state_changed(DragState::Dragging, &geometry, &playback);
        controller.on_position_changed(right, &geometry);
        controller.on_state_changed(DragState::Idle, &geometry, &playback);

        assert_eq!(*reported.lock().unwrap(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_clamp_passes_through_inside_track() {
        let controller = DragController::new();
        let geometry = geometry();
        assert_eq!(controller.clamp_horizontal(-10, 20, &geometry), -10);
        assert_eq!(controller.clamp_horizontal(0, 20, &geometry), 0);
        assert_eq!(controller.clamp_horizontal(120, 20, &geometry), 120);
        assert_eq!(controller.clamp_horizontal(190, 20, &geometry), 190);
    }

    #[test]
    fn test_vertical_movement_locked() {
        let controller = DragController::new();
        assert_eq!(controller.clamp_vertical(55, 3), 3);
    }

    #[test]
    fn test_fraction_guards_unmeasured_track() {
        assert_eq!(drag_fraction(50, 0), 0.0);
        assert_eq!(drag_fraction(250, 200), 1.0);
        assert_eq!(drag_fraction(-5, 200), 0.0);
    }
}
