//! The timeline cursor widget.
//!
//! `VideoEditView` wires the playback clock, the drag controller and the
//! cursor positioner together. Every method is meant to be called from the
//! host's UI context; only the clock's poll thread runs elsewhere.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace, warn};

use crate::config::WidgetConfig;
use crate::cursor::{self, CursorElement, ElementId};
use crate::drag::{DragController, DragState};
use crate::error::WidgetResult;
use crate::geometry::TrackGeometry;
use crate::playback_clock::{DEFAULT_POLL_INTERVAL, PlaybackClock, SharedTimeline};
use crate::source::PositionSource;

pub struct VideoEditView<E: CursorElement> {
    cursor: Option<E>,
    /// Explicit cursor width that wins over the element's measured width
    cursor_width_override: Option<i32>,
    geometry: TrackGeometry,
    timeline: Arc<SharedTimeline>,
    clock: Option<PlaybackClock>,
    drag: DragController,
    poll_interval: Duration,
}

impl<E: CursorElement> Default for VideoEditView<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CursorElement> VideoEditView<E> {
    pub fn new() -> Self {
        VideoEditView {
            cursor: None,
            cursor_width_override: None,
            geometry: TrackGeometry::default(),
            timeline: Arc::new(SharedTimeline::new()),
            clock: None,
            drag: DragController::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Build a widget from loaded settings.
    pub fn with_config(config: &WidgetConfig) -> WidgetResult<Self> {
        let mut view = Self::new();
        view.poll_interval = config.poll_interval();
        view.set_video_duration(config.video_duration);
        if let Some(width) = config.cursor_width {
            view.set_cursor_width(width)?;
        }
        Ok(view)
    }

    /// Register the draggable cursor element.
    ///
    /// The element's measured width becomes the cursor width unless one was
    /// set with [`set_cursor_width`](Self::set_cursor_width).
    pub fn set_drag_cursor_element(&mut self, element: E) -> WidgetResult<()> {
        let width = self
            .cursor_width_override
            .unwrap_or_else(|| element.measured_width());
        self.geometry.set_cursor_width(width)?;
        self.drag.set_cursor_element(element.id());
        self.cursor = Some(element);
        Ok(())
    }

    pub fn set_cursor_width(&mut self, width: i32) -> WidgetResult<()> {
        self.geometry.set_cursor_width(width)?;
        self.cursor_width_override = Some(width);
        Ok(())
    }

    /// Called by the host whenever the track is laid out.
    ///
    /// A changed width re-places the cursor at the current position, unless
    /// the user is dragging it.
    pub fn set_track_width(&mut self, width: i32) -> WidgetResult<()> {
        let previous = self.geometry.track_width();
        self.geometry.set_track_width(width)?;
        if width == previous {
            return Ok(());
        }
        debug!("Track width: {} -> {}", previous, width);
        if self.drag.state() == DragState::Idle {
            if let Some(element) = self.cursor.as_mut() {
                cursor::position_cursor(element, self.timeline.position(), &self.geometry);
            }
        }
        Ok(())
    }

    pub fn set_video_duration(&mut self, duration: u64) {
        self.geometry.set_total_duration(duration);
        self.timeline.set_duration(duration);
    }

    pub fn set_drag_listener<F>(&mut self, listener: F)
    where
        F: FnMut(f32) + Send + 'static,
    {
        self.drag.set_listener(Some(Box::new(listener)));
    }

    pub fn clear_drag_listener(&mut self) {
        self.drag.set_listener(None);
    }

    pub fn set_progress_listener<S>(&mut self, source: S)
    where
        S: PositionSource + 'static,
    {
        self.timeline.set_source(Some(Arc::new(source)));
    }

    /// Start polling. A widget that is already started restarts from 0.
    pub fn start(&mut self) -> WidgetResult<()> {
        if self.clock.is_some() {
            debug!("Playback clock already exists, restarting");
            self.stop();
        }
        if self.timeline.duration() == 0 {
            warn!("Starting playback clock with zero video duration");
        }
        self.clock = Some(PlaybackClock::spawn(
            Arc::clone(&self.timeline),
            self.poll_interval,
        )?);
        Ok(())
    }

    pub fn resume(&self) {
        if let Some(clock) = &self.clock {
            clock.resume();
        }
    }

    pub fn pause(&self) {
        if let Some(clock) = &self.clock {
            clock.pause();
        }
    }

    /// Stop polling. Returns only after the poll thread has exited.
    pub fn stop(&mut self) {
        if let Some(mut clock) = self.clock.take() {
            clock.stop();
        }
    }

    pub fn restart(&mut self) -> WidgetResult<()> {
        self.stop();
        self.start()
    }

    pub fn is_pausing(&self) -> bool {
        self.clock.as_ref().is_some_and(PlaybackClock::is_pausing)
    }

    pub fn is_started(&self) -> bool {
        self.clock.is_some()
    }

    pub fn current_position(&self) -> u64 {
        self.timeline.position()
    }

    /// Apply the latest polled position to the cursor element.
    ///
    /// Must be called regularly from the UI context. Returns true when the
    /// cursor was moved.
    pub fn pump(&mut self) -> bool {
        let Some(update) = self.clock.as_ref().and_then(PlaybackClock::latest_update) else {
            return false;
        };
        if self.drag.state() != DragState::Idle {
            trace!("Drag in progress, skipping polled position {}", update.position);
            return false;
        }
        let Some(element) = self.cursor.as_mut() else {
            return false;
        };
        cursor::position_cursor(element, update.position, &self.geometry);
        true
    }

    pub fn try_capture(&self, candidate: ElementId) -> bool {
        self.drag.try_capture(candidate)
    }

    /// Returns the reported fraction when this change completed a drag.
    pub fn on_drag_state_changed(&mut self, state: DragState) -> Option<f32> {
        self.drag
            .on_state_changed(state, &self.geometry, &self.clock)
    }

    pub fn clamp_horizontal(&self, proposed_left: i32) -> i32 {
        let element_width = self
            .cursor
            .as_ref()
            .map_or(self.geometry.cursor_width(), CursorElement::width);
        self.drag
            .clamp_horizontal(proposed_left, element_width, &self.geometry)
    }

    pub fn clamp_vertical(&self, proposed_top: i32, current_top: i32) -> i32 {
        self.drag.clamp_vertical(proposed_top, current_top)
    }

    /// Move the cursor element to a drag offset the host has already clamped.
    pub fn on_drag_position_changed(&mut self, left: i32) {
        if let Some(element) = self.cursor.as_mut() {
            element.set_horizontal_bounds(left, left + self.geometry.cursor_width());
            element.invalidate();
        }
        self.drag.on_position_changed(left, &self.geometry);
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn geometry(&self) -> &TrackGeometry {
        &self.geometry
    }

    pub fn cursor_element(&self) -> Option<&E> {
        self.cursor.as_ref()
    }
}
