use std::sync::mpsc;

use iced::{Element, Subscription, Task};
use video_edit_view::{DragState, VideoEditView, WidgetConfig};

use crate::message::Message;
use crate::position_poller;
use crate::progress::DemoProgress;
use crate::state::{App, CURSOR_ID, CanvasCursor, DEMO_DURATION, TRACK_ID};
use crate::ui;

/// Cursor width used when the config does not override it
const DEFAULT_CURSOR_WIDTH: i32 = 12;

impl App {
    /// Build the demo state and start playback.
    pub fn new() -> (Self, Task<Message>) {
        let mut config = WidgetConfig::load_or_default();
        if config.video_duration == 0 {
            config.video_duration = DEMO_DURATION;
        }

        let (tx, rx) = mpsc::channel();
        let mut app = App {
            view: VideoEditView::new(),
            progress: None,
            drag_done: rx,
            grab_offset: None,
            error: None,
            status: "Drag the cursor to scrub".to_string(),
        };

        match VideoEditView::with_config(&config) {
            Ok(view) => app.view = view,
            Err(e) => app.error = Some(format!("Invalid config: {}", e)),
        }
        if let Err(e) = app
            .view
            .set_drag_cursor_element(CanvasCursor::new(DEFAULT_CURSOR_WIDTH))
        {
            app.error = Some(format!("Invalid cursor: {}", e));
        }
        app.view.set_drag_listener(move |fraction| {
            let _ = tx.send(fraction);
        });

        match DemoProgress::spawn(config.video_duration) {
            Ok(progress) => {
                let source = progress.clone();
                app.view
                    .set_progress_listener(move || source.current_position());
                app.progress = Some(progress);
                app.start_playback();
            }
            Err(e) => app.error = Some(format!("Failed to start demo progress: {}", e)),
        }

        (app, Task::none())
    }

    /// Handle UI messages and state updates.
    pub fn update(&mut self, message: Message) {
        match message {
            Message::PositionTick => {
                self.view.pump();
            }
            Message::TrackResized(width) => {
                if let Err(e) = self.view.set_track_width(width.round() as i32) {
                    self.error = Some(e.to_string());
                }
            }
            Message::PointerPressed(x) => {
                let Some(cursor) = self.view.cursor_element() else {
                    return;
                };
                let candidate = if cursor.contains(x) { CURSOR_ID } else { TRACK_ID };
                if self.view.try_capture(candidate) {
                    self.grab_offset = Some(x - cursor.left as f32);
                    self.view.on_drag_state_changed(DragState::Dragging);
                    self.set_progress_playing(false);
                }
            }
            Message::PointerMoved(x) => {
                if let Some(offset) = self.grab_offset {
                    let left = self.view.clamp_horizontal((x - offset).round() as i32);
                    self.view.on_drag_position_changed(left);
                }
            }
            Message::PointerReleased => {
                if self.grab_offset.take().is_some() {
                    // The canvas has no fling, so settling ends immediately
                    self.view.on_drag_state_changed(DragState::Settling);
                    self.view.on_drag_state_changed(DragState::Idle);
                    self.apply_drag_results();
                }
            }
            Message::Play => {
                if self.view.is_started() {
                    self.view.resume();
                    self.set_progress_playing(true);
                } else {
                    self.start_playback();
                }
            }
            Message::Pause => {
                self.view.pause();
                self.set_progress_playing(false);
            }
            Message::Stop => {
                self.view.stop();
                self.seek_progress(0.0);
                self.set_progress_playing(false);
                self.status = "Stopped".to_string();
            }
            Message::Restart => {
                self.seek_progress(0.0);
                if let Err(e) = self.view.restart() {
                    self.error = Some(e.to_string());
                }
                self.set_progress_playing(true);
            }
        }
    }

    /// Subscribe to events.
    pub fn subscription(&self) -> Subscription<Message> {
        position_poller::position_pump_subscription(self.view.is_started())
    }

    /// Render the view.
    pub fn view(&self) -> Element<'_, Message> {
        ui::render_main_view(self)
    }

    fn start_playback(&mut self) {
        match self.view.start() {
            Ok(()) => {
                self.error = None;
                self.set_progress_playing(true);
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Seek the simulated player to each reported drag position and resume.
    fn apply_drag_results(&mut self) {
        let Some(fraction) = self.drag_done.try_iter().last() else {
            return;
        };
        self.status = format!("Drag done: {:.1}%", fraction * 100.0);
        self.seek_progress(fraction);
        self.view.resume();
        self.set_progress_playing(true);
    }

    fn seek_progress(&self, fraction: f32) {
        if let Some(progress) = &self.progress {
            progress.seek_fraction(fraction);
        }
    }

    fn set_progress_playing(&self, playing: bool) {
        if let Some(progress) = &self.progress {
            progress.set_playing(playing);
        }
    }
}
