use iced::widget::canvas::{self, Event, Frame, Geometry, Path, Program, Stroke};
use iced::widget::{button, canvas as canvas_widget, column, container, row, text};
use iced::{Color, Element, Length, Point, Rectangle, Size, Theme, mouse};

use crate::message::Message;
use crate::state::{App, CanvasCursor};

const TRACK_HEIGHT: f32 = 64.0;

/// Canvas state for tracking pointer interaction with the timeline
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineInteraction {
    pub pressed: bool,
}

/// Canvas program drawing the track and its cursor.
///
/// Raw mouse input is turned into pointer messages; whether a press grabs
/// the cursor is decided by the widget in `App::update`.
pub struct TimelineCanvas<'a> {
    pub cursor: Option<&'a CanvasCursor>,
    pub track_width: i32,
}

impl Program<Message> for TimelineCanvas<'_> {
    type State = TimelineInteraction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        timeline_message(interaction, event, bounds, cursor, self.track_width)
            .map(canvas::Action::publish)
    }

    fn mouse_interaction(
        &self,
        interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        let over_cursor = cursor
            .position_in(bounds)
            .zip(self.cursor)
            .is_some_and(|(position, element)| element.contains(position.x));
        if interaction.pressed {
            mouse::Interaction::Grabbing
        } else if over_cursor {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }

    fn draw(
        &self,
        _interaction: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let height = bounds.height;

        // Track
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), Color::from_rgb(0.1, 0.1, 0.12));
        frame.stroke(
            &Path::line(Point::new(0.0, height / 2.0), Point::new(bounds.width, height / 2.0)),
            Stroke::default()
                .with_color(Color::from_rgb(0.35, 0.35, 0.4))
                .with_width(2.0),
        );

        if let Some(element) = self.cursor {
            let left = element.left as f32;
            let width = (element.right - element.left) as f32;
            frame.fill_rectangle(
                Point::new(left, 0.0),
                Size::new(width, height),
                Color::from_rgba(1.0, 0.55, 0.1, 0.6),
            );
            let center = left + width / 2.0;
            frame.stroke(
                &Path::line(Point::new(center, 0.0), Point::new(center, height)),
                Stroke::default()
                    .with_color(Color::WHITE)
                    .with_width(2.0),
            );
        }

        vec![frame.into_geometry()]
    }
}

/// Translate a canvas event into a timeline message.
fn timeline_message(
    interaction: &mut TimelineInteraction,
    event: &Event,
    bounds: Rectangle,
    cursor: mouse::Cursor,
    track_width: i32,
) -> Option<Message> {
    match event {
        Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
            if let Some(position) = cursor.position_in(bounds) {
                interaction.pressed = true;
                return Some(Message::PointerPressed(position.x));
            }
        }
        Event::Mouse(mouse::Event::CursorMoved { position }) => {
            // Keep tracking outside the canvas so the drag can reach either end
            if interaction.pressed {
                return Some(Message::PointerMoved(position.x - bounds.x));
            }
        }
        Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
            if interaction.pressed {
                interaction.pressed = false;
                return Some(Message::PointerReleased);
            }
        }
        _ => {}
    }

    // Pointer events take priority; a pending resize goes out with the
    // next event that did not publish anything
    if bounds.width.round() as i32 != track_width {
        return Some(Message::TrackResized(bounds.width));
    }

    None
}

/// Render the main view.
pub fn render_main_view(app: &App) -> Element<'_, Message> {
    let timeline = canvas_widget(TimelineCanvas {
        cursor: app.view.cursor_element(),
        track_width: app.view.geometry().track_width(),
    })
    .width(Length::Fill)
    .height(Length::Fixed(TRACK_HEIGHT));

    let controls = row![
        button(text("Play").size(14)).on_press(Message::Play).padding(8),
        button(text("Pause").size(14)).on_press(Message::Pause).padding(8),
        button(text("Stop").size(14)).on_press(Message::Stop).padding(8),
        button(text("Restart").size(14)).on_press(Message::Restart).padding(8),
        text(format!(
            "{} / {}{}",
            app.view.current_position(),
            app.view.geometry().total_duration(),
            if app.view.is_pausing() { " (paused)" } else { "" }
        ))
        .size(14),
    ]
    .spacing(5);

    let mut content = column![timeline, controls, text(&app.status).size(14)]
        .spacing(10)
        .padding(20);

    if let Some(error) = &app.error {
        content = content.push(text(error).size(14).color(Color::from_rgb(1.0, 0.3, 0.3)));
    }

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
