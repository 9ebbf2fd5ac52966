//! UI-side pump for polled cursor positions.
//!
//! The playback clock polls on its own thread; this subscription drains its
//! updates on the UI thread so the cursor is only ever moved here.

use std::time::Duration;

use iced::Subscription;

use crate::message::Message;

/// Pump rate, a few times faster than the clock's 100ms poll
const PUMP_INTERVAL: Duration = Duration::from_millis(16);

/// Pump position updates while a playback clock exists.
///
/// A stopped widget has no clock to drain, so no ticks are scheduled.
pub fn position_pump_subscription(clock_running: bool) -> Subscription<Message> {
    if clock_running {
        iced::time::every(PUMP_INTERVAL).map(|_| Message::PositionTick)
    } else {
        Subscription::none()
    }
}
