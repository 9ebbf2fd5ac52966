#[derive(Clone, Debug)]
pub enum Message {
    PositionTick,
    TrackResized(f32),
    PointerPressed(f32),
    PointerMoved(f32),
    PointerReleased,
    Play,
    Pause,
    Stop,
    Restart,
}
