//! Playback position supplier.

/// Supplies the current playback position, in the same units as the video
/// duration. Called once per poll from the poll thread; must not block.
pub trait PositionSource: Send + Sync {
    fn current_position(&self) -> u64;
}

impl<F> PositionSource for F
where
    F: Fn() -> u64 + Send + Sync,
{
    fn current_position(&self) -> u64 {
        self()
    }
}
