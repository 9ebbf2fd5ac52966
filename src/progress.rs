//! Simulated playback progress for the demo.
//!
//! Stands in for a media player: a background thread advances the position
//! by one unit every 100ms while playing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

#[derive(Clone)]
pub struct DemoProgress {
    position: Arc<AtomicU64>,
    playing: Arc<AtomicBool>,
    duration: u64,
}

impl DemoProgress {
    /// Spawn the progress thread, initially playing from 0.
    pub fn spawn(duration: u64) -> std::io::Result<Self> {
        let progress = DemoProgress {
            position: Arc::new(AtomicU64::new(0)),
            playing: Arc::new(AtomicBool::new(true)),
            duration,
        };

        let position = Arc::clone(&progress.position);
        let playing = Arc::clone(&progress.playing);
        thread::Builder::new()
            .name("demo-progress".to_string())
            .spawn(move || {
                log::info!("Demo progress thread started, duration={}", duration);
                loop {
                    thread::sleep(TICK);
                    if !playing.load(Ordering::Acquire) {
                        continue;
                    }
                    let current = position.load(Ordering::Acquire);
                    if current < duration {
                        position.store(current + 1, Ordering::Release);
                    }
                }
            })?;

        Ok(progress)
    }

    pub fn current_position(&self) -> u64 {
        self.position.load(Ordering::Acquire)
    }

    pub fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::Release);
    }

    /// Jump to `fraction` of the duration.
    pub fn seek_fraction(&self, fraction: f32) {
        let target = (self.duration as f64 * f64::from(fraction.clamp(0.0, 1.0))).round() as u64;
        log::info!("Demo progress seek to {}/{}", target, self.duration);
        self.position.store(target, Ordering::Release);
    }
}
