//! Background thread that polls the playback position.
//!
//! The poll thread never touches the cursor element. It publishes
//! [`PositionUpdate`]s over a channel owned by the clock, and the UI context
//! applies them (see `VideoEditView::pump`).
//!
//! Locking: the playback state and the shared position are guarded by
//! separate mutexes. No code path holds more than one of them at a time.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error, info, trace, warn};

use crate::error::WidgetResult;
use crate::source::PositionSource;

/// Default interval between two position polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

const POLL_THREAD_NAME: &str = "cursor-position-poll";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Playing,
    Pausing,
    Stopping,
}

/// Message sent from the poll thread to the UI context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionUpdate {
    pub position: u64,
}

/// Playback position and duration shared between the UI context and the
/// poll thread.
#[derive(Default)]
pub struct SharedTimeline {
    position: Mutex<u64>,
    duration: AtomicU64,
    source: Mutex<Option<Arc<dyn PositionSource>>>,
}

impl SharedTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> u64 {
        *lock_or_recover(&self.position, "position")
    }

    pub fn reset_position(&self) {
        *lock_or_recover(&self.position, "position") = 0;
    }

    pub fn duration(&self) -> u64 {
        self.duration.load(Ordering::Acquire)
    }

    pub fn set_duration(&self, duration: u64) {
        self.duration.store(duration, Ordering::Release);
    }

    pub fn set_source(&self, source: Option<Arc<dyn PositionSource>>) {
        *lock_or_recover(&self.source, "position source") = source;
    }

    /// Read the source under the position lock and store the result.
    ///
    /// Without a source the last stored position is kept.
    fn poll_source(&self) -> u64 {
        // The source guard is released at the end of this statement
        let source = lock_or_recover(&self.source, "position source").clone();
        let mut position = lock_or_recover(&self.position, "position");
        if let Some(source) = source {
            *position = source.current_position();
        }
        *position
    }
}

/// Playback state plus the condition variable the poll thread sleeps on.
struct StateCell {
    state: Mutex<PlaybackState>,
    wake: Condvar,
    /// Set by `resume`; the next poll republishes even an unchanged position
    resync: AtomicBool,
}

impl StateCell {
    fn new(state: PlaybackState) -> Self {
        StateCell {
            state: Mutex::new(state),
            wake: Condvar::new(),
            resync: AtomicBool::new(false),
        }
    }

    fn get(&self) -> PlaybackState {
        *lock_or_recover(&self.state, "playback state")
    }

    fn take_resync(&self) -> bool {
        self.resync.swap(false, Ordering::AcqRel)
    }

    /// Block while pausing, then return the state that ended the wait.
    fn wait_while_pausing(&self) -> PlaybackState {
        let guard = lock_or_recover(&self.state, "playback state");
        if *guard == PlaybackState::Pausing {
            debug!("Poll thread paused, waiting for resume");
        }
        let guard = match self
            .wake
            .wait_while(guard, |state| *state == PlaybackState::Pausing)
        {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Playback state lock poisoned while paused, re-checking state");
                poisoned.into_inner()
            }
        };
        *guard
    }

    /// Sleep for `interval`, returning early only when stopping.
    fn sleep(&self, interval: Duration) {
        let guard = lock_or_recover(&self.state, "playback state");
        if self
            .wake
            .wait_timeout_while(guard, interval, |state| *state != PlaybackState::Stopping)
            .is_err()
        {
            warn!("Playback state lock poisoned during poll sleep, continuing");
        }
    }
}

/// Owns one poll thread from `spawn` until `stop`.
pub struct PlaybackClock {
    control: Arc<StateCell>,
    timeline: Arc<SharedTimeline>,
    updates: mpsc::Receiver<PositionUpdate>,
    handle: Option<JoinHandle<()>>,
}

impl PlaybackClock {
    /// Spawn the poll thread in the `Playing` state.
    pub fn spawn(timeline: Arc<SharedTimeline>, interval: Duration) -> WidgetResult<Self> {
        let control = Arc::new(StateCell::new(PlaybackState::Playing));
        let (tx, rx) = mpsc::channel();

        let thread_control = Arc::clone(&control);
        let thread_timeline = Arc::clone(&timeline);
        let handle = thread::Builder::new()
            .name(POLL_THREAD_NAME.to_string())
            .spawn(move || run_poll_loop(&thread_control, &thread_timeline, &tx, interval))?;

        info!(
            "Playback clock started (interval={}ms, duration={})",
            interval.as_millis(),
            timeline.duration()
        );

        Ok(PlaybackClock {
            control,
            timeline,
            updates: rx,
            handle: Some(handle),
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.control.get()
    }

    pub fn is_pausing(&self) -> bool {
        self.state() == PlaybackState::Pausing
    }

    /// Pause polling. A clock whose thread already exited at end of video
    /// stays `Playing`.
    pub fn pause(&self) {
        if self.is_finished() {
            debug!("Poll thread already finished, ignoring pause");
            return;
        }
        let mut state = lock_or_recover(&self.control.state, "playback state");
        if *state == PlaybackState::Playing {
            *state = PlaybackState::Pausing;
            debug!("Playback state: Playing -> Pausing");
        }
    }

    /// Wake a paused poll thread. Does nothing unless pausing.
    pub fn resume(&self) {
        let mut state = lock_or_recover(&self.control.state, "playback state");
        if *state == PlaybackState::Pausing {
            *state = PlaybackState::Playing;
            self.control.resync.store(true, Ordering::Release);
            self.control.wake.notify_all();
            debug!("Playback state: Pausing -> Playing");
        }
    }

    /// Stop the poll thread and wait for it to exit, then reset the position.
    ///
    /// Safe to call more than once.
    pub fn stop(&mut self) {
        {
            let mut state = lock_or_recover(&self.control.state, "playback state");
            *state = PlaybackState::Stopping;
            self.control.wake.notify_all();
        }

        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(()) => info!("Playback clock stopped, poll thread joined"),
                Err(e) => error!("Poll thread panicked: {:?}", e),
            }
        }

        self.timeline.reset_position();
    }

    /// True once the poll thread has exited, either stopped or at end of video.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|handle| handle.is_finished())
    }

    /// Drain pending updates, returning only the most recent one.
    pub fn latest_update(&self) -> Option<PositionUpdate> {
        self.updates.try_iter().last()
    }
}

impl Drop for PlaybackClock {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.stop();
        }
    }
}

fn run_poll_loop(
    control: &StateCell,
    timeline: &SharedTimeline,
    tx: &mpsc::Sender<PositionUpdate>,
    interval: Duration,
) {
    let mut last_seen: Option<u64> = None;

    loop {
        let position = timeline.position();
        let duration = timeline.duration();
        if position > duration {
            info!(
                "Playback reached end of video (position={}, duration={})",
                position, duration
            );
            break;
        }

        if control.wait_while_pausing() == PlaybackState::Stopping {
            timeline.reset_position();
            debug!("Poll thread observed Stopping, exiting");
            break;
        }
        if control.take_resync() {
            // The cursor may have been dragged away while paused
            last_seen = None;
        }

        let current = timeline.poll_source();
        if last_seen != Some(current) {
            trace!(
                "Position poll: {} (thread: {:?})",
                current,
                thread::current().id()
            );
            if tx.send(PositionUpdate { position: current }).is_err() {
                warn!("UI context disconnected, stopping poll thread");
                return;
            }
            last_seen = Some(current);
        }

        control.sleep(interval);
    }
}

/// Lock `mutex`, recovering the value if a previous holder panicked.
fn lock_or_recover<'a, T: ?Sized>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("{} lock poisoned, recovering", what);
        poisoned.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_without_source_keeps_position() {
        let timeline = SharedTimeline::new();
        assert_eq!(timeline.poll_source(), 0);
    }

    #[test]
    fn test_timeline_polls_source() {
        let timeline = SharedTimeline::new();
        timeline.set_source(Some(Arc::new(|| 42u64)));
        assert_eq!(timeline.poll_source(), 42);
        assert_eq!(timeline.position(), 42);
        timeline.reset_position();
        assert_eq!(timeline.position(), 0);
    }

    #[test]
    fn test_pause_and_resume_ignored_after_stop() {
        let timeline = Arc::new(SharedTimeline::new());
        timeline.set_duration(10);
        let mut clock = PlaybackClock::spawn(timeline, Duration::from_millis(5)).unwrap();
        clock.stop();
        clock.pause();
        assert_eq!(clock.state(), PlaybackState::Stopping);
        clock.resume();
        assert_eq!(clock.state(), PlaybackState::Stopping);
        assert!(clock.is_finished());
    }

    #[test]
    fn test_pause_ignored_after_end_of_video() {
        let timeline = Arc::new(SharedTimeline::new());
        timeline.set_duration(10);
        timeline.set_source(Some(Arc::new(|| 50u64)));
        let clock = PlaybackClock::spawn(timeline, Duration::from_millis(5)).unwrap();
        for _ in 0..400 {
            if clock.is_finished() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert!(clock.is_finished());
        clock.pause();
        assert!(!clock.is_pausing());
        assert_eq!(clock.state(), PlaybackState::Playing);
    }

    #[test]
    fn test_poisoned_position_lock_recovers() {
        let timeline = Arc::new(SharedTimeline::new());
        timeline.set_duration(100);
        *timeline.position.lock().unwrap() = 9;

        thread::scope(|scope| {
            let holder = scope.spawn(|| {
                let _guard = timeline.position.lock().unwrap();
                panic!("panic while holding the position lock");
            });
            assert!(holder.join().is_err());
        });
        assert!(timeline.position.is_poisoned());

        assert_eq!(timeline.position(), 9);
        timeline.reset_position();
        assert_eq!(timeline.position(), 0);
        timeline.set_source(Some(Arc::new(|| 33u64)));
        assert_eq!(timeline.poll_source(), 33);

        let mut clock =
            PlaybackClock::spawn(Arc::clone(&timeline), Duration::from_millis(5)).unwrap();
        for _ in 0..400 {
            if clock.latest_update().is_some() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        clock.stop();
        assert!(clock.is_finished());
        assert_eq!(timeline.position(), 0);
    }

    #[test]
    fn test_resume_republishes_unchanged_position() {
        let timeline = Arc::new(SharedTimeline::new());
        timeline.set_duration(100);
        timeline.set_source(Some(Arc::new(|| 7u64)));
        let clock = PlaybackClock::spawn(timeline, Duration::from_millis(5)).unwrap();

        let mut first = None;
        for _ in 0..400 {
            first = clock.latest_update();
            if first.is_some() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(first, Some(PositionUpdate { position: 7 }));

        clock.pause();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(clock.latest_update(), None);
        clock.resume();

        let mut again = None;
        for _ in 0..400 {
            again = clock.latest_update();
            if again.is_some() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(again, Some(PositionUpdate { position: 7 }));
    }

    #[test]
    fn test_latest_update_drains_channel() {
        let timeline = Arc::new(SharedTimeline::new());
        timeline.set_duration(100);
        timeline.set_source(Some(Arc::new(|| 7u64)));
        let clock = PlaybackClock::spawn(timeline, Duration::from_millis(5)).unwrap();

        let mut update = None;
        for _ in 0..200 {
            update = clock.latest_update();
            if update.is_some() {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(update, Some(PositionUpdate { position: 7 }));
        // Unchanged position is not re-sent
        thread::sleep(Duration::from_millis(30));
        assert_eq!(clock.latest_update(), None);
    }
}
