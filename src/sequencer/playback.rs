// Playback state - Shared between the conductor's tick thread and callers
// Thread-safe via atomics, so progress polling never blocks the tick loop

use crate::sequencer::tempo::TRACK_LENGTH;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Shared playback state
/// `current_step` persists across stop/start and is reset only at
/// construction.
#[derive(Debug)]
pub struct SharedPlaybackState {
    running: AtomicBool,
    current_step: AtomicUsize,
}

impl SharedPlaybackState {
    /// Create new playback state at step 0, stopped
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            running: AtomicBool::new(false),
            current_step: AtomicUsize::new(0),
        })
    }

    /// True while a tick loop is active
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Relaxed);
    }

    /// The step index that will play on the next tick
    pub fn current_step(&self) -> usize {
        self.current_step.load(Ordering::Relaxed)
    }

    /// Advance one step, wrapping at the track length
    /// Returns the new step. Only the tick thread writes this.
    pub(crate) fn advance_step(&self) -> usize {
        let next = (self.current_step.load(Ordering::Relaxed) + 1) % TRACK_LENGTH;
        self.current_step.store(next, Ordering::Relaxed);
        next
    }
}
