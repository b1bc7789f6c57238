// Conductor - Owns the tick loop that drives playback
// Each tick reads the active track at the current step, fires the matching
// instrument triggers, and advances the step index.

use crate::instruments::InstrumentRegistry;
use crate::messaging::channels::NotificationProducer;
use crate::messaging::notification::{Notification, NotificationCategory};
use crate::sequencer::playback::SharedPlaybackState;
use crate::sequencer::tempo::Tempo;
use crate::sequencer::track::Track;
use log::{debug, info, warn};
use ringbuf::traits::Producer;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Instant;

/// Errors raised by conductor control calls
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConductorError {
    #[error("no track loaded")]
    NoTrack,

    #[error("track references unknown instrument '{0}'")]
    InvalidTrack(String),
}

/// Handle to a running tick loop
/// Dropped (cancelled and joined) on stop or restart; a fresh flag per loop
/// means a stale worker can never be resurrected by a later start.
struct TickWorker {
    cancel: Arc<AtomicBool>,
    handle: thread::JoinHandle<()>,
}

/// Clock/scheduler for step playback
///
/// Control calls (`set_track`, `start`, `stop`) expect a single-writer
/// caller; `is_playing()` and `progress()` are safe from any thread.
pub struct Conductor {
    registry: Arc<InstrumentRegistry>,
    // Shared with the tick thread; the loop re-reads it every tick so a
    // track swapped in while running takes effect without a restart
    track: Arc<Mutex<Option<Arc<Track>>>>,
    playback: Arc<SharedPlaybackState>,
    tempo: Tempo,
    notification_tx: Arc<Mutex<NotificationProducer>>,
    worker: Option<TickWorker>,
}

impl Conductor {
    /// Create a new conductor at the given tempo
    /// The registry is fixed for the conductor's lifetime.
    pub fn new(
        registry: Arc<InstrumentRegistry>,
        tempo: Tempo,
        notification_tx: Arc<Mutex<NotificationProducer>>,
    ) -> Self {
        Self {
            registry,
            track: Arc::new(Mutex::new(None)),
            playback: SharedPlaybackState::new(),
            tempo,
            notification_tx,
            worker: None,
        }
    }

    fn lock_track(slot: &Mutex<Option<Arc<Track>>>) -> MutexGuard<'_, Option<Arc<Track>>> {
        // The slot only ever holds a whole Arc swap, so a poisoned guard
        // still contains a consistent value
        slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shared playback state (for UI progress polling)
    pub fn playback_state(&self) -> Arc<SharedPlaybackState> {
        Arc::clone(&self.playback)
    }

    /// Get the current tempo
    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// Set the tempo; takes effect on the next `start()`
    pub fn set_tempo(&mut self, tempo: Tempo) {
        self.tempo = tempo;
    }

    /// The currently active track, if any
    pub fn track(&self) -> Option<Arc<Track>> {
        Self::lock_track(&self.track).clone()
    }

    /// Make `track` the active track
    ///
    /// Every instrument in the track must be known to the registry; on
    /// failure the previously active track (if any) stays active. A
    /// successful swap while playing is picked up on the next tick.
    pub fn set_track(&mut self, track: Arc<Track>) -> Result<(), ConductorError> {
        for name in track.instrument_names() {
            if !self.registry.contains(&name) {
                return Err(ConductorError::InvalidTrack(name));
            }
        }
        *Self::lock_track(&self.track) = Some(track);
        Ok(())
    }

    /// Start the tick loop
    ///
    /// Fails if no track is set. If already running, performs a clean
    /// restart: the existing loop is stopped and joined before the new one
    /// spawns, so two loops never run concurrently. The step index is
    /// preserved across a restart.
    pub fn start(&mut self) -> Result<(), ConductorError> {
        if Self::lock_track(&self.track).is_none() {
            return Err(ConductorError::NoTrack);
        }

        self.stop();

        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_flag = Arc::clone(&cancel);
        let playback = Arc::clone(&self.playback);
        let registry = Arc::clone(&self.registry);
        let notification_tx = Arc::clone(&self.notification_tx);
        let slot = Arc::clone(&self.track);
        let interval = self.tempo.tick_interval();

        // Visible before the first tick can fire
        self.playback.set_running(true);

        let handle = thread::spawn(move || {
            debug!("tick loop started (interval {:?})", interval);
            let mut next_tick = Instant::now();

            while !cancel_flag.load(Ordering::Relaxed) {
                // Fresh read every tick so set_track swaps take effect
                // mid-playback
                let track = Self::lock_track(&slot).clone();
                if let Some(track) = track {
                    Self::run_tick(&track, &registry, &playback, &notification_tx);
                }

                next_tick += interval;
                match next_tick.checked_duration_since(Instant::now()) {
                    Some(wait) => thread::sleep(wait),
                    // A slow tick put us behind schedule; resync instead of
                    // firing a catch-up burst
                    None => next_tick = Instant::now(),
                }
            }
            debug!("tick loop exited");
        });

        self.worker = Some(TickWorker { cancel, handle });
        info!("playback started at {}", self.tempo);
        Ok(())
    }

    /// Stop the tick loop
    ///
    /// Idempotent; calling while idle is a no-op. The worker is joined, so
    /// once this returns no further tick will fire.
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.cancel.store(true, Ordering::Relaxed);
            if worker.handle.join().is_err() {
                // The loop contains per-trigger panics, so this only fires
                // if the loop itself is broken
                warn!("tick loop thread panicked");
            }
            info!("playback stopped at step {}", self.playback.current_step());
        }
        self.playback.set_running(false);
    }

    /// True while the tick loop is active
    pub fn is_playing(&self) -> bool {
        self.playback.is_running()
    }

    /// The step index that will play on the next tick
    pub fn progress(&self) -> usize {
        self.playback.current_step()
    }

    /// Execute one tick: fire every instrument active at the current step,
    /// then advance the step index.
    ///
    /// The track lock is held only for the pattern read; triggers fire after
    /// it is released. A failing or panicking trigger is reported through
    /// the notification channel and never stops the loop or skips the step
    /// advance.
    fn run_tick(
        track: &Track,
        registry: &InstrumentRegistry,
        playback: &SharedPlaybackState,
        notification_tx: &Mutex<NotificationProducer>,
    ) {
        let step = playback.current_step();

        for name in track.instruments_at(step) {
            let outcome = catch_unwind(AssertUnwindSafe(|| registry.trigger(&name)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    Self::report(notification_tx, &format!("'{}' at step {}: {}", name, step, e));
                }
                Err(_) => {
                    Self::report(
                        notification_tx,
                        &format!("'{}' at step {}: trigger panicked", name, step),
                    );
                }
            }
        }

        playback.advance_step();
    }

    /// Push a trigger fault onto the side channel without ever blocking the
    /// tick thread
    fn report(notification_tx: &Mutex<NotificationProducer>, message: &str) {
        warn!("{}", message);
        if let Ok(mut tx) = notification_tx.try_lock() {
            let _ = tx.try_push(Notification::error(NotificationCategory::Trigger, message));
        }
    }
}

impl Drop for Conductor {
    fn drop(&mut self) {
        self.stop();
    }
}
