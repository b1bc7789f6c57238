// Tempo - Musical clock rate
// Converts BPM to the sixteenth-note tick interval driven by the conductor

use std::fmt;
use std::time::Duration;

/// Number of steps in a track pattern (one bar of sixteenths)
pub const TRACK_LENGTH: usize = 16;

/// Default tempo in beats per minute
pub const DEFAULT_BPM: f64 = 128.0;

/// Tempo in BPM (Beats Per Minute)
/// One beat is a quarter note, which spans 4 steps of the pattern grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    /// Creates a new tempo
    /// BPM must be in range [20.0, 999.0]
    pub fn new(bpm: f64) -> Self {
        assert!(
            (20.0..=999.0).contains(&bpm),
            "BPM must be between 20 and 999"
        );
        Self { bpm }
    }

    /// Get BPM value
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Duration of one beat in seconds
    pub fn beat_duration_seconds(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Interval between two steps (one sixteenth note), floored to whole
    /// milliseconds: 60000 / (4 * BPM)
    pub fn tick_interval(&self) -> Duration {
        let millis = (60_000.0 / (4.0 * self.bpm)).floor() as u64;
        Duration::from_millis(millis)
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(DEFAULT_BPM)
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.bpm)
    }
}
