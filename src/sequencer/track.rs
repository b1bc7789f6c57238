// Track - Mutable pattern store for the step sequencer
// Holds one fixed-length boolean pattern per instrument plus track metadata.
// All methods take &self: the conductor thread reads patterns while a caller
// (typically the UI thread) edits them, so the state lives behind a mutex.

use crate::sequencer::tempo::TRACK_LENGTH;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Maximum length for track and artist names (names must be strictly shorter)
pub const MAX_NAME_LEN: usize = 30;

/// Errors raised by Track mutations
/// All validation happens before any state change (fail fast, no partial
/// mutation).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackError {
    #[error("pattern has {actual} steps, expected {expected}")]
    InvalidPattern { expected: usize, actual: usize },

    #[error("name '{0}' is too long (must be under {MAX_NAME_LEN} characters)")]
    NameTooLong(String),

    #[error("unknown instrument '{0}'")]
    UnknownInstrument(String),

    #[error("step index {index} out of range (track length {length})")]
    IndexOutOfRange { index: usize, length: usize },
}

/// One instrument's pattern: an ordered sequence of on/off steps
#[derive(Debug, Clone)]
struct InstrumentPattern {
    name: String,
    steps: Vec<bool>,
}

/// Inner state, guarded by the Track mutex
#[derive(Debug, Default)]
struct TrackInner {
    track_name: String,
    artist_name: String,
    // Insertion-ordered so instrument listing is deterministic
    patterns: Vec<InstrumentPattern>,
}

/// Mutable pattern store shared between the conductor and the caller
///
/// The caller owns the Track (usually behind an `Arc`); the conductor holds a
/// reference only while it is the active track. Critical sections are short
/// and never span a trigger call, so pattern reads from the tick loop cannot
/// observe a torn write.
#[derive(Debug, Default)]
pub struct Track {
    inner: Mutex<TrackInner>,
}

impl Track {
    /// Create a new empty track
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TrackInner> {
        // Every critical section validates before mutating, so the data is
        // consistent even if a previous holder panicked.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the track name
    pub fn track_name(&self) -> String {
        self.lock().track_name.clone()
    }

    /// Set the track name
    /// Fails if the new value is not under `MAX_NAME_LEN` characters.
    pub fn set_track_name(&self, name: &str) -> Result<(), TrackError> {
        if name.chars().count() >= MAX_NAME_LEN {
            return Err(TrackError::NameTooLong(name.to_string()));
        }
        self.lock().track_name = name.to_string();
        Ok(())
    }

    /// Get the artist name
    pub fn artist_name(&self) -> String {
        self.lock().artist_name.clone()
    }

    /// Set the artist name
    /// Fails if the new value is not under `MAX_NAME_LEN` characters.
    pub fn set_artist_name(&self, name: &str) -> Result<(), TrackError> {
        if name.chars().count() >= MAX_NAME_LEN {
            return Err(TrackError::NameTooLong(name.to_string()));
        }
        self.lock().artist_name = name.to_string();
        Ok(())
    }

    /// Add an instrument with the given pattern, or an all-off pattern if
    /// `pattern` is `None`. Adding an instrument that already exists
    /// overwrites its pattern.
    pub fn add_instrument(
        &self,
        name: &str,
        pattern: Option<Vec<bool>>,
    ) -> Result<(), TrackError> {
        let steps = match pattern {
            Some(steps) => {
                if steps.len() != TRACK_LENGTH {
                    return Err(TrackError::InvalidPattern {
                        expected: TRACK_LENGTH,
                        actual: steps.len(),
                    });
                }
                steps
            }
            None => vec![false; TRACK_LENGTH],
        };

        let mut inner = self.lock();
        if let Some(existing) = inner.patterns.iter_mut().find(|p| p.name == name) {
            existing.steps = steps;
        } else {
            inner.patterns.push(InstrumentPattern {
                name: name.to_string(),
                steps,
            });
        }
        Ok(())
    }

    /// Remove an instrument and its pattern
    pub fn remove_instrument(&self, name: &str) -> Result<(), TrackError> {
        let mut inner = self.lock();
        let initial_len = inner.patterns.len();
        inner.patterns.retain(|p| p.name != name);
        if inner.patterns.len() == initial_len {
            return Err(TrackError::UnknownInstrument(name.to_string()));
        }
        Ok(())
    }

    /// Flip one step of an instrument's pattern
    pub fn toggle_step(&self, instrument: &str, index: usize) -> Result<(), TrackError> {
        if index >= TRACK_LENGTH {
            return Err(TrackError::IndexOutOfRange {
                index,
                length: TRACK_LENGTH,
            });
        }
        let mut inner = self.lock();
        let pattern = inner
            .patterns
            .iter_mut()
            .find(|p| p.name == instrument)
            .ok_or_else(|| TrackError::UnknownInstrument(instrument.to_string()))?;
        pattern.steps[index] = !pattern.steps[index];
        Ok(())
    }

    /// Get an independent copy of an instrument's pattern
    /// The returned value is immune to later edits of the track.
    pub fn pattern(&self, instrument: &str) -> Result<Vec<bool>, TrackError> {
        let inner = self.lock();
        inner
            .patterns
            .iter()
            .find(|p| p.name == instrument)
            .map(|p| p.steps.clone())
            .ok_or_else(|| TrackError::UnknownInstrument(instrument.to_string()))
    }

    /// All instrument names, in insertion order
    pub fn instrument_names(&self) -> Vec<String> {
        self.lock().patterns.iter().map(|p| p.name.clone()).collect()
    }

    /// Number of instruments in the track
    pub fn instrument_count(&self) -> usize {
        self.lock().patterns.len()
    }

    /// Instruments whose pattern is active at the given step
    /// This is the read the conductor performs on every tick; the lock is
    /// released before any trigger fires.
    pub fn instruments_at(&self, step: usize) -> Vec<String> {
        let inner = self.lock();
        inner
            .patterns
            .iter()
            .filter(|p| p.steps.get(step).copied().unwrap_or(false))
            .map(|p| p.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_instrument_default_pattern() {
        let track = Track::new();
        track.add_instrument("kick", None).unwrap();

        let pattern = track.pattern("kick").unwrap();
        assert_eq!(pattern.len(), TRACK_LENGTH);
        assert!(pattern.iter().all(|&s| !s));
    }

    #[test]
    fn test_add_instrument_with_pattern() {
        let track = Track::new();
        let mut steps = vec![false; TRACK_LENGTH];
        steps[0] = true;
        steps[8] = true;

        track.add_instrument("kick", Some(steps.clone())).unwrap();
        assert_eq!(track.pattern("kick").unwrap(), steps);
    }

    #[test]
    fn test_add_instrument_wrong_length_rejected() {
        let track = Track::new();

        let too_short = track.add_instrument("kick", Some(vec![true; 8]));
        assert_eq!(
            too_short,
            Err(TrackError::InvalidPattern {
                expected: TRACK_LENGTH,
                actual: 8
            })
        );

        let too_long = track.add_instrument("kick", Some(vec![false; 17]));
        assert!(matches!(too_long, Err(TrackError::InvalidPattern { .. })));

        // Nothing was added
        assert_eq!(track.instrument_count(), 0);
    }

    #[test]
    fn test_add_duplicate_overwrites() {
        let track = Track::new();
        track.add_instrument("kick", None).unwrap();

        let mut steps = vec![false; TRACK_LENGTH];
        steps[4] = true;
        track.add_instrument("kick", Some(steps.clone())).unwrap();

        // Still one instrument, pattern replaced
        assert_eq!(track.instrument_count(), 1);
        assert_eq!(track.pattern("kick").unwrap(), steps);
    }

    #[test]
    fn test_remove_instrument() {
        let track = Track::new();
        track.add_instrument("kick", None).unwrap();
        track.add_instrument("snare", None).unwrap();

        track.remove_instrument("kick").unwrap();
        assert_eq!(track.instrument_names(), vec!["snare"]);

        assert_eq!(
            track.remove_instrument("kick"),
            Err(TrackError::UnknownInstrument("kick".to_string()))
        );
    }

    #[test]
    fn test_toggle_step_involution() {
        let track = Track::new();
        track.add_instrument("hat", None).unwrap();
        let before = track.pattern("hat").unwrap();

        track.toggle_step("hat", 3).unwrap();
        assert!(track.pattern("hat").unwrap()[3]);

        track.toggle_step("hat", 3).unwrap();
        assert_eq!(track.pattern("hat").unwrap(), before);
    }

    #[test]
    fn test_toggle_step_errors() {
        let track = Track::new();
        track.add_instrument("hat", None).unwrap();

        assert_eq!(
            track.toggle_step("hat", TRACK_LENGTH),
            Err(TrackError::IndexOutOfRange {
                index: TRACK_LENGTH,
                length: TRACK_LENGTH
            })
        );
        assert_eq!(
            track.toggle_step("bongo", 0),
            Err(TrackError::UnknownInstrument("bongo".to_string()))
        );
    }

    #[test]
    fn test_pattern_is_defensive_copy() {
        let track = Track::new();
        let mut steps = vec![false; TRACK_LENGTH];
        steps[0] = true;
        track.add_instrument("kick", Some(steps.clone())).unwrap();

        // Mutating the caller's original does not affect the stored pattern
        steps[1] = true;
        assert!(!track.pattern("kick").unwrap()[1]);

        // Mutating a returned copy does not affect the stored pattern either
        let mut copy = track.pattern("kick").unwrap();
        copy[2] = true;
        assert!(!track.pattern("kick").unwrap()[2]);
    }

    #[test]
    fn test_name_length_limits() {
        let track = Track::new();

        let ok = "a".repeat(MAX_NAME_LEN - 1);
        track.set_track_name(&ok).unwrap();
        assert_eq!(track.track_name(), ok);

        let too_long = "a".repeat(MAX_NAME_LEN);
        assert_eq!(
            track.set_track_name(&too_long),
            Err(TrackError::NameTooLong(too_long.clone()))
        );
        // Previous value untouched
        assert_eq!(track.track_name(), ok);

        assert!(track.set_artist_name("DJ Example").is_ok());
        assert_eq!(track.artist_name(), "DJ Example");
        assert!(track.set_artist_name(&too_long).is_err());
    }

    #[test]
    fn test_instrument_names_insertion_order() {
        let track = Track::new();
        track.add_instrument("kick", None).unwrap();
        track.add_instrument("snare", None).unwrap();
        track.add_instrument("hat", None).unwrap();

        assert_eq!(track.instrument_names(), vec!["kick", "snare", "hat"]);

        // Overwriting does not move an instrument to the back
        track.add_instrument("kick", None).unwrap();
        assert_eq!(track.instrument_names(), vec!["kick", "snare", "hat"]);
    }

    #[test]
    fn test_instruments_at_step() {
        let track = Track::new();
        let mut kick = vec![false; TRACK_LENGTH];
        kick[0] = true;
        kick[4] = true;
        let mut snare = vec![false; TRACK_LENGTH];
        snare[4] = true;

        track.add_instrument("kick", Some(kick)).unwrap();
        track.add_instrument("snare", Some(snare)).unwrap();

        assert_eq!(track.instruments_at(0), vec!["kick"]);
        assert_eq!(track.instruments_at(4), vec!["kick", "snare"]);
        assert!(track.instruments_at(1).is_empty());
    }
}
