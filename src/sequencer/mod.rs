// Sequencer module
// Tick clock, pattern store, and shared playback state

pub mod conductor;
pub mod playback;
pub mod tempo;
pub mod track;

pub use conductor::{Conductor, ConductorError};
pub use playback::SharedPlaybackState;
pub use tempo::{DEFAULT_BPM, TRACK_LENGTH, Tempo};
pub use track::{MAX_NAME_LEN, Track, TrackError};
