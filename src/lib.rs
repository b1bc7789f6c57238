// Drumbox - Step-sequencer playback engine
// Library exports for the demo binary, tests, and embedding applications

pub mod instruments;
pub mod messaging;
pub mod project;
pub mod sequencer;

// Re-export commonly used types for convenience
pub use instruments::{FnTrigger, InstrumentRegistry, InstrumentTrigger, LogTrigger, TriggerError};
pub use messaging::channels::{
    NotificationConsumer, NotificationProducer, create_notification_channel,
};
pub use messaging::notification::{Notification, NotificationCategory, NotificationLevel};
pub use project::{TrackLibrary, TrackMetadata};
pub use sequencer::{
    Conductor, ConductorError, DEFAULT_BPM, MAX_NAME_LEN, SharedPlaybackState, TRACK_LENGTH, Tempo,
    Track, TrackError,
};
