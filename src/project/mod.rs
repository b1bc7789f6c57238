// Project module - persistence and search support
// The core only guarantees the snapshot/bulk-load contract; everything here
// consumes the track's public getters.

pub mod manager;
pub mod search;
pub mod serialization;
pub mod types;

pub use manager::{ProjectError, TrackLibrary};
pub use serialization::{track_from_document, track_to_document};
pub use types::{PatternDocument, SavedTrack, TrackDocument, TrackMetadata};
