// Types for track persistence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable snapshot of one instrument's pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDocument {
    /// Instrument name (unique within a track)
    pub instrument: String,
    /// One entry per step
    pub steps: Vec<bool>,
}

/// Serializable snapshot of a full track
///
/// This is the bulk read/load shape the persistence collaborator consumes.
/// Pattern order follows the track's insertion order, but round-trip
/// equality only requires set equality on instrument names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDocument {
    pub track_name: String,
    pub artist_name: String,
    pub patterns: Vec<PatternDocument>,
}

/// Metadata the search collaborator consumes
/// Derived from a track at save time, never stored in the track itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Stable identifier for the saved file
    pub id: Uuid,
    /// Track name at save time
    pub title: String,
    /// Artist name at save time
    pub author: String,
    /// Save timestamp
    pub timestamp: DateTime<Utc>,
}

impl TrackMetadata {
    /// Derive fresh metadata for a document being saved
    pub fn for_document(document: &TrackDocument) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: document.track_name.clone(),
            author: document.artist_name.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// On-disk representation of a saved track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTrack {
    pub metadata: TrackMetadata,
    pub document: TrackDocument,
}
