// Serialization utilities for track persistence

use crate::project::manager::ProjectError;
use crate::project::types::{PatternDocument, SavedTrack, TrackDocument, TrackMetadata};
use crate::sequencer::track::{Track, TrackError};

/// Snapshot a track into its serializable document form (bulk read)
pub fn track_to_document(track: &Track) -> TrackDocument {
    let patterns = track
        .instrument_names()
        .into_iter()
        .filter_map(|name| {
            // The instrument can only disappear between the two calls if a
            // concurrent editor removed it; skipping it keeps the snapshot
            // consistent
            let steps = track.pattern(&name).ok()?;
            Some(PatternDocument {
                instrument: name,
                steps,
            })
        })
        .collect();

    TrackDocument {
        track_name: track.track_name(),
        artist_name: track.artist_name(),
        patterns,
    }
}

/// Rebuild a track from its document form (bulk load)
/// Applies the same validation as the incremental mutators, so a corrupt
/// document is rejected without producing a half-built track.
pub fn track_from_document(document: &TrackDocument) -> Result<Track, TrackError> {
    let track = Track::new();
    track.set_track_name(&document.track_name)?;
    track.set_artist_name(&document.artist_name)?;
    for pattern in &document.patterns {
        track.add_instrument(&pattern.instrument, Some(pattern.steps.clone()))?;
    }
    Ok(track)
}

/// Serialize a saved track to RON format
pub fn serialize_to_ron(saved: &SavedTrack) -> Result<String, ProjectError> {
    ron::ser::to_string_pretty(saved, ron::ser::PrettyConfig::default())
        .map_err(|e| ProjectError::Serialization(format!("Failed to serialize to RON: {}", e)))
}

/// Deserialize a saved track from RON format
pub fn deserialize_from_ron(ron_data: &str) -> Result<SavedTrack, ProjectError> {
    ron::from_str(ron_data)
        .map_err(|e| ProjectError::Serialization(format!("Failed to deserialize from RON: {}", e)))
}

/// Serialize track metadata to JSON format (for the search collaborator)
pub fn serialize_metadata_to_json(metadata: &TrackMetadata) -> Result<String, ProjectError> {
    serde_json::to_string_pretty(metadata).map_err(|e| {
        ProjectError::Serialization(format!("Failed to serialize metadata to JSON: {}", e))
    })
}

/// Deserialize track metadata from JSON format
pub fn deserialize_metadata_from_json(json_data: &str) -> Result<TrackMetadata, ProjectError> {
    serde_json::from_str(json_data).map_err(|e| {
        ProjectError::Serialization(format!("Failed to deserialize metadata from JSON: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::TRACK_LENGTH;

    fn demo_track() -> Track {
        let track = Track::new();
        track.set_track_name("T1").unwrap();
        track.set_artist_name("A1").unwrap();

        let mut kick = vec![false; TRACK_LENGTH];
        for step in [0, 4, 8, 12] {
            kick[step] = true;
        }
        let mut snare = vec![false; TRACK_LENGTH];
        for step in [4, 12, 15] {
            snare[step] = true;
        }
        track.add_instrument("kick", Some(kick)).unwrap();
        track.add_instrument("snare", Some(snare)).unwrap();
        track
    }

    #[test]
    fn test_document_round_trip() {
        let track = demo_track();
        let document = track_to_document(&track);
        let restored = track_from_document(&document).unwrap();

        assert_eq!(restored.track_name(), "T1");
        assert_eq!(restored.artist_name(), "A1");
        assert_eq!(restored.instrument_names(), track.instrument_names());
        assert_eq!(
            restored.pattern("kick").unwrap(),
            track.pattern("kick").unwrap()
        );
        assert_eq!(
            restored.pattern("snare").unwrap(),
            track.pattern("snare").unwrap()
        );
    }

    #[test]
    fn test_corrupt_document_rejected() {
        let document = TrackDocument {
            track_name: "T1".to_string(),
            artist_name: "A1".to_string(),
            patterns: vec![PatternDocument {
                instrument: "kick".to_string(),
                steps: vec![true; 7], // wrong length
            }],
        };

        assert!(matches!(
            track_from_document(&document),
            Err(TrackError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_ron_round_trip() {
        let document = track_to_document(&demo_track());
        let saved = SavedTrack {
            metadata: TrackMetadata::for_document(&document),
            document,
        };

        let ron_data = serialize_to_ron(&saved).unwrap();
        assert!(ron_data.contains("kick"));

        let restored = deserialize_from_ron(&ron_data).unwrap();
        assert_eq!(restored, saved);
    }

    #[test]
    fn test_metadata_json_round_trip() {
        let document = track_to_document(&demo_track());
        let metadata = TrackMetadata::for_document(&document);

        let json = serialize_metadata_to_json(&metadata).unwrap();
        let restored = deserialize_metadata_from_json(&json).unwrap();
        assert_eq!(restored, metadata);
    }
}
