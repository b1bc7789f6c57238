// Track library - saving and loading tracks on disk
// One RON file per saved track plus a JSON metadata sidecar, both named by
// the track's id; listings read only the sidecars and never rebuild full
// tracks.

use crate::project::serialization::{
    deserialize_from_ron, deserialize_metadata_from_json, serialize_metadata_to_json,
    serialize_to_ron, track_from_document, track_to_document,
};
use crate::project::types::{SavedTrack, TrackMetadata};
use crate::sequencer::track::{Track, TrackError};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Persistence error types
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid track data: {0}")]
    InvalidTrack(#[from] TrackError),

    #[error("No saved track with id {0}")]
    NotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Track library - a directory of saved tracks
pub struct TrackLibrary {
    root: PathBuf,
}

impl TrackLibrary {
    /// Open a library at the given directory, creating it if needed
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, ProjectError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(|e| {
            ProjectError::FileSystem(format!(
                "Failed to create library directory {}: {}",
                root.display(),
                e
            ))
        })?;
        Ok(Self { root })
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("{}.ron", id))
    }

    fn metadata_path_for(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }

    /// Save a snapshot of the track, returning the metadata under which it
    /// was filed
    pub fn save(&self, track: &Track) -> Result<TrackMetadata, ProjectError> {
        let document = track_to_document(track);
        let metadata = TrackMetadata::for_document(&document);
        let saved = SavedTrack {
            metadata: metadata.clone(),
            document,
        };

        let ron_data = serialize_to_ron(&saved)?;
        let json_data = serialize_metadata_to_json(&metadata)?;
        fs::write(self.path_for(metadata.id), ron_data)?;
        fs::write(self.metadata_path_for(metadata.id), json_data)?;
        info!("saved track '{}' as {}", metadata.title, metadata.id);
        Ok(metadata)
    }

    /// Load a saved track by id, rebuilding it through the validating bulk
    /// loader
    pub fn load(&self, id: Uuid) -> Result<(TrackMetadata, Track), ProjectError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(ProjectError::NotFound(id));
        }

        let ron_data = fs::read_to_string(&path)?;
        let saved = deserialize_from_ron(&ron_data)?;
        let track = track_from_document(&saved.document)?;
        Ok((saved.metadata, track))
    }

    /// Delete a saved track
    pub fn remove(&self, id: Uuid) -> Result<(), ProjectError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(ProjectError::NotFound(id));
        }
        fs::remove_file(path)?;
        // The RON file is the source of truth; a missing sidecar is not an
        // error
        let _ = fs::remove_file(self.metadata_path_for(id));
        Ok(())
    }

    /// Metadata of every saved track in the library
    /// Reads only the JSON sidecars; files that fail to parse are skipped
    /// rather than failing the listing.
    pub fn list(&self) -> Result<Vec<TrackMetadata>, ProjectError> {
        let mut results = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Ok(json_data) = fs::read_to_string(&path) else {
                continue;
            };
            if let Ok(metadata) = deserialize_metadata_from_json(&json_data) {
                results.push(metadata);
            }
        }
        Ok(results)
    }
}
