//! Durable storage for the vector index snapshot. One bincode file,
//! written through a temporary file and an atomic rename so a crash
//! mid-write never corrupts the previously durable snapshot.

use atomicwrites::{AtomicFile, OverwriteBehavior};
use serde::{Deserialize, Serialize};
use skillmatch_core::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

const VECTORS_FILE: &str = "skill_vectors.bin";

/// On-disk form of a published index snapshot
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredVectors {
    pub embedder_version: String,
    pub dimension: usize,
    pub skills: Vec<StoredSkillVector>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoredSkillVector {
    pub skill_id: i64,
    pub skill_name: String,
    pub vector: Vec<f32>,
}

pub struct VectorStore {
    path: PathBuf,
}

impl VectorStore {
    #[must_use]
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            path: data_dir.as_ref().join(VECTORS_FILE),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Persist a snapshot. The write goes to a temporary file first and is
    /// renamed over the target only once complete.
    pub fn save(&self, stored: &StoredVectors) -> Result<()> {
        let bytes = bincode::serialize(stored).map_err(|e| Error::Serialization(e.to_string()))?;

        AtomicFile::new(&self.path, OverwriteBehavior::AllowOverwrite)
            .write(|file| file.write_all(&bytes))
            .map_err(|e| Error::Storage(format!("failed to write {}: {e}", self.path.display())))
    }

    /// Load the durable snapshot if one exists.
    ///
    /// A missing file is `None`. An unreadable or undecodable file is also
    /// `None` with a warning: the next refresh rebuilds it, and refusing to
    /// start over a bad cache would turn a soft state into an outage.
    pub fn load(&self) -> Result<Option<StoredVectors>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = std::fs::read(&self.path)?;
        match bincode::deserialize::<StoredVectors>(&bytes) {
            Ok(stored) => Ok(Some(stored)),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "discarding undecodable vector snapshot"
                );
                Ok(None)
            }
        }
    }
}
