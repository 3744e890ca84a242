//! File-backed persistence of instruction artifacts.
//!
//! One file per plant in a flat directory, named by the sanitized key:
//! `<key>.md` for known plants, `<key>.txt` containing `None` for unknown ones.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PlantCareError;
use crate::plant::{ArtifactKind, InstructionArtifact, PlantName, UNKNOWN_SENTINEL};

/// An artifact found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

/// Content read back from a [`StoredArtifact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredContent {
    /// Full Markdown file, heading included.
    Instructions(String),
    /// The sentinel file recorded for an unknown plant.
    UnknownPlant,
}

/// Directory of instruction artifacts.
#[derive(Debug, Clone)]
pub struct InstructionStore {
    dir: PathBuf,
}

impl InstructionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path an artifact of `kind` for `plant` would occupy.
    pub fn path_for(&self, plant: &PlantName, kind: ArtifactKind) -> PathBuf {
        self.dir.join(plant.sanitized_key().file_name(kind))
    }

    /// Write `artifact` for `plant`, overwriting any file of the same name.
    ///
    /// The returned path is informational for both variants.
    pub fn save(
        &self,
        plant: &PlantName,
        artifact: &InstructionArtifact,
    ) -> Result<PathBuf, PlantCareError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(plant, artifact.kind());
        fs::write(&path, artifact.render(plant))?;
        debug!(plant = %plant, path = %path.display(), "artifact saved");
        Ok(path)
    }

    /// [`save`](Self::save), then tell the user where the artifact went.
    pub fn save_announced(
        &self,
        plant: &PlantName,
        artifact: &InstructionArtifact,
    ) -> Result<PathBuf, PlantCareError> {
        let path = self.save(plant, artifact)?;
        if artifact.is_known() {
            println!("Care instructions for '{plant}' saved to {}", path.display());
        } else {
            println!(
                "Plant '{plant}' is unknown. Stored '{UNKNOWN_SENTINEL}' in {}",
                path.display()
            );
        }
        Ok(path)
    }

    /// Find the artifact for `plant`, preferring Markdown over the sentinel.
    pub fn locate(&self, plant: &PlantName) -> Option<StoredArtifact> {
        [ArtifactKind::Markdown, ArtifactKind::Sentinel]
            .into_iter()
            .map(|kind| StoredArtifact {
                path: self.path_for(plant, kind),
                kind,
            })
            .find(|stored| stored.path.is_file())
    }

    pub fn exists(&self, plant: &PlantName) -> bool {
        self.locate(plant).is_some()
    }

    /// Read a located artifact back.
    pub fn load(&self, stored: &StoredArtifact) -> Result<StoredContent, PlantCareError> {
        let raw = fs::read_to_string(&stored.path)?;
        match stored.kind {
            ArtifactKind::Markdown => Ok(StoredContent::Instructions(raw)),
            ArtifactKind::Sentinel if raw.trim() == UNKNOWN_SENTINEL => {
                Ok(StoredContent::UnknownPlant)
            }
            ArtifactKind::Sentinel => Err(PlantCareError::UnexpectedContent {
                path: stored.path.display().to_string(),
            }),
        }
    }
}
