//! Persistence of the time tier as an annotation artifact.
//!
//! Only the capability this core needs is modeled: look up an existing
//! artifact for a media file, load it back, and save a tier, returning the
//! artifact path.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SideFileNaming;
use crate::error::Result;

use super::{Segment, TimeTier};

pub trait TierStore {
    /// Path of an existing annotation artifact for `media`, if any.
    fn existing_artifact(&self, media: &Path) -> Option<PathBuf>;

    /// Loads the time tier stored for `media`, if an artifact exists.
    fn load(&self, media: &Path) -> Result<Option<TimeTier>>;

    /// Persists the tier and returns the artifact path.
    fn save(&self, tier: &TimeTier) -> Result<PathBuf>;
}

#[derive(Serialize, Deserialize)]
struct TierDocument {
    id: String,
    media_file: PathBuf,
    segments: Vec<Segment>,
}

/// Stores the tier as a JSON document, by default next to the media file.
#[derive(Debug, Default)]
pub struct JsonTierStore {
    naming: SideFileNaming,
    artifact_override: Option<PathBuf>,
}

impl JsonTierStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Side-file naming applied to tiers handed back by [`load`].
    ///
    /// [`load`]: TierStore::load
    pub fn with_naming(mut self, naming: SideFileNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Reads and writes the artifact at `path` instead of deriving it from
    /// the media file name.
    pub fn with_artifact_path(mut self, path: PathBuf) -> Self {
        self.artifact_override = Some(path);
        self
    }

    /// Default artifact location for a media file.
    pub fn artifact_path(media: &Path) -> PathBuf {
        PathBuf::from(format!("{}.annotations.json", media.display()))
    }

    fn artifact_for(&self, media: &Path) -> PathBuf {
        self.artifact_override
            .clone()
            .unwrap_or_else(|| Self::artifact_path(media))
    }
}

impl TierStore for JsonTierStore {
    fn existing_artifact(&self, media: &Path) -> Option<PathBuf> {
        let path = self.artifact_for(media);
        path.exists().then_some(path)
    }

    fn load(&self, media: &Path) -> Result<Option<TimeTier>> {
        let Some(path) = self.existing_artifact(media) else {
            return Ok(None);
        };

        let contents = fs::read_to_string(&path)?;
        let doc: TierDocument = serde_json::from_str(&contents)?;

        let mut tier =
            TimeTier::with_id(&doc.id, &doc.media_file).with_naming(self.naming.clone());
        for segment in doc.segments {
            tier.add_segment(segment.start, segment.end);
        }

        debug!(
            "Loaded {} segments from {}",
            tier.segments().len(),
            path.display()
        );

        Ok(Some(tier))
    }

    fn save(&self, tier: &TimeTier) -> Result<PathBuf> {
        let path = self.artifact_for(tier.media_file());
        let doc = TierDocument {
            id: tier.id().to_string(),
            media_file: tier.media_file().to_path_buf(),
            segments: tier.segments().to_vec(),
        };

        fs::write(&path, serde_json::to_string_pretty(&doc)?)?;

        debug!(
            "Saved {} segments to {}",
            tier.segments().len(),
            path.display()
        );

        Ok(path)
    }
}
