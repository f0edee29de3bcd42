pub mod search;

pub use search::NaturalBreaks;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::audio::{SampleBuffer, SampleSource};
use crate::config::Config;
use crate::error::Result;
use crate::tier::{TierStore, TimeTier};

/// Drives a sample source through the breakpoint search and materializes the
/// result onto a time tier.
pub struct AutoSegmenter<S: SampleSource> {
    media_file: PathBuf,
    source: S,
    config: Config,
}

impl<S: SampleSource> AutoSegmenter<S> {
    pub fn new(media_file: &Path, source: S, config: Config) -> Self {
        Self {
            media_file: media_file.to_path_buf(),
            source,
            config,
        }
    }

    /// Computes the breakpoint sequence for the recording.
    ///
    /// The returned iterator is finite and forward-only; call this again to
    /// recompute from scratch. A zero-length recording yields an empty
    /// sequence.
    pub fn natural_breaks(&mut self) -> Result<NaturalBreaks> {
        let total = self.source.total_duration();
        // One peak bucket per millisecond of audio.
        let requested = total.as_millis() as u32;

        let buffer = if requested == 0 {
            SampleBuffer::new(1, Vec::new())
        } else {
            self.source.read_peaks(requested)?
        };

        debug!(
            "Searching {} peak samples over {:.2}s",
            buffer.frames(),
            total.as_secs_f64()
        );

        Ok(NaturalBreaks::new(buffer, total, &self.config.segmenter))
    }

    /// Segments the recording and saves the tier through `store`.
    ///
    /// When an annotation artifact already exists for the media file this is
    /// a no-op returning the existing artifact's path; use [`run_forced`]
    /// to re-segment.
    ///
    /// [`run_forced`]: AutoSegmenter::run_forced
    pub fn run(&mut self, store: &dyn TierStore) -> Result<PathBuf> {
        if let Some(existing) = store.existing_artifact(&self.media_file) {
            info!(
                "Annotation artifact already exists: {}",
                existing.display()
            );
            return Ok(existing);
        }

        self.run_forced(store)
    }

    /// Segments the recording unconditionally, replacing any existing
    /// artifact.
    pub fn run_forced(&mut self, store: &dyn TierStore) -> Result<PathBuf> {
        let mut tier = TimeTier::new(&self.media_file)
            .with_naming(self.config.side_files.clone());

        for breakpoint in self.natural_breaks()? {
            tier.append_segment(breakpoint.as_secs_f32());
        }

        info!(
            "Segmented {} into {} segments",
            self.media_file.display(),
            tier.segments().len()
        );

        store.save(&tier)
    }
}
