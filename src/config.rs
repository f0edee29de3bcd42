use crate::error::{Result, SegtierError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings that shape the automatic breakpoint search.
///
/// All lengths are given in milliseconds and converted to sample counts
/// against the actual buffer once the recording's duration is known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmenterConfig {
    /// Minimum segment length in milliseconds.
    pub min_segment_ms: u64,

    /// Maximum segment length in milliseconds. Segmentation stops once the
    /// remaining audio is shorter than this.
    pub max_segment_ms: u64,

    /// Preferred pause length in milliseconds; converted to the half-width
    /// of the window used by the adjusted score.
    pub preferred_pause_ms: u64,

    /// Dimensionless factor shaping how strongly positions away from the
    /// ideal segment length are penalized.
    pub clamping_factor: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            min_segment_ms: 850,
            max_segment_ms: 10_000,
            preferred_pause_ms: 330,
            clamping_factor: 0.0001,
        }
    }
}

/// Naming scheme for per-segment annotation side files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideFileNaming {
    /// Suffix appended to the media file name to form the side-file folder.
    pub folder_suffix: String,

    /// Suffix for careful-speech recordings.
    pub careful_suffix: String,

    /// Suffix for oral-translation recordings.
    pub translation_suffix: String,
}

impl Default for SideFileNaming {
    fn default() -> Self {
        Self {
            folder_suffix: "_Annotations".to_string(),
            careful_suffix: "_Careful.wav".to_string(),
            translation_suffix: "_Translation.wav".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub segmenter: SegmenterConfig,
    #[serde(default)]
    pub side_files: SideFileNaming,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_file_path().as_deref(), |name| {
            std::env::var(name).ok()
        })
    }

    /// Layers the config file over the defaults, then environment variables
    /// over the file. Both sources are injected so the layering is testable.
    fn load_from(
        config_path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = Self::default();

        if let Some(config_path) = config_path {
            if config_path.exists() {
                let contents = std::fs::read_to_string(config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        if let Some(v) = env("SEGTIER_MIN_SEGMENT_MS").and_then(|s| s.parse().ok()) {
            config.segmenter.min_segment_ms = v;
        }
        if let Some(v) = env("SEGTIER_MAX_SEGMENT_MS").and_then(|s| s.parse().ok()) {
            config.segmenter.max_segment_ms = v;
        }
        if let Some(v) = env("SEGTIER_PREFERRED_PAUSE_MS").and_then(|s| s.parse().ok()) {
            config.segmenter.preferred_pause_ms = v;
        }
        if let Some(v) = env("SEGTIER_CLAMPING_FACTOR").and_then(|s| s.parse().ok()) {
            config.segmenter.clamping_factor = v;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let seg = &self.segmenter;

        if seg.min_segment_ms == 0 {
            return Err(SegtierError::Config(
                "Minimum segment length must be greater than 0".to_string(),
            ));
        }
        if seg.min_segment_ms >= seg.max_segment_ms {
            return Err(SegtierError::Config(format!(
                "Minimum segment length ({} ms) must be less than maximum ({} ms)",
                seg.min_segment_ms, seg.max_segment_ms
            )));
        }
        if seg.clamping_factor < 0.0 {
            return Err(SegtierError::Config(
                "Clamping factor must not be negative".to_string(),
            ));
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("segtier").join("config.toml"))
    }
}
