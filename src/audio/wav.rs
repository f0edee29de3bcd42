use std::path::{Path, PathBuf};
use std::time::Duration;

use hound::WavReader;
use tracing::{debug, info};

use crate::error::{Result, SegtierError};

use super::{PeakPair, SampleBuffer, SampleSource};

/// WAV-backed sample source.
///
/// The stream is decoded on demand and downsampled into at most the requested
/// number of peak-pair buckets, one pair per channel per bucket.
pub struct WavStreamReader {
    path: PathBuf,
    total: Duration,
    channels: usize,
    sample_rate: u32,
}

impl WavStreamReader {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SegtierError::FileNotFound(path.display().to_string()));
        }

        let reader = WavReader::open(path)
            .map_err(|e| SegtierError::AudioDecode(format!("Failed to open WAV file: {e}")))?;

        let spec = reader.spec();
        let frames = reader.duration();
        let total = Duration::from_secs_f64(frames as f64 / spec.sample_rate as f64);

        info!(
            "Opened {}: {} Hz, {} channels, {} bits, {:.2}s",
            path.display(),
            spec.sample_rate,
            spec.channels,
            spec.bits_per_sample,
            total.as_secs_f64()
        );

        Ok(Self {
            path: path.to_path_buf(),
            total,
            channels: spec.channels as usize,
            sample_rate: spec.sample_rate,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn decode(&self) -> Result<Vec<f32>> {
        let reader = WavReader::open(&self.path)
            .map_err(|e| SegtierError::AudioDecode(format!("Failed to open WAV file: {e}")))?;

        let spec = reader.spec();
        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => reader
                .into_samples::<i16>()
                .map(|s| s.unwrap_or(0) as f32 / i16::MAX as f32)
                .collect(),
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .map(|s| s.unwrap_or(0.0))
                .collect(),
        };

        Ok(samples)
    }
}

impl SampleSource for WavStreamReader {
    fn total_duration(&self) -> Duration {
        self.total
    }

    fn read_peaks(&mut self, max_samples: u32) -> Result<SampleBuffer> {
        let samples = self.decode()?;
        let frames = samples.len() / self.channels;

        if frames == 0 || max_samples == 0 {
            return Ok(SampleBuffer::new(self.channels, Vec::new()));
        }

        let buckets = frames.min(max_samples as usize);
        let frames_per_bucket = frames / buckets;

        debug!(
            "Downsampling {} frames into {} buckets of {}",
            frames, buckets, frames_per_bucket
        );

        let mut peaks = Vec::with_capacity(buckets * self.channels);
        for bucket in 0..buckets {
            let start = bucket * frames_per_bucket;
            // The last bucket absorbs the remainder frames.
            let end = if bucket == buckets - 1 {
                frames
            } else {
                start + frames_per_bucket
            };

            for channel in 0..self.channels {
                let mut pair = PeakPair::default();
                for frame in start..end {
                    let sample = samples[frame * self.channels + channel];
                    if sample > pair.a {
                        pair.a = sample;
                    }
                    if sample < pair.b {
                        pair.b = sample;
                    }
                }
                peaks.push(pair);
            }
        }

        Ok(SampleBuffer::new(self.channels, peaks))
    }
}
