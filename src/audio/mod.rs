pub mod wav;

pub use wav::WavStreamReader;

use std::time::Duration;

use crate::error::Result;

/// Peak magnitudes measured over one downsampled bucket of one channel.
///
/// For WAV input these are the most positive and most negative sample in the
/// bucket; an in-memory source may store any two magnitude measures.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeakPair {
    pub a: f32,
    pub b: f32,
}

/// A finite buffer of per-sample peak pairs, frame-major with interleaved
/// channels.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    channels: usize,
    peaks: Vec<PeakPair>,
}

impl SampleBuffer {
    /// Builds a buffer from interleaved peak pairs.
    ///
    /// # Panics
    /// Panics if `channels` is zero or `peaks` is not a whole number of
    /// frames.
    pub fn new(channels: usize, peaks: Vec<PeakPair>) -> Self {
        assert!(channels > 0, "sample buffer must have at least one channel");
        assert!(
            peaks.len() % channels == 0,
            "peak data must be a whole number of frames"
        );
        Self { channels, peaks }
    }

    pub fn frames(&self) -> usize {
        self.peaks.len() / self.channels
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// Peak pair at `frame` for `channel`. Out-of-range access is a
    /// programming error and panics.
    pub fn peak(&self, frame: usize, channel: usize) -> PeakPair {
        assert!(channel < self.channels, "channel out of range");
        self.peaks[frame * self.channels + channel]
    }
}

/// Supplier of the recording's duration and of downsampled peak buffers.
///
/// `read_peaks` may return fewer frames than requested when the stream is
/// shorter than `max_samples`.
pub trait SampleSource {
    fn total_duration(&self) -> Duration;
    fn read_peaks(&mut self, max_samples: u32) -> Result<SampleBuffer>;
}

/// In-memory sample source, for tests and for callers that already hold
/// decoded peaks.
#[derive(Debug, Clone)]
pub struct BufferSource {
    total: Duration,
    channels: usize,
    peaks: Vec<PeakPair>,
}

impl BufferSource {
    pub fn new(total: Duration, channels: usize, peaks: Vec<PeakPair>) -> Self {
        assert!(channels > 0, "sample buffer must have at least one channel");
        Self {
            total,
            channels,
            peaks,
        }
    }

    /// Convenience constructor for single-channel data where both peak
    /// measures carry the same magnitude.
    pub fn mono(total: Duration, magnitudes: &[f32]) -> Self {
        let peaks = magnitudes
            .iter()
            .map(|&m| PeakPair { a: m, b: -m })
            .collect();
        Self::new(total, 1, peaks)
    }
}

impl SampleSource for BufferSource {
    fn total_duration(&self) -> Duration {
        self.total
    }

    fn read_peaks(&mut self, max_samples: u32) -> Result<SampleBuffer> {
        let frames = (self.peaks.len() / self.channels).min(max_samples as usize);
        Ok(SampleBuffer::new(
            self.channels,
            self.peaks[..frames * self.channels].to_vec(),
        ))
    }
}
