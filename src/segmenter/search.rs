//! Adaptive breakpoint search over a peak-sample buffer.
//!
//! Starting from the ideal segment length past the previous break, the search
//! walks outward in both directions, scoring candidate positions with the
//! distance-weighted adjusted score and keeping the quietest one. Once a
//! candidate is clearly quieter than the running average and the raw signal
//! is rising on both sides of the walk, the search stops early and accepts
//! it as a local minimum.

use std::time::Duration;

use crate::audio::SampleBuffer;
use crate::config::SegmenterConfig;
use crate::score::{adjusted_score, distance_factor, raw_score};

/// Finite, forward-only sequence of breakpoints for one recording.
///
/// All adaptive state (ideal length, pause window, last break) lives here and
/// is rebuilt from scratch for every run; the sequence is not resumable once
/// partially consumed.
pub struct NaturalBreaks {
    buffer: SampleBuffer,
    total: Duration,
    ms_per_sample: f64,
    /// Half-width of the adjusted-score window, in samples.
    window: usize,
    min_samples: usize,
    max_samples: usize,
    ideal_samples: usize,
    clamping_factor: f64,
    last_break: usize,
    remaining: usize,
    done: bool,
}

impl NaturalBreaks {
    pub fn new(buffer: SampleBuffer, total: Duration, config: &SegmenterConfig) -> Self {
        let frames = buffer.frames();

        if frames == 0 {
            return Self {
                buffer,
                total,
                ms_per_sample: 0.0,
                window: 0,
                min_samples: 0,
                max_samples: 1,
                ideal_samples: 1,
                clamping_factor: config.clamping_factor,
                last_break: 0,
                remaining: 0,
                done: true,
            };
        }

        let ms_per_sample = total.as_secs_f64() * 1000.0 / frames as f64;
        let window = (config.preferred_pause_ms as f64 / ms_per_sample) as usize;
        let min_samples = (config.min_segment_ms as f64 / ms_per_sample) as usize;
        let max_samples = ((config.max_segment_ms as f64 / ms_per_sample) as usize).max(1);
        let ideal_samples = ((min_samples + max_samples) / 2).max(1);

        Self {
            buffer,
            total,
            ms_per_sample,
            window,
            min_samples,
            max_samples,
            ideal_samples,
            clamping_factor: config.clamping_factor,
            last_break: 0,
            remaining: frames,
            done: false,
        }
    }

    /// Picks the quietest eligible position around the ideal target for the
    /// next break. Falls back to the target itself when nothing in the
    /// search radius becomes eligible.
    fn search_next(&self) -> usize {
        let ideal = self.ideal_samples;
        let window = self.window;
        let target = self.last_break + ideal;
        let radius = (ideal + window).saturating_sub(self.min_samples);

        let mut raw = vec![0.0f64; ideal * 2 + 1];
        raw[ideal] = raw_score(&self.buffer, target);
        if 1 < ideal {
            raw[ideal + 1] = raw_score(&self.buffer, target + 1);
            raw[ideal - 1] = raw_score(&self.buffer, target - 1);
        }

        let mut best_break = target;
        let mut best_score = f64::MAX;
        let mut score_sum = 0.0;
        let mut score_count = 0usize;

        for i in 1..radius {
            // Raw scores are filled one step ahead of the walk so the
            // early-termination trend check below only reads scored slots.
            if i + 1 < ideal {
                raw[ideal + i + 1] = raw_score(&self.buffer, target + i + 1);
                raw[ideal - i - 1] = raw_score(&self.buffer, target - i - 1);
            }

            // Positions become eligible once the walk has cleared the pause
            // window on its side of the target.
            if i < window {
                continue;
            }

            let factor = distance_factor(i, self.clamping_factor);

            let outward = ideal + i - window;
            let outward_score = adjusted_score(&raw, outward, window, factor);
            if outward_score < best_score {
                best_score = outward_score;
                best_break = self.last_break + outward;
            }

            let inward = (ideal + window) - i;
            let inward_score = adjusted_score(&raw, inward, window, factor);
            if inward_score < best_score {
                best_score = inward_score;
                best_break = self.last_break + inward;
            }

            score_sum += outward_score + inward_score;
            score_count += 2;
            let average = score_sum / score_count as f64;

            if best_score < average / 2.0
                && i + 1 < ideal
                && raw[ideal + i] < raw[ideal + i + 1]
                && raw[ideal - i] < raw[ideal - i - 1]
            {
                break;
            }
        }

        best_break
    }
}

impl Iterator for NaturalBreaks {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.done {
            return None;
        }

        // A single remaining bucket cannot be searched any further.
        if self.remaining < self.max_samples || self.remaining < 2 {
            self.done = true;
            // The remainder is never split further, however short.
            return if self.remaining > 0 {
                Some(self.total)
            } else {
                None
            };
        }

        // Keep the final interior segments balanced instead of emitting one
        // oversized segment followed by a tiny remainder.
        if self.remaining < self.ideal_samples * 2 {
            self.ideal_samples = (self.remaining / 2).max(1);
        }

        let best_break = self.search_next();
        self.remaining -= best_break - self.last_break;
        self.last_break = best_break;

        Some(Duration::from_secs_f64(
            self.ms_per_sample * best_break as f64 / 1000.0,
        ))
    }
}
