//! Quietness scoring for breakpoint candidates.
//!
//! The raw score measures how loud the signal is at one sample position;
//! the adjusted score folds in a triangular-weighted neighborhood and a
//! penalty that grows with distance from the ideal segment length. Lower
//! scores mark better cut points.

use crate::audio::SampleBuffer;

/// Sum of the absolute peak magnitudes at `position` across all channels.
///
/// `position` must lie within the buffer; out-of-range access is a
/// programming error and panics.
pub fn raw_score(buffer: &SampleBuffer, position: usize) -> f64 {
    let mut score = 0.0;
    for channel in 0..buffer.channels() {
        let pair = buffer.peak(position, channel);
        score += pair.a.abs() as f64 + pair.b.abs() as f64;
    }
    score
}

/// Quadratic penalty for candidates `offset` samples away from the ideal
/// target position.
pub fn distance_factor(offset: usize, clamping_factor: f64) -> f64 {
    let base = offset as f64 * clamping_factor + 1.0;
    base * base
}

/// Triangular-weighted sum of `raw_scores` over a symmetric window of
/// half-width `window` centered at `position`, scaled by `distance_factor`.
///
/// Weights decay linearly from 1 at the center to 0 at the window edge;
/// positions outside the scored range simply contribute nothing.
pub fn adjusted_score(
    raw_scores: &[f64],
    position: usize,
    window: usize,
    distance_factor: f64,
) -> f64 {
    let mut score = raw_scores[position];
    for i in 1..=window {
        let weight = (window - i) as f64 / window as f64;
        if raw_scores.len() > position + i {
            score += raw_scores[position + i] * weight;
        }
        if position >= i {
            score += raw_scores[position - i] * weight;
        }
    }
    score * distance_factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::PeakPair;

    #[test]
    fn test_raw_score_sums_channels() {
        let peaks = vec![
            PeakPair { a: 0.5, b: -0.25 },
            PeakPair { a: 0.1, b: -0.1 },
        ];
        let buffer = SampleBuffer::new(2, peaks);
        let score = raw_score(&buffer, 0);
        assert!((score - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_raw_score_silence_is_zero() {
        let buffer = SampleBuffer::new(1, vec![PeakPair::default(); 4]);
        assert_eq!(raw_score(&buffer, 2), 0.0);
    }

    #[test]
    #[should_panic]
    fn test_raw_score_out_of_range_panics() {
        let buffer = SampleBuffer::new(1, vec![PeakPair::default(); 4]);
        raw_score(&buffer, 4);
    }

    #[test]
    fn test_distance_factor_is_quadratic() {
        assert_eq!(distance_factor(0, 0.5), 1.0);
        assert_eq!(distance_factor(2, 0.5), 4.0);
        assert_eq!(distance_factor(4, 0.5), 9.0);
    }

    #[test]
    fn test_adjusted_score_triangular_weights() {
        // Window of 2: neighbors at distance 1 weigh 1/2, distance 2 weigh 0.
        let raw = vec![1.0, 1.0, 1.0, 1.0, 1.0];
        let score = adjusted_score(&raw, 2, 2, 1.0);
        assert!((score - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_adjusted_score_clipped_at_edges() {
        let raw = vec![1.0, 1.0, 1.0];
        // At position 0 only the right neighbor contributes.
        let score = adjusted_score(&raw, 0, 2, 1.0);
        assert!((score - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_adjusted_score_scales_with_distance_factor() {
        let raw = vec![0.0, 2.0, 0.0];
        let near = adjusted_score(&raw, 1, 1, 1.0);
        let far = adjusted_score(&raw, 1, 1, 4.0);
        assert!((far - near * 4.0).abs() < 1e-9);
    }
}
