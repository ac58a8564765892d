//! Weighted statistics over boxes of color samples
//!
//! A box is a slice of [`Sample`]s. The quantizer ranks boxes by their
//! dispersion, a weighted variance in which each sample counts with its
//! squared weight, so that a few heavy colors dominate many light ones.

use crate::constants::statistics::{MEDIAN_RECURSION_LIMIT, MEDIAN_SORT_THRESHOLD};
use crate::{QuantizeError, Result};

/// A normalized sRGB color with accumulated weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Channels in `[0, 1]`
    pub rgb: [f64; 3],
    /// Non-negative weight (alpha coverage of the pixels it stands for)
    pub weight: f64,
}

impl Sample {
    pub fn new(rgb: [f64; 3], weight: f64) -> Self {
        Self { rgb, weight }
    }
}

/// Squared Euclidean distance between two RGB triples
pub fn squared_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Weighted mean color and total weight of a box
///
/// A box with no weight yields the zero vector.
pub fn weighted_mean(samples: &[Sample]) -> ([f64; 3], f64) {
    let mut sum = [0.0; 3];
    let mut total = 0.0;

    for sample in samples {
        total += sample.weight;
        for (s, c) in sum.iter_mut().zip(sample.rgb.iter()) {
            *s += c * sample.weight;
        }
    }

    if total == 0.0 {
        return ([0.0; 3], 0.0);
    }

    (sum.map(|s| s / total), total)
}

/// Dispersion of a box around its weighted mean
///
/// `Σ wᵢ² · ‖mean − rgbᵢ‖² / Σ wᵢ²`, or 0 when the box carries no weight.
pub fn dispersion(samples: &[Sample]) -> f64 {
    let (mean, total) = weighted_mean(samples);
    dispersion_about(samples, mean, total)
}

/// Dispersion around an already computed mean and total weight
pub(crate) fn dispersion_about(samples: &[Sample], mean: [f64; 3], total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }

    let mut squared_weights = 0.0;
    let mut error = 0.0;
    for sample in samples {
        let w2 = sample.weight * sample.weight;
        squared_weights += w2;
        error += squared_distance(mean, sample.rgb) * w2;
    }

    error / squared_weights
}

/// Per-channel `(min, max)` across the box; `(0, 0)` for an empty box
pub fn extents(samples: &[Sample]) -> [(f64, f64); 3] {
    if samples.is_empty() {
        return [(0.0, 0.0); 3];
    }

    let mut out = [(f64::INFINITY, f64::NEG_INFINITY); 3];
    for sample in samples {
        for (range, &c) in out.iter_mut().zip(sample.rgb.iter()) {
            range.0 = range.0.min(c);
            range.1 = range.1.max(c);
        }
    }
    out
}

/// Median of one channel across the box's samples
///
/// Not used by the default split policy. Bisects the channel's value range
/// until the box is small enough to sort; see [`median_with_limit`].
pub fn median(samples: &[Sample], channel: usize) -> Result<f64> {
    median_with_limit(samples, channel, MEDIAN_RECURSION_LIMIT)
}

/// Median with an explicit cap on bisection refinements
///
/// Fails with [`QuantizeError::RecursionLimitExceeded`] when more than
/// `limit` refinements are needed.
pub fn median_with_limit(samples: &[Sample], channel: usize, limit: usize) -> Result<f64> {
    if channel > 2 {
        return Err(QuantizeError::invalid_parameter("channel", channel));
    }
    if samples.is_empty() {
        return Ok(0.0);
    }

    let mut values: Vec<f64> = samples.iter().map(|s| s.rgb[channel]).collect();
    // Order statistic of the median, fractional for even counts
    let mut target = (values.len() - 1) as f64 / 2.0;
    let mut depth = 0;

    loop {
        if values.len() < MEDIAN_SORT_THRESHOLD {
            return Ok(interpolate_sorted(values, target));
        }
        if depth >= limit {
            return Err(QuantizeError::RecursionLimitExceeded { limit });
        }

        let (min, max) = min_max(&values);
        let pivot = (min + max) / 2.0;

        let (lower, upper): (Vec<f64>, Vec<f64>) = values.iter().partition(|&&v| v <= pivot);
        if lower.is_empty() || upper.is_empty() {
            return Ok(interpolate_sorted(values, target));
        }

        let split = lower.len() as f64;
        if target.ceil() < split {
            values = lower;
        } else if target.floor() >= split {
            target -= split;
            values = upper;
        } else {
            // Target straddles the pivot: blend the two neighbours
            let frac = target - target.floor();
            let below = min_max(&lower).1;
            let above = min_max(&upper).0;
            return Ok(below * (1.0 - frac) + above * frac);
        }
        depth += 1;
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Value at a possibly fractional order statistic
fn interpolate_sorted(mut values: Vec<f64>, target: f64) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let lo = target.floor() as usize;
    let hi = (target.ceil() as usize).min(values.len() - 1);
    if lo == hi {
        return values[lo];
    }
    let frac = target - lo as f64;
    values[lo] * (1.0 - frac) + values[hi] * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(r: f64, g: f64, b: f64, weight: f64) -> Sample {
        Sample::new([r, g, b], weight)
    }

    #[test]
    fn test_weighted_mean() {
        let samples = vec![sample(1.0, 0.0, 0.0, 3.0), sample(0.0, 0.0, 1.0, 1.0)];
        let (mean, total) = weighted_mean(&samples);
        assert_eq!(total, 4.0);
        assert!((mean[0] - 0.75).abs() < 1e-12);
        assert_eq!(mean[1], 0.0);
        assert!((mean[2] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_mean_zero_weight() {
        let samples = vec![sample(0.5, 0.5, 0.5, 0.0)];
        assert_eq!(weighted_mean(&samples), ([0.0; 3], 0.0));
        assert_eq!(weighted_mean(&[]), ([0.0; 3], 0.0));
    }

    #[test]
    fn test_dispersion_identical_samples() {
        let samples = vec![sample(0.2, 0.4, 0.6, 1.0); 5];
        assert!(dispersion(&samples) < 1e-15);
    }

    #[test]
    fn test_dispersion_two_colors() {
        let samples = vec![sample(1.0, 0.0, 0.0, 1.0), sample(0.0, 0.0, 1.0, 1.0)];
        // Each sample sits 0.5 (squared) away from the mean (0.5, 0, 0.5)
        assert!((dispersion(&samples) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_dispersion_squared_weighting() {
        // Heavy sample near the mean, light one far away
        let samples = vec![sample(0.0, 0.0, 0.0, 9.0), sample(1.0, 0.0, 0.0, 1.0)];
        let mean = 0.1;
        let expected = (81.0 * mean * mean + 1.0 * (1.0 - mean) * (1.0 - mean)) / 82.0;
        assert!((dispersion(&samples) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_dispersion_zero_weight() {
        let samples = vec![sample(1.0, 0.0, 0.0, 0.0), sample(0.0, 1.0, 0.0, 0.0)];
        assert_eq!(dispersion(&samples), 0.0);
    }

    #[test]
    fn test_extents() {
        let samples = vec![sample(0.1, 0.5, 0.9, 1.0), sample(0.3, 0.2, 0.9, 2.0)];
        let ext = extents(&samples);
        assert_eq!(ext[0], (0.1, 0.3));
        assert_eq!(ext[1], (0.2, 0.5));
        assert_eq!(ext[2], (0.9, 0.9));
        assert_eq!(extents(&[]), [(0.0, 0.0); 3]);
    }

    #[test]
    fn test_median_small_box() {
        let samples: Vec<Sample> = [0.5, 0.1, 0.3, 0.2, 0.4]
            .iter()
            .map(|&r| sample(r, 0.0, 0.0, 1.0))
            .collect();
        assert_eq!(median(&samples, 0).unwrap(), 0.3);
    }

    #[test]
    fn test_median_interpolates() {
        let samples: Vec<Sample> = [0.8, 0.1, 0.4, 0.2]
            .iter()
            .map(|&g| sample(0.0, g, 0.0, 1.0))
            .collect();
        // Even count: halfway between 0.2 and 0.4
        assert!((median(&samples, 1).unwrap() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_median_bisection() {
        let samples: Vec<Sample> = (0..=100)
            .map(|i| sample(0.0, 0.0, i as f64 / 100.0, 1.0))
            .collect();
        let m = median(&samples, 2).unwrap();
        assert!((m - 0.5).abs() < 0.011, "median was {}", m);
    }

    #[test]
    fn test_median_recursion_limit() {
        let samples: Vec<Sample> = (0..40)
            .map(|i| sample(i as f64 / 40.0, 0.0, 0.0, 1.0))
            .collect();
        match median_with_limit(&samples, 0, 0) {
            Err(QuantizeError::RecursionLimitExceeded { limit }) => assert_eq!(limit, 0),
            other => panic!("Expected RecursionLimitExceeded, got: {:?}", other),
        }
    }

    #[test]
    fn test_median_invalid_channel() {
        let samples = vec![sample(0.0, 0.0, 0.0, 1.0)];
        assert!(median(&samples, 3).is_err());
    }
}
