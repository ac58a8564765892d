//! Resampling kernels and the squared-distance weight cache

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::constants::resample::{
    MEDIUM_FILTER_RATIO, MEDIUM_FILTER_SIZE, NARROW_FILTER_RATIO, NARROW_FILTER_SIZE,
    WIDE_FILTER_SIZE,
};

/// Weighting function applied to source pixels by distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelType {
    /// Windowed sinc: `size·sin(πx)·sin(πx/size) / (πx)²`
    #[default]
    Lanczos,
    /// Triangle: `(1 − |x|)·size` inside `|x| ≤ 1`
    Linear,
}

impl KernelType {
    /// Kernel weight at distance `x` for a filter of the given size
    pub fn evaluate(&self, size: f64, x: f64) -> f64 {
        match self {
            KernelType::Lanczos => {
                if x >= size || x <= -size {
                    return 0.0;
                }
                if x == 0.0 {
                    return 1.0;
                }
                let xpi = x * PI;
                size * xpi.sin() * (xpi / size).sin() / (xpi * xpi)
            }
            KernelType::Linear => {
                let x = x.abs();
                if x <= 1.0 {
                    (1.0 - x) * size
                } else {
                    0.0
                }
            }
        }
    }
}

/// Filter size for horizontal and vertical scale ratios
///
/// Only applies the narrower filters when both axes shrink.
pub fn filter_size(scale_x: f64, scale_y: f64) -> usize {
    let minifying = |s: f64| s > 0.0 && s < 1.0;
    if !(minifying(scale_x) && minifying(scale_y)) {
        return WIDE_FILTER_SIZE;
    }

    let ratio = scale_x.min(scale_y);
    if ratio <= NARROW_FILTER_RATIO {
        NARROW_FILTER_SIZE
    } else if ratio <= MEDIUM_FILTER_RATIO {
        MEDIUM_FILTER_SIZE
    } else {
        WIDE_FILTER_SIZE
    }
}

/// Precomputed kernel weights indexed by quantized squared distance
///
/// Covers squared distances in `[0, filter_size²)`; anything beyond weighs 0.
#[derive(Debug, Clone)]
pub struct KernelCache {
    weights: Vec<f64>,
    precision: f64,
}

impl KernelCache {
    /// Evaluate `kernel` once per bucket
    ///
    /// Negative lobes are stored as 0.
    pub fn build(kernel: KernelType, filter_size: usize, precision: usize) -> Self {
        let buckets = filter_size * filter_size * precision;
        let step = 1.0 / precision as f64;
        let size = filter_size as f64;

        let weights = (0..buckets)
            .map(|key| kernel.evaluate(size, (key as f64 * step).sqrt()).max(0.0))
            .collect();

        Self {
            weights,
            precision: precision as f64,
        }
    }

    /// Weight for a squared distance
    #[inline]
    pub fn weight(&self, squared_distance: f64) -> f64 {
        let key = (squared_distance * self.precision) as usize;
        self.weights.get(key).copied().unwrap_or(0.0)
    }

}
