//! Windowed kernel resizing of RGBA8 buffers
//!
//! Every destination pixel is a normalized, kernel-weighted average of the
//! source pixels within `filter_size` source pixels of its mapped centre.
//! Distances are measured in destination pixels and kernel weights come
//! from a [`KernelCache`] built once per call, so the work per destination
//! pixel is bounded by `(2 * filter_size + 1)²` lookups.

use log::debug;

use crate::constants::resample::CACHE_PRECISION;
use crate::pixels::{byte_len, PixelBuffer};
use crate::resample::kernel::{filter_size, KernelCache, KernelType};
use crate::{QuantizeError, Result};

/// Kernel resampler
#[derive(Debug, Clone)]
pub struct Resampler {
    kernel: KernelType,
    cache_precision: usize,
}

impl Default for Resampler {
    fn default() -> Self {
        Self::new(KernelType::default())
    }
}

/// Source span covered by one destination pixel along an axis
struct Axis {
    /// Destination / source size ratio
    scale: f64,
    /// Factor converting source distances to destination units
    distance_scale: f64,
    /// Half-width of the window in source pixels
    radius: f64,
    last: usize,
}

impl Axis {
    fn new(source: u32, target: u32, filter_size: usize) -> Self {
        let scale = target as f64 / source as f64;
        let distance_scale = scale.min(1.0);
        Self {
            scale,
            distance_scale,
            radius: filter_size as f64,
            last: source as usize - 1,
        }
    }

    /// Mapped centre and inclusive source window of destination index `i`
    fn window(&self, i: usize) -> (f64, usize, usize) {
        let centre = (i as f64 + 0.5) / self.scale;
        let start = (centre - self.radius).floor().max(0.0) as usize;
        let end = ((centre + self.radius).ceil() as usize).min(self.last);
        (centre, start.min(self.last), end)
    }

    /// Squared distance, in destination units, from a source pixel to `centre`
    fn squared_distance(&self, source: usize, centre: f64) -> f64 {
        let d = (source as f64 + 0.5 - centre) * self.distance_scale;
        d * d
    }
}

impl Resampler {
    pub fn new(kernel: KernelType) -> Self {
        Self {
            kernel,
            cache_precision: CACHE_PRECISION,
        }
    }

    /// Create a resampler with a custom kernel cache resolution
    pub fn with_precision(kernel: KernelType, cache_precision: usize) -> Result<Self> {
        if cache_precision == 0 {
            return Err(QuantizeError::invalid_parameter("cache_precision", cache_precision));
        }
        Ok(Self {
            kernel,
            cache_precision,
        })
    }

    /// Resize `source` to `target_width x target_height`
    ///
    /// Identical dimensions return an unchanged copy.
    ///
    /// # Errors
    ///
    /// Returns `QuantizeError::InvalidDimensions` if a target dimension is zero.
    pub fn resize(
        &self,
        source: &PixelBuffer,
        target_width: u32,
        target_height: u32,
    ) -> Result<PixelBuffer> {
        let len = byte_len(target_width, target_height)?;

        let (width, height) = (source.width(), source.height());
        if width == target_width && height == target_height {
            return Ok(source.clone());
        }

        let size = filter_size(
            target_width as f64 / width as f64,
            target_height as f64 / height as f64,
        );
        let x_axis = Axis::new(width, target_width, size);
        let y_axis = Axis::new(height, target_height, size);

        debug!(
            "Resizing {}x{} -> {}x{} ({:?}, filter size {})",
            width, height, target_width, target_height, self.kernel, size
        );

        let cache = KernelCache::build(self.kernel, size, self.cache_precision);
        let src = source.as_bytes();
        let stride = width as usize;
        let mut out = vec![0u8; len];

        for y in 0..target_height as usize {
            let (cy, y_start, y_end) = y_axis.window(y);

            for x in 0..target_width as usize {
                let (cx, x_start, x_end) = x_axis.window(x);

                let mut acc = [0.0f64; 4];
                let mut total = 0.0;
                for sy in y_start..=y_end {
                    let dy = y_axis.squared_distance(sy, cy);
                    let row = sy * stride;
                    for sx in x_start..=x_end {
                        let w = cache.weight(x_axis.squared_distance(sx, cx) + dy);
                        if w == 0.0 {
                            continue;
                        }
                        let idx = (row + sx) * 4;
                        for (a, &c) in acc.iter_mut().zip(&src[idx..idx + 4]) {
                            *a += c as f64 * w;
                        }
                        total += w;
                    }
                }

                let dst = (y * target_width as usize + x) * 4;
                if total > 0.0 {
                    for (o, a) in out[dst..dst + 4].iter_mut().zip(acc) {
                        *o = (a / total).round().clamp(0.0, 255.0) as u8;
                    }
                } else {
                    let nearest_x = (cx as usize).min(x_axis.last);
                    let nearest_y = (cy as usize).min(y_axis.last);
                    let idx = (nearest_y * stride + nearest_x) * 4;
                    out[dst..dst + 4].copy_from_slice(&src[idx..idx + 4]);
                }
            }
        }

        PixelBuffer::new(target_width, target_height, out)
    }
}

/// Resize a buffer with the given kernel and the default cache precision
pub fn resample(
    source: &PixelBuffer,
    target_width: u32,
    target_height: u32,
    kernel: KernelType,
) -> Result<PixelBuffer> {
    Resampler::new(kernel).resize(source, target_width, target_height)
}
