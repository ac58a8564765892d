//! Weighted color histogram
//!
//! Pixels that survive the [`HistogramFilter`] are bucketed by their sRGB
//! channels rounded to hundredths. Each bucket accumulates the alpha
//! coverage of its pixels, and buckets keep the order in which they were
//! first seen so that later candidate enumeration is deterministic.

use std::collections::HashMap;

use crate::color::{rgb8_to_lab, Sample};
use crate::config::HistogramFilter;
use crate::constants::histogram::CHANNEL_PRECISION;
use crate::pixels::PixelBuffer;

/// Packed per-channel bucket codes
///
/// Each code is in `0..=100` and takes 8 bits of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorKey(u32);

impl ColorKey {
    /// Bucket an 8-bit RGB color
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        let code = |c: u8| (c as f64 / 255.0 * CHANNEL_PRECISION).round() as u32;
        Self(code(r) << 16 | code(g) << 8 | code(b))
    }

    /// Per-channel bucket codes
    pub fn codes(self) -> [u32; 3] {
        [(self.0 >> 16) & 0xff, (self.0 >> 8) & 0xff, self.0 & 0xff]
    }

    /// Bucket center as normalized sRGB
    pub fn rgb(self) -> [f64; 3] {
        self.codes().map(|c| c as f64 / CHANNEL_PRECISION)
    }
}

/// Buckets in first-appearance order
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    index: HashMap<ColorKey, usize>,
    samples: Vec<Sample>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to the bucket of `key`, creating it if needed
    pub fn add(&mut self, key: ColorKey, weight: f64) {
        match self.index.get(&key) {
            Some(&i) => self.samples[i].weight += weight,
            None => {
                self.index.insert(key, self.samples.len());
                self.samples.push(Sample::new(key.rgb(), weight));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The root box
    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}

/// Build the histogram of a buffer
pub fn build_histogram(pixels: &PixelBuffer, filter: &HistogramFilter) -> Histogram {
    let mut histogram = Histogram::new();

    for [r, g, b, a] in pixels.pixels() {
        let lab = rgb8_to_lab(r, g, b);
        if !filter.accepts(lab.l, lab.a, lab.b) {
            continue;
        }
        histogram.add(ColorKey::from_rgb8(r, g, b), a as f64 / 255.0);
    }

    histogram
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_key_codes() {
        let key = ColorKey::from_rgb8(255, 0, 128);
        assert_eq!(key.codes(), [100, 0, 50]);
        assert_eq!(key.rgb(), [1.0, 0.0, 0.5]);

        // Neighbouring bytes can share a bucket
        assert_eq!(ColorKey::from_rgb8(200, 0, 0), ColorKey::from_rgb8(199, 0, 0));
        assert_ne!(ColorKey::from_rgb8(200, 0, 0), ColorKey::from_rgb8(0, 200, 0));
    }

    #[test]
    fn test_filters_neutral_pixels() {
        let data = [
            255, 255, 255, 255, // white
            0, 0, 0, 255, // black
            128, 128, 128, 255, // gray
            255, 0, 0, 255, // red
        ];
        let pixels = PixelBuffer::from_slice(4, 1, &data).unwrap();
        let histogram = build_histogram(&pixels, &HistogramFilter::default());

        assert_eq!(histogram.len(), 1);
        assert_eq!(histogram.samples()[0].rgb, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_accumulates_alpha_weight() {
        let data = [
            0, 0, 255, 255, //
            255, 0, 0, 255, //
            0, 0, 255, 51, //
            255, 0, 0, 0, //
        ];
        let pixels = PixelBuffer::from_slice(2, 2, &data).unwrap();
        let histogram = build_histogram(&pixels, &HistogramFilter::default());

        let samples = histogram.samples();
        assert_eq!(samples.len(), 2);
        // First-appearance order: blue, then red
        assert_eq!(samples[0].rgb, [0.0, 0.0, 1.0]);
        assert!((samples[0].weight - 1.2).abs() < 1e-12);
        assert_eq!(samples[1].rgb, [1.0, 0.0, 0.0]);
        assert_eq!(samples[1].weight, 1.0);
    }

    #[test]
    fn test_permissive_filter_keeps_everything() {
        let filter = HistogramFilter {
            max_lightness: 101.0,
            min_lightness: 0.0,
            min_chroma_squared: 0.0,
        };
        let pixels = PixelBuffer::filled(3, 3, [255, 255, 255, 255]).unwrap();
        let histogram = build_histogram(&pixels, &filter);
        assert_eq!(histogram.len(), 1);
        assert!((histogram.samples()[0].weight - 9.0).abs() < 1e-12);
    }
}
