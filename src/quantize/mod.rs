//! Palette extraction engine
//!
//! Builds a weighted histogram of the (possibly downsampled) input and
//! splits it into boxes with a dispersion-ordered priority queue:
//!
//! 1. The box with the largest dispersion is popped.
//! 2. It becomes a leaf if the box budget is spent or it is already tight.
//! 3. Otherwise it is cut along its widest channel at the threshold that
//!    minimizes the summed cubic dispersion of both halves.
//!
//! Leaves become [`Swatch`]es ordered by descending weight.

pub mod histogram;
pub mod node;

use std::borrow::Cow;
use std::collections::BinaryHeap;

use log::debug;
use palette::Srgb;

use crate::color::{rgb_to_hsl, srgb_to_lab, to_hex, Sample};
use crate::config::QuantizeConfig;
use crate::pixels::PixelBuffer;
use crate::resample::Resampler;
use crate::{Result, Swatch};

pub use histogram::{build_histogram, ColorKey, Histogram};
pub use node::{Node, Split};

use node::Queued;

/// Palette extractor holding a validated configuration
#[derive(Debug, Clone, Default)]
pub struct Quantizer {
    config: QuantizeConfig,
}

impl Quantizer {
    /// Quantizer with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantizer with a custom configuration
    ///
    /// # Errors
    ///
    /// Returns `QuantizeError::InvalidParameter` if the configuration fails
    /// [`QuantizeConfig::validate`].
    pub fn with_config(config: QuantizeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Extract swatches from a pixel buffer
    ///
    /// Returns an empty list when every pixel is filtered out.
    pub fn quantize(&self, pixels: &PixelBuffer) -> Result<Vec<Swatch>> {
        let working = self.downsample(pixels)?;

        let histogram = build_histogram(&working, &self.config.histogram);
        debug!(
            "Histogram has {} buckets from {} pixels",
            histogram.len(),
            working.pixel_count()
        );

        let leaves = split_boxes(
            histogram.into_samples(),
            self.config.max_boxes,
            self.config.min_dispersion,
        );
        let swatches = into_swatches(leaves);
        debug!("Extracted {} swatches", swatches.len());

        Ok(swatches)
    }

    /// Extract swatches from raw RGBA8 bytes
    pub fn quantize_bytes(&self, data: &[u8], width: u32, height: u32) -> Result<Vec<Swatch>> {
        let pixels = PixelBuffer::from_slice(width, height, data)?;
        self.quantize(&pixels)
    }

    /// Shrink the input to the pixel budget, borrowing it when already small
    fn downsample<'a>(&self, pixels: &'a PixelBuffer) -> Result<Cow<'a, PixelBuffer>> {
        let Some((width, height)) =
            target_dimensions(pixels.width(), pixels.height(), self.config.max_pixel_budget)
        else {
            return Ok(Cow::Borrowed(pixels));
        };

        debug!(
            "Downsampling {}x{} to {}x{} (budget {} pixels)",
            pixels.width(),
            pixels.height(),
            width,
            height,
            self.config.max_pixel_budget
        );
        let resampler = Resampler::with_precision(self.config.kernel, self.config.cache_precision)?;
        Ok(Cow::Owned(resampler.resize(pixels, width, height)?))
    }
}

/// Dimensions that bring `width * height` down to roughly `budget` pixels
///
/// `None` when the image already fits.
pub fn target_dimensions(width: u32, height: u32, budget: usize) -> Option<(u32, u32)> {
    let count = width as f64 * height as f64;
    if count <= budget as f64 {
        return None;
    }

    let ratio = (count / budget as f64).sqrt();
    let scale = |d: u32| ((d as f64 / ratio).round() as u32).max(1);
    Some((scale(width), scale(height)))
}

/// Run the priority-queue split loop over a root box
///
/// At no point do leaves plus queued boxes exceed `max_boxes`.
pub fn split_boxes(samples: Vec<Sample>, max_boxes: usize, min_dispersion: f64) -> Vec<Node> {
    if samples.is_empty() {
        return Vec::new();
    }

    let mut queue = BinaryHeap::new();
    let mut seq = 0u64;
    let mut push = |queue: &mut BinaryHeap<Queued>, node: Node| {
        queue.push(Queued { node, seq });
        seq += 1;
    };
    push(&mut queue, Node::new(samples));

    let mut leaves = Vec::new();
    while let Some(Queued { node, .. }) = queue.pop() {
        if leaves.len() + 1 + queue.len() >= max_boxes || node.dispersion < min_dispersion {
            leaves.push(node);
            continue;
        }

        match node.split() {
            Split::Pair { low, high } => {
                push(&mut queue, high);
                push(&mut queue, low);
            }
            Split::Leaf(node) => leaves.push(node),
        }
    }

    leaves
}

/// Order leaves by weight and convert them to normalized swatches
fn into_swatches(mut leaves: Vec<Node>) -> Vec<Swatch> {
    leaves.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    let total: f64 = leaves.iter().map(|n| n.weight).sum();

    leaves
        .into_iter()
        .map(|node| {
            let [r, g, b] = node.mean;
            let rgb = Srgb::new(r, g, b);
            Swatch {
                weight: if total > 0.0 { node.weight / total } else { 0.0 },
                dispersion: node.dispersion,
                rgb,
                hsl: rgb_to_hsl(rgb),
                lab: srgb_to_lab(rgb),
                hex: to_hex(rgb),
            }
        })
        .collect()
}
