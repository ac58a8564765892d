//! Color conversion and box statistics module
//!
//! This module handles color space conversions and the weighted
//! statistics the quantizer computes over boxes of color samples.

pub mod conversion;
pub mod statistics;

pub use conversion::{
    chroma, delta_e, hsl_to_rgb, lab_to_srgb, rgb8_to_lab, rgb_to_hsl, srgb_to_lab,
    to_display_string, to_hex, Hsl,
};
pub use statistics::{dispersion, extents, median, weighted_mean, Sample};
