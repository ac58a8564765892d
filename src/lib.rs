//! # Swatch Quantizer
//!
//! A Rust crate for extracting a small palette of representative colors
//! from raster images.
//!
//! This library produces weighted color swatches by:
//! - Downsampling oversized inputs with a windowed Lanczos kernel
//! - Building a weighted histogram of saturated, mid-lightness colors
//! - Recursively splitting the histogram where the dispersion cost drops most
//! - Reporting each box as sRGB, HSL and CIE Lab with its share of the image
//!
//! ## Example
//!
//! ```rust,no_run
//! use swatch_quantizer::{image_loader, Quantizer};
//! use std::path::Path;
//!
//! let pixels = image_loader::load_pixels(Path::new("photo.jpg"))?;
//! for swatch in Quantizer::new().quantize(&pixels)? {
//!     println!("{} {:.1}%", swatch.hex, swatch.weight * 100.0);
//! }
//! # Ok::<(), swatch_quantizer::QuantizeError>(())
//! ```

use palette::white_point::D65;
use palette::{Lab, Srgb};
use serde::{Deserialize, Serialize};

pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod image_loader;
pub mod pixels;
pub mod quantize;
pub mod resample;

pub use color::Hsl;
pub use config::{HistogramFilter, QuantizeConfig};
pub use error::{QuantizeError, Result};
pub use pixels::PixelBuffer;
pub use quantize::Quantizer;
pub use resample::{resample, KernelType, Resampler};

/// One representative color of an image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swatch {
    /// Share of the retained visual mass (swatch weights sum to 1)
    pub weight: f64,
    /// Dispersion of the box this swatch summarizes
    pub dispersion: f64,
    /// sRGB color, channels in `[0, 1]`
    pub rgb: Srgb<f64>,
    /// HSL representation, hue in `[0, 1)`
    pub hsl: Hsl,
    /// CIE Lab coordinates (D65)
    pub lab: Lab<D65, f64>,
    /// Hexadecimal color representation
    pub hex: String,
}

/// Extract swatches from RGBA8 bytes with the default configuration
///
/// # Errors
///
/// Returns `QuantizeError` if:
/// - A dimension is zero (`InvalidDimensions`)
/// - `pixels.len()` is not `width * height * 4` (`BufferSizeMismatch`)
pub fn quantize(pixels: &[u8], width: u32, height: u32) -> Result<Vec<Swatch>> {
    Quantizer::new().quantize_bytes(pixels, width, height)
}

/// Extract swatches from RGBA8 bytes with a custom configuration
///
/// Fails like [`quantize`], and with `InvalidParameter` for a configuration
/// that does not validate.
pub fn quantize_with_config(
    pixels: &[u8],
    width: u32,
    height: u32,
    config: &QuantizeConfig,
) -> Result<Vec<Swatch>> {
    Quantizer::with_config(config.clone())?.quantize_bytes(pixels, width, height)
}
