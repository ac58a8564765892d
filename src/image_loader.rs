//! Image file loading into pixel buffers
//!
//! Decodes image files with the `image` crate and converts them to the
//! tightly packed RGBA8 layout the quantizer expects.
//!
//! ## Supported Formats
//!
//! - JPEG, PNG, GIF (first frame), WebP, TIFF, BMP, ICO, TGA, EXR, PNM, QOI, DDS, HDR
//!
//! Any failure to produce pixels is reported as
//! [`QuantizeError::UnsupportedSource`].

use std::path::Path;

use image::{DynamicImage, ImageFormat, ImageReader};
use log::debug;

use crate::pixels::PixelBuffer;
use crate::{QuantizeError, Result};

/// Load an image from disk as an RGBA8 pixel buffer
///
/// # Errors
///
/// Returns `QuantizeError::UnsupportedSource` if:
/// - The extension does not name a format the `image` crate decodes
/// - File cannot be opened
/// - Decoding fails or the image is empty
///
/// # Example
///
/// ```rust,no_run
/// use swatch_quantizer::image_loader::load_pixels;
/// use std::path::Path;
///
/// let pixels = load_pixels(Path::new("photo.jpg"))?;
/// println!("Loaded image: {}x{}", pixels.width(), pixels.height());
/// # Ok::<(), swatch_quantizer::QuantizeError>(())
/// ```
pub fn load_pixels(path: &Path) -> Result<PixelBuffer> {
    let format = ImageFormat::from_path(path).map_err(|e| {
        QuantizeError::unsupported_source(
            format!("Unknown image format for file: {}", path.display()),
            e,
        )
    })?;

    let mut reader = ImageReader::open(path).map_err(|e| {
        QuantizeError::unsupported_source(
            format!("Failed to open image file: {}", path.display()),
            e,
        )
    })?;
    reader.set_format(format);

    let img = reader.decode().map_err(|e| {
        QuantizeError::unsupported_source(
            format!("Failed to decode image: {}", path.display()),
            e,
        )
    })?;

    debug!(
        "Loaded {:?} image {}x{} from {}",
        format,
        img.width(),
        img.height(),
        path.display()
    );

    from_dynamic_image(img)
}

/// Convert a decoded image of any color type to RGBA8
pub fn from_dynamic_image(img: DynamicImage) -> Result<PixelBuffer> {
    let (width, height) = (img.width(), img.height());
    PixelBuffer::try_from(img.into_rgba8()).map_err(|_| QuantizeError::UnsupportedSource {
        message: format!("Image has no pixels ({}x{})", width, height),
        source: None,
    })
}
