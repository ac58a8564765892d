//! RGBA8 pixel buffers
//!
//! The quantizer and resampler work on a tightly packed, row-major RGBA8
//! buffer. [`PixelBuffer`] validates its shape once on construction so the
//! algorithms can index it without further checks.

use image::RgbaImage;

use crate::{QuantizeError, Result};

/// Row-major RGBA8 pixel data with its dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Byte length of a `width x height` RGBA8 buffer
///
/// # Errors
///
/// Returns `QuantizeError::InvalidDimensions` for a zero dimension or a size
/// that overflows `usize`.
pub fn byte_len(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(QuantizeError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or(QuantizeError::InvalidDimensions { width, height })
}

fn check_len(width: u32, height: u32, actual: usize) -> Result<()> {
    let expected = byte_len(width, height)?;
    if actual != expected {
        return Err(QuantizeError::BufferSizeMismatch { expected, actual });
    }
    Ok(())
}

impl PixelBuffer {
    /// Wrap RGBA8 data, checking it holds exactly `width * height` pixels
    ///
    /// # Errors
    ///
    /// Returns `QuantizeError::InvalidDimensions` for zero dimensions and
    /// `QuantizeError::BufferSizeMismatch` when the length is wrong.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        check_len(width, height, data.len())?;
        Ok(Self { width, height, data })
    }

    /// Copy RGBA8 data from a borrowed slice
    pub fn from_slice(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        check_len(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data: data.to_vec(),
        })
    }

    /// Buffer of a single repeated color
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let len = byte_len(width, height)?;
        let data = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels (`width * height`)
    pub fn pixel_count(&self) -> usize {
        self.data.len() / 4
    }

    /// Raw RGBA8 bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// RGBA value of the pixel at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Iterate over pixels in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data.chunks_exact(4).map(|p| [p[0], p[1], p[2], p[3]])
    }
}

impl TryFrom<RgbaImage> for PixelBuffer {
    type Error = QuantizeError;

    fn try_from(image: RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::new(width, height, image.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_length() {
        assert!(PixelBuffer::new(2, 1, vec![0; 8]).is_ok());

        match PixelBuffer::new(2, 2, vec![0; 12]) {
            Err(QuantizeError::BufferSizeMismatch { expected, actual }) => {
                assert_eq!(expected, 16);
                assert_eq!(actual, 12);
            }
            other => panic!("Expected BufferSizeMismatch, got: {:?}", other),
        }
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(matches!(
            PixelBuffer::new(0, 5, vec![]),
            Err(QuantizeError::InvalidDimensions { width: 0, height: 5 })
        ));
        assert!(matches!(
            PixelBuffer::from_slice(3, 0, &[]),
            Err(QuantizeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_filled_and_pixel_access() {
        let buffer = PixelBuffer::filled(3, 2, [10, 20, 30, 255]).unwrap();
        assert_eq!(buffer.pixel_count(), 6);
        assert_eq!(buffer.pixel(2, 1), [10, 20, 30, 255]);
        assert!(buffer.pixels().all(|p| p == [10, 20, 30, 255]));
    }

    #[test]
    fn test_from_rgba_image() {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(1, 0, image::Rgba([255, 0, 0, 255]));

        let buffer = PixelBuffer::try_from(img).unwrap();
        assert_eq!((buffer.width(), buffer.height()), (2, 2));
        assert_eq!(buffer.pixel(1, 0), [255, 0, 0, 255]);
        assert_eq!(buffer.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_from_empty_rgba_image() {
        assert!(PixelBuffer::try_from(RgbaImage::new(0, 0)).is_err());
    }
}
