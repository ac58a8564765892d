//! Error types for the swatch_quantizer library

use thiserror::Error;

/// Result type alias for swatch_quantizer operations
pub type Result<T> = std::result::Result<T, QuantizeError>;

/// Caller-visible failures of quantization and resampling
///
/// Numeric edge cases (zero weight, zero variance, fully filtered images) are
/// never reported here; they resolve to defined fallback values.
#[derive(Error, Debug)]
pub enum QuantizeError {
    /// Width or height is zero, or the pixel count overflows
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel buffer length does not match `width * height * 4`
    #[error("Pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// The collaborator could not produce a pixel buffer
    #[error("Unsupported pixel source: {message}")]
    UnsupportedSource {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Median bisection did not converge within its refinement cap
    #[error("Median search exceeded {limit} refinements")]
    RecursionLimitExceeded { limit: usize },

    /// Invalid configuration parameter
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration file could not be read, written or parsed
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl QuantizeError {
    /// Create an unsupported-source error with context
    pub fn unsupported_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::UnsupportedSource {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if this error was caused by the shape of the caller's input
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            QuantizeError::InvalidDimensions { .. } | QuantizeError::BufferSizeMismatch { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            QuantizeError::InvalidDimensions { width, height } => {
                format!("The image size {}x{} is not valid. Width and height must be positive.", width, height)
            }
            QuantizeError::BufferSizeMismatch { .. } => {
                "The pixel data does not match the image size. Please provide RGBA8 data.".to_string()
            }
            QuantizeError::UnsupportedSource { .. } => {
                "Could not read pixels from the image. Please check the file format and try again.".to_string()
            }
            QuantizeError::InvalidParameter { parameter, .. } => {
                format!("The setting '{}' has an invalid value.", parameter)
            }
            _ => "Palette extraction failed. Please try with a different image.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QuantizeError::InvalidDimensions { width: 0, height: 10 };
        assert_eq!(err.to_string(), "Invalid dimensions: 0x10");

        let err = QuantizeError::BufferSizeMismatch { expected: 16, actual: 12 };
        assert!(err.to_string().contains("expected 16 bytes, got 12"));
    }

    #[test]
    fn test_unsupported_source_keeps_cause() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = QuantizeError::unsupported_source("Failed to open image", io);
        assert!(err.source().is_some());
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_user_message() {
        let err = QuantizeError::invalid_parameter("max_boxes", 0);
        assert!(err.user_message().contains("max_boxes"));

        let err = QuantizeError::InvalidDimensions { width: 0, height: 0 };
        assert!(err.is_input_error());
        assert!(err.user_message().contains("0x0"));
    }
}
