//! Configuration structures for the swatch_quantizer engine.
//!
//! This module defines the tunable parameters of palette extraction,
//! grouped into the engine limits and the histogram filter.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use swatch_quantizer::QuantizeConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = QuantizeConfig::from_json_file(Path::new("quantize.json"))?;
//!
//! // Or use defaults
//! let config = QuantizeConfig::default();
//! # Ok::<(), swatch_quantizer::QuantizeError>(())
//! ```
//!
//! Missing fields in a JSON file take their default values.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::histogram::{MAX_LIGHTNESS, MIN_CHROMA_SQUARED, MIN_LIGHTNESS};
use crate::constants::quantize::{
    DEFAULT_MAX_BOXES, DEFAULT_MAX_PIXEL_BUDGET, DEFAULT_MIN_DISPERSION,
};
use crate::constants::resample::CACHE_PRECISION;
use crate::resample::KernelType;
use crate::{QuantizeError, Result};

/// Complete quantizer configuration.
///
/// Can be serialized to/from JSON for reproducible runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantizeConfig {
    /// Pixel count above which the input is downsampled first
    pub max_pixel_budget: usize,

    /// Upper bound on the number of swatches returned
    pub max_boxes: usize,

    /// Boxes with a lower dispersion are not split further (0.0 disables)
    pub min_dispersion: f64,

    /// Kernel used when downsampling
    pub kernel: KernelType,

    /// Buckets per unit squared distance in the kernel cache
    pub cache_precision: usize,

    /// Which pixels contribute to the histogram
    pub histogram: HistogramFilter,
}

/// Lab-space filter applied to each pixel before bucketing.
///
/// Near-white, near-black and near-gray pixels carry little palette
/// information and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramFilter {
    /// Pixels lighter than this L* are skipped
    pub max_lightness: f64,

    /// Pixels darker than this L* are skipped
    pub min_lightness: f64,

    /// Pixels with `a*² + b*²` below this are skipped
    pub min_chroma_squared: f64,
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        Self {
            max_pixel_budget: DEFAULT_MAX_PIXEL_BUDGET,
            max_boxes: DEFAULT_MAX_BOXES,
            min_dispersion: DEFAULT_MIN_DISPERSION,
            kernel: KernelType::default(),
            cache_precision: CACHE_PRECISION,
            histogram: HistogramFilter::default(),
        }
    }
}

impl Default for HistogramFilter {
    fn default() -> Self {
        Self {
            max_lightness: MAX_LIGHTNESS,
            min_lightness: MIN_LIGHTNESS,
            min_chroma_squared: MIN_CHROMA_SQUARED,
        }
    }
}

impl HistogramFilter {
    /// Check whether a Lab color is kept
    #[inline]
    pub fn accepts(&self, l: f64, a: f64, b: f64) -> bool {
        l <= self.max_lightness
            && l >= self.min_lightness
            && a * a + b * b >= self.min_chroma_squared
    }
}

impl QuantizeConfig {
    /// Check every parameter is usable
    ///
    /// # Errors
    ///
    /// Returns `QuantizeError::InvalidParameter` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.max_pixel_budget == 0 {
            return Err(QuantizeError::invalid_parameter("max_pixel_budget", self.max_pixel_budget));
        }
        if self.max_boxes == 0 {
            return Err(QuantizeError::invalid_parameter("max_boxes", self.max_boxes));
        }
        if self.min_dispersion.is_nan() || self.min_dispersion < 0.0 {
            return Err(QuantizeError::invalid_parameter("min_dispersion", self.min_dispersion));
        }
        if self.cache_precision == 0 {
            return Err(QuantizeError::invalid_parameter("cache_precision", self.cache_precision));
        }

        let filter = &self.histogram;
        if filter.min_lightness.is_nan() || filter.min_lightness > filter.max_lightness {
            return Err(QuantizeError::invalid_parameter(
                "histogram.min_lightness",
                filter.min_lightness,
            ));
        }
        if filter.min_chroma_squared.is_nan() || filter.min_chroma_squared < 0.0 {
            return Err(QuantizeError::invalid_parameter(
                "histogram.min_chroma_squared",
                filter.min_chroma_squared,
            ));
        }
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            QuantizeError::config(format!("Failed to read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            QuantizeError::config(format!("Failed to parse {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| QuantizeError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            QuantizeError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }
}
