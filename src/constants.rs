//! Numeric constants for color conversion, histogram filtering,
//! box splitting and resampling
//!
//! Tunable values are defaults only; [`crate::QuantizeConfig`] carries the
//! values actually used by a call.

/// D65 Standard Illuminant Reference
pub mod d65 {
    /// D65 white point in CIE XYZ color space
    pub const WHITE_POINT_XYZ: [f64; 3] = [0.95047, 1.00000, 1.08883];
}

/// Re-export D65 white point at top level for convenience
pub const D65_WHITE_POINT_XYZ: [f64; 3] = d65::WHITE_POINT_XYZ;

/// sRGB transfer function and CIE Lab companding constants
pub mod companding {
    /// Encoded sRGB value below which the linear segment applies
    pub const SRGB_DECODE_THRESHOLD: f64 = 0.04045;

    /// Linear sRGB value below which the linear segment applies
    pub const SRGB_ENCODE_THRESHOLD: f64 = 0.0031308;

    /// Slope of the linear segment of the sRGB curve
    pub const SRGB_LINEAR_SLOPE: f64 = 12.92;

    /// Exponent of the sRGB power segment
    pub const SRGB_GAMMA: f64 = 2.4;

    /// Offset of the sRGB power segment
    pub const SRGB_OFFSET: f64 = 0.055;

    /// Lab cube-root threshold (ε)
    pub const LAB_EPSILON: f64 = 0.008856;

    /// Slope of the Lab linear branch
    pub const LAB_LINEAR_SLOPE: f64 = 7.787;

    /// Offset of the Lab linear branch
    pub const LAB_OFFSET: f64 = 16.0 / 116.0;
}

/// Histogram construction: which pixels carry weight and how colors bucket
pub mod histogram {
    /// Pixels lighter than this L* are treated as near-white and skipped
    pub const MAX_LIGHTNESS: f64 = 95.0;

    /// Pixels darker than this L* are treated as near-black and skipped
    pub const MIN_LIGHTNESS: f64 = 5.0;

    /// Pixels with a*² + b² below this are treated as gray and skipped
    pub const MIN_CHROMA_SQUARED: f64 = 25.0;

    /// Buckets per normalized channel unit (two-decimal quantization)
    pub const CHANNEL_PRECISION: f64 = 100.0;
}

/// Box splitting defaults
pub mod quantize {
    /// Source pixels processed without downsampling (128 x 128)
    pub const DEFAULT_MAX_PIXEL_BUDGET: usize = 128 * 128;

    /// Maximum number of finalized boxes (and swatches)
    pub const DEFAULT_MAX_BOXES: usize = 32;

    /// Dispersion below which a box is finalized without splitting; 0 disables
    pub const DEFAULT_MIN_DISPERSION: f64 = 0.0;

    /// Early-stop threshold matching a dispersion of 10 on 0-255 channels
    /// (`10 / 255²`), for callers who want boxes that tight left unsplit
    pub const LEGACY_MIN_DISPERSION: f64 = 10.0 / (255.0 * 255.0);
}

/// Resampling constants
pub mod resample {
    /// Buckets per unit of squared normalized distance in the kernel cache
    pub const CACHE_PRECISION: usize = 1000;

    /// Filter size used for upscaling and mild downscaling
    pub const WIDE_FILTER_SIZE: usize = 3;

    /// Filter size once a ratio falls to [`MEDIUM_FILTER_RATIO`]
    pub const MEDIUM_FILTER_SIZE: usize = 2;

    /// Filter size once a ratio falls to [`NARROW_FILTER_RATIO`]
    pub const NARROW_FILTER_SIZE: usize = 1;

    pub const MEDIUM_FILTER_RATIO: f64 = 0.2;
    pub const NARROW_FILTER_RATIO: f64 = 0.05;
}

/// Statistical helpers
pub mod statistics {
    /// Maximum bisection refinements of the median finder
    pub const MEDIAN_RECURSION_LIMIT: usize = 50;

    /// Boxes smaller than this are sorted directly by the median finder
    pub const MEDIAN_SORT_THRESHOLD: usize = 10;
}
