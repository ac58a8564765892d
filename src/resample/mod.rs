//! Image downsampling module
//!
//! Bounds the quantizer's working set by resizing oversized inputs with a
//! windowed Lanczos (or linear) kernel before the histogram is built.

pub mod kernel;
pub mod resize;

pub use kernel::{filter_size, KernelCache, KernelType};
pub use resize::{resample, Resampler};
