//! Color space conversion utilities
//!
//! Provides the conversions the quantizer and its callers need:
//! - sRGB (normalized or 8-bit) to CIE Lab under D65
//! - Lab back to sRGB with gamut clamping
//! - RGB to HSL and back, with hue normalized to `[0, 1)`
//! - Chroma-weighted ΔE76 color difference
//! - Display and hex string formatting
//!
//! Lab uses the four-digit sRGB→XYZ matrix; the reverse direction uses its
//! exact inverse so that round trips are lossless up to float precision.

use palette::white_point::D65;
use palette::{Lab, Srgb};
use serde::{Deserialize, Serialize};

use crate::constants::companding::{
    LAB_EPSILON, LAB_LINEAR_SLOPE, LAB_OFFSET, SRGB_DECODE_THRESHOLD, SRGB_ENCODE_THRESHOLD,
    SRGB_GAMMA, SRGB_LINEAR_SLOPE, SRGB_OFFSET,
};
use crate::constants::D65_WHITE_POINT_XYZ;

/// Linear sRGB to XYZ (D65)
const RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124, 0.3576, 0.1805],
    [0.2126, 0.7152, 0.0722],
    [0.0193, 0.1192, 0.9505],
];

/// Inverse of [`RGB_TO_XYZ`]
const XYZ_TO_RGB: [[f64; 3]; 3] = [
    [3.240625477320053, -1.537207972210319, -0.498628598698248],
    [-0.968930714729319, 1.875756060885241, 0.041517523842954],
    [0.055710120445511, -0.204021050598487, 1.056995942254388],
];

/// HSL color with every component in `[0, 1]`
///
/// Hue is a fraction of a full turn rather than degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Hsl {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self { hue, saturation, lightness }
    }
}

fn decode_channel(c: f64) -> f64 {
    if c > SRGB_DECODE_THRESHOLD {
        ((c + SRGB_OFFSET) / (1.0 + SRGB_OFFSET)).powf(SRGB_GAMMA)
    } else {
        c / SRGB_LINEAR_SLOPE
    }
}

fn encode_channel(c: f64) -> f64 {
    if c > SRGB_ENCODE_THRESHOLD {
        (1.0 + SRGB_OFFSET) * c.powf(1.0 / SRGB_GAMMA) - SRGB_OFFSET
    } else {
        SRGB_LINEAR_SLOPE * c
    }
}

fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        LAB_LINEAR_SLOPE * t + LAB_OFFSET
    }
}

fn lab_f_inverse(f: f64) -> f64 {
    let cube = f * f * f;
    if cube > LAB_EPSILON {
        cube
    } else {
        (f - LAB_OFFSET) / LAB_LINEAR_SLOPE
    }
}

fn mul(matrix: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (row, o) in matrix.iter().zip(out.iter_mut()) {
        *o = row[0] * v[0] + row[1] * v[1] + row[2] * v[2];
    }
    out
}

/// Convert normalized sRGB (`[0, 1]` per channel) to CIE Lab under D65
pub fn srgb_to_lab(rgb: Srgb<f64>) -> Lab<D65, f64> {
    let linear = [
        decode_channel(rgb.red),
        decode_channel(rgb.green),
        decode_channel(rgb.blue),
    ];
    let xyz = mul(&RGB_TO_XYZ, linear);

    let fx = lab_f(xyz[0] / D65_WHITE_POINT_XYZ[0]);
    let fy = lab_f(xyz[1] / D65_WHITE_POINT_XYZ[1]);
    let fz = lab_f(xyz[2] / D65_WHITE_POINT_XYZ[2]);

    Lab::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

/// Convert 8-bit sRGB to CIE Lab under D65
pub fn rgb8_to_lab(r: u8, g: u8, b: u8) -> Lab<D65, f64> {
    srgb_to_lab(Srgb::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0))
}

/// Convert CIE Lab back to normalized sRGB
///
/// Out-of-gamut colors are clamped to `[0, 1]` before gamma encoding.
pub fn lab_to_srgb(lab: Lab<D65, f64>) -> Srgb<f64> {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = lab.a / 500.0 + fy;
    let fz = fy - lab.b / 200.0;

    let xyz = [
        D65_WHITE_POINT_XYZ[0] * lab_f_inverse(fx),
        D65_WHITE_POINT_XYZ[1] * lab_f_inverse(fy),
        D65_WHITE_POINT_XYZ[2] * lab_f_inverse(fz),
    ];
    let linear = mul(&XYZ_TO_RGB, xyz);

    Srgb::new(
        encode_channel(linear[0].clamp(0.0, 1.0)),
        encode_channel(linear[1].clamp(0.0, 1.0)),
        encode_channel(linear[2].clamp(0.0, 1.0)),
    )
}

/// Convert normalized RGB to HSL
///
/// Achromatic colors get `hue = saturation = 0`.
pub fn rgb_to_hsl(rgb: Srgb<f64>) -> Hsl {
    let (r, g, b) = (rgb.red, rgb.green, rgb.blue);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let lightness = (max + min) / 2.0;

    if max == min {
        return Hsl::new(0.0, 0.0, lightness);
    }

    let d = max - min;
    let saturation = if lightness > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let hue = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl::new(hue / 6.0, saturation, lightness)
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Convert HSL back to normalized RGB
pub fn hsl_to_rgb(hsl: Hsl) -> Srgb<f64> {
    let Hsl { hue, saturation, lightness } = hsl;

    if saturation == 0.0 {
        return Srgb::new(lightness, lightness, lightness);
    }

    let q = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;

    Srgb::new(
        hue_to_channel(p, q, hue + 1.0 / 3.0),
        hue_to_channel(p, q, hue),
        hue_to_channel(p, q, hue - 1.0 / 3.0),
    )
}

/// Chroma (colorfulness) of a Lab color: `√(a² + b²)`
pub fn chroma(lab: Lab<D65, f64>) -> f64 {
    (lab.a * lab.a + lab.b * lab.b).sqrt()
}

/// Compute ΔE76 with a chroma-dependent hue weighting
///
/// The chroma and hue differences are scaled by `1 + 0.045·c1` and
/// `1 + 0.015·c1`, where `c1` is the chroma of the first color, so the
/// metric is not symmetric for colors of different chroma.
pub fn delta_e(lab_a: Lab<D65, f64>, lab_b: Lab<D65, f64>) -> f64 {
    let delta_l = lab_a.l - lab_b.l;
    let delta_a = lab_a.a - lab_b.a;
    let delta_b = lab_a.b - lab_b.b;

    let c1 = chroma(lab_a);
    let c2 = chroma(lab_b);
    let delta_c = c1 - c2;
    let delta_h = (delta_a * delta_a + delta_b * delta_b - delta_c * delta_c)
        .max(0.0)
        .sqrt();

    let sc = 1.0 + 0.045 * c1;
    let sh = 1.0 + 0.015 * c1;

    let radicand = delta_l * delta_l + (delta_c / sc).powi(2) + (delta_h / sh).powi(2);
    radicand.max(0.0).sqrt()
}

fn to_byte(c: f64) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Format a normalized color as `rgb(r, g, b)` with 0-255 channels
pub fn to_display_string(rgb: Srgb<f64>) -> String {
    format!(
        "rgb({}, {}, {})",
        to_byte(rgb.red),
        to_byte(rgb.green),
        to_byte(rgb.blue)
    )
}

/// Convert a normalized color to a hexadecimal string (e.g., "#FF0000")
pub fn to_hex(rgb: Srgb<f64>) -> String {
    format!(
        "#{:02X}{:02X}{:02X}",
        to_byte(rgb.red),
        to_byte(rgb.green),
        to_byte(rgb.blue)
    )
}
