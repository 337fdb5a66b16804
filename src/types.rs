//! Strongly-typed numeric primitives for latplot (zero-cost newtypes).
//!
//! User-provided numbers enter the renderer through `try_new`-style
//! constructors; everything downstream can rely on the invariants.

use std::fmt;
use std::ops::Mul;

use glam::{DVec2, dvec2};

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
    /// Value is above the allowed maximum
    TooLarge { max: f64 },
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
            NumericError::TooLarge { max } => write!(f, "value exceeds {}", max),
        }
    }
}

impl std::error::Error for NumericError {}

fn check_finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

/// A strictly positive distance in data coordinates.
///
/// Used for the reference length that all relative symbol and line sizes
/// are multiplied by.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Length(f64);

impl Length {
    /// Fallback when every site sits on the same spot.
    pub const UNIT: Length = Length(1.0);

    /// Create a Length with validation (rejects NaN, infinite, zero, negative)
    pub fn try_positive(val: f64) -> Result<Length, NumericError> {
        let val = check_finite(val)?;
        if val == 0.0 {
            Err(NumericError::Zero)
        } else if val < 0.0 {
            Err(NumericError::Negative)
        } else {
            Ok(Length(val))
        }
    }

    /// Get the raw value
    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Mul<f64> for Length {
    type Output = f64;
    fn mul(self, rhs: f64) -> f64 {
        self.0 * rhs
    }
}

/// Blend ratio toward a target color, in `[0, 1]`.
///
/// `0` leaves the original color untouched, `1` replaces it entirely.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Ratio(f64);

impl Ratio {
    pub const ZERO: Ratio = Ratio(0.0);
    pub const ONE: Ratio = Ratio(1.0);

    /// Create a Ratio with validation
    pub fn try_new(val: f64) -> Result<Ratio, NumericError> {
        let val = check_finite(val)?;
        if val < 0.0 {
            Err(NumericError::Negative)
        } else if val > 1.0 {
            Err(NumericError::TooLarge { max: 1.0 })
        } else {
            Ok(Ratio(val))
        }
    }

    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    /// Linear interpolation `from + ratio * (to - from)`
    #[inline]
    pub fn lerp(self, from: f64, to: f64) -> f64 {
        from + self.0 * (to - from)
    }
}

/// Blank border around the drawing, as a fraction of the canvas, in `[0, 0.5)`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Border(f64);

impl Border {
    pub fn try_new(val: f64) -> Result<Border, NumericError> {
        let val = check_finite(val)?;
        if val < 0.0 {
            Err(NumericError::Negative)
        } else if val >= 0.5 {
            Err(NumericError::TooLarge { max: 0.5 })
        } else {
            Ok(Border(val))
        }
    }

    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    /// The share of the canvas left for the drawing itself, `1 - 2 * border`.
    /// Always strictly positive.
    #[inline]
    pub fn inner(self) -> f64 {
        1.0 - 2.0 * self.0
    }
}

impl Default for Border {
    fn default() -> Self {
        Border(0.1)
    }
}

/// Axis-aligned bounding box in data coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds {
    /// Create an empty bounding box (will expand on first point)
    pub fn new() -> Self {
        Bounds {
            min: dvec2(f64::MAX, f64::MAX),
            max: dvec2(f64::MIN, f64::MIN),
        }
    }

    /// Check if the box is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Expand to include a point
    pub fn expand_point(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Extent along both axes
    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) / 2.0
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

/// Canvas size in output units (points for vector formats, pixels for raster).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        CanvasSize { width, height }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Pixel dimensions, rounded to the nearest integer like raster output expects.
    pub fn pixels(&self) -> (u32, u32) {
        (self.width.round() as u32, self.height.round() as u32)
    }
}

/// Format a number with 6 significant figures, trailing zeros trimmed.
///
/// Shared by the text-based surfaces so their output is stable across runs.
pub(crate) fn fmt_num(value: f64) -> String {
    fmt_num_precision(value, 6)
}

fn fmt_num_precision(value: f64, sig_figs: i32) -> String {
    // Snap float noise like 1e-14 from the transform to an exact zero
    if value.abs() < 1e-9 {
        return "0".to_string();
    }

    // Round to specified significant figures
    let abs_val = value.abs();
    let magnitude = abs_val.log10().floor() as i32;
    let scale = 10_f64.powi(sig_figs - 1 - magnitude);
    let rounded = (value * scale).round() / scale;

    // Format with enough decimal places, then trim
    let decimals = (sig_figs - 1 - magnitude).max(0) as usize;
    let s = format!("{:.prec$}", rounded, prec = decimals);
    if s.contains('.') {
        let s = s.trim_end_matches('0');
        s.trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Length tests ====================

    #[test]
    fn length_try_positive_valid() {
        assert_eq!(Length::try_positive(0.5).map(Length::raw), Ok(0.5));
    }

    #[test]
    fn length_try_positive_rejects_zero_and_negative() {
        assert_eq!(Length::try_positive(0.0), Err(NumericError::Zero));
        assert_eq!(Length::try_positive(-1.0), Err(NumericError::Negative));
    }

    #[test]
    fn length_try_positive_rejects_nan_and_infinity() {
        assert_eq!(Length::try_positive(f64::NAN), Err(NumericError::NaN));
        assert_eq!(Length::try_positive(f64::INFINITY), Err(NumericError::Infinite));
    }

    // ==================== Ratio tests ====================

    #[test]
    fn ratio_bounds() {
        assert!(Ratio::try_new(0.0).is_ok());
        assert!(Ratio::try_new(1.0).is_ok());
        assert_eq!(Ratio::try_new(-0.1), Err(NumericError::Negative));
        assert_eq!(Ratio::try_new(1.5), Err(NumericError::TooLarge { max: 1.0 }));
    }

    #[test]
    fn ratio_lerp() {
        let r = Ratio::try_new(0.25).unwrap();
        assert_eq!(r.lerp(0.0, 1.0), 0.25);
        assert_eq!(r.lerp(1.0, 1.0), 1.0);
        assert_eq!(Ratio::ZERO.lerp(0.3, 0.9), 0.3);
    }

    // ==================== Border tests ====================

    #[test]
    fn border_half_is_rejected() {
        assert_eq!(Border::try_new(0.5), Err(NumericError::TooLarge { max: 0.5 }));
        assert!(Border::try_new(0.49).is_ok());
        assert!(Border::try_new(0.0).is_ok());
    }

    #[test]
    fn border_inner_share() {
        assert_eq!(Border::default().inner(), 0.8);
        assert_eq!(Border::try_new(0.0).unwrap().inner(), 1.0);
    }

    // ==================== Bounds tests ====================

    #[test]
    fn bounds_new_is_empty() {
        assert!(Bounds::new().is_empty());
    }

    #[test]
    fn bounds_expand_point() {
        let mut bb = Bounds::new();
        bb.expand_point(dvec2(1.0, 2.0));
        bb.expand_point(dvec2(3.0, -4.0));

        assert!(!bb.is_empty());
        assert_eq!(bb.min, dvec2(1.0, -4.0));
        assert_eq!(bb.max, dvec2(3.0, 2.0));
        assert_eq!(bb.width(), 2.0);
        assert_eq!(bb.height(), 6.0);
        assert_eq!(bb.center(), dvec2(2.0, -1.0));
    }

    #[test]
    fn bounds_single_point_has_zero_size() {
        let mut bb = Bounds::new();
        bb.expand_point(dvec2(5.0, 5.0));
        assert!(!bb.is_empty());
        assert_eq!(bb.size(), DVec2::ZERO);
    }

    // ==================== Formatting tests ====================

    #[test]
    fn fmt_num_trims_trailing_zeros() {
        assert_eq!(fmt_num(60.0), "60");
        assert_eq!(fmt_num(540.0), "540");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(-12.25), "-12.25");
    }

    #[test]
    fn fmt_num_snaps_noise_to_zero() {
        assert_eq!(fmt_num(1e-14), "0");
        assert_eq!(fmt_num(-0.0), "0");
    }

    #[test]
    fn fmt_num_rounds_to_six_figures() {
        assert_eq!(fmt_num(1.0 / 3.0), "0.333333");
        assert_eq!(fmt_num(60.00000000000001), "60");
    }

    #[test]
    fn canvas_pixels_round() {
        assert_eq!(CanvasSize::new(599.6, 300.4).pixels(), (600, 300));
    }
}
