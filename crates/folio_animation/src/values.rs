//! Animatable value types
//!
//! Provides the interpolation trait, the 2D [`Offset`] the trail animates, and
//! range mapping helpers for values derived from input.

use std::ops::RangeInclusive;

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal (for settling detection)
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

// ============================================================================
// f32 Implementation
// ============================================================================

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

// ============================================================================
// Offset
// ============================================================================

/// A 2D translation in CSS pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// CSS transform for this offset
    pub fn translate3d(&self) -> String {
        format!("translate3d({}px, {}px, 0)", self.x, self.y)
    }
}

impl Interpolate for Offset {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Offset::new(self.x.lerp(&other.x, t), self.y.lerp(&other.y, t))
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.x.approx_eq(&other.x, epsilon) && self.y.approx_eq(&other.y, epsilon)
    }
}

// ============================================================================
// Range Mapping
// ============================================================================

/// Map `value` from the input range onto the output range, clamping at both ends
///
/// A degenerate (zero-width) input range maps everything to the output start.
///
/// ```rust
/// use folio_animation::values::clamp_map;
///
/// assert_eq!(clamp_map(400.0, 0.0..=800.0, 20.0..=165.0), 92.5);
/// assert_eq!(clamp_map(-10.0, 0.0..=800.0, 20.0..=165.0), 20.0);
/// ```
pub fn clamp_map(value: f32, input: RangeInclusive<f32>, output: RangeInclusive<f32>) -> f32 {
    let (in_start, in_end) = (*input.start(), *input.end());
    let (out_start, out_end) = (*output.start(), *output.end());

    let span = in_end - in_start;
    if span.abs() < f32::EPSILON || !value.is_finite() {
        return out_start;
    }

    let t = ((value - in_start) / span).clamp(0.0, 1.0);
    out_start.lerp(&out_end, t)
}
