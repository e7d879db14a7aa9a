//! 16.16 fixed-point scalar and vector types.
//!
//! | Type          | Layout                                   |
//! |---------------|------------------------------------------|
//! | `Fix16`       | signed, 16 integer bits, 16 fraction bits |
//! | `FixVec3`     | three `Fix16` components                  |
//! | `ScreenPoint` | two `i16`, origin at screen centre, +Y down |
//!
//! Pipeline arithmetic uses the saturating operators: results outside
//! `Fix16::MIN..=Fix16::MAX` clamp to the nearest bound. Conversions to
//! screen space saturate into `i16`.

/// Signed 16.16 fixed-point scalar.
pub type Fix16 = fixed::types::I16F16;

/// Build a `Fix16` from an integer at compile time.
pub const fn fix16(value: i16) -> Fix16 {
    Fix16::from_bits((value as i32) << 16)
}

/// Multiply two fixed-point values and keep only the integer part.
///
/// The product is floored (arithmetic shift), so `-0.5 * 1` yields `-1`.
/// The full 64-bit product always fits after the shift.
pub fn fix16_int32_mul(a: Fix16, b: Fix16) -> i32 {
    ((a.to_bits() as i64 * b.to_bits() as i64) >> 32) as i32
}

/// Convert a float, saturating at the `Fix16` bounds. NaN maps to zero.
pub fn fix16_from_f32(value: f32) -> Fix16 {
    if value.is_nan() {
        Fix16::ZERO
    } else {
        Fix16::saturating_from_num(value)
    }
}

/// Clamp an `i32` into the `i16` range.
pub fn saturate_i16(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

/// Three-component fixed-point vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixVec3 {
    pub x: Fix16,
    pub y: Fix16,
    pub z: Fix16,
}

impl FixVec3 {
    pub const ZERO: Self = Self::new(Fix16::ZERO, Fix16::ZERO, Fix16::ZERO);

    pub const fn new(x: Fix16, y: Fix16, z: Fix16) -> Self {
        Self { x, y, z }
    }

    /// Build a vector from whole-number components.
    pub const fn from_int(x: i16, y: i16, z: i16) -> Self {
        Self::new(fix16(x), fix16(y), fix16(z))
    }

    /// Convert from floats, saturating out-of-range components.
    pub fn from_f32(x: f32, y: f32, z: f32) -> Self {
        Self::new(fix16_from_f32(x), fix16_from_f32(y), fix16_from_f32(z))
    }

    pub fn dot(&self, other: &Self) -> Fix16 {
        self.x
            .saturating_mul(other.x)
            .saturating_add(self.y.saturating_mul(other.y))
            .saturating_add(self.z.saturating_mul(other.z))
    }
}

/// Projected vertex in pixels relative to the screen centre.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenPoint {
    pub x: i16,
    pub y: i16,
}

impl ScreenPoint {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Edge vector `self - origin` widened to `i32`.
    pub fn delta(self, origin: ScreenPoint) -> (i32, i32) {
        (
            self.x as i32 - origin.x as i32,
            self.y as i32 - origin.y as i32,
        )
    }
}

/// Angle in degrees, stored as `Fix16`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Angle(Fix16);

impl Angle {
    pub const fn from_degrees(degrees: i16) -> Self {
        Self(fix16(degrees))
    }

    pub fn from_degrees_f32(degrees: f32) -> Self {
        Self(fix16_from_f32(degrees))
    }

    pub const fn degrees(self) -> Fix16 {
        self.0
    }

    pub fn half(self) -> Self {
        Self(self.0 >> 1u32)
    }

    pub fn radians(self) -> f32 {
        self.0.to_num::<f32>() * (core::f32::consts::PI / 180.0)
    }

    pub fn sin(self) -> Fix16 {
        fix16_from_f32(libm::sinf(self.radians()))
    }

    pub fn cos(self) -> Fix16 {
        fix16_from_f32(libm::cosf(self.radians()))
    }

    /// Tangent, saturated near the poles.
    pub fn tan(self) -> Fix16 {
        fix16_from_f32(libm::tanf(self.radians()))
    }
}
