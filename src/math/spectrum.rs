use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub};

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

/// Linear RGB radiance value.
///
/// A correct estimator never produces NaN/Inf components; that is checked in
/// debug builds, not enforced.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Spectrum {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Spectrum {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn zeros() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn ones() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    pub fn is_black(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    pub fn max_component(&self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    pub fn has_nans(&self) -> bool {
        self.r.is_nan() || self.g.is_nan() || self.b.is_nan()
    }

    /// `true` if all components are finite and non-negative.
    pub fn is_valid(&self) -> bool {
        self.r.is_finite()
            && self.g.is_finite()
            && self.b.is_finite()
            && self.r >= 0.0
            && self.g >= 0.0
            && self.b >= 0.0
    }

    pub fn sqrt(self) -> Self {
        Self::new(self.r.sqrt(), self.g.sqrt(), self.b.sqrt())
    }

    pub fn lerp(self, other: Self, t: f32) -> Self {
        self * (1.0 - t) + other * t
    }

    /// Gamma-encodes the linear value for 8bit display surfaces.
    pub fn to_srgb(self) -> [u8; 3] {
        fn encode(v: f32) -> u8 {
            let v = v.clamp(0.0, 1.0);
            let v = if v <= 0.0031308 {
                12.92 * v
            } else {
                1.055 * v.powf(1.0 / 2.4) - 0.055
            };
            (v * 255.0 + 0.5) as u8
        }
        [encode(self.r), encode(self.g), encode(self.b)]
    }
}

impl From<f32> for Spectrum {
    fn from(v: f32) -> Self {
        Self::new(v, v, v)
    }
}

impl Add for Spectrum {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}

impl AddAssign for Spectrum {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Spectrum {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.r - other.r, self.g - other.g, self.b - other.b)
    }
}

impl Mul for Spectrum {
    type Output = Self;
    fn mul(self, other: Self) -> Self {
        Self::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }
}

impl Mul<f32> for Spectrum {
    type Output = Self;
    fn mul(self, s: f32) -> Self {
        Self::new(self.r * s, self.g * s, self.b * s)
    }
}

impl MulAssign for Spectrum {
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}

impl MulAssign<f32> for Spectrum {
    fn mul_assign(&mut self, s: f32) {
        *self = *self * s;
    }
}

impl Div for Spectrum {
    type Output = Self;
    fn div(self, other: Self) -> Self {
        Self::new(self.r / other.r, self.g / other.g, self.b / other.b)
    }
}

impl Div<f32> for Spectrum {
    type Output = Self;
    fn div(self, s: f32) -> Self {
        Self::new(self.r / s, self.g / s, self.b / s)
    }
}

impl DivAssign<f32> for Spectrum {
    fn div_assign(&mut self, s: f32) {
        *self = *self / s;
    }
}

impl AbsDiffEq for Spectrum {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        f32::abs_diff_eq(&self.r, &other.r, epsilon)
            && f32::abs_diff_eq(&self.g, &other.g, epsilon)
            && f32::abs_diff_eq(&self.b, &other.b, epsilon)
    }
}

impl RelativeEq for Spectrum {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        f32::relative_eq(&self.r, &other.r, epsilon, max_relative)
            && f32::relative_eq(&self.g, &other.g, epsilon, max_relative)
            && f32::relative_eq(&self.b, &other.b, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn arithmetic() {
        let a = Spectrum::new(0.5, 1.0, 2.0);
        let b = Spectrum::new(2.0, 0.5, 0.25);
        assert_abs_diff_eq!(a * b, Spectrum::new(1.0, 0.5, 0.5));
        assert_abs_diff_eq!(a + b, Spectrum::new(2.5, 1.5, 2.25));
        assert_abs_diff_eq!(a / 2.0, Spectrum::new(0.25, 0.5, 1.0));
    }

    #[test]
    fn validity() {
        assert!(Spectrum::zeros().is_black());
        assert!(Spectrum::ones().is_valid());
        assert!(!Spectrum::new(f32::NAN, 0.0, 0.0).is_valid());
        assert!(Spectrum::new(f32::NAN, 0.0, 0.0).has_nans());
        assert!(!Spectrum::new(-1.0, 0.0, 0.0).is_valid());
        assert!(!Spectrum::new(f32::INFINITY, 0.0, 0.0).is_valid());
    }

    #[test]
    fn max_component() {
        assert_eq!(Spectrum::new(0.1, 0.7, 0.3).max_component(), 0.7);
    }
}
