use std::ops::Mul;

use serde::{Deserialize, Serialize};

use crate::{MathError, Vec3, float_equal};

/// Rotation quaternion with vector part `v` and scalar part `s`.
///
/// Unit length is not enforced on construction; [`Quat::rotate`] normalizes
/// before use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub v: Vec3,
    pub s: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Self = Self {
        v: Vec3::ZERO,
        s: 1.0,
    };

    pub const fn new(v: Vec3, s: f32) -> Self {
        Self { v, s }
    }

    /// Rotation of `angle` radians around `axis`.
    ///
    /// `axis` must already be unit length; a non-unit axis gives a non-unit
    /// quaternion.
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let (sin_half, cos_half) = (angle / 2.0).sin_cos();
        Self {
            v: Vec3::scale(sin_half, axis),
            s: cos_half,
        }
    }

    pub fn length_squared(self) -> f32 {
        self.v.length_squared() + self.s * self.s
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Rescales by the largest component before measuring, like [`Vec3::normalize`].
    pub fn normalize(self) -> Result<Self, MathError> {
        if !(self.s.is_finite() && self.v.is_finite()) {
            return Err(MathError::NonFinite);
        }
        let max = self.v.max_abs().max(self.s.abs());
        if max == 0.0 {
            return Err(MathError::ZeroLength);
        }
        let scaled = Self {
            v: Vec3::new(self.v.x / max, self.v.y / max, self.v.z / max),
            s: self.s / max,
        };
        let len = scaled.length();
        Ok(Self {
            v: Vec3::scale(1.0 / len, scaled.v),
            s: scaled.s / len,
        })
    }

    pub fn conjugate(self) -> Self {
        Self {
            v: -self.v,
            s: self.s,
        }
    }

    /// Rotates `v` by the sandwich product `q * (v, 0) * conj(q)` after
    /// normalizing `q`.
    pub fn rotate(self, v: Vec3) -> Result<Vec3, MathError> {
        let q = self.normalize()?;
        let p = q * (Self::new(v, 0.0) * q.conjugate());
        Ok(p.v)
    }

    pub fn approx_eq(self, rhs: Self) -> bool {
        self.v.approx_eq(rhs.v) && float_equal(self.s, rhs.s)
    }
}

/// Hamilton product. Not commutative.
impl Mul for Quat {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self {
            v: Vec3::scale(rhs.s, self.v) + Vec3::scale(self.s, rhs.v) + self.v.cross(rhs.v),
            s: self.s * rhs.s - self.v.dot(rhs.v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn zero_angle_rotation_is_identity() {
        let axes = [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(1.0, 1.0, 1.0).normalize().unwrap()];
        let vs = [Vec3::new(1.0, 2.0, 3.0), Vec3::new(-0.5, 0.0, 9.0)];
        for axis in axes {
            for v in vs {
                let r = Quat::from_axis_angle(axis, 0.0).rotate(v).unwrap();
                assert!(r.approx_eq(v), "{axis:?} {v:?} -> {r:?}");
            }
        }
    }

    #[test]
    fn quarter_turn_around_y() {
        let q = Quat::from_axis_angle(Vec3::Y, FRAC_PI_2);
        let r = q.rotate(Vec3::X).unwrap();
        assert!(r.approx_eq(-Vec3::Z), "{r:?}");
    }

    #[test]
    fn rotate_normalizes_the_quaternion() {
        let q = Quat::from_axis_angle(Vec3::Z, FRAC_PI_2);
        let scaled = Quat::new(Vec3::scale(3.0, q.v), 3.0 * q.s);
        let r = scaled.rotate(Vec3::X).unwrap();
        assert!(r.approx_eq(Vec3::Y), "{r:?}");
    }

    #[test]
    fn rotation_preserves_length() {
        let q = Quat::from_axis_angle(Vec3::new(0.0, 0.6, 0.8), 1.3);
        let v = Vec3::new(3.0, -4.0, 12.0);
        let r = q.rotate(v).unwrap();
        assert!((r.length() - v.length()).abs() < 1e-4);
    }

    #[test]
    fn multiplication_composes_rotations() {
        let a = Quat::from_axis_angle(Vec3::Z, PI / 4.0);
        let half = a * a;
        let full = Quat::from_axis_angle(Vec3::Z, FRAC_PI_2);
        assert!(half.approx_eq(full));
    }

    #[test]
    fn multiplication_is_not_commutative() {
        let a = Quat::from_axis_angle(Vec3::X, FRAC_PI_2);
        let b = Quat::from_axis_angle(Vec3::Y, FRAC_PI_2);
        assert!(!(a * b).approx_eq(b * a));
    }

    #[test]
    fn conjugate_inverts_unit_rotation() {
        let q = Quat::from_axis_angle(Vec3::new(0.0, 0.6, 0.8), 0.7);
        assert!((q * q.conjugate()).approx_eq(Quat::IDENTITY));
        assert!(float_equal(q.length(), 1.0));
    }

    #[test]
    fn non_unit_axis_gives_non_unit_quaternion() {
        let q = Quat::from_axis_angle(Vec3::new(0.0, 2.0, 0.0), 1.0);
        assert!(!float_equal(q.length(), 1.0));
    }

    #[test]
    fn zero_quaternion_cannot_rotate() {
        let q = Quat::new(Vec3::ZERO, 0.0);
        assert_eq!(q.rotate(Vec3::X), Err(MathError::ZeroLength));
        let q = Quat::new(Vec3::ZERO, f32::NAN);
        assert_eq!(q.rotate(Vec3::X), Err(MathError::NonFinite));
        let q = Quat::new(Vec3::new(f32::NAN, 0.0, 0.0), 1.0);
        assert_eq!(q.normalize(), Err(MathError::NonFinite));
    }

    #[test]
    fn tiny_and_huge_quaternions_normalize() {
        for q in [
            Quat::new(Vec3::new(0.0, 0.0, 1e-25), 1e-25),
            Quat::new(Vec3::new(1e20, 0.0, 0.0), 1e20),
        ] {
            let n = q.normalize().unwrap();
            assert!(float_equal(n.length(), 1.0), "{q:?} -> {n:?}");
        }
        let q = Quat::new(Vec3::new(0.0, 0.0, 1e-25), 1e-25);
        let r = q.rotate(Vec3::X).unwrap();
        assert!(r.approx_eq(Vec3::Y), "{r:?}");
    }
}
