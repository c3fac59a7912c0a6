//! Math core: vectors, quaternions, 4x4 matrices and the camera model built on them.
//!
//! # Invariants
//! - Every operation is pure, allocation-free and terminates in bounded time.
//! - Degenerate inputs (zero-length normalization, a view direction parallel
//!   to world-up, singular matrices, degenerate projections) are reported as
//!   [`MathError`], never as NaN geometry.
//! - Matrices produced by the view constructors satisfy `inverse * m ≈ I`
//!   within [`EPSILON`].

pub mod camera;
pub mod config;
pub mod error;
pub mod fly;
pub mod mat;
pub mod quat;
pub mod vec;

pub use camera::{Basis, Camera};
pub use config::CameraConfig;
pub use error::MathError;
pub use fly::{FlyCamera, FrameInput, FrameOutput, MoveKeys};
pub use mat::Mat4;
pub use quat::Quat;
pub use vec::{Vec3, Vec4};

/// Tolerance used by every approximate comparison in the crate.
pub const EPSILON: f32 = 1e-5;

/// Returns true when `a` and `b` differ by at most [`EPSILON`].
///
/// This is a tolerance check for assertions, not an equivalence relation: it
/// is not transitive near the boundary (`float_equal(a, b)` and
/// `float_equal(b, c)` do not imply `float_equal(a, c)`).
#[inline]
pub fn float_equal(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON
}

pub fn crate_info() -> &'static str {
    "floating-core v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("core"));
    }

    #[test]
    fn float_equal_within_epsilon() {
        assert!(float_equal(1.0, 1.0 + 0.5 * EPSILON));
        assert!(!float_equal(1.0, 1.0 + 4.0 * EPSILON));
    }

    #[test]
    fn float_equal_is_not_transitive() {
        let a = 0.0;
        let b = 0.8 * EPSILON;
        let c = 1.6 * EPSILON;
        assert!(float_equal(a, b));
        assert!(float_equal(b, c));
        assert!(!float_equal(a, c));
    }
}
