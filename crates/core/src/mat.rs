use std::f32::consts::PI;
use std::fmt;
use std::ops::Mul;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::camera::{Basis, Camera};
use crate::{MathError, Vec3, Vec4, float_equal};

/// 4x4 matrix with named fields `m<row><col>`, stored row by row.
///
/// Transforms act on column vectors: `m * v`. The GPU expects column-major
/// data, so upload either `to_cols_array_2d()` or the bytes of `transpose()`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Mat4 {
    pub m00: f32,
    pub m01: f32,
    pub m02: f32,
    pub m03: f32,
    pub m10: f32,
    pub m11: f32,
    pub m12: f32,
    pub m13: f32,
    pub m20: f32,
    pub m21: f32,
    pub m22: f32,
    pub m23: f32,
    pub m30: f32,
    pub m31: f32,
    pub m32: f32,
    pub m33: f32,
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    #[rustfmt::skip]
    pub const IDENTITY: Self = Self::from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    pub const fn from_rows(r: [[f32; 4]; 4]) -> Self {
        Self {
            m00: r[0][0],
            m01: r[0][1],
            m02: r[0][2],
            m03: r[0][3],
            m10: r[1][0],
            m11: r[1][1],
            m12: r[1][2],
            m13: r[1][3],
            m20: r[2][0],
            m21: r[2][1],
            m22: r[2][2],
            m23: r[2][3],
            m30: r[3][0],
            m31: r[3][1],
            m32: r[3][2],
            m33: r[3][3],
        }
    }

    pub const fn to_rows_array_2d(&self) -> [[f32; 4]; 4] {
        [
            [self.m00, self.m01, self.m02, self.m03],
            [self.m10, self.m11, self.m12, self.m13],
            [self.m20, self.m21, self.m22, self.m23],
            [self.m30, self.m31, self.m32, self.m33],
        ]
    }

    /// Column-major layout, as consumed by WGSL/GLSL `mat4` uniforms.
    pub const fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        self.transpose().to_rows_array_2d()
    }

    pub const fn transpose(&self) -> Self {
        Self {
            m00: self.m00,
            m01: self.m10,
            m02: self.m20,
            m03: self.m30,
            m10: self.m01,
            m11: self.m11,
            m12: self.m21,
            m13: self.m31,
            m20: self.m02,
            m21: self.m12,
            m22: self.m22,
            m23: self.m32,
            m30: self.m03,
            m31: self.m13,
            m32: self.m23,
            m33: self.m33,
        }
    }

    pub fn mul_vec4(&self, v: Vec4) -> Vec4 {
        Vec4 {
            x: v.x * self.m00 + v.y * self.m01 + v.z * self.m02 + v.w * self.m03,
            y: v.x * self.m10 + v.y * self.m11 + v.z * self.m12 + v.w * self.m13,
            z: v.x * self.m20 + v.y * self.m21 + v.z * self.m22 + v.w * self.m23,
            w: v.x * self.m30 + v.y * self.m31 + v.z * self.m32 + v.w * self.m33,
        }
    }

    /// Componentwise [`float_equal`].
    pub fn approx_eq(&self, rhs: &Self) -> bool {
        self.to_rows_array_2d()
            .iter()
            .flatten()
            .zip(rhs.to_rows_array_2d().iter().flatten())
            .all(|(a, b)| float_equal(*a, *b))
    }

    /// Largest absolute componentwise difference between two matrices.
    pub fn max_abs_diff(&self, rhs: &Self) -> f32 {
        self.to_rows_array_2d()
            .iter()
            .flatten()
            .zip(rhs.to_rows_array_2d().iter().flatten())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }

    /// Signed 3x3 minors laid out in the checkerboard pattern
    /// `+ - + - / - + - + / ...`.
    pub fn cofactors(&self) -> Self {
        let rows = self.to_rows_array_2d();
        let mut out = [[0.0; 4]; 4];
        for (r, out_row) in out.iter_mut().enumerate() {
            for (c, cell) in out_row.iter_mut().enumerate() {
                let sign = if (r + c) % 2 == 0 { 1.0 } else { -1.0 };
                *cell = sign * minor(&rows, r, c);
            }
        }
        Self::from_rows(out)
    }

    /// Determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> f32 {
        determinant_from(self, &self.cofactors())
    }

    /// General inverse via the adjugate: `transpose(cofactors) / det`.
    ///
    /// Fails with [`MathError::SingularMatrix`] when the determinant is within
    /// [`crate::EPSILON`] of zero.
    pub fn inverse(&self) -> Result<Self, MathError> {
        let cofactors = self.cofactors();
        let determinant = determinant_from(self, &cofactors);
        if float_equal(determinant, 0.0) {
            return Err(MathError::SingularMatrix { determinant });
        }

        let scale = 1.0 / determinant;
        let adjugate = cofactors.transpose().to_rows_array_2d();
        Ok(Self::from_rows(adjugate.map(|row| row.map(|c| scale * c))))
    }

    /// Translation by `-translation`: maps the point at `translation` to the origin.
    #[rustfmt::skip]
    pub const fn model(translation: Vec3) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, -translation.x],
            [0.0, 1.0, 0.0, -translation.y],
            [0.0, 0.0, 1.0, -translation.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// World-to-view matrix: the inverse of the camera-to-world matrix whose
    /// columns are `i`, `j`, `k` and `pos`.
    ///
    /// The inverse is re-multiplied with the original and must reproduce the
    /// identity, otherwise [`MathError::InverseMismatch`] is returned.
    #[rustfmt::skip]
    pub fn view_from_camera(camera: &Camera) -> Result<Self, MathError> {
        let Camera { pos, i, j, k } = *camera;
        let view_to_world = Self::from_rows([
            [i.x, j.x, k.x, pos.x],
            [i.y, j.y, k.y, pos.y],
            [i.z, j.z, k.z, pos.z],
            [0.0, 0.0, 0.0, 1.0],
        ]);

        let world_to_view = view_to_world.inverse()?;
        if !(world_to_view * view_to_world).approx_eq(&Self::IDENTITY) {
            tracing::error!(?camera, "view matrix inverse check failed");
            return Err(MathError::InverseMismatch);
        }
        Ok(world_to_view)
    }

    /// World-to-view matrix for a camera at `pos` looking along `dir`.
    pub fn view(pos: Vec3, dir: Vec3) -> Result<Self, MathError> {
        let Basis { i, j, k } = Basis::from_direction(dir)?;
        Self::view_from_camera(&Camera { pos, i, j, k })
    }

    /// Symmetric OpenGL-style perspective projection.
    ///
    /// `fov_degrees` is the full angle between the left and right clip
    /// planes; the vertical extent follows from `aspect` (width / height).
    /// View-space depth `-near` maps to NDC `z = -1` and `-far` to `z = 1`.
    #[rustfmt::skip]
    pub fn projection(near: f32, far: f32, aspect: f32, fov_degrees: f32) -> Result<Self, MathError> {
        validate_projection(near, far, aspect, fov_degrees)?;

        // tan(angle) = near / right, angle measured from the near plane.
        let angle = PI * (1.0 - fov_degrees / 180.0) / 2.0;
        let right = near / angle.tan();
        let top = right / aspect;
        let depth = far - near;

        Ok(Self::from_rows([
            [near / right, 0.0,        0.0,                  0.0],
            [0.0,          near / top, 0.0,                  0.0],
            [0.0,          0.0,        -(far + near) / depth, -2.0 * far * near / depth],
            [0.0,          0.0,        -1.0,                 0.0],
        ]))
    }
}

fn determinant_from(m: &Mat4, cofactors: &Mat4) -> f32 {
    m.m00 * cofactors.m00 + m.m01 * cofactors.m01 + m.m02 * cofactors.m02 + m.m03 * cofactors.m03
}

/// Determinant of the 3x3 matrix left after removing `skip_row` and `skip_col`.
fn minor(rows: &[[f32; 4]; 4], skip_row: usize, skip_col: usize) -> f32 {
    let mut m = [[0.0; 3]; 3];
    for (dst, src) in (0..4).filter(|&r| r != skip_row).enumerate() {
        for (dst_col, src_col) in (0..4).filter(|&c| c != skip_col).enumerate() {
            m[dst][dst_col] = rows[src][src_col];
        }
    }
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

fn validate_projection(near: f32, far: f32, aspect: f32, fov_degrees: f32) -> Result<(), MathError> {
    let reason = if ![near, far, aspect, fov_degrees].iter().all(|v| v.is_finite()) {
        "all parameters must be finite"
    } else if fov_degrees <= 0.0 || fov_degrees >= 180.0 {
        "fov must lie strictly between 0 and 180 degrees"
    } else if aspect <= 0.0 {
        "aspect must be positive"
    } else if near <= 0.0 {
        "near must be positive"
    } else if far <= near {
        "far must be greater than near"
    } else {
        return Ok(());
    };
    Err(MathError::InvalidProjection {
        reason: reason.to_string(),
    })
}

impl Mul for Mat4 {
    type Output = Self;

    /// Row-by-column product. Not commutative.
    fn mul(self, rhs: Self) -> Self {
        let a = self.to_rows_array_2d();
        let b = rhs.to_rows_array_2d();
        let mut out = [[0.0; 4]; 4];
        for (r, out_row) in out.iter_mut().enumerate() {
            for (c, cell) in out_row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| a[r][k] * b[k][c]).sum();
            }
        }
        Self::from_rows(out)
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    fn mul(self, v: Vec4) -> Vec4 {
        self.mul_vec4(v)
    }
}

impl fmt::Display for Mat4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows_array_2d() {
            writeln!(f, "{:5.2}{:5.2}{:5.2}{:5.2}", row[0], row[1], row[2], row[3])?;
        }
        Ok(())
    }
}
