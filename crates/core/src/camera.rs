use serde::{Deserialize, Serialize};

use crate::{EPSILON, Mat4, MathError, Vec3};

/// Fixed world-up used for every camera basis.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Right-handed orthonormal frame: `i` right, `j` up, `k` backward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Basis {
    pub i: Vec3,
    pub j: Vec3,
    pub k: Vec3,
}

impl Basis {
    /// Builds the frame for a camera looking along `dir` with [`WORLD_UP`].
    ///
    /// All three axes are normalized. `dir` must be non-zero and must not be
    /// parallel to world-up.
    pub fn from_direction(dir: Vec3) -> Result<Self, MathError> {
        let dir = dir.normalize()?;
        let right = dir.cross(WORLD_UP);
        if right.length_squared() <= EPSILON * EPSILON {
            return Err(MathError::ParallelToUp);
        }
        let i = right.normalize()?;
        let j = i.cross(dir).normalize()?;
        Ok(Self { i, j, k: -dir })
    }

    /// The direction the frame looks along (`-k`).
    pub fn forward(&self) -> Vec3 {
        -self.k
    }
}

/// Camera position plus its basis. Rebuilt from scratch every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec3,
    pub i: Vec3,
    pub j: Vec3,
    pub k: Vec3,
}

impl Camera {
    pub fn new(pos: Vec3, dir: Vec3) -> Result<Self, MathError> {
        let Basis { i, j, k } = Basis::from_direction(dir)?;
        Ok(Self { pos, i, j, k })
    }

    pub fn basis(&self) -> Basis {
        Basis {
            i: self.i,
            j: self.j,
            k: self.k,
        }
    }

    pub fn view_matrix(&self) -> Result<Mat4, MathError> {
        Mat4::view_from_camera(self)
    }
}
