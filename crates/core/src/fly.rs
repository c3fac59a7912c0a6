use std::f32::consts::FRAC_PI_2;

use crate::{Camera, CameraConfig, Mat4, MathError, Vec3, float_equal};

/// Movement keys held during a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

/// Everything the fly camera needs from the input side for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Cursor movement since the previous frame, in pixels.
    pub look_delta: (f32, f32),
    pub movement: MoveKeys,
    /// Seconds since the previous frame.
    pub dt: f32,
}

/// Result of one frame: the rebuilt camera and the GPU-ready matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub camera: Camera,
    /// `transpose(projection * view * model)`: column-major for the shader.
    pub mvp: Mat4,
}

/// First-person camera driven by yaw/pitch and WASD movement.
///
/// Only position and angles persist between frames; the basis and all
/// matrices are recomputed from them every frame.
#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub config: CameraConfig,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl FlyCamera {
    /// Pitch stays inside `(-PITCH_LIMIT, PITCH_LIMIT)` so the view direction
    /// never approaches world-up.
    pub const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.1;

    pub fn new(config: CameraConfig) -> Self {
        Self {
            position: config.start_position,
            yaw: config.start_yaw,
            pitch: config.start_pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT),
            config,
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        (self.yaw, self.pitch) = self.rotated(dx, dy);
    }

    fn rotated(&self, dx: f32, dy: f32) -> (f32, f32) {
        let yaw = self.yaw + self.config.sensitivity * dx;
        let pitch = (self.pitch + self.config.sensitivity * dy)
            .clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        (yaw, pitch)
    }

    /// Unit view direction. Positive pitch looks down.
    pub fn direction(&self) -> Vec3 {
        direction(self.yaw, self.pitch)
    }

    pub fn camera(&self) -> Result<Camera, MathError> {
        Camera::new(self.position, self.direction())
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.config.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// Applies one frame of input and returns the camera and its MVP matrix.
    ///
    /// On error the camera keeps its previous position and angles.
    pub fn advance(&mut self, input: &FrameInput) -> Result<FrameOutput, MathError> {
        let _span = tracing::debug_span!("fly_camera_advance").entered();

        let (dx, dy) = input.look_delta;
        let (yaw, pitch) = self.rotated(dx, dy);

        let mut camera = Camera::new(self.position, direction(yaw, pitch))?;
        let step = movement(&camera, input.movement);
        if !float_equal(step.length_squared(), 0.0) {
            camera.pos += step.normalize()? * (self.config.speed * input.dt);
        }
        camera.pos = self.keep_in_bounds(camera.pos)?;

        let model = Mat4::model(self.config.model_translation);
        let view = camera.view_matrix()?;
        let projection = self.config.projection()?;
        let mvp = (projection * (view * model)).transpose();

        self.yaw = yaw;
        self.pitch = pitch;
        self.position = camera.pos;
        Ok(FrameOutput { camera, mvp })
    }

    fn keep_in_bounds(&self, pos: Vec3) -> Result<Vec3, MathError> {
        let radius = self.config.roam_radius.min(CameraConfig::MAX_ROAM_RADIUS);
        if pos.length() <= radius {
            return Ok(pos);
        }
        tracing::debug!(?pos, radius, "camera clamped to roam radius");
        Ok(pos.normalize()? * radius)
    }
}

fn direction(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(
        yaw.cos() * pitch.cos(),
        -pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
}

/// Sum of the basis axes selected by the held keys (unnormalized).
fn movement(camera: &Camera, keys: MoveKeys) -> Vec3 {
    let mut step = Vec3::ZERO;
    if keys.left {
        step += -camera.i;
    }
    if keys.right {
        step += camera.i;
    }
    if keys.forward {
        step += -camera.k;
    }
    if keys.back {
        step += camera.k;
    }
    step
}
