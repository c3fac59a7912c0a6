use std::f32::consts::FRAC_PI_2;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Mat4, MathError, Vec3};

/// Camera and projection settings for the fly camera.
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Angle between the left and right clip planes, in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Viewport width / height. Overwritten by the window on resize.
    pub aspect: f32,
    /// Radians of yaw/pitch per pixel of cursor movement.
    pub sensitivity: f32,
    /// Units per second.
    pub speed: f32,
    /// Translation fed to [`Mat4::model`]; the object is drawn at its negation.
    pub model_translation: Vec3,
    pub start_position: Vec3,
    pub start_yaw: f32,
    pub start_pitch: f32,
    /// The camera is kept within this distance of the origin. At most
    /// [`CameraConfig::MAX_ROAM_RADIUS`].
    pub roam_radius: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 40.0,
            near: 0.1,
            far: 10.0,
            aspect: 16.0 / 9.0,
            sensitivity: 0.001,
            speed: 1.5,
            model_translation: Vec3::new(0.0, 0.0, 5.0),
            start_position: Vec3::ZERO,
            start_yaw: -FRAC_PI_2,
            start_pitch: 0.0,
            roam_radius: 25.0,
        }
    }
}

impl CameraConfig {
    /// Largest distance from the origin at which the f32 view-matrix inverse
    /// still reproduces the identity within [`crate::EPSILON`].
    pub const MAX_ROAM_RADIUS: f32 = 50.0;

    pub fn from_json_str(text: &str) -> Result<Self, MathError> {
        let config: Self = serde_json::from_str(text).map_err(|e| MathError::InvalidConfig {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MathError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| MathError::InvalidConfig {
            reason: format!("{}: {e}", path.display()),
        })?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "loaded camera config");
        Ok(config)
    }

    /// Checks that the projection is well-formed and the motion settings are usable.
    pub fn validate(&self) -> Result<(), MathError> {
        self.projection()?;
        let invalid = |reason: &str| {
            Err(MathError::InvalidConfig {
                reason: reason.to_string(),
            })
        };
        if !(self.sensitivity.is_finite() && self.sensitivity >= 0.0) {
            return invalid("sensitivity must be a non-negative number");
        }
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return invalid("speed must be a non-negative number");
        }
        if !(self.roam_radius.is_finite() && self.roam_radius > 0.0) {
            return invalid("roam_radius must be positive");
        }
        if self.roam_radius > Self::MAX_ROAM_RADIUS {
            return Err(MathError::InvalidConfig {
                reason: format!(
                    "roam_radius {} exceeds the precision limit {}",
                    self.roam_radius,
                    Self::MAX_ROAM_RADIUS
                ),
            });
        }
        if !(self.start_position.is_finite()
            && self.start_position.length() <= self.roam_radius)
        {
            return invalid("start_position must lie within roam_radius of the origin");
        }
        if !(self.start_yaw.is_finite() && self.start_pitch.is_finite()) {
            return invalid("start angles must be finite");
        }
        Ok(())
    }

    pub fn projection(&self) -> Result<Mat4, MathError> {
        Mat4::projection(self.near, self.far, self.aspect, self.fov_degrees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = CameraConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fov_degrees, 40.0);
        assert_eq!(config.model_translation, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = CameraConfig::from_json_str(r#"{ "fov_degrees": 60.0, "speed": 3.0 }"#).unwrap();
        assert_eq!(config.fov_degrees, 60.0);
        assert_eq!(config.speed, 3.0);
        assert_eq!(config.near, 0.1);
    }

    #[test]
    fn nested_vectors_parse() {
        let config =
            CameraConfig::from_json_str(r#"{ "start_position": { "x": 1.0, "y": 2.0, "z": 3.0 } }"#)
                .unwrap();
        assert_eq!(config.start_position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn degenerate_projection_is_rejected() {
        let err = CameraConfig::from_json_str(r#"{ "near": 5.0, "far": 5.0 }"#).unwrap_err();
        assert!(matches!(err, MathError::InvalidProjection { .. }));
    }

    #[test]
    fn negative_speed_is_rejected() {
        let err = CameraConfig::from_json_str(r#"{ "speed": -1.0 }"#).unwrap_err();
        assert!(matches!(err, MathError::InvalidConfig { .. }));
    }

    #[test]
    fn roam_radius_is_capped() {
        let err = CameraConfig::from_json_str(r#"{ "roam_radius": 5000.0 }"#).unwrap_err();
        assert!(matches!(err, MathError::InvalidConfig { .. }));
        assert!(err.to_string().contains("roam_radius"));

        let edge = format!(r#"{{ "roam_radius": {} }}"#, CameraConfig::MAX_ROAM_RADIUS);
        assert!(CameraConfig::from_json_str(&edge).is_ok());
    }

    #[test]
    fn start_position_outside_roam_radius_is_rejected() {
        let err = CameraConfig::from_json_str(
            r#"{ "start_position": { "x": 100.0, "y": 100.0, "z": 100.0 }, "roam_radius": 25.0 }"#,
        )
        .unwrap_err();
        assert!(matches!(err, MathError::InvalidConfig { .. }));

        let err = CameraConfig {
            start_position: Vec3::new(f32::NAN, 0.0, 0.0),
            ..CameraConfig::default()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, MathError::InvalidConfig { .. }));
    }

    #[test]
    fn accepted_far_config_renders_first_frame() {
        let config = CameraConfig::from_json_str(
            r#"{ "start_position": { "x": 28.0, "y": 28.0, "z": 28.0 },
                 "start_yaw": 0.7, "start_pitch": 0.3, "roam_radius": 50.0 }"#,
        )
        .unwrap();
        let mut camera = crate::FlyCamera::new(config);
        assert!(camera.advance(&crate::FrameInput::default()).is_ok());
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = CameraConfig::from_json_str("{ fov: ").unwrap_err();
        assert!(matches!(err, MathError::InvalidConfig { .. }));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = CameraConfig::load("/nonexistent/camera.json").unwrap_err();
        assert!(err.to_string().contains("camera.json"));
    }
}
