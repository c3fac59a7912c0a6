/// Violated mathematical preconditions.
///
/// `SingularMatrix` and `InverseMismatch` mean a transform was built wrong
/// (a malformed basis or a degenerate direction). Callers must not continue
/// rendering with the affected frame.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MathError {
    #[error("cannot normalize a zero-length value")]
    ZeroLength,
    #[error("cannot normalize a value with NaN or infinite components")]
    NonFinite,
    #[error("view direction is parallel to world-up; camera basis is undefined")]
    ParallelToUp,
    #[error("matrix is singular (determinant {determinant})")]
    SingularMatrix { determinant: f32 },
    #[error("computed inverse does not reproduce the identity")]
    InverseMismatch,
    #[error("invalid projection parameters: {reason}")]
    InvalidProjection { reason: String },
    #[error("invalid camera config: {reason}")]
    InvalidConfig { reason: String },
}
