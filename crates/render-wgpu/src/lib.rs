//! wgpu render backend for the camera demo.
//!
//! Draws one colored triangle. The only per-frame input is the MVP matrix
//! produced by [`floating_core::FlyCamera::advance`], already transposed to
//! column-major order.
//!
//! # Invariants
//! - The renderer never touches camera state; it consumes one matrix per frame.
//! - All GPU resources are owned here and released on drop.

mod gpu;
mod shaders;

pub use gpu::TriangleRenderer;
