//! Input: device events mapped to actions, accumulated into one [`FrameInput`] per frame.
//!
//! # Invariants
//! - The camera only ever sees a [`FrameInput`], never raw window events.
//! - Look deltas are dropped while the cursor is not captured.
//!
//! [`FrameInput`]: floating_core::FrameInput

pub mod action;
pub mod state;

pub use action::{Action, MoveKey};
pub use state::InputState;
