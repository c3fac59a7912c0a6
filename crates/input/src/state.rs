use floating_core::{FrameInput, MoveKeys};

use crate::action::{Action, MoveKey};

/// Input gathered between two frames.
#[derive(Debug, Default)]
pub struct InputState {
    keys: MoveKeys,
    look: (f32, f32),
    captured: bool,
    quit: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Move { key, pressed } => {
                let slot = match key {
                    MoveKey::Forward => &mut self.keys.forward,
                    MoveKey::Back => &mut self.keys.back,
                    MoveKey::Left => &mut self.keys.left,
                    MoveKey::Right => &mut self.keys.right,
                };
                *slot = pressed;
            }
            Action::Look { dx, dy } => {
                if self.captured {
                    self.look.0 += dx;
                    self.look.1 += dy;
                }
            }
            Action::CaptureCursor(captured) => {
                if self.captured != captured {
                    tracing::debug!(captured, "cursor capture changed");
                }
                self.captured = captured;
                if !captured {
                    self.look = (0.0, 0.0);
                }
            }
            Action::Quit => self.quit = true,
            Action::Noop => {}
        }
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Snapshot for the frame lasting `dt` seconds. Drains the look delta;
    /// held keys persist until released.
    pub fn frame(&mut self, dt: f32) -> FrameInput {
        FrameInput {
            look_delta: std::mem::take(&mut self.look),
            movement: self.keys,
            dt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: MoveKey) -> Action {
        Action::Move { key, pressed: true }
    }

    #[test]
    fn held_keys_persist_across_frames() {
        let mut input = InputState::new();
        input.apply(press(MoveKey::Forward));
        input.apply(press(MoveKey::Left));
        let first = input.frame(0.016);
        let second = input.frame(0.016);
        assert!(first.movement.forward && first.movement.left);
        assert_eq!(first.movement, second.movement);

        input.apply(Action::Move {
            key: MoveKey::Forward,
            pressed: false,
        });
        assert!(!input.frame(0.016).movement.forward);
    }

    #[test]
    fn look_delta_accumulates_and_drains() {
        let mut input = InputState::new();
        input.apply(Action::CaptureCursor(true));
        input.apply(Action::Look { dx: 2.0, dy: 1.0 });
        input.apply(Action::Look { dx: 3.0, dy: -4.0 });
        let frame = input.frame(0.02);
        assert_eq!(frame.look_delta, (5.0, -3.0));
        assert_eq!(frame.dt, 0.02);
        assert_eq!(input.frame(0.02).look_delta, (0.0, 0.0));
    }

    #[test]
    fn look_ignored_without_capture() {
        let mut input = InputState::new();
        input.apply(Action::Look { dx: 10.0, dy: 10.0 });
        assert_eq!(input.frame(0.01).look_delta, (0.0, 0.0));

        input.apply(Action::CaptureCursor(true));
        input.apply(Action::Look { dx: 1.0, dy: 1.0 });
        input.apply(Action::CaptureCursor(false));
        assert!(!input.is_captured());
        assert_eq!(input.frame(0.01).look_delta, (0.0, 0.0));
    }

    #[test]
    fn quit_and_noop() {
        let mut input = InputState::new();
        input.apply(Action::Noop);
        assert!(!input.quit_requested());
        input.apply(Action::Quit);
        assert!(input.quit_requested());
    }
}
