/// One of the four movement directions bound to WASD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Back,
    Left,
    Right,
}

/// A high-level action produced by the windowing layer.
///
/// The window maps its own key codes and device events onto these, so the
/// camera logic never depends on the windowing library.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// A movement key was pressed or released.
    Move { key: MoveKey, pressed: bool },
    /// Raw cursor movement in pixels.
    Look { dx: f32, dy: f32 },
    /// Grab (true) or release (false) the cursor for mouse-look.
    CaptureCursor(bool),
    /// Close the application.
    Quit,
    /// Input that has no binding.
    Noop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_move_is_constructible() {
        let a = Action::Move {
            key: MoveKey::Forward,
            pressed: true,
        };
        assert!(matches!(a, Action::Move { pressed: true, .. }));
    }

    #[test]
    fn action_look_carries_delta() {
        let a = Action::Look { dx: 3.0, dy: -2.0 };
        assert_eq!(a, Action::Look { dx: 3.0, dy: -2.0 });
    }
}
