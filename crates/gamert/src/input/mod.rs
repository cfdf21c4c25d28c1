//! Input snapshots
//!
//! Device polling happens outside the engine. Once per frame the application
//! copies the current analog axes into an [`InputSnapshot`] and logic nodes
//! read from it while ticking.

/// Number of controller slots a snapshot tracks
pub const MAX_GAMEPADS: usize = 16;

/// Analog stick axes of one controller, each roughly in `[-1, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GamepadAxes {
    /// Left thumbstick X
    pub thumb_lx: f32,
    /// Left thumbstick Y
    pub thumb_ly: f32,
}

impl GamepadAxes {
    /// Create an axes snapshot
    pub fn new(thumb_lx: f32, thumb_ly: f32) -> Self {
        Self { thumb_lx, thumb_ly }
    }
}

/// Read access to per-controller input for the current frame
pub trait InputSource {
    /// Axes of controller `index`; unknown controllers read as centered
    fn gamepad(&self, index: usize) -> GamepadAxes;
}

/// Per-frame copy of controller state
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    pads: Vec<GamepadAxes>,
}

impl InputSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the axes of controller `index`
    ///
    /// Indices at or past [`MAX_GAMEPADS`] are ignored.
    pub fn set_gamepad(&mut self, index: usize, axes: GamepadAxes) {
        if index >= MAX_GAMEPADS {
            log::warn!("Ignoring input for controller {index}, only {MAX_GAMEPADS} are tracked");
            return;
        }
        if self.pads.len() <= index {
            self.pads.resize(index + 1, GamepadAxes::default());
        }
        self.pads[index] = axes;
    }

    /// Reset every controller to centered
    pub fn clear(&mut self) {
        self.pads.clear();
    }
}

impl InputSource for InputSnapshot {
    fn gamepad(&self, index: usize) -> GamepadAxes {
        self.pads.get(index).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_controller_is_centered() {
        let snapshot = InputSnapshot::new();
        assert_eq!(snapshot.gamepad(3), GamepadAxes::default());
    }

    #[test]
    fn test_set_and_read_back() {
        let mut snapshot = InputSnapshot::new();
        snapshot.set_gamepad(2, GamepadAxes::new(0.5, -1.0));

        assert_eq!(snapshot.gamepad(2), GamepadAxes::new(0.5, -1.0));
        assert_eq!(snapshot.gamepad(0), GamepadAxes::default());

        snapshot.clear();
        assert_eq!(snapshot.gamepad(2), GamepadAxes::default());
    }

    #[test]
    fn test_out_of_range_controller_is_ignored() {
        let mut snapshot = InputSnapshot::new();
        snapshot.set_gamepad(usize::MAX, GamepadAxes::new(1.0, 1.0));
        snapshot.set_gamepad(MAX_GAMEPADS, GamepadAxes::new(1.0, 1.0));
        snapshot.set_gamepad(MAX_GAMEPADS - 1, GamepadAxes::new(0.25, 0.0));

        assert_eq!(snapshot.gamepad(usize::MAX), GamepadAxes::default());
        assert_eq!(snapshot.gamepad(MAX_GAMEPADS), GamepadAxes::default());
        assert_eq!(snapshot.gamepad(MAX_GAMEPADS - 1), GamepadAxes::new(0.25, 0.0));
    }
}
