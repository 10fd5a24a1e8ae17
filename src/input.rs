//! Per-tick movement intent, independent of any input device.

use crate::controller::RotationDir;
use crate::levels::Level;

/// One discrete request from the player (or an autoplay driver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    RotateCw,
    RotateCcw,
}

/// What is held / pressed during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub soft_drop: bool,
    pub rotate: Option<RotationDir>,
}

impl TickInput {
    pub fn from_actions(actions: &[Action]) -> Self {
        let mut input = Self::default();
        for &action in actions {
            input.apply(action);
        }
        input
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::MoveLeft => self.left = true,
            Action::MoveRight => self.right = true,
            Action::SoftDrop => self.soft_drop = true,
            Action::RotateCw => self.rotate = Some(RotationDir::Clockwise),
            Action::RotateCcw => self.rotate = Some(RotationDir::CounterClockwise),
        }
    }

    /// Displacement for this tick at `level`'s speeds.
    ///
    /// Gravity always applies; soft drop doubles it. Left and right together cancel.
    pub fn displacement(&self, level: &Level) -> (f32, f32) {
        let dy = if self.soft_drop {
            level.fall_speed * 2.0
        } else {
            level.fall_speed
        };
        let dx = match (self.left, self.right) {
            (true, false) => -level.horizontal_speed,
            (false, true) => level.horizontal_speed,
            _ => 0.0,
        };
        (dx, dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LEVELS;

    #[test]
    fn test_idle_input_only_falls() {
        assert_eq!(TickInput::default().displacement(&LEVELS[0]), (0.0, 1.0));
    }

    #[test]
    fn test_soft_drop_doubles_fall() {
        let input = TickInput::from_actions(&[Action::SoftDrop, Action::MoveRight]);
        assert_eq!(input.displacement(&LEVELS[5]), (2.6, 6.0));
    }

    #[test]
    fn test_opposite_directions_cancel() {
        let input = TickInput::from_actions(&[Action::MoveLeft, Action::MoveRight]);
        assert_eq!(input.displacement(&LEVELS[1]).0, 0.0);
        let input = TickInput::from_actions(&[Action::MoveLeft]);
        assert_eq!(input.displacement(&LEVELS[1]).0, -2.1);
    }

    #[test]
    fn test_last_rotation_wins() {
        let input = TickInput::from_actions(&[Action::RotateCw, Action::RotateCcw]);
        assert_eq!(input.rotate, Some(RotationDir::CounterClockwise));
    }
}
