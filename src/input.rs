//! Keyboard handling for the orbit camera
//!
//! Arrow keys fire once when pressed and then auto-repeat while held, so a
//! held key keeps orbiting the way OS key repeat would.

use macroquad::prelude::{is_key_down, KeyCode};
use serde::{Deserialize, Serialize};
use crate::orbit::OrbitCamera;

/// Key repeat timing, seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    pub repeat_delay: f32,
    pub repeat_interval: f32,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            repeat_delay: 0.4,
            repeat_interval: 0.033,
        }
    }
}

/// Auto-repeat state for one key
#[derive(Debug, Clone)]
pub struct KeyRepeat {
    delay: f32,
    interval: f32,
    held_for: Option<f32>,
    next_fire: f32,
}

impl KeyRepeat {
    pub fn new(delay: f32, interval: f32) -> Self {
        Self {
            delay,
            interval,
            held_for: None,
            next_fire: 0.0,
        }
    }

    /// Advance by `dt` seconds; returns how many presses fire this frame
    pub fn update(&mut self, down: bool, dt: f32) -> u32 {
        if !down {
            self.held_for = None;
            return 0;
        }

        let Some(held) = self.held_for else {
            self.held_for = Some(0.0);
            self.next_fire = self.delay;
            return 1;
        };

        let held = held + dt;
        self.held_for = Some(held);

        if self.interval <= 0.0 {
            return 0;
        }

        let mut fired = 0;
        while held >= self.next_fire {
            fired += 1;
            self.next_fire += self.interval;
        }
        fired
    }
}

/// Keys relevant to the viewer, sampled once per frame
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub shift: bool,
    pub escape: bool,
}

/// Read the keyboard through macroquad
pub fn poll_keys() -> KeyState {
    KeyState {
        left: is_key_down(KeyCode::Left),
        right: is_key_down(KeyCode::Right),
        down: is_key_down(KeyCode::Down),
        shift: is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift),
        escape: is_key_down(KeyCode::Escape),
    }
}

/// What the user asked for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitCommand {
    RotateLeft { coarse: bool },
    RotateRight { coarse: bool },
    Snap,
    Quit,
}

impl OrbitCommand {
    /// Apply to the camera; returns false for `Quit`
    pub fn apply(self, orbit: &mut OrbitCamera) -> bool {
        match self {
            OrbitCommand::RotateLeft { coarse } => orbit.rotate_left(coarse),
            OrbitCommand::RotateRight { coarse } => orbit.rotate_right(coarse),
            OrbitCommand::Snap => orbit.snap_to_45(),
            OrbitCommand::Quit => return false,
        }
        true
    }
}

/// Turns key state into orbit commands
pub struct OrbitInput {
    left: KeyRepeat,
    right: KeyRepeat,
    snap: KeyRepeat,
}

impl OrbitInput {
    pub fn new(settings: &InputSettings) -> Self {
        let repeat = || KeyRepeat::new(settings.repeat_delay, settings.repeat_interval);
        Self {
            left: repeat(),
            right: repeat(),
            snap: repeat(),
        }
    }

    pub fn commands(&mut self, keys: KeyState, dt: f32) -> Vec<OrbitCommand> {
        if keys.escape {
            return vec![OrbitCommand::Quit];
        }

        let coarse = keys.shift;
        let mut commands = Vec::new();

        for _ in 0..self.left.update(keys.left, dt) {
            commands.push(OrbitCommand::RotateLeft { coarse });
        }
        for _ in 0..self.right.update(keys.right, dt) {
            commands.push(OrbitCommand::RotateRight { coarse });
        }
        for _ in 0..self.snap.update(keys.down, dt) {
            commands.push(OrbitCommand::Snap);
        }

        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orbit::OrbitSettings;

    #[test]
    fn test_repeat_fires_once_then_after_delay() {
        let mut key = KeyRepeat::new(0.4, 0.1);
        assert_eq!(key.update(true, 0.016), 1);
        assert_eq!(key.update(true, 0.2), 0);
        assert_eq!(key.update(true, 0.15), 0);
        // 0.45s held: past the delay
        assert_eq!(key.update(true, 0.1), 1);
        // Big frame catches up on missed repeats
        assert_eq!(key.update(true, 0.3), 3);
    }

    #[test]
    fn test_release_resets() {
        let mut key = KeyRepeat::new(0.4, 0.1);
        assert_eq!(key.update(true, 0.0), 1);
        assert_eq!(key.update(false, 0.016), 0);
        assert_eq!(key.update(true, 0.016), 1);
    }

    #[test]
    fn test_zero_interval_never_repeats() {
        let mut key = KeyRepeat::new(0.0, 0.0);
        assert_eq!(key.update(true, 0.0), 1);
        assert_eq!(key.update(true, 5.0), 0);
    }

    #[test]
    fn test_shift_selects_coarse_step() {
        let mut input = OrbitInput::new(&InputSettings::default());
        let keys = KeyState {
            left: true,
            shift: true,
            ..KeyState::default()
        };
        assert_eq!(input.commands(keys, 0.016), vec![OrbitCommand::RotateLeft { coarse: true }]);

        let keys = KeyState {
            right: true,
            down: true,
            ..KeyState::default()
        };
        assert_eq!(
            input.commands(keys, 0.016),
            vec![OrbitCommand::RotateRight { coarse: false }, OrbitCommand::Snap]
        );
    }

    #[test]
    fn test_escape_quits() {
        let mut input = OrbitInput::new(&InputSettings::default());
        let keys = KeyState {
            left: true,
            escape: true,
            ..KeyState::default()
        };
        let commands = input.commands(keys, 0.016);
        assert_eq!(commands, vec![OrbitCommand::Quit]);

        let mut orbit = OrbitCamera::new(OrbitSettings::default());
        assert!(!commands[0].apply(&mut orbit));
        assert!(OrbitCommand::Snap.apply(&mut orbit));
    }
}
