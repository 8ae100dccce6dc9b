//! Logical key state
//!
//! The simulation polls a small named key set once per tick; browser key
//! events (or a test harness) flip the flags. The state object is created
//! once at startup and passed by reference to every consumer - no ambient
//! globals.

use crate::sim::TickInput;

/// The logical keys the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Thrust,
    Pause,
    Restart,
}

/// Pressed/released state for the logical key set
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyState {
    left: bool,
    right: bool,
    thrust: bool,
    pause: bool,
    restart: bool,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pressed(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Left => self.left = pressed,
            Key::Right => self.right = pressed,
            Key::Thrust => self.thrust = pressed,
            Key::Pause => self.pause = pressed,
            Key::Restart => self.restart = pressed,
        }
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        match key {
            Key::Left => self.left,
            Key::Right => self.right,
            Key::Thrust => self.thrust,
            Key::Pause => self.pause,
            Key::Restart => self.restart,
        }
    }

    /// Snapshot the held keys into per-tick input commands
    ///
    /// `pause` is consumed as a one-shot so a held key does not toggle the
    /// phase every tick.
    pub fn to_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            turn_left: self.left,
            turn_right: self.right,
            thrust: self.thrust,
            pause: self.pause,
        };
        self.pause = false;
        input
    }

    /// Map a browser `KeyboardEvent::key()` value to a logical key
    pub fn from_browser_key(key: &str) -> Option<Key> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "ArrowUp" | "w" | "W" | " " => Some(Key::Thrust),
            "Escape" | "p" | "P" => Some(Key::Pause),
            "r" | "R" | "Enter" => Some(Key::Restart),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut keys = KeyState::new();
        assert!(!keys.is_pressed(Key::Thrust));
        keys.set_pressed(Key::Thrust, true);
        assert!(keys.is_pressed(Key::Thrust));
        keys.set_pressed(Key::Thrust, false);
        assert!(!keys.is_pressed(Key::Thrust));
    }

    #[test]
    fn test_pause_is_one_shot() {
        let mut keys = KeyState::new();
        keys.set_pressed(Key::Pause, true);
        assert!(keys.to_tick_input().pause);
        assert!(!keys.to_tick_input().pause);
    }

    #[test]
    fn test_browser_key_mapping() {
        assert_eq!(KeyState::from_browser_key("ArrowUp"), Some(Key::Thrust));
        assert_eq!(KeyState::from_browser_key("a"), Some(Key::Left));
        assert_eq!(KeyState::from_browser_key("Escape"), Some(Key::Pause));
        assert_eq!(KeyState::from_browser_key("q"), None);
    }
}
