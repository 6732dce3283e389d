//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Keyboard input (key names to tick input)
//! - Storage (LocalStorage on web)
//! - Name entry (prompt on web)

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::sim::TickInput;

/// Player actions bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    TurnLeft,
    TurnRight,
    Thrust,
    Fire,
    Pause,
    Restart,
}

/// Map a `KeyboardEvent.key` value to an action
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        "ArrowLeft" => Some(KeyAction::TurnLeft),
        "ArrowRight" => Some(KeyAction::TurnRight),
        "ArrowUp" => Some(KeyAction::Thrust),
        " " => Some(KeyAction::Fire),
        "p" | "P" => Some(KeyAction::Pause),
        "Enter" => Some(KeyAction::Restart),
        _ => None,
    }
}

/// Keyboard state between ticks.
///
/// Turning and thrust follow the held keys. Fire, pause and restart latch on
/// key-down and are consumed by the next tick.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    turn_left: bool,
    turn_right: bool,
    thrust: bool,
    fire: bool,
    pause: bool,
    restart: bool,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Auto-repeat re-fires but never re-toggles pause.
    /// Returns true if the key is bound.
    pub fn key_down(&mut self, key: &str, repeat: bool) -> bool {
        let Some(action) = action_for_key(key) else {
            return false;
        };
        match action {
            KeyAction::TurnLeft => self.turn_left = true,
            KeyAction::TurnRight => self.turn_right = true,
            KeyAction::Thrust => self.thrust = true,
            KeyAction::Fire => self.fire = true,
            KeyAction::Pause if !repeat => self.pause = true,
            KeyAction::Restart if !repeat => self.restart = true,
            KeyAction::Pause | KeyAction::Restart => {}
        }
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        let Some(action) = action_for_key(key) else {
            return false;
        };
        match action {
            KeyAction::TurnLeft => self.turn_left = false,
            KeyAction::TurnRight => self.turn_right = false,
            KeyAction::Thrust => self.thrust = false,
            _ => {}
        }
        true
    }

    /// Request a pause toggle without a key (e.g. auto-pause on blur)
    pub fn request_pause(&mut self) {
        self.pause = true;
    }

    /// Request a restart without a key (e.g. the game-over button)
    pub fn request_restart(&mut self) {
        self.restart = true;
    }

    /// Drop held keys, e.g. when the window loses focus and key-ups are lost
    pub fn release_all(&mut self) {
        self.turn_left = false;
        self.turn_right = false;
        self.thrust = false;
    }

    /// Input for the next tick; clears the one-shot latches
    pub fn take_input(&mut self) -> TickInput {
        let input = TickInput {
            turn_left: self.turn_left,
            turn_right: self.turn_right,
            thrust: self.thrust,
            fire: self.fire,
            pause: self.pause,
            restart: self.restart,
        };
        self.fire = false;
        self.pause = false;
        self.restart = false;
        input
    }
}
