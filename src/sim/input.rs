//! Latched button state for one tick
//!
//! Written by whatever owns the keyboard/touch handlers, read by the
//! simulation. The simulation clears flags it consumes (a jump, the press
//! that started a run) so a held button does not fire twice.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    /// Brake
    pub left: bool,
    /// Speed up
    pub right: bool,
    /// Jump
    pub up: bool,
    /// Mute / unmute
    pub sound_toggle: bool,
}

impl InputState {
    /// Any of the three movement buttons held
    pub fn any_direction(&self) -> bool {
        self.left || self.right || self.up
    }

    /// Release the movement buttons
    pub fn clear_directions(&mut self) {
        self.left = false;
        self.right = false;
        self.up = false;
    }
}
