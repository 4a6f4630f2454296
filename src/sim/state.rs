//! Shared simulation state and core types
//!
//! [`SimulationContext`] replaces what would otherwise be globals: the world
//! scroll speed, the latched input, the run clock and the RNG. One context is
//! owned by the session and lent to each subsystem in tick order.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::input::InputState;
use crate::consts::TICKS_PER_SECOND;
use crate::tuning::Tuning;

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Title screen, waiting for the first press
    #[default]
    Start,
    /// Active run
    Playing,
    /// Run ended, waiting for restart or return to title
    GameOver,
}

/// Things that happened during a tick, drained by the session for sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Jump from the ground
    Jump,
    /// Jump spent from the power-up bank
    AirJump,
    /// Hit an enemy
    Crash,
    /// Picked up an angel
    PowerUp,
    /// Run started from the title screen or restarted
    RunStarted,
    /// Run ended
    GameOver,
}

/// Per-session simulation context
#[derive(Debug, Clone)]
pub struct SimulationContext {
    pub tuning: Tuning,
    /// Buttons latched for the current tick
    pub input: InputState,
    /// World scroll rate in px/tick, set by the player's state
    pub scroll_speed: f32,
    /// Ticks since the current run began
    pub elapsed_ticks: u64,
    pub rng: Pcg32,
    /// Events raised this tick (drained by the session)
    pub events: Vec<GameEvent>,
}

impl SimulationContext {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            scroll_speed: tuning.skating_speed,
            tuning,
            input: InputState::default(),
            elapsed_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Run clock in seconds
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed_ticks as f32 / TICKS_PER_SECOND as f32
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Rewind the run clock for a fresh run
    pub fn reset_run(&mut self) {
        self.elapsed_ticks = 0;
        self.scroll_speed = self.tuning.skating_speed;
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_secs() {
        let mut ctx = SimulationContext::new(Tuning::default(), 1);
        ctx.elapsed_ticks = 90;
        assert!((ctx.elapsed_secs() - 1.5).abs() < 0.0001);
    }

    #[test]
    fn test_reset_run_restores_scroll_and_clock() {
        let mut ctx = SimulationContext::new(Tuning::default(), 1);
        ctx.elapsed_ticks = 500;
        ctx.scroll_speed = 0.0;
        ctx.emit(GameEvent::Jump);

        ctx.reset_run();
        assert_eq!(ctx.elapsed_ticks, 0);
        assert_eq!(ctx.scroll_speed, ctx.tuning.skating_speed);
        assert!(ctx.events.is_empty());
    }
}
