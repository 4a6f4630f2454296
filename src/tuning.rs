//! Data-driven game balance
//!
//! Every gameplay number the simulation reads lives in [`Tuning`]. The
//! defaults are the shipped balance; a JSON document can override any
//! subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::TILE_SIZE;
use crate::sim::platforms::DifficultyStage;

/// Errors raised while loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("difficulty table is empty")]
    EmptyDifficultyTable,
    #[error("first difficulty stage must start at time 0, found {0}")]
    FirstStageNotAtZero(f32),
    #[error("difficulty stage {index} starts before the stage preceding it")]
    UnsortedStages { index: usize },
    #[error("difficulty stage {index} has an inverted {field} range")]
    InvertedRange { index: usize, field: &'static str },
    #[error("difficulty stage {index} spawns groups of zero tiles")]
    EmptyGroups { index: usize },
    #[error("difficulty stage {index} has gap_min {gap_min}, below one tile width")]
    GapTooSmall { index: usize, gap_min: u32 },
    #[error("difficulty stage {index} platform height range overflows")]
    HeightOverflow { index: usize },
}

/// Player movement, world scrolling and scoring parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Physics (px/tick, px/tick²) ===
    pub gravity: f32,
    pub friction: f32,
    /// Vertical velocity applied on a jump (negative is up)
    pub jump_impulse: f32,
    /// Skating with `dy` above this means the player ran off a ledge
    pub airborne_threshold: f32,
    /// Slack (px) when deciding whether the player came down onto a tile
    pub landing_tolerance: f32,

    // === Scroll speed per player state ===
    pub skating_speed: f32,
    pub breaking_speed: f32,
    pub speeding_speed: f32,

    // === Timings (ticks) ===
    /// Grace period at the start of a run before the player moves
    pub player_activation_ticks: u64,
    pub skate_frame_ticks: u32,
    pub skate_frames: u32,
    pub death_frame_ticks: u32,
    pub death_frames: u32,
    /// Ticks on the game over screen before input is accepted
    pub game_over_cooldown_ticks: u32,
    pub prompt_blink_ticks: u32,

    // === World ===
    /// Falling below this y ends the run
    pub out_of_bounds_y: f32,
    pub initial_tiles: usize,
    pub initial_tile_y: f32,
    pub star_count: usize,
    /// Seconds into a run before enemies start flying
    pub enemy_activation_secs: f32,
    pub enemy_count: usize,

    // === Score ===
    pub score_interval_ticks: u64,
    pub angel_bonus: u64,

    pub difficulty: Vec<DifficultyStage>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.1,
            friction: 0.4,
            jump_impulse: -8.0,
            airborne_threshold: 1.0,
            landing_tolerance: 1.0,

            skating_speed: 1.4,
            breaking_speed: 0.5,
            speeding_speed: 2.4,

            player_activation_ticks: 40,
            skate_frame_ticks: 16,
            skate_frames: 2,
            death_frame_ticks: 6,
            death_frames: 6,
            game_over_cooldown_ticks: 30,
            prompt_blink_ticks: 30,

            out_of_bounds_y: 500.0,
            initial_tiles: 30,
            initial_tile_y: 160.0,
            star_count: 30,
            enemy_activation_secs: 20.0,
            enemy_count: 1,

            score_interval_ticks: 10,
            angel_bonus: 50,

            difficulty: DifficultyStage::default_table(),
        }
    }
}

impl Tuning {
    /// Parse a tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check the difficulty table is usable by the platform generator
    pub fn validate(&self) -> Result<(), TuningError> {
        let first = self
            .difficulty
            .first()
            .ok_or(TuningError::EmptyDifficultyTable)?;
        if first.time != 0.0 {
            return Err(TuningError::FirstStageNotAtZero(first.time));
        }

        for (index, stage) in self.difficulty.iter().enumerate() {
            if index > 0 && stage.time < self.difficulty[index - 1].time {
                return Err(TuningError::UnsortedStages { index });
            }
            if stage.gap_min > stage.gap_max {
                return Err(TuningError::InvertedRange { index, field: "gap" });
            }
            if stage.tiles_min > stage.tiles_max {
                return Err(TuningError::InvertedRange { index, field: "tiles" });
            }
            if stage.tiles_min == 0 {
                return Err(TuningError::EmptyGroups { index });
            }
            // Groups must start past the last tile to keep the run ordered
            if (stage.gap_min as f32) < TILE_SIZE {
                return Err(TuningError::GapTooSmall {
                    index,
                    gap_min: stage.gap_min,
                });
            }
            if stage
                .platform_y_min
                .checked_add(stage.platform_y_range)
                .is_none()
            {
                return Err(TuningError::HeightOverflow { index });
            }
        }
        Ok(())
    }
}
