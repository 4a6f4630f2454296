//! Star Skater - A side-scrolling skater arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, tile collisions, platform generation, session)
//! - `platform`: Renderer / text output sinks the game draws into
//! - `audio`: Sound trigger abstraction with volume and mute handling
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `highscores`: In-memory leaderboard for the running process

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Screen dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 256.0;
    pub const SCREEN_HEIGHT: f32 = 256.0;

    /// Platform tiles are square
    pub const TILE_SIZE: f32 = 16.0;

    /// Player hitbox and spawn point
    pub const PLAYER_WIDTH: f32 = 26.0;
    pub const PLAYER_HEIGHT: f32 = 35.0;
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_START_Y: f32 = 0.0;

    /// Width of one glyph in the bitmap font
    pub const GLYPH_WIDTH: f32 = 8.0;
}

/// Move `from` toward `to` by `weight`, snapping once within 0.2 px
#[inline]
pub fn lerp(from: f32, to: f32, weight: f32) -> f32 {
    let dist = to - from;
    if dist.abs() < 0.2 {
        return to;
    }
    from + dist * weight
}

/// Round a float position to a whole screen pixel
#[inline]
pub fn round_px(value: f32) -> i32 {
    value.round() as i32
}
