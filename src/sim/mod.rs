//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (tiles left to right)
//!
//! Drawing goes through the traits in [`crate::platform`]; nothing here knows
//! about a concrete backend.

pub mod autopilot;
pub mod entities;
pub mod input;
pub mod platforms;
pub mod player;
pub mod rect;
pub mod session;
pub mod state;

pub use autopilot::{autopilot, steer};
pub use entities::{Angel, Enemy, Sparkle, Star, Title};
pub use input::InputState;
pub use platforms::{DifficultyStage, PlatformGenerator, SPAWN_THRESHOLD_X, Tile, difficulty_at};
pub use player::{Player, PlayerState};
pub use rect::{CollisionResult, Rect, check_collision};
pub use session::GameSession;
pub use state::{GameEvent, SessionStatus, SimulationContext};
