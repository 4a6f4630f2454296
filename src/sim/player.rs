//! The skater: movement state machine, physics and tile collision response
//!
//! The player never moves horizontally on its own; the world scrolls past at
//! a speed chosen by the player's state. Vertically it integrates gravity and
//! friction every tick and is caught by platform tiles.

use serde::{Deserialize, Serialize};

use super::input::InputState;
use super::platforms::Tile;
use super::rect::{Rect, check_collision};
use super::state::{GameEvent, SimulationContext};
use crate::consts::{PLAYER_HEIGHT, PLAYER_START_X, PLAYER_START_Y, PLAYER_WIDTH};
use crate::platform::{Renderer, SpriteSheet};
use crate::round_px;
use crate::tuning::Tuning;

/// Movement state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    /// On the ground at cruising speed
    #[default]
    Skating,
    /// In the air (jumped or fell off a ledge)
    Airborne,
    /// On the ground, braking
    Breaking,
    /// On the ground, pushing for speed
    Speeding,
    /// Hit by an enemy, playing the death animation
    Obliterating,
}

impl PlayerState {
    /// World scroll speed for this state, `None` keeps the current speed
    pub fn scroll_speed(self, tuning: &Tuning) -> Option<f32> {
        match self {
            PlayerState::Skating => Some(tuning.skating_speed),
            PlayerState::Breaking => Some(tuning.breaking_speed),
            PlayerState::Speeding => Some(tuning.speeding_speed),
            PlayerState::Obliterating => Some(0.0),
            // Momentum carries through the jump
            PlayerState::Airborne => None,
        }
    }

    pub fn is_grounded(self) -> bool {
        matches!(
            self,
            PlayerState::Skating | PlayerState::Breaking | PlayerState::Speeding
        )
    }
}

/// The player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// Vertical velocity (px/tick, positive is down)
    pub dy: f32,
    pub state: PlayerState,
    /// Banked extra jumps from power-ups
    pub air_jumps: u32,
    /// Set once the death animation has finished
    pub is_dead: bool,
    /// Animation tick within the current frame
    pub tick: u32,
    pub frame: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub const WIDTH: f32 = PLAYER_WIDTH;
    pub const HEIGHT: f32 = PLAYER_HEIGHT;

    pub fn new() -> Self {
        Self {
            x: PLAYER_START_X,
            y: PLAYER_START_Y,
            dy: 0.0,
            state: PlayerState::Skating,
            air_jumps: 0,
            is_dead: false,
            tick: 0,
            frame: 0,
        }
    }

    /// Put the player back at the spawn point for a new run
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, Self::WIDTH, Self::HEIGHT)
    }

    /// Start the death animation (no-op if already dying)
    pub fn obliterate(&mut self) {
        if self.state == PlayerState::Obliterating {
            return;
        }
        self.state = PlayerState::Obliterating;
        self.dy = 0.0;
        self.tick = 0;
        self.frame = 0;
    }

    /// Advance one tick against the current tile run
    pub fn update(&mut self, ctx: &mut SimulationContext, tiles: &[Tile]) {
        if ctx.elapsed_ticks < ctx.tuning.player_activation_ticks {
            return;
        }

        self.handle_input(ctx);

        if self.state != PlayerState::Obliterating {
            let prev_y = self.y;

            self.dy += ctx.tuning.gravity;
            self.dy += ctx.tuning.friction;
            self.y = (self.y + self.dy).floor();
            self.x = self.x.floor();

            self.resolve_collisions(prev_y, tiles, &ctx.tuning, &ctx.input);
        }

        if let Some(speed) = self.state.scroll_speed(&ctx.tuning) {
            ctx.scroll_speed = speed;
        }

        self.animate(&ctx.tuning);
    }

    /// One input-driven transition per tick
    fn handle_input(&mut self, ctx: &mut SimulationContext) {
        let input = ctx.input;
        let ledge = self.dy > ctx.tuning.airborne_threshold;

        match self.state {
            PlayerState::Skating => {
                if input.left {
                    self.state = PlayerState::Breaking;
                } else if input.up {
                    self.jump(ctx, GameEvent::Jump);
                } else if ledge {
                    self.state = PlayerState::Airborne;
                } else if input.right {
                    self.state = PlayerState::Speeding;
                }
            }
            PlayerState::Airborne => {
                if input.up && self.air_jumps > 0 {
                    self.air_jumps -= 1;
                    self.jump(ctx, GameEvent::AirJump);
                    log::debug!("Air jump used, {} left", self.air_jumps);
                }
            }
            PlayerState::Breaking => {
                if !input.left {
                    self.state = PlayerState::Skating;
                } else if input.up {
                    self.jump(ctx, GameEvent::Jump);
                } else if ledge {
                    self.state = PlayerState::Airborne;
                }
            }
            PlayerState::Speeding => {
                if input.left {
                    self.state = PlayerState::Breaking;
                } else if input.up {
                    self.jump(ctx, GameEvent::Jump);
                } else if ledge {
                    self.state = PlayerState::Airborne;
                } else if !input.right {
                    self.state = PlayerState::Skating;
                }
            }
            PlayerState::Obliterating => {
                self.dy = 0.0;
            }
        }
    }

    /// Apply the jump impulse and consume the press
    fn jump(&mut self, ctx: &mut SimulationContext, event: GameEvent) {
        self.dy = ctx.tuning.jump_impulse;
        self.state = PlayerState::Airborne;
        ctx.input.up = false;
        ctx.emit(event);
    }

    /// Land on or bump into overlapping tiles
    ///
    /// A tile counts as landed on when the player's feet were at or above its
    /// top before this tick's move and the player is not rising. Any other
    /// overlap is a wall hit and pushes the player back to the tile's left
    /// side, but only when nothing was landed on this tick. Deciding by the
    /// pre-move position keeps a landing on a tile corner from turning into a
    /// horizontal shove.
    fn resolve_collisions(
        &mut self,
        prev_y: f32,
        tiles: &[Tile],
        tuning: &Tuning,
        input: &InputState,
    ) {
        let body = self.rect();
        let prev_bottom = prev_y + Self::HEIGHT;

        let mut landing_top: Option<f32> = None;
        let mut wall_x: Option<f32> = None;

        for tile in tiles {
            if !check_collision(&body, &tile.rect()).collided {
                continue;
            }
            if self.dy >= 0.0 && prev_bottom <= tile.y + tuning.landing_tolerance {
                landing_top = Some(landing_top.map_or(tile.y, |top: f32| top.min(tile.y)));
            } else {
                wall_x = Some(wall_x.map_or(tile.x, |x: f32| x.min(tile.x)));
            }
        }

        if let Some(top) = landing_top {
            self.y = top - Self::HEIGHT;
            self.dy = 0.0;
            self.state = match self.state {
                PlayerState::Airborne if input.left => PlayerState::Breaking,
                PlayerState::Airborne => PlayerState::Skating,
                grounded => grounded,
            };
        } else if let Some(x) = wall_x {
            self.x = x - Self::WIDTH;
        }
    }

    fn animate(&mut self, tuning: &Tuning) {
        let dying = self.state == PlayerState::Obliterating;
        let (frame_ticks, frames) = if dying {
            (tuning.death_frame_ticks, tuning.death_frames)
        } else {
            (tuning.skate_frame_ticks, tuning.skate_frames)
        };

        self.tick = (self.tick + 1) % frame_ticks.max(1);
        if self.tick == 0 {
            self.frame += 1;
            if self.frame >= frames {
                if dying {
                    self.frame = frames.saturating_sub(1);
                    self.is_dead = true;
                } else {
                    self.frame = 0;
                }
            }
        }
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        let x = round_px(self.x) as f32;
        let y = round_px(self.y) as f32;
        let (w, h) = (Self::WIDTH, Self::HEIGHT);

        let (src, dst) = match self.state {
            PlayerState::Skating | PlayerState::Speeding => (
                Rect::new((self.frame % 2) as f32 * w, 0.0, w, h),
                Rect::new(x, y, w, h),
            ),
            // Crouched sprite is taller and drawn 3px higher
            PlayerState::Airborne | PlayerState::Breaking => (
                Rect::new(2.0 * w, 0.0, w, 40.0),
                Rect::new(x, y - 3.0, w, 40.0),
            ),
            PlayerState::Obliterating => (
                Rect::new(self.frame as f32 * w, 40.0, w, h),
                Rect::new(x, y, w, h),
            ),
        };
        renderer.blit(SpriteSheet::Player, src, dst);
    }
}
