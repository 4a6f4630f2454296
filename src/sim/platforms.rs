//! Procedural platform tiles
//!
//! The generator keeps an ordered run of 16×16 tiles (left to right on
//! screen). Each tick the run scrolls left, tiles past the left edge are
//! dropped, and a new group is appended whenever the runway ahead gets short.
//! Group shape comes from the difficulty stage active at the current run time.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::SimulationContext;
use crate::consts::{SCREEN_WIDTH, TILE_SIZE};
use crate::platform::{Renderer, SpriteSheet};
use crate::round_px;

/// Spawn a new group once the last tile is closer than this to the left edge
pub const SPAWN_THRESHOLD_X: f32 = SCREEN_WIDTH + 4.0 * TILE_SIZE;

/// One platform tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub x: f32,
    pub y: f32,
}

impl Tile {
    pub const WIDTH: f32 = TILE_SIZE;
    pub const HEIGHT: f32 = TILE_SIZE;

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, Self::WIDTH, Self::HEIGHT)
    }
}

/// Group generation parameters, active from `time` seconds into a run
///
/// All ranges are inclusive. `gap` is measured from the left edge of the last
/// tile to the left edge of the first tile of the new group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyStage {
    pub time: f32,
    pub gap_min: u32,
    pub gap_max: u32,
    pub tiles_min: u32,
    pub tiles_max: u32,
    pub platform_y_min: u32,
    pub platform_y_range: u32,
}

impl DifficultyStage {
    /// Shipped difficulty curve: wider gaps, shorter groups, more height variance
    pub fn default_table() -> Vec<DifficultyStage> {
        vec![
            Self::stage(0.0, (32, 48), (4, 6), 130, 10),
            Self::stage(15.0, (32, 64), (3, 5), 125, 20),
            Self::stage(30.0, (40, 72), (2, 5), 120, 30),
            Self::stage(60.0, (48, 80), (2, 4), 115, 40),
            Self::stage(90.0, (56, 88), (1, 3), 110, 50),
        ]
    }

    const fn stage(time: f32, gap: (u32, u32), tiles: (u32, u32), y_min: u32, y_range: u32) -> Self {
        Self {
            time,
            gap_min: gap.0,
            gap_max: gap.1,
            tiles_min: tiles.0,
            tiles_max: tiles.1,
            platform_y_min: y_min,
            platform_y_range: y_range,
        }
    }
}

/// Look up the stage active at `elapsed_secs`
///
/// Returns the last stage whose `time` has been reached. Times before the
/// first threshold (including negative ones) resolve to stage 0. The table must
/// be non-empty; [`crate::Tuning::validate`] guarantees it.
pub fn difficulty_at(stages: &[DifficultyStage], elapsed_secs: f32) -> (usize, &DifficultyStage) {
    let index = stages
        .iter()
        .rposition(|stage| stage.time <= elapsed_secs)
        .unwrap_or(0);
    (index, &stages[index])
}

/// Owner of the platform tile run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformGenerator {
    tiles: Vec<Tile>,
}

impl PlatformGenerator {
    /// Build the opening runway: a flat row of tiles under the spawn point
    pub fn new(count: usize, y: f32) -> Self {
        let tiles = (0..count)
            .map(|i| Tile::new(8.0 + i as f32 * TILE_SIZE, y))
            .collect();
        Self { tiles }
    }

    /// Start from an explicit tile run (front to back)
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// x of the rightmost tile, if any
    pub fn last_tile_x(&self) -> Option<f32> {
        self.tiles.last().map(|t| t.x)
    }

    /// Scroll, recycle and top up the runway
    pub fn update(&mut self, ctx: &mut SimulationContext) {
        let speed = ctx.scroll_speed;
        for tile in &mut self.tiles {
            tile.x -= speed;
        }

        self.tiles.retain(|tile| tile.x > -Tile::WIDTH);

        // An empty run restarts just past the right edge
        let last_x = self
            .last_tile_x()
            .map(f32::floor)
            .unwrap_or(SCREEN_WIDTH);
        if self.tiles.is_empty() || last_x < SPAWN_THRESHOLD_X {
            self.spawn_group(ctx, last_x);
        }
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        let src = Rect::new(0.0, 0.0, Tile::WIDTH, Tile::HEIGHT);
        for tile in &self.tiles {
            let dst = Rect::new(
                round_px(tile.x) as f32,
                round_px(tile.y) as f32,
                Tile::WIDTH,
                Tile::HEIGHT,
            );
            renderer.blit(SpriteSheet::Tiles, src, dst);
        }
    }

    fn spawn_group(&mut self, ctx: &mut SimulationContext, last_x: f32) {
        let (stage_index, stage) = difficulty_at(&ctx.tuning.difficulty, ctx.elapsed_secs());
        let stage = *stage;
        let rng = &mut ctx.rng;

        let gap = rng.random_range(stage.gap_min..=stage.gap_max) as f32;
        let count = rng.random_range(stage.tiles_min..=stage.tiles_max);
        let y_max = stage.platform_y_min.saturating_add(stage.platform_y_range);
        let y = rng.random_range(stage.platform_y_min..=y_max) as f32;

        let start_x = (last_x + gap).max(last_x + Tile::WIDTH);
        self.tiles
            .extend((0..count).map(|i| Tile::new(start_x + i as f32 * TILE_SIZE, y)));

        log::debug!(
            "Spawned {} tiles at x={} y={} (stage {}, gap {})",
            count,
            start_x,
            y,
            stage_index,
            gap
        );
    }
}
