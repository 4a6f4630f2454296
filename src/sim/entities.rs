//! Peripheral animators: stars, the angel power-up, enemies, sparkles, title
//!
//! Each owns its own animation counters and exposes `update` / `draw`. None of
//! them touch the player or the tiles directly; the session wires them up.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::platforms::Tile;
use super::rect::Rect;
use crate::consts::{SCREEN_WIDTH, TILE_SIZE};
use crate::platform::{Renderer, SpriteSheet};
use crate::{lerp, round_px};

fn blit_at(renderer: &mut dyn Renderer, sheet: SpriteSheet, src: Rect, pos: Vec2) {
    let dst = Rect::new(round_px(pos.x) as f32, round_px(pos.y) as f32, src.width, src.height);
    renderer.blit(sheet, src, dst);
}

// ---------------------------------------------------------------------------
// Stars
// ---------------------------------------------------------------------------

const STAR_SIZE: f32 = 7.0;
const STAR_FRAMES: u32 = 6;
/// Sprite column used by the small, non-blinking stars
const SMALL_STAR_FRAME: u32 = 7;
const STAR_TICKS_PER_FRAME: u32 = 30;
const STAR_BLINK_PROBABILITY: f64 = 0.6;
const STAR_WRAP_MARGIN: f32 = 10.0;
const STAR_RESET_X: f32 = SCREEN_WIDTH + 32.0;

/// A parallax background star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    speed: f32,
    blinking: bool,
    frame: u32,
    animation_tick: u32,
}

impl Star {
    pub fn new(rng: &mut impl Rng, small: bool) -> Self {
        let (blinking, speed, frame) = if small {
            (false, rng.random_range(0.02f32..0.1), SMALL_STAR_FRAME)
        } else {
            (
                rng.random_bool(STAR_BLINK_PROBABILITY),
                rng.random_range(0.05f32..0.4),
                rng.random_range(0..STAR_FRAMES),
            )
        };
        let pos = Vec2::new(
            rng.random_range(0.0..SCREEN_WIDTH).floor(),
            rng.random_range(0.0..crate::consts::SCREEN_HEIGHT).floor(),
        );
        Self {
            pos,
            speed,
            blinking,
            frame,
            animation_tick: 0,
        }
    }

    /// Half as many large stars as small ones
    pub fn field(rng: &mut impl Rng, amount: usize) -> Vec<Star> {
        let large = (0..amount.div_ceil(2)).map(|_| Star::new(rng, false));
        let mut stars: Vec<Star> = large.collect();
        stars.extend((0..amount).map(|_| Star::new(rng, true)));
        stars
    }

    pub fn update(&mut self) {
        self.animation_tick = (self.animation_tick + 1) % STAR_TICKS_PER_FRAME;
        self.pos.x -= self.speed;
        if self.pos.x < -STAR_WRAP_MARGIN {
            self.pos.x = STAR_RESET_X;
        }
        if self.blinking && self.animation_tick == 0 {
            self.frame = (self.frame + 1) % STAR_FRAMES;
        }
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        let src = Rect::new(self.frame as f32 * STAR_SIZE, 0.0, STAR_SIZE, STAR_SIZE);
        blit_at(renderer, SpriteSheet::Stars, src, self.pos);
    }
}

// ---------------------------------------------------------------------------
// Angel power-up
// ---------------------------------------------------------------------------

/// Collectible that banks an extra jump
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Angel {
    pub x: f32,
    /// Rest height the oscillation centers on
    pub base_y: f32,
    pub y: f32,
    tick: u32,
}

impl Default for Angel {
    fn default() -> Self {
        Self {
            x: SCREEN_WIDTH,
            base_y: Self::DEFAULT_Y,
            y: Self::DEFAULT_Y,
            tick: 0,
        }
    }
}

impl Angel {
    pub const SIZE: f32 = 16.0;
    pub const HITBOX: f32 = 8.0;
    const DEFAULT_Y: f32 = 120.0;
    const AMPLITUDE: f32 = 2.0;
    const OSCILLATION_SPEED: f32 = 0.1;
    /// Gap between the angel and the tile it hovers over
    const FLOAT_HEIGHT: f32 = 5.0;

    /// Smaller hitbox centered in the sprite
    pub fn hitbox(&self) -> Rect {
        let inset = (Self::SIZE - Self::HITBOX) / 2.0;
        Rect::new(self.x + inset, self.y + inset, Self::HITBOX, Self::HITBOX)
    }

    pub fn update(&mut self, scroll_speed: f32) {
        self.x -= scroll_speed;
        self.tick += 1;
        self.y = (self.base_y
            + (self.tick as f32 * Self::OSCILLATION_SPEED).sin() * Self::AMPLITUDE)
            .round();
    }

    pub fn is_offscreen(&self) -> bool {
        self.x < -Self::SIZE
    }

    /// Hover over a random tile that has not scrolled into view yet
    pub fn reset(&mut self, tiles: &[Tile], rng: &mut impl Rng) {
        let eligible: Vec<&Tile> = tiles.iter().filter(|t| t.x > SCREEN_WIDTH).collect();

        if eligible.is_empty() {
            self.x = SCREEN_WIDTH + 64.0;
            self.base_y = Self::DEFAULT_Y;
        } else {
            let tile = eligible[rng.random_range(0..eligible.len())];
            self.x = tile.x + Tile::WIDTH / 2.0 - Self::SIZE / 2.0;
            self.base_y = tile.y - Self::SIZE - Self::FLOAT_HEIGHT;
        }
        self.y = self.base_y;
        self.tick = 0;
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        let src = Rect::new(0.0, 0.0, Self::SIZE, Self::SIZE);
        blit_at(renderer, SpriteSheet::Collectibles, src, Vec2::new(self.x, self.y));
    }
}

// ---------------------------------------------------------------------------
// Enemy
// ---------------------------------------------------------------------------

const ENEMY_LANE_MIN: f32 = 60.0;
const ENEMY_LANE_MAX: f32 = 130.0;
const ENEMY_FRAMES: u32 = 2;
const ENEMY_TICKS_PER_FRAME: u32 = 8;

/// A flyer that crosses the screen faster than the world scrolls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    /// Own speed on top of the scroll speed
    pub speed: f32,
    tick: u32,
    frame: u32,
}

impl Enemy {
    pub const SIZE: f32 = 16.0;

    pub fn new(rng: &mut impl Rng) -> Self {
        let mut enemy = Self {
            x: 0.0,
            y: 0.0,
            speed: 0.0,
            tick: 0,
            frame: 0,
        };
        enemy.recycle(rng);
        enemy
    }

    /// Send back past the right edge on a new lane
    pub fn recycle(&mut self, rng: &mut impl Rng) {
        self.x = SCREEN_WIDTH + rng.random_range(0.0..8.0 * TILE_SIZE).floor();
        self.y = rng.random_range(ENEMY_LANE_MIN..=ENEMY_LANE_MAX).floor();
        self.speed = rng.random_range(0.3f32..1.0);
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, Self::SIZE, Self::SIZE)
    }

    pub fn update(&mut self, scroll_speed: f32) {
        self.x -= scroll_speed + self.speed;
        self.tick = (self.tick + 1) % ENEMY_TICKS_PER_FRAME;
        if self.tick == 0 {
            self.frame = (self.frame + 1) % ENEMY_FRAMES;
        }
    }

    pub fn is_offscreen(&self) -> bool {
        self.x < -Self::SIZE
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        let src = Rect::new(self.frame as f32 * Self::SIZE, 0.0, Self::SIZE, Self::SIZE);
        blit_at(renderer, SpriteSheet::Enemy, src, Vec2::new(self.x, self.y));
    }
}

// ---------------------------------------------------------------------------
// Sparkle
// ---------------------------------------------------------------------------

const SPARKLE_FRAMES: u32 = 4;
const SPARKLE_TICKS_PER_FRAME: u32 = 5;

/// Short pickup effect that drifts with the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sparkle {
    pub pos: Vec2,
    tick: u32,
    frame: u32,
}

impl Sparkle {
    pub const SIZE: f32 = 8.0;

    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            tick: 0,
            frame: 0,
        }
    }

    /// Four sparkles around `center`
    pub fn burst(center: Vec2) -> Vec<Sparkle> {
        let half = Self::SIZE / 2.0;
        [(-6.0, -6.0), (6.0, -6.0), (-6.0, 6.0), (6.0, 6.0)]
            .into_iter()
            .map(|(dx, dy)| Sparkle::new(center + Vec2::new(dx - half, dy - half)))
            .collect()
    }

    pub fn update(&mut self, scroll_speed: f32) {
        self.pos.x -= scroll_speed;
        self.tick = (self.tick + 1) % SPARKLE_TICKS_PER_FRAME;
        if self.tick == 0 {
            self.frame += 1;
        }
    }

    /// Animation played out or scrolled away
    pub fn is_finished(&self) -> bool {
        self.frame >= SPARKLE_FRAMES || self.pos.x < -Self::SIZE
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        let frame = self.frame.min(SPARKLE_FRAMES - 1);
        let src = Rect::new(frame as f32 * Self::SIZE, 0.0, Self::SIZE, Self::SIZE);
        blit_at(renderer, SpriteSheet::Sparkle, src, self.pos);
    }
}

// ---------------------------------------------------------------------------
// Title
// ---------------------------------------------------------------------------

/// Title logo: plays its flash animation once, slides up when a run starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub x: f32,
    pub y: f32,
    tick: u32,
    frame: u32,
    done: bool,
}

impl Default for Title {
    fn default() -> Self {
        Self {
            x: Self::HOME_X,
            y: Self::HOME_Y,
            tick: 0,
            frame: 0,
            done: false,
        }
    }
}

impl Title {
    const HOME_X: f32 = 64.0;
    const HOME_Y: f32 = 64.0;
    const HIDDEN_Y: f32 = -32.0;
    const FRAME_WIDTH: f32 = 128.0;
    const FRAME_HEIGHT: f32 = 48.0;
    const FRAMES: u32 = 9;
    const TICKS_PER_FRAME: u32 = 6;
    const SLIDE_WEIGHT: f32 = 0.08;

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn flash(&mut self) {
        if self.done {
            return;
        }
        self.tick += 1;
        if self.tick >= Self::TICKS_PER_FRAME {
            self.tick = 0;
            self.frame += 1;
            if self.frame >= Self::FRAMES {
                self.frame = 0;
                self.done = true;
            }
        }
    }

    pub fn slide_out(&mut self) {
        self.y = lerp(self.y, Self::HIDDEN_Y, Self::SLIDE_WEIGHT);
    }

    pub fn is_hidden(&self) -> bool {
        self.y <= Self::HIDDEN_Y
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        let src = Rect::new(
            self.frame as f32 * Self::FRAME_WIDTH,
            0.0,
            Self::FRAME_WIDTH,
            Self::FRAME_HEIGHT,
        );
        blit_at(renderer, SpriteSheet::Title, src, Vec2::new(self.x, self.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::DrawRecorder;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_star_field_counts_and_wrap() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut stars = Star::field(&mut rng, 30);
        assert_eq!(stars.len(), 45);

        let star = &mut stars[0];
        star.pos.x = -10.5;
        star.update();
        assert_eq!(star.pos.x, STAR_RESET_X);
    }

    #[test]
    fn test_small_stars_never_blink() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut star = Star::new(&mut rng, true);
        for _ in 0..300 {
            star.update();
        }
        assert_eq!(star.frame, SMALL_STAR_FRAME);
    }

    #[test]
    fn test_angel_hitbox_centered() {
        let angel = Angel {
            x: 100.0,
            y: 50.0,
            ..Default::default()
        };
        assert_eq!(angel.hitbox(), Rect::new(104.0, 54.0, 8.0, 8.0));
    }

    #[test]
    fn test_angel_oscillates_around_base() {
        let mut angel = Angel::default();
        for _ in 0..100 {
            angel.update(1.0);
            assert!((angel.y - angel.base_y).abs() <= Angel::AMPLITUDE);
        }
        assert_eq!(angel.x, SCREEN_WIDTH - 100.0);
    }

    #[test]
    fn test_angel_reset_hovers_over_offscreen_tile() {
        let mut rng = Pcg32::seed_from_u64(2);
        let tiles = [Tile::new(100.0, 150.0), Tile::new(300.0, 140.0)];
        let mut angel = Angel::default();
        angel.reset(&tiles, &mut rng);
        assert_eq!(angel.x, 300.0);
        assert_eq!(angel.base_y, 140.0 - 16.0 - 5.0);
        assert_eq!(angel.y, angel.base_y);
    }

    #[test]
    fn test_angel_reset_fallback() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut angel = Angel::default();
        angel.reset(&[Tile::new(10.0, 150.0)], &mut rng);
        assert_eq!(angel.x, SCREEN_WIDTH + 64.0);
        assert_eq!(angel.base_y, 120.0);
    }

    #[test]
    fn test_enemy_recycles_offscreen_right() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut enemy = Enemy::new(&mut rng);
        assert!(enemy.x >= SCREEN_WIDTH);
        assert!(enemy.y >= ENEMY_LANE_MIN && enemy.y <= ENEMY_LANE_MAX);

        let speed = enemy.speed;
        let x = enemy.x;
        enemy.update(1.0);
        assert!((enemy.x - (x - 1.0 - speed)).abs() < 0.0001);

        enemy.x = -17.0;
        assert!(enemy.is_offscreen());
        enemy.recycle(&mut rng);
        assert!(!enemy.is_offscreen());
    }

    #[test]
    fn test_sparkle_finishes() {
        let mut sparkle = Sparkle::new(Vec2::new(100.0, 100.0));
        for _ in 0..SPARKLE_FRAMES * SPARKLE_TICKS_PER_FRAME - 1 {
            sparkle.update(0.0);
            assert!(!sparkle.is_finished());
        }
        sparkle.update(0.0);
        assert!(sparkle.is_finished());
    }

    #[test]
    fn test_sparkle_burst() {
        let burst = Sparkle::burst(Vec2::new(50.0, 50.0));
        assert_eq!(burst.len(), 4);
        assert_eq!(burst[0].pos, Vec2::new(40.0, 40.0));
    }

    #[test]
    fn test_title_flashes_once() {
        let mut title = Title::default();
        for _ in 0..Title::FRAMES * Title::TICKS_PER_FRAME {
            title.flash();
        }
        assert!(title.done);
        assert_eq!(title.frame, 0);
        title.flash();
        assert_eq!(title.tick, 0);
    }

    #[test]
    fn test_title_slides_out() {
        let mut title = Title::default();
        for _ in 0..200 {
            title.slide_out();
        }
        assert!(title.is_hidden());

        title.reset();
        assert_eq!(title, Title::default());
    }

    #[test]
    fn test_draw_rounds_positions() {
        let mut recorder = DrawRecorder::default();
        let angel = Angel {
            x: 99.6,
            y: 50.0,
            ..Default::default()
        };
        angel.draw(&mut recorder);
        assert_eq!(recorder.blits[0].dst, Rect::new(100.0, 50.0, 16.0, 16.0));
    }
}
