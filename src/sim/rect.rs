//! Axis-aligned rectangles and overlap detection
//!
//! Every hitbox in the game (player, tiles, angel, enemies) is an AABB in
//! screen-pixel space with its origin at the top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Result of an AABB overlap test
///
/// `overlap` and `direction` are only meaningful when `collided` is set.
/// `direction` is the sign of the center delta from `b` to `a` per axis, so
/// pushing `a` by `direction * overlap` along one axis separates the pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    pub collided: bool,
    pub overlap_x: f32,
    pub overlap_y: f32,
    pub direction_x: f32,
    pub direction_y: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            collided: false,
            overlap_x: 0.0,
            overlap_y: 0.0,
            direction_x: 0.0,
            direction_y: 0.0,
        }
    }

    /// Minimum translation vector that moves `a` out of `b`
    pub fn mtv(&self) -> Vec2 {
        if !self.collided {
            return Vec2::ZERO;
        }
        if self.overlap_x < self.overlap_y {
            Vec2::new(self.overlap_x * self.direction_x, 0.0)
        } else {
            Vec2::new(0.0, self.overlap_y * self.direction_y)
        }
    }
}

/// Check overlap between two rectangles
///
/// Compares the center-to-center delta against the combined half extents.
/// Rectangles that exactly touch on an edge do not collide.
pub fn check_collision(a: &Rect, b: &Rect) -> CollisionResult {
    let delta = a.center() - b.center();
    let half = (a.size() + b.size()) / 2.0;

    if delta.x.abs() < half.x && delta.y.abs() < half.y {
        CollisionResult {
            collided: true,
            overlap_x: half.x - delta.x.abs(),
            overlap_y: half.y - delta.y.abs(),
            direction_x: sign(delta.x),
            direction_y: sign(delta.y),
        }
    } else {
        CollisionResult::miss()
    }
}

/// Sign with 0 for 0 (unlike `f32::signum`, which gives 1 for +0.0)
#[inline]
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
