//! Platform abstraction layer
//!
//! The game draws through two sinks supplied by the host:
//! - [`Renderer`]: sprite-sheet blits (source rect → destination rect)
//! - [`TextOutput`]: bitmap-font text with optional centering
//!
//! [`DrawRecorder`] implements both by recording calls; the headless runner
//! and the tests use it.

use serde::{Deserialize, Serialize};

use crate::consts::{GLYPH_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::Rect;

/// Sprite sheets the game blits from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteSheet {
    Player,
    Tiles,
    Stars,
    Collectibles,
    Enemy,
    Sparkle,
    Title,
}

/// Sprite blit sink
pub trait Renderer {
    /// Start a new frame
    fn clear(&mut self);
    /// Copy `src` from `sheet` to `dst` on screen (whole pixels)
    fn blit(&mut self, sheet: SpriteSheet, src: Rect, dst: Rect);
}

/// Horizontal text placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TextX {
    At(f32),
    Center,
}

/// Vertical text placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TextY {
    At(f32),
    Middle,
}

/// Bitmap-font text sink
pub trait TextOutput {
    fn print(&mut self, text: &str, x: TextX, y: TextY);
}

/// Resolve a text placement to a top-left screen position
pub fn text_origin(text: &str, x: TextX, y: TextY) -> (f32, f32) {
    let x = match x {
        TextX::At(x) => x,
        TextX::Center => SCREEN_WIDTH / 2.0 - (text.chars().count() as f32 * GLYPH_WIDTH) / 2.0,
    };
    let y = match y {
        TextY::At(y) => y,
        TextY::Middle => SCREEN_HEIGHT / 2.0 - GLYPH_WIDTH / 2.0,
    };
    (x, y)
}

/// One recorded blit
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub sheet: SpriteSheet,
    pub src: Rect,
    pub dst: Rect,
}

/// Records draw calls instead of drawing
#[derive(Debug, Clone, Default)]
pub struct DrawRecorder {
    pub frames: u64,
    pub blits: Vec<DrawCall>,
    /// Printed lines with their resolved top-left position
    pub texts: Vec<(String, f32, f32)>,
}

impl DrawRecorder {
    /// Blits from a given sheet in the current frame
    pub fn count(&self, sheet: SpriteSheet) -> usize {
        self.blits.iter().filter(|call| call.sheet == sheet).count()
    }

    /// Whether any printed line contains `needle`
    pub fn printed(&self, needle: &str) -> bool {
        self.texts.iter().any(|(text, _, _)| text.contains(needle))
    }
}

impl Renderer for DrawRecorder {
    fn clear(&mut self) {
        self.frames += 1;
        self.blits.clear();
        self.texts.clear();
    }

    fn blit(&mut self, sheet: SpriteSheet, src: Rect, dst: Rect) {
        self.blits.push(DrawCall { sheet, src, dst });
    }
}

impl TextOutput for DrawRecorder {
    fn print(&mut self, text: &str, x: TextX, y: TextY) {
        let (x, y) = text_origin(text, x, y);
        self.texts.push((text.to_string(), x, y));
    }
}
