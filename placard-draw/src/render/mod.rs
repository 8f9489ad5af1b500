/// Everything involving placing text on the canvas lives here.
pub mod text;

/// Fitting, cropping and blitting bitmaps
pub mod image;

/// Circular and rounded-corner alpha masks
pub mod mask;

#[cfg(test)]
pub(crate) mod blocks;

use std::collections::HashMap;

use ::image::{imageops, Pixel as _, Rgba, RgbaImage};

use crate::error::Result;
use crate::graphics::{self, Color, FontSpec};
use crate::layout::{Position, Size};

/// The raster surface everything is drawn onto.
///
/// Dimensions are fixed at creation. The canvas also owns the cache of colors resolved
/// against it, so two canvases never share color handles.
pub struct Canvas {
    pixels: RgbaImage,
    colors: HashMap<String, Color>,
}
impl Canvas {
    /// Blank canvas, fully transparent
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_image(RgbaImage::new(width, height))
    }

    pub fn from_image(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            colors: HashMap::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Gives up the pixel buffer; used by the encoder.
    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// Resolves a hex string, reusing an earlier resolution on this canvas if there was one.
    pub fn color(&mut self, hex: &str) -> Result<Color> {
        let key = graphics::hex_key(hex);
        if let Some(color) = self.colors.get(&key) {
            return Ok(*color);
        }
        let color = graphics::parse_hex(hex)?;
        self.colors.insert(key, color);
        Ok(color)
    }

    #[cfg(test)]
    fn cached_colors(&self) -> usize {
        self.colors.len()
    }

    pub fn fill(&mut self, color: Color) {
        let pixel = graphics::to_rgba(color);
        self.pixels.pixels_mut().for_each(|p| *p = pixel);
    }

    /// `None` outside the canvas
    pub fn get(&self, position: Position) -> Option<Rgba<u8>> {
        let (x, y) = self.index(position)?;
        Some(*self.pixels.get_pixel(x, y))
    }

    /// Alpha-blends `color` over the pixel, scaled by `coverage` (0 = untouched, 255 = full).
    pub fn blend(&mut self, position: Position, color: Color, coverage: u8) {
        if coverage == 0 {
            return;
        }
        if let Some((x, y)) = self.index(position) {
            let mut source = graphics::to_rgba(color);
            source[3] = ((source[3] as u16 * coverage as u16) / 255) as u8;
            self.pixels.get_pixel_mut(x, y).blend(&source);
        }
    }

    /// Copies `bitmap` onto the canvas at `position`, blending by the bitmap's alpha.
    /// Parts that fall outside the canvas are clipped.
    pub fn blit(&mut self, bitmap: &RgbaImage, position: Position) {
        imageops::overlay(
            &mut self.pixels,
            bitmap,
            position.x as i64,
            position.y as i64,
        );
    }

    #[inline]
    fn index(&self, position: Position) -> Option<(u32, u32)> {
        let x = u32::try_from(position.x).ok()?;
        let y = u32::try_from(position.y).ok()?;
        (x < self.width() && y < self.height()).then_some((x, y))
    }
}

/// Bounding box of a rendered block of text, relative to the origin passed to the renderer.
///
/// The origin is the left end of the first line's baseline; y grows downward,
/// so `min_y` is negative (the ascent) and `max_y` covers descent plus any further lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}
impl TextBounds {
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    /// The box moved to an absolute origin; handy for checking what a draw call may touch
    pub fn at(&self, origin: Position) -> TextBounds {
        TextBounds {
            min_x: self.min_x + origin.x,
            min_y: self.min_y + origin.y,
            max_x: self.max_x + origin.x,
            max_y: self.max_y + origin.y,
        }
    }
}

/// Measures strings the way the matching [`TextRenderer`] will draw them.
///
/// Multi-line strings (separated by `\n`) are measured as one block, honoring
/// [`FontSpec::line_spacing`].
pub trait FontMetrics {
    fn measure(&self, font: &FontSpec, text: &str) -> Result<TextBounds>;
}

/// Rasterizes text onto a canvas; `origin` is the left end of the first baseline.
pub trait TextRenderer: FontMetrics {
    fn draw_text(
        &self,
        canvas: &mut Canvas,
        font: &FontSpec,
        origin: Position,
        color: Color,
        text: &str,
    ) -> Result<()>;
}
