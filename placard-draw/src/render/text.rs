use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;

use super::{Canvas, FontMetrics, TextBounds, TextRenderer};
use crate::error::Result;
use crate::graphics::{text, Alignment, Color, FontSpec};
use crate::layout::wrap::Wrapped;
use crate::layout::Position;

/// Default line limit for [`TextBox`]
pub const DEFAULT_MAX_LINES: usize = 2;

/// Where horizontal text goes.
/// `(x, y)` is the left end of the first line's baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TextBox {
    pub x: i32,
    pub y: i32,
    /// Wrapping width; `None` takes the canvas width
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
}
impl TextBox {
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            width: None,
            max_lines: DEFAULT_MAX_LINES,
        }
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }
}

fn default_max_lines() -> usize {
    DEFAULT_MAX_LINES
}

/// How a column of vertical text sits relative to its origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    /// The origin is the first glyph's baseline
    #[default]
    Top,
    /// Centered within a column of this height starting at the origin
    Center(u32),
    /// The whole column sits above the origin
    Bottom,
}

/// Draws already-wrapped lines as one block.
///
/// All lines go to the renderer in a single call so line spacing is the renderer's business.
/// Alignment moves the origin:
/// - `Left` leaves it alone,
/// - `Right` moves it left by the width of the text *before* wrapping,
/// - `Center` centers the wrapped block within `bounding_width`, re-measuring after wrapping.
///
/// Returns where the block ended up, or `None` if there was nothing to draw.
pub fn place(
    canvas: &mut Canvas,
    renderer: &dyn TextRenderer,
    font: &FontSpec,
    wrapped: &Wrapped,
    origin: Position,
    bounding_width: u32,
    color: Color,
) -> Result<Option<TextBounds>> {
    if wrapped.is_empty() {
        return Ok(None);
    }
    let block = wrapped.joined();
    let bounds = renderer.measure(font, &block)?;
    if bounds.width() == 0 {
        return Ok(None);
    }

    let mut origin = origin;
    match font.alignment {
        Alignment::Left => {}
        Alignment::Right => origin.x -= wrapped.measured.width(),
        Alignment::Center => origin.x += (bounding_width as i32 - bounds.width()) / 2,
    }

    renderer.draw_text(canvas, font, origin, color, &block)?;
    Ok(Some(bounds.at(origin)))
}

/// Draws `raw` top to bottom, one grapheme per line.
///
/// The glyphs are stacked using the font's own line advance (times the line spacing).
/// Alignment is ignored; the column always starts at `origin.x`.
pub fn place_vertical(
    canvas: &mut Canvas,
    renderer: &dyn TextRenderer,
    font: &FontSpec,
    raw: &str,
    origin: Position,
    anchor: VerticalAnchor,
    color: Color,
) -> Result<Option<TextBounds>> {
    let sanitized = text::sanitize(raw);
    if sanitized.is_empty() {
        return Ok(None);
    }
    let column = sanitized.graphemes(true).collect::<Vec<_>>().join("\n");

    let bounds = renderer.measure(font, &column)?;
    if bounds.width() == 0 {
        return Ok(None);
    }

    let mut origin = origin;
    match anchor {
        VerticalAnchor::Top => {}
        VerticalAnchor::Center(height) => origin.y += (height as i32 - bounds.height()) / 2,
        VerticalAnchor::Bottom => origin.y -= bounds.height(),
    }

    renderer.draw_text(canvas, font, origin, color, &column)?;
    Ok(Some(bounds.at(origin)))
}
