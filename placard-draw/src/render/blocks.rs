use super::{Canvas, FontMetrics, TextBounds, TextRenderer};
use crate::error::Result;
use crate::graphics::{text, Color, FontSpec};
use crate::layout::Position;

/// Monospace stand-in: every unit is 8px wide, ascent 10, descent 2, lines 12px apart.
/// Glyphs are drawn as solid boxes so tests can see exactly where text went.
pub struct Blocks;

impl FontMetrics for Blocks {
    fn measure(&self, font: &FontSpec, block: &str) -> Result<TextBounds> {
        let lines: Vec<&str> = block.split('\n').collect();
        let widest = lines.iter().map(|l| text::units(l)).max().unwrap_or(0);
        let step = (12.0 * font.line_spacing()) as i32;
        Ok(TextBounds {
            min_x: 0,
            min_y: -10,
            max_x: widest as i32 * 8,
            max_y: 2 + (lines.len() as i32 - 1) * step,
        })
    }
}

impl TextRenderer for Blocks {
    fn draw_text(
        &self,
        canvas: &mut Canvas,
        font: &FontSpec,
        origin: Position,
        color: Color,
        block: &str,
    ) -> Result<()> {
        let step = (12.0 * font.line_spacing()) as i32;
        for (row, line) in block.split('\n').enumerate() {
            let baseline = origin.y + row as i32 * step;
            for y in baseline - 10..baseline + 2 {
                for x in origin.x..origin.x + text::units(line) as i32 * 8 {
                    canvas.blend(Position::new(x, y), color, 255);
                }
            }
        }
        Ok(())
    }
}
