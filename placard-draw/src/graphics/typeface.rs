use std::path::{Path, PathBuf};
use std::rc::Rc;

use fontdb::{Database, Family, Query};
use fontdue::{Font as FontData, FontSettings};

use super::{Color, FontSpec};
use crate::error::{DrawError, Result};
use crate::layout::Position;
use crate::render::{Canvas, FontMetrics, TextBounds, TextRenderer};

/// Families preferred, in order, when no font file was configured.
/// The CJK faces come first since the line breaker is built around three-byte text.
const FALLBACK_FAMILIES: [Family<'static>; 5] = [
    Family::Name("Noto Sans CJK SC"),
    Family::Name("WenQuanYi Micro Hei"),
    Family::Name("Noto Sans"),
    Family::Name("DejaVu Sans"),
    Family::SansSerif,
];

/// Shipped with the crate so text works on hosts without any fonts installed
const BUNDLED_FONT: &[u8] = include_bytes!("../../../assets/DejaVuSans/DejaVuSans.ttf");

/// A loaded font file, measured and rasterized with `fontdue`.
///
/// This is the default [`FontMetrics`] / [`TextRenderer`] pair. There is no shaping:
/// glyphs are placed one after another by their advance widths.
pub struct Typeface {
    data: FontData,
    /// Where the face came from, for log messages
    origin: String,
}

/// Vertical metrics at a given size, already rounded to whole pixels
struct LineBox {
    ascent: i32,
    descent: i32,
    /// Baseline-to-baseline distance, line spacing included
    step: f32,
}

/// Where one glyph lands, relative to the block origin
struct GlyphBox {
    c: char,
    /// Top-left corner of the glyph bitmap
    left: i32,
    top: i32,
    width: usize,
    height: usize,
    /// Pen position after this glyph, relative to the start of its line
    pen: f32,
}

impl Typeface {
    pub fn from_bytes(bytes: &[u8], collection_index: u32, origin: impl Into<String>) -> Result<Self> {
        let settings = FontSettings {
            collection_index,
            ..FontSettings::default()
        };
        let data = FontData::from_bytes(bytes, settings).map_err(|e| DrawError::Font(e.to_owned()))?;
        Ok(Self {
            data,
            origin: origin.into(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DrawError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes, 0, path.display().to_string())
    }

    /// DejaVu Sans, compiled into the binary
    pub fn bundled() -> Result<Self> {
        Self::from_bytes(BUNDLED_FONT, 0, "bundled DejaVu Sans")
    }

    /// Picks one of [`FALLBACK_FAMILIES`] from the fonts installed on this machine.
    pub fn system_default() -> Result<Self> {
        let mut db = Database::new();
        db.load_system_fonts();

        let id = FALLBACK_FAMILIES
            .iter()
            .find_map(|family| {
                db.query(&Query {
                    families: std::slice::from_ref(family),
                    ..Default::default()
                })
            })
            .ok_or_else(|| DrawError::Font("no preferred system font installed".to_owned()))?;

        let origin = db
            .face(id)
            .map(|face| face.post_script_name.clone())
            .unwrap_or_default();
        log::debug!("falling back to system font {origin}");

        db.with_face_data(id, |bytes, index| Self::from_bytes(bytes, index, origin))
            .ok_or_else(|| DrawError::Font("system font face vanished".to_owned()))?
    }

    /// A preferred system face if there is one, the bundled face otherwise
    pub fn fallback() -> Result<Self> {
        Self::system_default().or_else(|err| {
            log::debug!("{err}, using the bundled font");
            Self::bundled()
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn line_box(&self, font: &FontSpec) -> LineBox {
        let size = font.size;
        // Fonts without horizontal metrics get a plain em box
        let (ascent, descent, height) = self
            .data
            .horizontal_line_metrics(size)
            .map(|m| (m.ascent, -m.descent, m.new_line_size))
            .unwrap_or((size, 0.0, size));
        LineBox {
            ascent: ascent.ceil() as i32,
            descent: descent.ceil() as i32,
            step: height * font.line_spacing(),
        }
    }

    /// Lays out every glyph of `text` against an origin of `(0, 0)`.
    /// Measuring and drawing both go through here, so the measured box covers every drawn pixel.
    fn glyphs<'a>(&'a self, font: &'a FontSpec, text: &'a str) -> impl Iterator<Item = GlyphBox> + 'a {
        let step = self.line_box(font).step;
        text.split('\n').enumerate().flat_map(move |(row, line)| {
            let baseline = (row as f32 * step).round() as i32;
            line.chars().scan(0f32, move |pen, c| {
                let metrics = self.data.metrics(c, font.size);
                // `ymin` is the offset from the baseline to the bottom of the bitmap, upward positive
                let glyph = GlyphBox {
                    c,
                    left: pen.round() as i32 + metrics.xmin,
                    top: baseline - (metrics.ymin + metrics.height as i32),
                    width: metrics.width,
                    height: metrics.height,
                    pen: *pen + metrics.advance_width,
                };
                *pen = glyph.pen;
                Some(glyph)
            })
        })
    }
}

impl FontMetrics for Typeface {
    /// Advance box (line metrics and advance widths) grown to include any ink outside it,
    /// such as negative left bearings and overhanging italics.
    fn measure(&self, font: &FontSpec, text: &str) -> Result<TextBounds> {
        let line_box = self.line_box(font);
        let lines = text.split('\n').count();

        let mut bounds = TextBounds {
            min_x: 0,
            min_y: -line_box.ascent,
            max_x: 0,
            max_y: line_box.descent + ((lines - 1) as f32 * line_box.step).round() as i32,
        };
        for glyph in self.glyphs(font, text) {
            bounds.max_x = bounds.max_x.max(glyph.pen.ceil() as i32);
            if glyph.width == 0 || glyph.height == 0 {
                continue;
            }
            bounds.min_x = bounds.min_x.min(glyph.left);
            bounds.max_x = bounds.max_x.max(glyph.left + glyph.width as i32);
            bounds.min_y = bounds.min_y.min(glyph.top);
            bounds.max_y = bounds.max_y.max(glyph.top + glyph.height as i32);
        }
        Ok(bounds)
    }
}

impl TextRenderer for Typeface {
    fn draw_text(
        &self,
        canvas: &mut Canvas,
        font: &FontSpec,
        origin: Position,
        color: Color,
        text: &str,
    ) -> Result<()> {
        for glyph in self.glyphs(font, text) {
            if glyph.width == 0 {
                continue;
            }
            let (_, coverage) = self.data.rasterize(glyph.c, font.size);
            let left = origin.x + glyph.left;
            let top = origin.y + glyph.top;
            for (i, &value) in coverage.iter().enumerate() {
                let x = (i % glyph.width) as i32;
                let y = (i / glyph.width) as i32;
                canvas.blend(Position::new(left + x, top + y), color, value);
            }
        }
        Ok(())
    }
}

/// Where a surface gets its faces from; loaded faces are kept for the surface's lifetime.
#[derive(Default)]
pub struct FontBook {
    loaded: Vec<(PathBuf, Rc<Typeface>)>,
    fallback: Option<Rc<Typeface>>,
}
impl FontBook {
    /// The face for `path`, or the fallback face for `None`.
    /// `default_font` is consulted before the system database and the bundled face.
    pub fn get(
        &mut self,
        path: Option<&Path>,
        default_font: Option<&Path>,
    ) -> Result<Rc<Typeface>> {
        match path.or(default_font) {
            Some(path) => {
                if let Some((_, face)) = self.loaded.iter().find(|(p, _)| p == path) {
                    return Ok(face.clone());
                }
                let face = Rc::new(Typeface::load(path)?);
                log::debug!("loaded font {}", face.origin());
                self.loaded.push((path.to_path_buf(), face.clone()));
                Ok(face)
            }
            None => {
                if let Some(face) = &self.fallback {
                    return Ok(face.clone());
                }
                let face = Rc::new(Typeface::fallback()?);
                self.fallback = Some(face.clone());
                Ok(face)
            }
        }
    }
}
