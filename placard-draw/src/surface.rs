//! The drawing surface callers compose a poster on.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use serde::Deserialize;

use crate::config::DrawConfig;
use crate::error::{DrawError, Result};
use crate::graphics::typeface::FontBook;
use crate::graphics::{text, Alignment, Color, FontSpec, BLACK};
use crate::layout::{wrap, Position, Rect};
use crate::loader::BitmapLoader;
use crate::render::image::{self as bitmap, Fit, Flip};
use crate::render::text::{self as typeset, TextBox, VerticalAnchor};
use crate::render::{mask, Canvas, TextRenderer};

/// Several text settings at once. Unset fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextParams {
    pub font: Option<PathBuf>,
    pub size: Option<f32>,
    pub color: Option<String>,
    pub line_spacing: Option<f32>,
    pub alignment: Option<Alignment>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    pub fit: Fit,
    pub flip: Option<Flip>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

/// A canvas plus the text state every subsequent draw call reads.
///
/// Setters return `&mut Self` so calls can be chained; anything that can fail returns
/// `Result<&mut Self>` instead. A failed call leaves the canvas as it was.
pub struct DrawSurface {
    canvas: Canvas,
    font: FontSpec,
    color: Color,
    config: DrawConfig,
    faces: FontBook,
    /// Replaces the font book for every text call when set
    face: Option<Rc<dyn TextRenderer>>,
    loader: BitmapLoader,
}

impl DrawSurface {
    fn new(canvas: Canvas, config: DrawConfig, loader: BitmapLoader) -> Self {
        Self {
            canvas,
            font: FontSpec::with_size(config.default_size),
            color: BLACK,
            faces: FontBook::default(),
            face: None,
            loader,
            config,
        }
    }

    /// Blank `width` x `height` canvas filled with `hex`
    pub fn with_color(width: u32, height: u32, hex: &str, config: DrawConfig) -> Result<Self> {
        let mut canvas = Canvas::new(width, height);
        let fill = canvas.color(hex)?;
        canvas.fill(fill);
        log::debug!("new {width}x{height} surface filled with {hex}");
        let loader = BitmapLoader::new(config.fetch.clone());
        Ok(Self::new(canvas, config, loader))
    }

    /// Canvas sized and initialized from an image file or URL.
    /// Text color and line spacing start from their defaults.
    pub fn with_background(source: &str, config: DrawConfig) -> Result<Self> {
        let loader = BitmapLoader::new(config.fetch.clone());
        let background = loader.load(source)?;
        log::debug!(
            "new {}x{} surface from {source}",
            background.width(),
            background.height()
        );
        Ok(Self::new(Canvas::from_image(background), config, loader))
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Switches to the font file at `path`. A path that is not a file is ignored.
    pub fn set_font(&mut self, path: impl AsRef<Path>) -> &mut Self {
        let path = path.as_ref();
        if !path.is_file() {
            log::warn!("font {} not found, keeping the current one", path.display());
            return self;
        }
        self.font.path = Some(path.to_path_buf());
        self.face = None;
        self
    }

    pub fn set_size(&mut self, size: f32) -> &mut Self {
        self.font.size = size;
        self
    }

    pub fn set_color(&mut self, hex: &str) -> Result<&mut Self> {
        self.color = self.canvas.color(hex)?;
        Ok(self)
    }

    pub fn set_line_spacing(&mut self, spacing: f32) -> &mut Self {
        self.font.line_spacing = Some(spacing);
        self
    }

    pub fn set_alignment(&mut self, alignment: Alignment) -> &mut Self {
        self.font.alignment = alignment;
        self
    }

    /// Applies every field of `params` that is set. The color is parsed first, so a bad
    /// color leaves all settings untouched.
    pub fn set_text_params(&mut self, params: &TextParams) -> Result<&mut Self> {
        if let Some(hex) = &params.color {
            self.set_color(hex)?;
        }
        if let Some(path) = &params.font {
            self.set_font(path);
        }
        if let Some(size) = params.size {
            self.set_size(size);
        }
        if let Some(spacing) = params.line_spacing {
            self.set_line_spacing(spacing);
        }
        if let Some(alignment) = params.alignment {
            self.set_alignment(alignment);
        }
        Ok(self)
    }

    /// Uses `face` for measuring and drawing text until the next [`set_font`](Self::set_font)
    pub fn set_face(&mut self, face: Rc<dyn TextRenderer>) -> &mut Self {
        self.face = Some(face);
        self
    }

    fn renderer(&mut self) -> Result<Rc<dyn TextRenderer>> {
        if let Some(face) = &self.face {
            return Ok(face.clone());
        }
        let face: Rc<dyn TextRenderer> = self
            .faces
            .get(self.font.path.as_deref(), self.config.default_font.as_deref())?;
        Ok(face)
    }

    /// Wraps `raw` to the box width (the canvas width by default) and draws it.
    pub fn add_text(&mut self, raw: &str, target: TextBox) -> Result<&mut Self> {
        if text::sanitize(raw).is_empty() {
            return Ok(self);
        }
        let renderer = self.renderer()?;
        let width = target.width.unwrap_or(self.canvas.width());
        let lines = wrap::wrap(&*renderer, &self.font, raw, width, target.max_lines)?;
        let placed = typeset::place(
            &mut self.canvas,
            &*renderer,
            &self.font,
            &lines,
            Position::new(target.x, target.y),
            width,
            self.color,
        )?;
        log::trace!("text {:?} placed at {placed:?}", lines.lines);
        Ok(self)
    }

    pub fn add_vertical_text(
        &mut self,
        raw: &str,
        x: i32,
        y: i32,
        anchor: VerticalAnchor,
    ) -> Result<&mut Self> {
        if text::sanitize(raw).is_empty() {
            return Ok(self);
        }
        let renderer = self.renderer()?;
        typeset::place_vertical(
            &mut self.canvas,
            &*renderer,
            &self.font,
            raw,
            Position::new(x, y),
            anchor,
            self.color,
        )?;
        Ok(self)
    }

    /// Loads `source`, fits it to `dest`, optionally flips it and blends it in.
    pub fn add_image(&mut self, source: &str, dest: Rect, options: ImageOptions) -> Result<&mut Self> {
        let loaded = self.loader.load(source)?;
        let placed = bitmap::composite(
            &mut self.canvas,
            loaded,
            dest,
            options.fit,
            options.flip,
            self.config.portrait_bias,
        );
        log::trace!("{source} placed at {placed:?}");
        Ok(self)
    }

    /// `source` cropped to `dest` and clipped to a circle
    pub fn add_round_image(&mut self, source: &str, dest: Rect) -> Result<&mut Self> {
        let loaded = self.loader.load(source)?;
        if dest.is_empty() {
            return Ok(self);
        }
        let cropped = bitmap::edge_crop(&loaded, dest.width, dest.height, self.config.portrait_bias);
        bitmap::blit_letterboxed(&mut self.canvas, &mask::circular(&cropped), dest);
        Ok(self)
    }

    /// `source` cropped to `dest` with its top corners rounded by `radius`
    pub fn add_radius_image(&mut self, source: &str, radius: u32, dest: Rect) -> Result<&mut Self> {
        let loaded = self.loader.load(source)?;
        if dest.is_empty() {
            return Ok(self);
        }
        let cropped = bitmap::edge_crop(&loaded, dest.width, dest.height, self.config.portrait_bias);
        bitmap::blit_letterboxed(&mut self.canvas, &mask::rounded_corners(cropped, radius), dest);
        Ok(self)
    }

    pub fn into_png(self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.canvas
            .into_image()
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(DrawError::Encode)?;
        Ok(bytes)
    }

    /// JPEG has no alpha channel, so transparency is dropped.
    pub fn into_jpeg(self, quality: u8) -> Result<Vec<u8>> {
        let rgb = DynamicImage::ImageRgba8(self.canvas.into_image()).to_rgb8();
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
            .encode_image(&rgb)
            .map_err(DrawError::Encode)?;
        Ok(bytes)
    }

    /// Encodes with the configured JPEG quality where it applies
    pub fn encode(self, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Png => self.into_png(),
            OutputFormat::Jpeg => {
                let quality = self.config.jpeg_quality;
                self.into_jpeg(quality)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::blocks::Blocks;
    use image::{Rgba, RgbaImage};

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn white(width: u32, height: u32) -> DrawSurface {
        let mut surface = DrawSurface::with_color(width, height, "#ffffff", DrawConfig::default()).unwrap();
        surface.set_face(Rc::new(Blocks));
        surface
    }

    fn count(surface: &DrawSurface, pixel: Rgba<u8>) -> usize {
        surface.canvas().pixels().pixels().filter(|p| **p == pixel).count()
    }

    #[test]
    fn background_color_fills_the_canvas() {
        let surface = white(20, 10);
        assert_eq!(surface.canvas().size().width, 20);
        assert_eq!(count(&surface, WHITE), 200);
        assert_eq!(surface.color(), BLACK);
    }

    #[test]
    fn bad_color_is_rejected_and_keeps_the_old_one() {
        let mut surface = white(4, 4);
        assert!(matches!(surface.set_color("#zzzzzz"), Err(DrawError::InvalidColor(_))));
        assert_eq!(surface.color(), BLACK);
    }

    #[test]
    fn missing_font_is_ignored() {
        let mut surface = white(4, 4);
        surface.set_font("/no/such/font.ttf");
        assert!(surface.font().path.is_none());
    }

    #[test]
    fn text_params_apply_together() {
        let mut surface = white(4, 4);
        let params: TextParams = serde_json::from_str(
            r##"{ "size": 30, "color": "#f00", "line_spacing": 1.5, "alignment": "center" }"##,
        )
        .unwrap();
        surface.set_text_params(&params).unwrap();
        assert_eq!(surface.font().size, 30.0);
        assert_eq!(surface.font().line_spacing(), 1.5);
        assert_eq!(surface.font().alignment, Alignment::Center);
        assert_eq!(surface.color(), Color::new(240, 0, 0, 255));
    }

    #[test]
    fn text_defaults_to_canvas_width() {
        let mut surface = white(40, 60);
        // 5 units fit in 40px, so "ABCDEFG" wraps onto a second line
        surface.add_text("ABCDEFG", TextBox::at(0, 20)).unwrap();
        let black = Rgba([0, 0, 0, 255]);
        assert_eq!(surface.canvas().get(Position::new(39, 15)), Some(black));
        assert_eq!(surface.canvas().get(Position::new(8, 27)), Some(black));
        assert_eq!(surface.canvas().get(Position::new(16, 27)), Some(WHITE));
    }

    #[test]
    fn empty_text_needs_no_font() {
        let mut surface =
            DrawSurface::with_color(10, 10, "#ffffff", DrawConfig::default()).unwrap();
        surface.add_text("\n", TextBox::at(0, 5)).unwrap();
        surface.add_vertical_text("", 0, 5, VerticalAnchor::Top).unwrap();
        assert_eq!(count(&surface, WHITE), 100);
    }

    #[test]
    fn missing_image_aborts_the_call() {
        let mut surface = white(10, 10);
        let err = surface
            .add_image("/no/such.png", Rect::new(0, 0, 10, 10), ImageOptions::default())
            .err()
            .unwrap();
        assert!(matches!(err, DrawError::NotFound { .. }));
        assert_eq!(count(&surface, WHITE), 100);
    }

    #[test]
    fn flipped_stretch_lands_mirrored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("halves.png");
        RgbaImage::from_fn(2, 1, |x, _| if x == 0 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) })
            .save(&path)
            .unwrap();

        let mut surface = white(20, 10);
        let options = ImageOptions {
            fit: Fit::Stretch,
            flip: Some(Flip::Horizontal),
        };
        surface
            .add_image(path.to_str().unwrap(), Rect::new(0, 0, 20, 10), options)
            .unwrap();
        assert_eq!(surface.canvas().get(Position::new(0, 5)), Some(Rgba([0, 0, 255, 255])));
        assert_eq!(surface.canvas().get(Position::new(19, 5)), Some(Rgba([255, 0, 0, 255])));
    }

    #[test]
    fn jpeg_drops_alpha() {
        let surface = white(8, 8);
        let bytes = surface.into_jpeg(90).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 8));
        assert!(!decoded.color().has_alpha());
    }
}
