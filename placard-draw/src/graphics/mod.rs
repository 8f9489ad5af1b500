/// Sanitization and width units for text runs
pub mod text;

/// Font loading; the fontdue-backed metrics provider and renderer
pub mod typeface;

use std::path::PathBuf;

use palette::Srgba;
use serde::Deserialize;

use crate::config::DEFAULT_FONT_SIZE;
use crate::error::{DrawError, Result};

/// Resolved 8-bit color; everything we parse is fully opaque
pub type Color = Srgba<u8>;

pub const BLACK: Color = Srgba::new(0, 0, 0, 255);

/// Horizontal placement of a text block relative to its origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Font state read at layout time.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// `None` means the surface's fallback face
    pub path: Option<PathBuf>,
    pub size: f32,
    /// Multiplier on the font's natural line height; `None` behaves like `1.0`
    pub line_spacing: Option<f32>,
    pub alignment: Alignment,
}
impl FontSpec {
    pub fn with_size(size: f32) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn line_spacing(&self) -> f32 {
        self.line_spacing.unwrap_or(1.0)
    }
}
impl Default for FontSpec {
    fn default() -> Self {
        Self {
            path: None,
            size: DEFAULT_FONT_SIZE,
            line_spacing: None,
            alignment: Alignment::Left,
        }
    }
}

/// Cache key for a hex string: lowercase digits without the leading `#`
pub fn hex_key(hex: &str) -> String {
    let digits = hex.trim();
    digits.strip_prefix('#').unwrap_or(digits).to_ascii_lowercase()
}

/// Parses `#RGB` / `#RRGGBB`, with or without the leading `#`.
///
/// Six or more digits read the first six as `RRGGBB`. Three to five digits read the first
/// three, each nibble times 16 (so `#fff` is `f0f0f0`, not `ffffff`). Anything shorter is black.
pub fn parse_hex(hex: &str) -> Result<Color> {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    let invalid = || DrawError::InvalidColor(hex.to_owned());

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

    if !digits.is_ascii() {
        return Err(invalid());
    }
    let (r, g, b) = if digits.len() > 5 {
        (
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )
    } else if digits.len() > 2 {
        (
            channel(&digits[0..1])? * 16,
            channel(&digits[1..2])? * 16,
            channel(&digits[2..3])? * 16,
        )
    } else {
        (0, 0, 0)
    };

    Ok(Srgba::new(r, g, b, 255))
}

/// Converts into the pixel type of the canvas
pub fn to_rgba(color: Color) -> image::Rgba<u8> {
    let (r, g, b, a) = color.into_components();
    image::Rgba([r, g, b, a])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_digit_hex() {
        assert_eq!(parse_hex("#FF8000").unwrap(), Srgba::new(255, 128, 0, 255));
        assert_eq!(parse_hex("336699").unwrap(), Srgba::new(0x33, 0x66, 0x99, 255));
    }

    #[test]
    fn three_digit_hex_multiplies_nibbles() {
        assert_eq!(parse_hex("#fff").unwrap(), Srgba::new(240, 240, 240, 255));
        assert_eq!(parse_hex("a10").unwrap(), Srgba::new(160, 16, 0, 255));
    }

    #[test]
    fn short_hex_is_black() {
        assert_eq!(parse_hex("#f").unwrap(), BLACK);
        assert_eq!(parse_hex("").unwrap(), BLACK);
    }

    #[test]
    fn bad_digits_are_rejected() {
        assert!(matches!(parse_hex("#zzzzzz"), Err(DrawError::InvalidColor(_))));
        assert!(parse_hex("#ééé").is_err());
    }

    #[test]
    fn cache_keys_ignore_case_and_hash() {
        assert_eq!(hex_key("#FFFFFF"), "ffffff");
        assert_eq!(hex_key("ffffff"), "ffffff");
        assert_eq!(hex_key(" #AbC "), "abc");
    }
}
