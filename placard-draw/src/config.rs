use std::path::PathBuf;

use serde::Deserialize;

/// Default pixel size for text when nothing else is set
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Vertical sources are cropped from `(height - width) / PORTRAIT_BIAS` instead of the middle,
/// which keeps the upper part of tall images (faces, mostly).
pub const PORTRAIT_BIAS: f32 = 2.5;

/// Knobs shared by a [`DrawSurface`](crate::surface::DrawSurface) for its whole lifetime.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Font used when no font has been set on the surface.
    /// `None` falls back to a sans-serif face from the system font database.
    pub default_font: Option<PathBuf>,
    pub default_size: f32,
    pub portrait_bias: f32,
    pub jpeg_quality: u8,
    pub fetch: FetchPolicy,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            default_font: None,
            default_size: DEFAULT_FONT_SIZE,
            portrait_bias: PORTRAIT_BIAS,
            jpeg_quality: 75,
            fetch: FetchPolicy::default(),
        }
    }
}

/// How remote (`http`-prefixed) image sources are fetched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FetchPolicy {
    /// Skip TLS certificate validation. Off unless explicitly asked for.
    pub accept_invalid_certs: bool,
}
