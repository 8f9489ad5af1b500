/// Surface-wide settings
pub mod config;

pub mod error;

/// Graphics primitives, such as typeface and color
pub mod graphics;

/// Geometry and line breaking
pub mod layout;

/// Reading source images from disk or the network
pub mod loader;

/// Rendering engine implementation
pub mod render;

pub mod surface;

pub use config::{DrawConfig, FetchPolicy};
pub use error::{DrawError, Result};
pub use graphics::{Alignment, Color, FontSpec};
pub use layout::Rect;
pub use render::image::{Fit, Flip};
pub use render::text::{TextBox, VerticalAnchor};
pub use render::{FontMetrics, TextRenderer};
pub use surface::{DrawSurface, ImageOptions, OutputFormat, TextParams};
