use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use placard::graphics::typeface::Typeface;
use placard::{DrawConfig, DrawSurface};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// The face compiled into the crate, as a file callers could point `set_font` at
pub fn bundled_font() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../assets/DejaVuSans/DejaVuSans.ttf")
}

pub fn bundled_face() -> Typeface {
    Typeface::load(&bundled_font()).unwrap()
}

pub fn white_surface(width: u32, height: u32) -> DrawSurface {
    let mut surface =
        DrawSurface::with_color(width, height, "#ffffff", DrawConfig::default()).unwrap();
    surface.set_font(bundled_font());
    surface
}

pub fn write_png(dir: &Path, name: &str, image: &RgbaImage) -> PathBuf {
    let path = dir.join(name);
    image.save(&path).unwrap();
    path
}

/// Pixels that differ between two same-sized images
pub fn changed(before: &RgbaImage, after: &RgbaImage) -> Vec<(u32, u32)> {
    before
        .enumerate_pixels()
        .filter(|(x, y, pixel)| after.get_pixel(*x, *y) != *pixel)
        .map(|(x, y, _)| (x, y))
        .collect()
}
