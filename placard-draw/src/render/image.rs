use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::Deserialize;

use super::Canvas;
use crate::layout::{self, Rect, Size};

/// Resampling used on the final blit
const QUALITY: FilterType = FilterType::Triangle;

/// Resampling for intermediate copies that get filtered again on the way to the canvas
const FAST: FilterType = FilterType::Nearest;

/// How a bitmap is made to fit its destination box
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    /// Shrink to fit inside, keeping the aspect ratio; never enlarge
    #[default]
    Contain,
    /// Square crop (see [`layout::square_crop`]) resampled to exactly fill the box
    Cover,
    /// Resample the whole image to the box, ignoring its aspect ratio
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flip {
    Horizontal,
    Vertical,
    Both,
}

fn size_of(bitmap: &RgbaImage) -> Size {
    Size {
        width: bitmap.width(),
        height: bitmap.height(),
    }
}

pub fn flip(bitmap: &mut RgbaImage, flip: Flip) {
    match flip {
        Flip::Horizontal => imageops::flip_horizontal_in_place(bitmap),
        Flip::Vertical => imageops::flip_vertical_in_place(bitmap),
        Flip::Both => imageops::rotate180_in_place(bitmap),
    }
}

fn crop_to(
    bitmap: &RgbaImage,
    width: u32,
    height: u32,
    portrait_bias: f32,
    filter: FilterType,
) -> RgbaImage {
    if bitmap.width() == 0 || bitmap.height() == 0 {
        return RgbaImage::new(width, height);
    }
    let region = layout::square_crop(size_of(bitmap), portrait_bias);
    let square = imageops::crop_imm(
        bitmap,
        region.x as u32,
        region.y as u32,
        region.width,
        region.height,
    )
    .to_image();
    imageops::resize(&square, width, height, filter)
}

/// Square crop resampled to exactly `width` x `height` with the quality filter. May enlarge.
pub fn cover(bitmap: &RgbaImage, width: u32, height: u32, portrait_bias: f32) -> RgbaImage {
    crop_to(bitmap, width, height, portrait_bias, QUALITY)
}

/// Same crop as [`cover`], resampled with nearest-neighbour.
/// Meant as the step before masking; the masked result is filtered again when blitted.
pub fn edge_crop(bitmap: &RgbaImage, width: u32, height: u32, portrait_bias: f32) -> RgbaImage {
    crop_to(bitmap, width, height, portrait_bias, FAST)
}

/// The whole bitmap squeezed to `width` x `height`
pub fn stretch(bitmap: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if bitmap.width() == 0 || bitmap.height() == 0 {
        return RgbaImage::new(width, height);
    }
    imageops::resize(bitmap, width, height, FAST)
}

/// Reshapes `bitmap` for a `width` x `height` box according to `fit`.
/// `Contain` leaves it as it is; the letterboxing happens at blit time.
pub fn apply_fit(
    bitmap: RgbaImage,
    width: u32,
    height: u32,
    fit: Fit,
    portrait_bias: f32,
) -> RgbaImage {
    match fit {
        Fit::Contain => bitmap,
        Fit::Cover => cover(&bitmap, width, height, portrait_bias),
        Fit::Stretch => stretch(&bitmap, width, height),
    }
}

/// Applies `fit`, then the flip, then letterboxes the result into `dest` and blends it
/// onto the canvas. Returns the rectangle actually covered.
pub fn composite(
    canvas: &mut Canvas,
    bitmap: RgbaImage,
    dest: Rect,
    fit: Fit,
    mirror: Option<Flip>,
    portrait_bias: f32,
) -> Rect {
    if dest.is_empty() {
        return dest;
    }
    let mut fitted = apply_fit(bitmap, dest.width, dest.height, fit, portrait_bias);
    if let Some(mirror) = mirror {
        flip(&mut fitted, mirror);
    }
    blit_letterboxed(canvas, &fitted, dest)
}

/// Shrinks `bitmap` to fit `dest` (never enlarging), centers it and blends it onto the canvas.
pub fn blit_letterboxed(canvas: &mut Canvas, bitmap: &RgbaImage, dest: Rect) -> Rect {
    if bitmap.width() == 0 || bitmap.height() == 0 {
        log::debug!("empty bitmap, nothing to blit into {dest:?}");
        return Rect::new(dest.x, dest.y, 0, 0);
    }
    let placed = layout::letterbox(size_of(bitmap), dest);
    debug_assert!(dest.contains(&placed), "{placed:?} escapes {dest:?}");
    if placed.is_empty() {
        return placed;
    }

    if size_of(bitmap) == placed.size() {
        canvas.blit(bitmap, placed.origin());
    } else {
        let scaled = imageops::resize(bitmap, placed.width, placed.height, QUALITY);
        canvas.blit(&scaled, placed.origin());
    }
    placed
}
