use image::imageops;
use image::{GrayImage, Luma, Rgba, RgbaImage};

const KEEP: Luma<u8> = Luma([255]);
const CLEAR: Luma<u8> = Luma([0]);

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Alpha-only stencil the size of the bitmap it will be applied to.
/// Pixels marked clear become fully transparent; the rest are left untouched.
pub struct Mask {
    alpha: GrayImage,
}

impl Mask {
    /// Keeps everything
    pub fn opaque(width: u32, height: u32) -> Self {
        Self {
            alpha: GrayImage::from_pixel(width, height, KEEP),
        }
    }

    /// Keeps pixels strictly inside a circle around the center.
    ///
    /// The radius is half the *height*, so a wide bitmap keeps a height-sized disc and
    /// a tall one gets its sides clipped by the vertical extent only.
    pub fn circle(width: u32, height: u32) -> Self {
        let cx = width as f64 / 2.0;
        let cy = height as f64 / 2.0;
        let radius = height as f64 / 2.0;
        let alpha = GrayImage::from_fn(width, height, |x, y| {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            if dx * dx + dy * dy < radius * radius {
                KEEP
            } else {
                CLEAR
            }
        });
        Self { alpha }
    }

    /// Rounds the two top corners with `radius`; the bottom corners stay square.
    ///
    /// A quarter-disc stencil is stamped on the top-left corner, then the same stencil,
    /// turned a quarter clockwise, on the top-right. The radius is capped at half the
    /// shorter side so the two corners never overlap.
    pub fn rounded_top(width: u32, height: u32, radius: u32) -> Self {
        let mut mask = Self::opaque(width, height);
        let radius = radius.min(width / 2).min(height / 2);
        if radius == 0 {
            return mask;
        }

        let corner = quarter_disc(radius);
        mask.stamp(&corner, 0, 0);
        mask.stamp(&imageops::rotate90(&corner), width - radius, 0);
        mask
    }

    pub fn keeps(&self, x: u32, y: u32) -> bool {
        self.alpha.get_pixel(x, y)[0] != 0
    }

    /// Clears `bitmap` wherever this mask is clear. Sizes must match;
    /// anything outside the overlap is left alone.
    pub fn apply(self, bitmap: &mut RgbaImage) {
        for (x, y, pixel) in bitmap.enumerate_pixels_mut() {
            if x < self.alpha.width() && y < self.alpha.height() && !self.keeps(x, y) {
                *pixel = TRANSPARENT;
            }
        }
    }

    /// Copies the clear pixels of `stencil` onto this mask at `(left, top)`
    fn stamp(&mut self, stencil: &GrayImage, left: u32, top: u32) {
        for (x, y, value) in stencil.enumerate_pixels() {
            if *value == CLEAR {
                self.alpha.put_pixel(left + x, top + y, CLEAR);
            }
        }
    }
}

/// `radius` x `radius` square, kept inside the pie slice between 180 and 270 degrees of a
/// circle centered on its bottom-right corner; the outer corner is clear.
fn quarter_disc(radius: u32) -> GrayImage {
    let r = radius as i64;
    GrayImage::from_fn(radius, radius, |x, y| {
        let dx = x as i64 - r;
        let dy = y as i64 - r;
        if dx * dx + dy * dy <= r * r {
            KEEP
        } else {
            CLEAR
        }
    })
}

/// Copy of `bitmap` with everything outside the centered circle made transparent
pub fn circular(bitmap: &RgbaImage) -> RgbaImage {
    let mut masked = bitmap.clone();
    Mask::circle(bitmap.width(), bitmap.height()).apply(&mut masked);
    masked
}

/// `bitmap` with its top corners rounded off
pub fn rounded_corners(mut bitmap: RgbaImage, radius: u32) -> RgbaImage {
    Mask::rounded_top(bitmap.width(), bitmap.height(), radius).apply(&mut bitmap);
    bitmap
}
