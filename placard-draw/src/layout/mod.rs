/// Width-estimating line breaker
pub mod wrap;

use serde::Deserialize;

/// Position from the top left of the canvas.
/// Signed, since alignment can push an origin past the left or top edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}
impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// Destination box on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}
impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// `true` if `other` lies entirely within this rectangle
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x as i64 + other.width as i64 <= self.x as i64 + self.width as i64
            && other.y as i64 + other.height as i64 <= self.y as i64 + self.height as i64
    }
}

/// Shrinks a `source`-sized image to fit inside `dest`, keeping its aspect ratio,
/// and centers it there. Never enlarges: the scale factor is capped at `1.0`.
pub fn letterbox(source: Size, dest: Rect) -> Rect {
    let sw = source.width.max(1) as f64;
    let sh = source.height.max(1) as f64;
    let ratio = (dest.width as f64 / sw)
        .min(dest.height as f64 / sh)
        .min(1.0);

    // truncation keeps the result inside `dest`
    let width = (ratio * sw) as u32;
    let height = (ratio * sh) as u32;
    Rect {
        x: dest.x + ((dest.width - width) / 2) as i32,
        y: dest.y + ((dest.height - height) / 2) as i32,
        width,
        height,
    }
}

/// The square region of a `source`-sized image that crop-to-fit policies sample from.
///
/// Landscape sources lose equal strips left and right. Portrait (and square) sources
/// start `(height - width) / portrait_bias` from the top, so a bias above `2.0` leans
/// toward the upper part of the image.
pub fn square_crop(source: Size, portrait_bias: f32) -> Rect {
    if source.width > source.height {
        Rect {
            x: ((source.width - source.height) / 2) as i32,
            y: 0,
            width: source.height,
            height: source.height,
        }
    } else {
        let slack = (source.height - source.width) as f32;
        Rect {
            x: 0,
            y: (slack / portrait_bias) as i32,
            width: source.width,
            height: source.width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(width: u32, height: u32) -> Size {
        Size { width, height }
    }

    #[test]
    fn letterbox_never_upscales() {
        let dest = Rect::new(10, 20, 200, 100);
        let placed = letterbox(size(40, 30), dest);
        assert_eq!((placed.width, placed.height), (40, 30));
        // centered on both axes
        assert_eq!((placed.x, placed.y), (10 + 80, 20 + 35));
    }

    #[test]
    fn letterbox_fits_inside_destination() {
        for (sw, sh) in [(1000, 10), (10, 1000), (640, 480), (333, 777), (1, 1)] {
            for (dw, dh) in [(100, 100), (37, 211), (1, 1), (500, 20)] {
                let dest = Rect::new(-5, 7, dw, dh);
                let placed = letterbox(size(sw, sh), dest);
                assert!(dest.contains(&placed), "{sw}x{sh} into {dw}x{dh}: {placed:?}");
                assert!(placed.width <= sw && placed.height <= sh);
            }
        }
    }

    #[test]
    fn letterbox_keeps_aspect() {
        let placed = letterbox(size(400, 200), Rect::new(0, 0, 100, 100));
        assert_eq!(placed, Rect::new(0, 25, 100, 50));
    }

    #[test]
    fn landscape_crop_is_centered() {
        assert_eq!(square_crop(size(300, 100), 2.5), Rect::new(100, 0, 100, 100));
    }

    #[test]
    fn portrait_crop_leans_up() {
        assert_eq!(square_crop(size(100, 350), 2.5), Rect::new(0, 100, 100, 100));
        assert_eq!(square_crop(size(100, 350), 2.0), Rect::new(0, 125, 100, 100));
        assert_eq!(square_crop(size(64, 64), 2.5), Rect::new(0, 0, 64, 64));
    }
}
