//! RECT record.

use std::fmt;

/// Axis-aligned rectangle in twips (1/20 pixel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rectangle {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

impl Rectangle {
    /// Create a rectangle from its edges.
    pub const fn new(x_min: i32, x_max: i32, y_min: i32, y_max: i32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Create a rectangle anchored at the origin from a pixel size.
    pub const fn from_pixels(width: i32, height: i32) -> Self {
        Self::new(0, width * 20, 0, height * 20)
    }

    /// Width in twips.
    pub fn width(&self) -> i32 {
        self.x_max - self.x_min
    }

    /// Height in twips.
    pub fn height(&self) -> i32 {
        self.y_max - self.y_min
    }

    /// Size in pixels.
    pub fn size_in_pixels(&self) -> (f64, f64) {
        (self.width() as f64 / 20.0, self.height() as f64 / 20.0)
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{},{})", self.x_min, self.x_max, self.y_min, self.y_max)
    }
}
