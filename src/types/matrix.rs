//! MATRIX record.

use std::fmt;

/// 2x3 affine transform as stored in a SWF MATRIX record.
///
/// Scale and rotate/skew terms are 16.16 fixed-point values on disk;
/// translation is in twips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotate_skew0: f64,
    pub rotate_skew1: f64,
    pub translate_x: i32,
    pub translate_y: i32,
}

impl Matrix {
    /// Identity transform.
    pub const IDENTITY: Matrix = Matrix {
        scale_x: 1.0,
        scale_y: 1.0,
        rotate_skew0: 0.0,
        rotate_skew1: 0.0,
        translate_x: 0,
        translate_y: 0,
    };

    /// Pure translation.
    pub fn translate(x: i32, y: i32) -> Self {
        Self {
            translate_x: x,
            translate_y: y,
            ..Self::IDENTITY
        }
    }

    /// Pure scale.
    pub fn scale(x: f64, y: f64) -> Self {
        Self {
            scale_x: x,
            scale_y: y,
            ..Self::IDENTITY
        }
    }

    /// Whether the scale pair differs from 1.0 and must be written.
    pub fn has_scale(&self) -> bool {
        self.scale_x != 1.0 || self.scale_y != 1.0
    }

    /// Whether the rotate/skew pair differs from 0.0 and must be written.
    pub fn has_rotate(&self) -> bool {
        self.rotate_skew0 != 0.0 || self.rotate_skew1 != 0.0
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScaleX: {}, ScaleY: {}, RotateSkew0: {}, RotateSkew1: {}, TranslateX: {}, TranslateY: {}",
            self.scale_x,
            self.scale_y,
            self.rotate_skew0,
            self.rotate_skew1,
            self.translate_x,
            self.translate_y
        )
    }
}
