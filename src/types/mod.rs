//! Record types shared by the field codecs and the tag model.

pub mod color;
pub mod color_transform;
pub mod matrix;
pub mod rect;

pub use color::{argb, color_to_string, rgb};
pub use color_transform::ColorTransform;
pub use matrix::Matrix;
pub use rect::Rectangle;
