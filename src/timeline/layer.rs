//! Layers: per-depth runs of frames.

use std::fmt;
use std::fmt::Write as _;

/// Classification of a strip of frames at one depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripType {
    Empty,
    Static,
    MotionTween,
    ShapeTween,
}

impl fmt::Display for StripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Static => write!(f, "static"),
            Self::MotionTween => write!(f, "motion tween"),
            Self::ShapeTween => write!(f, "shape tween"),
        }
    }
}

/// Contiguous frame range `[start_frame, end_frame]` of one strip type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerStrip {
    pub strip_type: StripType,
    pub start_frame: usize,
    pub end_frame: usize,
}

impl LayerStrip {
    pub fn new(strip_type: StripType, start_frame: usize, end_frame: usize) -> Self {
        Self {
            strip_type,
            start_frame,
            end_frame,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.end_frame - self.start_frame + 1
    }
}

impl fmt::Display for LayerStrip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start_frame == self.end_frame {
            write!(f, "Frame: {}, Type: {}", self.start_frame, self.strip_type)
        } else {
            write!(
                f,
                "Frames: {}-{}, Type: {}",
                self.start_frame, self.end_frame, self.strip_type
            )
        }
    }
}

/// Strips of one depth covering the timeline's frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub depth: i16,
    pub frame_count: usize,
    pub strips: Vec<LayerStrip>,
}

impl Layer {
    pub fn new(depth: i16, frame_count: usize) -> Self {
        Self {
            depth,
            frame_count,
            strips: Vec::new(),
        }
    }

    /// Append a strip. `Empty` is ignored; a gap before the new strip is
    /// filled with an `Empty` strip.
    pub fn append_strip(&mut self, strip_type: StripType, start_frame: usize, end_frame: usize) {
        if strip_type == StripType::Empty {
            return;
        }
        let next_free = self.strips.last().map_or(0, |last| last.end_frame + 1);
        if next_free < start_frame {
            self.strips
                .push(LayerStrip::new(StripType::Empty, next_free, start_frame - 1));
        }
        self.strips
            .push(LayerStrip::new(strip_type, start_frame, end_frame));
    }

    /// Cover the frames after the last strip with an `Empty` strip.
    pub fn close(&mut self) {
        let next_free = self.strips.last().map_or(0, |last| last.end_frame + 1);
        if next_free < self.frame_count {
            self.strips
                .push(LayerStrip::new(StripType::Empty, next_free, self.frame_count - 1));
        }
    }

    pub fn describe(&self, index: usize, indent: usize) -> String {
        let pad = " ".repeat(indent);
        let mut s = format!("{pad}[{index}] Depth: {}, Frames: {}", self.depth, self.frame_count);
        for strip in &self.strips {
            let _ = write!(s, "\n{pad}  {strip}");
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaps_filled() {
        let mut layer = Layer::new(1, 10);
        layer.append_strip(StripType::Empty, 0, 0);
        assert!(layer.strips.is_empty());

        layer.append_strip(StripType::Static, 2, 3);
        layer.append_strip(StripType::MotionTween, 4, 6);
        layer.append_strip(StripType::ShapeTween, 8, 8);
        layer.close();

        let expected = vec![
            LayerStrip::new(StripType::Empty, 0, 1),
            LayerStrip::new(StripType::Static, 2, 3),
            LayerStrip::new(StripType::MotionTween, 4, 6),
            LayerStrip::new(StripType::Empty, 7, 7),
            LayerStrip::new(StripType::ShapeTween, 8, 8),
            LayerStrip::new(StripType::Empty, 9, 9),
        ];
        assert_eq!(layer.strips, expected);
        assert_eq!(layer.strips[2].frame_count(), 3);
    }

    #[test]
    fn test_describe() {
        let mut layer = Layer::new(3, 2);
        layer.append_strip(StripType::Static, 0, 1);
        layer.close();
        assert_eq!(
            layer.describe(0, 0),
            "[0] Depth: 3, Frames: 2\n  Frames: 0-1, Type: static"
        );
    }
}
