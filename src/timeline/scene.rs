//! Scenes of the main timeline.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    /// First frame of the scene.
    pub frame_offset: u32,
    pub name: String,
}

impl Scene {
    pub fn new(frame_offset: u32, name: impl Into<String>) -> Self {
        Self {
            frame_offset,
            name: name.into(),
        }
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name: {}, Frame: {}", self.name, self.frame_offset)
    }
}
