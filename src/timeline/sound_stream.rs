//! Reassembled streaming sound.

use std::fmt;

use crate::tags::{SoundCompression, SoundStreamHeadTag};

/// Streaming sound collected from SoundStreamBlock tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundStream {
    pub compression: u8,
    pub rate: u8,
    pub size: u8,
    pub sound_type: u8,
    /// Frame holding the first block.
    pub start_frame: usize,
    pub num_samples: u32,
    pub num_frames: u32,
    pub data: Vec<u8>,
}

impl SoundStream {
    pub fn from_head(head: &SoundStreamHeadTag) -> Self {
        Self {
            compression: head.stream_compression,
            rate: head.stream_rate,
            size: head.stream_size,
            sound_type: head.stream_type,
            ..Self::default()
        }
    }
}

impl fmt::Display for SoundStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Format: {}, Rate: {}, Size: {}, Type: {}, Samples: {}, Frames: {}, StartFrame: {}, Length: {}",
            SoundCompression::name(self.compression),
            self.rate,
            self.size,
            self.sound_type,
            self.num_samples,
            self.num_frames,
            self.start_frame,
            self.data.len()
        )
    }
}
