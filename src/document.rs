//! SWF document structure

use std::fmt;
use std::fmt::Write as _;

use bitflags::bitflags;

use crate::io::compression::CompressionMethod;
use crate::io::reader::SwfReader;
use crate::io::writer::SwfWriter;
use crate::notification::NotificationCollection;
use crate::tags::Tag;
use crate::timeline::Timeline;
use crate::types::Rectangle;
use crate::Result;

bitflags! {
    /// Sections included in [`SwfDocument::dump`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DumpFlags: u32 {
        /// Scenes, frames, layers and the sound stream of every timeline.
        const TIMELINE_STRUCTURE = 0x01;
        /// Header and content sizes of the raw records.
        const RAW_HEADERS = 0x02;
    }
}

/// A SWF movie: header fields plus the root timeline.
#[derive(Debug)]
pub struct SwfDocument {
    /// `FWS`, `CWS` or `ZWS`
    pub signature: String,

    /// SWF version byte
    pub version: u8,

    /// Uncompressed file length, header included
    pub file_length: u32,

    /// File length as stored (after compression) in the last load/publish
    pub file_length_compressed: u32,

    pub compressed: bool,
    pub compression_method: CompressionMethod,

    /// Stage bounds in twips
    pub frame_size: Rectangle,

    /// Frames per second (8.8 fixed point on disk)
    pub frame_rate: f64,

    pub frame_count: u16,

    /// Root tag stream and derived structures
    pub timeline: Timeline,

    /// Notifications collected during the last read operation
    pub notifications: NotificationCollection,
}

impl SwfDocument {
    /// Create an empty movie: version 10, 50 fps, one frame, zlib compressed.
    pub fn new() -> Self {
        Self {
            signature: "CWS".to_string(),
            version: 10,
            file_length: 0,
            file_length_compressed: 0,
            compressed: true,
            compression_method: CompressionMethod::Zlib,
            frame_size: Rectangle::default(),
            frame_rate: 50.0,
            frame_count: 1,
            timeline: Timeline::new(),
            notifications: NotificationCollection::new(),
        }
    }

    /// Parse a complete SWF file with the default configuration.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        SwfReader::from_bytes(bytes).read()
    }

    /// Encode the document. Compressed documents are written with zlib.
    pub fn publish(&mut self) -> Result<Vec<u8>> {
        SwfWriter::new(self).write()
    }

    /// Defining tag of a character in the root dictionary.
    pub fn character(&self, id: u16) -> Option<&dyn Tag> {
        self.timeline.character(id)
    }

    /// Human-readable description of the header and the tag list.
    pub fn dump(&self, flags: DumpFlags) -> String {
        let compression = if !self.compressed {
            "None".to_string()
        } else {
            self.compression_method.to_string()
        };
        let (width, height) = self.frame_size.size_in_pixels();

        let mut s = String::from("[SWF]\n  Header:");
        let _ = write!(s, "\n    Version: {}", self.version);
        let _ = write!(s, "\n    Compression: {compression}");
        let _ = write!(s, "\n    FileLength: {}", self.file_length);
        let _ = write!(s, "\n    FileLengthCompressed: {}", self.file_length_compressed);
        let _ = write!(s, "\n    FrameSize: {width}x{height}");
        let _ = write!(s, "\n    FrameRate: {}", self.frame_rate);
        let _ = write!(s, "\n    FrameCount: {}", self.frame_count);
        s.push_str(&self.timeline.describe(0, flags));
        s
    }
}

impl Default for SwfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SwfDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump(DumpFlags::empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{codes, DefinitionTag, EndTag, ShowFrameTag};

    #[test]
    fn test_defaults() {
        let doc = SwfDocument::new();
        assert_eq!(doc.version, 10);
        assert_eq!(doc.frame_rate, 50.0);
        assert_eq!(doc.frame_count, 1);
        assert!(doc.compressed);
        assert_eq!(doc.compression_method, CompressionMethod::Zlib);
        assert_eq!(doc.timeline.tag_count(), 0);
    }

    #[test]
    fn test_publish_then_load() {
        let mut doc = SwfDocument::new();
        doc.frame_size = Rectangle::from_pixels(320, 240);
        doc.frame_rate = 24.0;
        doc.timeline.push_tag(Box::new(DefinitionTag::with_body(
            codes::DEFINE_SHAPE,
            3,
            vec![1, 2, 3],
        )));
        doc.timeline.push_tag(Box::new(ShowFrameTag));
        doc.timeline.push_tag(Box::new(EndTag));

        let bytes = doc.publish().unwrap();
        let loaded = SwfDocument::load(&bytes).unwrap();
        assert_eq!(loaded.signature, "CWS");
        assert_eq!(loaded.frame_size, doc.frame_size);
        assert_eq!(loaded.frame_rate, 24.0);
        assert_eq!(loaded.file_length, doc.file_length);
        assert_eq!(loaded.timeline.tag_count(), 3);
        assert_eq!(
            loaded.character(3).map(|t| t.type_code()),
            Some(codes::DEFINE_SHAPE)
        );
        assert!(loaded.notifications.is_empty());
    }

    #[test]
    fn test_dump_sections() {
        let mut doc = SwfDocument::new();
        doc.compressed = false;
        doc.timeline.push_tag(Box::new(ShowFrameTag));
        doc.timeline.push_tag(Box::new(EndTag));
        let bytes = doc.publish().unwrap();
        let loaded = SwfDocument::load(&bytes).unwrap();

        let plain = loaded.to_string();
        assert!(plain.starts_with("[SWF]\n  Header:\n    Version: 10"));
        assert!(plain.contains("Compression: None"));
        assert!(plain.contains("[01:ShowFrame]"));
        assert!(!plain.contains("Frames:"));

        let full = loaded.dump(DumpFlags::TIMELINE_STRUCTURE | DumpFlags::RAW_HEADERS);
        assert!(full.contains("Frames:"));
        assert!(full.contains("Raw: Header: 2, Content: 0"));
    }
}
