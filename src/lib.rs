//! # swfrust
//!
//! A pure Rust library for reading and writing SWF (Flash) files.
//!
//! A SWF is a short header followed by a stream of tagged records. This
//! library decodes the stream into a [`SwfDocument`] holding every tag plus
//! the structures derived from them, and encodes the document back into
//! bytes. Tags whose payload layout is not modelled are carried as opaque
//! bytes, and every record also keeps its original bytes, so a load followed
//! by a publish reproduces the tag stream.
//!
//! ## Features
//!
//! - Uncompressed (`FWS`), zlib (`CWS`) and LZMA (`ZWS`) input
//! - Bit-level field codecs for the SWF record types
//! - Registry-based tag dispatch with custom codecs
//! - Dictionary, frame, display-list, scene and layer reconstruction
//! - Streaming MP3 sound reassembly
//! - Resynchronization on tags whose length disagrees with their content
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use swfrust::{SwfDocument, DumpFlags};
//!
//! let bytes = std::fs::read("movie.swf")?;
//! let mut doc = SwfDocument::load(&bytes)?;
//!
//! for frame in &doc.timeline.frames {
//!     println!("frame {}: {} objects", frame.frame_number, frame.display_list.len());
//! }
//! println!("{}", doc.dump(DumpFlags::TIMELINE_STRUCTURE));
//!
//! let out = doc.publish()?;
//! # Ok::<(), swfrust::error::SwfError>(())
//! ```
//!
//! ## Architecture
//!
//! - `Tag` - trait implemented by every tag codec
//! - `TagCodecRegistry` - type code to codec constructor
//! - `Timeline` - tag list, parse/publish loops and derived state
//! - `SwfDocument` - header fields plus the root timeline

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod document;
pub mod error;
pub mod io;
pub mod notification;
pub mod tags;
pub mod timeline;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SwfError};
pub use notification::{Notification, NotificationCollection, NotificationType};
pub use types::{ColorTransform, Matrix, Rectangle};

// Re-export the tag model
pub use tags::{RawTag, Tag, TagCodecRegistry, TagHeader};

// Re-export timeline types
pub use timeline::{DisplayObject, Frame, Layer, LayerStrip, Scene, SoundStream, StripType, Timeline};

// Re-export document
pub use document::{DumpFlags, SwfDocument};

// Re-export I/O types
pub use io::{BitCursor, CompressionMethod, SwfReader, SwfReaderConfiguration, SwfWriter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helpers for parsing single tags and tag streams in unit tests.
#[cfg(test)]
pub(crate) mod test_support {
    use crate::error::Result;
    use crate::io::{BitCursor, SwfReaderConfiguration};
    use crate::notification::NotificationCollection;
    use crate::tags::{ParseContext, Tag, TagCodecRegistry, TagHeader};
    use crate::timeline::Timeline;

    /// Parse one complete record through the default registry.
    pub fn try_parse(bytes: &[u8], version: u8) -> Result<Box<dyn Tag>> {
        let registry = TagCodecRegistry::new();
        let config = SwfReaderConfiguration::default();
        let mut notifications = NotificationCollection::new();
        let mut data = BitCursor::from_bytes(bytes.to_vec());
        data.set_version(version);
        let header = data.read_tag_header()?;
        let mut tag = registry.create(header.code);
        let mut ctx = ParseContext {
            registry: &registry,
            config: &config,
            header,
            root: None,
            notifications: &mut notifications,
        };
        tag.parse(&mut data, header.content_length as usize, version, &mut ctx)?;
        Ok(tag)
    }

    /// Parse one record and downcast it.
    pub fn parse_one<T: Tag + Clone + 'static>(bytes: &[u8], version: u8) -> T {
        let tag = try_parse(bytes, version).expect("tag parses");
        tag.as_ref()
            .downcast_ref::<T>()
            .cloned()
            .expect("tag has the requested type")
    }

    /// Publish one tag into a fresh buffer.
    pub fn publish_one(tag: &dyn Tag, version: u8) -> Vec<u8> {
        let mut data = BitCursor::new();
        data.set_version(version);
        tag.publish(&mut data, version).expect("tag publishes");
        data.into_inner()
    }

    /// Concatenate the records of `tags` (version 10).
    pub fn tag_stream(tags: &[&dyn Tag]) -> Vec<u8> {
        let mut data = BitCursor::new();
        data.set_version(10);
        for tag in tags {
            tag.publish(&mut data, 10).expect("tag publishes");
        }
        data.into_inner()
    }

    /// Parse a whole tag stream as a root timeline.
    pub fn try_parse_timeline(
        bytes: Vec<u8>,
        config: SwfReaderConfiguration,
    ) -> (Result<Timeline>, NotificationCollection) {
        let registry = TagCodecRegistry::new();
        let mut notifications = NotificationCollection::new();
        let mut data = BitCursor::from_bytes(bytes);
        data.set_version(10);
        let end = data.len();
        let mut timeline = Timeline::new();
        let result = {
            let mut ctx = ParseContext {
                registry: &registry,
                config: &config,
                header: TagHeader {
                    code: 0,
                    content_length: 0,
                    header_length: 0,
                },
                root: None,
                notifications: &mut notifications,
            };
            timeline.parse_tags(&mut data, 10, end, &mut ctx)
        };
        (result.map(|_| timeline), notifications)
    }

    pub fn parse_timeline(
        bytes: Vec<u8>,
        config: SwfReaderConfiguration,
    ) -> (Timeline, NotificationCollection) {
        let (timeline, notifications) = try_parse_timeline(bytes, config);
        (timeline.expect("tag stream parses"), notifications)
    }
}
