//! Timelines: the tag stream of the document or of a sprite, plus the
//! state derived from it.
//!
//! A timeline owns the tag list (with a parallel list of raw records used as
//! a publish fallback), the character dictionary, the frames with their
//! display lists, scenes, layers and the reassembled sound stream.
//!
//! Parsing and publishing live in [`engine`]; the per-tag bookkeeping and
//! layer building live in [`reconstruct`].

use std::fmt::Write as _;

use ahash::AHashMap;
use indexmap::IndexMap;

use crate::document::DumpFlags;
use crate::tags::{codes, tag_prefix, CharacterLookup, JpegTablesTag, RawTag, Tag};

pub mod engine;
pub mod frame;
pub mod layer;
pub mod reconstruct;
pub mod scene;
pub mod sound_stream;

pub use frame::{DisplayObject, Frame};
pub use layer::{Layer, LayerStrip, StripType};
pub use scene::Scene;
pub use sound_stream::SoundStream;

/// Default background: white with zero alpha.
pub const DEFAULT_BACKGROUND_COLOR: u32 = 0x00ff_ffff;

/// Tag stream plus derived timeline state.
#[derive(Debug)]
pub struct Timeline {
    /// Structured tags. `None` where a tag failed to parse in failsafe mode.
    pub tags: Vec<Option<Box<dyn Tag>>>,
    /// Raw records, index-aligned with `tags`. `None` for tags that were
    /// added programmatically.
    pub raw_tags: Vec<Option<RawTag>>,
    /// Character id to index of the defining tag.
    pub dictionary: IndexMap<u16, usize>,
    pub scenes: Vec<Scene>,
    pub frames: Vec<Frame>,
    pub layers: Vec<Layer>,
    pub sound_stream: Option<SoundStream>,
    pub background_color: u32,
    jpeg_tables: Option<usize>,
    current_frame: Frame,
    frame_labels: AHashMap<usize, String>,
    has_sound_stream: bool,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            tags: Vec::new(),
            raw_tags: Vec::new(),
            dictionary: IndexMap::new(),
            scenes: Vec::new(),
            frames: Vec::new(),
            layers: Vec::new(),
            sound_stream: None,
            background_color: DEFAULT_BACKGROUND_COLOR,
            jpeg_tables: None,
            current_frame: Frame::new(0, 0),
            frame_labels: AHashMap::new(),
            has_sound_stream: false,
        }
    }

    /// Drop all tags and derived state.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len().max(self.raw_tags.len())
    }

    pub fn tag(&self, index: usize) -> Option<&dyn Tag> {
        self.tags.get(index)?.as_deref()
    }

    pub fn raw_tag(&self, index: usize) -> Option<&RawTag> {
        self.raw_tags.get(index)?.as_ref()
    }

    /// Append a tag built in code. Derived state is rebuilt on the next
    /// load of the published bytes.
    pub fn push_tag(&mut self, tag: Box<dyn Tag>) -> usize {
        self.tags.push(Some(tag));
        self.raw_tags.push(None);
        self.tags.len() - 1
    }

    /// Defining tag of a character.
    pub fn character(&self, id: u16) -> Option<&dyn Tag> {
        self.lookup().character(id)
    }

    /// The most recent JPEGTables tag.
    pub fn jpeg_tables(&self) -> Option<&JpegTablesTag> {
        self.tag(self.jpeg_tables?)?.downcast_ref::<JpegTablesTag>()
    }

    pub fn lookup(&self) -> CharacterLookup<'_> {
        CharacterLookup::new(&self.dictionary, &self.tags)
    }

    /// Tag listing, then scenes, frames, layers and sound stream when
    /// `DumpFlags::TIMELINE_STRUCTURE` is set.
    pub fn describe(&self, indent: usize, flags: DumpFlags) -> String {
        let pad = " ".repeat(indent + 2);
        let mut s = format!("\n{pad}Tags ({}):", self.tag_count());
        for index in 0..self.tag_count() {
            s.push('\n');
            match (self.tag(index), self.raw_tag(index)) {
                (Some(tag), _) => s.push_str(&tag.describe(indent + 4, flags)),
                (None, Some(raw)) => {
                    s.push_str(&tag_prefix(raw.header.code, codes::tag_name(raw.header.code), indent + 4));
                    s.push_str("(raw)");
                }
                (None, None) => {
                    let _ = write!(s, "{}<missing>", " ".repeat(indent + 4));
                }
            }
            if flags.contains(DumpFlags::RAW_HEADERS) {
                if let Some(raw) = self.raw_tag(index) {
                    let _ = write!(
                        s,
                        "\n{}Raw: Header: {}, Content: {}",
                        " ".repeat(indent + 6),
                        raw.header.header_length,
                        raw.header.content_length
                    );
                }
            }
        }

        if flags.contains(DumpFlags::TIMELINE_STRUCTURE) {
            if !self.scenes.is_empty() {
                let _ = write!(s, "\n{pad}Scenes:");
                for (i, scene) in self.scenes.iter().enumerate() {
                    let _ = write!(s, "\n{pad}  [{i}] {scene}");
                }
            }
            if !self.frames.is_empty() {
                let _ = write!(s, "\n{pad}Frames:");
                for frame in &self.frames {
                    let _ = write!(s, "\n{}", frame.describe(indent + 4));
                }
            }
            if !self.layers.is_empty() {
                let _ = write!(s, "\n{pad}Layers:");
                for (i, layer) in self.layers.iter().enumerate() {
                    let _ = write!(s, "\n{}", layer.describe(i, indent + 4));
                }
            }
            if let Some(stream) = &self.sound_stream {
                let _ = write!(s, "\n{pad}SoundStream: {stream}");
            }
        }
        s
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}
