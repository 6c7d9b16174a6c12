//! Tag model.
//!
//! Every record in a SWF body is a tag: a header (type code and content
//! length) followed by the content. Concrete tags implement [`Tag`] and are
//! created through a [`TagCodecRegistry`]. Tags are classified along two
//! capability axes used by the timeline:
//!
//! - *definition* tags introduce a character ([`Tag::character_id`]);
//! - *display-list* tags change the per-frame depth map
//!   ([`Tag::display_list`]).
//!
//! Payloads that are not modelled are kept as opaque bytes so that they are
//! re-emitted unchanged.

use std::any::Any;
use std::fmt;

use indexmap::IndexMap;

use crate::document::DumpFlags;
use crate::error::Result;
use crate::io::reader::SwfReaderConfiguration;
use crate::io::BitCursor;
use crate::notification::NotificationCollection;

pub mod codes;
pub mod control;
pub mod definition;
pub mod display_list;
pub mod raw;
pub mod registry;
pub mod scene;
pub mod sound;
pub mod sprite;

pub use control::{
    EndTag, FrameLabelTag, JpegTablesTag, SetBackgroundColorTag, ShowFrameTag, UnknownTag,
};
pub use definition::DefinitionTag;
pub use display_list::{PlaceFlags, PlaceFlags3, PlaceObjectTag, RemoveObjectTag};
pub use raw::RawTag;
pub use registry::{TagCodecRegistry, TagConstructor};
pub use scene::{DefineSceneAndFrameLabelDataTag, FrameLabelEntry, SceneEntry};
pub use sound::{SoundCompression, SoundStreamBlockTag, SoundStreamHeadTag};
pub use sprite::DefineSpriteTag;

/// Decoded record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagHeader {
    pub code: u16,
    pub content_length: u32,
    /// 2 for the short form, 6 for the long form.
    pub header_length: u32,
}

impl TagHeader {
    /// Total record size, header included.
    pub fn tag_length(&self) -> usize {
        self.header_length as usize + self.content_length as usize
    }

    pub fn is_long(&self) -> bool {
        self.header_length > 2
    }
}

/// How a display-list tag changes the current frame.
#[derive(Debug, Clone, Copy)]
pub enum DisplayListAction<'a> {
    /// Close the current frame.
    ShowFrame,
    /// Place, move or replace a character at a depth.
    Place(&'a PlaceObjectTag),
    /// Clear a depth.
    Remove { depth: i16 },
}

/// Read-only view of a timeline's dictionary and tag list.
///
/// Nested timelines use it to resolve characters defined on the root.
#[derive(Clone, Copy)]
pub struct CharacterLookup<'a> {
    dictionary: &'a IndexMap<u16, usize>,
    tags: &'a [Option<Box<dyn Tag>>],
}

impl<'a> CharacterLookup<'a> {
    pub fn new(dictionary: &'a IndexMap<u16, usize>, tags: &'a [Option<Box<dyn Tag>>]) -> Self {
        Self { dictionary, tags }
    }

    /// Defining tag of a character.
    pub fn character(&self, id: u16) -> Option<&'a dyn Tag> {
        let index = *self.dictionary.get(&id)?;
        self.tags.get(index)?.as_deref()
    }

    /// Number of tag slots in the viewed timeline.
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }
}

impl fmt::Debug for CharacterLookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharacterLookup")
            .field("characters", &self.dictionary.len())
            .field("tags", &self.tags.len())
            .finish()
    }
}

/// State handed to [`Tag::parse`].
pub struct ParseContext<'a> {
    pub registry: &'a TagCodecRegistry,
    pub config: &'a SwfReaderConfiguration,
    /// Header of the record being parsed.
    pub header: TagHeader,
    /// Lookup into the root timeline. `None` while no timeline is parsing.
    pub root: Option<CharacterLookup<'a>>,
    pub notifications: &'a mut NotificationCollection,
}

/// A SWF tag.
pub trait Tag: fmt::Debug {
    /// Numeric type code.
    fn type_code(&self) -> u16;

    fn name(&self) -> &'static str {
        codes::tag_name(self.type_code())
    }

    /// Decode the content. The cursor is at the first content byte and
    /// `length` is the declared content length.
    fn parse(
        &mut self,
        data: &mut BitCursor,
        length: usize,
        version: u8,
        ctx: &mut ParseContext<'_>,
    ) -> Result<()>;

    /// Encode the whole record, header included.
    fn publish(&self, data: &mut BitCursor, version: u8) -> Result<()>;

    /// Character id for definition tags.
    fn character_id(&self) -> Option<u16> {
        None
    }

    /// Display-list effect for display-list tags.
    fn display_list(&self) -> Option<DisplayListAction<'_>> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    /// One-line description, optionally followed by indented detail lines.
    fn describe(&self, indent: usize, _flags: DumpFlags) -> String {
        tag_prefix(self.type_code(), self.name(), indent)
    }
}

impl<'t> dyn Tag + 't {
    /// Downcast to a concrete tag type.
    pub fn downcast_ref<T: Tag + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// `"[NN:Name] "` prefix used by tag descriptions.
pub fn tag_prefix(code: u16, name: &str, indent: usize) -> String {
    format!("{}[{:02}:{}] ", " ".repeat(indent), code, name)
}

/// Write a complete record: header then body.
pub fn write_tag(data: &mut BitCursor, code: u16, body: &[u8], force_long: bool) {
    data.write_tag_header(code, body.len() as u32, force_long);
    data.write_bytes(body);
}

/// Scratch cursor for building a tag body with the text encoding of
/// `version`.
pub(crate) fn body_cursor(version: u8) -> BitCursor {
    let mut body = BitCursor::new();
    body.set_version(version);
    body
}

/// Bytes left in the current record.
pub(crate) fn remaining(data: &BitCursor, end: usize) -> usize {
    end.saturating_sub(data.position())
}
