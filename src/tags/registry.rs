//! Type code to tag constructor mapping.

use std::sync::Arc;

use ahash::AHashMap;
use once_cell::sync::Lazy;

use super::codes;
use super::{
    DefineSceneAndFrameLabelDataTag, DefineSpriteTag, DefinitionTag, EndTag, FrameLabelTag,
    JpegTablesTag, PlaceObjectTag, RemoveObjectTag, SetBackgroundColorTag, ShowFrameTag,
    SoundStreamBlockTag, SoundStreamHeadTag, Tag, UnknownTag,
};

/// Builds an empty tag for a type code.
pub type TagConstructor = fn(u16) -> Box<dyn Tag>;

static DEFAULT_REGISTRY: Lazy<Arc<TagCodecRegistry>> =
    Lazy::new(|| Arc::new(TagCodecRegistry::new()));

/// Maps tag type codes to constructors. Codes without an entry produce an
/// [`UnknownTag`].
#[derive(Debug, Clone)]
pub struct TagCodecRegistry {
    constructors: AHashMap<u16, TagConstructor>,
}

impl TagCodecRegistry {
    /// Registry with no codecs; every tag is created as [`UnknownTag`].
    pub fn empty() -> Self {
        Self {
            constructors: AHashMap::new(),
        }
    }

    /// Registry with all built-in codecs.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(codes::END, |_| Box::new(EndTag));
        registry.register(codes::SHOW_FRAME, |_| Box::new(ShowFrameTag));
        registry.register(codes::PLACE_OBJECT, |_| Box::new(PlaceObjectTag::new(1)));
        registry.register(codes::PLACE_OBJECT2, |_| Box::new(PlaceObjectTag::new(2)));
        registry.register(codes::PLACE_OBJECT3, |_| Box::new(PlaceObjectTag::new(3)));
        registry.register(codes::REMOVE_OBJECT, |_| {
            Box::new(RemoveObjectTag {
                version: 1,
                ..RemoveObjectTag::default()
            })
        });
        registry.register(codes::REMOVE_OBJECT2, |_| Box::new(RemoveObjectTag::new(0)));
        registry.register(codes::JPEG_TABLES, |_| Box::new(JpegTablesTag::default()));
        registry.register(codes::SET_BACKGROUND_COLOR, |_| {
            Box::new(SetBackgroundColorTag::default())
        });
        registry.register(codes::SOUND_STREAM_HEAD, |_| Box::new(SoundStreamHeadTag::new(1)));
        registry.register(codes::SOUND_STREAM_HEAD2, |_| Box::new(SoundStreamHeadTag::new(2)));
        registry.register(codes::SOUND_STREAM_BLOCK, |_| {
            Box::new(SoundStreamBlockTag::default())
        });
        registry.register(codes::DEFINE_SPRITE, |_| Box::new(DefineSpriteTag::default()));
        registry.register(codes::FRAME_LABEL, |_| Box::new(FrameLabelTag::default()));
        registry.register(codes::DEFINE_SCENE_AND_FRAME_LABEL_DATA, |_| {
            Box::new(DefineSceneAndFrameLabelDataTag::default())
        });
        for &code in codes::OPAQUE_DEFINITIONS {
            registry.register(code, |code| Box::new(DefinitionTag::new(code)));
        }
        registry
    }

    /// Process-wide registry with the built-in codecs, built on first use.
    pub fn shared() -> Arc<Self> {
        Arc::clone(&DEFAULT_REGISTRY)
    }

    /// Register a constructor, returning the one it replaces.
    pub fn register(&mut self, code: u16, constructor: TagConstructor) -> Option<TagConstructor> {
        self.constructors.insert(code, constructor)
    }

    pub fn contains(&self, code: u16) -> bool {
        self.constructors.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Create an empty tag for `code`.
    pub fn create(&self, code: u16) -> Box<dyn Tag> {
        match self.constructors.get(&code) {
            Some(constructor) => constructor(code),
            None => Box::new(UnknownTag::new(code)),
        }
    }
}

impl Default for TagCodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}
