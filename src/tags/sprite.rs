//! DefineSprite: a character with its own timeline.

use std::any::Any;

use crate::document::DumpFlags;
use crate::error::Result;
use crate::io::BitCursor;
use crate::timeline::Timeline;

use super::{body_cursor, codes, tag_prefix, write_tag, ParseContext, Tag};

/// Movie clip definition. The nested tag stream is parsed into its own
/// [`Timeline`], which resolves foreign characters through the root.
#[derive(Debug, Default)]
pub struct DefineSpriteTag {
    pub character_id: u16,
    pub frame_count: u16,
    pub timeline: Timeline,
}

impl DefineSpriteTag {
    pub fn new(character_id: u16) -> Self {
        Self {
            character_id,
            ..Self::default()
        }
    }
}

impl Tag for DefineSpriteTag {
    fn type_code(&self) -> u16 {
        codes::DEFINE_SPRITE
    }

    fn parse(
        &mut self,
        data: &mut BitCursor,
        length: usize,
        version: u8,
        ctx: &mut ParseContext<'_>,
    ) -> Result<()> {
        let end = data.position() + length;
        self.character_id = data.read_u16()?;
        self.frame_count = data.read_u16()?;
        self.timeline.parse_tags(data, version, end, ctx)
    }

    fn publish(&self, data: &mut BitCursor, version: u8) -> Result<()> {
        let mut body = body_cursor(version);
        body.write_u16(self.character_id);
        body.write_u16(self.frame_count);
        self.timeline.publish_tags(&mut body, version)?;
        write_tag(data, codes::DEFINE_SPRITE, body.as_bytes(), false);
        Ok(())
    }

    fn character_id(&self) -> Option<u16> {
        Some(self.character_id)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn describe(&self, indent: usize, flags: DumpFlags) -> String {
        format!(
            "{}ID: {}, FrameCount: {}{}",
            tag_prefix(self.type_code(), self.name(), indent),
            self.character_id,
            self.frame_count,
            self.timeline.describe(indent, flags)
        )
    }
}
