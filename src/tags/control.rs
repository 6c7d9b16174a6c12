//! Control tags and the opaque fallback tag.

use std::any::Any;

use crate::document::DumpFlags;
use crate::error::Result;
use crate::io::BitCursor;
use crate::types::color_to_string;

use super::{body_cursor, codes, tag_prefix, write_tag, DisplayListAction, ParseContext, Tag};

/// End of a tag stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndTag;

impl Tag for EndTag {
    fn type_code(&self) -> u16 {
        codes::END
    }

    fn parse(&mut self, _: &mut BitCursor, _: usize, _: u8, _: &mut ParseContext<'_>) -> Result<()> {
        Ok(())
    }

    fn publish(&self, data: &mut BitCursor, _version: u8) -> Result<()> {
        write_tag(data, codes::END, &[], false);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Frame boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowFrameTag;

impl Tag for ShowFrameTag {
    fn type_code(&self) -> u16 {
        codes::SHOW_FRAME
    }

    fn parse(&mut self, _: &mut BitCursor, _: usize, _: u8, _: &mut ParseContext<'_>) -> Result<()> {
        Ok(())
    }

    fn publish(&self, data: &mut BitCursor, _version: u8) -> Result<()> {
        write_tag(data, codes::SHOW_FRAME, &[], false);
        Ok(())
    }

    fn display_list(&self) -> Option<DisplayListAction<'_>> {
        Some(DisplayListAction::ShowFrame)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Stage background color (RGB, stored as opaque ARGB).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetBackgroundColorTag {
    pub color: u32,
}

impl Default for SetBackgroundColorTag {
    fn default() -> Self {
        Self { color: 0xffff_ffff }
    }
}

impl Tag for SetBackgroundColorTag {
    fn type_code(&self) -> u16 {
        codes::SET_BACKGROUND_COLOR
    }

    fn parse(&mut self, data: &mut BitCursor, _: usize, _: u8, _: &mut ParseContext<'_>) -> Result<()> {
        self.color = data.read_rgb()?;
        Ok(())
    }

    fn publish(&self, data: &mut BitCursor, version: u8) -> Result<()> {
        let mut body = body_cursor(version);
        body.write_rgb(self.color);
        write_tag(data, codes::SET_BACKGROUND_COLOR, body.as_bytes(), false);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn describe(&self, indent: usize, _flags: DumpFlags) -> String {
        format!(
            "{}Color: {}",
            tag_prefix(self.type_code(), self.name(), indent),
            color_to_string(self.color)
        )
    }
}

/// Label of the current frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameLabelTag {
    pub name: String,
    pub named_anchor: bool,
}

impl Tag for FrameLabelTag {
    fn type_code(&self) -> u16 {
        codes::FRAME_LABEL
    }

    fn parse(&mut self, data: &mut BitCursor, length: usize, _: u8, _: &mut ParseContext<'_>) -> Result<()> {
        let start = data.position();
        self.name = data.read_string()?;
        if data.position() - start < length {
            self.named_anchor = data.read_u8()? == 1;
        }
        Ok(())
    }

    fn publish(&self, data: &mut BitCursor, version: u8) -> Result<()> {
        let mut body = body_cursor(version);
        body.write_string(&self.name)?;
        if self.named_anchor {
            body.write_u8(1);
        }
        write_tag(data, codes::FRAME_LABEL, body.as_bytes(), false);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn describe(&self, indent: usize, _flags: DumpFlags) -> String {
        let mut s = format!(
            "{}Name: {}",
            tag_prefix(self.type_code(), self.name(), indent),
            self.name
        );
        if self.named_anchor {
            s.push_str(", NamedAnchor = true");
        }
        s
    }
}

/// Shared JPEG encoding tables for DefineBits images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JpegTablesTag {
    pub data: Vec<u8>,
}

impl Tag for JpegTablesTag {
    fn type_code(&self) -> u16 {
        codes::JPEG_TABLES
    }

    fn parse(&mut self, data: &mut BitCursor, length: usize, _: u8, _: &mut ParseContext<'_>) -> Result<()> {
        self.data = data.read_bytes(length)?;
        Ok(())
    }

    fn publish(&self, data: &mut BitCursor, _version: u8) -> Result<()> {
        write_tag(data, codes::JPEG_TABLES, &self.data, false);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn describe(&self, indent: usize, _flags: DumpFlags) -> String {
        format!(
            "{}Length: {}",
            tag_prefix(self.type_code(), self.name(), indent),
            self.data.len()
        )
    }
}

/// Any tag without a dedicated codec. The payload is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag {
    pub code: u16,
    pub payload: Vec<u8>,
    pub long_header: bool,
}

impl UnknownTag {
    pub fn new(code: u16) -> Self {
        Self {
            code,
            payload: Vec::new(),
            long_header: false,
        }
    }
}

impl Tag for UnknownTag {
    fn type_code(&self) -> u16 {
        self.code
    }

    fn parse(&mut self, data: &mut BitCursor, length: usize, _: u8, ctx: &mut ParseContext<'_>) -> Result<()> {
        self.long_header = ctx.header.is_long();
        self.payload = data.read_bytes(length)?;
        Ok(())
    }

    fn publish(&self, data: &mut BitCursor, _version: u8) -> Result<()> {
        write_tag(data, self.code, &self.payload, self.long_header);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn describe(&self, indent: usize, _flags: DumpFlags) -> String {
        format!(
            "{}Length: {}",
            tag_prefix(self.code, self.name(), indent),
            self.payload.len()
        )
    }
}
