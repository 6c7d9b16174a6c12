//! Definition tags with an opaque payload.

use std::any::Any;

use crate::document::DumpFlags;
use crate::error::{Result, SwfError};
use crate::io::BitCursor;

use super::{codes, tag_prefix, write_tag, ParseContext, Tag};

/// A definition tag whose payload after the character id is not modelled
/// (shapes, bitmaps, fonts, texts, buttons, sounds, videos, binary data).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionTag {
    pub code: u16,
    pub character_id: u16,
    pub body: Vec<u8>,
    pub long_header: bool,
}

impl DefinitionTag {
    pub fn new(code: u16) -> Self {
        Self {
            code,
            character_id: 0,
            body: Vec::new(),
            long_header: codes::is_bitmap(code),
        }
    }

    /// Definition of `character_id` with the given body.
    pub fn with_body(code: u16, character_id: u16, body: Vec<u8>) -> Self {
        Self {
            character_id,
            body,
            ..Self::new(code)
        }
    }

    pub fn is_morph_shape(&self) -> bool {
        codes::is_morph_shape(self.code)
    }
}

impl Tag for DefinitionTag {
    fn type_code(&self) -> u16 {
        self.code
    }

    fn parse(&mut self, data: &mut BitCursor, length: usize, _: u8, ctx: &mut ParseContext<'_>) -> Result<()> {
        if length < 2 {
            return Err(SwfError::InvalidFormat(format!(
                "{} content of {length} bytes has no character id",
                self.name()
            )));
        }
        self.long_header = ctx.header.is_long() || codes::is_bitmap(self.code);
        self.character_id = data.read_u16()?;
        self.body = data.read_bytes(length - 2)?;
        Ok(())
    }

    fn publish(&self, data: &mut BitCursor, _version: u8) -> Result<()> {
        let mut content = Vec::with_capacity(self.body.len() + 2);
        content.extend_from_slice(&self.character_id.to_le_bytes());
        content.extend_from_slice(&self.body);
        let force_long = self.long_header || codes::is_bitmap(self.code);
        write_tag(data, self.code, &content, force_long);
        Ok(())
    }

    fn character_id(&self) -> Option<u16> {
        Some(self.character_id)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn describe(&self, indent: usize, _flags: DumpFlags) -> String {
        format!(
            "{}ID: {}, Length: {}",
            tag_prefix(self.code, self.name(), indent),
            self.character_id,
            self.body.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{parse_one, publish_one};

    #[test]
    fn test_shape_round_trip() {
        let tag = DefinitionTag::with_body(codes::DEFINE_SHAPE, 1, vec![0x10, 0x20, 0x30]);
        let bytes = publish_one(&tag, 10);
        assert_eq!(bytes.len(), 2 + 2 + 3);
        let parsed: DefinitionTag = parse_one(&bytes, 10);
        assert_eq!(parsed, tag);
        assert_eq!(parsed.character_id(), Some(1));
        assert!(!parsed.is_morph_shape());
    }

    #[test]
    fn test_bitmap_forces_long_header() {
        let tag = DefinitionTag::with_body(codes::DEFINE_BITS_LOSSLESS, 2, vec![0; 4]);
        let bytes = publish_one(&tag, 10);
        assert_eq!(bytes.len(), 6 + 2 + 4);
        assert_eq!(bytes[0] & 0x3f, 0x3f);
    }

    #[test]
    fn test_missing_character_id() {
        let mut c = BitCursor::new();
        write_tag(&mut c, codes::DEFINE_SHAPE, &[1], false);
        let result = crate::test_support::try_parse(c.as_bytes(), 10);
        assert!(result.is_err());
    }
}
