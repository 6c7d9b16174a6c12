//! PlaceObject / PlaceObject2 / PlaceObject3 and RemoveObject / RemoveObject2.

use std::any::Any;
use std::fmt::Write as _;

use bitflags::bitflags;

use crate::document::DumpFlags;
use crate::error::{Result, SwfError};
use crate::io::BitCursor;
use crate::types::{color_to_string, ColorTransform, Matrix};

use super::{
    body_cursor, codes, remaining, tag_prefix, write_tag, DisplayListAction, ParseContext, Tag,
};

bitflags! {
    /// First flag byte of PlaceObject2 and PlaceObject3.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PlaceFlags: u8 {
        const HAS_CLIP_ACTIONS = 0x80;
        const HAS_CLIP_DEPTH = 0x40;
        const HAS_NAME = 0x20;
        const HAS_RATIO = 0x10;
        const HAS_COLOR_TRANSFORM = 0x08;
        const HAS_MATRIX = 0x04;
        const HAS_CHARACTER = 0x02;
        /// Modify the object already at the depth.
        const MOVE = 0x01;
    }
}

bitflags! {
    /// Second flag byte of PlaceObject3.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PlaceFlags3: u8 {
        const HAS_OPAQUE_BACKGROUND = 0x40;
        const HAS_VISIBLE = 0x20;
        const HAS_IMAGE = 0x10;
        const HAS_CLASS_NAME = 0x08;
        const HAS_CACHE_AS_BITMAP = 0x04;
        const HAS_BLEND_MODE = 0x02;
        const HAS_FILTER_LIST = 0x01;
    }
}

/// Places, moves or replaces a character instance at a depth.
///
/// `version` selects the record layout (1, 2 or 3). Optional fields are
/// written when present; the flag bytes are derived from them. Clip actions
/// are kept opaque, and for PlaceObject3 records with a filter list the
/// remainder of the record after the clip depth is kept opaque as well.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceObjectTag {
    pub version: u8,
    pub depth: i16,
    /// `None` when the record does not name a character. A record may name
    /// character 0.
    pub character_id: Option<u16>,
    pub is_move: bool,
    pub matrix: Option<Matrix>,
    pub color_transform: Option<ColorTransform>,
    pub ratio: Option<u16>,
    pub instance_name: Option<String>,
    pub clip_depth: Option<u16>,
    pub class_name: Option<String>,
    pub has_image: bool,
    pub blend_mode: Option<u8>,
    pub bitmap_cache: Option<u8>,
    pub visible: Option<u8>,
    pub background_color: Option<u32>,
    /// Filter list and everything after it (PlaceObject3 only).
    pub filter_data: Option<Vec<u8>>,
    pub clip_actions: Option<Vec<u8>>,
}

impl PlaceObjectTag {
    /// Empty record of the given layout version (1, 2 or 3).
    pub fn new(version: u8) -> Self {
        Self {
            version,
            depth: 0,
            character_id: None,
            is_move: false,
            matrix: None,
            color_transform: None,
            ratio: None,
            instance_name: None,
            clip_depth: None,
            class_name: None,
            has_image: false,
            blend_mode: None,
            bitmap_cache: None,
            visible: None,
            background_color: None,
            filter_data: None,
            clip_actions: None,
        }
    }

    /// PlaceObject2 placing `character_id` at `depth`.
    pub fn place(depth: i16, character_id: u16) -> Self {
        Self {
            depth,
            character_id: Some(character_id),
            ..Self::new(2)
        }
    }

    /// PlaceObject2 modifying the object at `depth`.
    pub fn modify(depth: i16, matrix: Matrix) -> Self {
        Self {
            depth,
            is_move: true,
            matrix: Some(matrix),
            ..Self::new(2)
        }
    }

    pub fn has_character(&self) -> bool {
        self.character_id.is_some()
    }

    pub fn flags(&self) -> PlaceFlags {
        let mut flags = PlaceFlags::empty();
        flags.set(PlaceFlags::HAS_CLIP_ACTIONS, self.clip_actions.is_some());
        flags.set(PlaceFlags::HAS_CLIP_DEPTH, self.clip_depth.is_some());
        flags.set(PlaceFlags::HAS_NAME, self.instance_name.is_some());
        flags.set(PlaceFlags::HAS_RATIO, self.ratio.is_some());
        flags.set(PlaceFlags::HAS_COLOR_TRANSFORM, self.color_transform.is_some());
        flags.set(PlaceFlags::HAS_MATRIX, self.matrix.is_some());
        flags.set(PlaceFlags::HAS_CHARACTER, self.has_character());
        flags.set(PlaceFlags::MOVE, self.is_move);
        flags
    }

    pub fn flags3(&self) -> PlaceFlags3 {
        let mut flags = PlaceFlags3::empty();
        flags.set(PlaceFlags3::HAS_OPAQUE_BACKGROUND, self.background_color.is_some());
        flags.set(PlaceFlags3::HAS_VISIBLE, self.visible.is_some());
        flags.set(PlaceFlags3::HAS_IMAGE, self.has_image);
        flags.set(PlaceFlags3::HAS_CLASS_NAME, self.class_name.is_some());
        flags.set(PlaceFlags3::HAS_CACHE_AS_BITMAP, self.bitmap_cache.is_some());
        flags.set(PlaceFlags3::HAS_BLEND_MODE, self.blend_mode.is_some());
        flags.set(PlaceFlags3::HAS_FILTER_LIST, self.filter_data.is_some());
        flags
    }

    fn parse_v1(&mut self, data: &mut BitCursor, end: usize) -> Result<()> {
        self.character_id = Some(data.read_u16()?);
        self.depth = data.read_i16()?;
        self.matrix = Some(data.read_matrix()?);
        if remaining(data, end) > 0 {
            self.color_transform = Some(data.read_cxform(false)?);
        }
        Ok(())
    }

    fn parse_v2(&mut self, data: &mut BitCursor, end: usize) -> Result<()> {
        let flags = PlaceFlags::from_bits_retain(data.read_u8()?);
        let flags3 = if self.version >= 3 {
            PlaceFlags3::from_bits_retain(data.read_u8()?)
        } else {
            PlaceFlags3::empty()
        };
        self.is_move = flags.contains(PlaceFlags::MOVE);
        self.has_image = flags3.contains(PlaceFlags3::HAS_IMAGE);
        self.depth = data.read_i16()?;

        if flags3.contains(PlaceFlags3::HAS_CLASS_NAME)
            || (self.has_image && flags.contains(PlaceFlags::HAS_CHARACTER))
        {
            self.class_name = Some(data.read_string()?);
        }
        if flags.contains(PlaceFlags::HAS_CHARACTER) {
            self.character_id = Some(data.read_u16()?);
        }
        if flags.contains(PlaceFlags::HAS_MATRIX) {
            self.matrix = Some(data.read_matrix()?);
        }
        if flags.contains(PlaceFlags::HAS_COLOR_TRANSFORM) {
            self.color_transform = Some(data.read_cxform(true)?);
        }
        if flags.contains(PlaceFlags::HAS_RATIO) {
            self.ratio = Some(data.read_u16()?);
        }
        if flags.contains(PlaceFlags::HAS_NAME) {
            self.instance_name = Some(data.read_string()?);
        }
        if flags.contains(PlaceFlags::HAS_CLIP_DEPTH) {
            self.clip_depth = Some(data.read_u16()?);
        }

        if flags3.contains(PlaceFlags3::HAS_FILTER_LIST) {
            let rest = remaining(data, end);
            self.filter_data = Some(data.read_bytes(rest)?);
            return Ok(());
        }
        if flags3.contains(PlaceFlags3::HAS_BLEND_MODE) {
            self.blend_mode = Some(data.read_u8()?);
        }
        if flags3.contains(PlaceFlags3::HAS_CACHE_AS_BITMAP) {
            self.bitmap_cache = Some(data.read_u8()?);
        }
        if flags3.contains(PlaceFlags3::HAS_VISIBLE) {
            self.visible = Some(data.read_u8()?);
        }
        if flags3.contains(PlaceFlags3::HAS_OPAQUE_BACKGROUND) {
            self.background_color = Some(data.read_rgba()?);
        }
        if flags.contains(PlaceFlags::HAS_CLIP_ACTIONS) {
            let rest = remaining(data, end);
            self.clip_actions = Some(data.read_bytes(rest)?);
        }
        Ok(())
    }

    fn publish_v1(&self, body: &mut BitCursor) {
        body.write_u16(self.character_id.unwrap_or(0));
        body.write_i16(self.depth);
        body.write_matrix(&self.matrix.unwrap_or_default());
        if let Some(cx) = &self.color_transform {
            body.write_cxform(&ColorTransform {
                has_alpha: false,
                ..*cx
            });
        }
    }

    fn publish_v2(&self, body: &mut BitCursor) -> Result<()> {
        body.write_u8(self.flags().bits());
        if self.version >= 3 {
            body.write_u8(self.flags3().bits());
        }
        body.write_i16(self.depth);

        if self.version >= 3 {
            let needs_class = self.has_image && self.has_character();
            match &self.class_name {
                Some(name) => body.write_string(name)?,
                None if needs_class => body.write_string("")?,
                None => {}
            }
        }
        if let Some(id) = self.character_id {
            body.write_u16(id);
        }
        if let Some(matrix) = &self.matrix {
            body.write_matrix(matrix);
        }
        if let Some(cx) = &self.color_transform {
            body.write_cxform(&ColorTransform {
                has_alpha: true,
                ..*cx
            });
        }
        if let Some(ratio) = self.ratio {
            body.write_u16(ratio);
        }
        if let Some(name) = &self.instance_name {
            body.write_string(name)?;
        }
        if let Some(clip_depth) = self.clip_depth {
            body.write_u16(clip_depth);
        }

        if self.version >= 3 {
            if let Some(rest) = &self.filter_data {
                body.write_bytes(rest);
                return Ok(());
            }
            if let Some(mode) = self.blend_mode {
                body.write_u8(mode);
            }
            if let Some(cache) = self.bitmap_cache {
                body.write_u8(cache);
            }
            if let Some(visible) = self.visible {
                body.write_u8(visible);
            }
            if let Some(color) = self.background_color {
                body.write_rgba(color);
            }
        }
        if let Some(actions) = &self.clip_actions {
            body.write_bytes(actions);
        }
        Ok(())
    }
}

impl Default for PlaceObjectTag {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Tag for PlaceObjectTag {
    fn type_code(&self) -> u16 {
        match self.version {
            1 => codes::PLACE_OBJECT,
            2 => codes::PLACE_OBJECT2,
            _ => codes::PLACE_OBJECT3,
        }
    }

    fn parse(&mut self, data: &mut BitCursor, length: usize, _: u8, _: &mut ParseContext<'_>) -> Result<()> {
        let end = data.position() + length;
        match self.version {
            1 => self.parse_v1(data, end),
            2 | 3 => self.parse_v2(data, end),
            other => Err(SwfError::InvalidFormat(format!(
                "unknown PlaceObject layout version {other}"
            ))),
        }
    }

    fn publish(&self, data: &mut BitCursor, version: u8) -> Result<()> {
        let mut body = body_cursor(version);
        if self.version == 1 {
            self.publish_v1(&mut body);
        } else {
            self.publish_v2(&mut body)?;
        }
        write_tag(data, self.type_code(), body.as_bytes(), false);
        Ok(())
    }

    fn display_list(&self) -> Option<DisplayListAction<'_>> {
        Some(DisplayListAction::Place(self))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn describe(&self, indent: usize, _flags: DumpFlags) -> String {
        let mut s = format!(
            "{}Depth: {}",
            tag_prefix(self.type_code(), self.name(), indent),
            self.depth
        );
        if let Some(id) = self.character_id {
            let _ = write!(s, ", CharacterID: {id}");
        }
        if self.is_move {
            s.push_str(", Move: true");
        }
        if let Some(name) = &self.class_name {
            let _ = write!(s, ", ClassName: {name}");
        }
        if let Some(name) = &self.instance_name {
            let _ = write!(s, ", Name: {name}");
        }
        if let Some(ratio) = self.ratio {
            let _ = write!(s, ", Ratio: {ratio}");
        }
        if let Some(clip_depth) = self.clip_depth {
            let _ = write!(s, ", ClipDepth: {clip_depth}");
        }
        if let Some(mode) = self.blend_mode {
            let _ = write!(s, ", BlendMode: {mode}");
        }
        if let Some(color) = self.background_color {
            let _ = write!(s, ", BackgroundColor: {}", color_to_string(color));
        }
        let pad = " ".repeat(indent + 2);
        if let Some(matrix) = &self.matrix {
            let _ = write!(s, "\n{pad}Matrix: {matrix}");
        }
        if let Some(cx) = &self.color_transform {
            let _ = write!(s, "\n{pad}ColorTransform: {cx}");
        }
        if let Some(filters) = &self.filter_data {
            let _ = write!(s, "\n{pad}Filters: {} bytes", filters.len());
        }
        if let Some(actions) = &self.clip_actions {
            let _ = write!(s, "\n{pad}ClipActions: {} bytes", actions.len());
        }
        s
    }
}

/// Clears a depth. Version 1 also names the character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveObjectTag {
    pub version: u8,
    pub character_id: u16,
    pub depth: i16,
}

impl RemoveObjectTag {
    /// RemoveObject2 for `depth`.
    pub fn new(depth: i16) -> Self {
        Self {
            version: 2,
            character_id: 0,
            depth,
        }
    }
}

impl Tag for RemoveObjectTag {
    fn type_code(&self) -> u16 {
        if self.version == 1 {
            codes::REMOVE_OBJECT
        } else {
            codes::REMOVE_OBJECT2
        }
    }

    fn parse(&mut self, data: &mut BitCursor, _: usize, _: u8, _: &mut ParseContext<'_>) -> Result<()> {
        if self.version == 1 {
            self.character_id = data.read_u16()?;
        }
        self.depth = data.read_i16()?;
        Ok(())
    }

    fn publish(&self, data: &mut BitCursor, version: u8) -> Result<()> {
        let mut body = body_cursor(version);
        if self.version == 1 {
            body.write_u16(self.character_id);
        }
        body.write_i16(self.depth);
        write_tag(data, self.type_code(), body.as_bytes(), false);
        Ok(())
    }

    fn display_list(&self) -> Option<DisplayListAction<'_>> {
        Some(DisplayListAction::Remove { depth: self.depth })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn describe(&self, indent: usize, _flags: DumpFlags) -> String {
        let mut s = format!(
            "{}Depth: {}",
            tag_prefix(self.type_code(), self.name(), indent),
            self.depth
        );
        if self.version == 1 {
            let _ = write!(s, ", CharacterID: {}", self.character_id);
        }
        s
    }
}
