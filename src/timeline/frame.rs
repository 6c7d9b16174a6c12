//! Frames and the per-depth display objects they hold.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::tags::PlaceObjectTag;
use crate::types::{ColorTransform, Matrix};

/// Character instance occupying a depth in a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayObject {
    pub depth: i16,
    pub clip_depth: Option<u16>,
    pub character_id: u16,
    pub class_name: Option<String>,
    pub instance_name: Option<String>,
    pub matrix: Option<Matrix>,
    pub color_transform: Option<ColorTransform>,
    pub ratio: Option<u16>,
    /// Tag index of the placement that put the character here.
    pub placed_at_index: usize,
    /// Tag index of the last modification, 0 if never modified.
    pub last_modified_at_index: usize,
    /// Set when the character was (re)placed in this frame.
    pub is_keyframe: bool,
    /// Positional layer index, filled in by layer building.
    pub layer: Option<usize>,
}

impl DisplayObject {
    fn from_place(tag_index: usize, tag: &PlaceObjectTag) -> Self {
        Self {
            depth: tag.depth,
            clip_depth: tag.clip_depth,
            character_id: tag.character_id.unwrap_or(0),
            class_name: tag.class_name.clone(),
            instance_name: None,
            matrix: None,
            color_transform: None,
            ratio: None,
            placed_at_index: tag_index,
            last_modified_at_index: 0,
            is_keyframe: true,
            layer: None,
        }
    }

    fn describe(&self) -> String {
        let mut s = format!(
            "Depth: {}, CharacterID: {}, PlacedAt: {}",
            self.depth, self.character_id, self.placed_at_index
        );
        if self.last_modified_at_index > 0 {
            let _ = write!(s, ", LastModifiedAt: {}", self.last_modified_at_index);
        }
        if let Some(clip_depth) = self.clip_depth {
            let _ = write!(s, ", ClipDepth: {clip_depth}");
        }
        if let Some(name) = &self.class_name {
            let _ = write!(s, ", ClassName: {name}");
        }
        if self.is_keyframe {
            s.push_str(", IsKeyframe");
        }
        s
    }
}

/// A frame: the tags `[tag_index_start, tag_index_end]` and the display
/// list after its last tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub frame_number: usize,
    pub tag_index_start: usize,
    pub tag_index_end: usize,
    pub label: Option<String>,
    pub display_list: BTreeMap<i16, DisplayObject>,
    /// Characters defined while this frame was open.
    pub characters: Vec<u16>,
}

impl Frame {
    pub fn new(frame_number: usize, tag_index_start: usize) -> Self {
        Self {
            frame_number,
            tag_index_start,
            tag_index_end: tag_index_start,
            ..Self::default()
        }
    }

    /// Number of tags in the frame, ShowFrame included.
    pub fn tag_count(&self) -> usize {
        (self.tag_index_end + 1).saturating_sub(self.tag_index_start)
    }

    /// Apply a PlaceObject record found at `tag_index`.
    pub fn place_object(&mut self, tag_index: usize, tag: &PlaceObjectTag) {
        let object = match self.display_list.entry(tag.depth) {
            Entry::Occupied(entry) => {
                let object = entry.into_mut();
                if let Some(id) = tag.character_id.filter(|&id| id != 0) {
                    object.character_id = id;
                    object.placed_at_index = tag_index;
                    object.last_modified_at_index = 0;
                    object.is_keyframe = true;
                } else {
                    object.last_modified_at_index = tag_index;
                    object.is_keyframe = false;
                }
                object
            }
            Entry::Vacant(entry) => entry.insert(DisplayObject::from_place(tag_index, tag)),
        };

        if let Some(matrix) = tag.matrix {
            object.matrix = Some(matrix);
        }
        if let Some(cx) = tag.color_transform {
            object.color_transform = Some(cx);
        }
        if let Some(ratio) = tag.ratio {
            object.ratio = Some(ratio);
        }
        if let Some(clip_depth) = tag.clip_depth {
            object.clip_depth = Some(clip_depth);
        }
        if let Some(name) = &tag.instance_name {
            object.instance_name = Some(name.clone());
        }
        if let Some(name) = &tag.class_name {
            object.class_name = Some(name.clone());
        }
    }

    pub fn remove_object(&mut self, depth: i16) -> Option<DisplayObject> {
        self.display_list.remove(&depth)
    }

    /// Start the following frame: a deep copy of the display list with the
    /// keyframe flags cleared. Label and characters start empty.
    pub fn next_frame(&self, frame_number: usize, tag_index_start: usize) -> Frame {
        let display_list = self
            .display_list
            .iter()
            .map(|(&depth, object)| {
                let mut object = object.clone();
                object.is_keyframe = false;
                (depth, object)
            })
            .collect();
        Frame {
            display_list,
            ..Frame::new(frame_number, tag_index_start)
        }
    }

    pub fn describe(&self, indent: usize) -> String {
        let pad = " ".repeat(indent);
        let mut s = format!(
            "{pad}[{}] Start: {}, Length: {}",
            self.frame_number,
            self.tag_index_start,
            self.tag_count()
        );
        if let Some(label) = &self.label {
            let _ = write!(s, ", Label: {label}");
        }
        if !self.characters.is_empty() {
            let ids: Vec<String> = self.characters.iter().map(u16::to_string).collect();
            let _ = write!(s, "\n{pad}  Defined CharacterIDs: {}", ids.join(", "));
        }
        for object in self.display_list.values() {
            let _ = write!(s, "\n{pad}  {}", object.describe());
        }
        s
    }
}
