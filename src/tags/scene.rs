//! DefineSceneAndFrameLabelData.

use std::any::Any;
use std::fmt::Write as _;

use crate::document::DumpFlags;
use crate::error::Result;
use crate::io::BitCursor;

use super::{body_cursor, codes, tag_prefix, write_tag, ParseContext, Tag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneEntry {
    pub offset: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLabelEntry {
    pub frame_number: u32,
    pub name: String,
}

/// Scene offsets and frame labels of the main timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefineSceneAndFrameLabelDataTag {
    pub scenes: Vec<SceneEntry>,
    pub frame_labels: Vec<FrameLabelEntry>,
}

impl Tag for DefineSceneAndFrameLabelDataTag {
    fn type_code(&self) -> u16 {
        codes::DEFINE_SCENE_AND_FRAME_LABEL_DATA
    }

    fn parse(&mut self, data: &mut BitCursor, _: usize, _: u8, _: &mut ParseContext<'_>) -> Result<()> {
        let scene_count = data.read_encoded_u32()?;
        for _ in 0..scene_count {
            let offset = data.read_encoded_u32()?;
            let name = data.read_string()?;
            self.scenes.push(SceneEntry { offset, name });
        }
        let label_count = data.read_encoded_u32()?;
        for _ in 0..label_count {
            let frame_number = data.read_encoded_u32()?;
            let name = data.read_string()?;
            self.frame_labels.push(FrameLabelEntry { frame_number, name });
        }
        Ok(())
    }

    fn publish(&self, data: &mut BitCursor, version: u8) -> Result<()> {
        let mut body = body_cursor(version);
        body.write_encoded_u32(self.scenes.len() as u32);
        for scene in &self.scenes {
            body.write_encoded_u32(scene.offset);
            body.write_string(&scene.name)?;
        }
        body.write_encoded_u32(self.frame_labels.len() as u32);
        for label in &self.frame_labels {
            body.write_encoded_u32(label.frame_number);
            body.write_string(&label.name)?;
        }
        write_tag(data, self.type_code(), body.as_bytes(), false);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn describe(&self, indent: usize, _flags: DumpFlags) -> String {
        let mut s = tag_prefix(self.type_code(), self.name(), indent);
        let pad = " ".repeat(indent + 2);
        if !self.scenes.is_empty() {
            let _ = write!(s, "\n{pad}Scenes:");
            for (i, scene) in self.scenes.iter().enumerate() {
                let _ = write!(s, "\n{pad}  [{i}] Frame: {}, Name: {}", scene.offset, scene.name);
            }
        }
        if !self.frame_labels.is_empty() {
            let _ = write!(s, "\n{pad}Frame Labels:");
            for (i, label) in self.frame_labels.iter().enumerate() {
                let _ = write!(s, "\n{pad}  [{i}] Frame: {}, Name: {}", label.frame_number, label.name);
            }
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{parse_one, publish_one};

    #[test]
    fn test_round_trip() {
        let tag = DefineSceneAndFrameLabelDataTag {
            scenes: vec![
                SceneEntry { offset: 0, name: "Scene 1".into() },
                SceneEntry { offset: 200, name: "Scene 2".into() },
            ],
            frame_labels: vec![FrameLabelEntry { frame_number: 3, name: "start".into() }],
        };
        let bytes = publish_one(&tag, 10);
        let parsed: DefineSceneAndFrameLabelDataTag = parse_one(&bytes, 10);
        assert_eq!(parsed, tag);

        let dump = parsed.describe(0, DumpFlags::empty());
        assert!(dump.contains("[1] Frame: 200, Name: Scene 2"));
        assert!(dump.contains("Name: start"));
    }
}
