//! Derived timeline state: dictionary, frames, scenes, sound stream and
//! layers, updated tag by tag while a stream is parsed.

use std::collections::BTreeMap;

use byteorder::{ByteOrder, LittleEndian};

use crate::notification::NotificationType;
use crate::tags::{
    codes, CharacterLookup, DefineSceneAndFrameLabelDataTag, DisplayListAction, FrameLabelTag,
    ParseContext, SetBackgroundColorTag, SoundCompression, SoundStreamBlockTag,
    SoundStreamHeadTag, Tag,
};

use super::{Layer, Scene, SoundStream, StripType, Timeline};

impl Timeline {
    /// Update the derived state for the tag about to be stored at `index`.
    ///
    /// Definition tags win over display-list tags, which win over the
    /// auxiliary type codes. Problems are reported as notifications.
    pub(super) fn process_tag(&mut self, index: usize, tag: &dyn Tag, ctx: &mut ParseContext<'_>) {
        if let Some(id) = tag.character_id().filter(|&id| id > 0) {
            if self.dictionary.insert(id, index).is_some() {
                ctx.notifications.notify(
                    NotificationType::Warning,
                    format!("character id {id} redefined by {} at index {index}", tag.name()),
                );
            }
            self.current_frame.characters.push(id);
            return;
        }

        if let Some(action) = tag.display_list() {
            match action {
                DisplayListAction::ShowFrame => self.close_frame(index),
                DisplayListAction::Place(place) => self.current_frame.place_object(index, place),
                DisplayListAction::Remove { depth } => {
                    self.current_frame.remove_object(depth);
                }
            }
            return;
        }

        match tag.type_code() {
            codes::FRAME_LABEL => {
                if let Some(label) = tag.downcast_ref::<FrameLabelTag>() {
                    self.current_frame.label = Some(label.name.clone());
                }
            }
            codes::DEFINE_SCENE_AND_FRAME_LABEL_DATA => {
                if let Some(data) = tag.downcast_ref::<DefineSceneAndFrameLabelDataTag>() {
                    for label in &data.frame_labels {
                        self.frame_labels
                            .insert(label.frame_number as usize, label.name.clone());
                    }
                    for scene in &data.scenes {
                        self.scenes.push(Scene::new(scene.offset, scene.name.clone()));
                    }
                }
            }
            codes::SOUND_STREAM_HEAD | codes::SOUND_STREAM_HEAD2 => {
                if let Some(head) = tag.downcast_ref::<SoundStreamHeadTag>() {
                    self.sound_stream = Some(SoundStream::from_head(head));
                    self.has_sound_stream = false;
                }
            }
            codes::SOUND_STREAM_BLOCK => {
                if let Some(block) = tag.downcast_ref::<SoundStreamBlockTag>() {
                    self.process_sound_block(index, block, ctx);
                }
            }
            codes::SET_BACKGROUND_COLOR => {
                if let Some(bg) = tag.downcast_ref::<SetBackgroundColorTag>() {
                    self.background_color = bg.color;
                }
            }
            codes::JPEG_TABLES => self.jpeg_tables = Some(index),
            _ => {}
        }
    }

    fn close_frame(&mut self, index: usize) {
        let frame = &mut self.current_frame;
        frame.tag_index_end = index;
        if frame.label.is_none() {
            frame.label = self.frame_labels.get(&frame.frame_number).cloned();
        }
        let next = frame.next_frame(self.frames.len() + 1, index + 1);
        let closed = std::mem::replace(&mut self.current_frame, next);
        self.frames.push(closed);
    }

    fn process_sound_block(
        &mut self,
        index: usize,
        block: &SoundStreamBlockTag,
        ctx: &mut ParseContext<'_>,
    ) {
        if !ctx.config.extract_sound_stream {
            return;
        }
        let Some(stream) = self.sound_stream.as_mut() else {
            return;
        };

        let first_block = !self.has_sound_stream;
        if first_block {
            self.has_sound_stream = true;
            stream.start_frame = self.current_frame.frame_number;
        }

        stream.num_frames += 1;
        match stream.compression {
            SoundCompression::MP3 => {
                if block.data.len() < 4 {
                    ctx.notifications.notify(
                        NotificationType::Warning,
                        format!("MP3 sound stream block at index {index} is shorter than 4 bytes"),
                    );
                    return;
                }
                let num_samples = LittleEndian::read_u16(&block.data[0..2]);
                let _seek_samples = LittleEndian::read_i16(&block.data[2..4]);
                if num_samples > 0 {
                    stream.num_samples += u32::from(num_samples);
                    stream.data.extend_from_slice(&block.data[4..]);
                }
            }
            SoundCompression::ADPCM => {
                if first_block {
                    ctx.notifications.notify(
                        NotificationType::NotImplemented,
                        "ADPCM sound stream extraction",
                    );
                }
            }
            _ => {}
        }
    }

    /// Drop an empty sound stream and build layers if configured.
    pub(super) fn finalize(&mut self, ctx: &mut ParseContext<'_>) {
        if self
            .sound_stream
            .as_ref()
            .is_some_and(|stream| stream.data.is_empty())
        {
            self.sound_stream = None;
        }
        if ctx.config.build_layers {
            self.build_layers(ctx.root);
        }
    }

    /// Derive one layer per depth from the frames and annotate every
    /// display object with its layer index.
    ///
    /// Morph shapes are resolved through `root`, or through this timeline
    /// when it is the root.
    pub fn build_layers(&mut self, root: Option<CharacterLookup<'_>>) {
        let layers = match root {
            Some(lookup) => self.derive_layers(lookup),
            None => self.derive_layers(self.lookup()),
        };

        let layer_of: BTreeMap<i16, usize> = layers
            .iter()
            .enumerate()
            .map(|(i, layer)| (layer.depth, i))
            .collect();
        for frame in &mut self.frames {
            for (depth, object) in frame.display_list.iter_mut() {
                object.layer = layer_of.get(depth).copied();
            }
        }
        self.layers = layers;
    }

    fn derive_layers(&self, lookup: CharacterLookup<'_>) -> Vec<Layer> {
        let mut depths: BTreeMap<i16, Vec<usize>> = BTreeMap::new();
        for (frame_index, frame) in self.frames.iter().enumerate() {
            for &depth in frame.display_list.keys() {
                depths.entry(depth).or_default().push(frame_index);
            }
        }

        let is_morph = |id: u16| {
            lookup
                .character(id)
                .is_some_and(|tag| codes::is_morph_shape(tag.type_code()))
        };

        let frame_count = self.frames.len();
        let mut layers = Vec::with_capacity(depths.len());
        for (depth, frame_indices) in depths {
            let mut layer = Layer::new(depth, frame_count);
            let mut strip_type = StripType::Empty;
            let mut start = 0;
            let mut end = 0;

            for (i, &frame_index) in frame_indices.iter().enumerate() {
                let Some(object) = self
                    .frames
                    .get(frame_index)
                    .and_then(|frame| frame.display_list.get(&depth))
                else {
                    continue;
                };
                if object.is_keyframe {
                    if i > 0 {
                        layer.append_strip(strip_type, start, end);
                    }
                    strip_type = if is_morph(object.character_id) {
                        StripType::ShapeTween
                    } else {
                        StripType::Static
                    };
                    start = frame_index;
                } else if strip_type == StripType::Static && object.last_modified_at_index > 0 {
                    strip_type = StripType::MotionTween;
                }
                end = frame_index;
            }

            layer.append_strip(strip_type, start, end);
            layer.close();
            layers.push(layer);
        }
        layers
    }
}
