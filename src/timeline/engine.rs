//! Sequential tag parse and publish loops.

use crate::error::{Result, SwfError};
use crate::io::BitCursor;
use crate::notification::NotificationType;
use crate::tags::{body_cursor, codes, CharacterLookup, ParseContext, RawTag};

use super::Timeline;

impl Timeline {
    /// Parse tags from the cursor position up to `end`, replacing the
    /// current contents.
    ///
    /// Each record is captured as a [`RawTag`] before its codec runs. After
    /// the codec the cursor is moved to the declared end of the record; a
    /// codec that consumed a different number of bytes is reported as a
    /// `StreamDesync` notification. Parsing stops at an End tag or at `end`.
    ///
    /// A codec error aborts with [`SwfError::TagParse`] unless the
    /// configuration is failsafe, in which case the slot keeps only the raw
    /// record.
    pub fn parse_tags(
        &mut self,
        data: &mut BitCursor,
        version: u8,
        end: usize,
        ctx: &mut ParseContext<'_>,
    ) -> Result<()> {
        self.clear();
        let end = end.min(data.len());

        loop {
            let pos = data.position();
            if pos >= end {
                ctx.notifications.notify(
                    NotificationType::UnterminatedStream,
                    format!("tag stream ended at position {pos} without an End tag"),
                );
                break;
            }

            let raw = RawTag::read(data)?;
            let header = raw.header;
            let boundary = pos + header.tag_length();
            let index = self.tags.len();
            data.set_position(pos + header.header_length as usize);

            let mut tag = ctx.registry.create(header.code);
            let name = tag.name();
            let parsed = {
                let root = ctx
                    .root
                    .unwrap_or_else(|| CharacterLookup::new(&self.dictionary, &self.tags));
                let mut child = ParseContext {
                    registry: ctx.registry,
                    config: ctx.config,
                    header,
                    root: Some(root),
                    notifications: &mut *ctx.notifications,
                };
                tag.parse(data, header.content_length as usize, version, &mut child)
            };

            if let Err(source) = parsed {
                if !ctx.config.failsafe {
                    return Err(SwfError::TagParse {
                        index,
                        code: header.code,
                        name,
                        raw: Box::new(raw),
                        source: Box::new(source),
                    });
                }
                ctx.notifications.notify(
                    NotificationType::TagFallback,
                    format!("{name} (index {index}) kept as raw tag: {source}"),
                );
                self.tags.push(None);
                self.raw_tags.push(Some(raw));
                data.set_position(boundary);
                if header.code == codes::END {
                    break;
                }
                continue;
            }

            self.process_tag(index, tag.as_ref(), ctx);
            self.tags.push(Some(tag));
            self.raw_tags.push(Some(raw));

            if data.position() != boundary {
                let excess = boundary as i64 - data.position() as i64;
                let mut message = format!("excess bytes: {excess}, Tag: {name}, Index: {index}");
                if let Some(root) = ctx.root {
                    message.push_str(&format!(", IndexRoot: {}", root.tag_count()));
                }
                ctx.notifications
                    .notify(NotificationType::StreamDesync, message);
                data.set_position(boundary);
            }

            if header.code == codes::END {
                break;
            }
        }

        self.finalize(ctx);
        Ok(())
    }

    /// Write every tag slot: the structured tag when present, else the raw
    /// record. A structured tag that fails to publish falls back to its raw
    /// record. Publishing stops after an End tag.
    pub fn publish_tags(&self, data: &mut BitCursor, version: u8) -> Result<()> {
        for index in 0..self.tag_count() {
            let raw = self.raw_tag(index);
            let Some(tag) = self.tag(index) else {
                match raw {
                    Some(raw) => raw.publish(data),
                    None => return Err(SwfError::PublishFallback { index }),
                }
                continue;
            };

            let mut record = body_cursor(version);
            match tag.publish(&mut record, version) {
                Ok(()) => data.write_bytes(record.as_bytes()),
                Err(e) => match raw {
                    Some(raw) => {
                        log::warn!(
                            "publish error: {e} (tag: {}, index: {index}), writing raw tag",
                            tag.name()
                        );
                        raw.publish(data);
                    }
                    None => return Err(e),
                },
            }

            if tag.type_code() == codes::END {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::reader::SwfReaderConfiguration;
    use crate::tags::{write_tag, DefinitionTag, EndTag, ShowFrameTag, Tag, UnknownTag};
    use crate::test_support::try_parse_timeline as parse;
    use crate::test_support::tag_stream as stream;

    #[test]
    fn test_lock_step_lists() {
        let shape = DefinitionTag::with_body(codes::DEFINE_SHAPE, 1, vec![0; 5]);
        let bytes = stream(&[&shape, &ShowFrameTag, &EndTag]);
        let (timeline, notes) = parse(bytes.clone(), SwfReaderConfiguration::default());
        let timeline = timeline.unwrap();
        assert_eq!(timeline.tags.len(), 3);
        assert_eq!(timeline.raw_tags.len(), 3);
        assert!(notes.is_empty());

        let mut out = BitCursor::new();
        timeline.publish_tags(&mut out, 10).unwrap();
        assert_eq!(out.as_bytes(), &bytes[..]);
    }

    #[test]
    fn test_unterminated_stream() {
        let bytes = stream(&[&ShowFrameTag, &ShowFrameTag]);
        let (timeline, notes) = parse(bytes, SwfReaderConfiguration::default());
        assert_eq!(timeline.unwrap().frames.len(), 2);
        assert!(notes.has_type(NotificationType::UnterminatedStream));
    }

    #[test]
    fn test_desync_resyncs_to_declared_boundary() {
        // SetBackgroundColor declaring 5 content bytes; the codec reads 3.
        let mut data = BitCursor::new();
        write_tag(&mut data, codes::SET_BACKGROUND_COLOR, &[1, 2, 3, 0xee, 0xee], false);
        ShowFrameTag.publish(&mut data, 10).unwrap();
        EndTag.publish(&mut data, 10).unwrap();

        let (timeline, notes) = parse(data.into_inner(), SwfReaderConfiguration::default());
        let timeline = timeline.unwrap();
        assert_eq!(timeline.tags.len(), 3);
        assert_eq!(timeline.frames.len(), 1);
        assert_eq!(timeline.background_color, 0xff01_0203);

        let desync = notes.of_type(NotificationType::StreamDesync);
        assert_eq!(desync.len(), 1);
        assert_eq!(
            desync[0].message,
            "excess bytes: 2, Tag: SetBackgroundColor, Index: 0"
        );
    }

    #[test]
    fn test_parse_error_strict_and_failsafe() {
        // DefineShape without room for a character id.
        let mut data = BitCursor::new();
        write_tag(&mut data, codes::DEFINE_SHAPE, &[7], false);
        EndTag.publish(&mut data, 10).unwrap();
        let bytes = data.into_inner();

        let (strict, _) = parse(bytes.clone(), SwfReaderConfiguration::default());
        match strict {
            Err(SwfError::TagParse { index, code, raw, .. }) => {
                assert_eq!(index, 0);
                assert_eq!(code, codes::DEFINE_SHAPE);
                assert_eq!(raw.bytes, &bytes[..3]);
            }
            other => panic!("expected a tag parse error, got {other:?}"),
        }

        let config = SwfReaderConfiguration {
            failsafe: true,
            ..Default::default()
        };
        let (timeline, notes) = parse(bytes.clone(), config);
        let timeline = timeline.unwrap();
        assert!(timeline.tags[0].is_none());
        assert!(timeline.raw_tags[0].is_some());
        assert!(timeline.dictionary.is_empty());
        assert!(notes.has_type(NotificationType::TagFallback));

        let mut out = BitCursor::new();
        timeline.publish_tags(&mut out, 10).unwrap();
        assert_eq!(out.as_bytes(), &bytes[..]);
    }

    #[test]
    fn test_publish_fallback_error() {
        let mut timeline = Timeline::new();
        timeline.tags.push(None);
        timeline.raw_tags.push(None);
        let mut out = BitCursor::new();
        assert!(matches!(
            timeline.publish_tags(&mut out, 10),
            Err(SwfError::PublishFallback { index: 0 })
        ));
    }

    #[test]
    fn test_publish_stops_after_end() {
        let mut timeline = Timeline::new();
        timeline.push_tag(Box::new(EndTag));
        timeline.push_tag(Box::new(UnknownTag::new(codes::PROTECT)));
        let mut out = BitCursor::new();
        timeline.publish_tags(&mut out, 10).unwrap();
        assert_eq!(out.as_bytes(), &[0, 0]);
    }
}
