//! Structural assertions over loaded documents.

#![allow(dead_code)]

use swfrust::{Layer, StripType, SwfDocument, Timeline};

/// `(type, start, end)` for every strip of a layer.
pub fn strips(layer: &Layer) -> Vec<(StripType, usize, usize)> {
    layer
        .strips
        .iter()
        .map(|s| (s.strip_type, s.start_frame, s.end_frame))
        .collect()
}

/// Type codes of every slot, taken from the structured tag or else the raw
/// record.
pub fn type_codes(timeline: &Timeline) -> Vec<u16> {
    (0..timeline.tag_count())
        .map(|i| match (timeline.tag(i), timeline.raw_tag(i)) {
            (Some(tag), _) => tag.type_code(),
            (None, Some(raw)) => raw.header.code,
            (None, None) => panic!("slot {i} has neither a tag nor a raw record"),
        })
        .collect()
}

/// Assert two documents carry the same raw records in the same order.
pub fn assert_same_records(a: &SwfDocument, b: &SwfDocument) {
    assert_eq!(a.timeline.tag_count(), b.timeline.tag_count(), "tag count");
    for i in 0..a.timeline.tag_count() {
        let left = a.timeline.raw_tag(i).map(|r| &r.bytes);
        let right = b.timeline.raw_tag(i).map(|r| &r.bytes);
        assert_eq!(left, right, "raw record {i} differs");
    }
}
