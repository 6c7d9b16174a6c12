//! Synthetic SWF builders.
//!
//! Records are assembled byte by byte so tests can express inputs the tag
//! codecs would never produce: wrong declared lengths, forced long headers,
//! truncated payloads.

#![allow(dead_code)]

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lzma_rust2::{LzmaOptions, LzmaWriter};
use swfrust::tags::Tag;
use swfrust::{BitCursor, Matrix, Rectangle};

/// Short-form record when the body fits, long form otherwise.
pub fn record(code: u16, body: &[u8]) -> Vec<u8> {
    let mut c = BitCursor::new();
    c.write_tag_header(code, body.len() as u32, false);
    c.write_bytes(body);
    c.into_inner()
}

/// Record with a forced long header.
pub fn long_record(code: u16, body: &[u8]) -> Vec<u8> {
    let mut c = BitCursor::new();
    c.write_tag_header(code, body.len() as u32, true);
    c.write_bytes(body);
    c.into_inner()
}

/// The record a structured tag publishes.
pub fn tag_record(tag: &dyn Tag) -> Vec<u8> {
    let mut c = BitCursor::new();
    c.set_version(10);
    tag.publish(&mut c, 10).expect("tag publishes");
    c.into_inner()
}

/// DefineSprite record wrapping already-encoded records.
pub fn sprite_record(id: u16, frame_count: u16, records: &[Vec<u8>]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&id.to_le_bytes());
    body.extend_from_slice(&frame_count.to_le_bytes());
    for r in records {
        body.extend_from_slice(r);
    }
    record(swfrust::tags::codes::DEFINE_SPRITE, &body)
}

/// PlaceObject2 moving the object at `depth` by `(x, y)` twips.
pub fn move_record(depth: i16, x: i32, y: i32) -> Vec<u8> {
    tag_record(&swfrust::tags::PlaceObjectTag::modify(
        depth,
        Matrix::translate(x, y),
    ))
}

/// Assembles complete SWF files from records.
#[derive(Debug, Clone)]
pub struct SwfBuilder {
    pub version: u8,
    pub frame_size: Rectangle,
    pub frame_rate: f64,
    pub frame_count: u16,
    records: Vec<Vec<u8>>,
}

impl SwfBuilder {
    pub fn new() -> Self {
        Self {
            version: 10,
            frame_size: Rectangle::from_pixels(550, 400),
            frame_rate: 24.0,
            frame_count: 1,
            records: Vec::new(),
        }
    }

    pub fn frames(mut self, count: u16) -> Self {
        self.frame_count = count;
        self
    }

    pub fn record(mut self, bytes: Vec<u8>) -> Self {
        self.records.push(bytes);
        self
    }

    pub fn tag(self, tag: &dyn Tag) -> Self {
        self.record(tag_record(tag))
    }

    /// Everything after the signature and length fields.
    fn body(&self) -> Vec<u8> {
        let mut c = BitCursor::new();
        c.write_rect(&self.frame_size);
        c.write_fixed8(self.frame_rate);
        c.write_u16(self.frame_count);
        for r in &self.records {
            c.write_bytes(r);
        }
        c.into_inner()
    }

    /// Uncompressed `FWS` file.
    pub fn build_fws(&self) -> Vec<u8> {
        let body = self.body();
        let mut out = b"FWS".to_vec();
        out.push(self.version);
        out.extend_from_slice(&((body.len() + 8) as u32).to_le_bytes());
        out.extend_from_slice(&body);
        out
    }

    /// zlib `CWS` file.
    pub fn build_cws(&self) -> Vec<u8> {
        let body = self.body();
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(&body).expect("in-memory write");
        let compressed = encoder.finish().expect("in-memory finish");

        let mut out = b"CWS".to_vec();
        out.push(self.version);
        out.extend_from_slice(&((body.len() + 8) as u32).to_le_bytes());
        out.extend_from_slice(&compressed);
        out
    }

    /// LZMA `ZWS` file. The `.lzma` stream is rewritten to the SWF layout:
    /// compressed size, the five property bytes, then the data.
    pub fn build_zws(&self) -> Vec<u8> {
        let body = self.body();
        let options = LzmaOptions::with_preset(6);
        let mut writer = LzmaWriter::new_use_header(Vec::new(), &options, Some(body.len() as u64))
            .expect("lzma writer");
        writer.write_all(&body).expect("in-memory write");
        let stream = writer.finish().expect("in-memory finish");
        // properties (5), uncompressed size (8), data
        let (props, data) = (&stream[..5], &stream[13..]);

        let mut out = b"ZWS".to_vec();
        out.push(self.version);
        out.extend_from_slice(&((body.len() + 8) as u32).to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(props);
        out.extend_from_slice(data);
        out
    }
}

impl Default for SwfBuilder {
    fn default() -> Self {
        Self::new()
    }
}
