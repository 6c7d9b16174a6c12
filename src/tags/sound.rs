//! Streaming sound tags.

use std::any::Any;

use crate::document::DumpFlags;
use crate::error::Result;
use crate::io::BitCursor;

use super::{body_cursor, codes, remaining, tag_prefix, write_tag, ParseContext, Tag};

/// Sound compression formats.
pub struct SoundCompression;

impl SoundCompression {
    pub const UNCOMPRESSED_NATIVE_ENDIAN: u8 = 0;
    pub const ADPCM: u8 = 1;
    pub const MP3: u8 = 2;
    pub const UNCOMPRESSED_LITTLE_ENDIAN: u8 = 3;
    pub const NELLYMOSER_16_KHZ: u8 = 4;
    pub const NELLYMOSER_8_KHZ: u8 = 5;
    pub const NELLYMOSER: u8 = 6;
    pub const SPEEX: u8 = 11;

    pub fn name(format: u8) -> &'static str {
        match format {
            Self::UNCOMPRESSED_NATIVE_ENDIAN => "Uncompressed Native Endian",
            Self::ADPCM => "ADPCM",
            Self::MP3 => "MP3",
            Self::UNCOMPRESSED_LITTLE_ENDIAN => "Uncompressed Little Endian",
            Self::NELLYMOSER_16_KHZ => "Nellymoser 16kHz",
            Self::NELLYMOSER_8_KHZ => "Nellymoser 8kHz",
            Self::NELLYMOSER => "Nellymoser",
            Self::SPEEX => "Speex",
            _ => "unknown",
        }
    }
}

/// SoundStreamHead (`version` 1) and SoundStreamHead2 (`version` 2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundStreamHeadTag {
    pub version: u8,
    pub playback_rate: u8,
    pub playback_size: u8,
    pub playback_type: u8,
    pub stream_compression: u8,
    pub stream_rate: u8,
    pub stream_size: u8,
    pub stream_type: u8,
    pub sample_count: u16,
    /// Present for MP3 streams only.
    pub latency_seek: Option<i16>,
}

impl SoundStreamHeadTag {
    pub fn new(version: u8) -> Self {
        Self {
            version,
            playback_rate: 0,
            playback_size: 0,
            playback_type: 0,
            stream_compression: 0,
            stream_rate: 0,
            stream_size: 0,
            stream_type: 0,
            sample_count: 0,
            latency_seek: None,
        }
    }
}

impl Default for SoundStreamHeadTag {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Tag for SoundStreamHeadTag {
    fn type_code(&self) -> u16 {
        if self.version == 2 {
            codes::SOUND_STREAM_HEAD2
        } else {
            codes::SOUND_STREAM_HEAD
        }
    }

    fn parse(&mut self, data: &mut BitCursor, length: usize, _: u8, _: &mut ParseContext<'_>) -> Result<()> {
        let end = data.position() + length;
        data.read_ub(4)?;
        self.playback_rate = data.read_ub(2)? as u8;
        self.playback_size = data.read_ub(1)? as u8;
        self.playback_type = data.read_ub(1)? as u8;
        self.stream_compression = data.read_ub(4)? as u8;
        self.stream_rate = data.read_ub(2)? as u8;
        self.stream_size = data.read_ub(1)? as u8;
        self.stream_type = data.read_ub(1)? as u8;
        self.sample_count = data.read_u16()?;
        if self.stream_compression == SoundCompression::MP3 && remaining(data, end) >= 2 {
            self.latency_seek = Some(data.read_i16()?);
        }
        Ok(())
    }

    fn publish(&self, data: &mut BitCursor, version: u8) -> Result<()> {
        let mut body = body_cursor(version);
        body.write_ub(4, 0);
        body.write_ub(2, self.playback_rate as u32);
        body.write_ub(1, self.playback_size as u32);
        body.write_ub(1, self.playback_type as u32);
        body.write_ub(4, self.stream_compression as u32);
        body.write_ub(2, self.stream_rate as u32);
        body.write_ub(1, self.stream_size as u32);
        body.write_ub(1, self.stream_type as u32);
        body.write_u16(self.sample_count);
        if let Some(seek) = self.latency_seek {
            body.write_i16(seek);
        }
        write_tag(data, self.type_code(), body.as_bytes(), false);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn describe(&self, indent: usize, _flags: DumpFlags) -> String {
        let mut s = format!(
            "{}Format: {}, Rate: {}, Size: {}, Type: {}, Samples: {}",
            tag_prefix(self.type_code(), self.name(), indent),
            SoundCompression::name(self.stream_compression),
            self.stream_rate,
            self.stream_size,
            self.stream_type,
            self.sample_count
        );
        if let Some(seek) = self.latency_seek {
            s.push_str(&format!(", LatencySeek: {seek}"));
        }
        s
    }
}

/// One block of streaming sound data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundStreamBlockTag {
    pub data: Vec<u8>,
}

impl Tag for SoundStreamBlockTag {
    fn type_code(&self) -> u16 {
        codes::SOUND_STREAM_BLOCK
    }

    fn parse(&mut self, data: &mut BitCursor, length: usize, _: u8, _: &mut ParseContext<'_>) -> Result<()> {
        self.data = data.read_bytes(length)?;
        Ok(())
    }

    fn publish(&self, data: &mut BitCursor, _version: u8) -> Result<()> {
        write_tag(data, codes::SOUND_STREAM_BLOCK, &self.data, false);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{parse_one, publish_one};

    #[test]
    fn test_mp3_head_round_trip() {
        let head = SoundStreamHeadTag {
            playback_rate: 3,
            playback_size: 1,
            playback_type: 1,
            stream_compression: SoundCompression::MP3,
            stream_rate: 3,
            stream_size: 1,
            stream_type: 1,
            sample_count: 1152,
            latency_seek: Some(-576),
            ..SoundStreamHeadTag::new(2)
        };
        let bytes = publish_one(&head, 10);
        // header, two flag bytes, sample count, latency seek
        assert_eq!(bytes.len(), 2 + 2 + 2 + 2);
        assert_eq!(bytes[2], 0x0f);
        assert_eq!(bytes[3], 0x2f);

        let parsed: SoundStreamHeadTag = parse_one(&bytes, 10);
        assert_eq!(parsed, head);
        assert_eq!(parsed.type_code(), codes::SOUND_STREAM_HEAD2);
    }

    #[test]
    fn test_adpcm_head_has_no_latency() {
        let head = SoundStreamHeadTag {
            stream_compression: SoundCompression::ADPCM,
            sample_count: 100,
            ..SoundStreamHeadTag::new(1)
        };
        let parsed: SoundStreamHeadTag = parse_one(&publish_one(&head, 10), 10);
        assert_eq!(parsed.latency_seek, None);
        assert_eq!(parsed.sample_count, 100);
    }

    #[test]
    fn test_compression_names() {
        assert_eq!(SoundCompression::name(SoundCompression::MP3), "MP3");
        assert_eq!(SoundCompression::name(9), "unknown");
    }
}
