//! Compression of the SWF body.
//!
//! Everything after the 8-byte file header is compressed: zlib for `CWS`
//! files, LZMA for `ZWS` files. The LZMA body uses its own framing:
//!
//! | offset | size | content                        |
//! |--------|------|--------------------------------|
//! | 8      | 4    | compressed length              |
//! | 12     | 5    | LZMA properties                |
//! | 17     | ..   | compressed data                |
//!
//! and is converted to a standard `.lzma` stream before decoding.

use std::fmt;
use std::io::{Cursor, Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lzma_rust2::LzmaReader;

use crate::error::{Result, SwfError};

use super::bit_cursor::BitCursor;

/// Offset of the first compressed byte in a SWF file.
pub const COMPRESSION_START: usize = 8;

const LZMA_PROPS_LEN: usize = 5;
/// Compressed-length field preceding the LZMA properties.
const LZMA_SIZE_FIELD_LEN: usize = 4;
/// Smallest dictionary the decoder allocates.
const LZMA_MIN_DICT: u64 = 4096;
/// Literal coder tables for the largest `lc + lp`, in KiB.
const LZMA_LITERAL_TABLES_KB: u32 = ((2 * 0x300) << 12) / 1024;

/// Compression used for the SWF body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionMethod {
    #[default]
    Zlib,
    Lzma,
}

impl CompressionMethod {
    /// First signature byte for a compressed file using this method.
    pub fn signature_byte(self) -> u8 {
        match self {
            Self::Zlib => b'C',
            Self::Lzma => b'Z',
        }
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zlib => write!(f, "ZLIB"),
            Self::Lzma => write!(f, "LZMA"),
        }
    }
}

/// Trait for compressing a SWF body.
pub trait Compressor {
    /// Compress the bytes that follow the file header.
    fn compress(&self, body: &[u8]) -> Result<Vec<u8>>;
}

/// Trait for decompressing a SWF body.
pub trait Decompressor {
    /// Decompress the bytes that follow the file header. `declared_length`
    /// is the uncompressed file length from the header (header included).
    fn decompress(&self, body: &[u8], declared_length: u32) -> Result<Vec<u8>>;
}

/// zlib codec (`CWS`).
#[derive(Debug, Default, Clone, Copy)]
pub struct ZlibCodec;

impl Compressor for ZlibCodec {
    fn compress(&self, body: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(body)
            .map_err(|e| SwfError::Compression(e.to_string()))?;
        encoder
            .finish()
            .map_err(|e| SwfError::Compression(e.to_string()))
    }
}

impl Decompressor for ZlibCodec {
    fn decompress(&self, body: &[u8], declared_length: u32) -> Result<Vec<u8>> {
        let capacity = (declared_length as usize).saturating_sub(COMPRESSION_START);
        let mut output = Vec::with_capacity(capacity);
        ZlibDecoder::new(body)
            .read_to_end(&mut output)
            .map_err(|e| SwfError::Decompression(format!("zlib: {e}")))?;
        Ok(output)
    }
}

/// LZMA codec (`ZWS`). Decoding only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LzmaCodec;

impl LzmaCodec {
    /// Rebuild a standard `.lzma` stream from a SWF LZMA body: the five
    /// property bytes, a synthesized 64-bit little-endian uncompressed
    /// length of `declared_length - 8`, then the compressed data.
    ///
    /// The dictionary size is capped at the uncompressed length; matches
    /// never reach past the start of the output.
    pub fn standard_stream(body: &[u8], declared_length: u32) -> Result<Vec<u8>> {
        let data_start = LZMA_SIZE_FIELD_LEN + LZMA_PROPS_LEN;
        if body.len() < data_start {
            return Err(SwfError::Decompression(format!(
                "LZMA body is {} bytes, expected at least {data_start}",
                body.len()
            )));
        }
        let unpacked = (declared_length as u64).saturating_sub(COMPRESSION_START as u64);

        let props = &body[LZMA_SIZE_FIELD_LEN..data_start];
        let dict_size = u32::from_le_bytes([props[1], props[2], props[3], props[4]]);
        let dict_size = u64::from(dict_size).min(unpacked.max(LZMA_MIN_DICT)) as u32;

        let mut stream = Vec::with_capacity(body.len() + 4);
        stream.push(props[0]);
        stream.extend_from_slice(&dict_size.to_le_bytes());
        stream.extend_from_slice(&unpacked.to_le_bytes());
        stream.extend_from_slice(&body[data_start..]);
        Ok(stream)
    }

    /// Decoder memory budget for a body that inflates to at most
    /// `declared_length - 8` bytes.
    pub fn memory_limit_kb(declared_length: u32) -> u32 {
        let unpacked = (declared_length as u64).saturating_sub(COMPRESSION_START as u64);
        let dict_kb = (unpacked.max(LZMA_MIN_DICT) + 15) / 1024 + 1;
        10 + dict_kb as u32 + LZMA_LITERAL_TABLES_KB
    }
}

impl Compressor for LzmaCodec {
    fn compress(&self, _body: &[u8]) -> Result<Vec<u8>> {
        Err(SwfError::UnsupportedCompression(
            "LZMA compression is not supported, publish with zlib".to_string(),
        ))
    }
}

impl Decompressor for LzmaCodec {
    fn decompress(&self, body: &[u8], declared_length: u32) -> Result<Vec<u8>> {
        let stream = Self::standard_stream(body, declared_length)?;
        let limit = Self::memory_limit_kb(declared_length);
        let mut reader = LzmaReader::new_mem_limit(Cursor::new(stream), limit, None)
            .map_err(|e| SwfError::Decompression(format!("LZMA header: {e}")))?;
        let capacity = (declared_length as usize).saturating_sub(COMPRESSION_START);
        let mut output = Vec::with_capacity(capacity);
        reader
            .read_to_end(&mut output)
            .map_err(|e| SwfError::Decompression(format!("LZMA: {e}")))?;
        Ok(output)
    }
}

fn codec_for(method: CompressionMethod) -> (&'static dyn Compressor, &'static dyn Decompressor) {
    match method {
        CompressionMethod::Zlib => (&ZlibCodec, &ZlibCodec),
        CompressionMethod::Lzma => (&LzmaCodec, &LzmaCodec),
    }
}

impl BitCursor {
    /// Replace everything after the position with its decompressed form.
    /// The position is unchanged.
    pub fn decompress_tail(&mut self, method: CompressionMethod, declared_length: u32) -> Result<()> {
        let start = self.position();
        let body = &self.as_bytes()[start.min(self.len())..];
        let compressed_len = body.len();
        let output = codec_for(method).1.decompress(body, declared_length)?;
        log::debug!(
            "{method} body: {compressed_len} bytes inflated to {} bytes",
            output.len()
        );
        self.truncate(start);
        self.append(&output);
        self.set_position(start);
        Ok(())
    }

    /// Replace everything after the position with its compressed form.
    /// The position is unchanged.
    pub fn compress_tail(&mut self, method: CompressionMethod) -> Result<()> {
        let start = self.position();
        let body = &self.as_bytes()[start.min(self.len())..];
        let output = codec_for(method).0.compress(body)?;
        log::debug!("{method} body: {} bytes deflated to {} bytes", body.len(), output.len());
        self.truncate(start);
        self.append(&output);
        self.set_position(start);
        Ok(())
    }
}
