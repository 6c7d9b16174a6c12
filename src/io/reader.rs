//! SWF reader: header parse, body decompression and the root tag stream.
//!
//! # Usage
//!
//! ```rust,ignore
//! use swfrust::io::reader::{SwfReader, SwfReaderConfiguration};
//!
//! let doc = SwfReader::from_file("movie.swf")?
//!     .with_config(SwfReaderConfiguration {
//!         build_layers: true,
//!         ..Default::default()
//!     })
//!     .read()?;
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use crate::document::SwfDocument;
use crate::error::{Result, SwfError};
use crate::notification::NotificationCollection;
use crate::tags::{ParseContext, TagCodecRegistry, TagHeader};

use super::compression::{CompressionMethod, COMPRESSION_START};
use super::BitCursor;

/// Options for reading a SWF.
#[derive(Debug, Clone)]
pub struct SwfReaderConfiguration {
    /// When `true`, a tag that fails to parse is kept as its raw record and
    /// reported as a notification instead of aborting the read.
    ///
    /// Default: `false` (strict mode).
    pub failsafe: bool,

    /// Derive layers and strips for every timeline after parsing.
    pub build_layers: bool,

    /// Reassemble SoundStreamBlock payloads into a sound stream.
    pub extract_sound_stream: bool,
}

impl Default for SwfReaderConfiguration {
    fn default() -> Self {
        Self {
            failsafe: false,
            build_layers: false,
            extract_sound_stream: true,
        }
    }
}

/// SWF file reader. Produces a [`SwfDocument`].
///
/// The read pipeline is:
///
/// 1. Check the three signature bytes (`FWS`, `CWS` or `ZWS`).
/// 2. Read the version and declared file length, and reject lengths that
///    cannot belong to the buffer.
/// 3. Inflate everything from offset 8 for compressed files.
/// 4. Read the frame rectangle, frame rate and frame count.
/// 5. Parse the root tag stream into the document timeline.
pub struct SwfReader {
    data: Vec<u8>,
    config: SwfReaderConfiguration,
    registry: Arc<TagCodecRegistry>,
}

impl SwfReader {
    /// Read from an in-memory buffer.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            config: SwfReaderConfiguration::default(),
            registry: TagCodecRegistry::shared(),
        }
    }

    /// Read everything from a byte stream.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self::from_bytes(data))
    }

    /// Open a SWF file by path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// Set configuration options.
    pub fn with_config(mut self, config: SwfReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Use a custom tag registry.
    pub fn with_registry(mut self, registry: Arc<TagCodecRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Read the whole file.
    pub fn read(self) -> Result<SwfDocument> {
        let mut doc = SwfDocument::new();
        let mut cursor = BitCursor::from_bytes(self.data);

        let (compressed, method) = read_signature(&mut cursor)?;
        doc.signature = String::from_utf8_lossy(&cursor.as_bytes()[..3]).into_owned();
        doc.compressed = compressed;
        doc.compression_method = method;
        doc.version = cursor.read_u8()?;
        doc.file_length = cursor.read_u32()?;
        doc.file_length_compressed = cursor.len() as u32;

        let physical = cursor.len();
        if u64::from(doc.file_length) >= 4 * physical as u64 {
            return Err(SwfError::ImplausibleLength {
                declared: doc.file_length,
                actual: physical,
            });
        }

        if compressed {
            cursor.set_position(COMPRESSION_START);
            cursor.decompress_tail(method, doc.file_length)?;
        }
        log::debug!(
            "{} v{}: declared {} bytes, {} bytes on disk",
            doc.signature,
            doc.version,
            doc.file_length,
            doc.file_length_compressed
        );

        doc.frame_size = cursor.read_rect()?;
        doc.frame_rate = cursor.read_fixed8()?;
        doc.frame_count = cursor.read_u16()?;
        cursor.set_version(doc.version);

        let mut notifications = NotificationCollection::new();
        let end = cursor.len();
        {
            let mut ctx = ParseContext {
                registry: self.registry.as_ref(),
                config: &self.config,
                header: TagHeader {
                    code: 0,
                    content_length: 0,
                    header_length: 0,
                },
                root: None,
                notifications: &mut notifications,
            };
            doc.timeline
                .parse_tags(&mut cursor, doc.version, end, &mut ctx)?;
        }
        doc.notifications = notifications;
        Ok(doc)
    }
}

/// Check `FWS` / `CWS` / `ZWS` and return the compression it announces.
fn read_signature(cursor: &mut BitCursor) -> Result<(bool, CompressionMethod)> {
    let first = cursor.read_u8()?;
    let detected = match first {
        b'F' => (false, CompressionMethod::Zlib),
        b'C' => (true, CompressionMethod::Zlib),
        b'Z' => (true, CompressionMethod::Lzma),
        byte => {
            return Err(SwfError::InvalidSignature {
                offset: 0,
                byte,
                expected: "0x43 or 0x5A or 0x46",
            })
        }
    };
    for (offset, expected, label) in [(1, b'W', "0x57"), (2, b'S', "0x53")] {
        let byte = cursor.read_u8()?;
        if byte != expected {
            return Err(SwfError::InvalidSignature {
                offset,
                byte,
                expected: label,
            });
        }
    }
    Ok(detected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(signature: &[u8; 3], declared: u32) -> Vec<u8> {
        let mut c = BitCursor::new();
        c.write_bytes(signature);
        c.write_u8(10);
        c.write_u32(declared);
        c.into_inner()
    }

    #[test]
    fn test_bad_signature_bytes() {
        let err = SwfReader::from_bytes(header(b"XWS", 20)).read().unwrap_err();
        assert!(matches!(
            err,
            SwfError::InvalidSignature { offset: 0, byte: b'X', .. }
        ));

        let err = SwfReader::from_bytes(header(b"FXS", 20)).read().unwrap_err();
        assert!(matches!(
            err,
            SwfError::InvalidSignature { offset: 1, byte: 0x58, expected: "0x57" }
        ));

        let err = SwfReader::from_bytes(header(b"CWX", 20)).read().unwrap_err();
        assert!(matches!(err, SwfError::InvalidSignature { offset: 2, .. }));
    }

    #[test]
    fn test_implausible_length() {
        let err = SwfReader::from_bytes(header(b"FWS", 1000)).read().unwrap_err();
        assert!(matches!(
            err,
            SwfError::ImplausibleLength { declared: 1000, actual: 8 }
        ));
        assert!(err.is_format_error());
    }

    #[test]
    fn test_truncated_header() {
        let err = SwfReader::from_bytes(b"FW".to_vec()).read().unwrap_err();
        assert!(matches!(err, SwfError::Io(_)));
    }

    #[test]
    fn test_default_configuration() {
        let config = SwfReaderConfiguration::default();
        assert!(!config.failsafe);
        assert!(!config.build_layers);
        assert!(config.extract_sound_stream);
    }
}
