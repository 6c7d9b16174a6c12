//! SWF writer: header, tag stream, length backpatch and recompression.

use std::fs;
use std::path::Path;

use crate::document::SwfDocument;
use crate::error::Result;

use super::compression::{CompressionMethod, COMPRESSION_START};
use super::BitCursor;

/// Offset of the declared file length in the header.
const FILE_LENGTH_POS: usize = 4;

/// SWF file writer.
///
/// Compressed documents are always written with zlib: LZMA documents are
/// switched to zlib and get the `CWS` signature.
///
/// # Usage
///
/// ```rust,ignore
/// use swfrust::io::writer::SwfWriter;
///
/// let bytes = SwfWriter::new(&mut doc).write()?;
/// ```
pub struct SwfWriter<'a> {
    document: &'a mut SwfDocument,
}

impl<'a> SwfWriter<'a> {
    pub fn new(document: &'a mut SwfDocument) -> Self {
        Self { document }
    }

    /// Encode the document. The header fields `signature`,
    /// `compression_method`, `file_length` and `file_length_compressed` are
    /// updated to describe the produced bytes.
    pub fn write(self) -> Result<Vec<u8>> {
        let doc = self.document;
        if doc.compressed {
            doc.compression_method = CompressionMethod::Zlib;
        }
        let first = if doc.compressed {
            doc.compression_method.signature_byte()
        } else {
            b'F'
        };

        let mut data = BitCursor::new();
        data.set_version(doc.version);
        data.write_bytes(&[first, b'W', b'S']);
        data.write_u8(doc.version);
        data.write_u32(0);
        data.write_rect(&doc.frame_size);
        data.write_fixed8(doc.frame_rate);
        data.write_u16(doc.frame_count);
        doc.timeline.publish_tags(&mut data, doc.version)?;

        let file_length = data.len() as u32;
        data.set_position(FILE_LENGTH_POS);
        data.write_u32(file_length);

        if doc.compressed {
            data.set_position(COMPRESSION_START);
            data.compress_tail(doc.compression_method)?;
        }

        doc.signature = String::from_utf8_lossy(&data.as_bytes()[..3]).into_owned();
        doc.file_length = file_length;
        doc.file_length_compressed = data.len() as u32;
        log::debug!(
            "published {}: {} bytes, {} bytes on disk",
            doc.signature,
            doc.file_length,
            doc.file_length_compressed
        );
        Ok(data.into_inner())
    }

    /// Encode the document and write it to `path`.
    pub fn write_to_file<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let bytes = self.write()?;
        fs::write(path, bytes)?;
        Ok(())
    }
}
