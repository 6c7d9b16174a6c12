//! Byte-exact copy of a tag record.

use crate::error::{Result, SwfError};
use crate::io::BitCursor;

use super::TagHeader;

/// A record exactly as read: decoded header plus the original bytes of the
/// whole record (header included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag {
    pub header: TagHeader,
    pub bytes: Vec<u8>,
}

impl RawTag {
    /// Read one record. The cursor ends up after the record.
    pub fn read(data: &mut BitCursor) -> Result<Self> {
        let start = data.position();
        let header = data.read_tag_header()?;
        let content_length = header.content_length as usize;
        if data.bytes_available() < content_length {
            return Err(SwfError::InvalidFormat(format!(
                "tag {} at position {start} declares {content_length} content bytes, {} available",
                header.code,
                data.bytes_available()
            )));
        }
        data.set_position(start);
        let bytes = data.read_bytes(header.tag_length())?;
        Ok(Self { header, bytes })
    }

    /// Content bytes without the header.
    pub fn content(&self) -> &[u8] {
        &self.bytes[self.header.header_length as usize..]
    }

    /// Re-emit the original record.
    pub fn publish(&self, data: &mut BitCursor) {
        data.write_bytes(&self.bytes);
    }
}
