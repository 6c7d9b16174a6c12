//! Byte buffer with a read/write position and a bit-level sub-cursor.
//!
//! All multi-byte values are little-endian. Bit fields are packed most
//! significant bit first. Writing at a position inside the buffer overwrites
//! the existing bytes; writing at the end grows the buffer.
//!
//! Every byte-aligned read or write first discards any partially consumed
//! byte (see [`BitCursor::reset_bits_pending`]).

use byteorder::{ByteOrder, LittleEndian};
use encoding_rs::Encoding;

use crate::error::{Result, SwfError};

/// Growable byte buffer with a position and a pending-bit counter.
#[derive(Debug, Clone)]
pub struct BitCursor {
    buffer: Vec<u8>,
    position: usize,
    bits_pending: u32,
    encoding: &'static Encoding,
}

impl BitCursor {
    /// Create an empty cursor.
    pub fn new() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// Wrap existing bytes. The position starts at 0.
    pub fn from_bytes(buffer: Vec<u8>) -> Self {
        Self {
            buffer,
            position: 0,
            bits_pending: 0,
            encoding: encoding_rs::UTF_8,
        }
    }

    /// Select the text encoding from a SWF version: UTF-8 from version 6,
    /// Windows-1252 before.
    pub fn set_version(&mut self, version: u8) {
        self.encoding = if version >= 6 {
            encoding_rs::UTF_8
        } else {
            encoding_rs::WINDOWS_1252
        };
    }

    pub fn set_encoding(&mut self, encoding: &'static Encoding) {
        self.encoding = encoding;
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the position. Any pending bits are discarded.
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
        self.bits_pending = 0;
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Bytes between the position and the end of the buffer.
    pub fn bytes_available(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    /// Cut the buffer to `len` bytes, clamping the position.
    pub fn truncate(&mut self, len: usize) {
        self.buffer.truncate(len);
        if self.position > len {
            self.position = len;
        }
        self.bits_pending = 0;
    }

    /// Append bytes at the end of the buffer without moving the position.
    pub fn append(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Discard the partially consumed byte, if any.
    pub fn reset_bits_pending(&mut self) -> &mut Self {
        self.bits_pending = 0;
        self
    }

    // ---------------------------------------------------------------
    // Internal helpers
    // ---------------------------------------------------------------

    fn take(&mut self, count: usize) -> Result<&[u8]> {
        let end = self
            .position
            .checked_add(count)
            .filter(|&end| end <= self.buffer.len())
            .ok_or_else(|| SwfError::eof(self.position, count))?;
        let start = self.position;
        self.position = end;
        Ok(&self.buffer[start..end])
    }

    fn raw_read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn raw_write(&mut self, bytes: &[u8]) {
        let end = self.position + bytes.len();
        if end > self.buffer.len() {
            let overlap = self.buffer.len().saturating_sub(self.position);
            if self.position > self.buffer.len() {
                self.buffer.resize(self.position, 0);
            }
            self.buffer[self.position..self.position + overlap]
                .copy_from_slice(&bytes[..overlap]);
            self.buffer.extend_from_slice(&bytes[overlap..]);
        } else {
            self.buffer[self.position..end].copy_from_slice(bytes);
        }
        self.position = end;
    }

    // ---------------------------------------------------------------
    // Byte-aligned primitives
    // ---------------------------------------------------------------

    pub fn read_u8(&mut self) -> Result<u8> {
        self.reset_bits_pending();
        self.raw_read_u8()
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.reset_bits_pending();
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.reset_bits_pending();
        Ok(LittleEndian::read_i16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.reset_bits_pending();
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.reset_bits_pending();
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.reset_bits_pending();
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.reset_bits_pending();
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    /// Read `count` bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        self.reset_bits_pending();
        Ok(self.take(count)?.to_vec())
    }

    /// Read everything up to the end of the buffer.
    pub fn read_to_end(&mut self) -> Vec<u8> {
        self.reset_bits_pending();
        let start = self.position.min(self.buffer.len());
        self.position = self.buffer.len();
        self.buffer[start..].to_vec()
    }

    /// Advance the position by `count` bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.reset_bits_pending();
        self.take(count).map(|_| ())
    }

    pub fn write_u8(&mut self, value: u8) {
        self.reset_bits_pending();
        self.raw_write(&[value]);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.write_u8(value as u8);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.reset_bits_pending();
        let mut buf = [0u8; 2];
        LittleEndian::write_u16(&mut buf, value);
        self.raw_write(&buf);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.write_u16(value as u16);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.reset_bits_pending();
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, value);
        self.raw_write(&buf);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.write_u32(value as u32);
    }

    pub fn write_f32(&mut self, value: f32) {
        self.reset_bits_pending();
        let mut buf = [0u8; 4];
        LittleEndian::write_f32(&mut buf, value);
        self.raw_write(&buf);
    }

    pub fn write_f64(&mut self, value: f64) {
        self.reset_bits_pending();
        let mut buf = [0u8; 8];
        LittleEndian::write_f64(&mut buf, value);
        self.raw_write(&buf);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.reset_bits_pending();
        self.raw_write(bytes);
    }

    // ---------------------------------------------------------------
    // Bit fields
    // ---------------------------------------------------------------

    /// Read an unsigned field of `bits` bits (0..=32).
    pub fn read_ub(&mut self, bits: u32) -> Result<u32> {
        let mut remaining = bits.min(32);
        let mut value: u64 = 0;
        while remaining > 0 {
            let (part, consumed) = if self.bits_pending > 0 {
                let byte = self.buffer[self.position - 1] as u32 & (0xff >> (8 - self.bits_pending));
                let consumed = self.bits_pending.min(remaining);
                self.bits_pending -= consumed;
                (byte >> self.bits_pending, consumed)
            } else {
                let consumed = remaining.min(8);
                self.bits_pending = 8 - consumed;
                (self.raw_read_u8()? as u32 >> self.bits_pending, consumed)
            };
            remaining -= consumed;
            value |= (part as u64) << remaining;
        }
        Ok(value as u32)
    }

    /// Write the low `bits` bits (0..=32) of `value`.
    pub fn write_ub(&mut self, bits: u32, value: u32) {
        let mut remaining = bits.min(32);
        let value = value as u64;
        while remaining > 0 {
            let chunk = value & ((1u64 << remaining) - 1);
            if self.bits_pending > 0 {
                let last = self.position - 1;
                if self.bits_pending > remaining {
                    self.buffer[last] |= (chunk << (self.bits_pending - remaining)) as u8;
                    self.bits_pending -= remaining;
                    remaining = 0;
                } else {
                    self.buffer[last] |= (chunk >> (remaining - self.bits_pending)) as u8;
                    remaining -= self.bits_pending;
                    self.bits_pending = 0;
                }
            } else {
                let consumed = remaining.min(8);
                let pending = 8 - consumed;
                let byte = ((chunk >> (remaining - consumed)) << pending) as u8;
                self.raw_write(&[byte]);
                self.bits_pending = pending;
                remaining -= consumed;
            }
        }
    }

    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_ub(1)? == 1)
    }

    pub fn write_bit(&mut self, value: bool) {
        self.write_ub(1, value as u32);
    }

    // ---------------------------------------------------------------
    // Text
    // ---------------------------------------------------------------

    /// Read a zero-terminated string and consume the terminator.
    pub fn read_string(&mut self) -> Result<String> {
        self.reset_bits_pending();
        let start = self.position.min(self.buffer.len());
        let len = self.buffer[start..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| SwfError::InvalidFormat(format!("unterminated string at position {start}")))?;
        let encoding = self.encoding;
        let bytes = self.take(len + 1)?;
        let (text, _) = encoding.decode_without_bom_handling(&bytes[..len]);
        Ok(text.into_owned())
    }

    /// Write the string bytes (nothing for an empty string) followed by a
    /// zero byte.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.reset_bits_pending();
        if !value.is_empty() {
            let (bytes, _, had_errors) = self.encoding.encode(value);
            if had_errors {
                return Err(SwfError::Encoding(format!(
                    "{value:?} is not representable in {}",
                    self.encoding.name()
                )));
            }
            let bytes = bytes.into_owned();
            self.raw_write(&bytes);
        }
        self.raw_write(&[0]);
        Ok(())
    }
}

impl Default for BitCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<u8>> for BitCursor {
    fn from(buffer: Vec<u8>) -> Self {
        Self::from_bytes(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_integers() {
        let mut c = BitCursor::new();
        c.write_u16(0x1234);
        c.write_i32(-2);
        assert_eq!(c.as_bytes(), &[0x34, 0x12, 0xfe, 0xff, 0xff, 0xff]);

        c.set_position(0);
        assert_eq!(c.read_u16().unwrap(), 0x1234);
        assert_eq!(c.read_i32().unwrap(), -2);
        assert_eq!(c.bytes_available(), 0);
    }

    #[test]
    fn test_read_past_end() {
        let mut c = BitCursor::from_bytes(vec![1, 2, 3]);
        assert!(c.read_u32().is_err());
        // A failed read leaves the position untouched.
        assert_eq!(c.position(), 0);
        assert_eq!(c.read_u8().unwrap(), 1);
    }

    #[test]
    fn test_overwrite_inside_buffer() {
        let mut c = BitCursor::from_bytes(vec![0xaa; 6]);
        c.set_position(4);
        c.write_u32(0x0102_0304);
        assert_eq!(c.as_bytes(), &[0xaa, 0xaa, 0xaa, 0xaa, 0x04, 0x03, 0x02, 0x01]);
        assert_eq!(c.position(), 8);
    }

    #[test]
    fn test_bit_fields() {
        let mut c = BitCursor::new();
        c.write_ub(5, 0b10110);
        c.write_ub(7, 0x55);
        c.write_bit(true);
        c.write_ub(19, 0x4_5678);
        assert_eq!(c.len(), 4);

        c.set_position(0);
        assert_eq!(c.read_ub(5).unwrap(), 0b10110);
        assert_eq!(c.read_ub(7).unwrap(), 0x55);
        assert!(c.read_bit().unwrap());
        assert_eq!(c.read_ub(19).unwrap(), 0x4_5678);
    }

    #[test]
    fn test_byte_read_discards_pending_bits() {
        let mut c = BitCursor::from_bytes(vec![0b1010_0000, 0x7f]);
        assert_eq!(c.read_ub(3).unwrap(), 0b101);
        assert_eq!(c.read_u8().unwrap(), 0x7f);
    }

    #[test]
    fn test_full_width_bit_field() {
        let mut c = BitCursor::new();
        c.write_ub(32, 0xdead_beef);
        c.set_position(0);
        assert_eq!(c.read_ub(32).unwrap(), 0xdead_beef);
    }

    #[test]
    fn test_strings() {
        let mut c = BitCursor::new();
        c.write_string("frame_1").unwrap();
        c.write_string("").unwrap();
        assert_eq!(c.len(), 9);

        c.set_position(0);
        assert_eq!(c.read_string().unwrap(), "frame_1");
        assert_eq!(c.read_string().unwrap(), "");
        assert_eq!(c.bytes_available(), 0);
    }

    #[test]
    fn test_string_legacy_encoding() {
        let mut c = BitCursor::from_bytes(vec![0x63, 0x61, 0x66, 0xe9, 0x00]);
        c.set_version(5);
        assert_eq!(c.read_string().unwrap(), "café");

        let mut w = BitCursor::new();
        w.set_version(5);
        w.write_string("café").unwrap();
        assert_eq!(w.as_bytes(), &[0x63, 0x61, 0x66, 0xe9, 0x00]);
    }

    #[test]
    fn test_unterminated_string() {
        let mut c = BitCursor::from_bytes(b"abc".to_vec());
        assert!(c.read_string().is_err());
    }
}
