//! Typed SWF field codecs layered on [`BitCursor`].
//!
//! Covers fixed-point numbers, half floats, `EncodedU32`, signed and
//! fixed-point bit fields, color records, RECT, MATRIX, CXFORM and the
//! record header that prefixes every tag.

use crate::error::{Result, SwfError};
use crate::tags::TagHeader;
use crate::types::{ColorTransform, Matrix, Rectangle};

use super::bit_cursor::BitCursor;

/// Largest content length that still fits the short tag header.
pub const SHORT_HEADER_MAX_LENGTH: u32 = 0x3e;

const LONG_HEADER_MARKER: u16 = 0x3f;

/// Minimal signed bit width able to hold every value in `values`
/// (at least 1).
pub fn signed_bits(values: &[i32]) -> u32 {
    values
        .iter()
        .map(|&v| 32 - (v ^ (v >> 31)).leading_zeros() + 1)
        .max()
        .unwrap_or(1)
        .clamp(1, 32)
}

/// Minimal unsigned bit width able to hold every value in `values`.
pub fn unsigned_bits(values: &[u32]) -> u32 {
    values
        .iter()
        .map(|&v| 32 - v.leading_zeros())
        .max()
        .unwrap_or(0)
}

/// Convert an IEEE 754 binary16 bit pattern.
pub fn f16_bits_to_f64(bits: u16) -> f64 {
    let sign = if bits & 0x8000 != 0 { -1.0 } else { 1.0 };
    let exponent = ((bits >> 10) & 0x1f) as i32;
    let mantissa = (bits & 0x3ff) as f64;
    match exponent {
        0 => sign * mantissa * 2f64.powi(-24),
        0x1f if mantissa == 0.0 => sign * f64::INFINITY,
        0x1f => f64::NAN,
        _ => sign * (1.0 + mantissa / 1024.0) * 2f64.powi(exponent - 15),
    }
}

/// Convert to the nearest IEEE 754 binary16 bit pattern.
pub fn f64_to_f16_bits(value: f64) -> u16 {
    if value.is_nan() {
        return 0x7e00;
    }
    let sign: u16 = if value.is_sign_negative() { 0x8000 } else { 0 };
    let abs = value.abs();
    if abs >= 65520.0 {
        return sign | 0x7c00;
    }
    if abs < 2f64.powi(-14) {
        // Subnormal range; rounding up may yield the smallest normal.
        return sign | (abs / 2f64.powi(-24)).round() as u16;
    }
    let mut exponent = ((abs.to_bits() >> 52) & 0x7ff) as i32 - 1023;
    let mut mantissa = ((abs / 2f64.powi(exponent) - 1.0) * 1024.0).round() as u16;
    if mantissa == 1024 {
        mantissa = 0;
        exponent += 1;
    }
    if exponent > 15 {
        return sign | 0x7c00;
    }
    sign | (((exponent + 15) as u16) << 10) | mantissa
}

impl BitCursor {
    // ---------------------------------------------------------------
    // Numbers
    // ---------------------------------------------------------------

    /// UI24: two bytes then one byte, combined as `(hi << 16) | lo16`.
    pub fn read_u24(&mut self) -> Result<u32> {
        let lo = self.read_u16()? as u32;
        let hi = self.read_u8()? as u32;
        Ok((hi << 16) | lo)
    }

    pub fn write_u24(&mut self, value: u32) {
        self.write_u16((value & 0xffff) as u16);
        self.write_u8(((value >> 16) & 0xff) as u8);
    }

    /// FIXED: signed 16.16.
    pub fn read_fixed(&mut self) -> Result<f64> {
        Ok(self.read_i32()? as f64 / 65536.0)
    }

    pub fn write_fixed(&mut self, value: f64) {
        self.write_i32((value * 65536.0) as i32);
    }

    /// FIXED8: signed 8.8.
    pub fn read_fixed8(&mut self) -> Result<f64> {
        Ok(self.read_i16()? as f64 / 256.0)
    }

    pub fn write_fixed8(&mut self, value: f64) {
        self.write_i16((value * 256.0) as i32 as i16);
    }

    pub fn read_float16(&mut self) -> Result<f64> {
        Ok(f16_bits_to_f64(self.read_u16()?))
    }

    pub fn write_float16(&mut self, value: f64) {
        self.write_u16(f64_to_f16_bits(value));
    }

    /// Variable-length unsigned integer, 1 to 5 bytes.
    pub fn read_encoded_u32(&mut self) -> Result<u32> {
        let mut result = self.read_u8()? as u32;
        if result & 0x80 != 0 {
            result = (result & 0x7f) | ((self.read_u8()? as u32) << 7);
            if result & 0x4000 != 0 {
                result = (result & 0x3fff) | ((self.read_u8()? as u32) << 14);
                if result & 0x20_0000 != 0 {
                    result = (result & 0x1f_ffff) | ((self.read_u8()? as u32) << 21);
                    if result & 0x1000_0000 != 0 {
                        result = (result & 0xfff_ffff) | ((self.read_u8()? as u32) << 28);
                    }
                }
            }
        }
        Ok(result)
    }

    pub fn write_encoded_u32(&mut self, mut value: u32) {
        loop {
            let low = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.write_u8(low);
                break;
            }
            self.write_u8(low | 0x80);
        }
    }

    // ---------------------------------------------------------------
    // Signed and fixed-point bit fields
    // ---------------------------------------------------------------

    /// SB[n]: sign-extended `n`-bit field.
    pub fn read_sb(&mut self, bits: u32) -> Result<i32> {
        if bits == 0 {
            return Ok(0);
        }
        let bits = bits.min(32);
        let shift = 32 - bits;
        Ok(((self.read_ub(bits)? << shift) as i32) >> shift)
    }

    pub fn write_sb(&mut self, bits: u32, value: i32) {
        self.write_ub(bits, value as u32);
    }

    /// FB[n]: signed 16.16 bit field.
    pub fn read_fb(&mut self, bits: u32) -> Result<f64> {
        Ok(self.read_sb(bits)? as f64 / 65536.0)
    }

    pub fn write_fb(&mut self, bits: u32, value: f64) {
        self.write_sb(bits, (value * 65536.0) as i32);
    }

    // ---------------------------------------------------------------
    // Colors (packed 0xAARRGGBB)
    // ---------------------------------------------------------------

    pub fn read_rgb(&mut self) -> Result<u32> {
        let r = self.read_u8()? as u32;
        let g = self.read_u8()? as u32;
        let b = self.read_u8()? as u32;
        Ok(0xff00_0000 | (r << 16) | (g << 8) | b)
    }

    pub fn write_rgb(&mut self, value: u32) {
        self.write_u8((value >> 16) as u8);
        self.write_u8((value >> 8) as u8);
        self.write_u8(value as u8);
    }

    pub fn read_rgba(&mut self) -> Result<u32> {
        let rgb = self.read_rgb()? & 0x00ff_ffff;
        let a = self.read_u8()? as u32;
        Ok((a << 24) | rgb)
    }

    pub fn write_rgba(&mut self, value: u32) {
        self.write_rgb(value);
        self.write_u8((value >> 24) as u8);
    }

    pub fn read_argb(&mut self) -> Result<u32> {
        let a = self.read_u8()? as u32;
        let rgb = self.read_rgb()? & 0x00ff_ffff;
        Ok((a << 24) | rgb)
    }

    pub fn write_argb(&mut self, value: u32) {
        self.write_u8((value >> 24) as u8);
        self.write_rgb(value);
    }

    // ---------------------------------------------------------------
    // Records
    // ---------------------------------------------------------------

    pub fn read_rect(&mut self) -> Result<Rectangle> {
        self.reset_bits_pending();
        let bits = self.read_ub(5)?;
        Ok(Rectangle {
            x_min: self.read_sb(bits)?,
            x_max: self.read_sb(bits)?,
            y_min: self.read_sb(bits)?,
            y_max: self.read_sb(bits)?,
        })
    }

    pub fn write_rect(&mut self, rect: &Rectangle) {
        self.reset_bits_pending();
        let bits = signed_bits(&[rect.x_min, rect.x_max, rect.y_min, rect.y_max]).min(31);
        self.write_ub(5, bits);
        self.write_sb(bits, rect.x_min);
        self.write_sb(bits, rect.x_max);
        self.write_sb(bits, rect.y_min);
        self.write_sb(bits, rect.y_max);
    }

    pub fn read_matrix(&mut self) -> Result<Matrix> {
        self.reset_bits_pending();
        let mut matrix = Matrix::IDENTITY;
        if self.read_bit()? {
            let bits = self.read_ub(5)?;
            matrix.scale_x = self.read_fb(bits)?;
            matrix.scale_y = self.read_fb(bits)?;
        }
        if self.read_bit()? {
            let bits = self.read_ub(5)?;
            matrix.rotate_skew0 = self.read_fb(bits)?;
            matrix.rotate_skew1 = self.read_fb(bits)?;
        }
        let bits = self.read_ub(5)?;
        matrix.translate_x = self.read_sb(bits)?;
        matrix.translate_y = self.read_sb(bits)?;
        Ok(matrix)
    }

    pub fn write_matrix(&mut self, matrix: &Matrix) {
        self.reset_bits_pending();

        let has_scale = matrix.has_scale();
        self.write_bit(has_scale);
        if has_scale {
            let bits = if matrix.scale_x == 0.0 && matrix.scale_y == 0.0 {
                1
            } else {
                signed_bits(&[
                    (matrix.scale_x * 65536.0) as i32,
                    (matrix.scale_y * 65536.0) as i32,
                ])
                .min(31)
            };
            self.write_ub(5, bits);
            self.write_fb(bits, matrix.scale_x);
            self.write_fb(bits, matrix.scale_y);
        }

        let has_rotate = matrix.has_rotate();
        self.write_bit(has_rotate);
        if has_rotate {
            let bits = signed_bits(&[
                (matrix.rotate_skew0 * 65536.0) as i32,
                (matrix.rotate_skew1 * 65536.0) as i32,
            ])
            .min(31);
            self.write_ub(5, bits);
            self.write_fb(bits, matrix.rotate_skew0);
            self.write_fb(bits, matrix.rotate_skew1);
        }

        let bits = signed_bits(&[matrix.translate_x, matrix.translate_y]).min(31);
        self.write_ub(5, bits);
        self.write_sb(bits, matrix.translate_x);
        self.write_sb(bits, matrix.translate_y);
    }

    /// CXFORM, or CXFORMWITHALPHA when `with_alpha` is set.
    pub fn read_cxform(&mut self, with_alpha: bool) -> Result<ColorTransform> {
        self.reset_bits_pending();
        let mut cx = ColorTransform::identity();
        cx.has_alpha = with_alpha;
        let has_add = self.read_bit()?;
        let has_mult = self.read_bit()?;
        let bits = self.read_ub(4)?;
        if has_mult {
            cx.red_mult = self.read_sb(bits)?;
            cx.green_mult = self.read_sb(bits)?;
            cx.blue_mult = self.read_sb(bits)?;
            if with_alpha {
                cx.alpha_mult = self.read_sb(bits)?;
            }
        }
        if has_add {
            cx.red_add = self.read_sb(bits)?;
            cx.green_add = self.read_sb(bits)?;
            cx.blue_add = self.read_sb(bits)?;
            if with_alpha {
                cx.alpha_add = self.read_sb(bits)?;
            }
        }
        Ok(cx)
    }

    /// Writes the CXFORMWITHALPHA layout when `cx.has_alpha` is set.
    pub fn write_cxform(&mut self, cx: &ColorTransform) {
        self.reset_bits_pending();
        let has_add = cx.has_add_terms();
        let has_mult = cx.has_mult_terms();

        let mut terms = Vec::with_capacity(8);
        if has_mult {
            terms.extend([cx.red_mult, cx.green_mult, cx.blue_mult]);
            if cx.has_alpha {
                terms.push(cx.alpha_mult);
            }
        }
        if has_add {
            terms.extend([cx.red_add, cx.green_add, cx.blue_add]);
            if cx.has_alpha {
                terms.push(cx.alpha_add);
            }
        }
        let bits = signed_bits(&terms).min(15);

        self.write_bit(has_add);
        self.write_bit(has_mult);
        self.write_ub(4, bits);
        for term in terms {
            self.write_sb(bits, term);
        }
    }

    // ---------------------------------------------------------------
    // Tag header
    // ---------------------------------------------------------------

    pub fn read_tag_header(&mut self) -> Result<TagHeader> {
        let start = self.position();
        let packed = self.read_u16()?;
        let code = packed >> 6;
        let short_length = packed & LONG_HEADER_MARKER;
        let content_length = if short_length == LONG_HEADER_MARKER {
            let long = self.read_i32()?;
            if long < 0 {
                return Err(SwfError::InvalidFormat(format!(
                    "negative length {long} in header of tag {code} at position {start}"
                )));
            }
            long as u32
        } else {
            short_length as u32
        };
        Ok(TagHeader {
            code,
            content_length,
            header_length: (self.position() - start) as u32,
        })
    }

    /// Write a record header. The long form is used when the content does
    /// not fit the short form or when `force_long` is set.
    pub fn write_tag_header(&mut self, code: u16, content_length: u32, force_long: bool) {
        if content_length <= SHORT_HEADER_MAX_LENGTH && !force_long {
            self.write_u16((code << 6) | content_length as u16);
        } else {
            self.write_u16((code << 6) | LONG_HEADER_MARKER);
            self.write_i32(content_length as i32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encoded(value: u32) -> Vec<u8> {
        let mut c = BitCursor::new();
        c.write_encoded_u32(value);
        c.into_inner()
    }

    #[test]
    fn test_encoded_u32_minimal_sizes() {
        let cases = [
            (0u32, 1usize),
            (127, 1),
            (128, 2),
            (16383, 2),
            (16384, 3),
            (2097151, 3),
            (2097152, 4),
            (268435455, 4),
            (268435456, 5),
            (u32::MAX, 5),
        ];
        for (value, size) in cases {
            let bytes = encoded(value);
            assert_eq!(bytes.len(), size, "size of {value}");
            let mut c = BitCursor::from_bytes(bytes);
            assert_eq!(c.read_encoded_u32().unwrap(), value);
            assert_eq!(c.bytes_available(), 0);
        }
    }

    #[test]
    fn test_u24() {
        let mut c = BitCursor::new();
        c.write_u24(0x12_3456);
        assert_eq!(c.as_bytes(), &[0x56, 0x34, 0x12]);
        c.set_position(0);
        assert_eq!(c.read_u24().unwrap(), 0x12_3456);
    }

    #[test]
    fn test_fixed_truncates() {
        let mut c = BitCursor::new();
        c.write_fixed8(24.5);
        c.write_fixed8(-1.999);
        c.write_fixed(1.5);
        c.set_position(0);
        assert_eq!(c.read_fixed8().unwrap(), 24.5);
        // -1.999 * 256 = -511.74 truncates toward zero to -511.
        assert_eq!(c.read_fixed8().unwrap(), -511.0 / 256.0);
        assert_eq!(c.read_fixed().unwrap(), 1.5);
    }

    #[test]
    fn test_half_float() {
        assert_eq!(f16_bits_to_f64(0x3c00), 1.0);
        assert_eq!(f16_bits_to_f64(0xc000), -2.0);
        assert_eq!(f16_bits_to_f64(0x7bff), 65504.0);
        assert_eq!(f16_bits_to_f64(0x0001), 2f64.powi(-24));
        assert!(f16_bits_to_f64(0x7c00).is_infinite());

        assert_eq!(f64_to_f16_bits(1.0), 0x3c00);
        assert_eq!(f64_to_f16_bits(-2.0), 0xc000);
        assert_eq!(f64_to_f16_bits(0.5), 0x3800);
        assert_eq!(f64_to_f16_bits(65504.0), 0x7bff);
        assert_eq!(f64_to_f16_bits(1.0e6), 0x7c00);
        assert_eq!(f64_to_f16_bits(2f64.powi(-24)), 0x0001);
    }

    #[test]
    fn test_signed_bits() {
        assert_eq!(signed_bits(&[0, 0]), 1);
        assert_eq!(signed_bits(&[-1]), 1);
        assert_eq!(signed_bits(&[1]), 2);
        assert_eq!(signed_bits(&[100, -100]), 8);
        assert_eq!(signed_bits(&[-128]), 8);
        assert_eq!(signed_bits(&[128]), 9);
        assert_eq!(signed_bits(&[]), 1);
        assert_eq!(unsigned_bits(&[5, 1]), 3);
    }

    #[test]
    fn test_colors() {
        let mut c = BitCursor::from_bytes(vec![0x11, 0x22, 0x33, 0x80, 0x11, 0x22, 0x33]);
        assert_eq!(c.read_rgba().unwrap(), 0x8011_2233);
        c.set_position(0);
        assert_eq!(c.read_rgb().unwrap(), 0xff11_2233);
        c.set_position(3);
        assert_eq!(c.read_argb().unwrap(), 0x8011_2233);

        let mut w = BitCursor::new();
        w.write_argb(0x8011_2233);
        w.write_rgba(0x8011_2233);
        assert_eq!(w.as_bytes(), &[0x80, 0x11, 0x22, 0x33, 0x11, 0x22, 0x33, 0x80]);
    }

    #[test]
    fn test_rect() {
        let rect = Rectangle::from_pixels(550, 400);
        let mut c = BitCursor::new();
        c.write_rect(&rect);
        // 5 + 4 * 15 bits = 65 bits.
        assert_eq!(c.len(), 9);
        assert_eq!(c.as_bytes()[0] >> 3, 15);
        c.set_position(0);
        assert_eq!(c.read_rect().unwrap(), rect);
    }

    #[test]
    fn test_matrix_translate_widths() {
        let mut c = BitCursor::new();
        c.write_matrix(&Matrix::IDENTITY);
        // no scale, no rotate, 5-bit width of 1, two 1-bit zeros.
        assert_eq!(c.as_bytes(), &[0b0000_0010, 0b0000_0000]);
        c.set_position(0);
        assert_eq!(c.read_matrix().unwrap(), Matrix::IDENTITY);

        let m = Matrix::translate(100, -100);
        let mut c = BitCursor::new();
        c.write_matrix(&m);
        let mut r = BitCursor::from_bytes(c.as_bytes().to_vec());
        assert!(!r.read_bit().unwrap());
        assert!(!r.read_bit().unwrap());
        assert_eq!(r.read_ub(5).unwrap(), 8);
        assert_eq!(r.read_sb(8).unwrap(), 100);
        assert_eq!(r.read_sb(8).unwrap(), -100);

        let mut c = BitCursor::from_bytes(c.into_inner());
        assert_eq!(c.read_matrix().unwrap(), m);
    }

    #[test]
    fn test_matrix_scale_and_rotate() {
        let m = Matrix {
            scale_x: 2.0,
            scale_y: -0.5,
            rotate_skew0: 0.25,
            rotate_skew1: -0.25,
            translate_x: 2000,
            translate_y: 0,
        };
        let mut c = BitCursor::new();
        c.write_matrix(&m);
        c.set_position(0);
        assert_eq!(c.read_matrix().unwrap(), m);

        let collapsed = Matrix::scale(0.0, 0.0);
        let mut c = BitCursor::new();
        c.write_matrix(&collapsed);
        c.set_position(0);
        assert!(c.read_bit().unwrap());
        assert_eq!(c.read_ub(5).unwrap(), 1);
        c.set_position(0);
        assert_eq!(c.read_matrix().unwrap(), collapsed);
    }

    #[test]
    fn test_cxform() {
        let cx = ColorTransform {
            red_mult: 128,
            red_add: -20,
            alpha_add: 255,
            ..ColorTransform::identity_with_alpha()
        };
        let mut c = BitCursor::new();
        c.write_cxform(&cx);
        c.set_position(0);
        assert_eq!(c.read_cxform(true).unwrap(), cx);

        let plain = ColorTransform {
            blue_add: 10,
            ..ColorTransform::identity()
        };
        let mut c = BitCursor::new();
        c.write_cxform(&plain);
        c.set_position(0);
        assert_eq!(c.read_cxform(false).unwrap(), plain);
    }

    #[test]
    fn test_tag_header_forms() {
        let mut c = BitCursor::new();
        c.write_tag_header(1, 0, false);
        c.write_tag_header(9, 3, true);
        c.write_tag_header(39, 0x3f, false);
        assert_eq!(&c.as_bytes()[..2], &[0x40, 0x00]);
        assert_eq!(c.len(), 2 + 6 + 6);

        c.set_position(0);
        let h = c.read_tag_header().unwrap();
        assert_eq!((h.code, h.content_length, h.header_length), (1, 0, 2));
        let h = c.read_tag_header().unwrap();
        assert_eq!((h.code, h.content_length, h.header_length), (9, 3, 6));
        let h = c.read_tag_header().unwrap();
        assert_eq!((h.code, h.content_length, h.header_length), (39, 0x3f, 6));
    }

    #[test]
    fn test_negative_long_length_rejected() {
        let mut c = BitCursor::new();
        c.write_u16((2 << 6) | 0x3f);
        c.write_i32(-5);
        c.set_position(0);
        let err = c.read_tag_header().unwrap_err();
        assert!(err.is_format_error());
    }

    proptest! {
        #[test]
        fn prop_encoded_u32_round_trip(value in any::<u32>()) {
            let mut c = BitCursor::new();
            c.write_encoded_u32(value);
            c.set_position(0);
            prop_assert_eq!(c.read_encoded_u32().unwrap(), value);
        }

        #[test]
        fn prop_signed_bit_field_round_trip(bits in 1u32..=32, seed in any::<i32>(), pad in 0u32..8) {
            let shift = 32 - bits;
            let value = (seed << shift) >> shift;
            let mut c = BitCursor::new();
            c.write_ub(pad, 0);
            c.write_sb(bits, value);
            c.set_position(0);
            c.read_ub(pad).unwrap();
            prop_assert_eq!(c.read_sb(bits).unwrap(), value);
        }
    }
}
