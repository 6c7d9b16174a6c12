//! Color helpers.
//!
//! SWF colors are carried as a single `u32` packed as `0xAARRGGBB`
//! regardless of whether the record on disk is RGB, RGBA or ARGB.

/// Pack an opaque color.
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    argb(0xFF, r, g, b)
}

/// Pack a color with alpha.
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Split a packed color into `(a, r, g, b)`.
pub const fn components(color: u32) -> (u8, u8, u8, u8) {
    (
        (color >> 24) as u8,
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
    )
}

/// Format as `#RRGGBB`, or `#AARRGGBB` when not fully opaque.
pub fn color_to_string(color: u32) -> String {
    let (a, r, g, b) = components(color);
    if a == 0xFF {
        format!("#{r:02X}{g:02X}{b:02X}")
    } else {
        format!("#{a:02X}{r:02X}{g:02X}{b:02X}")
    }
}
