//! CXFORM / CXFORMWITHALPHA records.

use std::fmt;

/// Color transform. Multiply terms are 8.8 fixed point stored as integers
/// (256 == 1.0); add terms are plain integers.
///
/// `has_alpha` selects the CXFORMWITHALPHA layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTransform {
    pub red_mult: i32,
    pub green_mult: i32,
    pub blue_mult: i32,
    pub alpha_mult: i32,
    pub red_add: i32,
    pub green_add: i32,
    pub blue_add: i32,
    pub alpha_add: i32,
    pub has_alpha: bool,
}

impl ColorTransform {
    /// Identity transform without alpha terms.
    pub const fn identity() -> Self {
        Self {
            red_mult: 256,
            green_mult: 256,
            blue_mult: 256,
            alpha_mult: 256,
            red_add: 0,
            green_add: 0,
            blue_add: 0,
            alpha_add: 0,
            has_alpha: false,
        }
    }

    /// Identity transform with alpha terms.
    pub const fn identity_with_alpha() -> Self {
        let mut cx = Self::identity();
        cx.has_alpha = true;
        cx
    }

    /// Whether any multiply term differs from 1.0.
    pub fn has_mult_terms(&self) -> bool {
        self.red_mult != 256
            || self.green_mult != 256
            || self.blue_mult != 256
            || (self.has_alpha && self.alpha_mult != 256)
    }

    /// Whether any add term differs from 0.
    pub fn has_add_terms(&self) -> bool {
        self.red_add != 0
            || self.green_add != 0
            || self.blue_add != 0
            || (self.has_alpha && self.alpha_add != 0)
    }
}

impl Default for ColorTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for ColorTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{},{}",
            self.red_mult, self.green_mult, self.blue_mult
        )?;
        if self.has_alpha {
            write!(f, ",{}", self.alpha_mult)?;
        }
        write!(f, "),({},{},{}", self.red_add, self.green_add, self.blue_add)?;
        if self.has_alpha {
            write!(f, ",{}", self.alpha_add)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms() {
        let mut cx = ColorTransform::identity();
        assert!(!cx.has_mult_terms());
        assert!(!cx.has_add_terms());

        // Alpha terms are ignored without the alpha layout.
        cx.alpha_add = 10;
        assert!(!cx.has_add_terms());
        cx.has_alpha = true;
        assert!(cx.has_add_terms());

        cx.red_mult = 128;
        assert!(cx.has_mult_terms());
        assert_eq!(cx.to_string(), "(128,256,256,256),(0,0,0,10)");
    }
}
