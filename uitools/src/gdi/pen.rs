//! Pen Implementation
//!
//! Pens are used to draw lines and outline shapes. Only cosmetic
//! one-pixel pens exist here.
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntgdi/gre/penobj.cxx`

use crate::ColorRef;

/// Pen style
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PenStyle {
    #[default]
    Solid = 0,
    Null = 5,
    /// Stock DC pen; color comes from the device context
    DcColor = 0xFF,
}

/// Pen object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen {
    /// Pen style
    pub style: PenStyle,

    /// Pen color
    pub color: ColorRef,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            style: PenStyle::Solid,
            color: ColorRef::BLACK,
        }
    }
}

impl Pen {
    pub const fn solid(color: ColorRef) -> Self {
        Self { style: PenStyle::Solid, color }
    }

    pub const fn null() -> Self {
        Self { style: PenStyle::Null, color: ColorRef::BLACK }
    }

    pub const fn dc_color() -> Self {
        Self { style: PenStyle::DcColor, color: ColorRef::BLACK }
    }

    /// Color the pen draws with, `None` when it draws nothing
    pub fn resolve(&self, dc_pen_color: ColorRef) -> Option<ColorRef> {
        match self.style {
            PenStyle::Solid => Some(self.color),
            PenStyle::Null => None,
            PenStyle::DcColor => Some(dc_pen_color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let dc = ColorRef::rgb(1, 2, 3);
        assert_eq!(Pen::solid(ColorRef::WHITE).resolve(dc), Some(ColorRef::WHITE));
        assert_eq!(Pen::null().resolve(dc), None);
        assert_eq!(Pen::dc_color().resolve(dc), Some(dc));
    }
}
