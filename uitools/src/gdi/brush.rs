//! Brush Implementation
//!
//! Brushes are used to fill areas with colors or patterns.
//!
//! # Brush Types
//!
//! - **Solid**: Single color fill
//! - **Pattern**: Bitmap pattern fill, tiled from the device origin
//! - **DcColor**: The stock DC brush, colored per device context
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntgdi/gre/brushobj.cxx`

use super::surface::Surface;
use crate::ColorRef;

// ============================================================================
// Types
// ============================================================================

/// Brush style
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BrushStyle {
    #[default]
    Solid,
    Null,
    /// Copy of the bitmap the brush was created from
    Pattern(Surface),
    DcColor,
}

// ============================================================================
// Brush Structure
// ============================================================================

/// Brush object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brush {
    /// Brush style
    pub style: BrushStyle,

    /// Brush color (solid brushes)
    pub color: ColorRef,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            style: BrushStyle::Solid,
            color: ColorRef::WHITE,
        }
    }
}

impl Brush {
    pub fn solid(color: ColorRef) -> Self {
        Self { style: BrushStyle::Solid, color }
    }

    pub fn null() -> Self {
        Self { style: BrushStyle::Null, color: ColorRef::BLACK }
    }

    pub fn pattern(bitmap: Surface) -> Self {
        Self { style: BrushStyle::Pattern(bitmap), color: ColorRef::BLACK }
    }

    pub fn dc_color() -> Self {
        Self { style: BrushStyle::DcColor, color: ColorRef::WHITE }
    }

    pub fn is_null(&self) -> bool {
        self.style == BrushStyle::Null
    }

    /// Brush color at device pixel (x, y)
    ///
    /// Monochrome patterns take the DC colors: a set (white) bit paints the
    /// background color and a clear bit the text color. Returns `None` for
    /// the null brush.
    pub fn color_at(&self, x: i32, y: i32, attrs: &BrushColors) -> Option<ColorRef> {
        match &self.style {
            BrushStyle::Solid => Some(self.color),
            BrushStyle::Null => None,
            BrushStyle::DcColor => Some(attrs.dc_brush),
            BrushStyle::Pattern(bitmap) => {
                let (w, h) = (bitmap.width(), bitmap.height());
                if w == 0 || h == 0 {
                    return Some(attrs.text);
                }
                let pixel = bitmap
                    .get_pixel(x.rem_euclid(w), y.rem_euclid(h))
                    .unwrap_or(ColorRef::BLACK);
                if !bitmap.is_mono() {
                    Some(pixel)
                } else if pixel == ColorRef::WHITE {
                    Some(attrs.bk)
                } else {
                    Some(attrs.text)
                }
            }
        }
    }
}

/// DC attributes a brush reads while painting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrushColors {
    pub text: ColorRef,
    pub bk: ColorRef,
    pub dc_brush: ColorRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATTRS: BrushColors = BrushColors {
        text: ColorRef::BLACK,
        bk: ColorRef::rgb(1, 2, 3),
        dc_brush: ColorRef::rgb(9, 9, 9),
    };

    #[test]
    fn test_mono_pattern_uses_dc_colors() {
        // 2x2 checkerboard: 10 / 01
        let bitmap = Surface::from_mono_bits(2, 2, &[0x80, 0x00, 0x40, 0x00]);
        let brush = Brush::pattern(bitmap);
        assert_eq!(brush.color_at(0, 0, &ATTRS), Some(ATTRS.bk));
        assert_eq!(brush.color_at(1, 0, &ATTRS), Some(ATTRS.text));
        assert_eq!(brush.color_at(1, 1, &ATTRS), Some(ATTRS.bk));
        // tiles from the origin, including negative coordinates
        assert_eq!(brush.color_at(2, 2, &ATTRS), Some(ATTRS.bk));
        assert_eq!(brush.color_at(-1, 0, &ATTRS), Some(ATTRS.text));
    }

    #[test]
    fn test_dc_and_null_brushes() {
        assert_eq!(Brush::dc_color().color_at(5, 5, &ATTRS), Some(ATTRS.dc_brush));
        assert_eq!(Brush::null().color_at(0, 0, &ATTRS), None);
        assert!(Brush::null().is_null());
    }
}
