//! Font Implementation
//!
//! Logical font descriptors and the cell metrics the software backend uses
//! for text layout. Glyph shapes are not rasterized; each character paints
//! a solid block inside its cell, which is enough to check placement and
//! color.
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntgdi/gre/fontgdi.cxx`

use crate::Size;

// ============================================================================
// Constants
// ============================================================================

/// Default font width
pub const DEFAULT_FONT_WIDTH: i32 = 8;

/// Default font height
pub const DEFAULT_FONT_HEIGHT: i32 = 16;

/// Symbol font holding the frame control glyphs
pub const MARLETT: &str = "Marlett";

// ============================================================================
// Types
// ============================================================================

/// Font weight
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    DontCare = 0,
    Thin = 100,
    Light = 300,
    #[default]
    Normal = 400,
    Bold = 700,
    Heavy = 900,
}

/// Character set
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    Ansi = 0,
    #[default]
    Default = 1,
    Symbol = 2,
    OEM = 255,
}

// ============================================================================
// Font Structure
// ============================================================================

/// Logical font descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogFont {
    /// Height (negative = character height, positive = cell height)
    pub height: i32,

    /// Width (0 = default aspect ratio)
    pub width: i32,

    /// Weight
    pub weight: FontWeight,

    /// Italic
    pub italic: bool,

    /// Character set
    pub charset: CharSet,

    /// Face name, NUL padded (up to 31 chars)
    pub face_name: [u8; 32],
}

impl Default for LogFont {
    fn default() -> Self {
        Self::with_face("System", DEFAULT_FONT_HEIGHT)
    }
}

impl LogFont {
    /// Normal weight font of the given face and height, default charset
    pub fn with_face(face: &str, height: i32) -> Self {
        let mut face_name = [0u8; 32];
        for (i, &b) in face.as_bytes().iter().take(31).enumerate() {
            face_name[i] = b;
        }

        Self {
            height,
            width: 0,
            weight: FontWeight::Normal,
            italic: false,
            charset: CharSet::Default,
            face_name,
        }
    }

    /// Face name up to the first NUL
    pub fn face(&self) -> &str {
        let len = self.face_name.iter().position(|&b| b == 0).unwrap_or(self.face_name.len());
        core::str::from_utf8(&self.face_name[..len]).unwrap_or("")
    }

    /// Character cell size
    ///
    /// The magnitude of `height` is the cell height whatever its sign; a zero
    /// width means half the height, rounded up.
    pub fn cell_size(&self) -> Size {
        let cy = if self.height != 0 { self.height.abs() } else { DEFAULT_FONT_HEIGHT };
        let cx = if self.width > 0 {
            self.width
        } else if self.height != 0 {
            (cy + 1) / 2
        } else {
            DEFAULT_FONT_WIDTH
        };
        Size::new(cx, cy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_round_trip() {
        let lf = LogFont::with_face(MARLETT, -13);
        assert_eq!(lf.face(), "Marlett");
        assert_eq!(lf.charset, CharSet::Default);
        assert_eq!(lf.weight, FontWeight::Normal);
    }

    #[test]
    fn test_cell_size() {
        assert_eq!(LogFont::default().cell_size(), Size::new(8, 16));
        assert_eq!(LogFont::with_face(MARLETT, -13).cell_size(), Size::new(7, 13));
        assert_eq!(LogFont::with_face(MARLETT, 12).cell_size(), Size::new(6, 12));
    }

    #[test]
    fn test_long_face_truncated() {
        let name = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghij";
        assert_eq!(LogFont::with_face(name, 10).face().len(), 31);
    }
}
