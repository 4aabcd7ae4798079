//! Surface/Bitmap Implementation
//!
//! Surfaces are the drawable areas behind device contexts: the display the
//! software backend renders to, and the in-memory bitmaps selected into
//! memory DCs.
//!
//! # Surface Types
//!
//! - **Color**: 24-bit RGB pixels
//! - **Mono**: 1 bpp; every stored pixel is black or white
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntgdi/gre/surfobj.cxx`

use alloc::vec;
use alloc::vec::Vec;

use crate::{ColorRef, Rect, Size};

// ============================================================================
// Surface Structure
// ============================================================================

/// Surface object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    /// Width in pixels
    width: i32,

    /// Height in pixels
    height: i32,

    /// 1 bpp surface
    mono: bool,

    /// Row-major `0x00BBGGRR` pixels
    pixels: Vec<u32>,
}

impl Surface {
    /// Create a surface cleared to black (zeroed bits)
    pub fn new(width: i32, height: i32, mono: bool) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            mono,
            pixels: vec![0; (width as usize) * (height as usize)],
        }
    }

    /// Create a monochrome surface from packed bits
    ///
    /// Rows are padded to 16 bits; the most significant bit of each byte is
    /// the leftmost pixel and a set bit is white.
    pub fn from_mono_bits(width: i32, height: i32, bits: &[u8]) -> Self {
        let mut surf = Self::new(width, height, true);
        let stride = mono_stride(width);

        for y in 0..surf.height {
            for x in 0..surf.width {
                let byte = bits
                    .get(y as usize * stride + (x as usize >> 3))
                    .copied()
                    .unwrap_or(0);
                if byte & (0x80 >> (x & 7)) != 0 {
                    surf.set_pixel(x, y, ColorRef::WHITE);
                }
            }
        }

        surf
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_mono(&self) -> bool {
        self.mono
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Get pixel index
    fn pixel_offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }

        Some(y as usize * self.width as usize + x as usize)
    }

    /// Read pixel at (x, y)
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<ColorRef> {
        let offset = self.pixel_offset(x, y)?;
        Some(ColorRef(self.pixels[offset]))
    }

    /// Write pixel at (x, y); mono surfaces store the nearest of black/white
    pub fn set_pixel(&mut self, x: i32, y: i32, color: ColorRef) -> bool {
        let offset = match self.pixel_offset(x, y) {
            Some(o) => o,
            None => return false,
        };

        let color = if self.mono { color.to_mono() } else { color };
        self.pixels[offset] = color.0 & 0x00FF_FFFF;
        true
    }

    /// Fill rectangle with color
    pub fn fill_rect(&mut self, rect: &Rect, color: ColorRef) -> bool {
        let rect = match rect.intersect(&self.bounds()) {
            Some(r) => r,
            None => return true, // Nothing to draw
        };

        for y in rect.top..rect.bottom {
            self.hline(rect.left, rect.right, y, color);
        }
        true
    }

    /// Draw horizontal line, `x2` exclusive
    pub fn hline(&mut self, x1: i32, x2: i32, y: i32, color: ColorRef) {
        if y < 0 || y >= self.height {
            return;
        }

        let x_start = x1.max(0);
        let x_end = x2.min(self.width);

        for x in x_start..x_end {
            self.set_pixel(x, y, color);
        }
    }

    /// Draw vertical line, `y2` exclusive
    pub fn vline(&mut self, x: i32, y1: i32, y2: i32, color: ColorRef) {
        if x < 0 || x >= self.width {
            return;
        }

        let y_start = y1.max(0);
        let y_end = y2.min(self.height);

        for y in y_start..y_end {
            self.set_pixel(x, y, color);
        }
    }
}

/// Bytes per row of a packed monochrome bitmap (16-bit aligned)
pub const fn mono_stride(width: i32) -> usize {
    (((if width > 0 { width } else { 0 }) as usize + 15) / 16) * 2
}
