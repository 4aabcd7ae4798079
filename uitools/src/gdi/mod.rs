//! GDI - drawing backend capability
//!
//! The rendering core never touches pixels itself. Every line, fill, blit and
//! glyph goes through the [`Gdi`] trait, which mirrors the handle-based
//! Windows GDI surface: objects are created and selected into device contexts
//! by handle, and each selection returns the previously selected object so the
//! caller can put it back.
//!
//! # Components
//!
//! - **guard**: RAII wrappers that restore selections and free objects
//! - **soft**: `SoftGdi`, an in-memory backend (pixels + call log)
//! - **dc / surface / brush / pen / font / draw**: object models and
//!   rasterization used by `SoftGdi`
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntgdi/gre/dcobj.cxx` - Device context
//! - `windows/core/ntgdi/gre/brushobj.cxx` - Brush objects
//! - `windows/core/ntgdi/gre/trivblt.cxx` - Raster operations

pub mod guard;
pub mod dc;
pub mod surface;
pub mod brush;
pub mod pen;
pub mod font;
pub mod draw;
pub mod soft;

pub use font::LogFont;
pub use soft::SoftGdi;

use crate::user::SystemColor;
use crate::{ColorRef, GdiHandle, GdiObjectType, Point, Rect, Size, W32Result, W32Status};
use crate::{HBITMAP, HBRUSH, HDC, HFONT, HGDIOBJ, HICON};

// ============================================================================
// Stock Objects
// ============================================================================

/// Stock object identifiers
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockObject {
    WhiteBrush = 0,
    LightGrayBrush = 1,
    GrayBrush = 2,
    DarkGrayBrush = 3,
    BlackBrush = 4,
    NullBrush = 5,
    WhitePen = 6,
    BlackPen = 7,
    NullPen = 8,
    SystemFont = 13,
    DcBrush = 18,
    DcPen = 19,
}

// ============================================================================
// Raster Operations
// ============================================================================

/// Ternary raster operations (for BitBlt / PatBlt)
///
/// Bits 16..24 of each code hold the truth table indexed by
/// `pattern << 2 | source << 1 | destination`.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rop3 {
    SrcCopy = 0x00CC0020,      // S
    SrcPaint = 0x00EE0086,     // D | S
    SrcAnd = 0x008800C6,       // D & S
    SrcInvert = 0x00660046,    // D ^ S
    SrcErase = 0x00440328,     // S & ~D
    NotSrcCopy = 0x00330008,   // ~S
    NotSrcErase = 0x001100A6,  // ~(D | S)
    MergeCopy = 0x00C000CA,    // S & P
    MergePaint = 0x00BB0226,   // D | ~S
    PatCopy = 0x00F00021,      // P
    PatPaint = 0x00FB0A09,     // D | ~S | P
    PatInvert = 0x005A0049,    // D ^ P
    DstInvert = 0x00550009,    // ~D
    Blackness = 0x00000042,    // 0
    Whiteness = 0x00FF0062,    // 1
    /// `DPo`: OR the pattern into the destination (checkerboard fill)
    DstOrPat = 0x00FA0089,
    /// `PSDPxax`: pattern where the source is black, destination where white
    PatThroughMask = 0x00B8074A,
}

impl Rop3 {
    /// Truth table byte
    pub const fn index(self) -> u8 {
        ((self as u32) >> 16) as u8
    }

    /// Does the operation read the destination/brush/source
    pub const fn uses_source(self) -> bool {
        let i = self.index();
        ((i >> 2) & 0x33) != (i & 0x33)
    }

    pub const fn uses_pattern(self) -> bool {
        let i = self.index();
        ((i >> 4) & 0x0F) != (i & 0x0F)
    }

    /// Evaluate the operation bitwise on 24-bit color values
    pub fn apply(self, pattern: u32, source: u32, dest: u32) -> u32 {
        let table = self.index();
        let mut out = 0u32;
        for i in 0..8u8 {
            if table & (1 << i) == 0 {
                continue;
            }
            let p = if i & 4 != 0 { pattern } else { !pattern };
            let s = if i & 2 != 0 { source } else { !source };
            let d = if i & 1 != 0 { dest } else { !dest };
            out |= p & s & d;
        }
        out & 0x00FF_FFFF
    }
}

// ============================================================================
// DC Attributes
// ============================================================================

/// Background mode
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BkMode {
    Transparent = 1,
    #[default]
    Opaque = 2,
}

/// Mapping mode
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapMode {
    #[default]
    Text = 1,       // Each unit = 1 pixel
    LoMetric = 2,   // Each unit = 0.1 mm
    HiMetric = 3,   // Each unit = 0.01 mm
    LoEnglish = 4,  // Each unit = 0.01 inch
    HiEnglish = 5,  // Each unit = 0.001 inch
    Twips = 6,      // Each unit = 1/1440 inch
    Isotropic = 7,  // Custom, X = Y scaling
    Anisotropic = 8,// Custom, X != Y scaling
}

bitflags::bitflags! {
    /// DrawText format flags (DT_*), the subset the state renderer issues
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DrawTextFlags: u32 {
        const LEFT = 0x0000_0000;
        const RIGHT = 0x0000_0002;
        const NOCLIP = 0x0000_0100;
        const NOPREFIX = 0x0000_0800;
        const HIDEPREFIX = 0x0010_0000;
        const PREFIXONLY = 0x0020_0000;
    }
}

// ============================================================================
// Backend Capability
// ============================================================================

/// Handle-based drawing backend
///
/// Methods take `&self`; backends keep their object tables behind a lock, the
/// way the kernel GDI keeps its handle tables. Creation methods return
/// `GdiHandle::NULL` on failure and `select_object` returns `NULL` when the
/// object cannot be selected.
pub trait Gdi {
    // ---- Objects -----------------------------------------------------------

    fn get_stock_object(&self, obj: StockObject) -> HGDIOBJ;

    /// Select a pen, brush, font or bitmap; returns the previous one
    fn select_object(&self, hdc: HDC, obj: HGDIOBJ) -> HGDIOBJ;

    fn get_current_object(&self, hdc: HDC, kind: GdiObjectType) -> HGDIOBJ;

    fn delete_object(&self, obj: HGDIOBJ) -> bool;

    /// Bitmap with rows padded to 16 bits, most significant bit leftmost
    fn create_bitmap(&self, width: i32, height: i32, planes: u32, bpp: u32, bits: Option<&[u8]>) -> HBITMAP;

    fn create_pattern_brush(&self, hbm: HBITMAP) -> HBRUSH;

    fn create_font_indirect(&self, lf: &LogFont) -> HFONT;

    /// Memory DC with a 1x1 monochrome bitmap selected
    fn create_compatible_dc(&self, hdc: HDC) -> HDC;

    fn delete_dc(&self, hdc: HDC) -> bool;

    fn get_bitmap_size(&self, hbm: HBITMAP) -> Option<Size>;

    fn get_icon_size(&self, hicon: HICON) -> Option<Size>;

    // ---- Attributes --------------------------------------------------------

    fn get_map_mode(&self, hdc: HDC) -> MapMode;

    fn set_text_color(&self, hdc: HDC, color: ColorRef) -> ColorRef;

    fn get_text_color(&self, hdc: HDC) -> ColorRef;

    fn set_bk_color(&self, hdc: HDC, color: ColorRef) -> ColorRef;

    fn set_bk_mode(&self, hdc: HDC, mode: BkMode) -> BkMode;

    fn get_bk_mode(&self, hdc: HDC) -> BkMode;

    fn set_dc_pen_color(&self, hdc: HDC, color: ColorRef) -> ColorRef;

    fn set_dc_brush_color(&self, hdc: HDC, color: ColorRef) -> ColorRef;

    /// Move the current position; returns the previous one
    fn move_to(&self, hdc: HDC, x: i32, y: i32) -> Point;

    /// Shift the viewport origin; returns the previous origin
    fn offset_viewport_org(&self, hdc: HDC, dx: i32, dy: i32) -> Point;

    // ---- Primitives --------------------------------------------------------

    /// Line from the current position, end point excluded
    fn line_to(&self, hdc: HDC, x: i32, y: i32) -> bool;

    /// Filled with the selected brush, outlined with the selected pen
    fn polygon(&self, hdc: HDC, points: &[Point]) -> bool;

    fn pat_blt(&self, hdc: HDC, x: i32, y: i32, width: i32, height: i32, rop: Rop3) -> bool;

    #[allow(clippy::too_many_arguments)]
    fn bit_blt(
        &self,
        hdc_dest: HDC,
        x_dest: i32,
        y_dest: i32,
        width: i32,
        height: i32,
        hdc_src: HDC,
        x_src: i32,
        y_src: i32,
        rop: Rop3,
    ) -> bool;

    fn text_out(&self, hdc: HDC, x: i32, y: i32, text: &str) -> bool;

    /// Returns the height of the drawn text, 0 on failure
    fn draw_text(&self, hdc: HDC, text: &str, rect: &Rect, flags: DrawTextFlags) -> i32;

    fn draw_icon_ex(&self, hdc: HDC, x: i32, y: i32, hicon: HICON, cx: i32, cy: i32) -> bool;

    fn get_text_extent(&self, hdc: HDC, text: &str) -> Option<Size>;

    // ---- Theme -------------------------------------------------------------

    fn get_sys_color(&self, color: SystemColor) -> ColorRef;

    /// Shared system color brush; never deleted by callers
    fn get_sys_color_brush(&self, color: SystemColor) -> HBRUSH;

    /// SPI_GETFOCUSBORDERWIDTH / SPI_GETFOCUSBORDERHEIGHT
    fn get_focus_border(&self) -> Size;

    /// Slot for the focus rectangle pattern brush
    fn focus_brush_cache(&self) -> &CachedBrush;
}

// ============================================================================
// Cached Brush
// ============================================================================

/// A pattern brush created on first use and kept for the backend's lifetime
///
/// Initialization runs at most once even when several threads race on
/// first use; a failed attempt leaves the slot empty for the next caller.
#[derive(Default)]
pub struct CachedBrush {
    slot: spin::Once<(HBITMAP, HBRUSH)>,
}

impl CachedBrush {
    pub const fn new() -> Self {
        Self { slot: spin::Once::new() }
    }

    pub fn get(&self) -> Option<HBRUSH> {
        self.slot.get().map(|&(_, brush)| brush)
    }

    pub fn get_or_try_create<F>(&self, create: F) -> W32Result<HBRUSH>
    where
        F: FnOnce() -> W32Result<(HBITMAP, HBRUSH)>,
    {
        self.slot.try_call_once(create).map(|&(_, brush)| brush)
    }
}

impl core::fmt::Debug for CachedBrush {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CachedBrush").field("brush", &self.get()).finish()
    }
}

/// Map a NULL handle from a creation call to `NoMemory`
pub(crate) fn created(handle: GdiHandle) -> W32Result<GdiHandle> {
    if handle.is_null() {
        Err(W32Status::NoMemory)
    } else {
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rop_truth_tables() {
        let (p, s, d) = (0x00F0F0F0, 0x00CCCCCC, 0x00AAAAAA);
        assert_eq!(Rop3::SrcCopy.apply(p, s, d), s);
        assert_eq!(Rop3::PatCopy.apply(p, s, d), p);
        assert_eq!(Rop3::DstInvert.apply(p, s, d), !d & 0x00FF_FFFF);
        assert_eq!(Rop3::PatInvert.apply(p, s, d), p ^ d);
        assert_eq!(Rop3::DstOrPat.apply(p, s, d), p | d);
        assert_eq!(Rop3::PatThroughMask.apply(p, s, d), (!s & p | s & d) & 0x00FF_FFFF);
    }

    #[test]
    fn test_mask_composite_selects_pattern_on_black() {
        let brush = 0x00112233;
        let dest = 0x00445566;
        assert_eq!(Rop3::PatThroughMask.apply(brush, 0, dest), brush);
        assert_eq!(Rop3::PatThroughMask.apply(brush, 0x00FF_FFFF, dest), dest);
    }

    #[test]
    fn test_rop_operand_usage() {
        assert!(Rop3::SrcCopy.uses_source());
        assert!(!Rop3::SrcCopy.uses_pattern());
        assert!(Rop3::PatInvert.uses_pattern());
        assert!(!Rop3::PatInvert.uses_source());
        assert!(!Rop3::DstInvert.uses_source());
        assert!(!Rop3::DstInvert.uses_pattern());
        assert!(Rop3::PatThroughMask.uses_source());
        assert!(Rop3::PatThroughMask.uses_pattern());
    }
}
