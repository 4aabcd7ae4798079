//! Device Context (DC) Implementation
//!
//! A Device Context encapsulates the drawing state (selected objects,
//! colors, position, origin) and names the surface drawing lands on.
//!
//! # DC Types
//!
//! - **Display DC**: Connected to the backend's screen surface
//! - **Memory DC**: Connected to whatever bitmap is selected into it
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntgdi/gre/dcobj.cxx`
//! - `windows/core/ntgdi/inc/dcobj.hxx`

use super::{BkMode, MapMode};
use crate::{ColorRef, GdiHandle, GdiObjectType, Point};

// ============================================================================
// DC Types
// ============================================================================

/// Device context type
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DcType {
    #[default]
    Display = 1,    // Screen DC
    Memory = 2,     // Memory DC (selected bitmap)
}

/// Objects a new DC starts out with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DcDefaults {
    pub brush: GdiHandle,
    pub pen: GdiHandle,
    pub font: GdiHandle,
    pub bitmap: GdiHandle,
}

// ============================================================================
// Device Context Structure
// ============================================================================

/// Device Context state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceContext {
    /// DC type
    pub dc_type: DcType,

    /// Currently selected brush
    pub brush: GdiHandle,

    /// Currently selected pen
    pub pen: GdiHandle,

    /// Currently selected font
    pub font: GdiHandle,

    /// Currently selected bitmap (memory DC only)
    pub bitmap: GdiHandle,

    /// Current text color
    pub text_color: ColorRef,

    /// Current background color
    pub bk_color: ColorRef,

    /// Background mode
    pub bk_mode: BkMode,

    /// Color of the stock DC brush
    pub dc_brush_color: ColorRef,

    /// Color of the stock DC pen
    pub dc_pen_color: ColorRef,

    /// Current pen position
    pub current_pos: Point,

    /// Mapping mode
    pub map_mode: MapMode,

    /// Viewport origin
    pub viewport_org: Point,
}

impl DeviceContext {
    pub fn new(dc_type: DcType, defaults: DcDefaults) -> Self {
        Self {
            dc_type,
            brush: defaults.brush,
            pen: defaults.pen,
            font: defaults.font,
            bitmap: defaults.bitmap,
            text_color: ColorRef::BLACK,
            bk_color: ColorRef::WHITE,
            bk_mode: BkMode::Opaque,
            dc_brush_color: ColorRef::WHITE,
            dc_pen_color: ColorRef::BLACK,
            current_pos: Point::new(0, 0),
            map_mode: MapMode::Text,
            viewport_org: Point::new(0, 0),
        }
    }

    /// Swap in an object of a selectable type; returns the previous one
    ///
    /// The caller has already checked that `obj` exists. Bitmaps only go into
    /// memory DCs.
    pub fn select(&mut self, obj: GdiHandle) -> GdiHandle {
        let slot = match obj.object_type() {
            GdiObjectType::Brush => &mut self.brush,
            GdiObjectType::Pen => &mut self.pen,
            GdiObjectType::Font => &mut self.font,
            GdiObjectType::Bitmap if self.dc_type == DcType::Memory => &mut self.bitmap,
            _ => return GdiHandle::NULL,
        };
        core::mem::replace(slot, obj)
    }

    /// Currently selected object of a type
    pub fn current(&self, kind: GdiObjectType) -> GdiHandle {
        match kind {
            GdiObjectType::Brush => self.brush,
            GdiObjectType::Pen => self.pen,
            GdiObjectType::Font => self.font,
            GdiObjectType::Bitmap => self.bitmap,
            _ => GdiHandle::NULL,
        }
    }

    /// Is this object selected here
    pub fn holds(&self, obj: GdiHandle) -> bool {
        !obj.is_null()
            && (self.brush == obj || self.pen == obj || self.font == obj || self.bitmap == obj)
    }

    /// Convert logical coordinates to device coordinates
    ///
    /// Only the viewport origin applies; the scaling modes are reported by
    /// `map_mode` but not emulated.
    pub fn lp_to_dp(&self, pt: Point) -> Point {
        Point::new(pt.x + self.viewport_org.x, pt.y + self.viewport_org.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> DcDefaults {
        DcDefaults {
            brush: GdiHandle::new(1, GdiObjectType::Brush),
            pen: GdiHandle::new(2, GdiObjectType::Pen),
            font: GdiHandle::new(3, GdiObjectType::Font),
            bitmap: GdiHandle::new(4, GdiObjectType::Bitmap),
        }
    }

    #[test]
    fn test_select_returns_previous() {
        let mut dc = DeviceContext::new(DcType::Memory, defaults());
        let brush = GdiHandle::new(9, GdiObjectType::Brush);
        assert_eq!(dc.select(brush), defaults().brush);
        assert_eq!(dc.current(GdiObjectType::Brush), brush);
        assert!(dc.holds(brush));
    }

    #[test]
    fn test_display_dc_rejects_bitmaps() {
        let mut dc = DeviceContext::new(DcType::Display, defaults());
        assert!(dc.select(GdiHandle::new(9, GdiObjectType::Bitmap)).is_null());
        assert!(dc.select(GdiHandle::new(9, GdiObjectType::DC)).is_null());
    }

    #[test]
    fn test_viewport_offset() {
        let mut dc = DeviceContext::new(DcType::Display, defaults());
        dc.viewport_org = Point::new(5, -2);
        assert_eq!(dc.lp_to_dp(Point::new(1, 1)), Point::new(6, -1));
    }
}
