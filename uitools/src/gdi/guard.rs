//! Scoped GDI state
//!
//! Every drawing helper changes DC state (selected objects, colors, current
//! position) or creates temporary objects. The guards here undo exactly one
//! such change when they go out of scope, so an early `?` return can never
//! leave a DC modified or an object leaked. Locals drop in reverse order,
//! which restores nested selections last-in first-out.

use super::{BkMode, Gdi};
use crate::{ColorRef, Point, W32Result, W32Status, HDC, HGDIOBJ};

/// An object selected into a DC; the previous selection returns on drop
pub struct Selected<'a, G: Gdi + ?Sized> {
    gdi: &'a G,
    hdc: HDC,
    previous: HGDIOBJ,
}

impl<'a, G: Gdi + ?Sized> Selected<'a, G> {
    pub fn new(gdi: &'a G, hdc: HDC, obj: HGDIOBJ) -> W32Result<Self> {
        let previous = gdi.select_object(hdc, obj);
        if previous.is_null() {
            log::debug!("select_object({:#x}) into {:#x} failed", obj.raw(), hdc.raw());
            return Err(W32Status::InvalidHandle);
        }
        Ok(Self { gdi, hdc, previous })
    }
}

impl<G: Gdi + ?Sized> Drop for Selected<'_, G> {
    fn drop(&mut self) {
        self.gdi.select_object(self.hdc, self.previous);
    }
}

/// A created object, deleted on drop
pub struct Owned<'a, G: Gdi + ?Sized> {
    gdi: &'a G,
    handle: HGDIOBJ,
}

impl<'a, G: Gdi + ?Sized> Owned<'a, G> {
    /// Take ownership of a freshly created handle; NULL means creation failed
    pub fn new(gdi: &'a G, handle: HGDIOBJ) -> W32Result<Self> {
        let handle = super::created(handle)?;
        Ok(Self { gdi, handle })
    }

    pub fn handle(&self) -> HGDIOBJ {
        self.handle
    }

    /// Give up ownership without deleting
    pub fn into_raw(self) -> HGDIOBJ {
        let handle = self.handle;
        core::mem::forget(self);
        handle
    }
}

impl<G: Gdi + ?Sized> Drop for Owned<'_, G> {
    fn drop(&mut self) {
        self.gdi.delete_object(self.handle);
    }
}

/// A memory DC compatible with another DC, deleted on drop
pub struct MemoryDc<'a, G: Gdi + ?Sized> {
    gdi: &'a G,
    hdc: HDC,
}

impl<'a, G: Gdi + ?Sized> MemoryDc<'a, G> {
    pub fn new(gdi: &'a G, compatible_with: HDC) -> W32Result<Self> {
        let hdc = super::created(gdi.create_compatible_dc(compatible_with))?;
        Ok(Self { gdi, hdc })
    }

    pub fn hdc(&self) -> HDC {
        self.hdc
    }
}

impl<G: Gdi + ?Sized> Drop for MemoryDc<'_, G> {
    fn drop(&mut self) {
        self.gdi.delete_dc(self.hdc);
    }
}

/// Text color override, restored on drop
pub struct TextColor<'a, G: Gdi + ?Sized> {
    gdi: &'a G,
    hdc: HDC,
    previous: ColorRef,
}

impl<'a, G: Gdi + ?Sized> TextColor<'a, G> {
    pub fn set(gdi: &'a G, hdc: HDC, color: ColorRef) -> Self {
        let previous = gdi.set_text_color(hdc, color);
        Self { gdi, hdc, previous }
    }

    /// Remember the current text color without changing it
    pub fn save(gdi: &'a G, hdc: HDC) -> Self {
        let previous = gdi.get_text_color(hdc);
        Self { gdi, hdc, previous }
    }
}

impl<G: Gdi + ?Sized> Drop for TextColor<'_, G> {
    fn drop(&mut self) {
        self.gdi.set_text_color(self.hdc, self.previous);
    }
}

/// Background color override, restored on drop
pub struct BkColor<'a, G: Gdi + ?Sized> {
    gdi: &'a G,
    hdc: HDC,
    previous: ColorRef,
}

impl<'a, G: Gdi + ?Sized> BkColor<'a, G> {
    pub fn set(gdi: &'a G, hdc: HDC, color: ColorRef) -> Self {
        let previous = gdi.set_bk_color(hdc, color);
        Self { gdi, hdc, previous }
    }
}

impl<G: Gdi + ?Sized> Drop for BkColor<'_, G> {
    fn drop(&mut self) {
        self.gdi.set_bk_color(self.hdc, self.previous);
    }
}

/// Background mode override, restored on drop
pub struct BkModeGuard<'a, G: Gdi + ?Sized> {
    gdi: &'a G,
    hdc: HDC,
    previous: BkMode,
}

impl<'a, G: Gdi + ?Sized> BkModeGuard<'a, G> {
    pub fn set(gdi: &'a G, hdc: HDC, mode: BkMode) -> Self {
        let previous = gdi.set_bk_mode(hdc, mode);
        Self { gdi, hdc, previous }
    }
}

impl<G: Gdi + ?Sized> Drop for BkModeGuard<'_, G> {
    fn drop(&mut self) {
        self.gdi.set_bk_mode(self.hdc, self.previous);
    }
}

/// Current position, restored on drop
pub struct SavedPosition<'a, G: Gdi + ?Sized> {
    gdi: &'a G,
    hdc: HDC,
    previous: Point,
}

impl<'a, G: Gdi + ?Sized> SavedPosition<'a, G> {
    pub fn move_to(gdi: &'a G, hdc: HDC, x: i32, y: i32) -> Self {
        let previous = gdi.move_to(hdc, x, y);
        Self { gdi, hdc, previous }
    }
}

impl<G: Gdi + ?Sized> Drop for SavedPosition<'_, G> {
    fn drop(&mut self) {
        self.gdi.move_to(self.hdc, self.previous.x, self.previous.y);
    }
}

/// Viewport origin shift, undone on drop
pub struct ViewportShift<'a, G: Gdi + ?Sized> {
    gdi: &'a G,
    hdc: HDC,
    dx: i32,
    dy: i32,
}

impl<'a, G: Gdi + ?Sized> ViewportShift<'a, G> {
    pub fn new(gdi: &'a G, hdc: HDC, dx: i32, dy: i32) -> Self {
        gdi.offset_viewport_org(hdc, dx, dy);
        Self { gdi, hdc, dx, dy }
    }
}

impl<G: Gdi + ?Sized> Drop for ViewportShift<'_, G> {
    fn drop(&mut self) {
        self.gdi.offset_viewport_org(self.hdc, -self.dx, -self.dy);
    }
}

/// Turn a primitive's success flag into a status
pub(crate) fn check(ok: bool) -> W32Result<()> {
    if ok {
        Ok(())
    } else {
        Err(W32Status::DrawFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdi::{SoftGdi, StockObject};
    use crate::GdiObjectType;

    #[test]
    fn test_selection_restored_in_reverse_order() {
        let gdi = SoftGdi::new(16, 16);
        let hdc = gdi.screen_dc();
        let original = gdi.get_current_object(hdc, GdiObjectType::Brush);
        {
            let _a = Selected::new(&gdi, hdc, gdi.get_stock_object(StockObject::BlackBrush)).unwrap();
            let _b = Selected::new(&gdi, hdc, gdi.get_stock_object(StockObject::GrayBrush)).unwrap();
            assert_eq!(
                gdi.get_current_object(hdc, GdiObjectType::Brush),
                gdi.get_stock_object(StockObject::GrayBrush)
            );
        }
        assert_eq!(gdi.get_current_object(hdc, GdiObjectType::Brush), original);
    }

    #[test]
    fn test_owned_object_deleted() {
        let gdi = SoftGdi::new(16, 16);
        let before = gdi.live_objects();
        {
            let bmp = Owned::new(&gdi, gdi.create_bitmap(8, 8, 1, 1, None)).unwrap();
            assert!(bmp.handle().is_valid());
            assert_eq!(gdi.live_objects(), before + 1);
        }
        assert_eq!(gdi.live_objects(), before);
    }

    #[test]
    fn test_failed_creation_is_an_error() {
        let gdi = SoftGdi::new(16, 16);
        gdi.fail_allocations_after(0);
        assert_eq!(
            MemoryDc::new(&gdi, gdi.screen_dc()).err(),
            Some(W32Status::NoMemory)
        );
    }

    #[test]
    fn test_position_and_colors_restored() {
        let gdi = SoftGdi::new(16, 16);
        let hdc = gdi.screen_dc();
        gdi.move_to(hdc, 3, 4);
        gdi.set_text_color(hdc, ColorRef::GRAY);
        {
            let _pos = SavedPosition::move_to(&gdi, hdc, 0, 0);
            let _text = TextColor::set(&gdi, hdc, ColorRef::WHITE);
            let _mode = BkModeGuard::set(&gdi, hdc, BkMode::Transparent);
        }
        assert_eq!(gdi.move_to(hdc, 0, 0), Point::new(3, 4));
        assert_eq!(gdi.get_text_color(hdc), ColorRef::GRAY);
        assert_eq!(gdi.get_bk_mode(hdc), BkMode::Opaque);
    }
}
