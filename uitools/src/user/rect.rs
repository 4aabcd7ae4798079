//! Rectangle Primitives
//!
//! `FillRect`, `FrameRect`, `InvertRect` and `DrawFocusRect`, all expressed
//! as pattern blits with the brush selected into the target DC.
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntuser/client/draw.c`
//! - `windows/core/ntuser/kernel/focusrect.c`

use crate::gdi::guard::{check, Owned, Selected};
use crate::gdi::{created, Gdi, Rop3};
use crate::user::metrics::SystemColor;
use crate::user::PATTERN_AA55;
use crate::{GdiHandle, Rect, W32Result, W32Status, HBRUSH, HDC};

/// Largest raw brush value that names a system color (`COLOR_MENUBAR + 1`)
const SYS_COLOR_TOKEN_MAX: u32 = SystemColor::MenuBar as u32 + 1;

/// Resolve the brush argument of `fill_rect`
///
/// NULL keeps the DC's current brush. Small values are system color tokens
/// (`COLOR_xxx + 1`) standing for that color's brush.
fn resolve_brush<G: Gdi + ?Sized>(gdi: &G, brush: HBRUSH) -> W32Result<Option<HBRUSH>> {
    if brush.is_null() {
        return Ok(None);
    }
    if brush.raw() <= SYS_COLOR_TOKEN_MAX {
        let color = SystemColor::from_index(brush.raw() as i32 - 1).ok_or(W32Status::InvalidParameter)?;
        return Ok(Some(gdi.get_sys_color_brush(color)));
    }
    Ok(Some(brush))
}

/// Fill with a brush (or the current brush for NULL)
pub(crate) fn fill<G: Gdi + ?Sized>(gdi: &G, hdc: HDC, rc: &Rect, brush: HBRUSH) -> W32Result<()> {
    let _brush = match resolve_brush(gdi, brush)? {
        Some(brush) => Some(Selected::new(gdi, hdc, brush)?),
        None => None,
    };
    check(gdi.pat_blt(hdc, rc.left, rc.top, rc.width(), rc.height(), Rop3::PatCopy))
}

/// Fill a rectangle, right and bottom edges excluded
///
/// `brush` may be a real brush, NULL for the DC's current brush, or
/// [`GdiHandle::sys_color`] for a system color brush.
pub fn fill_rect<G: Gdi + ?Sized>(gdi: &G, hdc: HDC, rc: &Rect, brush: HBRUSH) -> bool {
    match fill(gdi, hdc, rc, brush) {
        Ok(()) => true,
        Err(status) => {
            log::debug!("fill_rect({:?}) failed: {}", rc, status);
            false
        }
    }
}

/// One pixel border just inside the rectangle
pub fn frame_rect<G: Gdi + ?Sized>(gdi: &G, hdc: HDC, rc: &Rect, brush: HBRUSH) -> bool {
    if rc.is_empty() {
        return false;
    }
    let _brush = match Selected::new(gdi, hdc, brush) {
        Ok(selected) => selected,
        Err(_) => return false,
    };

    let (w, h) = (rc.width(), rc.height());
    gdi.pat_blt(hdc, rc.left, rc.top, 1, h, Rop3::PatCopy);
    gdi.pat_blt(hdc, rc.right - 1, rc.top, 1, h, Rop3::PatCopy);
    gdi.pat_blt(hdc, rc.left, rc.top, w, 1, Rop3::PatCopy);
    gdi.pat_blt(hdc, rc.left, rc.bottom - 1, w, 1, Rop3::PatCopy);
    true
}

/// Invert every pixel of the rectangle
pub fn invert_rect<G: Gdi + ?Sized>(gdi: &G, hdc: HDC, rc: &Rect) -> bool {
    gdi.pat_blt(hdc, rc.left, rc.top, rc.width(), rc.height(), Rop3::DstInvert)
}

/// Focus brush: the AA55 checkerboard, created once per backend
fn focus_brush<G: Gdi + ?Sized>(gdi: &G) -> W32Result<HBRUSH> {
    gdi.focus_brush_cache().get_or_try_create(|| {
        let bitmap = Owned::new(gdi, gdi.create_bitmap(8, 8, 1, 1, Some(&PATTERN_AA55)))?;
        let brush = created(gdi.create_pattern_brush(bitmap.handle()))?;
        log::trace!("focus brush {:#x} created", brush.raw());
        Ok((bitmap.into_raw(), brush))
    })
}

/// XOR a dotted frame onto the rectangle
///
/// The frame is as thick as the focus border metrics. Drawing it twice
/// restores the original pixels. Always reports success.
pub fn draw_focus_rect<G: Gdi + ?Sized>(gdi: &G, hdc: HDC, rc: &Rect) -> bool {
    let brush = match focus_brush(gdi) {
        Ok(brush) => brush,
        Err(status) => {
            log::debug!("draw_focus_rect: no focus brush: {}", status);
            return true;
        }
    };

    let border = gdi.get_focus_border();
    let (cx, cy) = (border.cx, border.cy);
    let (w, h) = (rc.width(), rc.height());

    let _brush = match Selected::new(gdi, hdc, brush) {
        Ok(selected) => selected,
        Err(_) => return true,
    };

    // top, bottom, left, right
    gdi.pat_blt(hdc, rc.left, rc.top, w, cy, Rop3::PatInvert);
    gdi.pat_blt(hdc, rc.left, rc.bottom - cy, w, cy, Rop3::PatInvert);
    gdi.pat_blt(hdc, rc.left, rc.top + cy, cx, h - 2 * cy, Rop3::PatInvert);
    gdi.pat_blt(hdc, rc.right - cx, rc.top + cy, cx, h - 2 * cy, Rop3::PatInvert);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdi::soft::GdiCall;
    use crate::gdi::{SoftGdi, StockObject};
    use crate::{ColorRef, GdiObjectType, Size};

    #[test]
    fn test_fill_rect_excludes_far_edges() {
        let gdi = SoftGdi::new(16, 16);
        let hdc = gdi.screen_dc();
        let white = gdi.get_stock_object(StockObject::WhiteBrush);

        assert!(fill_rect(&gdi, hdc, &Rect::new(2, 2, 6, 5), white));
        assert_eq!(gdi.pixel(2, 2), ColorRef::WHITE);
        assert_eq!(gdi.pixel(5, 4), ColorRef::WHITE);
        assert_eq!(gdi.pixel(6, 4), ColorRef::BLACK);
        assert_eq!(gdi.pixel(5, 5), ColorRef::BLACK);
    }

    #[test]
    fn test_sys_color_token_matches_brush() {
        let a = SoftGdi::new(16, 16);
        let b = SoftGdi::new(16, 16);
        let rc = Rect::new(1, 1, 9, 9);

        assert!(fill_rect(&a, a.screen_dc(), &rc, GdiHandle::sys_color(SystemColor::BtnShadow)));
        assert!(fill_rect(&b, b.screen_dc(), &rc, b.get_sys_color_brush(SystemColor::BtnShadow)));
        for (x, y) in [(1, 1), (4, 4), (8, 8), (9, 9)] {
            assert_eq!(a.pixel(x, y), b.pixel(x, y));
        }
        assert_eq!(a.pixel(4, 4), ColorRef::GRAY);
    }

    #[test]
    fn test_reserved_token_rejected() {
        let gdi = SoftGdi::new(16, 16);
        assert!(!fill_rect(&gdi, gdi.screen_dc(), &Rect::new(0, 0, 4, 4), GdiHandle::from_raw(26)));
        assert!(gdi.calls().is_empty());
    }

    #[test]
    fn test_null_brush_uses_current() {
        let gdi = SoftGdi::new(16, 16);
        let hdc = gdi.screen_dc();
        gdi.select_object(hdc, gdi.get_stock_object(StockObject::GrayBrush));

        assert!(fill_rect(&gdi, hdc, &Rect::new(0, 0, 4, 4), GdiHandle::NULL));
        assert_eq!(gdi.pixel(3, 3), ColorRef::GRAY);
    }

    #[test]
    fn test_fill_restores_brush() {
        let gdi = SoftGdi::new(16, 16);
        let hdc = gdi.screen_dc();
        let before = gdi.get_current_object(hdc, GdiObjectType::Brush);
        fill_rect(&gdi, hdc, &Rect::new(0, 0, 4, 4), gdi.get_stock_object(StockObject::BlackBrush));
        assert_eq!(gdi.get_current_object(hdc, GdiObjectType::Brush), before);
    }

    #[test]
    fn test_frame_rect() {
        let gdi = SoftGdi::new(16, 16);
        let hdc = gdi.screen_dc();
        let white = gdi.get_stock_object(StockObject::WhiteBrush);

        assert!(frame_rect(&gdi, hdc, &Rect::new(2, 2, 8, 6), white));
        assert_eq!(gdi.pixel(2, 4), ColorRef::WHITE);
        assert_eq!(gdi.pixel(7, 4), ColorRef::WHITE);
        assert_eq!(gdi.pixel(4, 2), ColorRef::WHITE);
        assert_eq!(gdi.pixel(4, 5), ColorRef::WHITE);
        assert_eq!(gdi.pixel(4, 4), ColorRef::BLACK);
        assert_eq!(gdi.pixel(8, 4), ColorRef::BLACK);

        let strips: Vec<_> = gdi
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                GdiCall::PatBlt { rect, .. } => Some(rect),
                _ => None,
            })
            .collect();
        assert_eq!(
            strips,
            [
                Rect::new(2, 2, 3, 6),
                Rect::new(7, 2, 8, 6),
                Rect::new(2, 2, 8, 3),
                Rect::new(2, 5, 8, 6),
            ]
        );
    }

    #[test]
    fn test_frame_rect_empty() {
        let gdi = SoftGdi::new(16, 16);
        let white = gdi.get_stock_object(StockObject::WhiteBrush);
        assert!(!frame_rect(&gdi, gdi.screen_dc(), &Rect::new(4, 4, 4, 9), white));
        assert!(!frame_rect(&gdi, gdi.screen_dc(), &Rect::new(0, 0, 4, 4), GdiHandle::NULL));
    }

    #[test]
    fn test_invert_twice_restores() {
        let gdi = SoftGdi::new(16, 16);
        let hdc = gdi.screen_dc();
        let rc = Rect::new(0, 0, 6, 6);

        assert!(invert_rect(&gdi, hdc, &rc));
        assert_eq!(gdi.pixel(3, 3), ColorRef::WHITE);
        assert!(invert_rect(&gdi, hdc, &rc));
        assert_eq!(gdi.pixel(3, 3), ColorRef::BLACK);
    }

    #[test]
    fn test_focus_rect_is_its_own_inverse() {
        let gdi = SoftGdi::new(16, 16);
        let hdc = gdi.screen_dc();
        let rc = Rect::new(1, 1, 11, 9);
        fill_rect(&gdi, hdc, &Rect::new(0, 0, 16, 16), GdiHandle::sys_color(SystemColor::BtnFace));

        assert!(draw_focus_rect(&gdi, hdc, &rc));
        let changed = (0..16)
            .flat_map(|y| (0..16).map(move |x| (x, y)))
            .filter(|&(x, y)| gdi.pixel(x, y) != ColorRef::rgb(212, 208, 200))
            .count();
        assert!(changed > 0);
        // Interior untouched
        assert_eq!(gdi.pixel(5, 5), ColorRef::rgb(212, 208, 200));

        assert!(draw_focus_rect(&gdi, hdc, &rc));
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(gdi.pixel(x, y), ColorRef::rgb(212, 208, 200));
            }
        }
    }

    #[test]
    fn test_focus_rect_strips_follow_metrics() {
        let gdi = SoftGdi::new(32, 32);
        let hdc = gdi.screen_dc();
        gdi.set_focus_border(Size::new(2, 3));

        assert!(draw_focus_rect(&gdi, hdc, &Rect::new(0, 0, 20, 12)));
        let strips: Vec<_> = gdi
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                GdiCall::PatBlt { rect, rop: Rop3::PatInvert, .. } => Some(rect),
                _ => None,
            })
            .collect();
        assert_eq!(
            strips,
            [
                Rect::new(0, 0, 20, 3),
                Rect::new(0, 9, 20, 12),
                Rect::new(0, 3, 2, 9),
                Rect::new(18, 3, 20, 9),
            ]
        );
    }

    #[test]
    fn test_focus_brush_cached() {
        let gdi = SoftGdi::new(16, 16);
        let hdc = gdi.screen_dc();
        draw_focus_rect(&gdi, hdc, &Rect::new(0, 0, 8, 8));
        let objects = gdi.live_objects();
        let brush = gdi.focus_brush_cache().get();
        assert!(brush.is_some());

        draw_focus_rect(&gdi, hdc, &Rect::new(0, 0, 8, 8));
        assert_eq!(gdi.live_objects(), objects);
        assert_eq!(gdi.focus_brush_cache().get(), brush);
    }

    #[test]
    fn test_focus_rect_without_brush_still_succeeds() {
        let gdi = SoftGdi::new(16, 16);
        gdi.fail_allocations_after(1);
        assert!(draw_focus_rect(&gdi, gdi.screen_dc(), &Rect::new(0, 0, 8, 8)));
        assert_eq!(gdi.live_objects(), 0);
        assert!(gdi.focus_brush_cache().get().is_none());
        assert!(gdi.calls().is_empty());
    }
}
