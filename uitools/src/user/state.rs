//! Image States
//!
//! `DrawState` draws text, an icon, a bitmap or caller-drawn content either
//! as-is or "ghosted": rendered to a monochrome mask first, then blitted
//! through that mask with a brush. Disabled images get a highlight copy
//! offset by one pixel under a shadow copy; default images get a shadow
//! copy under a brush copy.
//!
//! `GrayString` is the text-only special case and goes through the same
//! ghost path.
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntuser/client/draw.c` (DrawState, GrayString)
//! - `windows/published/winuser.w` (DST_*, DSS_*)

use bitflags::bitflags;

use crate::gdi::guard::{check, BkColor, MemoryDc, Owned, Selected, TextColor, ViewportShift};
use crate::gdi::{DrawTextFlags, Gdi, Rop3, StockObject};
use crate::user::metrics::SystemColor;
use crate::user::rect;
use crate::{ColorRef, GdiObjectType, Rect, Size, W32Result, W32Status, HBITMAP, HBRUSH, HDC, HICON};

bitflags! {
    /// DSS_* state flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DrawStateFlags: u32 {
        /// Dithered (not applied)
        const UNION = 0x0010;
        /// Embossed: highlight copy at +1,+1 under a shadow copy
        const DISABLED = 0x0020;
        /// Shadow copy at +1,+1 under a brush copy
        const DEFAULT = 0x0040;
        /// Solid brush copy through the mask
        const MONO = 0x0080;
        const HIDEPREFIX = 0x0200;
        const PREFIXONLY = 0x0400;
        /// Right-align text
        const RIGHT = 0x8000;
    }
}

impl DrawStateFlags {
    /// DSS_NORMAL
    pub const NORMAL: Self = Self::empty();

    /// Bits that send the image through the mask
    const GHOST_MASK: u32 = 0x79F0;

    fn is_normal(self) -> bool {
        self.bits() & Self::GHOST_MASK == 0
    }
}

/// What `draw_state` draws (DST_*)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateImage<'a> {
    /// Text, prefix characters shown literally
    Text(&'a str),
    /// Text with `&` mnemonic prefixes
    PrefixText(&'a str),
    Icon(HICON),
    Bitmap(HBITMAP),
    /// Drawn by the output callback; `wparam < 0` marks a length the
    /// callback determines itself
    Complex { lparam: usize, wparam: isize },
}

impl StateImage<'_> {
    fn is_text(&self) -> bool {
        matches!(self, StateImage::Text(_) | StateImage::PrefixText(_))
    }

    fn is_indeterminate(&self) -> bool {
        matches!(self, StateImage::Complex { wparam, .. } if *wparam < 0)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Natural size of an image
fn image_size<G: Gdi + ?Sized>(gdi: &G, hdc: HDC, image: &StateImage<'_>) -> W32Result<Size> {
    match *image {
        StateImage::Text(text) | StateImage::PrefixText(text) => {
            gdi.get_text_extent(hdc, text).ok_or(W32Status::InvalidHandle)
        }
        StateImage::Icon(hicon) => gdi.get_icon_size(hicon).ok_or(W32Status::InvalidHandle),
        StateImage::Bitmap(hbm) => gdi.get_bitmap_size(hbm).ok_or(W32Status::InvalidHandle),
        // Complex images have no natural size
        StateImage::Complex { .. } => Err(W32Status::InvalidParameter),
    }
}

fn text_flags(image: &StateImage<'_>, flags: DrawStateFlags) -> DrawTextFlags {
    let mut dt = DrawTextFlags::NOCLIP;
    if flags.contains(DrawStateFlags::RIGHT) {
        dt |= DrawTextFlags::RIGHT;
    }
    match image {
        StateImage::Text(_) => dt |= DrawTextFlags::NOPREFIX,
        StateImage::PrefixText(_) => {
            if flags.contains(DrawStateFlags::HIDEPREFIX) {
                dt |= DrawTextFlags::HIDEPREFIX;
            }
            if flags.contains(DrawStateFlags::PREFIXONLY) {
                dt |= DrawTextFlags::PREFIXONLY;
            }
        }
        _ => {}
    }
    dt
}

/// Draw the image itself into `rc` on `hdc`
fn jam<G: Gdi + ?Sized>(
    gdi: &G,
    hdc: HDC,
    image: &StateImage<'_>,
    callback: Option<&mut dyn FnMut(&G, HDC, usize, isize, i32, i32) -> bool>,
    rc: &Rect,
    dt_flags: DrawTextFlags,
) -> W32Result<()> {
    let (cx, cy) = (rc.width(), rc.height());

    match *image {
        StateImage::Text(text) | StateImage::PrefixText(text) => {
            check(gdi.draw_text(hdc, text, rc, dt_flags) != 0)
        }
        StateImage::Icon(hicon) => check(gdi.draw_icon_ex(hdc, rc.left, rc.top, hicon, cx, cy)),
        StateImage::Bitmap(hbm) => {
            let memdc = MemoryDc::new(gdi, hdc)?;
            let _bitmap = Selected::new(gdi, memdc.hdc(), hbm)?;
            check(gdi.bit_blt(hdc, rc.left, rc.top, cx, cy, memdc.hdc(), 0, 0, Rop3::SrcCopy))
        }
        StateImage::Complex { lparam, wparam } => {
            let callback = callback.ok_or(W32Status::InvalidParameter)?;
            // The callback draws relative to the origin
            let _origin = ViewportShift::new(gdi, hdc, rc.left, rc.top);
            check(callback(gdi, hdc, lparam, wparam, cx, cy))
        }
    }
}

/// Render through a monochrome mask with shadow brushes
#[allow(clippy::too_many_arguments)]
fn draw_ghosted<G: Gdi + ?Sized>(
    gdi: &G,
    hdc: HDC,
    brush: HBRUSH,
    callback: Option<&mut dyn FnMut(&G, HDC, usize, isize, i32, i32) -> bool>,
    image: &StateImage<'_>,
    dest: &Rect,
    dt_flags: DrawTextFlags,
    flags: DrawStateFlags,
) -> W32Result<bool> {
    let (x, y, cx, cy) = (dest.left, dest.top, dest.width(), dest.height());

    // Black/white on the target so mask pixels map straight to 0 and 1
    let _fg = TextColor::set(gdi, hdc, ColorRef::BLACK);
    let _bg = BkColor::set(gdi, hdc, ColorRef::WHITE);

    let mask = Owned::new(gdi, gdi.create_bitmap(cx, cy, 1, 1, None))?;
    let memdc = MemoryDc::new(gdi, hdc)?;
    let _mask = Selected::new(gdi, memdc.hdc(), mask.handle())?;

    let local = Rect::new(0, 0, cx, cy);
    rect::fill(gdi, memdc.hdc(), &local, gdi.get_stock_object(StockObject::WhiteBrush))?;
    gdi.set_bk_color(memdc.hdc(), ColorRef::WHITE);
    gdi.set_text_color(memdc.hdc(), ColorRef::BLACK);

    // Complex images may draw text too, so the target's font goes along
    let font = Selected::new(gdi, memdc.hdc(), gdi.get_current_object(hdc, GdiObjectType::Font));
    if font.is_err() && image.is_text() {
        return Err(W32Status::InvalidHandle);
    }
    let drawn = jam(gdi, memdc.hdc(), image, callback, &local, dt_flags);
    drop(font);

    match drawn {
        Ok(()) => {}
        Err(W32Status::DrawFailed) if image.is_indeterminate() => {
            // Output failed with no known length: show the mask as-is
            gdi.bit_blt(hdc, x, y, cx, cy, memdc.hdc(), 0, 0, Rop3::SrcCopy);
            return Ok(false);
        }
        Err(status) => return Err(status),
    }

    if flags.contains(DrawStateFlags::UNION) {
        log::debug!("draw_state: UNION dithering not applied");
    }

    if flags.intersects(DrawStateFlags::DISABLED | DrawStateFlags::DEFAULT) {
        let shadow = if flags.contains(DrawStateFlags::DISABLED) {
            SystemColor::BtnHighlight
        } else {
            SystemColor::BtnShadow
        };
        let _shadow = Selected::new(gdi, hdc, gdi.get_sys_color_brush(shadow))?;
        check(gdi.bit_blt(hdc, x + 1, y + 1, cx, cy, memdc.hdc(), 0, 0, Rop3::PatThroughMask))?;
    }

    let face = if flags.contains(DrawStateFlags::DISABLED) {
        gdi.get_sys_color_brush(SystemColor::BtnShadow)
    } else if brush.is_null() {
        gdi.get_stock_object(StockObject::BlackBrush)
    } else {
        brush
    };
    let _face = Selected::new(gdi, hdc, face)?;
    check(gdi.bit_blt(hdc, x, y, cx, cy, memdc.hdc(), 0, 0, Rop3::PatThroughMask))?;

    Ok(true)
}

// ============================================================================
// DrawState
// ============================================================================

/// Draw an image in a visual state
///
/// The output callback of [`StateImage::Complex`] is called as
/// `(gdi, hdc, lparam, wparam, cx, cy)` with the viewport origin moved to
/// the image's top-left corner.
///
/// A zero `cx` or `cy` is replaced by the image's natural size; complex
/// images have none and must be given both. `brush` colors MONO and
/// DEFAULT images (black when NULL). Target DC colors and selections are
/// restored on return.
#[allow(clippy::too_many_arguments)]
pub fn draw_state<G: Gdi + ?Sized>(
    gdi: &G,
    hdc: HDC,
    brush: HBRUSH,
    callback: Option<&mut dyn FnMut(&G, HDC, usize, isize, i32, i32) -> bool>,
    image: StateImage<'_>,
    x: i32,
    y: i32,
    cx: i32,
    cy: i32,
    flags: DrawStateFlags,
) -> bool {
    log::trace!("draw_state({:?}, {},{} {}x{}, {:?})", image, x, y, cx, cy, flags);

    let mut dest = Rect::new(x, y, x.saturating_add(cx), y.saturating_add(cy));
    match render(gdi, hdc, brush, callback, &image, &mut dest, flags) {
        Ok(done) => done,
        Err(status) => {
            log::debug!("draw_state failed: {}", status);
            false
        }
    }
}

/// Size the destination, then draw directly or through the mask
fn render<G: Gdi + ?Sized>(
    gdi: &G,
    hdc: HDC,
    brush: HBRUSH,
    callback: Option<&mut dyn FnMut(&G, HDC, usize, isize, i32, i32) -> bool>,
    image: &StateImage<'_>,
    dest: &mut Rect,
    flags: DrawStateFlags,
) -> W32Result<bool> {
    if dest.width() == 0 || dest.height() == 0 {
        let size = image_size(gdi, hdc, image)?;
        if dest.width() == 0 {
            dest.right = dest.left.saturating_add(size.cx);
        }
        if dest.height() == 0 {
            dest.bottom = dest.top.saturating_add(size.cy);
        }
    }

    let dt_flags = text_flags(image, flags);
    if flags.is_normal() {
        jam(gdi, hdc, image, callback, dest, dt_flags)?;
        Ok(true)
    } else {
        draw_ghosted(gdi, hdc, brush, callback, image, dest, dt_flags, flags)
    }
}

// ============================================================================
// GrayString
// ============================================================================

/// Draw text grayed through a brush
///
/// `count` is the number of characters of `text` to draw: 0 means all of
/// it, -1 means the output callback knows the length itself (only valid
/// with a callback). A zero `cx` or `cy` is measured from the text. When
/// the callback fails for a -1 count the mask is copied ungrayed and the
/// call reports failure.
#[allow(clippy::too_many_arguments)]
pub fn gray_string<G: Gdi + ?Sized>(
    gdi: &G,
    hdc: HDC,
    brush: HBRUSH,
    output: Option<&mut dyn FnMut(&G, HDC, &str, i32) -> bool>,
    text: &str,
    count: i32,
    x: i32,
    y: i32,
    cx: i32,
    cy: i32,
) -> bool {
    let brush = if brush.is_null() {
        gdi.get_current_object(hdc, GdiObjectType::Brush)
    } else {
        brush
    };

    if count == -1 && output.is_none() {
        log::debug!("gray_string: indeterminate length without an output callback");
        return false;
    }

    let text = match usize::try_from(count) {
        Ok(n) if n > 0 => text.char_indices().nth(n).map_or(text, |(end, _)| &text[..end]),
        _ => text,
    };
    let count = if count == 0 {
        i32::try_from(text.chars().count()).unwrap_or(i32::MAX)
    } else {
        count
    };

    let (mut cx, mut cy) = (cx, cy);
    if cx == 0 || cy == 0 {
        if count < 0 {
            return false;
        }
        let size = match gdi.get_text_extent(hdc, text) {
            Some(size) => size,
            None => return false,
        };
        if cx == 0 {
            cx = size.cx;
        }
        if cy == 0 {
            cy = size.cy;
        }
    }

    match output {
        Some(output) => {
            let mut bridge =
                |g: &G, dc: HDC, _: usize, _: isize, _: i32, _: i32| output(g, dc, text, count);
            draw_state(
                gdi,
                hdc,
                brush,
                Some(&mut bridge),
                StateImage::Complex { lparam: 0, wparam: count as isize },
                x,
                y,
                cx,
                cy,
                DrawStateFlags::MONO,
            )
        }
        None => draw_state(gdi, hdc, brush, None, StateImage::Text(text), x, y, cx, cy, DrawStateFlags::MONO),
    }
}
