//! Frame Controls
//!
//! `DrawFrameControl`: push buttons, check boxes and radio buttons, caption
//! buttons, scroll arrows and size grips, and menu glyphs. Everything but
//! the push button bevel is drawn as glyphs of the Marlett symbol font,
//! layered in different colors to build the 3D look.
//!
//! # Glyph Map (Marlett)
//!
//! | Control            | Glyphs                                |
//! |--------------------|---------------------------------------|
//! | Check box          | `c d e f` frame, `g` center, `b` mark |
//! | Radio button       | `j k l m` frame, `n` center, `i` dot  |
//! | Caption            | `r` close, `0` min, `1` max, `2` restore, `s` help |
//! | Scroll             | `5` up, `6` down/combo, `3` left, `4` right |
//! | Size grip          | `o`/`p` (left), `x`/`y` (right)       |
//! | Menu               | `8` arrow, `w` right arrow, `a` check, `h` bullet |
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntuser/rtl/drawfrm.c`
//! - `windows/published/winuser.w` (DFC_*, DFCS_*)

use bitflags::bitflags;

use crate::gdi::font::MARLETT;
use crate::gdi::guard::{check, BkColor, BkModeGuard, Owned, Selected, TextColor};
use crate::gdi::{BkMode, Gdi, LogFont, MapMode, Rop3};
use crate::user::edge::{draw_rect_edge, BorderType, EdgeFlags};
use crate::user::metrics::SystemColor;
use crate::user::{rect, PATTERN_AA55};
use crate::{ColorRef, Rect, W32Result, W32Status, HDC};

// ============================================================================
// Types
// ============================================================================

/// DFC_* control kinds
pub const DFC_CAPTION: u32 = 1;
pub const DFC_MENU: u32 = 2;
pub const DFC_SCROLL: u32 = 3;
pub const DFC_BUTTON: u32 = 4;
pub const DFC_POPUPMENU: u32 = 5;

/// Low byte of the state word: the part selector
const PART_MASK: u32 = 0xFF;

bitflags! {
    /// DFCS_* state flags (the high bits of the state word)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ControlState: u32 {
        const INACTIVE = 0x0100;
        const PUSHED = 0x0200;
        const CHECKED = 0x0400;
        const TRANSPARENT = 0x0800;
        const HOT = 0x1000;
        /// Shrink the caller's rectangle past the bevel (push buttons)
        const ADJUSTRECT = 0x2000;
        const FLAT = 0x4000;
        const MONO = 0x8000;
    }
}

/// Button parts
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonPart {
    Check = 0x00,
    RadioImage = 0x01,
    RadioMask = 0x02,
    Radio = 0x04,
    ThreeState = 0x08,
    Push = 0x10,
}

/// Caption button parts
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionPart {
    Close = 0x00,
    Min = 0x01,
    Max = 0x02,
    Restore = 0x03,
    Help = 0x04,
}

/// Scroll bar parts
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPart {
    Up = 0x00,
    Down = 0x01,
    Left = 0x02,
    Right = 0x03,
    ComboBox = 0x05,
    SizeGrip = 0x08,
    SizeGripRight = 0x10,
}

/// Menu glyph parts
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuPart {
    Arrow = 0x00,
    Check = 0x01,
    Bullet = 0x02,
    ArrowRight = 0x04,
}

/// A frame control and the part of it to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Button(ButtonPart),
    Caption(CaptionPart),
    Scroll(ScrollPart),
    Menu(MenuPart),
}

impl FrameControl {
    /// Decode a `DFC_*` kind and the part byte of a `DFCS_*` state word
    ///
    /// Popup menus and unknown parts have no renderer and decode to `None`.
    pub fn from_raw(kind: u32, state: u32) -> Option<Self> {
        let part = state & PART_MASK;
        let control = match kind {
            DFC_BUTTON => FrameControl::Button(match part {
                0x00 => ButtonPart::Check,
                0x01 => ButtonPart::RadioImage,
                0x02 => ButtonPart::RadioMask,
                0x04 => ButtonPart::Radio,
                0x08 => ButtonPart::ThreeState,
                0x10 => ButtonPart::Push,
                _ => return None,
            }),
            DFC_CAPTION => FrameControl::Caption(match part {
                0x00 => CaptionPart::Close,
                0x01 => CaptionPart::Min,
                0x02 => CaptionPart::Max,
                0x03 => CaptionPart::Restore,
                0x04 => CaptionPart::Help,
                _ => return None,
            }),
            DFC_SCROLL => FrameControl::Scroll(match part {
                0x00 => ScrollPart::Up,
                0x01 => ScrollPart::Down,
                0x02 => ScrollPart::Left,
                0x03 => ScrollPart::Right,
                0x05 => ScrollPart::ComboBox,
                0x08 => ScrollPart::SizeGrip,
                0x10 => ScrollPart::SizeGripRight,
                _ => return None,
            }),
            DFC_MENU => FrameControl::Menu(match part {
                0x00 => MenuPart::Arrow,
                0x01 => MenuPart::Check,
                0x02 => MenuPart::Bullet,
                0x04 => MenuPart::ArrowRight,
                _ => return None,
            }),
            _ => return None,
        };
        Some(control)
    }
}

impl CaptionPart {
    fn glyph(self) -> char {
        match self {
            CaptionPart::Close => 'r',
            CaptionPart::Min => '0',
            CaptionPart::Max => '1',
            CaptionPart::Restore => '2',
            CaptionPart::Help => 's',
        }
    }
}

impl MenuPart {
    fn glyph(self) -> char {
        match self {
            MenuPart::Arrow => '8',
            MenuPart::ArrowRight => 'w',
            MenuPart::Bullet => 'h',
            MenuPart::Check => 'a',
        }
    }
}

/// Glyph set of a check box or radio button
struct CheckGlyphs {
    out_right: char,
    out_left: char,
    in_right: char,
    in_left: char,
    center: char,
    mark: char,
}

const CHECK_GLYPHS: CheckGlyphs = CheckGlyphs {
    out_right: 'c',
    out_left: 'd',
    in_right: 'e',
    in_left: 'f',
    center: 'g',
    mark: 'b',
};

const RADIO_GLYPHS: CheckGlyphs = CheckGlyphs {
    out_right: 'j',
    out_left: 'k',
    in_right: 'l',
    in_left: 'm',
    center: 'n',
    mark: 'i',
};

// ============================================================================
// Helpers
// ============================================================================

/// Largest square centered in `src` along its longer axis, and its side
pub fn square_rect(src: &Rect) -> (Rect, i32) {
    let width = src.width();
    let height = src.height();
    let side = width.min(height);
    let mut dst = *src;

    if width < height {
        dst.top += (height - width) / 2;
        dst.bottom = dst.top + side;
    } else if width > height {
        dst.left += (width - height) / 2;
        dst.right = dst.left + side;
    }

    (dst, side)
}

fn edge_for(state: ControlState) -> BorderType {
    if state.contains(ControlState::PUSHED) {
        BorderType::SUNKEN
    } else {
        BorderType::RAISED
    }
}

/// The state's FLAT bit, carried over to edge flags
fn flat_bit(state: ControlState) -> EdgeFlags {
    if state.contains(ControlState::FLAT) {
        EdgeFlags::FLAT
    } else {
        EdgeFlags::empty()
    }
}

fn marlett<G: Gdi + ?Sized>(gdi: &G, height: i32) -> W32Result<Owned<'_, G>> {
    Owned::new(gdi, gdi.create_font_indirect(&LogFont::with_face(MARLETT, height)))
}

fn glyph<G: Gdi + ?Sized>(gdi: &G, hdc: HDC, x: i32, y: i32, ch: char) {
    let mut buf = [0u8; 4];
    gdi.text_out(hdc, x, y, ch.encode_utf8(&mut buf));
}

fn text_color<G: Gdi + ?Sized>(gdi: &G, hdc: HDC, color: SystemColor) {
    gdi.set_text_color(hdc, gdi.get_sys_color(color));
}

/// Checked push button face: a white dither over the face color
///
/// Falls back to a solid highlight fill when the highlight is not white.
fn draw_checked_rect<G: Gdi + ?Sized>(gdi: &G, hdc: HDC, rc: &Rect) -> W32Result<()> {
    if gdi.get_sys_color(SystemColor::BtnHighlight) != ColorRef::WHITE {
        return rect::fill(gdi, hdc, rc, gdi.get_sys_color_brush(SystemColor::BtnHighlight));
    }

    let bitmap = Owned::new(gdi, gdi.create_bitmap(8, 8, 1, 1, Some(&PATTERN_AA55)))?;
    let brush = Owned::new(gdi, gdi.create_pattern_brush(bitmap.handle()))?;

    rect::fill(gdi, hdc, rc, gdi.get_sys_color_brush(SystemColor::BtnFace))?;
    let _bk = BkColor::set(gdi, hdc, ColorRef::WHITE);
    let _brush = Selected::new(gdi, hdc, brush.handle())?;
    check(gdi.pat_blt(hdc, rc.left, rc.top, rc.width(), rc.height(), Rop3::DstOrPat))
}

/// Caption and scroll arrow glyph, centered, with the inactive emboss
fn draw_centered_glyph<G: Gdi + ?Sized>(
    gdi: &G,
    hdc: HDC,
    rc: &Rect,
    symbol: char,
    state: ControlState,
) -> W32Result<bool> {
    let (mut sq, _) = square_rect(rc);
    sq.inflate(-1, -1);
    if state.contains(ControlState::PUSHED) {
        sq.offset(1, 1);
    }

    let font = marlett(gdi, sq.height())?;
    let _font = Selected::new(gdi, hdc, font.handle())?;
    let _color = TextColor::save(gdi, hdc);
    let _mode = BkModeGuard::set(gdi, hdc, BkMode::Transparent);

    let inactive = state.contains(ControlState::INACTIVE);
    if inactive {
        text_color(gdi, hdc, SystemColor::BtnHighlight);
        glyph(gdi, hdc, sq.left + 1, sq.top + 1, symbol);
    }
    text_color(gdi, hdc, if inactive { SystemColor::BtnShadow } else { SystemColor::BtnText });
    glyph(gdi, hdc, sq.left, sq.top, symbol);

    Ok(true)
}

// ============================================================================
// Renderers
// ============================================================================

fn draw_push_button<G: Gdi + ?Sized>(gdi: &G, hdc: HDC, rc: &mut Rect, state: ControlState) -> W32Result<bool> {
    let edge = if state.intersects(ControlState::PUSHED | ControlState::CHECKED | ControlState::FLAT) {
        BorderType::SUNKEN
    } else {
        BorderType::RAISED
    };
    let mono = state.contains(ControlState::MONO);
    let mut inner = *rc;

    if state.contains(ControlState::CHECKED) {
        let flags = if mono {
            EdgeFlags::MONO | EdgeFlags::RECT | EdgeFlags::ADJUST
        } else {
            flat_bit(state) | EdgeFlags::RECT | EdgeFlags::SOFT | EdgeFlags::ADJUST
        };
        draw_rect_edge(gdi, hdc, &mut inner, edge, flags)?;
        draw_checked_rect(gdi, hdc, &inner)?;
    } else if mono {
        draw_rect_edge(gdi, hdc, &mut inner, edge, EdgeFlags::MONO | EdgeFlags::RECT | EdgeFlags::ADJUST)?;
        rect::fill(gdi, hdc, &inner, gdi.get_sys_color_brush(SystemColor::BtnFace))?;
    } else {
        let flags = flat_bit(state) | EdgeFlags::MIDDLE | EdgeFlags::RECT | EdgeFlags::SOFT;
        draw_rect_edge(gdi, hdc, &mut inner, edge, flags)?;
    }

    if state.contains(ControlState::ADJUSTRECT) {
        rc.inflate(-2, -2);
    }
    Ok(true)
}

fn draw_check_radio<G: Gdi + ?Sized>(
    gdi: &G,
    hdc: HDC,
    rc: &Rect,
    state: ControlState,
    part: ButtonPart,
) -> W32Result<bool> {
    let radio = !matches!(part, ButtonPart::Check | ButtonPart::ThreeState);
    let glyphs = if radio { &RADIO_GLYPHS } else { &CHECK_GLYPHS };
    let (x, y) = (rc.left, rc.top);

    // Negative height: character height matches the box
    let font = marlett(gdi, rc.top - rc.bottom)?;
    let _font = Selected::new(gdi, hdc, font.handle())?;

    if part == ButtonPart::RadioMask {
        gdi.set_bk_mode(hdc, BkMode::Opaque);
        text_color(gdi, hdc, SystemColor::WindowFrame);
        glyph(gdi, hdc, x, y, glyphs.center);
        gdi.set_bk_mode(hdc, BkMode::Transparent);
        glyph(gdi, hdc, x, y, glyphs.out_right);
        glyph(gdi, hdc, x, y, glyphs.out_left);
    } else {
        gdi.set_bk_mode(hdc, BkMode::Transparent);

        let center = if state.intersects(ControlState::INACTIVE | ControlState::PUSHED) {
            SystemColor::BtnFace
        } else {
            SystemColor::Window
        };
        text_color(gdi, hdc, center);
        glyph(gdi, hdc, x, y, glyphs.center);

        if state.intersects(ControlState::FLAT | ControlState::MONO) {
            text_color(gdi, hdc, SystemColor::WindowFrame);
            for ch in [glyphs.out_right, glyphs.out_left, glyphs.in_right, glyphs.in_left] {
                glyph(gdi, hdc, x, y, ch);
            }
        } else {
            text_color(gdi, hdc, SystemColor::BtnShadow);
            glyph(gdi, hdc, x, y, glyphs.out_right);
            text_color(gdi, hdc, SystemColor::BtnHighlight);
            glyph(gdi, hdc, x, y, glyphs.out_left);
            text_color(gdi, hdc, SystemColor::DkShadow3D);
            glyph(gdi, hdc, x, y, glyphs.in_right);
            text_color(gdi, hdc, SystemColor::Light3D);
            glyph(gdi, hdc, x, y, glyphs.in_left);
        }
    }

    if state.contains(ControlState::CHECKED) {
        text_color(gdi, hdc, SystemColor::WindowText);
        glyph(gdi, hdc, x, y, glyphs.mark);
    }

    // Leaves window text selected and the background mode transparent
    text_color(gdi, hdc, SystemColor::WindowText);
    Ok(true)
}

fn draw_button<G: Gdi + ?Sized>(
    gdi: &G,
    hdc: HDC,
    rc: &mut Rect,
    part: ButtonPart,
    state: ControlState,
) -> W32Result<bool> {
    match part {
        ButtonPart::Push => draw_push_button(gdi, hdc, rc, state),
        _ => draw_check_radio(gdi, hdc, rc, state, part),
    }
}

fn draw_caption<G: Gdi + ?Sized>(
    gdi: &G,
    hdc: HDC,
    rc: &Rect,
    part: CaptionPart,
    state: ControlState,
) -> W32Result<bool> {
    let mut edge_rc = *rc;
    draw_rect_edge(
        gdi,
        hdc,
        &mut edge_rc,
        edge_for(state),
        EdgeFlags::RECT | EdgeFlags::MIDDLE | EdgeFlags::SOFT,
    )?;
    draw_centered_glyph(gdi, hdc, rc, part.glyph(), state)
}

fn draw_size_grip<G: Gdi + ?Sized>(
    gdi: &G,
    hdc: HDC,
    rc: &Rect,
    part: ScrollPart,
    state: ControlState,
) -> W32Result<bool> {
    let (sq, _) = square_rect(rc);
    let (light, dark) = if part == ScrollPart::SizeGrip { ('o', 'p') } else { ('x', 'y') };

    let font = marlett(gdi, sq.height())?;
    let _font = Selected::new(gdi, hdc, font.handle())?;
    let _color = TextColor::save(gdi, hdc);
    let _mode = BkModeGuard::set(gdi, hdc, BkMode::Transparent);

    if state.intersects(ControlState::MONO | ControlState::FLAT) {
        text_color(gdi, hdc, SystemColor::WindowFrame);
    } else {
        text_color(gdi, hdc, SystemColor::BtnHighlight);
        glyph(gdi, hdc, sq.left, sq.top, light);
        text_color(gdi, hdc, SystemColor::BtnShadow);
    }
    glyph(gdi, hdc, sq.left, sq.top, dark);

    Ok(true)
}

fn draw_scroll<G: Gdi + ?Sized>(
    gdi: &G,
    hdc: HDC,
    rc: &Rect,
    part: ScrollPart,
    state: ControlState,
) -> W32Result<bool> {
    let symbol = match part {
        ScrollPart::Up => '5',
        ScrollPart::Down | ScrollPart::ComboBox => '6',
        ScrollPart::Left => '3',
        ScrollPart::Right => '4',
        ScrollPart::SizeGrip | ScrollPart::SizeGripRight => {
            return draw_size_grip(gdi, hdc, rc, part, state);
        }
    };

    let mut edge_rc = *rc;
    draw_rect_edge(
        gdi,
        hdc,
        &mut edge_rc,
        edge_for(state),
        flat_bit(state) | EdgeFlags::MIDDLE | EdgeFlags::RECT,
    )?;
    draw_centered_glyph(gdi, hdc, rc, symbol, state)
}

#[cfg_attr(not(feature = "menu-glyph-shading"), allow(unused_variables))]
fn draw_menu<G: Gdi + ?Sized>(
    gdi: &G,
    hdc: HDC,
    rc: &Rect,
    part: MenuPart,
    state: ControlState,
) -> W32Result<bool> {
    let symbol = part.glyph();
    let font = marlett(gdi, rc.height())?;
    let _font = Selected::new(gdi, hdc, font.handle())?;

    #[cfg(feature = "menu-glyph-shading")]
    let _color = {
        let saved = TextColor::save(gdi, hdc);
        let inactive = state.contains(ControlState::INACTIVE);
        if inactive {
            text_color(gdi, hdc, SystemColor::BtnHighlight);
            glyph(gdi, hdc, rc.left + 1, rc.top + 1, symbol);
        }
        text_color(gdi, hdc, if inactive { SystemColor::BtnShadow } else { SystemColor::BtnText });
        saved
    };

    glyph(gdi, hdc, rc.left, rc.top, symbol);
    Ok(true)
}

// ============================================================================
// DrawFrameControl
// ============================================================================

/// Draw a frame control
///
/// Fails on a DC whose mapping mode is not `MapMode::Text`. Only push
/// buttons modify `rc`, and only with `ControlState::ADJUSTRECT`.
pub fn draw_frame_control<G: Gdi + ?Sized>(
    gdi: &G,
    hdc: HDC,
    rc: &mut Rect,
    control: FrameControl,
    state: ControlState,
) -> bool {
    log::trace!("draw_frame_control({:?}, {:?}, {:?})", rc, control, state);

    if gdi.get_map_mode(hdc) != MapMode::Text {
        log::debug!("draw_frame_control: {}", W32Status::InvalidMode);
        return false;
    }

    let result = match control {
        FrameControl::Button(part) => draw_button(gdi, hdc, rc, part, state),
        FrameControl::Caption(part) => draw_caption(gdi, hdc, rc, part, state),
        FrameControl::Scroll(part) => draw_scroll(gdi, hdc, rc, part, state),
        FrameControl::Menu(part) => draw_menu(gdi, hdc, rc, part, state),
    };

    result.unwrap_or_else(|status| {
        log::debug!("draw_frame_control failed: {}", status);
        false
    })
}

/// `draw_frame_control` taking a raw `DFC_*` kind and `DFCS_*` state word
pub fn draw_frame_control_raw<G: Gdi + ?Sized>(gdi: &G, hdc: HDC, rc: &mut Rect, kind: u32, state: u32) -> bool {
    match FrameControl::from_raw(kind, state) {
        Some(control) => draw_frame_control(gdi, hdc, rc, control, ControlState::from_bits_truncate(state)),
        None => {
            log::warn!("draw_frame_control: unsupported kind {} state {:#x}", kind, state);
            false
        }
    }
}
