//! 3D Edges
//!
//! `DrawEdge`: one or two bevel lines along the sides of a rectangle, or
//! along its diagonal. The line colors come from fixed lookup tables
//! indexed by the four border bits, one table family per edge style.
//!
//! # Border Bits
//!
//! Bit 0/1 select a raised/sunken outer line, bit 2/3 a raised/sunken
//! inner line. Setting both bits of one line asks for something that is
//! neither raised nor sunken; such an edge still draws (the tables give
//! it colors) but is reported as not valid, and a valid edge is required
//! before the interior is filled.
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntuser/client/draw.c` (DrawEdge)
//! - `windows/published/winuser.w` (BDR_*, EDGE_*, BF_*)

use bitflags::bitflags;

use crate::gdi::guard::{SavedPosition, Selected};
use crate::gdi::{Gdi, StockObject};
use crate::user::metrics::SystemColor;
use crate::user::rect;
use crate::{Point, Rect, W32Result, HDC};

// ============================================================================
// Flags
// ============================================================================

bitflags! {
    /// Border type (BDR_* / EDGE_*)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BorderType: u32 {
        const RAISEDOUTER = 0x0001;
        const SUNKENOUTER = 0x0002;
        const RAISEDINNER = 0x0004;
        const SUNKENINNER = 0x0008;

        const OUTER = Self::RAISEDOUTER.bits() | Self::SUNKENOUTER.bits();
        const INNER = Self::RAISEDINNER.bits() | Self::SUNKENINNER.bits();

        /// EDGE_RAISED
        const RAISED = Self::RAISEDOUTER.bits() | Self::RAISEDINNER.bits();
        /// EDGE_SUNKEN
        const SUNKEN = Self::SUNKENOUTER.bits() | Self::SUNKENINNER.bits();
        /// EDGE_ETCHED
        const ETCHED = Self::SUNKENOUTER.bits() | Self::RAISEDINNER.bits();
        /// EDGE_BUMP
        const BUMP = Self::RAISEDOUTER.bits() | Self::SUNKENINNER.bits();
    }
}

bitflags! {
    /// Edge flags (BF_*)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EdgeFlags: u32 {
        const LEFT = 0x0001;
        const TOP = 0x0002;
        const RIGHT = 0x0004;
        const BOTTOM = 0x0008;

        const TOPLEFT = Self::TOP.bits() | Self::LEFT.bits();
        const TOPRIGHT = Self::TOP.bits() | Self::RIGHT.bits();
        const BOTTOMLEFT = Self::BOTTOM.bits() | Self::LEFT.bits();
        const BOTTOMRIGHT = Self::BOTTOM.bits() | Self::RIGHT.bits();
        const RECT = 0x000F;

        const DIAGONAL = 0x0010;

        /// Fill the interior
        const MIDDLE = 0x0800;
        /// Softer button colors
        const SOFT = 0x1000;
        /// Shrink the rectangle by the drawn border width
        const ADJUST = 0x2000;
        /// Flat look
        const FLAT = 0x4000;
        /// Monochrome look
        const MONO = 0x8000;
    }
}

// ============================================================================
// Color Tables
// ============================================================================

type EdgeTable = [Option<SystemColor>; 16];

const NO: Option<SystemColor> = None;
const FACE: Option<SystemColor> = Some(SystemColor::BtnFace);
const SHADOW: Option<SystemColor> = Some(SystemColor::BtnShadow);
const HILIGHT: Option<SystemColor> = Some(SystemColor::BtnHighlight);
const DKSHADOW: Option<SystemColor> = Some(SystemColor::DkShadow3D);
const LIGHT: Option<SystemColor> = Some(SystemColor::Light3D);
const WINDOW: Option<SystemColor> = Some(SystemColor::Window);
const FRAME: Option<SystemColor> = Some(SystemColor::WindowFrame);

#[rustfmt::skip]
const LT_INNER_NORMAL: EdgeTable = [
    NO, NO,       NO,       NO,
    NO, HILIGHT,  HILIGHT,  NO,
    NO, DKSHADOW, DKSHADOW, NO,
    NO, NO,       NO,       NO,
];

#[rustfmt::skip]
const LT_OUTER_NORMAL: EdgeTable = [
    NO,       LIGHT, SHADOW, NO,
    HILIGHT,  LIGHT, SHADOW, NO,
    DKSHADOW, LIGHT, SHADOW, NO,
    NO,       LIGHT, SHADOW, NO,
];

#[rustfmt::skip]
const RB_INNER_NORMAL: EdgeTable = [
    NO, NO,     NO,     NO,
    NO, SHADOW, SHADOW, NO,
    NO, LIGHT,  LIGHT,  NO,
    NO, NO,     NO,     NO,
];

#[rustfmt::skip]
const RB_OUTER_NORMAL: EdgeTable = [
    NO,     DKSHADOW, HILIGHT, NO,
    SHADOW, DKSHADOW, HILIGHT, NO,
    LIGHT,  DKSHADOW, HILIGHT, NO,
    NO,     DKSHADOW, HILIGHT, NO,
];

#[rustfmt::skip]
const LT_INNER_SOFT: EdgeTable = [
    NO, NO,     NO,     NO,
    NO, LIGHT,  LIGHT,  NO,
    NO, SHADOW, SHADOW, NO,
    NO, NO,     NO,     NO,
];

#[rustfmt::skip]
const LT_OUTER_SOFT: EdgeTable = [
    NO,     HILIGHT, DKSHADOW, NO,
    LIGHT,  HILIGHT, DKSHADOW, NO,
    SHADOW, HILIGHT, DKSHADOW, NO,
    NO,     HILIGHT, DKSHADOW, NO,
];

// The soft right/bottom lines match the normal ones
const RB_INNER_SOFT: EdgeTable = RB_INNER_NORMAL;
const RB_OUTER_SOFT: EdgeTable = RB_OUTER_NORMAL;

#[rustfmt::skip]
const OUTER_MONO: EdgeTable = [
    NO,     FRAME, FRAME, FRAME,
    WINDOW, FRAME, FRAME, FRAME,
    WINDOW, FRAME, FRAME, FRAME,
    WINDOW, FRAME, FRAME, FRAME,
];

#[rustfmt::skip]
const INNER_MONO: EdgeTable = [
    NO, NO,     NO,     NO,
    NO, WINDOW, WINDOW, WINDOW,
    NO, WINDOW, WINDOW, WINDOW,
    NO, WINDOW, WINDOW, WINDOW,
];

#[rustfmt::skip]
const OUTER_FLAT: EdgeTable = [
    NO,   SHADOW, SHADOW, SHADOW,
    FACE, SHADOW, SHADOW, SHADOW,
    FACE, SHADOW, SHADOW, SHADOW,
    FACE, SHADOW, SHADOW, SHADOW,
];

#[rustfmt::skip]
const INNER_FLAT: EdgeTable = [
    NO, NO,   NO,   NO,
    NO, FACE, FACE, FACE,
    NO, FACE, FACE, FACE,
    NO, FACE, FACE, FACE,
];

/// Table family an edge draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeStyle {
    Normal,
    Soft,
    Flat,
    Mono,
}

impl EdgeStyle {
    /// MONO wins over FLAT, FLAT over SOFT
    pub fn from_flags(flags: EdgeFlags) -> Self {
        if flags.contains(EdgeFlags::MONO) {
            EdgeStyle::Mono
        } else if flags.contains(EdgeFlags::FLAT) {
            EdgeStyle::Flat
        } else if flags.contains(EdgeFlags::SOFT) {
            EdgeStyle::Soft
        } else {
            EdgeStyle::Normal
        }
    }
}

/// Line colors of one edge; `None` means that line is not drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeColors {
    pub lt_inner: Option<SystemColor>,
    pub lt_outer: Option<SystemColor>,
    pub rb_inner: Option<SystemColor>,
    pub rb_outer: Option<SystemColor>,
}

/// Table lookup for a border type in a style
///
/// Flat and mono edges use one color per line for all four sides. A flat
/// edge's inner line, when present, is always the button face.
pub fn edge_colors(border: BorderType, style: EdgeStyle) -> EdgeColors {
    let i = border_index(border);
    match style {
        EdgeStyle::Normal => EdgeColors {
            lt_inner: LT_INNER_NORMAL[i],
            lt_outer: LT_OUTER_NORMAL[i],
            rb_inner: RB_INNER_NORMAL[i],
            rb_outer: RB_OUTER_NORMAL[i],
        },
        EdgeStyle::Soft => EdgeColors {
            lt_inner: LT_INNER_SOFT[i],
            lt_outer: LT_OUTER_SOFT[i],
            rb_inner: RB_INNER_SOFT[i],
            rb_outer: RB_OUTER_SOFT[i],
        },
        EdgeStyle::Flat => EdgeColors {
            lt_inner: INNER_FLAT[i],
            lt_outer: OUTER_FLAT[i],
            rb_inner: INNER_FLAT[i],
            rb_outer: OUTER_FLAT[i],
        },
        EdgeStyle::Mono => EdgeColors {
            lt_inner: INNER_MONO[i],
            lt_outer: OUTER_MONO[i],
            rb_inner: INNER_MONO[i],
            rb_outer: OUTER_MONO[i],
        },
    }
}

fn border_index(border: BorderType) -> usize {
    (border.bits() & (BorderType::INNER | BorderType::OUTER).bits()) as usize
}

/// Border width an edge occupies on each drawn side (0, 1 or 2)
pub fn adjust_width(border: BorderType) -> i32 {
    let i = border_index(border);
    INNER_MONO[i].is_some() as i32 + OUTER_MONO[i].is_some() as i32
}

/// False when a line is both raised and sunken, unless the edge is flat or mono
pub fn is_valid(border: BorderType, flags: EdgeFlags) -> bool {
    let ambiguous = border.contains(BorderType::INNER) || border.contains(BorderType::OUTER);
    !(ambiguous && !flags.intersects(EdgeFlags::FLAT | EdgeFlags::MONO))
}

fn fill_color(flags: EdgeFlags) -> SystemColor {
    if flags.contains(EdgeFlags::MONO) {
        SystemColor::Window
    } else {
        SystemColor::BtnFace
    }
}

/// Move the drawn sides of `rc` inward by `add`
fn shrink(rc: &mut Rect, flags: EdgeFlags, add: i32) {
    if flags.contains(EdgeFlags::LEFT) {
        rc.left += add;
    }
    if flags.contains(EdgeFlags::RIGHT) {
        rc.right -= add;
    }
    if flags.contains(EdgeFlags::TOP) {
        rc.top += add;
    }
    if flags.contains(EdgeFlags::BOTTOM) {
        rc.bottom -= add;
    }
}

// ============================================================================
// Line Helpers
// ============================================================================

/// Select the DC pen in a system color, or the null pen for a missing line
fn select_line_pen<G: Gdi + ?Sized>(gdi: &G, hdc: HDC, color: Option<SystemColor>) {
    match color {
        Some(color) => {
            gdi.select_object(hdc, gdi.get_stock_object(StockObject::DcPen));
            gdi.set_dc_pen_color(hdc, gdi.get_sys_color(color));
        }
        None => {
            gdi.select_object(hdc, gdi.get_stock_object(StockObject::NullPen));
        }
    }
}

fn segment<G: Gdi + ?Sized>(gdi: &G, hdc: HDC, from: (i32, i32), to: (i32, i32)) {
    gdi.move_to(hdc, from.0, from.1);
    gdi.line_to(hdc, to.0, to.1);
}

// ============================================================================
// Rectangular Edges
// ============================================================================

/// Draw the selected sides of a rectangle; returns the validity flag
pub(crate) fn draw_rect_edge<G: Gdi + ?Sized>(
    gdi: &G,
    hdc: HDC,
    rc: &mut Rect,
    border: BorderType,
    flags: EdgeFlags,
) -> W32Result<bool> {
    let valid = is_valid(border, flags);
    let colors = edge_colors(border, EdgeStyle::from_flags(flags));
    let r = *rc;

    let lb_plus = flags.contains(EdgeFlags::BOTTOMLEFT) as i32;
    let rt_plus = flags.contains(EdgeFlags::TOPRIGHT) as i32;
    let rb_plus = flags.contains(EdgeFlags::BOTTOMRIGHT) as i32;
    let lt_plus = flags.contains(EdgeFlags::TOPLEFT) as i32;

    let _pen = Selected::new(gdi, hdc, gdi.get_stock_object(StockObject::NullPen))?;

    // The lines still go on when the fill fails
    if flags.contains(EdgeFlags::MIDDLE) && valid {
        if let Err(status) = rect::fill(gdi, hdc, &r, gdi.get_sys_color_brush(fill_color(flags))) {
            log::warn!("draw_edge: middle fill failed: {}", status);
        }
    }

    let _pos = SavedPosition::move_to(gdi, hdc, 0, 0);

    // Outer line
    select_line_pen(gdi, hdc, colors.lt_outer);
    if flags.contains(EdgeFlags::TOP) {
        segment(gdi, hdc, (r.left, r.top), (r.right, r.top));
    }
    if flags.contains(EdgeFlags::LEFT) {
        segment(gdi, hdc, (r.left, r.top), (r.left, r.bottom));
    }
    select_line_pen(gdi, hdc, colors.rb_outer);
    if flags.contains(EdgeFlags::BOTTOM) {
        segment(gdi, hdc, (r.left, r.bottom - 1), (r.right, r.bottom - 1));
    }
    if flags.contains(EdgeFlags::RIGHT) {
        segment(gdi, hdc, (r.right - 1, r.top), (r.right - 1, r.bottom));
    }

    // Inner line, shortened where two drawn sides meet
    select_line_pen(gdi, hdc, colors.lt_inner);
    if flags.contains(EdgeFlags::TOP) {
        segment(gdi, hdc, (r.left + lt_plus, r.top + 1), (r.right - rt_plus, r.top + 1));
    }
    if flags.contains(EdgeFlags::LEFT) {
        segment(gdi, hdc, (r.left + 1, r.top + lt_plus), (r.left + 1, r.bottom - lb_plus));
    }
    select_line_pen(gdi, hdc, colors.rb_inner);
    if flags.contains(EdgeFlags::BOTTOM) {
        segment(gdi, hdc, (r.left + lb_plus, r.bottom - 2), (r.right - rb_plus, r.bottom - 2));
    }
    if flags.contains(EdgeFlags::RIGHT) {
        segment(gdi, hdc, (r.right - 2, r.top + rt_plus), (r.right - 2, r.bottom - rb_plus));
    }

    if flags.contains(EdgeFlags::ADJUST) {
        shrink(rc, flags, adjust_width(border));
    }

    Ok(valid)
}

// ============================================================================
// Diagonal Edges
// ============================================================================

/// Where the inner line and interior polygon go, by the side bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiagonalRecipe {
    /// No side, LEFT, BOTTOM or BOTTOM|LEFT
    EndBottomLeft,
    /// BOTTOM|RIGHT
    EndBottomRight,
    /// TOP|RIGHT, with or without LEFT or BOTTOM
    EndTopRight,
    /// TOP|LEFT
    EndTopLeft,
    /// TOP, BOTTOM|TOP or BOTTOM|TOP|LEFT
    Top,
    /// RIGHT, RIGHT|LEFT or RIGHT|LEFT|BOTTOM
    Right,
}

impl DiagonalRecipe {
    fn from_sides(sides: u32) -> Self {
        match sides & EdgeFlags::RECT.bits() {
            0x0 | 0x1 | 0x8 | 0x9 => DiagonalRecipe::EndBottomLeft,
            0xC => DiagonalRecipe::EndBottomRight,
            0x6 | 0x7 | 0xE | 0xF => DiagonalRecipe::EndTopRight,
            0x3 => DiagonalRecipe::EndTopLeft,
            0x2 | 0xA | 0xB => DiagonalRecipe::Top,
            _ => DiagonalRecipe::Right,
        }
    }
}

/// Start and end of the outer diagonal line
fn diagonal_endpoints(rc: &Rect, sides: u32) -> (Point, Point) {
    let small = rc.width().min(rc.height());
    match sides & EdgeFlags::RECT.bits() {
        // Left bottom end point
        0x0 | 0x1 | 0x8 | 0x9 => {
            let end = Point::new(rc.left - 1, rc.bottom);
            (Point::new(end.x + small, end.y - small), end)
        }
        // Left top end point
        0x3 | 0xC => {
            let end = Point::new(rc.left - 1, rc.top - 1);
            (Point::new(end.x + small, end.y + small), end)
        }
        // Right top end point
        _ => {
            let start = Point::new(rc.left, rc.bottom - 1);
            (start, Point::new(start.x + small, start.y - small))
        }
    }
}

/// Inner line (from, to) and interior quadrilateral for a recipe
fn diagonal_inner(
    recipe: DiagonalRecipe,
    rc: &Rect,
    sp: Point,
    ep: Point,
    add: i32,
) -> (Point, Point, [Point; 4]) {
    let p = Point::new;
    match recipe {
        DiagonalRecipe::EndBottomLeft => {
            let tip = p(ep.x + 1, ep.y - 1 - add);
            (
                p(sp.x - 1, sp.y),
                p(ep.x, ep.y - 1),
                [p(sp.x - add, sp.y), p(rc.left, rc.top), tip, tip],
            )
        }
        DiagonalRecipe::EndBottomRight => {
            let tip = p(ep.x + 1, ep.y + 1 + add);
            (
                p(sp.x - 1, sp.y),
                p(ep.x, ep.y + 1),
                [p(sp.x - add, sp.y), p(rc.left, rc.bottom - 1), tip, tip],
            )
        }
        DiagonalRecipe::EndTopRight => (
            p(sp.x + 1, sp.y),
            p(ep.x, ep.y + 1),
            [
                p(ep.x - 1, ep.y + 1 + add),
                p(rc.right - 1, rc.top + add),
                p(rc.right - 1, rc.bottom - 1),
                p(sp.x + add, sp.y),
            ],
        ),
        DiagonalRecipe::EndTopLeft => (
            p(sp.x, sp.y - 1),
            p(ep.x + 1, ep.y),
            [
                p(ep.x + 1 + add, ep.y + 1),
                p(rc.right - 1, rc.top),
                p(rc.right - 1, rc.bottom - 1 - add),
                p(sp.x, sp.y - add),
            ],
        ),
        DiagonalRecipe::Top => (
            p(sp.x + 1, sp.y - 1),
            ep,
            [
                p(ep.x - 1, ep.y + 1),
                p(rc.right - 1, rc.top),
                p(rc.right - 1, rc.bottom - 1 - add),
                p(sp.x + add, sp.y - add),
            ],
        ),
        DiagonalRecipe::Right => {
            let tip = p(ep.x - 1 - add, ep.y + 1 + add);
            (
                sp,
                p(ep.x - 1, ep.y + 1),
                [sp, p(rc.left, rc.top + add), tip, tip],
            )
        }
    }
}

/// Draw a diagonal edge across the rectangle's largest inscribed square
pub(crate) fn draw_diagonal_edge<G: Gdi + ?Sized>(
    gdi: &G,
    hdc: HDC,
    rc: &mut Rect,
    border: BorderType,
    flags: EdgeFlags,
) -> W32Result<bool> {
    let valid = is_valid(border, flags);
    let add = adjust_width(border);
    let colors = edge_colors(border, EdgeStyle::from_flags(flags));

    // One line pair for the whole diagonal; BOTTOM picks the right/bottom colors
    let (inner, outer) = if flags.contains(EdgeFlags::BOTTOM) {
        (colors.rb_inner, colors.rb_outer)
    } else {
        (colors.lt_inner, colors.lt_outer)
    };

    let _pen = Selected::new(gdi, hdc, gdi.get_stock_object(StockObject::NullPen))?;
    let _pos = SavedPosition::move_to(gdi, hdc, 0, 0);

    let sides = flags.bits();
    let (sp, ep) = diagonal_endpoints(rc, sides);
    gdi.move_to(hdc, sp.x, sp.y);
    select_line_pen(gdi, hdc, outer);
    gdi.line_to(hdc, ep.x, ep.y);

    select_line_pen(gdi, hdc, inner);
    let (from, to, points) = diagonal_inner(DiagonalRecipe::from_sides(sides), rc, sp, ep, add);
    segment(gdi, hdc, (from.x, from.y), (to.x, to.y));

    if flags.contains(EdgeFlags::MIDDLE) && valid {
        let color = gdi.get_sys_color(fill_color(flags));
        let _brush = Selected::new(gdi, hdc, gdi.get_stock_object(StockObject::DcBrush))?;
        let _fill_pen = Selected::new(gdi, hdc, gdi.get_stock_object(StockObject::DcPen))?;
        gdi.set_dc_brush_color(hdc, color);
        gdi.set_dc_pen_color(hdc, color);
        gdi.polygon(hdc, &points);
    }

    if flags.contains(EdgeFlags::ADJUST) {
        shrink(rc, flags, add);
    }

    Ok(valid)
}

// ============================================================================
// DrawEdge
// ============================================================================

/// Draw a 3D edge; returns the validity flag
///
/// With `ADJUST` the rectangle is shrunk on every drawn side by the width
/// of the border. DC state (pen, current position) is restored on return.
pub fn draw_edge<G: Gdi + ?Sized>(
    gdi: &G,
    hdc: HDC,
    rc: &mut Rect,
    edge: BorderType,
    flags: EdgeFlags,
) -> bool {
    log::trace!("draw_edge({:?}, {:?}, {:?})", rc, edge, flags);

    let result = if flags.contains(EdgeFlags::DIAGONAL) {
        draw_diagonal_edge(gdi, hdc, rc, edge, flags)
    } else {
        draw_rect_edge(gdi, hdc, rc, edge, flags)
    };

    result.unwrap_or_else(|status| {
        log::debug!("draw_edge failed: {}", status);
        false
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdi::soft::GdiCall;
    use crate::gdi::{Rop3, SoftGdi};
    use crate::{ColorRef, GdiObjectType};

    fn all_borders() -> impl Iterator<Item = BorderType> {
        (0..16).map(BorderType::from_bits_retain)
    }

    #[test]
    fn test_raised_colors() {
        let normal = edge_colors(BorderType::RAISED, EdgeStyle::Normal);
        assert_eq!(normal.lt_outer, Some(SystemColor::Light3D));
        assert_eq!(normal.lt_inner, Some(SystemColor::BtnHighlight));
        assert_eq!(normal.rb_outer, Some(SystemColor::DkShadow3D));
        assert_eq!(normal.rb_inner, Some(SystemColor::BtnShadow));

        let soft = edge_colors(BorderType::RAISED, EdgeStyle::Soft);
        assert_eq!(soft.lt_outer, Some(SystemColor::BtnHighlight));
        assert_eq!(soft.lt_inner, Some(SystemColor::Light3D));
        assert_eq!(soft.rb_outer, normal.rb_outer);
        assert_eq!(soft.rb_inner, normal.rb_inner);
    }

    #[test]
    fn test_sunken_and_etched_colors() {
        let sunken = edge_colors(BorderType::SUNKEN, EdgeStyle::Normal);
        assert_eq!(sunken.lt_outer, Some(SystemColor::BtnShadow));
        assert_eq!(sunken.lt_inner, Some(SystemColor::DkShadow3D));
        assert_eq!(sunken.rb_outer, Some(SystemColor::BtnHighlight));
        assert_eq!(sunken.rb_inner, Some(SystemColor::Light3D));

        let etched = edge_colors(BorderType::ETCHED, EdgeStyle::Normal);
        assert_eq!(etched.lt_outer, Some(SystemColor::BtnShadow));
        assert_eq!(etched.lt_inner, Some(SystemColor::BtnHighlight));
        assert_eq!(etched.rb_outer, Some(SystemColor::BtnHighlight));
        assert_eq!(etched.rb_inner, Some(SystemColor::BtnShadow));
    }

    /// One letter per border index: `-` no line, `H` highlight, `S` shadow,
    /// `D` dark shadow, `L` light, `F` face, `W` window, `R` frame
    fn decode(row: &str) -> Vec<Option<SystemColor>> {
        row.chars()
            .map(|c| match c {
                '-' => None,
                'H' => Some(SystemColor::BtnHighlight),
                'S' => Some(SystemColor::BtnShadow),
                'D' => Some(SystemColor::DkShadow3D),
                'L' => Some(SystemColor::Light3D),
                'F' => Some(SystemColor::BtnFace),
                'W' => Some(SystemColor::Window),
                'R' => Some(SystemColor::WindowFrame),
                other => panic!("bad table letter {}", other),
            })
            .collect()
    }

    #[test]
    fn test_every_table_entry() {
        // (style, lt_inner, lt_outer, rb_inner, rb_outer)
        let golden = [
            (EdgeStyle::Normal, "-----HH--DD-----", "-LS-HLS-DLS--LS-", "-----SS--LL-----", "-DH-SDH-LDH--DH-"),
            (EdgeStyle::Soft, "-----LL--SS-----", "-HD-LHD-SHD--HD-", "-----SS--LL-----", "-DH-SDH-LDH--DH-"),
            (EdgeStyle::Flat, "-----FFF-FFF-FFF", "-SSSFSSSFSSSFSSS", "-----FFF-FFF-FFF", "-SSSFSSSFSSSFSSS"),
            (EdgeStyle::Mono, "-----WWW-WWW-WWW", "-RRRWRRRWRRRWRRR", "-----WWW-WWW-WWW", "-RRRWRRRWRRRWRRR"),
        ];

        for (style, lt_inner, lt_outer, rb_inner, rb_outer) in golden {
            let (lt_inner, lt_outer) = (decode(lt_inner), decode(lt_outer));
            let (rb_inner, rb_outer) = (decode(rb_inner), decode(rb_outer));
            for border in all_borders() {
                let i = border.bits() as usize;
                let expected = EdgeColors {
                    lt_inner: lt_inner[i],
                    lt_outer: lt_outer[i],
                    rb_inner: rb_inner[i],
                    rb_outer: rb_outer[i],
                };
                assert_eq!(edge_colors(border, style), expected, "{:?} border {:#x}", style, i);
            }
        }
    }

    #[test]
    fn test_flat_and_mono_share_colors_per_line() {
        for border in all_borders() {
            for style in [EdgeStyle::Flat, EdgeStyle::Mono] {
                let c = edge_colors(border, style);
                assert_eq!(c.lt_inner, c.rb_inner);
                assert_eq!(c.lt_outer, c.rb_outer);
            }
            let flat = edge_colors(border, EdgeStyle::Flat);
            assert!(flat.lt_inner.is_none() || flat.lt_inner == Some(SystemColor::BtnFace));
        }
    }

    #[test]
    fn test_missing_lines_follow_border_bits() {
        for border in all_borders() {
            let c = edge_colors(border, EdgeStyle::Normal);
            let single_inner = matches!(border.bits() & 0xC, 0x4 | 0x8);
            let single_outer = matches!(border.bits() & 0x3, 0x1 | 0x2);
            // A normal inner line needs an outer line to sit inside
            assert_eq!(c.lt_inner.is_some(), single_inner && single_outer);
            assert_eq!(c.rb_inner.is_some(), single_inner && single_outer);
        }
        assert_eq!(edge_colors(BorderType::empty(), EdgeStyle::Mono).lt_outer, None);
    }

    #[test]
    fn test_adjust_width() {
        assert_eq!(adjust_width(BorderType::empty()), 0);
        assert_eq!(adjust_width(BorderType::RAISEDOUTER), 1);
        assert_eq!(adjust_width(BorderType::SUNKENINNER), 1);
        assert_eq!(adjust_width(BorderType::RAISED), 2);
        assert_eq!(adjust_width(BorderType::ETCHED), 2);
        assert_eq!(adjust_width(BorderType::OUTER | BorderType::INNER), 2);
    }

    #[test]
    fn test_validity() {
        assert!(is_valid(BorderType::RAISED, EdgeFlags::RECT));
        assert!(is_valid(BorderType::BUMP, EdgeFlags::RECT));
        assert!(!is_valid(BorderType::OUTER, EdgeFlags::RECT));
        assert!(!is_valid(BorderType::INNER | BorderType::RAISEDOUTER, EdgeFlags::SOFT));
        assert!(is_valid(BorderType::OUTER, EdgeFlags::FLAT));
        assert!(is_valid(BorderType::INNER, EdgeFlags::MONO));
    }

    #[test]
    fn test_raised_rect_pixels() {
        let gdi = SoftGdi::new(32, 32);
        let hdc = gdi.screen_dc();
        let mut rc = Rect::new(0, 0, 10, 10);

        assert!(draw_edge(&gdi, hdc, &mut rc, BorderType::RAISED, EdgeFlags::RECT | EdgeFlags::MIDDLE));
        assert_eq!(rc, Rect::new(0, 0, 10, 10));

        assert_eq!(gdi.pixel(0, 0), ColorRef::rgb(0xE0, 0xE0, 0xE0));
        assert_eq!(gdi.pixel(0, 5), ColorRef::rgb(0xE0, 0xE0, 0xE0));
        assert_eq!(gdi.pixel(9, 0), ColorRef::DARK_GRAY);
        assert_eq!(gdi.pixel(5, 9), ColorRef::DARK_GRAY);
        assert_eq!(gdi.pixel(1, 1), ColorRef::WHITE);
        assert_eq!(gdi.pixel(8, 8), ColorRef::GRAY);
        assert_eq!(gdi.pixel(8, 1), ColorRef::GRAY);
        assert_eq!(gdi.pixel(5, 5), ColorRef::rgb(212, 208, 200));
        // Nothing outside the rectangle
        assert_eq!(gdi.pixel(10, 10), ColorRef::BLACK);
    }

    #[test]
    fn test_adjust_shrinks_by_border_width() {
        let gdi = SoftGdi::new(128, 64);
        let hdc = gdi.screen_dc();
        let mut rc = Rect::new(0, 0, 100, 50);

        assert!(draw_edge(&gdi, hdc, &mut rc, BorderType::RAISED, EdgeFlags::RECT | EdgeFlags::ADJUST));
        assert_eq!(rc, Rect::new(2, 2, 98, 48));

        // Applying it again shrinks it again
        draw_edge(&gdi, hdc, &mut rc, BorderType::RAISED, EdgeFlags::RECT | EdgeFlags::ADJUST);
        assert_eq!(rc, Rect::new(4, 4, 96, 46));

        let mut rc = Rect::new(0, 0, 100, 50);
        draw_edge(&gdi, hdc, &mut rc, BorderType::SUNKENOUTER, EdgeFlags::TOPLEFT | EdgeFlags::ADJUST);
        assert_eq!(rc, Rect::new(1, 1, 100, 50));
    }

    #[test]
    fn test_invalid_edge_skips_middle() {
        let gdi = SoftGdi::new(32, 32);
        let hdc = gdi.screen_dc();
        let mut rc = Rect::new(0, 0, 10, 10);

        let ok = draw_edge(&gdi, hdc, &mut rc, BorderType::OUTER, EdgeFlags::RECT | EdgeFlags::MIDDLE);
        assert!(!ok);
        assert_eq!(gdi.pixel(5, 5), ColorRef::BLACK);
        assert!(!gdi.calls().iter().any(|c| matches!(c, GdiCall::PatBlt { .. })));
    }

    #[test]
    fn test_only_requested_sides_drawn() {
        let gdi = SoftGdi::new(32, 32);
        let hdc = gdi.screen_dc();
        let mut rc = Rect::new(0, 0, 10, 10);

        draw_edge(&gdi, hdc, &mut rc, BorderType::RAISEDOUTER, EdgeFlags::BOTTOM);
        assert_eq!(gdi.pixel(5, 9), ColorRef::DARK_GRAY);
        assert_eq!(gdi.pixel(5, 0), ColorRef::BLACK);
        assert_eq!(gdi.pixel(0, 5), ColorRef::BLACK);
        assert_eq!(gdi.pixel(9, 5), ColorRef::BLACK);
    }

    #[test]
    fn test_state_restored() {
        let gdi = SoftGdi::new(32, 32);
        let hdc = gdi.screen_dc();
        let pen = gdi.get_current_object(hdc, GdiObjectType::Pen);
        let brush = gdi.get_current_object(hdc, GdiObjectType::Brush);
        gdi.move_to(hdc, 7, 3);

        let mut rc = Rect::new(2, 2, 20, 12);
        draw_edge(&gdi, hdc, &mut rc, BorderType::SUNKEN, EdgeFlags::RECT | EdgeFlags::MIDDLE | EdgeFlags::SOFT);
        let mut diag = Rect::new(2, 2, 20, 12);
        draw_edge(&gdi, hdc, &mut diag, BorderType::BUMP, EdgeFlags::DIAGONAL | EdgeFlags::MIDDLE);

        assert_eq!(gdi.get_current_object(hdc, GdiObjectType::Pen), pen);
        assert_eq!(gdi.get_current_object(hdc, GdiObjectType::Brush), brush);
        assert_eq!(gdi.move_to(hdc, 0, 0), Point::new(7, 3));
        assert_eq!(gdi.live_objects(), 0);
    }

    #[test]
    fn test_diagonal_end_points() {
        let rc = Rect::new(0, 0, 10, 6);
        assert_eq!(diagonal_endpoints(&rc, 0), (Point::new(5, 0), Point::new(-1, 6)));
        assert_eq!(diagonal_endpoints(&rc, 0x3), (Point::new(5, 5), Point::new(-1, -1)));
        assert_eq!(diagonal_endpoints(&rc, 0x6), (Point::new(0, 5), Point::new(6, -1)));
    }

    #[test]
    fn test_diagonal_recipes() {
        assert_eq!(DiagonalRecipe::from_sides(0x9), DiagonalRecipe::EndBottomLeft);
        assert_eq!(DiagonalRecipe::from_sides(0xC), DiagonalRecipe::EndBottomRight);
        assert_eq!(DiagonalRecipe::from_sides(0xF), DiagonalRecipe::EndTopRight);
        assert_eq!(DiagonalRecipe::from_sides(0x3), DiagonalRecipe::EndTopLeft);
        assert_eq!(DiagonalRecipe::from_sides(0xB), DiagonalRecipe::Top);
        assert_eq!(DiagonalRecipe::from_sides(0xD), DiagonalRecipe::Right);
        assert_eq!(DiagonalRecipe::from_sides(0x10 | 0x6), DiagonalRecipe::EndTopRight);
    }

    #[test]
    fn test_diagonal_end_top_right() {
        let gdi = SoftGdi::new(32, 32);
        let hdc = gdi.screen_dc();
        let mut rc = Rect::new(0, 0, 10, 10);

        let flags = EdgeFlags::DIAGONAL | EdgeFlags::TOPRIGHT | EdgeFlags::MIDDLE | EdgeFlags::ADJUST;
        assert!(draw_edge(&gdi, hdc, &mut rc, BorderType::RAISED, flags));
        assert_eq!(rc, Rect::new(0, 2, 8, 10));

        let lines: Vec<_> = gdi
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                GdiCall::LineTo { from, to, color, .. } => Some((from, to, color)),
                _ => None,
            })
            .collect();
        let light = Some(ColorRef::rgb(0xE0, 0xE0, 0xE0));
        assert_eq!(lines[0], (Point::new(0, 9), Point::new(10, -1), light));
        assert_eq!(lines[1], (Point::new(1, 9), Point::new(10, 0), Some(ColorRef::WHITE)));

        let polygon = gdi.calls().into_iter().find_map(|c| match c {
            GdiCall::Polygon { points, .. } => Some(points),
            _ => None,
        });
        assert_eq!(
            polygon,
            Some(vec![Point::new(9, 2), Point::new(9, 2), Point::new(9, 9), Point::new(2, 9)])
        );
    }

    /// Inner line and interior polygon of a raised, filled diagonal in a 10x10 box
    fn diagonal_geometry(sides: EdgeFlags) -> ((Point, Point), Vec<Point>) {
        let gdi = SoftGdi::new(32, 32);
        let mut rc = Rect::new(0, 0, 10, 10);
        let flags = EdgeFlags::DIAGONAL | EdgeFlags::MIDDLE | sides;
        assert!(draw_edge(&gdi, gdi.screen_dc(), &mut rc, BorderType::RAISED, flags));

        let calls = gdi.calls();
        let inner = calls
            .iter()
            .filter_map(|c| match c {
                GdiCall::LineTo { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .nth(1)
            .expect("inner line");
        let polygon = calls
            .into_iter()
            .find_map(|c| match c {
                GdiCall::Polygon { points, .. } => Some(points),
                _ => None,
            })
            .expect("interior polygon");
        (inner, polygon)
    }

    #[test]
    fn test_diagonal_end_bottom_left() {
        let p = Point::new;
        let (inner, polygon) = diagonal_geometry(EdgeFlags::BOTTOMLEFT);
        assert_eq!(inner, (p(8, 0), p(-1, 9)));
        assert_eq!(polygon, [p(7, 0), p(0, 0), p(0, 7), p(0, 7)]);

        // No side bits behave the same
        assert_eq!(diagonal_geometry(EdgeFlags::empty()), (inner, polygon));
    }

    #[test]
    fn test_diagonal_end_bottom_right() {
        let p = Point::new;
        let (inner, polygon) = diagonal_geometry(EdgeFlags::BOTTOMRIGHT);
        assert_eq!(inner, (p(8, 9), p(-1, 0)));
        assert_eq!(polygon, [p(7, 9), p(0, 9), p(0, 2), p(0, 2)]);
    }

    #[test]
    fn test_diagonal_end_top_left() {
        let p = Point::new;
        let (inner, polygon) = diagonal_geometry(EdgeFlags::TOPLEFT);
        assert_eq!(inner, (p(9, 8), p(0, -1)));
        assert_eq!(polygon, [p(2, 0), p(9, 0), p(9, 7), p(9, 7)]);
    }

    #[test]
    fn test_diagonal_top() {
        let p = Point::new;
        let (inner, polygon) = diagonal_geometry(EdgeFlags::TOP);
        assert_eq!(inner, (p(1, 8), p(10, -1)));
        assert_eq!(polygon, [p(9, 0), p(9, 0), p(9, 7), p(2, 7)]);
        assert_eq!(diagonal_geometry(EdgeFlags::TOP | EdgeFlags::BOTTOM), (inner, polygon));
    }

    #[test]
    fn test_diagonal_right() {
        let p = Point::new;
        let (inner, polygon) = diagonal_geometry(EdgeFlags::RIGHT);
        assert_eq!(inner, (p(0, 9), p(9, 0)));
        assert_eq!(polygon, [p(0, 9), p(0, 2), p(7, 2), p(7, 2)]);
        assert_eq!(diagonal_geometry(EdgeFlags::RIGHT | EdgeFlags::LEFT), (inner, polygon));
    }

    #[test]
    fn test_failed_middle_fill_still_draws_lines() {
        let gdi = SoftGdi::new(32, 32);
        let hdc = gdi.screen_dc();
        gdi.fail_raster_op(Some(Rop3::PatCopy));
        let mut rc = Rect::new(0, 0, 10, 10);

        assert!(draw_edge(&gdi, hdc, &mut rc, BorderType::RAISED, EdgeFlags::RECT | EdgeFlags::MIDDLE));
        assert!(gdi.calls().iter().any(|c| matches!(c, GdiCall::PatBlt { rop: Rop3::PatCopy, .. })));
        assert_eq!(gdi.pixel(5, 5), ColorRef::BLACK);
        assert_eq!(gdi.pixel(0, 0), ColorRef::rgb(0xE0, 0xE0, 0xE0));
        assert_eq!(gdi.pixel(5, 9), ColorRef::DARK_GRAY);
        assert_eq!(gdi.get_current_object(hdc, GdiObjectType::Brush), gdi.get_stock_object(StockObject::WhiteBrush));
    }

    #[test]
    fn test_diagonal_bottom_uses_right_bottom_colors() {
        let gdi = SoftGdi::new(32, 32);
        let hdc = gdi.screen_dc();
        let mut rc = Rect::new(0, 0, 8, 8);

        draw_edge(&gdi, hdc, &mut rc, BorderType::RAISED, EdgeFlags::DIAGONAL | EdgeFlags::BOTTOMRIGHT);
        let colors: Vec<_> = gdi
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                GdiCall::LineTo { color, .. } => Some(color),
                _ => None,
            })
            .collect();
        assert_eq!(colors, [Some(ColorRef::DARK_GRAY), Some(ColorRef::GRAY)]);
    }

    #[test]
    fn test_invalid_dc_fails() {
        let gdi = SoftGdi::new(8, 8);
        let mut rc = Rect::new(0, 0, 4, 4);
        assert!(!draw_edge(&gdi, crate::GdiHandle::NULL, &mut rc, BorderType::RAISED, EdgeFlags::RECT));
    }
}
