//! Software GDI Backend
//!
//! `SoftGdi` implements [`Gdi`] entirely in memory: a color display surface,
//! handle tables for bitmaps, brushes, pens, fonts and device contexts, and
//! a log of every drawing call. Tests drive the renderers through it and
//! inspect either the pixels or the call sequence.
//!
//! Like the kernel handle tables, all state sits behind one spin lock and
//! each trait method takes it for the duration of a single call.
//!
//! # Stock Objects
//!
//! Stock brushes, pens, the system font, the system color brushes and the
//! 1x1 default bitmap of memory DCs are created up front and never freed.
//! `live_objects` and `live_dcs` count everything else, which is how tests
//! check that the renderers release what they create.

use alloc::string::String;
use alloc::vec::Vec;

use spin::Mutex;

use super::brush::{Brush, BrushColors};
use super::dc::{DcDefaults, DcType, DeviceContext};
use super::draw;
use super::font::LogFont;
use super::pen::Pen;
use super::surface::{mono_stride, Surface};
use super::{BkMode, CachedBrush, DrawTextFlags, Gdi, MapMode, Rop3, StockObject};
use crate::user::metrics::{SysColors, UiMetrics, SYSTEM_COLOR_COUNT};
use crate::user::SystemColor;
use crate::{ColorRef, GdiHandle, GdiObjectType, Point, Rect, Size, UserHandle};
use crate::{HBITMAP, HBRUSH, HDC, HFONT, HGDIOBJ, HICON};

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of objects (stock included)
pub const MAX_OBJECTS: usize = 4096;

/// Maximum number of device contexts
pub const MAX_DC_COUNT: usize = 256;

/// Highest stock object id plus one
const STOCK_SLOTS: usize = StockObject::DcPen as usize + 1;

// ============================================================================
// Call Log
// ============================================================================

/// One recorded drawing call, in logical coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GdiCall {
    /// `color` is `None` when the selected pen draws nothing
    LineTo { hdc: HDC, from: Point, to: Point, color: Option<ColorRef> },
    Polygon { hdc: HDC, points: Vec<Point> },
    PatBlt { hdc: HDC, rect: Rect, rop: Rop3, brush: HBRUSH },
    BitBlt { dst: HDC, x: i32, y: i32, cx: i32, cy: i32, src: HDC, rop: Rop3, brush: HBRUSH },
    TextOut { hdc: HDC, x: i32, y: i32, text: String, color: ColorRef, face: String },
    /// `text` is what was displayed after prefix processing
    DrawText { hdc: HDC, text: String, rect: Rect, flags: DrawTextFlags },
    DrawIcon { hdc: HDC, x: i32, y: i32, hicon: HICON, cx: i32, cy: i32 },
}

// ============================================================================
// Object Table
// ============================================================================

#[derive(Debug, Clone)]
enum GdiObject {
    Bitmap(Surface),
    Brush(Brush),
    Pen(Pen),
    Font(LogFont),
}

impl GdiObject {
    fn kind(&self) -> GdiObjectType {
        match self {
            GdiObject::Bitmap(_) => GdiObjectType::Bitmap,
            GdiObject::Brush(_) => GdiObjectType::Brush,
            GdiObject::Pen(_) => GdiObjectType::Pen,
            GdiObject::Font(_) => GdiObjectType::Font,
        }
    }
}

#[derive(Debug, Clone)]
struct ObjectEntry {
    object: GdiObject,
    stock: bool,
}

#[derive(Debug, Clone, Copy)]
struct Icon {
    size: Size,
    color: ColorRef,
}

/// Source pixels captured for a blit, already in the destination's format
struct SourcePixels {
    width: i32,
    height: i32,
    pixels: Vec<Option<ColorRef>>,
}

impl SourcePixels {
    fn get(&self, x: i32, y: i32) -> Option<ColorRef> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.pixels[(y * self.width + x) as usize]
    }
}

struct State {
    screen: Surface,
    objects: Vec<Option<ObjectEntry>>,
    dcs: Vec<Option<DeviceContext>>,
    stock: [GdiHandle; STOCK_SLOTS],
    default_bitmap: HBITMAP,
    screen_dc: HDC,
    sys_colors: SysColors,
    sys_brushes: [HBRUSH; SYSTEM_COLOR_COUNT],
    metrics: UiMetrics,
    icons: Vec<Icon>,
    calls: Vec<GdiCall>,
    /// Creations left before allocation starts failing
    alloc_budget: Option<usize>,
    /// Raster operation that fails without touching pixels
    refused_rop: Option<Rop3>,
}

impl State {
    fn insert(&mut self, object: GdiObject, stock: bool) -> GdiHandle {
        let kind = object.kind();
        let entry = Some(ObjectEntry { object, stock });

        let slot = match self.objects.iter().position(|e| e.is_none()) {
            Some(slot) => {
                self.objects[slot] = entry;
                slot
            }
            None if self.objects.len() < MAX_OBJECTS => {
                self.objects.push(entry);
                self.objects.len() - 1
            }
            None => {
                log::warn!("GDI object table full");
                return GdiHandle::NULL;
            }
        };

        GdiHandle::new((slot + 1) as u16, kind)
    }

    /// Charge one creation against the failure-injection budget
    fn may_allocate(&mut self) -> bool {
        match self.alloc_budget.as_mut() {
            None => true,
            Some(0) => {
                log::debug!("allocation refused by injected limit");
                false
            }
            Some(left) => {
                *left -= 1;
                true
            }
        }
    }

    fn entry(&self, handle: GdiHandle) -> Option<&ObjectEntry> {
        let slot = (handle.index() as usize).checked_sub(1)?;
        let entry = self.objects.get(slot)?.as_ref()?;
        (entry.object.kind() == handle.object_type()).then_some(entry)
    }

    fn entry_mut(&mut self, handle: GdiHandle) -> Option<&mut ObjectEntry> {
        let slot = (handle.index() as usize).checked_sub(1)?;
        let entry = self.objects.get_mut(slot)?.as_mut()?;
        (entry.object.kind() == handle.object_type()).then_some(entry)
    }

    fn brush(&self, handle: HBRUSH) -> Option<&Brush> {
        match &self.entry(handle)?.object {
            GdiObject::Brush(brush) => Some(brush),
            _ => None,
        }
    }

    fn pen(&self, handle: GdiHandle) -> Option<&Pen> {
        match &self.entry(handle)?.object {
            GdiObject::Pen(pen) => Some(pen),
            _ => None,
        }
    }

    fn font(&self, handle: HFONT) -> Option<&LogFont> {
        match &self.entry(handle)?.object {
            GdiObject::Font(font) => Some(font),
            _ => None,
        }
    }

    fn bitmap(&self, handle: HBITMAP) -> Option<&Surface> {
        match &self.entry(handle)?.object {
            GdiObject::Bitmap(surf) => Some(surf),
            _ => None,
        }
    }

    fn dc(&self, hdc: HDC) -> Option<&DeviceContext> {
        if hdc.object_type() != GdiObjectType::DC {
            return None;
        }
        let slot = (hdc.index() as usize).checked_sub(1)?;
        self.dcs.get(slot)?.as_ref()
    }

    fn dc_mut(&mut self, hdc: HDC) -> Option<&mut DeviceContext> {
        if hdc.object_type() != GdiObjectType::DC {
            return None;
        }
        let slot = (hdc.index() as usize).checked_sub(1)?;
        self.dcs.get_mut(slot)?.as_mut()
    }

    fn insert_dc(&mut self, dc: DeviceContext) -> HDC {
        let slot = match self.dcs.iter().position(|d| d.is_none()) {
            Some(slot) => {
                self.dcs[slot] = Some(dc);
                slot
            }
            None if self.dcs.len() < MAX_DC_COUNT => {
                self.dcs.push(Some(dc));
                self.dcs.len() - 1
            }
            None => {
                log::warn!("DC table full");
                return GdiHandle::NULL;
            }
        };
        GdiHandle::new((slot + 1) as u16, GdiObjectType::DC)
    }

    fn surface(&self, dc: &DeviceContext) -> Option<&Surface> {
        match dc.dc_type {
            DcType::Display => Some(&self.screen),
            DcType::Memory => self.bitmap(dc.bitmap),
        }
    }

    fn surface_mut(&mut self, dc: &DeviceContext) -> Option<&mut Surface> {
        match dc.dc_type {
            DcType::Display => Some(&mut self.screen),
            DcType::Memory => match &mut self.entry_mut(dc.bitmap)?.object {
                GdiObject::Bitmap(surf) => Some(surf),
                _ => None,
            },
        }
    }

    fn cell_size(&self, dc: &DeviceContext) -> Size {
        self.font(dc.font).copied().unwrap_or_default().cell_size()
    }

    /// Read a source rectangle and convert it to the destination format
    ///
    /// Mono to color maps black to the destination text color and white to
    /// its background color; color to mono maps the source background color
    /// to white and everything else to black.
    fn capture(&self, src_dc: &DeviceContext, dst_dc: &DeviceContext, origin: Point, width: i32, height: i32) -> Option<SourcePixels> {
        let src = self.surface(src_dc)?;
        let dst_mono = self.surface(dst_dc)?.is_mono();
        let origin = src_dc.lp_to_dp(origin);

        let mut pixels = Vec::with_capacity((width.max(0) * height.max(0)) as usize);
        for y in 0..height {
            for x in 0..width {
                let pixel = src.get_pixel(origin.x + x, origin.y + y).map(|c| {
                    if src.is_mono() && !dst_mono {
                        if c == ColorRef::WHITE { dst_dc.bk_color } else { dst_dc.text_color }
                    } else if !src.is_mono() && dst_mono {
                        if c == src_dc.bk_color { ColorRef::WHITE } else { ColorRef::BLACK }
                    } else {
                        c
                    }
                });
                pixels.push(pixel);
            }
        }

        Some(SourcePixels { width, height, pixels })
    }

    /// Run a raster operation over a logical rectangle of a DC's surface
    fn raster(&mut self, dc: &DeviceContext, rect: Rect, rop: Rop3, source: Option<&SourcePixels>) -> bool {
        if self.refused_rop == Some(rop) {
            log::debug!("raster op {:?} refused by injected failure", rop);
            return false;
        }

        let brush = self.brush(dc.brush).cloned();
        let colors = brush_colors(dc);
        let origin = dc.lp_to_dp(Point::new(rect.left, rect.top));

        let pattern_needed = rop.uses_pattern();
        if pattern_needed && brush.as_ref().map_or(true, Brush::is_null) {
            return true;
        }

        let surf = match self.surface_mut(dc) {
            Some(s) => s,
            None => return false,
        };

        for y in 0..rect.height() {
            for x in 0..rect.width() {
                let (dx, dy) = (origin.x + x, origin.y + y);
                let dest = match surf.get_pixel(dx, dy) {
                    Some(c) => c,
                    None => continue,
                };
                let src = match source {
                    Some(pixels) => match pixels.get(x, y) {
                        Some(c) => c,
                        None => continue,
                    },
                    None => ColorRef::BLACK,
                };
                let pattern = if pattern_needed {
                    brush
                        .as_ref()
                        .and_then(|b| b.color_at(dx, dy, &colors))
                        .unwrap_or(ColorRef::BLACK)
                } else {
                    ColorRef::BLACK
                };
                surf.set_pixel(dx, dy, ColorRef(rop.apply(pattern.0, src.0, dest.0)));
            }
        }
        true
    }

    /// Paint text glyph blocks starting at a logical point
    fn paint_text(&mut self, dc: &DeviceContext, at: Point, text: &str) {
        let cell = self.cell_size(dc);
        let origin = dc.lp_to_dp(at);
        let bk = (dc.bk_mode == BkMode::Opaque).then_some(dc.bk_color);
        let fg = dc.text_color;

        let surf = match self.surface_mut(dc) {
            Some(s) => s,
            None => return,
        };

        for (i, ch) in text.chars().enumerate() {
            let mut box_rect = Rect::new(0, 0, cell.cx, cell.cy);
            box_rect.offset(origin.x + i as i32 * cell.cx, origin.y);
            if let Some(bk) = bk {
                surf.fill_rect(&box_rect, bk);
            }
            if !ch.is_whitespace() {
                box_rect.inflate(-1, -1);
                surf.fill_rect(&box_rect, fg);
            }
        }
    }
}

fn brush_colors(dc: &DeviceContext) -> BrushColors {
    BrushColors {
        text: dc.text_color,
        bk: dc.bk_color,
        dc_brush: dc.dc_brush_color,
    }
}

/// Rectangle from origin and signed extents
fn normalized(x: i32, y: i32, width: i32, height: i32) -> Rect {
    let (left, right) = if width < 0 { (x + width, x) } else { (x, x + width) };
    let (top, bottom) = if height < 0 { (y + height, y) } else { (y, y + height) };
    Rect::new(left, top, right, bottom)
}

/// Strip mnemonic prefixes; returns the visible text and the underlined index
///
/// `&&` is a literal ampersand, `&x` underlines `x` and a trailing `&` is
/// dropped. The first mnemonic wins.
fn strip_prefix(text: &str) -> (String, Option<usize>) {
    let mut out = String::with_capacity(text.len());
    let mut underline = None;
    let mut count = 0;
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        if ch == '&' {
            match chars.next() {
                Some('&') => {}
                Some(next) => {
                    underline.get_or_insert(count);
                    out.push(next);
                    count += 1;
                    continue;
                }
                None => break,
            }
        }
        out.push(ch);
        count += 1;
    }

    (out, underline)
}

// ============================================================================
// SoftGdi
// ============================================================================

/// In-memory GDI backend
pub struct SoftGdi {
    state: Mutex<State>,
    focus_brush: CachedBrush,
}

impl SoftGdi {
    /// Backend with a `width` x `height` display, default palette and metrics
    pub fn new(width: i32, height: i32) -> Self {
        let mut state = State {
            screen: Surface::new(width, height, false),
            objects: Vec::new(),
            dcs: Vec::new(),
            stock: [GdiHandle::NULL; STOCK_SLOTS],
            default_bitmap: GdiHandle::NULL,
            screen_dc: GdiHandle::NULL,
            sys_colors: SysColors::default(),
            sys_brushes: [GdiHandle::NULL; SYSTEM_COLOR_COUNT],
            metrics: UiMetrics::default(),
            icons: Vec::new(),
            calls: Vec::new(),
            alloc_budget: None,
            refused_rop: None,
        };

        let stock = [
            (StockObject::WhiteBrush, GdiObject::Brush(Brush::solid(ColorRef::WHITE))),
            (StockObject::LightGrayBrush, GdiObject::Brush(Brush::solid(ColorRef::LIGHT_GRAY))),
            (StockObject::GrayBrush, GdiObject::Brush(Brush::solid(ColorRef::GRAY))),
            (StockObject::DarkGrayBrush, GdiObject::Brush(Brush::solid(ColorRef::DARK_GRAY))),
            (StockObject::BlackBrush, GdiObject::Brush(Brush::solid(ColorRef::BLACK))),
            (StockObject::NullBrush, GdiObject::Brush(Brush::null())),
            (StockObject::WhitePen, GdiObject::Pen(Pen::solid(ColorRef::WHITE))),
            (StockObject::BlackPen, GdiObject::Pen(Pen::solid(ColorRef::BLACK))),
            (StockObject::NullPen, GdiObject::Pen(Pen::null())),
            (StockObject::SystemFont, GdiObject::Font(LogFont::default())),
            (StockObject::DcBrush, GdiObject::Brush(Brush::dc_color())),
            (StockObject::DcPen, GdiObject::Pen(Pen::dc_color())),
        ];
        for (id, object) in stock {
            let handle = state.insert(object, true);
            state.stock[id as usize] = handle;
        }

        state.default_bitmap = state.insert(GdiObject::Bitmap(Surface::new(1, 1, true)), true);

        for color in SystemColor::ALL {
            let brush = Brush::solid(state.sys_colors.get(color));
            let handle = state.insert(GdiObject::Brush(brush), true);
            state.sys_brushes[color.index()] = handle;
        }

        let defaults = DcDefaults {
            brush: state.stock[StockObject::WhiteBrush as usize],
            pen: state.stock[StockObject::BlackPen as usize],
            font: state.stock[StockObject::SystemFont as usize],
            bitmap: GdiHandle::NULL,
        };
        state.screen_dc = state.insert_dc(DeviceContext::new(DcType::Display, defaults));

        log::trace!("SoftGdi {}x{} ready, {} stock objects", width, height, state.objects.len());

        Self {
            state: Mutex::new(state),
            focus_brush: CachedBrush::new(),
        }
    }

    /// The display DC (never deleted)
    pub fn screen_dc(&self) -> HDC {
        self.state.lock().screen_dc
    }

    /// Display pixel; black outside the surface
    pub fn pixel(&self, x: i32, y: i32) -> ColorRef {
        self.state.lock().screen.get_pixel(x, y).unwrap_or(ColorRef::BLACK)
    }

    /// Pixel of a bitmap object
    pub fn bitmap_pixel(&self, hbm: HBITMAP, x: i32, y: i32) -> Option<ColorRef> {
        self.state.lock().bitmap(hbm)?.get_pixel(x, y)
    }

    /// Recorded calls, oldest first
    pub fn calls(&self) -> Vec<GdiCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Non-stock objects currently alive
    pub fn live_objects(&self) -> usize {
        self.state
            .lock()
            .objects
            .iter()
            .flatten()
            .filter(|e| !e.stock)
            .count()
    }

    /// Memory DCs currently alive
    pub fn live_dcs(&self) -> usize {
        let state = self.state.lock();
        let count = state
            .dcs
            .iter()
            .flatten()
            .filter(|dc| dc.dc_type == DcType::Memory)
            .count();
        count
    }

    /// Let `count` more creations succeed, then fail every one after
    pub fn fail_allocations_after(&self, count: usize) {
        self.state.lock().alloc_budget = Some(count);
    }

    /// Lift the allocation limit
    pub fn allow_allocations(&self) {
        self.state.lock().alloc_budget = None;
    }

    /// Make every blit using `rop` fail (still logged); `None` clears it
    pub fn fail_raster_op(&self, rop: Option<Rop3>) {
        self.state.lock().refused_rop = rop;
    }

    pub fn set_map_mode(&self, hdc: HDC, mode: MapMode) -> MapMode {
        let mut state = self.state.lock();
        match state.dc_mut(hdc) {
            Some(dc) => core::mem::replace(&mut dc.map_mode, mode),
            None => MapMode::Text,
        }
    }

    /// Register a solid-color icon of the given size
    pub fn create_icon(&self, width: i32, height: i32, color: ColorRef) -> HICON {
        let mut state = self.state.lock();
        state.icons.push(Icon { size: Size::new(width, height), color });
        UserHandle::new(state.icons.len() as u16)
    }

    /// Change system colors and recolor their brushes
    pub fn set_sys_colors(&self, changes: &[(SystemColor, ColorRef)]) {
        let mut state = self.state.lock();
        for &(color, value) in changes {
            state.sys_colors.set(color, value);
            let handle = state.sys_brushes[color.index()];
            if let Some(entry) = state.entry_mut(handle) {
                entry.object = GdiObject::Brush(Brush::solid(value));
            }
        }
    }

    pub fn set_focus_border(&self, border: Size) {
        self.state.lock().metrics.focus_border = border;
    }
}

impl Default for SoftGdi {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

impl Gdi for SoftGdi {
    fn get_stock_object(&self, obj: StockObject) -> HGDIOBJ {
        self.state.lock().stock[obj as usize]
    }

    fn select_object(&self, hdc: HDC, obj: HGDIOBJ) -> HGDIOBJ {
        let mut state = self.state.lock();
        if state.entry(obj).is_none() {
            return GdiHandle::NULL;
        }
        match state.dc_mut(hdc) {
            Some(dc) => dc.select(obj),
            None => GdiHandle::NULL,
        }
    }

    fn get_current_object(&self, hdc: HDC, kind: GdiObjectType) -> HGDIOBJ {
        self.state
            .lock()
            .dc(hdc)
            .map_or(GdiHandle::NULL, |dc| dc.current(kind))
    }

    fn delete_object(&self, obj: HGDIOBJ) -> bool {
        let mut state = self.state.lock();
        match state.entry(obj) {
            None => return false,
            Some(entry) if entry.stock => return true,
            Some(_) => {}
        }
        if state.dcs.iter().flatten().any(|dc| dc.holds(obj)) {
            log::warn!("delete_object({:#x}): object still selected", obj.raw());
            return false;
        }
        let slot = obj.index() as usize - 1;
        state.objects[slot] = None;
        true
    }

    fn create_bitmap(&self, width: i32, height: i32, planes: u32, bpp: u32, bits: Option<&[u8]>) -> HBITMAP {
        let mut state = self.state.lock();
        if width <= 0 || height <= 0 || !state.may_allocate() {
            return GdiHandle::NULL;
        }

        let mono = planes * bpp == 1;
        let surf = match bits {
            Some(bits) if mono => {
                if bits.len() < mono_stride(width) * height as usize {
                    log::debug!("create_bitmap: {} bytes is short for {}x{}", bits.len(), width, height);
                }
                Surface::from_mono_bits(width, height, bits)
            }
            Some(bits) if bpp == 32 => {
                let mut surf = Surface::new(width, height, false);
                for (i, px) in bits.chunks_exact(4).take((width * height) as usize).enumerate() {
                    let (x, y) = (i as i32 % width, i as i32 / width);
                    surf.set_pixel(x, y, ColorRef::rgb(px[2], px[1], px[0]));
                }
                surf
            }
            Some(_) => {
                log::debug!("create_bitmap: {} bpp initial bits ignored", bpp);
                Surface::new(width, height, mono)
            }
            None => Surface::new(width, height, mono),
        };

        state.insert(GdiObject::Bitmap(surf), false)
    }

    fn create_pattern_brush(&self, hbm: HBITMAP) -> HBRUSH {
        let mut state = self.state.lock();
        let pattern = match state.bitmap(hbm) {
            Some(surf) => surf.clone(),
            None => return GdiHandle::NULL,
        };
        if !state.may_allocate() {
            return GdiHandle::NULL;
        }
        state.insert(GdiObject::Brush(Brush::pattern(pattern)), false)
    }

    fn create_font_indirect(&self, lf: &LogFont) -> HFONT {
        let mut state = self.state.lock();
        if !state.may_allocate() {
            return GdiHandle::NULL;
        }
        state.insert(GdiObject::Font(*lf), false)
    }

    fn create_compatible_dc(&self, hdc: HDC) -> HDC {
        let mut state = self.state.lock();
        if !hdc.is_null() && state.dc(hdc).is_none() {
            return GdiHandle::NULL;
        }
        if !state.may_allocate() {
            return GdiHandle::NULL;
        }
        let defaults = DcDefaults {
            brush: state.stock[StockObject::WhiteBrush as usize],
            pen: state.stock[StockObject::BlackPen as usize],
            font: state.stock[StockObject::SystemFont as usize],
            bitmap: state.default_bitmap,
        };
        state.insert_dc(DeviceContext::new(DcType::Memory, defaults))
    }

    fn delete_dc(&self, hdc: HDC) -> bool {
        let mut state = self.state.lock();
        match state.dc(hdc) {
            Some(dc) if dc.dc_type == DcType::Memory => {}
            _ => return false,
        }
        let slot = hdc.index() as usize - 1;
        state.dcs[slot] = None;
        true
    }

    fn get_bitmap_size(&self, hbm: HBITMAP) -> Option<Size> {
        self.state.lock().bitmap(hbm).map(Surface::size)
    }

    fn get_icon_size(&self, hicon: HICON) -> Option<Size> {
        let index = (hicon.index() as usize).checked_sub(1)?;
        self.state.lock().icons.get(index).map(|icon| icon.size)
    }

    fn get_map_mode(&self, hdc: HDC) -> MapMode {
        self.state.lock().dc(hdc).map_or(MapMode::Text, |dc| dc.map_mode)
    }

    fn set_text_color(&self, hdc: HDC, color: ColorRef) -> ColorRef {
        let mut state = self.state.lock();
        state
            .dc_mut(hdc)
            .map_or(ColorRef::BLACK, |dc| core::mem::replace(&mut dc.text_color, color))
    }

    fn get_text_color(&self, hdc: HDC) -> ColorRef {
        self.state.lock().dc(hdc).map_or(ColorRef::BLACK, |dc| dc.text_color)
    }

    fn set_bk_color(&self, hdc: HDC, color: ColorRef) -> ColorRef {
        let mut state = self.state.lock();
        state
            .dc_mut(hdc)
            .map_or(ColorRef::WHITE, |dc| core::mem::replace(&mut dc.bk_color, color))
    }

    fn set_bk_mode(&self, hdc: HDC, mode: BkMode) -> BkMode {
        let mut state = self.state.lock();
        state
            .dc_mut(hdc)
            .map_or(BkMode::Opaque, |dc| core::mem::replace(&mut dc.bk_mode, mode))
    }

    fn get_bk_mode(&self, hdc: HDC) -> BkMode {
        self.state.lock().dc(hdc).map_or(BkMode::Opaque, |dc| dc.bk_mode)
    }

    fn set_dc_pen_color(&self, hdc: HDC, color: ColorRef) -> ColorRef {
        let mut state = self.state.lock();
        state
            .dc_mut(hdc)
            .map_or(ColorRef::BLACK, |dc| core::mem::replace(&mut dc.dc_pen_color, color))
    }

    fn set_dc_brush_color(&self, hdc: HDC, color: ColorRef) -> ColorRef {
        let mut state = self.state.lock();
        state
            .dc_mut(hdc)
            .map_or(ColorRef::WHITE, |dc| core::mem::replace(&mut dc.dc_brush_color, color))
    }

    fn move_to(&self, hdc: HDC, x: i32, y: i32) -> Point {
        let mut state = self.state.lock();
        state
            .dc_mut(hdc)
            .map_or(Point::default(), |dc| core::mem::replace(&mut dc.current_pos, Point::new(x, y)))
    }

    fn offset_viewport_org(&self, hdc: HDC, dx: i32, dy: i32) -> Point {
        let mut state = self.state.lock();
        match state.dc_mut(hdc) {
            Some(dc) => {
                let prev = dc.viewport_org;
                dc.viewport_org = Point::new(prev.x + dx, prev.y + dy);
                prev
            }
            None => Point::default(),
        }
    }

    fn line_to(&self, hdc: HDC, x: i32, y: i32) -> bool {
        let mut state = self.state.lock();
        let dc = match state.dc(hdc) {
            Some(dc) => dc.clone(),
            None => return false,
        };

        let color = state.pen(dc.pen).and_then(|p| p.resolve(dc.dc_pen_color));
        let (from, to) = (dc.current_pos, Point::new(x, y));
        state.calls.push(GdiCall::LineTo { hdc, from, to, color });

        if let Some(color) = color {
            if let Some(surf) = state.surface_mut(&dc) {
                draw::line(dc.lp_to_dp(from), dc.lp_to_dp(to), |px, py| {
                    surf.set_pixel(px, py, color);
                });
            }
        }

        if let Some(dc) = state.dc_mut(hdc) {
            dc.current_pos = to;
        }
        true
    }

    fn polygon(&self, hdc: HDC, points: &[Point]) -> bool {
        if points.len() < 2 {
            return false;
        }

        let mut state = self.state.lock();
        let dc = match state.dc(hdc) {
            Some(dc) => dc.clone(),
            None => return false,
        };
        state.calls.push(GdiCall::Polygon { hdc, points: points.to_vec() });

        let brush = state.brush(dc.brush).cloned();
        let colors = brush_colors(&dc);
        let outline = state.pen(dc.pen).and_then(|p| p.resolve(dc.dc_pen_color));
        let device: Vec<Point> = points.iter().map(|&pt| dc.lp_to_dp(pt)).collect();

        let surf = match state.surface_mut(&dc) {
            Some(s) => s,
            None => return false,
        };

        // Fill the polygon using scanline fill
        if let Some(brush) = brush.filter(|b| !b.is_null()) {
            draw::fill_polygon(&device, |x0, x1, y| {
                for x in x0..x1 {
                    if let Some(color) = brush.color_at(x, y, &colors) {
                        surf.set_pixel(x, y, color);
                    }
                }
            });
        }

        // Draw the outline
        if let Some(color) = outline {
            for i in 0..device.len() {
                let (p1, p2) = (device[i], device[(i + 1) % device.len()]);
                draw::line(p1, p2, |x, y| {
                    surf.set_pixel(x, y, color);
                });
            }
        }

        true
    }

    fn pat_blt(&self, hdc: HDC, x: i32, y: i32, width: i32, height: i32, rop: Rop3) -> bool {
        let mut state = self.state.lock();
        let dc = match state.dc(hdc) {
            Some(dc) => dc.clone(),
            None => return false,
        };

        let rect = normalized(x, y, width, height);
        state.calls.push(GdiCall::PatBlt { hdc, rect, rop, brush: dc.brush });
        state.raster(&dc, rect, rop, None)
    }

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
    ) -> bool {
        let mut state = self.state.lock();
        let dst_dc = match state.dc(hdc_dest) {
            Some(dc) => dc.clone(),
            None => return false,
        };

        state.calls.push(GdiCall::BitBlt {
            dst: hdc_dest,
            x: x_dest,
            y: y_dest,
            cx: width,
            cy: height,
            src: hdc_src,
            rop,
            brush: dst_dc.brush,
        });

        let source = if rop.uses_source() {
            let src_dc = match state.dc(hdc_src) {
                Some(dc) => dc.clone(),
                None => return false,
            };
            match state.capture(&src_dc, &dst_dc, Point::new(x_src, y_src), width.abs(), height.abs()) {
                Some(pixels) => Some(pixels),
                None => return false,
            }
        } else {
            None
        };

        let rect = normalized(x_dest, y_dest, width, height);
        state.raster(&dst_dc, rect, rop, source.as_ref())
    }

    fn text_out(&self, hdc: HDC, x: i32, y: i32, text: &str) -> bool {
        let mut state = self.state.lock();
        let dc = match state.dc(hdc) {
            Some(dc) => dc.clone(),
            None => return false,
        };

        let face = String::from(state.font(dc.font).copied().unwrap_or_default().face());
        state.calls.push(GdiCall::TextOut {
            hdc,
            x,
            y,
            text: String::from(text),
            color: dc.text_color,
            face,
        });

        state.paint_text(&dc, Point::new(x, y), text);
        true
    }

    fn draw_text(&self, hdc: HDC, text: &str, rect: &Rect, flags: DrawTextFlags) -> i32 {
        let mut state = self.state.lock();
        let dc = match state.dc(hdc) {
            Some(dc) => dc.clone(),
            None => return 0,
        };

        let (shown, underline) = if flags.contains(DrawTextFlags::NOPREFIX) {
            (String::from(text), None)
        } else {
            strip_prefix(text)
        };
        state.calls.push(GdiCall::DrawText {
            hdc,
            text: shown.clone(),
            rect: *rect,
            flags,
        });

        let cell = state.cell_size(&dc);
        let width = cell.cx * shown.chars().count() as i32;
        let x = if flags.contains(DrawTextFlags::RIGHT) { rect.right - width } else { rect.left };
        let at = Point::new(x, rect.top);

        if !flags.contains(DrawTextFlags::PREFIXONLY) {
            state.paint_text(&dc, at, &shown);
        }

        if let Some(index) = underline.filter(|_| !flags.contains(DrawTextFlags::HIDEPREFIX)) {
            let start = dc.lp_to_dp(Point::new(at.x + index as i32 * cell.cx, at.y + cell.cy - 1));
            if let Some(surf) = state.surface_mut(&dc) {
                surf.hline(start.x, start.x + cell.cx, start.y, dc.text_color);
            }
        }

        cell.cy
    }

    fn draw_icon_ex(&self, hdc: HDC, x: i32, y: i32, hicon: HICON, cx: i32, cy: i32) -> bool {
        let mut state = self.state.lock();
        let dc = match state.dc(hdc) {
            Some(dc) => dc.clone(),
            None => return false,
        };
        let icon = match (hicon.index() as usize).checked_sub(1).and_then(|i| state.icons.get(i)) {
            Some(icon) => *icon,
            None => return false,
        };

        let cx = if cx == 0 { icon.size.cx } else { cx };
        let cy = if cy == 0 { icon.size.cy } else { cy };
        state.calls.push(GdiCall::DrawIcon { hdc, x, y, hicon, cx, cy });

        let origin = dc.lp_to_dp(Point::new(x, y));
        match state.surface_mut(&dc) {
            Some(surf) => surf.fill_rect(&Rect::new(origin.x, origin.y, origin.x + cx, origin.y + cy), icon.color),
            None => false,
        }
    }

    fn get_text_extent(&self, hdc: HDC, text: &str) -> Option<Size> {
        let state = self.state.lock();
        let dc = state.dc(hdc)?;
        let cell = state.cell_size(dc);
        Some(Size::new(cell.cx * text.chars().count() as i32, cell.cy))
    }

    fn get_sys_color(&self, color: SystemColor) -> ColorRef {
        self.state.lock().sys_colors.get(color)
    }

    fn get_sys_color_brush(&self, color: SystemColor) -> HBRUSH {
        self.state.lock().sys_brushes[color.index()]
    }

    fn get_focus_border(&self) -> Size {
        self.state.lock().metrics.focus_border
    }

    fn focus_brush_cache(&self) -> &CachedBrush {
        &self.focus_brush
    }
}
