//! UI Tools - classic 3D chrome rendering
//!
//! Draws bevelled edges, frame control glyphs, focus rectangles and ghosted
//! (disabled/default) images on top of a GDI-style drawing backend, matching
//! the Windows 95/2000 look pixel for pixel.
//!
//! # Architecture
//!
//! - **gdi/**: the drawing backend capability (`Gdi` trait), RAII guards over
//!   backend objects, and `SoftGdi`, a software backend used for testing
//! - **user/**: the rendering core (`DrawEdge`, `DrawFrameControl`,
//!   `DrawState`, `GrayString`, `DrawFocusRect`, `FillRect`, ...)
//!
//! # Entry points
//!
//! - `draw_edge` - 3D edges, rectangular or diagonal
//! - `draw_frame_control` - buttons, caption buttons, scroll arrows, menu glyphs
//! - `draw_state` / `gray_string` - normal or ghosted images
//! - `draw_focus_rect`, `fill_rect`, `frame_rect`, `invert_rect`
//!
//! # References
//!
//! Follows the Windows Server 2003 `user32` drawing helpers
//! (`DrawEdge`, `DrawFrameControl`, `DrawStateW`, `GrayStringW`).

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod gdi;
pub mod user;

pub use gdi::{Gdi, Rop3, StockObject, BkMode, MapMode};
pub use user::{
    draw_edge, draw_frame_control, draw_frame_control_raw, draw_state, gray_string,
    draw_focus_rect, fill_rect, frame_rect, invert_rect,
    BorderType, EdgeFlags, ControlState, FrameControl, DrawStateFlags, StateImage,
    SystemColor,
};

// ============================================================================
// Status Codes
// ============================================================================

/// Win32k-style status codes used by internal drawing paths
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum W32Status {
    Success = 0,
    InvalidHandle = 0xC0000008,
    InvalidParameter = 0xC000000D,
    NoMemory = 0xC0000017,
    /// Device context is not in a 1:1 (MM_TEXT) mapping mode
    InvalidMode = 0xC00000F0,
    /// A drawing primitive or callback reported failure
    DrawFailed = 0xC0000001,
}

impl core::fmt::Display for W32Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            W32Status::Success => "success",
            W32Status::InvalidHandle => "invalid handle",
            W32Status::InvalidParameter => "invalid parameter",
            W32Status::NoMemory => "out of GDI resources",
            W32Status::InvalidMode => "mapping mode is not MM_TEXT",
            W32Status::DrawFailed => "drawing primitive failed",
        };
        write!(f, "{} ({:#010x})", text, *self as u32)
    }
}

/// Result type for internal drawing paths
pub type W32Result<T> = Result<T, W32Status>;

// ============================================================================
// Object Types
// ============================================================================

/// GDI object types
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GdiObjectType {
    None = 0,
    DC = 1,           // Device Context
    Bitmap = 2,       // Bitmap/Surface
    Brush = 3,        // Brush
    Pen = 4,          // Pen
    Font = 5,         // Font
}

// ============================================================================
// Handle Types
// ============================================================================

/// GDI handle (HDC, HBITMAP, HBRUSH, etc.)
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct GdiHandle(u32);

impl GdiHandle {
    pub const NULL: GdiHandle = GdiHandle(0);

    /// Create a new handle from index and type
    pub const fn new(index: u16, obj_type: GdiObjectType) -> Self {
        // Handle format: type (8 bits) | reserved (8 bits) | index (16 bits)
        GdiHandle(((obj_type as u32) << 24) | (index as u32))
    }

    /// Brush "handle" naming a system color, `COLOR_xxx + 1`
    ///
    /// Only meaningful to `fill_rect`, which resolves it to the system color brush.
    pub const fn sys_color(color: user::SystemColor) -> Self {
        GdiHandle(color as u32 + 1)
    }

    /// Wrap a raw handle value
    pub const fn from_raw(raw: u32) -> Self {
        GdiHandle(raw)
    }

    /// Get the object type from handle
    pub const fn object_type(self) -> GdiObjectType {
        match (self.0 >> 24) as u8 {
            1 => GdiObjectType::DC,
            2 => GdiObjectType::Bitmap,
            3 => GdiObjectType::Brush,
            4 => GdiObjectType::Pen,
            5 => GdiObjectType::Font,
            _ => GdiObjectType::None,
        }
    }

    /// Get the index from handle
    pub const fn index(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// Null handle check
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Check if handle is valid
    pub const fn is_valid(self) -> bool {
        self.0 != 0 && !matches!(self.object_type(), GdiObjectType::None)
    }

    /// Get raw handle value
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// USER handle (HICON)
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct UserHandle(u32);

impl UserHandle {
    pub const NULL: UserHandle = UserHandle(0);

    pub const fn new(index: u16) -> Self {
        UserHandle(index as u32)
    }

    pub const fn index(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

// Type aliases for clarity
pub type HDC = GdiHandle;
pub type HBITMAP = GdiHandle;
pub type HBRUSH = GdiHandle;
pub type HFONT = GdiHandle;
pub type HGDIOBJ = GdiHandle;

pub type HICON = UserHandle;

// ============================================================================
// Common Structures
// ============================================================================

/// Point structure
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Size structure
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub cx: i32,
    pub cy: i32,
}

impl Size {
    pub const fn new(cx: i32, cy: i32) -> Self {
        Size { cx, cy }
    }
}

/// Rectangle structure, right and bottom exclusive
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Rect { left, top, right, bottom }
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub const fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let result = Rect {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };

        if result.is_empty() {
            None
        } else {
            Some(result)
        }
    }

    pub fn offset(&mut self, dx: i32, dy: i32) {
        self.left += dx;
        self.right += dx;
        self.top += dy;
        self.bottom += dy;
    }

    /// Shrink (positive) or grow (negative) every side
    pub fn inflate(&mut self, dx: i32, dy: i32) {
        self.left -= dx;
        self.right += dx;
        self.top -= dy;
        self.bottom += dy;
    }
}

/// RGB color, `0x00BBGGRR`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ColorRef(pub u32);

impl ColorRef {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        ColorRef((r as u32) | ((g as u32) << 8) | ((b as u32) << 16))
    }

    pub const fn red(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    pub const fn green(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    pub const fn blue(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Nearest monochrome color (what a 1 bpp surface stores)
    pub const fn to_mono(self) -> Self {
        let luma = self.red() as u32 * 30 + self.green() as u32 * 59 + self.blue() as u32 * 11;
        if luma >= 128 * 100 {
            ColorRef::WHITE
        } else {
            ColorRef::BLACK
        }
    }
}

// Standard colors
impl ColorRef {
    pub const BLACK: ColorRef = ColorRef::rgb(0, 0, 0);
    pub const WHITE: ColorRef = ColorRef::rgb(255, 255, 255);
    pub const GRAY: ColorRef = ColorRef::rgb(128, 128, 128);
    pub const LIGHT_GRAY: ColorRef = ColorRef::rgb(192, 192, 192);
    pub const DARK_GRAY: ColorRef = ColorRef::rgb(64, 64, 64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_encoding() {
        let h = GdiHandle::new(42, GdiObjectType::Brush);
        assert_eq!(h.object_type(), GdiObjectType::Brush);
        assert_eq!(h.index(), 42);
        assert!(h.is_valid());
        assert!(!GdiHandle::NULL.is_valid());
    }

    #[test]
    fn test_sys_color_token_is_not_an_object() {
        let token = GdiHandle::sys_color(SystemColor::BtnFace);
        assert_eq!(token.raw(), 16);
        assert_eq!(token.object_type(), GdiObjectType::None);
        assert!(!token.is_valid());
    }

    #[test]
    fn test_to_mono() {
        assert_eq!(ColorRef::rgb(212, 208, 200).to_mono(), ColorRef::WHITE);
        assert_eq!(ColorRef::GRAY.to_mono(), ColorRef::WHITE);
        assert_eq!(ColorRef::DARK_GRAY.to_mono(), ColorRef::BLACK);
    }

    #[test]
    fn test_rect_inflate() {
        let mut r = Rect::new(0, 0, 10, 10);
        r.inflate(-2, -1);
        assert_eq!(r, Rect::new(2, 1, 8, 9));
    }
}
