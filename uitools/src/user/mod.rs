//! USER Drawing Helpers
//!
//! The chrome renderers built on top of a [`Gdi`](crate::gdi::Gdi) backend:
//!
//! - **edge**: 3D bevelled edges (`DrawEdge`), rectangular and diagonal
//! - **frame**: frame controls (`DrawFrameControl`): buttons, caption
//!   buttons, scroll arrows and size grips, menu glyphs
//! - **state**: normal and ghosted images (`DrawState`, `GrayString`)
//! - **rect**: rectangle primitives (`FillRect`, `FrameRect`,
//!   `InvertRect`, `DrawFocusRect`)
//! - **metrics**: the system palette and focus border metrics
//!
//! Every entry point returns `bool` like its Win32 counterpart; the
//! internal paths return [`W32Result`](crate::W32Result) and unwind their
//! DC changes through the guards in [`gdi::guard`](crate::gdi::guard).
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntuser/client/draw.c`
//! - `windows/core/ntuser/rtl/drawfrm.c`

pub mod metrics;
pub mod edge;
pub mod frame;
pub mod state;
pub mod rect;

pub use metrics::{SystemColor, SysColors, UiMetrics};
pub use edge::{draw_edge, BorderType, EdgeFlags, EdgeStyle};
pub use frame::{
    draw_frame_control, draw_frame_control_raw, ButtonPart, CaptionPart, ControlState,
    FrameControl, MenuPart, ScrollPart,
};
pub use state::{draw_state, gray_string, DrawStateFlags, StateImage};
pub use rect::{draw_focus_rect, fill_rect, frame_rect, invert_rect};

/// 8x8 checkerboard, one word per row (`AA55` alternating)
///
/// Backs both the checked push button dither and the focus rectangle brush.
pub(crate) const PATTERN_AA55: [u8; 16] = [
    0xAA, 0xAA, 0x55, 0x55, 0xAA, 0xAA, 0x55, 0x55,
    0xAA, 0xAA, 0x55, 0x55, 0xAA, 0xAA, 0x55, 0x55,
];
