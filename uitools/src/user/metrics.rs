//! System Colors and UI Metrics
//!
//! The theme the renderers draw with: the `COLOR_*` palette (the source of
//! every chrome color) and the handful of `SPI_*` metrics the focus
//! rectangle reads.
//!
//! # References
//!
//! Based on Windows Server 2003:
//! - `windows/core/ntuser/kernel/sysmet.c`
//! - `windows/published/winuser.w` (COLOR_* constants)

use crate::{ColorRef, Size};

// ============================================================================
// Color Constants
// ============================================================================

/// Number of system color slots
pub const SYSTEM_COLOR_COUNT: usize = 31;

/// System color indices
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemColor {
    /// Scroll bar
    ScrollBar = 0,
    /// Desktop background
    Background = 1,
    /// Active caption
    ActiveCaption = 2,
    /// Inactive caption
    InactiveCaption = 3,
    /// Menu background
    Menu = 4,
    /// Window background
    Window = 5,
    /// Window frame
    WindowFrame = 6,
    /// Menu text
    MenuText = 7,
    /// Window text
    WindowText = 8,
    /// Caption text
    CaptionText = 9,
    /// Active border
    ActiveBorder = 10,
    /// Inactive border
    InactiveBorder = 11,
    /// App workspace
    AppWorkspace = 12,
    /// Highlight
    Highlight = 13,
    /// Highlight text
    HighlightText = 14,
    /// Button face
    BtnFace = 15,
    /// Button shadow
    BtnShadow = 16,
    /// Gray text
    GrayText = 17,
    /// Button text
    BtnText = 18,
    /// Inactive caption text
    InactiveCaptionText = 19,
    /// Button highlight
    BtnHighlight = 20,
    /// 3D dark shadow
    DkShadow3D = 21,
    /// 3D light
    Light3D = 22,
    /// Info text
    InfoText = 23,
    /// Info background
    InfoBk = 24,
    /// Hot light
    HotLight = 26,
    /// Gradient active caption
    GradientActiveCaption = 27,
    /// Gradient inactive caption
    GradientInactiveCaption = 28,
    /// Menu highlight
    MenuHighlight = 29,
    /// Menu bar
    MenuBar = 30,
}

impl SystemColor {
    /// Every color, in index order
    pub const ALL: [SystemColor; 30] = [
        SystemColor::ScrollBar,
        SystemColor::Background,
        SystemColor::ActiveCaption,
        SystemColor::InactiveCaption,
        SystemColor::Menu,
        SystemColor::Window,
        SystemColor::WindowFrame,
        SystemColor::MenuText,
        SystemColor::WindowText,
        SystemColor::CaptionText,
        SystemColor::ActiveBorder,
        SystemColor::InactiveBorder,
        SystemColor::AppWorkspace,
        SystemColor::Highlight,
        SystemColor::HighlightText,
        SystemColor::BtnFace,
        SystemColor::BtnShadow,
        SystemColor::GrayText,
        SystemColor::BtnText,
        SystemColor::InactiveCaptionText,
        SystemColor::BtnHighlight,
        SystemColor::DkShadow3D,
        SystemColor::Light3D,
        SystemColor::InfoText,
        SystemColor::InfoBk,
        SystemColor::HotLight,
        SystemColor::GradientActiveCaption,
        SystemColor::GradientInactiveCaption,
        SystemColor::MenuHighlight,
        SystemColor::MenuBar,
    ];

    /// Color for a `COLOR_*` index; the reserved slot 25 has none
    pub fn from_index(index: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|&c| c as i32 == index)
    }

    pub const fn index(self) -> usize {
        self as i32 as usize
    }
}

// ============================================================================
// System Color Table
// ============================================================================

/// The system palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SysColors {
    colors: [ColorRef; SYSTEM_COLOR_COUNT],
}

impl Default for SysColors {
    fn default() -> Self {
        Self {
            colors: [
                ColorRef::rgb(0xC8, 0xC8, 0xC8), // COLOR_SCROLLBAR
                ColorRef::rgb(0xA5, 0x6E, 0x3A), // COLOR_BACKGROUND (desktop)
                ColorRef::rgb(0xD1, 0xB4, 0x99), // COLOR_ACTIVECAPTION
                ColorRef::rgb(0xAC, 0xA8, 0x99), // COLOR_INACTIVECAPTION
                ColorRef::rgb(0xFF, 0xFF, 0xFF), // COLOR_MENU
                ColorRef::rgb(0xFF, 0xFF, 0xFF), // COLOR_WINDOW
                ColorRef::rgb(0x00, 0x00, 0x00), // COLOR_WINDOWFRAME
                ColorRef::rgb(0x00, 0x00, 0x00), // COLOR_MENUTEXT
                ColorRef::rgb(0x00, 0x00, 0x00), // COLOR_WINDOWTEXT
                ColorRef::rgb(0xFF, 0xFF, 0xFF), // COLOR_CAPTIONTEXT
                ColorRef::rgb(0xD4, 0xD0, 0xC8), // COLOR_ACTIVEBORDER
                ColorRef::rgb(0xD4, 0xD0, 0xC8), // COLOR_INACTIVEBORDER
                ColorRef::rgb(0x80, 0x80, 0x80), // COLOR_APPWORKSPACE
                ColorRef::rgb(0xD1, 0xB4, 0x99), // COLOR_HIGHLIGHT
                ColorRef::rgb(0xFF, 0xFF, 0xFF), // COLOR_HIGHLIGHTTEXT
                ColorRef::rgb(0xD4, 0xD0, 0xC8), // COLOR_BTNFACE
                ColorRef::rgb(0x80, 0x80, 0x80), // COLOR_BTNSHADOW
                ColorRef::rgb(0x80, 0x80, 0x80), // COLOR_GRAYTEXT
                ColorRef::rgb(0x00, 0x00, 0x00), // COLOR_BTNTEXT
                ColorRef::rgb(0xD4, 0xD0, 0xC8), // COLOR_INACTIVECAPTIONTEXT
                ColorRef::rgb(0xFF, 0xFF, 0xFF), // COLOR_BTNHIGHLIGHT
                ColorRef::rgb(0x40, 0x40, 0x40), // COLOR_3DDKSHADOW
                ColorRef::rgb(0xE0, 0xE0, 0xE0), // COLOR_3DLIGHT
                ColorRef::rgb(0x00, 0x00, 0x00), // COLOR_INFOTEXT
                ColorRef::rgb(0xE1, 0xFF, 0xFF), // COLOR_INFOBK
                ColorRef::rgb(0x00, 0x00, 0x00), // Reserved
                ColorRef::rgb(0xFF, 0x80, 0x00), // COLOR_HOTLIGHT
                ColorRef::rgb(0xEA, 0xD9, 0x99), // COLOR_GRADIENTACTIVECAPTION
                ColorRef::rgb(0xC8, 0xC8, 0xC8), // COLOR_GRADIENTINACTIVECAPTION
                ColorRef::rgb(0xD1, 0xB4, 0x99), // COLOR_MENUHILIGHT
                ColorRef::rgb(0xD4, 0xD0, 0xC8), // COLOR_MENUBAR
            ],
        }
    }
}

impl SysColors {
    pub fn get(&self, color: SystemColor) -> ColorRef {
        self.colors[color.index()]
    }

    pub fn set(&mut self, color: SystemColor, value: ColorRef) {
        self.colors[color.index()] = value;
    }
}

// ============================================================================
// UI Metrics
// ============================================================================

/// System parameters the renderers read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiMetrics {
    /// SPI_GETFOCUSBORDERWIDTH / SPI_GETFOCUSBORDERHEIGHT
    pub focus_border: Size,
}

impl Default for UiMetrics {
    fn default() -> Self {
        Self { focus_border: Size::new(1, 1) }
    }
}
