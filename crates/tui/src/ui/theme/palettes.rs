//! Light and dark palettes mapped onto the shell's theme roles.

use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

// Light surfaces
pub const L_BG: Color = Color::Rgb(0xF8, 0xFA, 0xFC); // #F8FAFC
pub const L_SURFACE: Color = Color::Rgb(0xFF, 0xFF, 0xFF); // #FFFFFF
pub const L_BORDER: Color = Color::Rgb(0xCB, 0xD5, 0xE1); // #CBD5E1
pub const L_TEXT: Color = Color::Rgb(0x1E, 0x29, 0x3B); // #1E293B
pub const L_TEXT_SECONDARY: Color = Color::Rgb(0x33, 0x41, 0x55); // #334155
pub const L_TEXT_MUTED: Color = Color::Rgb(0x64, 0x74, 0x8B); // #64748B

// Dark surfaces
pub const D_BG: Color = Color::Rgb(0x0F, 0x17, 0x2A); // #0F172A
pub const D_SURFACE: Color = Color::Rgb(0x1E, 0x29, 0x3B); // #1E293B
pub const D_BORDER: Color = Color::Rgb(0x47, 0x55, 0x69); // #475569
pub const D_TEXT: Color = Color::Rgb(0xF1, 0xF5, 0xF9); // #F1F5F9
pub const D_TEXT_SECONDARY: Color = Color::Rgb(0xCB, 0xD5, 0xE1); // #CBD5E1
pub const D_TEXT_MUTED: Color = Color::Rgb(0x94, 0xA3, 0xB8); // #94A3B8

// Shared accents
pub const PRIMARY: Color = Color::Rgb(0x4F, 0x46, 0xE5); // #4F46E5
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x81, 0x8C, 0xF8); // #818CF8
pub const WARNING: Color = Color::Rgb(0xF5, 0x9E, 0x0B); // #F59E0B
pub const ERROR: Color = Color::Rgb(0xEF, 0x44, 0x44); // #EF4444
pub const INFO: Color = Color::Rgb(0x3B, 0x82, 0xF6); // #3B82F6

fn build_light_roles() -> ThemeRoles {
    ThemeRoles {
        background: L_BG,
        surface: L_SURFACE,
        border: L_BORDER,

        text: L_TEXT,
        text_secondary: L_TEXT_SECONDARY,
        text_muted: L_TEXT_MUTED,

        accent: PRIMARY,

        info: INFO,
        warning: WARNING,
        error: ERROR,

        selection_bg: PRIMARY,
        selection_fg: L_SURFACE,
        focus: PRIMARY,

        backdrop: Color::Rgb(0x94, 0xA3, 0xB8),
    }
}

fn build_dark_roles() -> ThemeRoles {
    ThemeRoles {
        background: D_BG,
        surface: D_SURFACE,
        border: D_BORDER,

        text: D_TEXT,
        text_secondary: D_TEXT_SECONDARY,
        text_muted: D_TEXT_MUTED,

        accent: PRIMARY_LIGHT,

        info: INFO,
        warning: WARNING,
        error: ERROR,

        selection_bg: PRIMARY,
        selection_fg: D_TEXT,
        focus: PRIMARY_LIGHT,

        backdrop: Color::Rgb(0x02, 0x06, 0x17),
    }
}

#[derive(Debug, Clone)]
pub struct LightTheme {
    roles: ThemeRoles,
}

impl LightTheme {
    pub fn new() -> Self {
        Self {
            roles: build_light_roles(),
        }
    }
}

impl Default for LightTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for LightTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}

#[derive(Debug, Clone)]
pub struct DarkTheme {
    roles: ThemeRoles,
}

impl DarkTheme {
    pub fn new() -> Self {
        Self {
            roles: build_dark_roles(),
        }
    }
}

impl Default for DarkTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for DarkTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
