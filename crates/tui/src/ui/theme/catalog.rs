use lms_types::ThemeMode;
use ratatui::style::Color;

use super::{
    DarkTheme, LightTheme, Theme,
    palettes::{D_BG, L_BG, PRIMARY, PRIMARY_LIGHT},
};

/// Describes a selectable color scheme.
#[derive(Clone, Copy, Debug)]
pub struct ThemeDefinition {
    pub mode: ThemeMode,
    /// Label key shown in the theme picker.
    pub label_key: &'static str,
    pub swatch: ThemeSwatch,
    factory: fn() -> Box<dyn Theme>,
}

impl ThemeDefinition {
    /// Instantiate the theme represented by this definition.
    pub fn build(&self) -> Box<dyn Theme> {
        (self.factory)()
    }
}

/// Color chips summarizing a palette inside the picker.
#[derive(Clone, Copy, Debug)]
pub struct ThemeSwatch {
    pub background: Color,
    pub accent: Color,
}

pub const THEME_DEFINITIONS: &[ThemeDefinition] = &[
    ThemeDefinition {
        mode: ThemeMode::Light,
        label_key: "theme.light",
        swatch: ThemeSwatch {
            background: L_BG,
            accent: PRIMARY,
        },
        factory: || Box::new(LightTheme::new()),
    },
    ThemeDefinition {
        mode: ThemeMode::Dark,
        label_key: "theme.dark",
        swatch: ThemeSwatch {
            background: D_BG,
            accent: PRIMARY_LIGHT,
        },
        factory: || Box::new(DarkTheme::new()),
    },
];

pub fn all() -> &'static [ThemeDefinition] {
    THEME_DEFINITIONS
}

/// Definition for `mode`. Every mode is registered.
pub fn definition_for(mode: ThemeMode) -> &'static ThemeDefinition {
    match mode {
        ThemeMode::Light => &THEME_DEFINITIONS[0],
        ThemeMode::Dark => &THEME_DEFINITIONS[1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mode_resolves_to_its_definition() {
        for mode in ThemeMode::ALL {
            assert_eq!(definition_for(mode).mode, mode);
        }
        assert_eq!(all().len(), ThemeMode::ALL.len());
    }
}
