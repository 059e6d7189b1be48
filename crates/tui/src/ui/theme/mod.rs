//! Theme styling for the shell.
//!
//! Two palettes (light and dark) map onto semantic [`ThemeRoles`]; the
//! [`ThemeManager`] picks one from the stored preference or the terminal's
//! color scheme and persists explicit choices. Prefer the helpers over
//! hard-coding colors.

use std::{env, sync::Arc};

use lms_types::{Signal, ThemeMode};
use lms_util::UserPreferences;
use tracing::{debug, warn};

pub mod catalog;
pub mod helpers;
pub mod palettes;
pub mod roles;

pub use catalog::{ThemeDefinition, ThemeSwatch};
pub use palettes::{DarkTheme, LightTheme};
pub use roles::{Theme, ThemeRoles};

/// Explicit color scheme override (`light` or `dark`).
pub const COLOR_SCHEME_ENV: &str = "LMS_COLOR_SCHEME";

/// Active color scheme plus the palette built for it.
#[derive(Debug)]
pub struct ThemeManager {
    preferences: Arc<UserPreferences>,
    definition: &'static ThemeDefinition,
    theme: Box<dyn Theme>,
}

impl ThemeManager {
    /// Stored preference first, then the system color scheme, then light.
    pub fn load(preferences: Arc<UserPreferences>) -> Self {
        let mode = preferences
            .preferred_theme()
            .or_else(detect_system_preference)
            .unwrap_or_default();
        debug!(theme = %mode, "theme selected");
        let definition = catalog::definition_for(mode);
        Self {
            preferences,
            definition,
            theme: definition.build(),
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.definition.mode
    }

    pub fn definition(&self) -> &'static ThemeDefinition {
        self.definition
    }

    pub fn theme(&self) -> &dyn Theme {
        self.theme.as_ref()
    }

    /// Applies and persists `mode`.
    pub fn set_theme(&mut self, mode: ThemeMode) -> Signal {
        self.apply(mode);
        if let Err(error) = self.preferences.set_preferred_theme(mode) {
            warn!(error = %error, "failed to persist theme preference");
        }
        Signal::ThemeChanged { theme: mode }
    }

    pub fn toggle_theme(&mut self) -> Signal {
        self.set_theme(self.mode().toggled())
    }

    /// Follows a system color scheme change unless the user picked a theme.
    pub fn follow_system_preference(&mut self) -> Option<Signal> {
        if self.preferences.preferred_theme().is_some() {
            return None;
        }
        let mode = detect_system_preference()?;
        if mode == self.mode() {
            return None;
        }
        self.apply(mode);
        Some(Signal::ThemeChanged { theme: mode })
    }

    fn apply(&mut self, mode: ThemeMode) {
        self.definition = catalog::definition_for(mode);
        self.theme = self.definition.build();
    }
}

/// Reads the terminal's color scheme: `LMS_COLOR_SCHEME`, then the
/// background index in `COLORFGBG`.
pub fn detect_system_preference() -> Option<ThemeMode> {
    if let Ok(value) = env::var(COLOR_SCHEME_ENV)
        && let Ok(mode) = value.parse()
    {
        return Some(mode);
    }
    let colorfgbg = env::var("COLORFGBG").ok()?;
    let background: u8 = colorfgbg.rsplit(';').next()?.trim().parse().ok()?;
    Some(if matches!(background, 0..=6 | 8) {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    })
}
