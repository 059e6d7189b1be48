//! Responsive sidebar layout.
//!
//! The viewport class is derived from the current width; the sidebar flags
//! follow from the class and the persisted `sidebar_expanded` preference. On
//! mobile the expanded sidebar becomes an overlay bound one-to-one to a
//! backdrop, whose removal waits for the closing transition.

use std::time::{Duration, Instant};

use lms_util::LayoutConfig;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportClass {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl ViewportClass {
    /// Classifies `width`; widths strictly above a threshold belong to the
    /// wider class.
    pub fn classify(width: u32, config: &LayoutConfig) -> Self {
        if width > config.desktop_above {
            ViewportClass::Desktop
        } else if width > config.tablet_above {
            ViewportClass::Tablet
        } else {
            ViewportClass::Mobile
        }
    }

    pub fn is_mobile(self) -> bool {
        self == ViewportClass::Mobile
    }
}

/// Presentation flags applied to the sidebar container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutFlags {
    pub collapsed: bool,
    pub expanded: bool,
    pub overlay_active: bool,
}

impl LayoutFlags {
    pub fn sidebar_state(self) -> SidebarState {
        match (self.overlay_active, self.expanded, self.collapsed) {
            (true, _, _) => SidebarState::OverlayOpen,
            (false, true, _) => SidebarState::Expanded,
            (false, false, true) => SidebarState::Collapsed,
            (false, false, false) => SidebarState::OverlayClosed,
        }
    }
}

/// The four observable sidebar states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SidebarState {
    Collapsed,
    Expanded,
    OverlayOpen,
    OverlayClosed,
}

/// Derives the sidebar flags for `viewport` and the persisted preference.
pub fn apply_layout(viewport: ViewportClass, sidebar_expanded: bool) -> LayoutFlags {
    match viewport {
        ViewportClass::Desktop | ViewportClass::Tablet => LayoutFlags {
            collapsed: !sidebar_expanded,
            expanded: sidebar_expanded,
            overlay_active: false,
        },
        ViewportClass::Mobile => LayoutFlags {
            collapsed: false,
            expanded: false,
            overlay_active: sidebar_expanded,
        },
    }
}

/// Lifecycle of the mobile overlay backdrop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backdrop {
    #[default]
    Absent,
    Visible,
    /// Fading out; removed once the transition elapses.
    Closing { since: Instant },
}

impl Backdrop {
    /// Whether the backdrop currently occupies the screen.
    pub fn is_present(&self) -> bool {
        !matches!(self, Backdrop::Absent)
    }

    pub fn is_closing(&self) -> bool {
        matches!(self, Backdrop::Closing { .. })
    }

    /// Binds the backdrop to `overlay_active`.
    ///
    /// Showing cancels a pending teardown; hiding starts the closing
    /// transition unless one is already running.
    pub fn sync(&mut self, overlay_active: bool, now: Instant) {
        *self = match (*self, overlay_active) {
            (_, true) => Backdrop::Visible,
            (Backdrop::Visible, false) => Backdrop::Closing { since: now },
            (current, false) => current,
        };
    }

    /// Finalizes a closing backdrop once `transition` has elapsed. Returns
    /// true when the backdrop was removed by this call.
    pub fn tick(&mut self, now: Instant, transition: Duration) -> bool {
        if let Backdrop::Closing { since } = *self
            && now.saturating_duration_since(since) >= transition
        {
            *self = Backdrop::Absent;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_uses_strict_thresholds() {
        let config = LayoutConfig::default();
        assert_eq!(ViewportClass::classify(1025, &config), ViewportClass::Desktop);
        assert_eq!(ViewportClass::classify(1024, &config), ViewportClass::Tablet);
        assert_eq!(ViewportClass::classify(768, &config), ViewportClass::Tablet);
        assert_eq!(ViewportClass::classify(767, &config), ViewportClass::Mobile);

        let terminal = LayoutConfig::terminal();
        assert_eq!(ViewportClass::classify(120, &terminal), ViewportClass::Desktop);
        assert_eq!(ViewportClass::classify(80, &terminal), ViewportClass::Tablet);
        assert_eq!(ViewportClass::classify(79, &terminal), ViewportClass::Mobile);
    }

    #[test]
    fn apply_layout_maps_each_viewport() {
        assert_eq!(apply_layout(ViewportClass::Desktop, true).sidebar_state(), SidebarState::Expanded);
        assert_eq!(apply_layout(ViewportClass::Tablet, false).sidebar_state(), SidebarState::Collapsed);
        assert_eq!(apply_layout(ViewportClass::Mobile, true).sidebar_state(), SidebarState::OverlayOpen);
        assert_eq!(apply_layout(ViewportClass::Mobile, false).sidebar_state(), SidebarState::OverlayClosed);
        assert_eq!(
            apply_layout(ViewportClass::Mobile, true),
            LayoutFlags {
                collapsed: false,
                expanded: false,
                overlay_active: true
            }
        );
    }

    #[test]
    fn backdrop_teardown_waits_for_transition() {
        let transition = Duration::from_millis(300);
        let start = Instant::now();
        let mut backdrop = Backdrop::default();
        backdrop.sync(true, start);
        assert_eq!(backdrop, Backdrop::Visible);

        backdrop.sync(false, start);
        assert!(backdrop.is_closing());
        assert!(!backdrop.tick(start + Duration::from_millis(299), transition));
        assert!(backdrop.is_present());
        assert!(backdrop.tick(start + transition, transition));
        assert_eq!(backdrop, Backdrop::Absent);
    }

    #[test]
    fn reopening_cancels_pending_teardown() {
        let transition = Duration::from_millis(300);
        let start = Instant::now();
        let mut backdrop = Backdrop::Visible;
        backdrop.sync(false, start);
        backdrop.sync(true, start + Duration::from_millis(100));
        assert!(!backdrop.tick(start + Duration::from_secs(1), transition));
        assert_eq!(backdrop, Backdrop::Visible);
    }

    #[test]
    fn hiding_an_absent_backdrop_is_a_no_op() {
        let mut backdrop = Backdrop::Absent;
        backdrop.sync(false, Instant::now());
        assert_eq!(backdrop, Backdrop::Absent);
    }
}
