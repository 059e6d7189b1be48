use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use lms_types::{MenuDefinition, MenuItem, Role, Signal};
use lms_util::{Debouncer, LayoutConfig, UserPreferences};
use tracing::{debug, warn};

use super::{
    breadcrumb::{Breadcrumb, compute_breadcrumb},
    catalog::menu_for,
    layout::{Backdrop, LayoutFlags, SidebarState, ViewportClass, apply_layout},
    sinks::{ContentSurface, LocationFragment, MenuView},
    view_model::MenuViewModel,
};

/// Per-session navigation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub active_role: Option<Role>,
    /// Id of the page last navigated to, unset until the first navigation.
    pub current_page_id: Option<String>,
    /// Persisted under `lms-sidebar-state`.
    pub sidebar_expanded: bool,
    pub viewport: ViewportClass,
}

/// Drives the sidebar, the content surface and the location fragment.
///
/// The controller owns its sinks and never fails. Without a menu view it is
/// inert: navigation, restore and sidebar changes do nothing. Unknown roles
/// render an empty menu; unknown fragments fall back to the role's default
/// page.
pub struct NavigationController<V, C, L> {
    view: Option<V>,
    content: C,
    fragment: L,
    preferences: Arc<UserPreferences>,
    config: LayoutConfig,
    state: NavigationState,
    definition: &'static MenuDefinition,
    breadcrumb: Breadcrumb,
    layout: LayoutFlags,
    backdrop: Backdrop,
    resize: Debouncer<u32>,
}

impl<V, C, L> NavigationController<V, C, L>
where
    V: MenuView,
    C: ContentSurface,
    L: LocationFragment,
{
    /// Builds the controller for a viewport `width` wide. The sidebar flag is
    /// read from `preferences`; with nothing saved it starts expanded, except
    /// on mobile where the overlay starts closed.
    pub fn new(
        view: Option<V>,
        content: C,
        fragment: L,
        preferences: Arc<UserPreferences>,
        config: LayoutConfig,
        width: u32,
    ) -> Self {
        let viewport = ViewportClass::classify(width, &config);
        let sidebar_expanded = preferences.sidebar_expanded().unwrap_or(!viewport.is_mobile());
        let resize = Debouncer::new(Duration::from_millis(config.resize_debounce_ms));
        let mut controller = Self {
            view,
            content,
            fragment,
            preferences,
            config,
            state: NavigationState {
                active_role: None,
                current_page_id: None,
                sidebar_expanded,
                viewport,
            },
            definition: &MenuDefinition::EMPTY,
            breadcrumb: Breadcrumb::home(),
            layout: LayoutFlags::default(),
            backdrop: Backdrop::Absent,
            resize,
        };
        controller.update_layout(Instant::now());
        controller
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn current_page_id(&self) -> Option<&str> {
        self.state.current_page_id.as_deref()
    }

    pub fn definition(&self) -> &'static MenuDefinition {
        self.definition
    }

    pub fn breadcrumb(&self) -> &Breadcrumb {
        &self.breadcrumb
    }

    pub fn layout(&self) -> LayoutFlags {
        self.layout
    }

    pub fn sidebar_state(&self) -> SidebarState {
        self.layout.sidebar_state()
    }

    pub fn backdrop(&self) -> Backdrop {
        self.backdrop
    }

    /// Whether a menu view is attached.
    pub fn is_attached(&self) -> bool {
        self.view.is_some()
    }

    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    pub fn content(&self) -> &C {
        &self.content
    }

    pub fn fragment(&self) -> &L {
        &self.fragment
    }

    pub fn fragment_mut(&mut self) -> &mut L {
        &mut self.fragment
    }

    /// Renders the menu for `role` into the view.
    ///
    /// The previous rows are cleared first; the current page keeps its active
    /// marker only when the new menu also lists it.
    pub fn build_menu(&mut self, role: Option<Role>) {
        self.state.active_role = role;
        let Some(view) = self.view.as_mut() else {
            debug!(role = ?role, "no menu view attached; skipping menu build");
            return;
        };

        let definition = menu_for(role);
        let duplicates = definition.duplicate_ids();
        if !duplicates.is_empty() {
            warn!(role = ?role, ids = ?duplicates, "menu definition repeats item ids");
        }

        let model = MenuViewModel::from_definition(definition, self.state.current_page_id.as_deref());
        view.clear();
        for row in model.rows() {
            view.append(row);
        }
        view.refresh_labels();

        self.definition = definition;
        self.breadcrumb = compute_breadcrumb(definition, self.state.current_page_id.as_deref());
        debug!(role = ?role, items = model.item_count(), "menu built");
    }

    /// Loads `target` into the content surface and records `page_id` as the
    /// current page.
    pub fn navigate_to(&mut self, target: &str, page_id: Option<&str>) {
        if !self.is_attached() {
            debug!(content_target = target, "no menu view attached; ignoring navigation");
            return;
        }
        self.content.load(target);
        self.state.current_page_id = page_id.map(str::to_string);
        if let Some(view) = self.view.as_mut() {
            view.set_active(page_id);
        }
        self.breadcrumb = compute_breadcrumb(self.definition, page_id);
        if let Some(page_id) = page_id {
            self.fragment.write(page_id);
        }
        debug!(content_target = target, page_id = ?page_id, "navigated");
    }

    /// Navigates to the page named by the location fragment, or to the
    /// role's default page when the fragment is empty or unknown.
    pub fn restore_from_location(&mut self) {
        if !self.is_attached() {
            return;
        }
        let fragment = self.fragment.read();
        let known = fragment
            .as_deref()
            .and_then(|page_id| self.definition.find(page_id))
            .map(|location| location.item);
        if known.is_none()
            && let Some(page_id) = fragment.as_deref()
        {
            debug!(page_id, "location names no page in the active menu; using default");
        }
        if let Some(item) = known.or_else(|| self.definition.default_item()) {
            self.navigate_to(item.target, Some(item.id));
        }
    }

    /// Activates the menu item `page_id`. Returns false when the active menu
    /// does not list it.
    pub fn activate_item(&mut self, page_id: &str) -> bool {
        let Some(item) = self.find_item(page_id) else {
            return false;
        };
        self.navigate_to(item.target, Some(item.id));
        true
    }

    pub fn find_item(&self, page_id: &str) -> Option<&'static MenuItem> {
        self.definition.find(page_id).map(|location| location.item)
    }

    /// Back/forward moved the location fragment.
    pub fn on_history_change(&mut self) {
        self.restore_from_location();
    }

    /// Re-resolves labels and the breadcrumb without touching navigation
    /// state.
    pub fn on_language_changed(&mut self) {
        self.breadcrumb = compute_breadcrumb(self.definition, self.state.current_page_id.as_deref());
        if let Some(view) = self.view.as_mut() {
            view.refresh_labels();
        }
    }

    pub fn handle_signal(&mut self, signal: &Signal) {
        match signal {
            Signal::UserLoggedIn { user } => {
                self.build_menu(Some(user.role));
                self.restore_from_location();
            }
            Signal::UserLoggedOut => {
                self.state.current_page_id = None;
                self.build_menu(None);
            }
            Signal::LanguageChanged { .. } => self.on_language_changed(),
            Signal::ThemeChanged { .. } => {}
        }
    }

    /// Flips the sidebar, persists the flag and re-applies the layout.
    pub fn toggle_sidebar(&mut self) {
        self.toggle_sidebar_at(Instant::now());
    }

    pub fn toggle_sidebar_at(&mut self, now: Instant) {
        if !self.is_attached() {
            debug!("no menu view attached; ignoring sidebar toggle");
            return;
        }
        self.state.sidebar_expanded = !self.state.sidebar_expanded;
        self.update_layout(now);
        if let Err(error) = self.preferences.set_sidebar_expanded(self.state.sidebar_expanded) {
            warn!(error = %error, "failed to persist sidebar state");
        }
    }

    /// Backdrop click: closes the mobile overlay without persisting.
    pub fn dismiss_overlay(&mut self) {
        self.dismiss_overlay_at(Instant::now());
    }

    pub fn dismiss_overlay_at(&mut self, now: Instant) {
        if !self.is_attached() {
            return;
        }
        self.state.sidebar_expanded = false;
        self.update_layout(now);
    }

    /// Records a viewport width; applied once resizing settles.
    pub fn on_resize(&mut self, width: u32, now: Instant) {
        self.resize.trigger(width, now);
    }

    /// Applies a settled resize and finalizes a closing backdrop.
    pub fn tick(&mut self, now: Instant) {
        if let Some(width) = self.resize.poll(now) {
            self.apply_viewport(ViewportClass::classify(width, &self.config), now);
        }
        if self
            .backdrop
            .tick(now, Duration::from_millis(self.config.backdrop_transition_ms))
        {
            debug!("backdrop removed");
        }
    }

    /// Re-evaluates the layout under `viewport` immediately.
    pub fn apply_viewport(&mut self, viewport: ViewportClass, now: Instant) {
        if viewport != self.state.viewport {
            debug!(from = ?self.state.viewport, to = ?viewport, "viewport class changed");
        }
        self.state.viewport = viewport;
        self.update_layout(now);
    }

    /// Earliest instant at which [`Self::tick`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        let backdrop = match self.backdrop {
            Backdrop::Closing { since } => Some(since + Duration::from_millis(self.config.backdrop_transition_ms)),
            _ => None,
        };
        match (self.resize.deadline(), backdrop) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn update_layout(&mut self, now: Instant) {
        self.layout = apply_layout(self.state.viewport, self.state.sidebar_expanded);
        self.backdrop.sync(self.layout.overlay_active, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::sinks::{ContentFrame, HistoryFragment, SidebarView};

    fn controller(width: u32) -> NavigationController<SidebarView, ContentFrame, HistoryFragment> {
        NavigationController::new(
            Some(SidebarView::new()),
            ContentFrame::new(),
            HistoryFragment::new(),
            Arc::new(UserPreferences::ephemeral()),
            LayoutConfig::default(),
            width,
        )
    }

    #[test]
    fn sidebar_defaults_to_expanded() {
        let nav = controller(1280);
        assert!(nav.state().sidebar_expanded);
        assert_eq!(nav.sidebar_state(), SidebarState::Expanded);
    }

    #[test]
    fn fresh_mobile_launch_keeps_the_overlay_closed() {
        let nav = controller(375);
        assert!(!nav.state().sidebar_expanded);
        assert_eq!(nav.sidebar_state(), SidebarState::OverlayClosed);
        assert_eq!(nav.backdrop(), Backdrop::Absent);
    }

    #[test]
    fn persisted_sidebar_flag_is_honored() {
        let preferences = Arc::new(UserPreferences::ephemeral());
        preferences.set_sidebar_expanded(false).expect("persist");
        let nav: NavigationController<SidebarView, ContentFrame, HistoryFragment> = NavigationController::new(
            None,
            ContentFrame::new(),
            HistoryFragment::new(),
            preferences,
            LayoutConfig::default(),
            1280,
        );
        assert_eq!(nav.sidebar_state(), SidebarState::Collapsed);
    }

    #[test]
    fn activate_item_ignores_unknown_ids() {
        let mut nav = controller(1280);
        nav.build_menu(Some(Role::Student));
        assert!(!nav.activate_item("users"));
        assert!(nav.activate_item("courses"));
        assert_eq!(nav.content().target(), Some("pages/courses.html"));
        assert_eq!(nav.fragment().read().as_deref(), Some("courses"));
    }

    #[test]
    fn next_deadline_tracks_pending_work() {
        let mut nav = controller(1280);
        assert!(nav.next_deadline().is_none());
        let now = Instant::now();
        nav.on_resize(600, now);
        assert_eq!(nav.next_deadline(), Some(now + Duration::from_millis(250)));
        nav.tick(now + Duration::from_millis(250));
        assert_eq!(nav.sidebar_state(), SidebarState::OverlayOpen);
        assert!(nav.next_deadline().is_none());
    }
}
