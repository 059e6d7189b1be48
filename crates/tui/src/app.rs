//! Shell state and input handling.
//!
//! [`App`] owns the services the shell talks to and translates terminal
//! input into navigation controller calls. Work that must await (locale
//! loading, gateway fetches) is returned as [`Effect`]s for the runtime to
//! execute.

use std::{sync::Arc, time::Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use lms_api::SessionManager;
use lms_types::{Language, MenuItem, Signal, ThemeMode, User};
use lms_util::{LmsConfig, UserPreferences};
use ratatui::layout::{Position, Rect};
use tracing::debug;

use crate::{
    content::{ContentData, PageSource},
    locale::Locale,
    nav::{ContentFrame, HistoryFragment, LocationFragment, NavigationController, ShellNavigation, SidebarView},
    ui::theme::{ThemeManager, catalog as theme_catalog},
    widgets::{DropdownChange, DropdownOption, DropdownState, find_target_index_by_mouse_position},
};

pub const LANGUAGE_PICKER_ID: &str = "language";
pub const THEME_PICKER_ID: &str = "theme";

/// Deferred work for the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadLanguage(Language),
    FetchContent { page_id: String, source: PageSource },
}

/// Screen regions recorded by the last render, used for mouse routing.
#[derive(Debug, Clone, Default)]
pub struct HitAreas {
    pub sidebar: Rect,
    /// One entry per rendered menu item, in menu order.
    pub menu_items: Vec<Rect>,
    pub backdrop: Rect,
    pub sidebar_toggle: Rect,
}

pub struct App {
    pub config: LmsConfig,
    pub session: Arc<SessionManager>,
    pub locale: Locale,
    pub theme: ThemeManager,
    pub navigation: ShellNavigation,
    pub language_picker: DropdownState<Language>,
    pub theme_picker: DropdownState<ThemeMode>,
    /// Index into the active menu's items (sections excluded).
    pub menu_cursor: usize,
    pub content: ContentData,
    content_page: Option<String>,
    pub hit_areas: HitAreas,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: LmsConfig, preferences: Arc<UserPreferences>, session: Arc<SessionManager>, width: u16) -> Self {
        let locale = Locale::new(preferences.clone(), config.data_dir.as_deref());
        let theme = ThemeManager::load(preferences.clone());
        let navigation = NavigationController::new(
            Some(SidebarView::new()),
            ContentFrame::new(),
            HistoryFragment::new(),
            preferences,
            config.layout.clone(),
            u32::from(width),
        );
        let language_picker = DropdownState::new(
            LANGUAGE_PICKER_ID,
            vec![
                DropdownOption::new(Language::En, "language.en"),
                DropdownOption::new(Language::Vi, "language.vi"),
            ],
            Some(locale.language()),
        );
        let theme_picker = DropdownState::new(
            THEME_PICKER_ID,
            theme_catalog::all()
                .iter()
                .map(|definition| DropdownOption::new(definition.mode, definition.label_key))
                .collect(),
            Some(theme.mode()),
        );
        Self {
            config,
            session,
            locale,
            theme,
            navigation,
            language_picker,
            theme_picker,
            menu_cursor: 0,
            content: ContentData::Idle,
            content_page: None,
            hit_areas: HitAreas::default(),
            should_quit: false,
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }

    /// Builds the menu for the restored session and lands on its page.
    pub fn restore_session(&mut self) -> Vec<Effect> {
        self.session.load_session();
        self.navigation.build_menu(self.session.current_role());
        self.navigation.restore_from_location();
        self.sync_cursor();
        self.sync_content()
    }

    /// Applies a service signal to the navigation controller and the pickers.
    pub fn handle_signal(&mut self, signal: &Signal) -> Vec<Effect> {
        debug!(signal = ?signal, "signal received");
        self.navigation.handle_signal(signal);
        match signal {
            Signal::LanguageChanged { language } => {
                self.language_picker.set_selected(*language);
                // Rows carry formatted dates; reload them in the new language.
                self.content_page = None;
            }
            Signal::ThemeChanged { theme } => self.theme_picker.set_selected(*theme),
            Signal::UserLoggedIn { .. } => self.sync_cursor(),
            Signal::UserLoggedOut => {
                self.menu_cursor = 0;
                self.content = ContentData::Idle;
                self.content_page = None;
            }
        }
        self.sync_content()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        if let Some(effects) = self.handle_picker_key(key) {
            return effects;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return Vec::new();
        }
        let before = self.navigation.current_page_id().map(str::to_string);
        let mut effects = Vec::new();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up => self.move_cursor(false),
            KeyCode::Down => self.move_cursor(true),
            KeyCode::Enter => {
                if let Some(item) = self.cursor_item() {
                    self.navigation.activate_item(item.id);
                }
            }
            KeyCode::Char('b') => self.navigation.toggle_sidebar(),
            KeyCode::Esc => {
                if self.navigation.layout().overlay_active {
                    self.navigation.dismiss_overlay();
                }
            }
            KeyCode::Char('t') => {
                let signal = self.theme.toggle_theme();
                effects.extend(self.handle_signal(&signal));
            }
            KeyCode::Char('T') => self.theme_picker.open(),
            KeyCode::Char('l') => effects.push(Effect::LoadLanguage(self.locale.language().toggled())),
            KeyCode::Char('L') => self.language_picker.open(),
            KeyCode::Char('[') => {
                if self.navigation.fragment_mut().back() {
                    self.navigation.on_history_change();
                }
            }
            KeyCode::Char(']') => {
                if self.navigation.fragment_mut().forward() {
                    self.navigation.on_history_change();
                }
            }
            _ => {}
        }
        if self.navigation.current_page_id() != before.as_deref() {
            self.sync_cursor();
        }
        effects.extend(self.sync_content());
        effects
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let (x, y) = (mouse.column, mouse.row);
        let mut effects = Vec::new();

        let picker_open = self.language_picker.is_open() || self.theme_picker.is_open();
        if let Some(change) = self.language_picker.handle_click(x, y) {
            effects.extend(self.apply_language_change(change));
        }
        if let Some(change) = self.theme_picker.handle_click(x, y) {
            effects.extend(self.apply_theme_change(change));
        }
        if picker_open || self.language_picker.is_open() || self.theme_picker.is_open() {
            return effects;
        }

        let position = Position { x, y };
        if self.hit_areas.sidebar_toggle.contains(position) {
            self.navigation.toggle_sidebar();
        } else if let Some(index) =
            find_target_index_by_mouse_position(&self.hit_areas.sidebar, &self.hit_areas.menu_items, x, y)
        {
            if let Some(item) = self.menu_items().get(index).copied() {
                self.menu_cursor = index;
                self.navigation.activate_item(item.id);
            }
        } else if self.navigation.backdrop().is_present() && self.hit_areas.backdrop.contains(position) {
            self.navigation.dismiss_overlay();
        }
        effects.extend(self.sync_content());
        effects
    }

    pub fn handle_resize(&mut self, width: u16, now: Instant) {
        self.navigation.on_resize(u32::from(width), now);
    }

    /// Terminal focus regained: re-read the persisted session and follow
    /// system theme changes.
    pub fn handle_focus_gained(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        let previous = self.navigation.state().active_role;
        self.session.reload_on_visible();
        let current = self.session.current_role();
        if previous != current {
            debug!(previous = ?previous, current = ?current, "session changed while away");
            self.navigation.build_menu(current);
            if current.is_some() {
                self.navigation.restore_from_location();
            }
            self.sync_cursor();
        }
        if let Some(signal) = self.theme.follow_system_preference() {
            effects.extend(self.handle_signal(&signal));
        }
        effects.extend(self.sync_content());
        effects
    }

    pub fn tick(&mut self, now: Instant) {
        self.navigation.tick(now);
    }

    /// Stores fetched rows unless the user has navigated away meanwhile.
    pub fn content_loaded(&mut self, page_id: &str, data: ContentData) {
        if self.content_page.as_deref() == Some(page_id) {
            self.content = data;
        } else {
            debug!(page_id, "discarding stale content");
        }
    }

    /// Items of the active menu in render order.
    pub fn menu_items(&self) -> Vec<&'static MenuItem> {
        self.navigation
            .view()
            .map(|view| view.model().items().collect())
            .unwrap_or_default()
    }

    fn cursor_item(&self) -> Option<&'static MenuItem> {
        self.menu_items().get(self.menu_cursor).copied()
    }

    fn move_cursor(&mut self, forward: bool) {
        let count = self.menu_items().len();
        if count == 0 {
            return;
        }
        self.menu_cursor = if forward {
            (self.menu_cursor + 1) % count
        } else if self.menu_cursor == 0 {
            count - 1
        } else {
            self.menu_cursor - 1
        };
    }

    /// Keeps the cursor on the current page after navigation.
    fn sync_cursor(&mut self) {
        let items = self.menu_items();
        if let Some(index) = self
            .navigation
            .current_page_id()
            .and_then(|page_id| items.iter().position(|item| item.id == page_id))
        {
            self.menu_cursor = index;
        } else if self.menu_cursor >= items.len() {
            self.menu_cursor = 0;
        }
    }

    /// Requests data for the current page when it changed.
    fn sync_content(&mut self) -> Vec<Effect> {
        let page_id = self.navigation.current_page_id().map(str::to_string);
        if page_id == self.content_page {
            return Vec::new();
        }
        self.content_page = page_id.clone();
        let Some(page_id) = page_id else {
            self.content = ContentData::Idle;
            return Vec::new();
        };
        if self.session.current_user().is_none() {
            self.content = ContentData::Idle;
            return Vec::new();
        }
        match PageSource::for_page(&page_id) {
            Some(source) => {
                self.content = ContentData::Loading;
                vec![Effect::FetchContent { page_id, source }]
            }
            None => {
                self.content = ContentData::Unavailable;
                Vec::new()
            }
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) -> Option<Vec<Effect>> {
        if self.language_picker.is_open() {
            let change = picker_key(&mut self.language_picker, key)?;
            return Some(change.map(|change| self.apply_language_change(change)).unwrap_or_default());
        }
        if self.theme_picker.is_open() {
            let change = picker_key(&mut self.theme_picker, key)?;
            return Some(change.map(|change| self.apply_theme_change(change)).unwrap_or_default());
        }
        None
    }

    fn apply_language_change(&mut self, change: DropdownChange<Language>) -> Vec<Effect> {
        vec![Effect::LoadLanguage(change.value)]
    }

    fn apply_theme_change(&mut self, change: DropdownChange<ThemeMode>) -> Vec<Effect> {
        let signal = self.theme.set_theme(change.value);
        self.handle_signal(&signal)
    }

    /// Whether back and forward are available, for the footer.
    pub fn history_position(&self) -> (bool, bool) {
        let history = self.navigation.fragment();
        (history.can_go_back(), history.can_go_forward())
    }

    pub fn current_location(&self) -> Option<String> {
        self.navigation.fragment().read()
    }
}

/// Keyboard handling for an open picker. `None` means the key was not
/// consumed; `Some(None)` means consumed without a selection change.
fn picker_key<T: Clone + PartialEq>(
    picker: &mut DropdownState<T>,
    key: KeyEvent,
) -> Option<Option<DropdownChange<T>>> {
    match key.code {
        KeyCode::Up => picker.highlight_previous(),
        KeyCode::Down => picker.highlight_next(),
        KeyCode::Enter => return Some(picker.commit_highlighted()),
        KeyCode::Esc => picker.close(),
        _ => return None,
    }
    Some(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use lms_api::MockApi;
    use lms_types::Role;
    use lms_util::InMemorySessionStore;

    use crate::nav::SidebarState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app(width: u16) -> App {
        let preferences = Arc::new(UserPreferences::ephemeral());
        let session = Arc::new(SessionManager::new(MockApi::instant(), Arc::new(InMemorySessionStore::new())));
        App::new(LmsConfig::default(), preferences, session, width)
    }

    async fn signed_in(width: u16) -> App {
        let mut app = app(width);
        let success = app
            .session
            .login("student1", "password123", Role::Student)
            .await
            .expect("login");
        app.handle_signal(&Signal::UserLoggedIn { user: success.user });
        app
    }

    #[tokio::test]
    async fn login_lands_on_dashboard_without_data_source() {
        let app = signed_in(140).await;
        assert_eq!(app.navigation.current_page_id(), Some("dashboard"));
        assert_eq!(app.content, ContentData::Unavailable);
        assert_eq!(app.menu_cursor, 0);
    }

    #[tokio::test]
    async fn enter_navigates_and_requests_content() {
        let mut app = signed_in(140).await;
        app.handle_key(key(KeyCode::Down));
        let effects = app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.navigation.current_page_id(), Some("courses"));
        assert_eq!(
            effects,
            vec![Effect::FetchContent {
                page_id: "courses".to_string(),
                source: PageSource::Courses { own: false },
            }]
        );
        assert_eq!(app.content, ContentData::Loading);

        app.content_loaded("dashboard", ContentData::Unavailable);
        assert_eq!(app.content, ContentData::Loading);
    }

    #[tokio::test]
    async fn history_keys_walk_back_and_forward() {
        let mut app = signed_in(140).await;
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Char('[')));
        assert_eq!(app.navigation.current_page_id(), Some("dashboard"));
        assert_eq!(app.menu_cursor, 0);
        app.handle_key(key(KeyCode::Char(']')));
        assert_eq!(app.navigation.current_page_id(), Some("courses"));
    }

    #[test]
    fn sidebar_and_overlay_keys() {
        let mut app = app(140);
        app.handle_key(key(KeyCode::Char('b')));
        assert_eq!(app.navigation.sidebar_state(), SidebarState::Collapsed);

        app.navigation.apply_viewport(crate::nav::ViewportClass::Mobile, Instant::now());
        app.handle_key(key(KeyCode::Char('b')));
        assert_eq!(app.navigation.sidebar_state(), SidebarState::OverlayOpen);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.navigation.sidebar_state(), SidebarState::OverlayClosed);
    }

    #[test]
    fn language_key_defers_to_runtime() {
        let mut app = app(140);
        assert_eq!(app.handle_key(key(KeyCode::Char('l'))), vec![Effect::LoadLanguage(Language::Vi)]);
    }

    #[test]
    fn theme_picker_commits_with_enter() {
        let mut app = app(140);
        let initial = app.theme.mode();
        app.handle_key(key(KeyCode::Char('T')));
        assert!(app.theme_picker.is_open());
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.theme_picker.is_open());
        assert_eq!(app.theme.mode(), initial.toggled());
        assert_eq!(app.theme_picker.selected(), Some(&initial.toggled()));
    }

    #[tokio::test]
    async fn logout_clears_menu_and_content() {
        let mut app = signed_in(140).await;
        app.session.logout().expect("logout");
        app.handle_signal(&Signal::UserLoggedOut);
        assert!(app.menu_items().is_empty());
        assert_eq!(app.content, ContentData::Idle);
        assert_eq!(app.navigation.current_page_id(), None);
    }

    #[tokio::test]
    async fn language_change_reloads_dated_rows() {
        let mut app = signed_in(140).await;
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        app.content_loaded("courses", ContentData::Records { total: 0, lines: Vec::new() });

        let effects = app.handle_signal(&Signal::LanguageChanged { language: Language::Vi });
        assert_eq!(app.navigation.current_page_id(), Some("courses"));
        assert_eq!(app.language_picker.selected(), Some(&Language::Vi));
        assert_eq!(effects.len(), 1);
        assert_eq!(app.content, ContentData::Loading);
    }

    #[tokio::test]
    async fn signing_back_in_refetches_the_restored_page() {
        let mut app = signed_in(140).await;
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        app.content_loaded("courses", ContentData::Records { total: 0, lines: Vec::new() });

        app.session.logout().expect("logout");
        assert!(app.handle_signal(&Signal::UserLoggedOut).is_empty());
        assert_eq!(app.content, ContentData::Idle);

        let success = app
            .session
            .login("student1", "password123", Role::Student)
            .await
            .expect("login");
        let effects = app.handle_signal(&Signal::UserLoggedIn { user: success.user });
        assert_eq!(app.navigation.current_page_id(), Some("courses"));
        assert_eq!(
            effects,
            vec![Effect::FetchContent {
                page_id: "courses".to_string(),
                source: PageSource::Courses { own: false },
            }]
        );
        assert_eq!(app.content, ContentData::Loading);
    }
}
