use crate::{Language, ThemeMode, User};

/// Application-wide notifications raised by the session, locale and theme
/// services and consumed by the navigation controller and the shell.
///
/// Services return signals instead of broadcasting them; the owner of the
/// services decides who hears about them.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// A login succeeded; the payload carries the user and therefore the role.
    UserLoggedIn { user: User },
    /// The session was cleared.
    UserLoggedOut,
    /// A translation mapping finished loading for `language`.
    LanguageChanged { language: Language },
    /// The active color scheme changed.
    ThemeChanged { theme: ThemeMode },
}
