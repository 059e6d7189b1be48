use ratatui::{
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.text_secondary_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Style for panel-like containers (set background on widget using `.style`).
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

/// Root background behind every panel.
pub fn app_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { background, text, .. } = *theme.roles();
    Style::default().bg(background).fg(text)
}

/// Section header inside the sidebar.
pub fn section_title_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme.text_muted_style().add_modifier(Modifier::BOLD)
}

/// Menu item style: the active page is emphasized, the cursor row is
/// selected.
pub fn menu_item_style<T: Theme + ?Sized>(theme: &T, active: bool, highlighted: bool) -> Style {
    let mut style = if active {
        theme.accent_emphasis_style()
    } else {
        theme.text_primary_style()
    };
    if highlighted {
        style = style.patch(theme.selection_style());
    }
    style
}

/// Breadcrumb style: the current crumb stands out, links stay muted.
pub fn crumb_style<T: Theme + ?Sized>(theme: &T, is_current: bool) -> Style {
    if is_current {
        theme.text_primary_style().add_modifier(Modifier::BOLD)
    } else {
        theme.text_muted_style()
    }
}
