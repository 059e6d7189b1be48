use std::fmt::Debug;

use ratatui::style::{Color, Modifier, Style};

/// Colors a palette assigns to each part of the shell.
#[derive(Debug, Clone, Copy)]
pub struct ThemeRoles {
    pub background: Color,
    /// Panels: header, sidebar, content frame.
    pub surface: Color,
    pub border: Color,
    pub focus: Color,

    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub accent: Color,

    pub info: Color,
    pub warning: Color,
    pub error: Color,

    /// Menu cursor row.
    pub selection_bg: Color,
    pub selection_fg: Color,
    /// Dimmed layer drawn behind the mobile sidebar overlay.
    pub backdrop: Color,
}

/// A palette plus the styles the renderer derives from it.
pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }
    fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().text_secondary)
    }
    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().text_muted)
    }

    fn border_style(&self, focused: bool) -> Style {
        let roles = self.roles();
        Style::default().fg(if focused { roles.focus } else { roles.border })
    }

    fn selection_style(&self) -> Style {
        let roles = self.roles();
        Style::default().fg(roles.selection_fg).bg(roles.selection_bg)
    }

    fn backdrop_style(&self) -> Style {
        let roles = self.roles();
        Style::default().bg(roles.backdrop).fg(roles.text_muted)
    }

    // Content states
    fn status_info(&self) -> Style {
        Style::default().fg(self.roles().info)
    }
    fn status_warning(&self) -> Style {
        Style::default().fg(self.roles().warning)
    }
    fn status_error(&self) -> Style {
        Style::default().fg(self.roles().error)
    }

    fn accent_primary_style(&self) -> Style {
        Style::default().fg(self.roles().accent)
    }
    /// Title and the active menu item.
    fn accent_emphasis_style(&self) -> Style {
        self.accent_primary_style().add_modifier(Modifier::BOLD)
    }
}
