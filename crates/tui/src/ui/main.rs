//! Frame rendering.
//!
//! Reads the controller's view-model (sidebar rows, breadcrumb, layout flags)
//! and draws header, sidebar, breadcrumb, content and footer. Areas needed
//! for mouse routing are recorded on [`App::hit_areas`].

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::{
    app::App,
    content::ContentData,
    nav::{MenuRow, SidebarState},
    ui::theme::{Theme, helpers as th},
    widgets::render_dropdown,
};

const SIDEBAR_EXPANDED_WIDTH: u16 = 30;
const SIDEBAR_COLLAPSED_WIDTH: u16 = 6;
const THEME_PICKER_WIDTH: u16 = 14;
const LANGUAGE_PICKER_WIDTH: u16 = 16;
const CRUMB_SEPARATOR: &str = " › ";

/// Terminal glyph for a menu icon id.
pub fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "fa-chart-line" => "📈",
        "fa-chart-bar" => "📊",
        "fa-book" => "📚",
        "fa-book-open" => "📖",
        "fa-file-alt" => "📝",
        "fa-trophy" => "🏆",
        "fa-certificate" => "🎓",
        "fa-comments" => "💬",
        "fa-user" => "👤",
        "fa-users" => "👥",
        "fa-user-shield" => "🛡",
        "fa-folder" => "📁",
        "fa-hammer" => "🔨",
        "fa-school" | "fa-chalkboard" => "🏫",
        "fa-calendar-check" => "📅",
        "fa-clipboard-check" | "fa-clipboard-list" => "📋",
        "fa-desktop" => "🖥",
        "fa-cogs" => "⚙",
        "fa-vial" => "🧪",
        _ => "•",
    }
}

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(th::app_style(app.theme.theme())), area);

    let [header, body, footer] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)]).areas(area);

    draw_header(frame, header, app);

    let state = app.navigation.sidebar_state();
    let docked_width = match state {
        SidebarState::Expanded => SIDEBAR_EXPANDED_WIDTH.min(body.width / 2),
        SidebarState::Collapsed => SIDEBAR_COLLAPSED_WIDTH.min(body.width),
        SidebarState::OverlayOpen | SidebarState::OverlayClosed => 0,
    };
    let [sidebar, main] = Layout::horizontal([Constraint::Length(docked_width), Constraint::Min(0)]).areas(body);

    app.hit_areas.sidebar = Rect::default();
    app.hit_areas.menu_items.clear();
    app.hit_areas.backdrop = Rect::default();
    if docked_width > 0 {
        draw_sidebar(frame, sidebar, app, state == SidebarState::Collapsed);
    }
    draw_main(frame, main, app);

    if app.navigation.backdrop().is_present() {
        let theme = app.theme.theme();
        let mut style = theme.backdrop_style();
        if app.navigation.backdrop().is_closing() {
            style = style.add_modifier(Modifier::DIM);
        }
        frame.render_widget(Block::default().style(style), body);
        app.hit_areas.backdrop = body;
    }
    if state == SidebarState::OverlayOpen {
        let width = SIDEBAR_EXPANDED_WIDTH.min(body.width.saturating_mul(3) / 4).max(1);
        let overlay = Rect::new(body.x, body.y, width, body.height);
        frame.render_widget(Clear, overlay);
        draw_sidebar(frame, overlay, app, false);
    }

    draw_footer(frame, footer, app);
    draw_pickers(frame, app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.theme.theme();
    let block = th::block(theme, None, false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [toggle, title, theme_area, language_area] = Layout::horizontal([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(THEME_PICKER_WIDTH),
        Constraint::Length(LANGUAGE_PICKER_WIDTH),
    ])
    .areas(inner);

    frame.render_widget(Paragraph::new(Span::styled("☰", theme.accent_emphasis_style())), toggle);
    app.hit_areas.sidebar_toggle = toggle;

    let mut spans = vec![Span::styled(app.locale.translate("app.title").into_owned(), theme.accent_emphasis_style())];
    match app.session.current_user() {
        Some(user) => {
            let role = app.locale.translate(&format!("roles.{}", user.role)).into_owned();
            spans.push(Span::styled(format!("  {} · {}", user.display_name(), role), theme.text_secondary_style()));
        }
        None => spans.push(Span::styled(
            format!("  {}", app.locale.translate("common.login")),
            theme.text_muted_style(),
        )),
    }
    if app.config.debug {
        spans.push(Span::styled(format!("  [{}]", app.config.environment), theme.text_muted_style()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), title);

    let [swatch_area, theme_area] = Layout::horizontal([Constraint::Length(2), Constraint::Min(0)]).areas(theme_area);
    let swatch = app.theme.definition().swatch;
    frame.render_widget(
        Paragraph::new(Span::styled("■", Style::default().fg(swatch.accent).bg(swatch.background))),
        swatch_area,
    );

    app.theme_picker.last_area = theme_area;
    app.language_picker.last_area = language_area;
}

fn draw_sidebar(frame: &mut Frame, area: Rect, app: &mut App, collapsed: bool) {
    let theme = app.theme.theme();
    let title = if collapsed { None } else { Some("Menu") };
    let block = th::block(theme, title, false);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.hit_areas.sidebar = area;
    app.hit_areas.menu_items.clear();

    let Some(view) = app.navigation.view() else {
        return;
    };

    // (line, item index) pairs; sections carry no item index.
    let mut lines: Vec<(Line, Option<usize>)> = Vec::new();
    let mut item_index = 0;
    for row in view.rows() {
        match row {
            MenuRow::Section { title_key } => {
                if collapsed {
                    continue;
                }
                let text = app.locale.translate(title_key).to_uppercase();
                lines.push((Line::from(Span::styled(text, th::section_title_style(theme))), None));
            }
            MenuRow::Item { item, active } => {
                let highlighted = item_index == app.menu_cursor;
                let style = th::menu_item_style(theme, *active, highlighted);
                let glyph = icon_glyph(item.icon);
                let text = if collapsed {
                    format!(" {glyph}")
                } else {
                    format!(" {glyph} {}", app.locale.translate(item.label_key))
                };
                lines.push((Line::from(Span::styled(text, style)), Some(item_index)));
                item_index += 1;
            }
        }
    }

    let height = usize::from(inner.height);
    let cursor_line = lines
        .iter()
        .position(|(_, index)| *index == Some(app.menu_cursor))
        .unwrap_or(0);
    let offset = (cursor_line + 1).saturating_sub(height);

    let mut item_areas = Vec::new();
    for (row, (line, index)) in lines.into_iter().skip(offset).take(height).enumerate() {
        let row_area = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
        frame.render_widget(Paragraph::new(line), row_area);
        if let Some(index) = index {
            item_areas.push((index, row_area));
        }
    }
    // Items scrolled out of view keep an empty area so indices line up.
    let total_items = item_index;
    let mut areas = vec![Rect::default(); total_items];
    for (index, row_area) in item_areas {
        areas[index] = row_area;
    }
    app.hit_areas.menu_items = areas;
}

fn draw_main(frame: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.theme.theme();
    let [crumbs, content] = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    let mut spans = Vec::new();
    for (index, crumb) in app.navigation.breadcrumb().crumbs().iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(CRUMB_SEPARATOR, theme.text_muted_style()));
        }
        spans.push(Span::styled(
            app.locale.translate(crumb.label_key).into_owned(),
            th::crumb_style(theme, crumb.is_current),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(th::app_style(theme)), crumbs);

    let title = app
        .navigation
        .current_page_id()
        .and_then(|page_id| app.navigation.find_item(page_id))
        .map(|item| app.locale.translate(item.label_key).into_owned())
        .unwrap_or_else(|| app.locale.translate("dashboard.overview").into_owned());
    let block = th::block(theme, Some(title.as_str()), true);

    let mut lines = Vec::new();
    if app.session.current_user().is_none() {
        lines.push(Line::from(Span::styled(
            app.locale.translate("auth.notSignedIn").into_owned(),
            theme.status_warning(),
        )));
    } else if let Some(target) = app.navigation.content().target() {
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", app.locale.translate("content.target")), theme.text_muted_style()),
            Span::styled(target.to_string(), theme.accent_primary_style()),
        ]));
        lines.push(Line::default());
        match &app.content {
            ContentData::Idle => {}
            ContentData::Loading => lines.push(Line::from(Span::styled(
                app.locale.translate("common.loading").into_owned(),
                theme.status_info(),
            ))),
            ContentData::Records { total, lines: rows } => {
                let count = total.to_string();
                lines.push(Line::from(Span::styled(
                    app.locale.translate_with("content.records", &[("count", &count)]),
                    theme.text_secondary_style(),
                )));
                if rows.is_empty() {
                    lines.push(Line::from(Span::styled(
                        app.locale.translate("common.noData").into_owned(),
                        theme.text_muted_style(),
                    )));
                }
                lines.extend(rows.iter().map(|row| Line::from(Span::styled(format!("  {row}"), theme.text_primary_style()))));
            }
            ContentData::Failed(error) => lines.push(Line::from(Span::styled(
                format!("{}: {error}", app.locale.translate("common.error")),
                theme.status_error(),
            ))),
            ContentData::Unavailable => lines.push(Line::from(Span::styled(
                app.locale.translate("content.unavailable").into_owned(),
                theme.text_muted_style(),
            ))),
        }
    } else {
        lines.push(Line::from(Span::styled(
            app.locale.translate("dashboard.welcome").into_owned(),
            theme.text_primary_style(),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), content);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let theme = app.theme.theme();
    let (can_back, can_forward) = app.history_position();
    let mut spans = vec![
        Span::styled(if can_back { "◀ " } else { "  " }, theme.text_muted_style()),
        Span::styled(if can_forward { "▶ " } else { "  " }, theme.text_muted_style()),
    ];
    if let Some(location) = app.current_location() {
        spans.push(Span::styled(format!("#{location}  "), theme.accent_primary_style()));
    }
    spans.push(Span::styled(
        app.locale.translate("shell.hints").into_owned(),
        theme.text_muted_style(),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)).style(th::app_style(theme)), area);
}

fn draw_pickers(frame: &mut Frame, app: &mut App) {
    let theme = app.theme.theme();
    let locale = &app.locale;
    let theme_area = app.theme_picker.last_area;
    render_dropdown(frame, theme_area, &mut app.theme_picker, theme, |option| {
        locale.translate(option.label_key).into_owned()
    });
    let language_area = app.language_picker.last_area;
    render_dropdown(frame, language_area, &mut app.language_picker, theme, |option| {
        locale.translate(option.label_key).into_owned()
    });
}
