//! Select-like dropdown.
//!
//! [`DropdownState`] holds the options, the selected value, whether the list
//! is open and which option the keyboard cursor highlights. It knows nothing
//! about what the values mean: callers react to the [`DropdownChange`]
//! returned when a selection actually changes. [`render_dropdown`] draws the
//! trigger and, while open, the option list, and records their areas for
//! mouse hit-testing.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Borders, Clear, List, ListItem, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use super::find_target_index_by_mouse_position;
use crate::ui::theme::{Theme, helpers as th};

/// One selectable entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption<T> {
    pub value: T,
    /// Localizable label key.
    pub label_key: &'static str,
}

impl<T> DropdownOption<T> {
    pub fn new(value: T, label_key: &'static str) -> Self {
        Self { value, label_key }
    }
}

/// Emitted when the selected value changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownChange<T> {
    pub dropdown_id: &'static str,
    pub previous: Option<T>,
    pub value: T,
}

#[derive(Debug, Clone)]
pub struct DropdownState<T> {
    id: &'static str,
    options: Vec<DropdownOption<T>>,
    selected: Option<T>,
    open: bool,
    highlighted: usize,
    pub last_area: Rect,
    pub list_area: Rect,
    pub per_option_areas: Vec<Rect>,
}

impl<T: Clone + PartialEq> DropdownState<T> {
    pub fn new(id: &'static str, options: Vec<DropdownOption<T>>, selected: Option<T>) -> Self {
        let mut state = Self {
            id,
            options,
            selected: None,
            open: false,
            highlighted: 0,
            last_area: Rect::default(),
            list_area: Rect::default(),
            per_option_areas: Vec::new(),
        };
        if let Some(value) = selected {
            state.set_selected(value);
        }
        state
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn options(&self) -> &[DropdownOption<T>] {
        &self.options
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.as_ref()
    }

    pub fn selected_option(&self) -> Option<&DropdownOption<T>> {
        let selected = self.selected.as_ref()?;
        self.options.iter().find(|option| &option.value == selected)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Reflects an externally changed value without emitting a change.
    /// Values that are not options are ignored.
    pub fn set_selected(&mut self, value: T) {
        if let Some(index) = self.index_of(&value) {
            self.selected = Some(value);
            self.highlighted = index;
        }
    }

    pub fn toggle(&mut self) {
        if self.open { self.close() } else { self.open() }
    }

    /// Opens the list with the cursor on the selected option.
    pub fn open(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.open = true;
        self.highlighted = self.selected.as_ref().and_then(|value| self.index_of(value)).unwrap_or(0);
    }

    pub fn close(&mut self) {
        self.open = false;
        self.list_area = Rect::default();
        self.per_option_areas.clear();
    }

    /// Move the highlight to the next option, wrapping at the end.
    pub fn highlight_next(&mut self) {
        if self.options.is_empty() {
            return;
        }
        self.highlighted = (self.highlighted + 1) % self.options.len();
    }

    /// Move the highlight to the previous option, wrapping to the end.
    pub fn highlight_previous(&mut self) {
        if self.options.is_empty() {
            return;
        }
        if self.highlighted == 0 {
            self.highlighted = self.options.len() - 1;
        } else {
            self.highlighted -= 1;
        }
    }

    /// Selects `value` and closes the list. Returns a change only when the
    /// value is an option and differs from the current selection.
    pub fn select(&mut self, value: T) -> Option<DropdownChange<T>> {
        self.close();
        let index = self.index_of(&value)?;
        self.highlighted = index;
        if self.selected.as_ref() == Some(&value) {
            return None;
        }
        let previous = self.selected.replace(value.clone());
        Some(DropdownChange {
            dropdown_id: self.id,
            previous,
            value,
        })
    }

    /// Selects the highlighted option.
    pub fn commit_highlighted(&mut self) -> Option<DropdownChange<T>> {
        let value = self.options.get(self.highlighted)?.value.clone();
        self.select(value)
    }

    /// Closes the list when a click lands outside both the trigger and the
    /// list. Returns true when this call closed it.
    pub fn close_on_outside_click(&mut self, x: u16, y: u16) -> bool {
        if !self.open {
            return false;
        }
        let position = Position { x, y };
        if self.last_area.contains(position) || self.list_area.contains(position) {
            return false;
        }
        self.close();
        true
    }

    /// Routes a left click: the trigger toggles, an option selects, anything
    /// else closes an open list.
    pub fn handle_click(&mut self, x: u16, y: u16) -> Option<DropdownChange<T>> {
        if self.open
            && let Some(index) = find_target_index_by_mouse_position(&self.list_area, &self.per_option_areas, x, y)
        {
            let value = self.options.get(index)?.value.clone();
            return self.select(value);
        }
        if self.last_area.contains(Position { x, y }) {
            self.toggle();
            return None;
        }
        self.close_on_outside_click(x, y);
        None
    }

    fn index_of(&self, value: &T) -> Option<usize> {
        self.options.iter().position(|option| &option.value == value)
    }
}

/// Draws the trigger in `area` and, while open, the option list beneath it.
///
/// `label` resolves an option's label key to display text.
pub fn render_dropdown<T, F>(frame: &mut Frame, area: Rect, state: &mut DropdownState<T>, theme: &dyn Theme, label: F)
where
    T: Clone + PartialEq,
    F: Fn(&DropdownOption<T>) -> String,
{
    let current = state.selected_option().map(&label).unwrap_or_default();
    let marker = if state.is_open() { "▴" } else { "▾" };
    let trigger = Line::from(vec![
        Span::styled(current, theme.text_primary_style()),
        Span::styled(format!(" {marker}"), theme.accent_primary_style()),
    ]);
    frame.render_widget(Paragraph::new(trigger).style(th::panel_style(theme)), area);
    state.last_area = area;

    if !state.is_open() {
        return;
    }

    let bounds = frame.area();
    let height = (state.options().len() as u16 + 2).min(bounds.height.saturating_sub(area.bottom()));
    let width = state
        .options()
        .iter()
        .map(|option| label(option).width() as u16 + 4)
        .max()
        .unwrap_or(area.width)
        .max(area.width)
        .min(bounds.width.saturating_sub(area.x));
    let list_area = Rect::new(area.x, area.bottom(), width, height);
    if list_area.height <= 2 {
        state.close();
        return;
    }

    let items: Vec<ListItem> = state
        .options()
        .iter()
        .enumerate()
        .map(|(index, option)| {
            let mut style = theme.text_primary_style();
            if index == state.highlighted() {
                style = theme.selection_style().add_modifier(Modifier::BOLD);
            }
            ListItem::new(Line::from(Span::styled(label(option), style)))
        })
        .collect();

    frame.render_widget(Clear, list_area);
    frame.render_widget(List::new(items).block(th::block(theme, None, true).borders(Borders::ALL)), list_area);

    let inner_x = list_area.x + 1;
    let inner_width = list_area.width.saturating_sub(2);
    let visible = list_area.height.saturating_sub(2) as usize;
    state.list_area = list_area;
    state.per_option_areas = (0..state.options().len().min(visible))
        .map(|index| Rect::new(inner_x, list_area.y + 1 + index as u16, inner_width, 1))
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn languages() -> DropdownState<&'static str> {
        DropdownState::new(
            "language",
            vec![
                DropdownOption::new("en", "language.en"),
                DropdownOption::new("vi", "language.vi"),
            ],
            Some("en"),
        )
    }

    #[test]
    fn select_reports_only_real_changes() {
        let mut dropdown = languages();
        assert!(dropdown.select("en").is_none());
        assert!(dropdown.select("fr").is_none());
        let change = dropdown.select("vi").expect("change");
        assert_eq!(change.previous, Some("en"));
        assert_eq!(change.value, "vi");
        assert_eq!(change.dropdown_id, "language");
        assert_eq!(dropdown.selected(), Some(&"vi"));
    }

    #[test]
    fn highlight_wraps_and_commits() {
        let mut dropdown = languages();
        dropdown.open();
        assert_eq!(dropdown.highlighted(), 0);
        dropdown.highlight_previous();
        assert_eq!(dropdown.highlighted(), 1);
        dropdown.highlight_next();
        assert_eq!(dropdown.highlighted(), 0);
        dropdown.highlight_next();
        let change = dropdown.commit_highlighted().expect("change");
        assert_eq!(change.value, "vi");
        assert!(!dropdown.is_open());
    }

    #[test]
    fn open_starts_on_selected_option() {
        let mut dropdown = languages();
        dropdown.set_selected("vi");
        dropdown.toggle();
        assert!(dropdown.is_open());
        assert_eq!(dropdown.highlighted(), 1);
        dropdown.toggle();
        assert!(!dropdown.is_open());
    }

    #[test]
    fn clicks_route_to_trigger_options_or_outside() {
        let mut dropdown = languages();
        dropdown.last_area = Rect::new(10, 0, 12, 1);
        assert!(dropdown.handle_click(12, 0).is_none());
        assert!(dropdown.is_open());

        dropdown.list_area = Rect::new(10, 1, 16, 4);
        dropdown.per_option_areas = vec![Rect::new(11, 2, 14, 1), Rect::new(11, 3, 14, 1)];
        let change = dropdown.handle_click(12, 3).expect("option click");
        assert_eq!(change.value, "vi");
        assert!(!dropdown.is_open());

        dropdown.open();
        dropdown.list_area = Rect::new(10, 1, 16, 4);
        assert!(dropdown.close_on_outside_click(0, 20));
        assert!(!dropdown.close_on_outside_click(0, 20));
    }

    #[test]
    fn empty_dropdown_never_opens() {
        let mut dropdown: DropdownState<u8> = DropdownState::new("empty", Vec::new(), Some(1));
        dropdown.open();
        assert!(!dropdown.is_open());
        assert!(dropdown.selected().is_none());
        assert!(dropdown.commit_highlighted().is_none());
    }
}
