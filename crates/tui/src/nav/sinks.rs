//! Side-effect sinks driven by the navigation controller.
//!
//! The controller never renders; it pushes rows into a [`MenuView`], points a
//! [`ContentSurface`] at a target and records the page in a
//! [`LocationFragment`]. The shell implementations below keep just enough
//! state for the ratatui renderer and for back/forward history.

use super::view_model::{MenuRow, MenuViewModel};

/// Menu container.
pub trait MenuView {
    /// Removes every rendered row.
    fn clear(&mut self);
    /// Appends one row after the existing ones.
    fn append(&mut self, row: &MenuRow);
    /// Marks the item with `id` active and every other item inactive.
    fn set_active(&mut self, id: Option<&str>);
    /// Re-resolves localized labels.
    fn refresh_labels(&mut self);
}

impl<T: MenuView + ?Sized> MenuView for Box<T> {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn append(&mut self, row: &MenuRow) {
        (**self).append(row);
    }

    fn set_active(&mut self, id: Option<&str>) {
        (**self).set_active(id);
    }

    fn refresh_labels(&mut self) {
        (**self).refresh_labels();
    }
}

/// The frame that shows page content.
pub trait ContentSurface {
    fn load(&mut self, target: &str);
}

/// Addressable location of the current page.
pub trait LocationFragment {
    fn read(&self) -> Option<String>;
    fn write(&mut self, value: &str);
}

/// Sidebar rows held for the renderer.
#[derive(Debug, Clone, Default)]
pub struct SidebarView {
    model: MenuViewModel,
    label_generation: u64,
}

impl SidebarView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(&self) -> &MenuViewModel {
        &self.model
    }

    pub fn rows(&self) -> &[MenuRow] {
        self.model.rows()
    }

    /// Bumped on every label refresh so cached labels can be invalidated.
    pub fn label_generation(&self) -> u64 {
        self.label_generation
    }
}

impl MenuView for SidebarView {
    fn clear(&mut self) {
        self.model.clear();
    }

    fn append(&mut self, row: &MenuRow) {
        self.model.push(*row);
    }

    fn set_active(&mut self, id: Option<&str>) {
        self.model.set_active(id);
    }

    fn refresh_labels(&mut self) {
        self.label_generation = self.label_generation.wrapping_add(1);
    }
}

/// Content panel state: the last loaded target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFrame {
    target: Option<String>,
    loads: usize,
}

impl ContentFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn load_count(&self) -> usize {
        self.loads
    }
}

impl ContentSurface for ContentFrame {
    fn load(&mut self, target: &str) {
        self.target = Some(target.to_string());
        self.loads += 1;
    }
}

/// In-memory location history with back/forward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFragment {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl HistoryFragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `initial` as the current location.
    pub fn starting_at(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            cursor: Some(0),
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor.is_some_and(|cursor| cursor > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor.is_some_and(|cursor| cursor + 1 < self.entries.len())
    }

    /// Steps back one entry. Returns false at the start of history.
    pub fn back(&mut self) -> bool {
        match self.cursor {
            Some(cursor) if cursor > 0 => {
                self.cursor = Some(cursor - 1);
                true
            }
            _ => false,
        }
    }

    /// Steps forward one entry. Returns false at the end of history.
    pub fn forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.cursor = self.cursor.map(|cursor| cursor + 1);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LocationFragment for HistoryFragment {
    fn read(&self) -> Option<String> {
        self.cursor.and_then(|cursor| self.entries.get(cursor)).cloned()
    }

    /// Pushes `value` unless it is already current; drops forward entries.
    fn write(&mut self, value: &str) {
        if self.read().as_deref() == Some(value) {
            return;
        }
        let keep = self.cursor.map_or(0, |cursor| cursor + 1);
        self.entries.truncate(keep);
        self.entries.push(value.to_string());
        self.cursor = Some(self.entries.len() - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_write_truncates_forward_entries() {
        let mut history = HistoryFragment::new();
        assert_eq!(history.read(), None);
        history.write("dashboard");
        history.write("courses");
        history.write("courses");
        assert_eq!(history.len(), 2);

        assert!(history.back());
        assert_eq!(history.read().as_deref(), Some("dashboard"));
        assert!(history.can_go_forward());

        history.write("profile");
        assert!(!history.can_go_forward());
        assert_eq!(history.len(), 2);
        assert!(!history.forward());
    }

    #[test]
    fn back_and_forward_stop_at_the_ends() {
        let mut history = HistoryFragment::starting_at("a");
        assert!(!history.back());
        history.write("b");
        assert!(history.back());
        assert!(history.forward());
        assert_eq!(history.read().as_deref(), Some("b"));
        assert!(!history.forward());
    }

    #[test]
    fn content_frame_counts_loads() {
        let mut frame = ContentFrame::new();
        frame.load("pages/courses.html");
        frame.load("pages/courses.html");
        assert_eq!(frame.target(), Some("pages/courses.html"));
        assert_eq!(frame.load_count(), 2);
    }
}
