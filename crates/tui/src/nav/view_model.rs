use lms_types::{MenuDefinition, MenuEntry, MenuItem};
use serde::Serialize;

/// One rendered line of the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MenuRow {
    Section { title_key: &'static str },
    Item { item: &'static MenuItem, active: bool },
}

impl MenuRow {
    pub fn item(&self) -> Option<&'static MenuItem> {
        match self {
            MenuRow::Item { item, .. } => Some(item),
            MenuRow::Section { .. } => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, MenuRow::Item { active: true, .. })
    }
}

/// Flattened, render-ready menu: section headers followed by their items,
/// in definition order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MenuViewModel {
    rows: Vec<MenuRow>,
}

impl MenuViewModel {
    pub fn from_definition(definition: &MenuDefinition, active_id: Option<&str>) -> Self {
        let mut rows = Vec::with_capacity(definition.item_count() + definition.entries().len());
        for entry in definition.entries() {
            match entry {
                MenuEntry::Item(item) => rows.push(item_row(item, active_id)),
                MenuEntry::Section(section) => {
                    rows.push(MenuRow::Section {
                        title_key: section.title_key,
                    });
                    rows.extend(section.items.iter().map(|item| item_row(item, active_id)));
                }
            }
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[MenuRow] {
        &self.rows
    }

    pub fn items(&self) -> impl Iterator<Item = &'static MenuItem> + '_ {
        self.rows.iter().filter_map(MenuRow::item)
    }

    pub fn item_count(&self) -> usize {
        self.items().count()
    }

    pub fn active_id(&self) -> Option<&'static str> {
        self.rows.iter().find(|row| row.is_active()).and_then(MenuRow::item).map(|item| item.id)
    }

    /// Moves the active marker; ids not present clear it.
    pub fn set_active(&mut self, active_id: Option<&str>) {
        for row in &mut self.rows {
            if let MenuRow::Item { item, active } = row {
                *active = Some(item.id) == active_id;
            }
        }
    }

    pub fn push(&mut self, row: MenuRow) {
        self.rows.push(row);
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn item_row(item: &'static MenuItem, active_id: Option<&str>) -> MenuRow {
    MenuRow::Item {
        item,
        active: Some(item.id) == active_id,
    }
}
