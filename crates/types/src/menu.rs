//! Role-scoped menu model.
//!
//! A [`MenuDefinition`] is an ordered list of top-level items and sections.
//! Order is meaningful (grouping and priority), so every accessor here walks
//! entries in definition order. Definitions are static tables compiled into
//! the shell, which is why the fields borrow `'static` strings.

use std::collections::HashSet;

use serde::Serialize;

/// A navigable page reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Identifier unique within one role's flattened tree; doubles as the
    /// location fragment value.
    pub id: &'static str,
    /// Icon identifier (Font Awesome name in the original markup).
    pub icon: &'static str,
    /// Localizable label key (dotted path).
    pub label_key: &'static str,
    /// URI of the content loaded into the content surface.
    pub target: &'static str,
}

/// A titled group of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuSection {
    /// Localizable section title key.
    pub title_key: &'static str,
    pub items: &'static [MenuItem],
}

/// One top-level entry of a menu definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MenuEntry {
    Item(MenuItem),
    Section(MenuSection),
}

/// Where an item lives inside a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuLocation {
    /// Enclosing section, `None` for top-level items.
    pub section: Option<&'static MenuSection>,
    pub item: &'static MenuItem,
}

/// Ordered menu tree for one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MenuDefinition {
    entries: &'static [MenuEntry],
}

impl MenuDefinition {
    pub const EMPTY: MenuDefinition = MenuDefinition { entries: &[] };

    pub const fn new(entries: &'static [MenuEntry]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [MenuEntry] {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every item in definition order, paired with its enclosing section.
    pub fn locations(&self) -> impl Iterator<Item = MenuLocation> + 'static {
        let entries: &'static [MenuEntry] = self.entries;
        entries.iter().flat_map(|entry| -> Box<dyn Iterator<Item = MenuLocation>> {
            match entry {
                MenuEntry::Item(item) => Box::new(std::iter::once(MenuLocation { section: None, item })),
                MenuEntry::Section(section) => Box::new(
                    section
                        .items
                        .iter()
                        .map(move |item| MenuLocation { section: Some(section), item }),
                ),
            }
        })
    }

    /// Number of items in the flattened tree (sections themselves excluded).
    pub fn item_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                MenuEntry::Item(_) => 1,
                MenuEntry::Section(section) => section.items.len(),
            })
            .sum()
    }

    /// First location whose item id matches `page_id`.
    ///
    /// Top-level items are checked before descending into the section that
    /// follows them, mirroring a single in-order walk.
    pub fn find(&self, page_id: &str) -> Option<MenuLocation> {
        self.locations().find(|location| location.item.id == page_id)
    }

    /// First top-level item, or the first nested item when the definition has
    /// no top-level items at all.
    pub fn default_item(&self) -> Option<&'static MenuItem> {
        self.entries
            .iter()
            .find_map(|entry| match entry {
                MenuEntry::Item(item) => Some(item),
                MenuEntry::Section(_) => None,
            })
            .or_else(|| self.locations().next().map(|location| location.item))
    }

    /// Item ids that occur more than once, in first-repeat order.
    pub fn duplicate_ids(&self) -> Vec<&'static str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for location in self.locations() {
            if !seen.insert(location.item.id) && !duplicates.contains(&location.item.id) {
                duplicates.push(location.item.id);
            }
        }
        duplicates
    }
}

impl Default for MenuDefinition {
    fn default() -> Self {
        Self::EMPTY
    }
}
