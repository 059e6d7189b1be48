//! Reusable stateful widgets.

pub mod dropdown;

pub use dropdown::{DropdownChange, DropdownOption, DropdownState, render_dropdown};

use ratatui::layout::{Position, Rect};

/// Index of the area under the pointer, if the pointer is inside `container`.
pub fn find_target_index_by_mouse_position(container: &Rect, item_areas: &[Rect], x: u16, y: u16) -> Option<usize> {
    let position = Position { x, y };
    if !container.contains(position) {
        return None;
    }
    item_areas.iter().position(|area| area.contains(position))
}
