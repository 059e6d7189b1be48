use lms_types::MenuDefinition;
use serde::Serialize;

/// Label key of the leading crumb.
pub const HOME_LABEL_KEY: &str = "nav.home";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbCrumb {
    pub label_key: &'static str,
    /// Set on the crumb naming the current page.
    pub is_current: bool,
}

impl BreadcrumbCrumb {
    const fn link(label_key: &'static str) -> Self {
        Self {
            label_key,
            is_current: false,
        }
    }
}

/// Ordered crumbs, always starting with Home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Breadcrumb {
    crumbs: Vec<BreadcrumbCrumb>,
}

impl Breadcrumb {
    pub fn home() -> Self {
        Self {
            crumbs: vec![BreadcrumbCrumb::link(HOME_LABEL_KEY)],
        }
    }

    pub fn crumbs(&self) -> &[BreadcrumbCrumb] {
        &self.crumbs
    }

    pub fn label_keys(&self) -> Vec<&'static str> {
        self.crumbs.iter().map(|crumb| crumb.label_key).collect()
    }

    pub fn len(&self) -> usize {
        self.crumbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crumbs.is_empty()
    }
}

impl Default for Breadcrumb {
    fn default() -> Self {
        Self::home()
    }
}

/// Derives the crumb trail for `page_id` within `definition`.
///
/// `[Home, item]` for a top-level item, `[Home, section, item]` for a nested
/// one, `[Home]` when the id is unset or unknown.
pub fn compute_breadcrumb(definition: &MenuDefinition, page_id: Option<&str>) -> Breadcrumb {
    let mut breadcrumb = Breadcrumb::home();
    let Some(location) = page_id.and_then(|page_id| definition.find(page_id)) else {
        return breadcrumb;
    };
    if let Some(section) = location.section {
        breadcrumb.crumbs.push(BreadcrumbCrumb::link(section.title_key));
    }
    breadcrumb.crumbs.push(BreadcrumbCrumb {
        label_key: location.item.label_key,
        is_current: true,
    });
    breadcrumb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::catalog::{ADMIN_MENU, STUDENT_MENU};

    #[test]
    fn nested_item_includes_section_title() {
        let breadcrumb = compute_breadcrumb(&STUDENT_MENU, Some("progress"));
        assert_eq!(breadcrumb.label_keys(), vec![HOME_LABEL_KEY, "nav.sections.learning", "nav.progress"]);
        let current: Vec<bool> = breadcrumb.crumbs().iter().map(|crumb| crumb.is_current).collect();
        assert_eq!(current, vec![false, false, true]);
    }

    #[test]
    fn top_level_item_has_two_crumbs() {
        let breadcrumb = compute_breadcrumb(&ADMIN_MENU, Some("dashboard"));
        assert_eq!(breadcrumb.label_keys(), vec![HOME_LABEL_KEY, "nav.dashboard"]);
    }

    #[test]
    fn unknown_or_unset_page_yields_home_only() {
        assert_eq!(compute_breadcrumb(&STUDENT_MENU, Some("users")), Breadcrumb::home());
        assert_eq!(compute_breadcrumb(&STUDENT_MENU, None), Breadcrumb::home());
        assert_eq!(compute_breadcrumb(&MenuDefinition::EMPTY, Some("dashboard")).len(), 1);
    }

    #[test]
    fn computation_is_repeatable() {
        let first = compute_breadcrumb(&ADMIN_MENU, Some("reports"));
        let second = compute_breadcrumb(&ADMIN_MENU, Some("reports"));
        assert_eq!(first, second);
    }
}
