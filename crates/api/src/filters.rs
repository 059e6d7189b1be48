//! Query filters accepted by the list endpoints, plus shared pagination.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use lms_types::{Course, PageMeta, Role};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_COURSE_LIMIT: usize = 12;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    pub role: Option<Role>,
    /// Case-insensitive match against username, email and full name.
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseSort {
    /// Alphabetical by title, ignoring case.
    Title,
    /// Newest first.
    Created,
    /// Most enrolled first.
    Students,
}

impl CourseSort {
    pub(crate) fn compare(self, a: &Course, b: &Course) -> Ordering {
        match self {
            CourseSort::Title => a
                .title
                .to_lowercase()
                .cmp(&b.title.to_lowercase())
                .then_with(|| a.title.cmp(&b.title)),
            CourseSort::Created => b.created_at.cmp(&a.created_at),
            CourseSort::Students => b.enrolled_count.cmp(&a.enrolled_count),
        }
    }
}

impl fmt::Display for CourseSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CourseSort::Title => "title",
            CourseSort::Created => "created",
            CourseSort::Students => "students",
        })
    }
}

impl FromStr for CourseSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(CourseSort::Title),
            "created" => Ok(CourseSort::Created),
            "students" => Ok(CourseSort::Students),
            other => Err(format!("unknown sort key '{other}'; expected title, created or students")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseFilter {
    /// Category id.
    pub category: Option<String>,
    /// Case-insensitive match against title and description.
    pub search: Option<String>,
    pub status: Option<String>,
    pub teacher_id: Option<String>,
    pub sort_by: Option<CourseSort>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizFilter {
    pub course_id: Option<String>,
    pub status: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Slices one page out of `items`. Page numbers start at 1; a page or limit
/// of zero is treated as unset.
pub fn paginate<T>(items: Vec<T>, page: Option<usize>, limit: Option<usize>, default_limit: usize) -> (Vec<T>, PageMeta) {
    let page = page.filter(|page| *page > 0).unwrap_or(DEFAULT_PAGE);
    let limit = limit.filter(|limit| *limit > 0).unwrap_or(default_limit);
    let meta = PageMeta::new(items.len(), page, limit);
    let start = (page - 1).saturating_mul(limit);
    let slice = items.into_iter().skip(start).take(limit).collect();
    (slice, meta)
}

pub(crate) fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_defaults_and_bounds() {
        let (page, meta) = paginate((1..=25).collect::<Vec<_>>(), None, None, DEFAULT_LIMIT);
        assert_eq!(page, (1..=10).collect::<Vec<_>>());
        assert_eq!(meta, PageMeta::new(25, 1, 10));
        assert_eq!(meta.total_pages, 3);

        let (page, meta) = paginate((1..=25).collect::<Vec<_>>(), Some(3), None, DEFAULT_LIMIT);
        assert_eq!(page, vec![21, 22, 23, 24, 25]);
        assert_eq!(meta.page, 3);

        let (page, _) = paginate((1..=5).collect::<Vec<_>>(), Some(9), Some(2), DEFAULT_LIMIT);
        assert!(page.is_empty());
    }

    #[test]
    fn zero_page_and_limit_fall_back_to_defaults() {
        let (page, meta) = paginate(vec!['a', 'b', 'c'], Some(0), Some(0), 2);
        assert_eq!(page, vec!['a', 'b']);
        assert_eq!((meta.page, meta.limit, meta.total_pages), (1, 2, 2));
    }

    #[test]
    fn sort_keys_parse() {
        assert_eq!("Students".parse::<CourseSort>(), Ok(CourseSort::Students));
        assert!("rating".parse::<CourseSort>().is_err());
    }
}
