//! Gateway data shown in the content panel.
//!
//! Pages map to a data source by id; pages without one only show their
//! target. Fetches run off the UI task and report back as [`ContentData`].

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use lms_api::{CourseFilter, CourseSort, QuizFilter, SessionManager, UserFilter};
use lms_types::{ApiResponse, Language, Role};
use lms_util::{DateStyle, format_date};
use tracing::debug;

/// Rows shown per page in the content panel.
const CONTENT_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSource {
    Courses { own: bool },
    Quizzes,
    Progress,
    Users { students_only: bool },
    Profile,
}

impl PageSource {
    pub fn for_page(page_id: &str) -> Option<Self> {
        match page_id {
            "courses" | "categories" => Some(PageSource::Courses { own: false }),
            "my-courses" => Some(PageSource::Courses { own: true }),
            "quizzes" | "quiz-builder" | "quiz-templates" | "quiz-monitoring" | "quiz-results" | "quiz-analytics" => {
                Some(PageSource::Quizzes)
            }
            "progress" | "results" => Some(PageSource::Progress),
            "users" => Some(PageSource::Users { students_only: false }),
            "students" => Some(PageSource::Users { students_only: true }),
            "profile" => Some(PageSource::Profile),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContentData {
    #[default]
    Idle,
    Loading,
    Records {
        total: usize,
        lines: Vec<String>,
    },
    Failed(String),
    /// The page has no data source.
    Unavailable,
}

/// Fetches the rows for `source` on behalf of the signed-in user, with
/// dates written for `language`.
pub async fn fetch_page_data(session: Arc<SessionManager>, source: PageSource, language: Language) -> ContentData {
    let api = session.api();
    let user = session.current_user();
    debug!(source = ?source, "fetching content");
    match source {
        PageSource::Courses { own } => {
            let teacher_id = match (&user, own) {
                (Some(user), true) if user.role == Role::Teacher => Some(user.id.clone()),
                _ => None,
            };
            let filter = CourseFilter {
                teacher_id,
                sort_by: Some(CourseSort::Title),
                limit: Some(CONTENT_LIMIT),
                ..CourseFilter::default()
            };
            records(api.get_courses(&filter).await, |course| {
                format!(
                    "{} · {} · {} enrolled · {}",
                    course.title,
                    course.status,
                    course.enrolled_count,
                    short_date(&course.created_at, language)
                )
            })
        }
        PageSource::Quizzes => {
            let filter = QuizFilter {
                limit: Some(CONTENT_LIMIT),
                ..QuizFilter::default()
            };
            records(api.get_quizzes(&filter).await, |quiz| {
                format!("{} · {} · pass {}%", quiz.title, quiz.status, quiz.passing_score)
            })
        }
        PageSource::Progress => {
            let Some(user) = user else {
                return ContentData::Unavailable;
            };
            records(api.get_user_progress(&user.id, None).await, |progress| {
                let mut line = format!(
                    "{} · {}/{} lessons · {}%",
                    progress.course_id, progress.completed_lessons, progress.total_lessons, progress.percentage
                );
                if let Some(updated_at) = &progress.updated_at {
                    line.push_str(" · ");
                    line.push_str(&short_date(updated_at, language));
                }
                line
            })
        }
        PageSource::Users { students_only } => {
            let filter = UserFilter {
                role: students_only.then_some(Role::Student),
                limit: Some(CONTENT_LIMIT),
                ..UserFilter::default()
            };
            records(api.get_users(&filter).await, |user| {
                let status = if user.is_active { "active" } else { "inactive" };
                format!("{} · {} · {} · {}", user.display_name(), user.username, user.role, status)
            })
        }
        PageSource::Profile => {
            let Some(user) = user else {
                return ContentData::Unavailable;
            };
            match api.get_user_profile(&user.id).await.into_result() {
                Ok(profile) => ContentData::Records {
                    total: 1,
                    lines: vec![
                        format!("{} ({})", profile.display_name(), profile.username),
                        profile.email.clone(),
                        profile.role.to_string(),
                    ],
                },
                Err(error) => ContentData::Failed(error),
            }
        }
    }
}

fn short_date(at: &DateTime<Utc>, language: Language) -> String {
    format_date(&at.with_timezone(&Local), DateStyle::Short, language)
}

fn records<T>(response: ApiResponse<Vec<T>>, line: impl Fn(&T) -> String) -> ContentData {
    let total = response.meta.page.map(|page| page.total);
    match response.into_result() {
        Ok(items) => ContentData::Records {
            total: total.unwrap_or(items.len()),
            lines: items.iter().map(line).collect(),
        },
        Err(error) => ContentData::Failed(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lms_api::MockApi;
    use lms_util::InMemorySessionStore;

    fn session() -> Arc<SessionManager> {
        Arc::new(SessionManager::new(MockApi::instant(), Arc::new(InMemorySessionStore::new())))
    }

    #[test]
    fn pages_map_to_sources() {
        assert_eq!(PageSource::for_page("my-courses"), Some(PageSource::Courses { own: true }));
        assert_eq!(PageSource::for_page("quiz-analytics"), Some(PageSource::Quizzes));
        assert_eq!(PageSource::for_page("students"), Some(PageSource::Users { students_only: true }));
        assert_eq!(PageSource::for_page("dashboard"), None);
    }

    #[tokio::test]
    async fn courses_report_total_and_lines() {
        let data = fetch_page_data(session(), PageSource::Courses { own: false }, Language::En).await;
        let ContentData::Records { total, lines } = data else {
            panic!("expected records, got {data:?}");
        };
        assert_eq!(total, 14);
        assert!(lines[0].starts_with("Algorithms in Practice"));
    }

    #[tokio::test]
    async fn user_scoped_pages_need_a_session() {
        assert_eq!(fetch_page_data(session(), PageSource::Progress, Language::En).await, ContentData::Unavailable);

        let session = session();
        session.login("student1", "password123", Role::Student).await.expect("login");
        let ContentData::Records { total, .. } = fetch_page_data(session, PageSource::Progress, Language::En).await else {
            panic!("expected progress rows");
        };
        assert_eq!(total, 2);
    }
}
