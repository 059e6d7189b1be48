//! Mock data gateway.
//!
//! Every call sleeps for a random latency inside the configured window, may
//! fail with a simulated network error, then answers from the fixture files.
//! Failures are folded into the [`ApiResponse`] envelope; callers never see a
//! Rust error from this module.

use std::time::Duration;

use chrono::Utc;
use indexmap::IndexMap;
use lms_types::{ApiResponse, Course, Lesson, Progress, Question, QuestionResult, Quiz, QuizSubmission, Role, User};
use lms_util::{ApiConfig, LmsConfig, generate_id, random_unit};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::filters::{
    CourseFilter, DEFAULT_COURSE_LIMIT, DEFAULT_LIMIT, QuizFilter, UserFilter, contains_ignore_case, paginate,
};
use crate::fixtures::{
    COURSES_FILE, FixtureError, Fixtures, LESSONS_FILE, PROGRESS_FILE, QUESTIONS_FILE, QUIZZES_FILE, USERS_FILE,
};

pub const NETWORK_ERROR: &str = "Network error occurred";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const USERNAME_TAKEN: &str = "Username already exists";
pub const USER_NOT_FOUND: &str = "User not found";
pub const COURSE_NOT_FOUND: &str = "Course not found";
pub const QUIZ_NOT_FOUND: &str = "Quiz not found";

/// User id recorded on quiz submissions; the gateway has no notion of who is signed in.
pub const SUBMITTER_PLACEHOLDER: &str = "current-user";

/// Fixture user record. The password stays on this private type.
#[derive(Deserialize)]
struct UserRecord {
    #[serde(flatten)]
    user: User,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginPayload {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterPayload {
    pub user: User,
    pub message: String,
}

/// Fixture-backed stand-in for the LMS backend.
#[derive(Debug, Clone)]
pub struct MockApi {
    config: ApiConfig,
    fixtures: Fixtures,
}

impl MockApi {
    pub fn new(config: ApiConfig, fixtures: Fixtures) -> Self {
        Self { config, fixtures }
    }

    /// Gateway configured from the environment settings, honoring `data_dir`.
    pub fn from_config(config: &LmsConfig) -> Self {
        let fixtures = match &config.data_dir {
            Some(dir) => Fixtures::with_override_dir(dir),
            None => Fixtures::embedded(),
        };
        Self::new(config.api.clone(), fixtures)
    }

    /// Embedded fixtures with no latency and no simulated failures.
    pub fn instant() -> Self {
        Self::new(ApiConfig::instant(), Fixtures::embedded())
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub async fn login(&self, username: &str, password: &str, role: Role) -> ApiResponse<LoginPayload> {
        if let Some(failure) = self.network().await {
            return failure;
        }
        settle(self.fixtures.load::<UserRecord>(USERS_FILE).map(|records| {
            let matched = records
                .into_iter()
                .find(|record| record.user.username == username && record.password == password && record.user.role == role);
            match matched {
                Some(record) => {
                    let token = format!("mock-token-{}-{}", record.user.id, Utc::now().timestamp_millis());
                    debug!(user_id = %record.user.id, %role, "Mock login accepted");
                    ApiResponse::ok(LoginPayload {
                        user: record.user,
                        token,
                    })
                }
                None => ApiResponse::fail(INVALID_CREDENTIALS),
            }
        }))
    }

    /// Accepts a new account without storing it.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResponse<RegisterPayload> {
        if let Some(failure) = self.network().await {
            return failure;
        }
        settle(self.fixtures.load::<UserRecord>(USERS_FILE).map(|records| {
            if records.iter().any(|record| record.user.username == request.username) {
                return ApiResponse::fail(USERNAME_TAKEN);
            }
            let user = User {
                id: generate_id("user"),
                username: request.username.clone(),
                email: request.email.clone(),
                full_name: request.full_name.clone().unwrap_or_else(|| request.username.clone()),
                role: request.role,
                avatar: None,
                created_at: Some(Utc::now()),
                last_login: None,
                is_active: true,
            };
            ApiResponse::ok(RegisterPayload {
                user,
                message: "Registration successful".to_string(),
            })
        }))
    }

    pub async fn get_users(&self, filter: &UserFilter) -> ApiResponse<Vec<User>> {
        if let Some(failure) = self.network().await {
            return failure;
        }
        settle(self.fixtures.load::<UserRecord>(USERS_FILE).map(|records| {
            let search = filter.search.as_deref().map(str::to_lowercase);
            let users: Vec<User> = records
                .into_iter()
                .map(|record| record.user)
                .filter(|user| filter.role.is_none_or(|role| user.role == role))
                .filter(|user| {
                    search.as_deref().is_none_or(|needle| {
                        contains_ignore_case(&user.username, needle)
                            || contains_ignore_case(&user.email, needle)
                            || contains_ignore_case(&user.full_name, needle)
                    })
                })
                .filter(|user| filter.is_active.is_none_or(|active| user.is_active == active))
                .collect();
            let (page, meta) = paginate(users, filter.page, filter.limit, DEFAULT_LIMIT);
            ApiResponse::ok(page).with_page(meta)
        }))
    }

    pub async fn get_user_profile(&self, user_id: &str) -> ApiResponse<User> {
        if let Some(failure) = self.network().await {
            return failure;
        }
        settle(self.fixtures.load::<UserRecord>(USERS_FILE).map(|records| {
            match records.into_iter().find(|record| record.user.id == user_id) {
                Some(record) => ApiResponse::ok(record.user),
                None => ApiResponse::fail(USER_NOT_FOUND),
            }
        }))
    }

    /// Echoes the merged profile back; nothing is stored.
    pub async fn update_user_profile(&self, user_id: &str, updates: Map<String, Value>) -> ApiResponse<Value> {
        if let Some(failure) = self.network().await {
            return failure;
        }
        let mut record = Map::new();
        record.insert("id".to_string(), Value::String(user_id.to_string()));
        record.extend(updates);
        record.remove("password");
        record.insert("updatedAt".to_string(), Value::String(Utc::now().to_rfc3339()));
        ApiResponse::ok(Value::Object(record)).with_message("Profile updated successfully")
    }

    pub async fn get_courses(&self, filter: &CourseFilter) -> ApiResponse<Vec<Course>> {
        if let Some(failure) = self.network().await {
            return failure;
        }
        settle(self.fixtures.load::<Course>(COURSES_FILE).map(|courses| {
            let search = filter.search.as_deref().map(str::to_lowercase);
            let mut courses: Vec<Course> = courses
                .into_iter()
                .filter(|course| {
                    filter
                        .category
                        .as_deref()
                        .is_none_or(|category| course.category_id.as_deref() == Some(category))
                })
                .filter(|course| {
                    search.as_deref().is_none_or(|needle| {
                        contains_ignore_case(&course.title, needle) || contains_ignore_case(&course.description, needle)
                    })
                })
                .filter(|course| filter.status.as_deref().is_none_or(|status| course.status == status))
                .filter(|course| {
                    filter
                        .teacher_id
                        .as_deref()
                        .is_none_or(|teacher| course.teacher_id.as_deref() == Some(teacher))
                })
                .collect();
            if let Some(sort) = filter.sort_by {
                courses.sort_by(|a, b| sort.compare(a, b));
            }
            let (page, meta) = paginate(courses, filter.page, filter.limit, DEFAULT_COURSE_LIMIT);
            ApiResponse::ok(page).with_page(meta)
        }))
    }

    /// Single course with its lessons attached.
    pub async fn get_course(&self, course_id: &str) -> ApiResponse<Course> {
        if let Some(failure) = self.network().await {
            return failure;
        }
        settle(self.course_with_lessons(course_id))
    }

    /// Echoes a new course with generated id and zeroed counters; nothing is stored.
    pub async fn create_course(&self, data: Map<String, Value>) -> ApiResponse<Value> {
        if let Some(failure) = self.network().await {
            return failure;
        }
        let now = Value::String(Utc::now().to_rfc3339());
        let mut record = Map::new();
        record.insert("id".to_string(), Value::String(generate_id("course")));
        record.extend(data);
        record.insert("enrolledCount".to_string(), Value::from(0));
        record.insert("rating".to_string(), Value::from(0));
        record.insert("reviewCount".to_string(), Value::from(0));
        record.insert("createdAt".to_string(), now.clone());
        record.insert("updatedAt".to_string(), now);
        ApiResponse::ok(Value::Object(record)).with_message("Course created successfully")
    }

    pub async fn update_course(&self, course_id: &str, updates: Map<String, Value>) -> ApiResponse<Value> {
        if let Some(failure) = self.network().await {
            return failure;
        }
        let mut record = Map::new();
        record.insert("id".to_string(), Value::String(course_id.to_string()));
        record.extend(updates);
        record.insert("updatedAt".to_string(), Value::String(Utc::now().to_rfc3339()));
        ApiResponse::ok(Value::Object(record)).with_message("Course updated successfully")
    }

    pub async fn get_quizzes(&self, filter: &QuizFilter) -> ApiResponse<Vec<Quiz>> {
        if let Some(failure) = self.network().await {
            return failure;
        }
        settle(self.fixtures.load::<Quiz>(QUIZZES_FILE).map(|quizzes| {
            let quizzes: Vec<Quiz> = quizzes
                .into_iter()
                .filter(|quiz| filter.course_id.as_deref().is_none_or(|course| quiz.course_id == course))
                .filter(|quiz| filter.status.as_deref().is_none_or(|status| quiz.status == status))
                .collect();
            let (page, meta) = paginate(quizzes, filter.page, filter.limit, DEFAULT_LIMIT);
            ApiResponse::ok(page).with_page(meta)
        }))
    }

    /// Single quiz with its questions attached.
    pub async fn get_quiz(&self, quiz_id: &str) -> ApiResponse<Quiz> {
        if let Some(failure) = self.network().await {
            return failure;
        }
        settle(self.quiz_with_questions(quiz_id))
    }

    /// Grades `answers` (question id to chosen option) against the quiz key.
    pub async fn submit_quiz(&self, quiz_id: &str, answers: &IndexMap<String, String>) -> ApiResponse<QuizSubmission> {
        if let Some(failure) = self.network().await {
            return failure;
        }
        let quiz = match self.quiz_with_questions(quiz_id) {
            Ok(response) => match response.into_result() {
                Ok(quiz) => quiz,
                Err(error) => return ApiResponse::fail(error),
            },
            Err(error) => return fixture_failure(error),
        };

        let mut score = 0;
        let results: Vec<QuestionResult> = quiz
            .questions
            .iter()
            .map(|question| {
                let user_answer = answers.get(&question.id).cloned();
                let is_correct = user_answer.as_deref() == Some(question.correct_answer.as_str());
                let points = if is_correct { question.points } else { 0 };
                score += points;
                QuestionResult {
                    question_id: question.id.clone(),
                    user_answer,
                    correct_answer: question.correct_answer.clone(),
                    is_correct,
                    points,
                }
            })
            .collect();
        let total_points: u32 = quiz.questions.iter().map(|question| question.points).sum();
        let percentage = if total_points == 0 {
            0
        } else {
            (f64::from(score) / f64::from(total_points) * 100.0).round() as u32
        };
        let passed = percentage >= quiz.passing_score;

        let submission = QuizSubmission {
            id: generate_id("submission"),
            quiz_id: quiz.id,
            user_id: SUBMITTER_PLACEHOLDER.to_string(),
            score,
            total_points,
            percentage,
            passed,
            results,
            answers: answers.clone(),
            submitted_at: Utc::now(),
        };
        let message = if passed { "Congratulations! You passed the quiz." } else { "You did not pass. Try again!" };
        ApiResponse::ok(submission).with_message(message)
    }

    pub async fn get_user_progress(&self, user_id: &str, course_id: Option<&str>) -> ApiResponse<Vec<Progress>> {
        if let Some(failure) = self.network().await {
            return failure;
        }
        settle(self.fixtures.load::<Progress>(PROGRESS_FILE).map(|progress| {
            let rows = progress
                .into_iter()
                .filter(|row| row.user_id == user_id)
                .filter(|row| course_id.is_none_or(|course| row.course_id == course))
                .collect();
            ApiResponse::ok(rows)
        }))
    }

    pub async fn update_lesson_progress(
        &self,
        user_id: &str,
        lesson_id: &str,
        progress: Map<String, Value>,
    ) -> ApiResponse<Value> {
        if let Some(failure) = self.network().await {
            return failure;
        }
        let mut record = Map::new();
        record.insert("id".to_string(), Value::String(generate_id("progress")));
        record.insert("userId".to_string(), Value::String(user_id.to_string()));
        record.insert("lessonId".to_string(), Value::String(lesson_id.to_string()));
        record.extend(progress);
        record.insert("updatedAt".to_string(), Value::String(Utc::now().to_rfc3339()));
        ApiResponse::ok(Value::Object(record)).with_message("Progress updated")
    }

    fn course_with_lessons(&self, course_id: &str) -> Result<ApiResponse<Course>, FixtureError> {
        let courses = self.fixtures.load::<Course>(COURSES_FILE)?;
        let Some(mut course) = courses.into_iter().find(|course| course.id == course_id) else {
            return Ok(ApiResponse::fail(COURSE_NOT_FOUND));
        };
        let lessons = self.fixtures.load::<Lesson>(LESSONS_FILE)?;
        course.lessons = lessons.into_iter().filter(|lesson| lesson.course_id == course_id).collect();
        Ok(ApiResponse::ok(course))
    }

    fn quiz_with_questions(&self, quiz_id: &str) -> Result<ApiResponse<Quiz>, FixtureError> {
        let quizzes = self.fixtures.load::<Quiz>(QUIZZES_FILE)?;
        let Some(mut quiz) = quizzes.into_iter().find(|quiz| quiz.id == quiz_id) else {
            return Ok(ApiResponse::fail(QUIZ_NOT_FOUND));
        };
        let questions = self.fixtures.load::<Question>(QUESTIONS_FILE)?;
        quiz.questions = questions
            .into_iter()
            .filter(|question| quiz.question_ids.contains(&question.id))
            .collect();
        Ok(ApiResponse::ok(quiz))
    }

    /// Sleeps for the simulated latency, then rolls for a network failure.
    async fn network<T>(&self) -> Option<ApiResponse<T>> {
        let delay = self.latency();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.config.error_rate > 0.0 && random_unit().is_some_and(|roll| roll < self.config.error_rate) {
            debug!(error_rate = self.config.error_rate, "Simulated network failure");
            return Some(ApiResponse::fail(NETWORK_ERROR));
        }
        None
    }

    fn latency(&self) -> Duration {
        let min = self.config.base_delay_ms.min(self.config.max_delay_ms);
        let max = self.config.base_delay_ms.max(self.config.max_delay_ms);
        if max == 0 {
            return Duration::ZERO;
        }
        let span = (max - min + 1) as f64;
        let offset = random_unit().map(|roll| (roll * span).floor() as u64).unwrap_or(0);
        Duration::from_millis(min + offset.min(max - min))
    }
}

fn settle<T>(result: Result<ApiResponse<T>, FixtureError>) -> ApiResponse<T> {
    result.unwrap_or_else(fixture_failure)
}

fn fixture_failure<T>(error: FixtureError) -> ApiResponse<T> {
    warn!(error = %error, "Fixture load failed");
    ApiResponse::fail(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::CourseSort;
    use serde_json::json;

    #[tokio::test]
    async fn login_strips_password_and_issues_token() {
        let api = MockApi::instant();
        let response = api.login("student1", "password123", Role::Student).await;
        assert!(response.success);
        let payload = response.data.unwrap();
        assert_eq!(payload.user.id, "u001");
        assert!(payload.token.starts_with("mock-token-u001-"));
        let serialized = serde_json::to_value(&payload).unwrap();
        assert!(serialized["user"].get("password").is_none());
    }

    #[tokio::test]
    async fn login_requires_matching_role() {
        let api = MockApi::instant();
        let response = api.login("student1", "password123", Role::Teacher).await;
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some(INVALID_CREDENTIALS));
    }

    #[tokio::test]
    async fn error_rate_one_always_fails() {
        let api = MockApi::new(
            ApiConfig {
                error_rate: 1.0,
                ..ApiConfig::instant()
            },
            Fixtures::embedded(),
        );
        let response = api.get_courses(&CourseFilter::default()).await;
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some(NETWORK_ERROR));
    }

    #[tokio::test]
    async fn register_rejects_existing_username() {
        let api = MockApi::instant();
        let request = RegisterRequest {
            username: "teacher1".into(),
            email: "t@example.edu".into(),
            password: "secret1".into(),
            role: Role::Teacher,
            full_name: None,
        };
        assert_eq!(api.register(&request).await.error.as_deref(), Some(USERNAME_TAKEN));

        let fresh = RegisterRequest {
            username: "newbie".into(),
            ..request
        };
        let payload = api.register(&fresh).await.into_result().unwrap();
        assert!(payload.user.id.starts_with("user_"));
        assert_eq!(payload.user.full_name, "newbie");
        assert!(payload.user.is_active);
    }

    #[tokio::test]
    async fn users_filter_by_role_search_and_activity() {
        let api = MockApi::instant();
        let students = api
            .get_users(&UserFilter {
                role: Some(Role::Student),
                ..UserFilter::default()
            })
            .await;
        assert_eq!(students.meta.page.unwrap().total, 3);

        let active_students = api
            .get_users(&UserFilter {
                role: Some(Role::Student),
                is_active: Some(true),
                ..UserFilter::default()
            })
            .await;
        assert_eq!(active_students.data.unwrap().len(), 2);

        let searched = api
            .get_users(&UserFilter {
                search: Some("TRAN".into()),
                ..UserFilter::default()
            })
            .await;
        let ids: Vec<String> = searched.data.unwrap().into_iter().map(|user| user.id).collect();
        assert_eq!(ids, vec!["u003"]);
    }

    #[tokio::test]
    async fn courses_paginate_with_course_default_limit() {
        let api = MockApi::instant();
        let response = api.get_courses(&CourseFilter::default()).await;
        let meta = response.meta.page.unwrap();
        assert_eq!(meta.limit, DEFAULT_COURSE_LIMIT);
        assert_eq!(meta.total, 14);
        assert_eq!(meta.total_pages, 2);
        assert_eq!(response.data.unwrap().len(), 12);

        let second = api
            .get_courses(&CourseFilter {
                page: Some(2),
                ..CourseFilter::default()
            })
            .await;
        assert_eq!(second.data.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn courses_sort_by_students_and_created() {
        let api = MockApi::instant();
        let by_students = api
            .get_courses(&CourseFilter {
                sort_by: Some(CourseSort::Students),
                ..CourseFilter::default()
            })
            .await
            .into_result()
            .unwrap();
        assert_eq!(by_students[0].id, "c008");
        assert!(by_students.windows(2).all(|pair| pair[0].enrolled_count >= pair[1].enrolled_count));

        let by_created = api
            .get_courses(&CourseFilter {
                sort_by: Some(CourseSort::Created),
                ..CourseFilter::default()
            })
            .await
            .into_result()
            .unwrap();
        assert!(by_created.windows(2).all(|pair| pair[0].created_at >= pair[1].created_at));

        let by_title = api
            .get_courses(&CourseFilter {
                sort_by: Some(CourseSort::Title),
                ..CourseFilter::default()
            })
            .await
            .into_result()
            .unwrap();
        assert_eq!(by_title[0].title, "Algorithms in Practice");
    }

    #[tokio::test]
    async fn course_lookup_attaches_lessons() {
        let api = MockApi::instant();
        let course = api.get_course("c001").await.into_result().unwrap();
        assert_eq!(course.lessons.len(), 3);
        assert!(course.lessons.iter().all(|lesson| lesson.course_id == "c001"));
        assert_eq!(api.get_course("nope").await.error.as_deref(), Some(COURSE_NOT_FOUND));
    }

    #[tokio::test]
    async fn submit_quiz_scores_and_rounds() {
        let api = MockApi::instant();
        let mut answers = IndexMap::new();
        answers.insert("qs001".to_string(), "const".to_string());
        answers.insert("qs002".to_string(), "Stops the program".to_string());
        answers.insert("qs003".to_string(), "true".to_string());

        let response = api.submit_quiz("q001", &answers).await;
        assert_eq!(response.meta.message.as_deref(), Some("Congratulations! You passed the quiz."));
        let submission = response.data.unwrap();
        assert_eq!(submission.score, 30);
        assert_eq!(submission.total_points, 40);
        assert_eq!(submission.percentage, 75);
        assert!(submission.passed);
        assert_eq!(submission.results.len(), 3);
        assert!(!submission.results[1].is_correct);
        assert_eq!(submission.results[1].points, 0);
    }

    #[tokio::test]
    async fn submit_quiz_without_answers_fails_to_pass() {
        let api = MockApi::instant();
        let submission = api.submit_quiz("q002", &IndexMap::new()).await.into_result().unwrap();
        assert_eq!(submission.percentage, 0);
        assert!(!submission.passed);
        assert!(submission.results.iter().all(|result| result.user_answer.is_none()));
        assert_eq!(api.submit_quiz("missing", &IndexMap::new()).await.error.as_deref(), Some(QUIZ_NOT_FOUND));
    }

    #[tokio::test]
    async fn progress_filters_by_user_and_course() {
        let api = MockApi::instant();
        assert_eq!(api.get_user_progress("u001", None).await.data.unwrap().len(), 2);
        let single = api.get_user_progress("u001", Some("c002")).await.data.unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].percentage, 50);
    }

    #[tokio::test]
    async fn echo_endpoints_merge_updates() {
        let api = MockApi::instant();
        let updates = json!({ "fullName": "New Name", "password": "leak" });
        let Value::Object(updates) = updates else { unreachable!() };
        let response = api.update_user_profile("u001", updates).await;
        assert_eq!(response.meta.message.as_deref(), Some("Profile updated successfully"));
        let record = response.data.unwrap();
        assert_eq!(record["id"], json!("u001"));
        assert_eq!(record["fullName"], json!("New Name"));
        assert!(record.get("password").is_none());
        assert!(record.get("updatedAt").is_some());

        let Value::Object(course) = json!({ "title": "Rust" }) else { unreachable!() };
        let created = api.create_course(course).await.data.unwrap();
        assert!(created["id"].as_str().unwrap().starts_with("course_"));
        assert_eq!(created["enrolledCount"], json!(0));
    }

    #[test]
    fn latency_stays_inside_window() {
        let api = MockApi::new(ApiConfig::default(), Fixtures::embedded());
        for _ in 0..50 {
            let delay = api.latency();
            assert!(delay >= Duration::from_millis(300) && delay <= Duration::from_millis(1000));
        }
        assert_eq!(MockApi::instant().latency(), Duration::ZERO);
    }
}
