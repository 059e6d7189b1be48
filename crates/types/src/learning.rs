//! Learning records served by the mock gateway.
//!
//! Field names follow the camelCase fixture files so records round-trip
//! through `serde_json` untouched.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub teacher_id: Option<String>,
    /// Publication status (`published`, `draft`, `archived`).
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub enrolled_count: u32,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub review_count: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Populated only by the single-course lookup.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub status: String,
    /// Minimum percentage required to pass.
    pub passing_score: u32,
    #[serde(default)]
    pub question_ids: Vec<String>,
    /// Populated only by the single-quiz lookup.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    #[serde(default)]
    pub lesson_id: Option<String>,
    #[serde(default)]
    pub completed_lessons: u32,
    #[serde(default)]
    pub total_lessons: u32,
    #[serde(default)]
    pub percentage: u32,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Graded outcome of one answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: String,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub points: u32,
}

/// Result of grading a quiz attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub score: u32,
    pub total_points: u32,
    pub percentage: u32,
    pub passed: bool,
    pub results: Vec<QuestionResult>,
    /// Answers keyed by question id, in the order they were given.
    pub answers: IndexMap<String, String>,
    pub submitted_at: DateTime<Utc>,
}
