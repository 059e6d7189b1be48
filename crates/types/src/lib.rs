//! Shared type definitions for the LMS shell.
//!
//! Everything in this crate is plain data: roles and users, the role-scoped
//! menu model, learning records served by the mock gateway, the uniform
//! response envelope, and the signals exchanged between services. Behavior
//! lives in `lms-api` and `lms-tui`.

pub mod envelope;
pub mod learning;
pub mod menu;
pub mod preference;
pub mod signal;
pub mod user;

pub use envelope::{ApiResponse, PageMeta, ResponseMeta};
pub use learning::{Course, Lesson, Progress, Question, QuestionResult, Quiz, QuizSubmission};
pub use menu::{MenuDefinition, MenuEntry, MenuItem, MenuLocation, MenuSection};
pub use preference::{Language, ParseLanguageError, ParseThemeModeError, ThemeMode};
pub use signal::Signal;
pub use user::{ParseRoleError, Role, User};
