//! Static fixture files backing the mock gateway.
//!
//! Every fixture is a JSON object of the form `{ "data": [...] }`. The files
//! under `crates/api/data/` are compiled in; a data directory configured via
//! `LmsConfig::data_dir` shadows them file by file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub const USERS_FILE: &str = "mock-users.json";
pub const COURSES_FILE: &str = "mock-courses.json";
pub const LESSONS_FILE: &str = "mock-lessons.json";
pub const QUIZZES_FILE: &str = "mock-quizzes.json";
pub const QUESTIONS_FILE: &str = "mock-questions.json";
pub const PROGRESS_FILE: &str = "mock-progress.json";

const EMBEDDED: &[(&str, &str)] = &[
    (USERS_FILE, include_str!("../data/mock-users.json")),
    (COURSES_FILE, include_str!("../data/mock-courses.json")),
    (LESSONS_FILE, include_str!("../data/mock-lessons.json")),
    (QUIZZES_FILE, include_str!("../data/mock-quizzes.json")),
    (QUESTIONS_FILE, include_str!("../data/mock-questions.json")),
    (PROGRESS_FILE, include_str!("../data/mock-progress.json")),
];

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("fixture {0} not found")]
    NotFound(String),
    #[error("fixture I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("fixture {file} is malformed: {source}")]
    Malformed {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct FixtureFile<T> {
    data: Vec<T>,
}

/// Source of fixture records.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    override_dir: Option<PathBuf>,
}

impl Fixtures {
    /// Fixtures compiled into the binary.
    pub fn embedded() -> Self {
        Self::default()
    }

    /// Fixtures read from `dir` where present, embedded otherwise.
    pub fn with_override_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            override_dir: Some(dir.into()),
        }
    }

    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    /// Loads and decodes the `data` array of `file_name`.
    pub fn load<T: DeserializeOwned>(&self, file_name: &str) -> Result<Vec<T>, FixtureError> {
        let content = self.read(file_name)?;
        let parsed: FixtureFile<T> = serde_json::from_str(&content).map_err(|source| FixtureError::Malformed {
            file: file_name.to_string(),
            source,
        })?;
        Ok(parsed.data)
    }

    fn read(&self, file_name: &str) -> Result<String, FixtureError> {
        if let Some(dir) = &self.override_dir {
            let path = dir.join(file_name);
            if path.is_file() {
                debug!(path = %path.display(), "Loading fixture override");
                return Ok(fs::read_to_string(path)?);
            }
        }
        EMBEDDED
            .iter()
            .find(|(name, _)| *name == file_name)
            .map(|(_, content)| (*content).to_string())
            .ok_or_else(|| FixtureError::NotFound(file_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lms_types::{Course, Progress, Question, Quiz};
    use tempfile::tempdir;

    #[test]
    fn embedded_fixtures_decode() {
        let fixtures = Fixtures::embedded();
        assert!(!fixtures.load::<Course>(COURSES_FILE).unwrap().is_empty());
        assert!(!fixtures.load::<Quiz>(QUIZZES_FILE).unwrap().is_empty());
        assert!(!fixtures.load::<Question>(QUESTIONS_FILE).unwrap().is_empty());
        assert!(!fixtures.load::<Progress>(PROGRESS_FILE).unwrap().is_empty());
    }

    #[test]
    fn override_dir_shadows_single_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(QUIZZES_FILE),
            r#"{ "data": [ { "id": "qx", "courseId": "c1", "title": "Only", "passingScore": 50 } ] }"#,
        )
        .unwrap();
        let fixtures = Fixtures::with_override_dir(dir.path());

        let quizzes = fixtures.load::<Quiz>(QUIZZES_FILE).unwrap();
        assert_eq!(quizzes.len(), 1);
        assert_eq!(quizzes[0].id, "qx");
        assert!(fixtures.load::<Course>(COURSES_FILE).unwrap().len() > 1);
    }

    #[test]
    fn malformed_override_is_reported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(COURSES_FILE), "{ \"data\": 3 }").unwrap();
        let error = Fixtures::with_override_dir(dir.path()).load::<Course>(COURSES_FILE).unwrap_err();
        assert!(matches!(error, FixtureError::Malformed { ref file, .. } if file == COURSES_FILE));
    }

    #[test]
    fn unknown_fixture_is_not_found() {
        let error = Fixtures::embedded().load::<Course>("mock-missing.json").unwrap_err();
        assert!(matches!(error, FixtureError::NotFound(_)));
    }
}
