//! Mock LMS backend.
//!
//! - [`MockApi`]: fixture-backed gateway with simulated latency and failures,
//!   returning every result in the uniform [`lms_types::ApiResponse`] envelope.
//! - [`SessionManager`]: current user and token, mirrored to a session store,
//!   with role checks and login/logout signals.
//!
//! # Example
//!
//! ```ignore
//! use lms_api::{CourseFilter, MockApi};
//!
//! async fn first_page() {
//!     let api = MockApi::instant();
//!     let response = api.get_courses(&CourseFilter::default()).await;
//!     println!("{} courses", response.meta.page.map(|page| page.total).unwrap_or(0));
//! }
//! ```

pub mod filters;
pub mod fixtures;
pub mod gateway;
pub mod session;

pub use filters::{CourseFilter, CourseSort, QuizFilter, UserFilter, paginate};
pub use fixtures::{FixtureError, Fixtures};
pub use gateway::{LoginPayload, MockApi, RegisterPayload, RegisterRequest};
pub use session::{LoginSuccess, PageAccess, RegistrationForm, SessionError, SessionManager};
