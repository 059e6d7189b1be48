//! Session manager: who is signed in, with which role.
//!
//! The manager keeps the current user and token in memory and mirrors them to
//! a [`SessionStore`]. Login and logout are announced on an optional signal
//! channel so the navigation controller can rebuild its menu.

use std::sync::{Arc, Mutex};

use lms_types::{Role, Signal, User};
use lms_util::{SessionStore, SessionStoreError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::gateway::{MockApi, NETWORK_ERROR, RegisterRequest};

/// Page the host shows after a successful login, for every role.
pub const POST_LOGIN_REDIRECT: &str = "/main.html";
/// Page unauthenticated visitors are sent to.
pub const LOGIN_PAGE: &str = "/index.html";

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

#[derive(Debug, Error)]
pub enum SessionError {
    /// Form validation failed; the payload is a translation key.
    #[error("{0}")]
    Invalid(&'static str),
    /// The gateway refused the request (bad credentials, taken username, network).
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Store(#[from] SessionStoreError),
    #[error("session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result of a page-level access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAccess {
    Granted,
    /// No session; the host should show [`LOGIN_PAGE`].
    RedirectToLogin,
    /// Signed in, but with a role outside the page's set.
    Denied,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginSuccess {
    pub user: User,
    pub redirect: &'static str,
}

/// Raw registration form input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Option<Role>,
}

impl RegistrationForm {
    /// Checks the form, returning the translation key of the first problem.
    pub fn validate(&self) -> Result<Role, SessionError> {
        let blank = |value: &str| value.trim().is_empty();
        let role = match self.role {
            Some(role)
                if !blank(&self.username)
                    && !blank(&self.email)
                    && !self.password.is_empty()
                    && !self.confirm_password.is_empty() =>
            {
                role
            }
            _ => return Err(SessionError::Invalid("auth.fillAllFields")),
        };
        if self.password != self.confirm_password {
            return Err(SessionError::Invalid("auth.passwordsDoNotMatch"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SessionError::Invalid("auth.passwordTooShort"));
        }
        if !EMAIL_PATTERN.is_match(&self.email) {
            return Err(SessionError::Invalid("auth.invalidEmail"));
        }
        Ok(role)
    }
}

#[derive(Debug, Default)]
struct SessionState {
    user: Option<User>,
    token: Option<String>,
}

pub struct SessionManager {
    api: MockApi,
    store: Arc<dyn SessionStore>,
    state: Mutex<SessionState>,
    signals: Option<UnboundedSender<Signal>>,
}

impl SessionManager {
    pub fn new(api: MockApi, store: Arc<dyn SessionStore>) -> Self {
        Self {
            api,
            store,
            state: Mutex::new(SessionState::default()),
            signals: None,
        }
    }

    /// Announce login/logout on `sender`.
    pub fn with_signals(mut self, sender: UnboundedSender<Signal>) -> Self {
        self.signals = Some(sender);
        self
    }

    pub fn api(&self) -> &MockApi {
        &self.api
    }

    /// Restores the persisted session. Both user and token must be present;
    /// a user record that no longer decodes clears the store.
    pub fn load_session(&self) -> bool {
        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(error) => {
                warn!(error = %error, "Failed to read session store");
                return false;
            }
        };
        let Some((user_value, token)) = stored.complete() else {
            self.set_state(None, None);
            return false;
        };
        match serde_json::from_value::<User>(user_value.clone()) {
            Ok(user) => {
                debug!(user_id = %user.id, role = %user.role, "Session restored");
                self.set_state(Some(user), Some(token.to_string()));
                true
            }
            Err(error) => {
                warn!(error = %error, "Stored session is corrupt; clearing it");
                self.clear_session();
                false
            }
        }
    }

    /// Re-reads the persisted session when the host becomes visible again.
    pub fn reload_on_visible(&self) -> bool {
        self.load_session()
    }

    pub async fn login(&self, username: &str, password: &str, role: Role) -> Result<LoginSuccess, SessionError> {
        let payload = self
            .api
            .login(username, password, role)
            .await
            .into_result()
            .map_err(SessionError::Rejected)?;
        self.save_session(&payload.user, &payload.token)?;
        info!(user_id = %payload.user.id, role = %payload.user.role, "User logged in");
        self.emit(Signal::UserLoggedIn {
            user: payload.user.clone(),
        });
        Ok(LoginSuccess {
            user: payload.user,
            redirect: POST_LOGIN_REDIRECT,
        })
    }

    /// Validates the form, registers the account, then signs it in.
    pub async fn register(&self, form: &RegistrationForm) -> Result<LoginSuccess, SessionError> {
        let role = form.validate()?;
        let request = RegisterRequest {
            username: form.username.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.clone(),
            role,
            full_name: None,
        };
        self.api
            .register(&request)
            .await
            .into_result()
            .map_err(SessionError::Rejected)?;
        self.login(&request.username, &request.password, role).await
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.set_state(None, None);
        let cleared = self.store.clear();
        info!("User logged out");
        self.emit(Signal::UserLoggedOut);
        cleared.map_err(SessionError::from)
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.lock().expect("session lock poisoned").user.clone()
    }

    pub fn current_token(&self) -> Option<String> {
        self.state.lock().expect("session lock poisoned").token.clone()
    }

    pub fn current_role(&self) -> Option<Role> {
        let state = self.state.lock().expect("session lock poisoned");
        if state.token.is_some() { state.user.as_ref().map(|user| user.role) } else { None }
    }

    pub fn is_authenticated(&self) -> bool {
        let state = self.state.lock().expect("session lock poisoned");
        state.user.is_some() && state.token.is_some()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.current_role() == Some(role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.current_role().is_some_and(|role| roles.contains(&role))
    }

    /// An empty role set marks a public page.
    pub fn check_page_access(&self, required: &[Role]) -> PageAccess {
        if required.is_empty() {
            PageAccess::Granted
        } else if !self.is_authenticated() {
            PageAccess::RedirectToLogin
        } else if self.has_any_role(required) {
            PageAccess::Granted
        } else {
            PageAccess::Denied
        }
    }

    fn save_session(&self, user: &User, token: &str) -> Result<(), SessionError> {
        let value = serde_json::to_value(user)?;
        self.store.save(value, token)?;
        self.set_state(Some(user.clone()), Some(token.to_string()));
        Ok(())
    }

    fn clear_session(&self) {
        self.set_state(None, None);
        if let Err(error) = self.store.clear() {
            warn!(error = %error, "Failed to clear session store");
        }
    }

    fn set_state(&self, user: Option<User>, token: Option<String>) {
        let mut state = self.state.lock().expect("session lock poisoned");
        state.user = user;
        state.token = token;
    }

    fn emit(&self, signal: Signal) {
        if let Some(sender) = &self.signals
            && sender.send(signal).is_err()
        {
            debug!("Signal receiver dropped");
        }
    }
}

/// True when the gateway reported a simulated network failure.
pub fn is_network_failure(error: &SessionError) -> bool {
    matches!(error, SessionError::Rejected(message) if message == NETWORK_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lms_util::{InMemorySessionStore, StoredSession};
    use serde_json::json;
    use tokio::sync::mpsc;

    fn manager(store: Arc<dyn SessionStore>) -> SessionManager {
        SessionManager::new(MockApi::instant(), store)
    }

    fn form() -> RegistrationForm {
        RegistrationForm {
            username: "newstudent".into(),
            email: "new@example.edu".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            role: Some(Role::Student),
        }
    }

    #[tokio::test]
    async fn login_persists_session_and_signals() {
        let store = Arc::new(InMemorySessionStore::new());
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let session = manager(store.clone()).with_signals(sender);

        let success = session.login("teacher1", "password123", Role::Teacher).await.unwrap();
        assert_eq!(success.redirect, POST_LOGIN_REDIRECT);
        assert_eq!(session.current_role(), Some(Role::Teacher));
        assert!(store.load().unwrap().complete().is_some());
        assert!(matches!(receiver.try_recv(), Ok(Signal::UserLoggedIn { user }) if user.id == "u003"));
    }

    #[tokio::test]
    async fn failed_login_leaves_state_untouched() {
        let session = manager(Arc::new(InMemorySessionStore::new()));
        let error = session.login("teacher1", "wrong", Role::Teacher).await.unwrap_err();
        assert!(matches!(error, SessionError::Rejected(ref message) if message == "Invalid credentials"));
        assert!(!session.is_authenticated());
        assert!(!is_network_failure(&error));
    }

    #[tokio::test]
    async fn logout_clears_and_signals() {
        let store = Arc::new(InMemorySessionStore::new());
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let session = manager(store.clone()).with_signals(sender);
        session.login("admin", "admin123", Role::Admin).await.unwrap();
        let _ = receiver.try_recv();

        session.logout().unwrap();
        assert_eq!(session.current_role(), None);
        assert!(store.load().unwrap().complete().is_none());
        assert_eq!(receiver.try_recv().unwrap(), Signal::UserLoggedOut);
    }

    #[test]
    fn load_session_requires_both_halves() {
        let store = Arc::new(InMemorySessionStore::with_session(StoredSession {
            user: Some(json!({ "id": "u001", "username": "student1", "role": "student" })),
            token: None,
        }));
        assert!(!manager(store).load_session());
    }

    #[test]
    fn corrupt_session_is_cleared() {
        let store = Arc::new(InMemorySessionStore::with_session(StoredSession {
            user: Some(json!({ "id": 7 })),
            token: Some("t".into()),
        }));
        let session = manager(store.clone());
        assert!(!session.load_session());
        assert_eq!(store.load().unwrap(), StoredSession::default());
    }

    #[test]
    fn restored_session_exposes_role_checks() {
        let store = Arc::new(InMemorySessionStore::with_session(StoredSession {
            user: Some(json!({ "id": "u001", "username": "student1", "role": "student" })),
            token: Some("mock-token-u001-1".into()),
        }));
        let session = manager(store);
        assert!(session.load_session());
        assert!(session.has_role(Role::Student));
        assert!(session.has_any_role(&[Role::Admin, Role::Student]));
        assert_eq!(session.check_page_access(&[]), PageAccess::Granted);
        assert_eq!(session.check_page_access(&[Role::Student]), PageAccess::Granted);
        assert_eq!(session.check_page_access(&[Role::Admin]), PageAccess::Denied);
    }

    #[test]
    fn anonymous_access_redirects_to_login() {
        let session = manager(Arc::new(InMemorySessionStore::new()));
        assert_eq!(session.check_page_access(&[Role::Teacher]), PageAccess::RedirectToLogin);
    }

    #[test]
    fn registration_validation_order() {
        let missing = RegistrationForm {
            role: None,
            ..form()
        };
        assert!(matches!(missing.validate(), Err(SessionError::Invalid("auth.fillAllFields"))));

        let mismatch = RegistrationForm {
            confirm_password: "secret2".into(),
            ..form()
        };
        assert!(matches!(mismatch.validate(), Err(SessionError::Invalid("auth.passwordsDoNotMatch"))));

        let short = RegistrationForm {
            password: "abc".into(),
            confirm_password: "abc".into(),
            ..form()
        };
        assert!(matches!(short.validate(), Err(SessionError::Invalid("auth.passwordTooShort"))));

        let bad_email = RegistrationForm {
            email: "not-an-email".into(),
            ..form()
        };
        assert!(matches!(bad_email.validate(), Err(SessionError::Invalid("auth.invalidEmail"))));

        assert_eq!(form().validate().unwrap(), Role::Student);
    }

    #[tokio::test]
    async fn register_then_auto_login_is_rejected_for_unknown_fixture_user() {
        // Registration is not stored, so the follow-up login cannot find the account.
        let session = manager(Arc::new(InMemorySessionStore::new()));
        let error = session.register(&form()).await.unwrap_err();
        assert!(matches!(error, SessionError::Rejected(ref message) if message == "Invalid credentials"));
    }

    #[tokio::test]
    async fn register_rejects_taken_username() {
        let session = manager(Arc::new(InMemorySessionStore::new()));
        let taken = RegistrationForm {
            username: "student1".into(),
            ..form()
        };
        let error = session.register(&taken).await.unwrap_err();
        assert!(matches!(error, SessionError::Rejected(ref message) if message == "Username already exists"));
    }
}
