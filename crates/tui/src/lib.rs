//! # LMS Shell TUI
//!
//! Terminal shell for the learning management system: a role-specific
//! sidebar menu, breadcrumb, content panel and header pickers for theme and
//! language, driven by the navigation controller.
//!
//! ## Architecture
//!
//! - [`app::App`] owns the services (session, locale, theme, navigation) and
//!   turns input into controller calls, returning `Effect`s for async work.
//! - [`nav`] holds the navigation controller and its view-model sinks.
//! - [`ui::runtime`] owns the terminal and the `tokio::select!` event loop.
//!
//! Services never broadcast directly to the UI; the session manager emits
//! login/logout [`lms_types::Signal`]s over a channel the runtime drains.

pub mod app;
pub mod content;
pub mod locale;
pub mod nav;
pub mod ui;
pub mod widgets;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use lms_api::{MockApi, SessionManager};
use lms_util::{InMemorySessionStore, JsonSessionStore, LmsConfig, SessionStore, UserPreferences};
use tokio::sync::mpsc;
use tracing::warn;

/// Runs the shell until the user quits.
///
/// Preferences and the session fall back to in-memory stores when their
/// files cannot be opened, so the shell still starts on a read-only home.
///
/// # Errors
///
/// Terminal setup and teardown failures.
pub async fn run(config: LmsConfig) -> Result<()> {
    let preferences = match UserPreferences::new() {
        Ok(preferences) => preferences,
        Err(error) => {
            warn!(error = %error, "preferences unavailable; using in-memory store");
            UserPreferences::ephemeral()
        }
    };
    let store: Arc<dyn SessionStore> = match JsonSessionStore::new(None::<PathBuf>) {
        Ok(store) => Arc::new(store),
        Err(error) => {
            warn!(error = %error, "session store unavailable; using in-memory store");
            Arc::new(InMemorySessionStore::new())
        }
    };

    let (signal_sender, signal_receiver) = mpsc::unbounded_channel();
    let session = Arc::new(SessionManager::new(MockApi::from_config(&config), store).with_signals(signal_sender));
    let width = crossterm::terminal::size().map(|(width, _)| width).unwrap_or(120);
    let app = app::App::new(config, Arc::new(preferences), session, width);
    ui::runtime::run_app(app, signal_receiver).await
}
