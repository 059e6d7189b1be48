use std::env;
use std::path::PathBuf;

use dirs_next::{config_dir, home_dir};

/// Directory name under the platform config dir that holds every LMS file.
pub const APP_DIR_NAME: &str = "lms";

pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// Resolves a file path from an override variable, falling back to
/// `<config_dir>/lms/<file_name>`.
pub fn resolve_config_path(env_var: &str, file_name: &str) -> PathBuf {
    if let Ok(path) = env::var(env_var)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(file_name)
}

/// Joins a deployment context path and a resource path, dropping one leading
/// slash from the resource so `"/data/x.json"` and `"data/x.json"` agree.
pub fn join_context_path(context_path: &str, relative_path: &str) -> String {
    let relative = relative_path.strip_prefix('/').unwrap_or(relative_path);
    format!("{}/{}", context_path.trim_end_matches('/'), relative)
}
