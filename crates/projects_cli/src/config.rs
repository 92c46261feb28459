//! Environment-driven settings for the CLI smoke binary.
//!
//! Reads `.env` when present, then the process environment:
//! - `PROJECTS_DB_PATH`: SQLite file, defaults to `projects.db`.
//! - `PROJECTS_LOG_DIR`: absolute log directory; file logging is off when unset.
//! - `PROJECTS_LOG_LEVEL`: defaults to the core's build-mode level.

use std::path::PathBuf;

const DEFAULT_DB_PATH: &str = "projects.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub log_dir: Option<String>,
    pub log_level: String,
}

impl CliConfig {
    pub fn from_env() -> Self {
        if let Some(warning) = dotenv_warning(dotenvy::dotenv().map(|_| ())) {
            eprintln!("{warning}");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            db_path: non_blank("PROJECTS_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            log_dir: non_blank("PROJECTS_LOG_DIR"),
            log_level: non_blank("PROJECTS_LOG_LEVEL")
                .unwrap_or_else(|| projects_core::default_log_level().to_string()),
        }
    }
}

/// A missing `.env` is normal; anything else is reported to the caller.
fn dotenv_warning(result: Result<(), dotenvy::Error>) -> Option<String> {
    match result {
        Ok(()) => None,
        Err(err) if err.not_found() => None,
        Err(err) => Some(format!("ignoring unreadable .env: {err}")),
    }
}
