//! Runtime configuration for the store and logging bootstrap.
//!
//! # Invariants
//! - `StoreConfig` always carries a non-empty storage key and author.
//! - `LoggingConfig` always carries a known level and an absolute directory.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Storage key the club blob is saved under.
pub const DEFAULT_STORAGE_KEY: &str = "bookClubData";
/// Author recorded on messages in single-user mode.
pub const DEFAULT_MESSAGE_AUTHOR: &str = "You";

/// Store-level settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub storage_key: String,
    pub message_author: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            message_author: DEFAULT_MESSAGE_AUTHOR.to_string(),
        }
    }
}

impl StoreConfig {
    /// Uses `storage_key`, falling back to the default when blank.
    pub fn with_storage_key(mut self, storage_key: &str) -> Self {
        self.storage_key = non_blank_or(storage_key, DEFAULT_STORAGE_KEY);
        self
    }

    /// Uses `author` for new messages, falling back to the default when blank.
    pub fn with_message_author(mut self, author: &str) -> Self {
        self.message_author = non_blank_or(author, DEFAULT_MESSAGE_AUTHOR);
        self
    }
}

fn non_blank_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Rejected logging configuration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnsupportedLevel(String),
    EmptyLogDir,
    RelativeLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::EmptyLogDir => write!(f, "log_dir cannot be empty"),
            Self::RelativeLogDir(dir) => {
                write!(f, "log_dir must be an absolute path, got `{dir}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Validated logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: &'static str,
    pub log_dir: PathBuf,
}

impl LoggingConfig {
    /// Normalizes raw level/directory input.
    ///
    /// Levels are case-insensitive; `warning` is accepted as `warn`.
    pub fn parse(level: &str, log_dir: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            level: normalize_level(level)?,
            log_dir: normalize_log_dir(log_dir)?,
        })
    }
}

/// Returns the default log level for the current build mode.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn normalize_level(level: &str) -> Result<&'static str, ConfigError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(ConfigError::UnsupportedLevel(other.to_string())),
    }
}

fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, ConfigError> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyLogDir);
    }
    let path = Path::new(trimmed);
    if !path.is_absolute() {
        return Err(ConfigError::RelativeLogDir(trimmed.to_string()));
    }
    Ok(path.to_path_buf())
}
