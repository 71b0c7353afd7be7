//! Process-wide log level handling
//!
//! The subscriber is installed once at start-up with a reloadable level
//! filter. Configuration resolution never touches it directly; resolvers
//! return a [`LogLevelEffect`] and the binary applies it here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::reload;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Registry;

/// Logging errors
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid logging level '{0}' (expected error, warning, info or debug)")]
    InvalidLevel(String),

    #[error("failed to reload log filter: {0}")]
    Reload(String),
}

/// Supported log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl LoggingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggingLevel::Error => "error",
            LoggingLevel::Warning => "warning",
            LoggingLevel::Info => "info",
            LoggingLevel::Debug => "debug",
        }
    }

    /// Map onto the subscriber's level filter
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            LoggingLevel::Error => LevelFilter::ERROR,
            LoggingLevel::Warning => LevelFilter::WARN,
            LoggingLevel::Info => LevelFilter::INFO,
            LoggingLevel::Debug => LevelFilter::DEBUG,
        }
    }
}

impl FromStr for LoggingLevel {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LoggingLevel::Error),
            "warning" | "warn" => Ok(LoggingLevel::Warning),
            "info" => Ok(LoggingLevel::Info),
            "debug" => Ok(LoggingLevel::Debug),
            _ => Err(LoggingError::InvalidLevel(s.to_string())),
        }
    }
}

impl fmt::Display for LoggingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to set the process-wide log level.
///
/// Carries the raw configured name; it is only validated when applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLevelEffect {
    pub level: String,
}

impl LogLevelEffect {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
        }
    }

    /// Validate the requested level
    pub fn level(&self) -> Result<LoggingLevel, LoggingError> {
        self.level.parse()
    }
}

/// Handle to the installed subscriber's level filter
pub struct LogHandle {
    handle: reload::Handle<LevelFilter, Registry>,
}

impl LogHandle {
    /// Install the global subscriber (stderr) at `initial` level
    pub fn install(initial: LoggingLevel) -> Self {
        let (filter, handle) = reload::Layer::new(initial.level_filter());
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false);

        // A subscriber may already exist (tests); keep it
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init();

        Self { handle }
    }

    /// Apply a level effect, failing fast on an unknown level name
    pub fn apply(&self, effect: &LogLevelEffect) -> Result<LoggingLevel, LoggingError> {
        let level = effect.level()?;
        self.handle
            .reload(level.level_filter())
            .map_err(|e| LoggingError::Reload(e.to_string()))?;
        tracing::debug!(level = %level, "log level applied");
        Ok(level)
    }
}
