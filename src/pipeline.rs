//! One full rsyncr invocation
//!
//! load -> apply log levels -> run every source -> deliver the report.
//! The executor and the primary notifier are passed in so the whole flow
//! runs without spawning rsync or sending push messages.

use thiserror::Error;
use tracing::error;

use crate::config::{load, CommandLineOverrides, ConfigError, ConfigPaths};
use crate::exec::SyncExecutor;
use crate::logging::{LogHandle, LogLevelEffect, LoggingError};
use crate::notify::{Delivery, Notifier, NotifyError};
use crate::report::{detail_text, notification_text};
use crate::run::{run_job, JobReport};

/// Top-level errors
#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("fatal transfer error in source {source_name}: {message}")]
    Transfer {
        source_name: String,
        message: String,
    },

    #[error("notification error: {0}")]
    Notify(#[from] NotifyError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RunError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Config(_) => 2,
            RunError::Serialization(_) => 2,
            RunError::Transfer { .. } => 4,
            RunError::Logging(_) => 5,
            RunError::Notify(_) => 6,
        }
    }
}

/// What to run
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub job: String,
    pub paths: ConfigPaths,
    pub overrides: CommandLineOverrides,

    /// Stop after resolving and return the config as JSON
    pub show_config: bool,
}

/// Successful result of [`run`]
#[derive(Debug)]
pub enum RunOutput {
    /// Resolved configuration, pretty JSON
    Config(String),
    Report(JobReport),
}

/// Run one job end to end.
///
/// With no `log` handle the levels are still validated. `notifier`
/// replaces the configured console/push channel; the capture file from
/// the config is written either way. A fatal step still delivers its
/// report before returning [`RunError::Transfer`].
pub fn run(
    request: &RunRequest,
    log: Option<&LogHandle>,
    executor: &dyn SyncExecutor,
    notifier: Option<Box<dyn Notifier>>,
) -> Result<RunOutput, RunError> {
    let loaded = load(&request.job, &request.paths, &request.overrides)?;
    apply_level(log, &loaded.global_log_effect)?;
    let config = loaded.config;
    apply_level(log, &config.log_effect())?;

    if request.show_config {
        return Ok(RunOutput::Config(config.to_json()?));
    }

    let report = run_job(&request.job, &config, executor);

    let mut delivery = Delivery::for_config(&config);
    if let Some(primary) = notifier {
        delivery = delivery.with_primary(primary);
    }
    let delivered = delivery.deliver(&notification_text(&report), &detail_text(&report));

    if let Some(fatal) = report.fatal() {
        if let Err(e) = delivered {
            error!("{}", e);
        }
        return Err(RunError::Transfer {
            source_name: fatal.name.clone(),
            message: fatal.output.clone(),
        });
    }
    delivered?;
    Ok(RunOutput::Report(report))
}

fn apply_level(log: Option<&LogHandle>, effect: &LogLevelEffect) -> Result<(), LoggingError> {
    match log {
        Some(handle) => handle.apply(effect).map(|_| ()),
        None => effect.level().map(|_| ()),
    }
}
