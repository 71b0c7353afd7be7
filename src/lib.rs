//! rsyncr - layered-configuration backup runner
//!
//! Resolves defaults, a global config file, a per-job config file and
//! command-line overrides into one configuration, builds an rsync argv per
//! source and runs them in order, then delivers a report.

pub mod command;
pub mod config;
pub mod exec;
pub mod logging;
pub mod notify;
pub mod pipeline;
pub mod report;
pub mod run;

pub use command::{build_command, LookupError};
pub use config::{
    load, merge_configs, resolve_global, resolve_job, CommandLineOverrides, ConfigError,
    ConfigPaths, GlobalConfigRecord, JobConfigRecord, ResolvedConfig, SourceEntry,
};
pub use exec::{ExecError, ProcessExecutor, StepError, SyncExecutor};
pub use logging::{LogHandle, LogLevelEffect, LoggingError, LoggingLevel};
pub use notify::{Delivery, Notifier, NotifyError};
pub use pipeline::{run, RunError, RunOutput, RunRequest};
pub use run::{run_job, JobReport, SourceOutcome, SourceResult};
