//! Job orchestration
//!
//! Reduces the job's ordered source list into per-source results, one
//! rsync invocation at a time. A fatal step stops the reduction; sources
//! after it are counted as skipped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::command::build_command;
use crate::config::ResolvedConfig;
use crate::exec::{run_step, StepError, SyncExecutor};

/// How one source finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SourceOutcome {
    Ok,
    /// Recoverable partial transfer
    Partial { code: i32 },
    /// Run-stopping failure
    Fatal { message: String },
}

impl SourceOutcome {
    pub fn is_error(&self) -> bool {
        !matches!(self, SourceOutcome::Ok)
    }
}

/// Result of syncing one source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceResult {
    pub name: String,
    pub location: String,
    pub target: String,

    /// argv that was run
    pub command: Vec<String>,

    pub outcome: SourceOutcome,

    /// Captured tool output (or error text)
    pub output: String,
}

/// Result of a whole job run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub job: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Results in run order
    pub results: Vec<SourceResult>,

    /// Sources not attempted because of a fatal step
    pub skipped: usize,
}

impl JobReport {
    /// Any source reported a partial or fatal error
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|r| r.outcome.is_error())
    }

    /// The run stopped on a fatal step
    pub fn fatal(&self) -> Option<&SourceResult> {
        self.results
            .iter()
            .find(|r| matches!(r.outcome, SourceOutcome::Fatal { .. }))
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal().is_some()
    }
}

/// Run every source of `config` through `executor`, in order
pub fn run_job(job: &str, config: &ResolvedConfig, executor: &dyn SyncExecutor) -> JobReport {
    let started_at = Utc::now();
    let mut results: Vec<SourceResult> = Vec::with_capacity(config.sources.len());
    let mut skipped = 0;

    for source in &config.sources {
        let stopped = results
            .last()
            .is_some_and(|r| matches!(r.outcome, SourceOutcome::Fatal { .. }));
        if stopped {
            skipped += 1;
            continue;
        }

        // Names come from the config itself, so lookup cannot fail
        let command = match build_command(config, &source.name) {
            Ok(command) => command,
            Err(e) => {
                results.push(SourceResult {
                    name: source.name.clone(),
                    location: source.location.clone(),
                    target: source.target.clone(),
                    command: Vec::new(),
                    outcome: SourceOutcome::Fatal {
                        message: e.to_string(),
                    },
                    output: e.to_string(),
                });
                continue;
            }
        };

        info!(
            source = %source.name,
            location = %source.location,
            target = %source.target,
            "syncing"
        );
        let (outcome, output) = match run_step(executor, &command) {
            Ok(output) => (SourceOutcome::Ok, output),
            Err(StepError::Partial { code, output }) => (SourceOutcome::Partial { code }, output),
            Err(StepError::Fatal(e)) => {
                error!(source = %source.name, "{}", e);
                let message = e.to_string();
                (SourceOutcome::Fatal { message: message.clone() }, message)
            }
        };

        results.push(SourceResult {
            name: source.name.clone(),
            location: source.location.clone(),
            target: source.target.clone(),
            command,
            outcome,
            output,
        });
    }

    JobReport {
        job: job.to_string(),
        started_at,
        finished_at: Utc::now(),
        results,
        skipped,
    }
}
