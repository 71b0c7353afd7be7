//! Running the sync tool
//!
//! [`SyncExecutor`] is the seam between the orchestrator and the real
//! process; tests substitute their own implementation. Exit codes 23 and
//! 24 (partial transfer, usually permissions) are recoverable, any other
//! failure is fatal.

use std::process::{Command, Stdio};

use tracing::warn;

/// rsync: partial transfer due to error
pub const EXIT_PARTIAL_TRANSFER: i32 = 23;

/// rsync: partial transfer due to vanished source files
pub const EXIT_VANISHED_SOURCE: i32 = 24;

/// Execution errors reported by an executor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecError {
    #[error("failed to start '{program}': {message}")]
    Spawn { program: String, message: String },

    #[error("command exited with {}: {output}", exit_status(.code))]
    Failed { code: Option<i32>, output: String },

    #[error("empty command")]
    EmptyCommand,
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "a signal".to_string(),
    }
}

/// Runs one argv and returns its captured output
pub trait SyncExecutor {
    /// Run `argv` (argv[0] is the program) without a shell
    fn execute(&self, argv: &[String]) -> Result<String, ExecError>;
}

/// Executor spawning a real child process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl SyncExecutor for ProcessExecutor {
    fn execute(&self, argv: &[String]) -> Result<String, ExecError> {
        let (program, args) = argv.split_first().ok_or(ExecError::EmptyCommand)?;

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ExecError::Spawn {
                program: program.clone(),
                message: e.to_string(),
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Ok(text)
        } else {
            Err(ExecError::Failed {
                code: output.status.code(),
                output: text,
            })
        }
    }
}

/// A failed step, classified
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    /// Exit 23/24; the output is still the step's result
    #[error("partial transfer (exit {code}), likely permissions: {output}")]
    Partial { code: i32, output: String },

    /// Anything else; the run stops
    #[error("transfer failed: {0}")]
    Fatal(ExecError),
}

impl StepError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, StepError::Fatal(_))
    }
}

/// Whether an exit code means a recoverable partial transfer
pub fn is_partial_transfer(code: i32) -> bool {
    code == EXIT_PARTIAL_TRANSFER || code == EXIT_VANISHED_SOURCE
}

/// Run a command and classify a failure
pub fn run_step(executor: &dyn SyncExecutor, argv: &[String]) -> Result<String, StepError> {
    match executor.execute(argv) {
        Ok(output) => Ok(output),
        Err(ExecError::Failed {
            code: Some(code),
            output,
        }) if is_partial_transfer(code) => {
            warn!(code, "partial transfer, likely permissions: {}", output.trim_end());
            Err(StepError::Partial { code, output })
        }
        Err(e) => Err(StepError::Fatal(e)),
    }
}
