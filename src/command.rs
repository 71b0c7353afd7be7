//! rsync argument vector construction
//!
//! The result is an argv, one token per element, never a shell string:
//! exclude patterns may contain characters a shell would interpret.

use tracing::debug;

use crate::config::ResolvedConfig;

/// Lookup errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("unknown source '{0}'")]
    UnknownSource(String),
}

/// Build the rsync argv for one source.
///
/// Order: command, `--dry-run`, `--verbose`, tool params, excludes
/// (global, then job, then source; no dedup), location, target.
pub fn build_command(
    config: &ResolvedConfig,
    source_name: &str,
) -> Result<Vec<String>, LookupError> {
    let source = config.source(source_name)?;

    let excludes = config
        .global_excludes
        .iter()
        .chain(&config.excludes)
        .chain(&source.excludes);

    let mut command = Vec::with_capacity(
        5 + config.tool_params.len()
            + config.global_excludes.len()
            + config.excludes.len()
            + source.excludes.len(),
    );
    command.push(config.tool_command.clone());
    if config.dry_run {
        command.push("--dry-run".to_string());
    }
    if config.verbose {
        command.push("--verbose".to_string());
    }
    command.extend(config.tool_params.iter().cloned());
    command.extend(excludes.map(|e| format!("--exclude={}", e)));
    command.push(source.location.clone());
    command.push(source.target.clone());

    debug!(source = source_name, ?command, "built command");
    Ok(command)
}
