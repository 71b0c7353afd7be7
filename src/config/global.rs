//! Global layer resolution (layer 2)
//!
//! Overlays a parsed `global.toml` on a fresh copy of the built-in
//! defaults. Scalars use the "present" policy: a key that appears in the
//! file wins, even when its value is `false`.

use serde::{Deserialize, Serialize};

use super::defaults::ConfigDefaults;
use super::layer::GlobalLayer;
use crate::logging::LogLevelEffect;

/// Fully populated global configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfigRecord {
    pub tool_command: String,
    pub global_excludes: Vec<String>,
    pub tool_params: Vec<String>,
    pub verbose: bool,
    pub dry_run: bool,
    pub console_override: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_file: Option<String>,
    pub configs_dir: String,
    pub logging_level: String,
}

impl Default for GlobalConfigRecord {
    fn default() -> Self {
        Self::from(ConfigDefaults::default())
    }
}

impl From<ConfigDefaults> for GlobalConfigRecord {
    fn from(d: ConfigDefaults) -> Self {
        Self {
            tool_command: d.tool_command,
            global_excludes: d.global_excludes,
            tool_params: d.tool_params,
            verbose: d.verbose,
            dry_run: d.dry_run,
            console_override: d.console_override,
            capture_file: d.capture_file,
            configs_dir: d.configs_dir,
            logging_level: d.logging_level,
        }
    }
}

impl GlobalConfigRecord {
    /// The log level this record asks the process to run at
    pub fn log_effect(&self) -> LogLevelEffect {
        LogLevelEffect::new(self.logging_level.clone())
    }
}

/// Resolve the global layer over the defaults.
///
/// Returns the record plus the log level the caller should apply; an
/// unknown level is only rejected when applied.
pub fn resolve_global(layer: &GlobalLayer) -> (GlobalConfigRecord, LogLevelEffect) {
    let mut record = GlobalConfigRecord::default();

    if let Some(v) = &layer.rsync_command {
        record.tool_command = v.clone();
    }
    if let Some(v) = layer.verbose {
        record.verbose = v;
    }
    if let Some(v) = layer.dry_run {
        record.dry_run = v;
    }
    if let Some(v) = layer.console_override {
        record.console_override = v;
    }
    if let Some(v) = &layer.capture_file {
        record.capture_file = Some(v.clone());
    }
    if let Some(v) = &layer.logging_level {
        record.logging_level = v.clone();
    }
    if let Some(v) = &layer.configs_dir {
        record.configs_dir = v.clone();
    }

    if let Some(excludes) = layer.override_excludes.as_ref().or(layer.global_excludes.as_ref()) {
        record.global_excludes = excludes.clone();
    }

    if let Some(params) = &layer.global_rsync_params {
        record.tool_params = params.clone();
    }
    if let Some(params) = &layer.override_rsync_params {
        record.tool_params = params.clone();
    } else if let Some(added) = &layer.added_rsync_params {
        record.tool_params.extend(added.iter().cloned());
    }

    let effect = record.log_effect();
    (record, effect)
}
