//! Built-in defaults (layer 1)
//!
//! Hardcoded baseline values for every configuration field. Each call to
//! `ConfigDefaults::default()` builds a fresh owned copy, so no run can
//! alias or mutate another run's lists.

use serde::{Deserialize, Serialize};

/// Default directory holding `global.toml` and `config.<job>.toml`
pub const DEFAULT_CONFIGS_DIR: &str = "/etc/rsyncr/";

/// rsync parameters applied to every source unless overridden
pub const DEFAULT_RSYNC_PARAMS: &[&str] = &[
    "--delete",
    "--delete-excluded",
    "--archive",
    "--one-file-system",
    "--numeric-ids",
];

/// Built-in default configuration values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDefaults {
    /// rsync executable (default: "rsync")
    pub tool_command: String,

    /// Patterns excluded for every job (default: none)
    pub global_excludes: Vec<String>,

    /// Parameters passed to every rsync invocation
    pub tool_params: Vec<String>,

    /// Pass `--verbose` to rsync (default: false)
    pub verbose: bool,

    /// Pass `--dry-run` to rsync (default: false)
    pub dry_run: bool,

    /// Print the report instead of sending it (default: false)
    pub console_override: bool,

    /// Also save the report to this file
    pub capture_file: Option<String>,

    /// Where configs live (default: /etc/rsyncr/)
    pub configs_dir: String,

    /// Log level name (default: "warning")
    pub logging_level: String,
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self {
            tool_command: "rsync".to_string(),
            global_excludes: Vec::new(),
            tool_params: DEFAULT_RSYNC_PARAMS.iter().map(|p| p.to_string()).collect(),
            verbose: false,
            dry_run: false,
            console_override: false,
            capture_file: None,
            configs_dir: DEFAULT_CONFIGS_DIR.to_string(),
            logging_level: "warning".to_string(),
        }
    }
}

impl ConfigDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "tool_command": self.tool_command,
            "global_excludes": self.global_excludes,
            "tool_params": self.tool_params,
            "verbose": self.verbose,
            "dry_run": self.dry_run,
            "console_override": self.console_override,
            "capture_file": self.capture_file,
            "configs_dir": self.configs_dir,
            "logging_level": self.logging_level,
        })
    }
}
