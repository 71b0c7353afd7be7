//! Resolved configuration with layer provenance
//!
//! The resolved config is what commands are built from. It records which
//! layers contributed and, for files, a digest of the bytes that were read.

use serde::{Deserialize, Serialize};

use super::job::SourceEntry;
use crate::command::LookupError;
use crate::logging::LogLevelEffect;

/// Origin of a configuration layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LayerOrigin {
    Builtin,
    Global,
    Job,
    Cli,
}

/// A contributing config layer with provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerSource {
    /// Origin of this layer
    pub origin: LayerOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl LayerSource {
    pub fn builtin() -> Self {
        Self {
            origin: LayerOrigin::Builtin,
            path: None,
            digest: None,
        }
    }

    pub fn cli() -> Self {
        Self {
            origin: LayerOrigin::Cli,
            path: None,
            digest: None,
        }
    }
}

/// Values set explicitly on the command line.
///
/// Only flags the user actually gave are `Some`, so unset flags never
/// clobber a lower layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandLineOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub console_override: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_file: Option<String>,
}

impl CommandLineOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Final configuration after all layers are applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub tool_command: String,
    pub tool_params: Vec<String>,
    pub verbose: bool,
    pub dry_run: bool,
    pub console_override: bool,
    pub capture_file: Option<String>,
    pub configs_dir: String,
    pub logging_level: String,

    /// Excludes applied to every source of every job
    pub global_excludes: Vec<String>,

    pub target_root: String,
    pub host: String,

    /// Job-level excludes, kept apart from `global_excludes`
    pub excludes: Vec<String>,

    /// Sources in authored order
    pub sources: Vec<SourceEntry>,

    /// Contributing layers in precedence order
    #[serde(default)]
    pub layers: Vec<LayerSource>,
}

impl ResolvedConfig {
    /// Look up a source by name
    pub fn source(&self, name: &str) -> Result<&SourceEntry, LookupError> {
        self.sources
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| LookupError::UnknownSource(name.to_string()))
    }

    /// The log level the merged layers ask for
    pub fn log_effect(&self) -> LogLevelEffect {
        LogLevelEffect::new(self.logging_level.clone())
    }

    /// Attach layer provenance
    pub fn with_layers(mut self, layers: Vec<LayerSource>) -> Self {
        self.layers = layers;
        self
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
