//! Typed ingest schema for the global and job config files
//!
//! Every key is optional here; presence is what the resolvers act on.
//! Required-field checks happen in the job resolver so that the error
//! names the offending source.

use serde::Deserialize;

use super::ConfigError;

/// Raw global layer (`global.toml`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalLayer {
    pub rsync_command: Option<String>,
    pub verbose: Option<bool>,
    pub dry_run: Option<bool>,
    pub console_override: Option<bool>,
    pub capture_file: Option<String>,
    pub logging_level: Option<String>,
    pub configs_dir: Option<String>,

    /// Replaces the default global excludes
    pub global_excludes: Option<Vec<String>>,

    /// Replaces the global excludes; wins over `global_excludes`
    pub override_excludes: Option<Vec<String>>,

    /// Replaces the default rsync params
    pub global_rsync_params: Option<Vec<String>>,

    /// Replaces the rsync params; wins over `added_rsync_params`
    pub override_rsync_params: Option<Vec<String>>,

    /// Appended to the rsync params
    pub added_rsync_params: Option<Vec<String>>,
}

impl GlobalLayer {
    /// Parse a global layer from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Raw job layer (`config.<job>.toml`)
#[derive(Debug, Clone, Default)]
pub struct JobLayer {
    pub target_root: Option<String>,
    pub host: Option<String>,
    pub excludes: Option<Vec<String>>,
    pub verbose: Option<bool>,
    pub dry_run: Option<bool>,
    pub console_override: Option<bool>,
    pub capture_file: Option<String>,
    pub logging_level: Option<String>,

    /// Sources in authored order; `None` when the `sources` table is absent
    pub sources: Option<Vec<(String, SourceLayer)>>,
}

/// Raw `[sources.<name>]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceLayer {
    pub location: Option<String>,
    pub target: Option<String>,
    pub target_full_path: Option<String>,
    pub excludes: Option<Vec<String>>,
}

/// Scalar part of the job file; `sources` is read separately to keep its order
#[derive(Deserialize)]
struct JobScalars {
    target_root: Option<String>,
    host: Option<String>,
    excludes: Option<Vec<String>>,
    verbose: Option<bool>,
    dry_run: Option<bool>,
    console_override: Option<bool>,
    capture_file: Option<String>,
    logging_level: Option<String>,
}

impl JobLayer {
    /// Parse a job layer from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut table: toml::Table =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let sources = match table.remove("sources") {
            None => None,
            Some(toml::Value::Table(entries)) => {
                let mut sources = Vec::with_capacity(entries.len());
                for (name, value) in entries {
                    let source: SourceLayer = value.try_into().map_err(|e: toml::de::Error| {
                        ConfigError::Parse(format!("sources.{}: {}", name, e))
                    })?;
                    sources.push((name, source));
                }
                Some(sources)
            }
            Some(other) => {
                return Err(ConfigError::Parse(format!(
                    "'sources' must be a table, found {}",
                    other.type_str()
                )))
            }
        };

        let scalars: JobScalars = toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Parse(e.to_string()))?;

        Ok(Self {
            target_root: scalars.target_root,
            host: scalars.host,
            excludes: scalars.excludes,
            verbose: scalars.verbose,
            dry_run: scalars.dry_run,
            console_override: scalars.console_override,
            capture_file: scalars.capture_file,
            logging_level: scalars.logging_level,
            sources,
        })
    }
}
