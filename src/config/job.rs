//! Job layer resolution (layer 3)
//!
//! Validates a parsed `config.<job>.toml` and resolves every source into
//! final rsync location/target strings. Job and source excludes are kept
//! apart from the global ones; they only meet when a command is built.

use serde::{Deserialize, Serialize};

use super::layer::{JobLayer, SourceLayer};
use super::path::{self, ROOT};
use super::ConfigError;

/// Host value meaning "this machine" in job files
pub const LOCAL_HOST: &str = "local";

/// One resolved source directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Unique name within the job
    pub name: String,

    /// rsync source, host-qualified for remote jobs
    pub location: String,

    /// rsync destination
    pub target: String,

    /// Source-level exclude patterns
    pub excludes: Vec<String>,
}

/// Validated job configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfigRecord {
    pub target_root: String,

    /// `/` for local jobs, otherwise a host qualifier such as `pasilla:`
    pub host: String,

    /// Job-level exclude patterns
    pub excludes: Vec<String>,

    /// Sources in authored order
    pub sources: Vec<SourceEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub console_override: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging_level: Option<String>,
}

impl JobConfigRecord {
    pub fn is_local(&self) -> bool {
        self.host == ROOT
    }
}

/// Validate a job layer and resolve its sources
pub fn resolve_job(layer: &JobLayer) -> Result<JobConfigRecord, ConfigError> {
    let target_root = layer
        .target_root
        .clone()
        .ok_or_else(|| ConfigError::validation("config missing target_root"))?;

    let raw_sources = match &layer.sources {
        Some(sources) if !sources.is_empty() => sources,
        _ => {
            return Err(ConfigError::validation(
                "config missing sources or no sources there",
            ))
        }
    };

    let host = match layer.host.as_deref() {
        None | Some(LOCAL_HOST) => ROOT.to_string(),
        Some(h) => h.to_string(),
    };

    let mut sources = Vec::with_capacity(raw_sources.len());
    for (name, raw) in raw_sources {
        sources.push(resolve_source(name, raw, &host, &target_root)?);
    }

    Ok(JobConfigRecord {
        target_root,
        host,
        excludes: layer.excludes.clone().unwrap_or_default(),
        sources,
        verbose: layer.verbose,
        dry_run: layer.dry_run,
        console_override: layer.console_override,
        capture_file: layer.capture_file.clone(),
        logging_level: layer.logging_level.clone(),
    })
}

fn resolve_source(
    name: &str,
    raw: &SourceLayer,
    host: &str,
    target_root: &str,
) -> Result<SourceEntry, ConfigError> {
    let raw_location = raw
        .location
        .as_deref()
        .ok_or_else(|| ConfigError::validation(format!("need a 'location' in sources {}", name)))?;
    if !raw_location.starts_with(path::SEPARATOR) {
        return Err(ConfigError::validation(format!(
            "'{}' needs to be a valid path in sources {}",
            raw_location, name
        )));
    }
    let raw_target = raw
        .target
        .as_deref()
        .ok_or_else(|| ConfigError::validation(format!("need a 'target' in sources {}", name)))?;
    if matches!(&raw.excludes, Some(e) if e.is_empty()) {
        return Err(ConfigError::validation(format!(
            "excludes should be a non-empty list in sources {}",
            name
        )));
    }

    let loc = path::normalize(raw_location);
    let location = if host == ROOT {
        path::normalize(&path::join(host, &loc))
    } else {
        // Joining drops the host qualifier, so prepend it verbatim
        format!("{}{}", host, loc)
    };

    let target = match &raw.target_full_path {
        Some(full) => path::normalize(full),
        None => path::normalize(&path::join(target_root, raw_target)),
    };

    Ok(SourceEntry {
        name: name.to_string(),
        location,
        target,
        excludes: raw.excludes.clone().unwrap_or_default(),
    })
}
