//! Configuration merge logic
//!
//! Implements the 4-layer overlay with:
//! - Objects: deep-merge by key
//! - Arrays: REPLACE (last wins)
//! - Scalars: override (last wins)
//!
//! Layer records only serialize the keys they actually set, so a layer
//! that says nothing about a field leaves the lower layer's value alone.
//! Job and source excludes are separate keys and are never merged into
//! `global_excludes` here.

use serde_json::Value;

use super::defaults::ConfigDefaults;
use super::global::GlobalConfigRecord;
use super::job::JobConfigRecord;
use super::resolved::{CommandLineOverrides, ResolvedConfig};
use super::ConfigError;

/// Deep merge two JSON values.
///
/// Merge semantics:
/// - Objects: deep-merge by key (recursive)
/// - Arrays: REPLACE (second wins entirely)
/// - Scalars: override (second wins)
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, overlay_value)
                } else {
                    overlay_value
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }

        (Value::Array(_), overlay @ Value::Array(_)) => overlay,

        (_, overlay) => overlay,
    }
}

/// Merge multiple config layers in order (first is base, last has highest precedence)
pub fn merge_layers(layers: Vec<Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}

/// Combine the global, job and command-line layers over the defaults.
///
/// Precedence for scalars: command line > job > global > defaults.
pub fn merge_configs(
    global: &GlobalConfigRecord,
    job: &JobConfigRecord,
    cmdline: &CommandLineOverrides,
) -> Result<ResolvedConfig, ConfigError> {
    let layers = vec![
        ConfigDefaults::default().to_value(),
        to_layer_value(global)?,
        to_layer_value(job)?,
        to_layer_value(cmdline)?,
    ];

    let merged = merge_layers(layers);
    serde_json::from_value(merged).map_err(|e| ConfigError::Merge(e.to_string()))
}

fn to_layer_value<T: serde::Serialize>(layer: &T) -> Result<Value, ConfigError> {
    serde_json::to_value(layer).map_err(|e| ConfigError::Merge(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::job::SourceEntry;
    use serde_json::json;

    fn job() -> JobConfigRecord {
        JobConfigRecord {
            target_root: "/backups/".to_string(),
            host: "/".to_string(),
            excludes: vec!["job-ex".to_string()],
            sources: vec![SourceEntry {
                name: "home".to_string(),
                location: "/home/".to_string(),
                target: "/backups/home/".to_string(),
                excludes: vec!["src-ex".to_string()],
            }],
            verbose: None,
            dry_run: None,
            console_override: None,
            capture_file: None,
            logging_level: None,
        }
    }

    #[test]
    fn test_scalar_override() {
        let result = deep_merge(json!({"verbose": false}), json!({"verbose": true}));
        assert_eq!(result["verbose"], true);
    }

    #[test]
    fn test_array_replace() {
        let result = deep_merge(
            json!({"tool_params": ["A", "B", "C"]}),
            json!({"tool_params": ["X"]}),
        );
        assert_eq!(result["tool_params"], json!(["X"]));
    }

    #[test]
    fn test_add_new_key() {
        let result = deep_merge(json!({"a": 1}), json!({"b": 2}));
        assert_eq!(result["a"], 1);
        assert_eq!(result["b"], 2);
    }

    #[test]
    fn test_merge_layers() {
        let result = merge_layers(vec![
            json!({"dry_run": false, "verbose": false}),
            json!({"verbose": true}),
            json!({"dry_run": true}),
        ]);
        assert_eq!(result["dry_run"], true);
        assert_eq!(result["verbose"], true);
    }

    #[test]
    fn test_defaults_flow_through() {
        let resolved = merge_configs(
            &GlobalConfigRecord::default(),
            &job(),
            &CommandLineOverrides::default(),
        )
        .unwrap();
        assert_eq!(resolved.tool_command, "rsync");
        assert_eq!(resolved.tool_params[0], "--delete");
        assert!(!resolved.verbose);
        assert_eq!(resolved.capture_file, None);
        assert_eq!(resolved.logging_level, "warning");
    }

    #[test]
    fn test_job_overrides_global() {
        let mut global = GlobalConfigRecord::default();
        global.verbose = true;
        global.capture_file = Some("global.txt".to_string());
        let mut job = job();
        job.verbose = Some(false);
        job.capture_file = Some("job.txt".to_string());

        let resolved = merge_configs(&global, &job, &CommandLineOverrides::default()).unwrap();
        assert!(!resolved.verbose);
        assert_eq!(resolved.capture_file.as_deref(), Some("job.txt"));
    }

    #[test]
    fn test_unset_job_field_keeps_global() {
        let mut global = GlobalConfigRecord::default();
        global.dry_run = true;
        global.logging_level = "info".to_string();

        let resolved = merge_configs(&global, &job(), &CommandLineOverrides::default()).unwrap();
        assert!(resolved.dry_run);
        assert_eq!(resolved.logging_level, "info");
    }

    #[test]
    fn test_cmdline_overrides_all() {
        let mut global = GlobalConfigRecord::default();
        global.console_override = false;
        let mut job = job();
        job.console_override = Some(false);
        job.capture_file = Some("job.txt".to_string());
        let cmdline = CommandLineOverrides {
            console_override: Some(true),
            capture_file: Some("cli.txt".to_string()),
            ..Default::default()
        };

        let resolved = merge_configs(&global, &job, &cmdline).unwrap();
        assert!(resolved.console_override);
        assert_eq!(resolved.capture_file.as_deref(), Some("cli.txt"));
    }

    #[test]
    fn test_excludes_stay_separate() {
        let mut global = GlobalConfigRecord::default();
        global.global_excludes = vec!["global-ex".to_string()];

        let resolved = merge_configs(&global, &job(), &CommandLineOverrides::default()).unwrap();
        assert_eq!(resolved.global_excludes, vec!["global-ex"]);
        assert_eq!(resolved.excludes, vec!["job-ex"]);
        assert_eq!(resolved.sources[0].excludes, vec!["src-ex"]);
    }

    #[test]
    fn test_global_record_not_mutated() {
        let global = GlobalConfigRecord::default();
        let before = global.clone();
        let _ = merge_configs(&global, &job(), &CommandLineOverrides::default()).unwrap();
        assert_eq!(global, before);
    }
}
