//! Config file discovery and loading
//!
//! File conventions:
//! - global: `<configs_dir>/global.toml`
//! - job: `<configs_dir>/config.<job>.toml`
//!
//! Either can be replaced by an explicit path. A missing conventional
//! global file means "defaults only"; a missing explicit global file or a
//! missing job file is an error.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::defaults::DEFAULT_CONFIGS_DIR;
use super::global::{resolve_global, GlobalConfigRecord};
use super::job::{resolve_job, JobConfigRecord};
use super::layer::{GlobalLayer, JobLayer};
use super::merge::merge_configs;
use super::resolved::{CommandLineOverrides, LayerOrigin, LayerSource, ResolvedConfig};
use super::ConfigError;
use crate::logging::LogLevelEffect;

/// Extension of config files
pub const CONFIG_EXT: &str = "toml";

/// Where to look for the global and job files
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Directory holding the config files (default: /etc/rsyncr/)
    pub configs_dir: Option<PathBuf>,

    /// Explicit global config file
    pub global_config: Option<PathBuf>,

    /// Explicit job config file
    pub job_config: Option<PathBuf>,
}

impl ConfigPaths {
    fn dir(&self) -> PathBuf {
        self.configs_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIGS_DIR))
    }

    /// Path of the global config file
    pub fn global_path(&self) -> PathBuf {
        self.global_config
            .clone()
            .unwrap_or_else(|| self.dir().join(format!("global.{}", CONFIG_EXT)))
    }

    /// Path of the config file for `job`
    pub fn job_path(&self, job: &str) -> PathBuf {
        self.job_config
            .clone()
            .unwrap_or_else(|| self.dir().join(format!("config.{}.{}", job, CONFIG_EXT)))
    }
}

/// Everything loading produced
#[derive(Debug, Clone)]
pub struct Loaded {
    pub config: ResolvedConfig,

    /// Log level requested by the global layer
    pub global_log_effect: LogLevelEffect,
}

/// Read a config file, returning its text and SHA-256 digest
pub fn read_config_file(path: &Path) -> Result<(String, String), ConfigError> {
    let bytes =
        fs::read(path).map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let contents = String::from_utf8(bytes)
        .map_err(|e| ConfigError::Parse(format!("{}: invalid UTF-8: {}", path.display(), e)))?;

    Ok((contents, digest))
}

/// Load the global layer.
///
/// A missing file yields the defaults unless `required` is set, which is
/// the case when the path was given explicitly.
pub fn load_global(
    path: &Path,
    required: bool,
) -> Result<(GlobalConfigRecord, LogLevelEffect, Option<LayerSource>), ConfigError> {
    if !required && !path.exists() {
        tracing::debug!(path = %path.display(), "no global config, using defaults");
        let (record, effect) = resolve_global(&GlobalLayer::default());
        return Ok((record, effect, None));
    }

    let (contents, digest) = read_config_file(path)?;
    let layer = GlobalLayer::parse(&contents)?;
    let (record, effect) = resolve_global(&layer);
    let source = LayerSource {
        origin: LayerOrigin::Global,
        path: Some(path.to_string_lossy().to_string()),
        digest: Some(digest),
    };
    Ok((record, effect, Some(source)))
}

/// Load and validate a job layer
pub fn load_job(path: &Path) -> Result<(JobConfigRecord, LayerSource), ConfigError> {
    let (contents, digest) = read_config_file(path)?;
    let layer = JobLayer::parse(&contents)?;
    let record = resolve_job(&layer)?;
    let source = LayerSource {
        origin: LayerOrigin::Job,
        path: Some(path.to_string_lossy().to_string()),
        digest: Some(digest),
    };
    Ok((record, source))
}

/// Load all layers for `job` and merge them
pub fn load(
    job: &str,
    paths: &ConfigPaths,
    cmdline: &CommandLineOverrides,
) -> Result<Loaded, ConfigError> {
    let mut layers = vec![LayerSource::builtin()];

    let explicit_global = paths.global_config.is_some();
    let (global, global_log_effect, global_source) =
        load_global(&paths.global_path(), explicit_global)?;
    layers.extend(global_source);

    let (job_record, job_source) = load_job(&paths.job_path(job))?;
    layers.push(job_source);

    if !cmdline.is_empty() {
        layers.push(LayerSource::cli());
    }

    let config = merge_configs(&global, &job_record, cmdline)?.with_layers(layers);
    tracing::debug!(job, sources = config.sources.len(), "configuration resolved");

    Ok(Loaded {
        config,
        global_log_effect,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_default_paths() {
        let paths = ConfigPaths::default();
        assert_eq!(paths.global_path(), PathBuf::from("/etc/rsyncr/global.toml"));
        assert_eq!(paths.job_path("dude"), PathBuf::from("/etc/rsyncr/config.dude.toml"));
    }

    #[test]
    fn test_configs_dir_and_explicit_paths() {
        let paths = ConfigPaths {
            configs_dir: Some(PathBuf::from("/tmp/cfg")),
            global_config: None,
            job_config: Some(PathBuf::from("/elsewhere/job.toml")),
        };
        assert_eq!(paths.global_path(), PathBuf::from("/tmp/cfg/global.toml"));
        assert_eq!(paths.job_path("x"), PathBuf::from("/elsewhere/job.toml"));
    }

    #[test]
    fn test_missing_global_gives_defaults() {
        let dir = tempdir().unwrap();
        let (record, effect, source) =
            load_global(&dir.path().join("global.toml"), false).unwrap();
        assert_eq!(record, GlobalConfigRecord::default());
        assert_eq!(effect.level, "warning");
        assert!(source.is_none());
    }

    #[test]
    fn test_missing_explicit_global_is_error() {
        let dir = tempdir().unwrap();
        let job_path = dir.path().join("job.toml");
        fs::write(
            &job_path,
            "target_root = \"/b/\"\n[sources.a]\nlocation = \"/a\"\ntarget = \"a\"\n",
        )
        .unwrap();

        let paths = ConfigPaths {
            configs_dir: None,
            global_config: Some(dir.path().join("typo-global.toml")),
            job_config: Some(job_path),
        };
        let err = load("x", &paths, &CommandLineOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Io(ref m) if m.contains("typo-global.toml")));
    }

    #[test]
    fn test_missing_job_is_error() {
        let dir = tempdir().unwrap();
        let err = load_job(&dir.path().join("config.nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_digest_recorded() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "verbose = true").unwrap();

        let (record, _, source) = load_global(temp.path(), true).unwrap();
        assert!(record.verbose);
        let source = source.unwrap();
        assert_eq!(source.origin, LayerOrigin::Global);
        assert_eq!(source.digest.unwrap().len(), 64);
    }

    #[test]
    fn test_load_from_configs_dir() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("global.toml"),
            "added_rsync_params = [\"--quiet\"]\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("config.box.toml"),
            r#"
target_root = "/backups/"
[sources.etc]
location = "/etc"
target = "etc"
"#,
        )
        .unwrap();

        let paths = ConfigPaths {
            configs_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let cmdline = CommandLineOverrides {
            dry_run: Some(true),
            ..Default::default()
        };
        let loaded = load("box", &paths, &cmdline).unwrap();

        assert!(loaded.config.dry_run);
        assert!(loaded.config.tool_params.contains(&"--quiet".to_string()));
        assert_eq!(loaded.config.sources[0].target, "/backups/etc/");
        let origins: Vec<_> = loaded.config.layers.iter().map(|l| l.origin.clone()).collect();
        assert_eq!(
            origins,
            vec![LayerOrigin::Builtin, LayerOrigin::Global, LayerOrigin::Job, LayerOrigin::Cli]
        );
    }
}
