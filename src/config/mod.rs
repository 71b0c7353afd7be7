//! Configuration cascade
//!
//! Implements the 4-layer configuration merge:
//! 1. Built-in defaults
//! 2. Global config (<configs_dir>/global.toml)
//! 3. Job config (<configs_dir>/config.<job>.toml)
//! 4. CLI flags
//!
//! Exclude lists are the exception: global, job and source excludes stay
//! separate and accumulate when a command is built.

mod defaults;
mod error;
mod global;
mod job;
mod layer;
mod loader;
mod merge;
pub mod path;
mod resolved;

pub use defaults::{ConfigDefaults, DEFAULT_CONFIGS_DIR, DEFAULT_RSYNC_PARAMS};
pub use error::ConfigError;
pub use global::{resolve_global, GlobalConfigRecord};
pub use job::{resolve_job, JobConfigRecord, SourceEntry, LOCAL_HOST};
pub use layer::{GlobalLayer, JobLayer, SourceLayer};
pub use loader::{load, load_global, load_job, read_config_file, ConfigPaths, Loaded};
pub use merge::{deep_merge, merge_configs, merge_layers};
pub use resolved::{CommandLineOverrides, LayerOrigin, LayerSource, ResolvedConfig};
