//! Pipeline configuration module.
//!
//! Handles loading, validating, and merging `querypix.toml`. Stock defaults
//! are the base layer; a user file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [pipeline]
//! enabled = ["resize", "rotate", "flip", "flop", "median", "blur", "hsb", "grayscale", "invert"]
//!
//! [defaults]
//! # kernel = "mitchell"    # Applied when the query does not set the key
//!
//! [aliases]
//! width = [{ key = "w" }]
//! saturation = [{ key = "sat", deprecated = true }]
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Tables merge key by key, arrays are replaced whole. This drops the `w`
//! shorthand while keeping every other alias:
//!
//! ```toml
//! [aliases]
//! width = []
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::context::{Alias, ParamAliases};
use crate::transforms::{BUILTIN_FACTORIES, builtin_factory};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "querypix.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Pipeline configuration loaded from `querypix.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Which factories run, in application order.
    pub pipeline: StagesConfig,
    /// Parameter values used when the query leaves a key out.
    pub defaults: BTreeMap<String, String>,
    /// Alias rules per canonical parameter name.
    pub aliases: BTreeMap<String, Vec<Alias>>,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pipeline: StagesConfig::default(),
            defaults: BTreeMap::new(),
            aliases: ParamAliases::builtin().rules().clone(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Validate names and limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for name in &self.pipeline.enabled {
            if builtin_factory(name).is_none() {
                return Err(ConfigError::Validation(format!(
                    "pipeline.enabled: unknown transform `{name}`"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "pipeline.enabled: `{name}` listed twice"
                )));
            }
        }

        if self.defaults.keys().any(|k| k.is_empty()) {
            return Err(ConfigError::Validation(
                "defaults: keys must not be empty".into(),
            ));
        }

        for (canonical, aliases) in &self.aliases {
            if canonical.is_empty() {
                return Err(ConfigError::Validation(
                    "aliases: names must not be empty".into(),
                ));
            }
            for alias in aliases {
                if alias.key.is_empty() || alias.key == *canonical {
                    return Err(ConfigError::Validation(format!(
                        "aliases.{canonical}: invalid alias key `{}`",
                        alias.key
                    )));
                }
            }
        }

        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Enabled transform factories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StagesConfig {
    /// Factory names, in the order their transforms are applied.
    pub enabled: Vec<String>,
}

impl Default for StagesConfig {
    fn default() -> Self {
        Self {
            enabled: BUILTIN_FACTORIES
                .iter()
                .map(|f| f.name.to_string())
                .collect(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(PipelineConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PipelineConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PipelineConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is missing.
pub fn load_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    if overlay.is_none() {
        log::debug!(target: "querypix", "no config at {}, using defaults", path.display());
    }
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `querypix.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# querypix Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Tables merge key by key with the stock defaults; arrays replace them.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Pipeline
# ---------------------------------------------------------------------------
[pipeline]
# Transforms that may run, in the order they are applied.
# Remove a name to disable that transform entirely.
enabled = ["resize", "rotate", "flip", "flop", "median", "blur", "hsb", "grayscale", "invert"]

# ---------------------------------------------------------------------------
# Parameter defaults
# ---------------------------------------------------------------------------
[defaults]
# Values used when a request leaves the key out. Same syntax as the query.
# kernel = "mitchell"
# subsampling = "4:4:4"

# ---------------------------------------------------------------------------
# Parameter aliases
# ---------------------------------------------------------------------------
[aliases]
# Alternative spellings per canonical name, tried in order after the
# canonical name itself. Deprecated aliases still work but log a warning.
brightness = [{ key = "bright", deprecated = true }]
height = [{ key = "h", deprecated = false }]
kernel = [{ key = "resample", deprecated = true }]
rotate = [{ key = "rotation", deprecated = true }]
saturation = [{ key = "sat", deprecated = true }]
width = [{ key = "w", deprecated = false }]

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for batch runs.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
