//! Configuration schema for vuidstat
//!
//! Config lives at `.config/vuidstat/config.json` relative to the layer
//! source root. Every field is optional; anything left out falls back to the
//! stock validation-layers tree layout.

use eyre::{Result, WrapErr};
use facet::Facet;
use std::path::{Path, PathBuf};
use vuidstat_core::{ConsistencyPolicy, DEFAULT_TEST_GROUPS, group_trigger};

/// Default config location under the source root
pub const DEFAULT_CONFIG_PATH: &str = ".config/vuidstat/config.json";

const DEFAULT_LAYER_SOURCES: &[&str] = &[
    "layers/core_validation.cpp",
    "layers/descriptor_sets.cpp",
    "layers/parameter_validation_utils.cpp",
    "layers/object_tracker_utils.cpp",
    "layers/shader_validation.cpp",
    "layers/buffer_validation.cpp",
];

const DEFAULT_GENERATED_SOURCES: &[&str] = &["parameter_validation.cpp", "object_tracker.cpp"];

const DEFAULT_GENERATED_DIRS: &[&str] = &["build/layers", "dbuild/layers", "release/layers"];

const DEFAULT_TEST_SOURCES: &[&str] = &["tests/layer_validation_tests.cpp"];

/// Root configuration for vuidstat
#[derive(Debug, Clone, Default, Facet)]
pub struct Config {
    /// Hand-written layer sources, scanned in order
    #[facet(default)]
    pub layer_sources: Option<Vec<String>>,

    /// Generated layer sources, located by probing `generated_dirs`
    #[facet(default)]
    pub generated_sources: Option<Vec<String>>,

    /// Build directories probed for generated sources, first match wins
    #[facet(default)]
    pub generated_dirs: Option<Vec<String>>,

    /// Layer test sources
    #[facet(default)]
    pub test_sources: Option<Vec<String>>,

    /// Test fixture groups whose `TEST_F` declarations open a test
    #[facet(default)]
    pub test_groups: Option<Vec<String>>,

    /// Fold deprecated identifier spellings before comparing
    #[facet(default)]
    pub dealias: Option<bool>,

    /// Leave provisional identifiers out of every report
    #[facet(default)]
    pub ignore_unassigned: Option<bool>,
}

fn or_defaults(value: &Option<Vec<String>>, defaults: &[&str]) -> Vec<String> {
    match value {
        Some(list) => list.clone(),
        None => defaults.iter().map(|s| s.to_string()).collect(),
    }
}

impl Config {
    /// Load the config at `path`. A missing file at the default location is
    /// not an error; a missing file the user asked for is.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        if !path.exists() {
            if required {
                eyre::bail!("Config file not found at {}", path.display());
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = facet_json::from_str(&content)
            .map_err(|e| eyre::eyre!("{e}"))
            .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn layer_sources(&self, root: &Path) -> Vec<PathBuf> {
        or_defaults(&self.layer_sources, DEFAULT_LAYER_SOURCES)
            .iter()
            .map(|p| root.join(p))
            .collect()
    }

    pub fn generated_sources(&self) -> Vec<String> {
        or_defaults(&self.generated_sources, DEFAULT_GENERATED_SOURCES)
    }

    pub fn generated_dirs(&self) -> Vec<String> {
        or_defaults(&self.generated_dirs, DEFAULT_GENERATED_DIRS)
    }

    pub fn test_sources(&self, root: &Path) -> Vec<PathBuf> {
        or_defaults(&self.test_sources, DEFAULT_TEST_SOURCES)
            .iter()
            .map(|p| root.join(p))
            .collect()
    }

    /// Declaration triggers for the configured test groups
    pub fn test_triggers(&self) -> Vec<String> {
        or_defaults(&self.test_groups, DEFAULT_TEST_GROUPS)
            .iter()
            .map(|group| group_trigger(group))
            .collect()
    }

    /// Policy from the file, with command-line overrides applied on top
    pub fn policy(&self, keep_aliases: bool, report_unassigned: bool) -> ConsistencyPolicy {
        let defaults = ConsistencyPolicy::default();
        ConsistencyPolicy {
            dealias: !keep_aliases && self.dealias.unwrap_or(defaults.dealias),
            ignore_unassigned: !report_unassigned
                && self.ignore_unassigned.unwrap_or(defaults.ignore_unassigned),
        }
    }
}
