//! Merge configuration
//!
//! Three layers, later wins:
//! 1. Built-in defaults
//! 2. Config file (`ei-merge.toml`, or `--config`)
//! 3. CLI flags

mod defaults;
mod file;
mod renames;

pub use defaults::{
    ALLOW_LIST, DEFAULT_CONFIG_FILE, DEFAULT_PRIMARY_NAME, DEFAULT_PRIMARY_PROJECT_ID,
    DEFAULT_SECONDARY_NAME, DEFAULT_SECONDARY_PROJECT_ID, FALLBACK_SLOT, MERGED_GUARD, SIZING_KEY, SOURCE_GUARD,
};
pub use file::{ConfigFile, MetadataSection, ModelSection, ModelsSection, VariablesSection};
pub use renames::{RenameEntry, RenameTable};

use std::io;
use std::path::{Path, PathBuf};

use ei_header::{is_c_identifier, is_define_key};
use serde::Serialize;

/// Error types for config operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// One of the two models being merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelSpec {
    /// Short lowercase name, used in handle aliases and comments (e.g. "bee")
    pub name: String,

    /// Edge Impulse project id. Handles of this project are preferred during
    /// discovery and it names the fallback handle. When unset a header that
    /// declares no handle cannot be merged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
}

impl ModelSpec {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            project_id: None,
        }
    }

    /// Name with the first letter capitalized ("Varroa")
    pub fn title(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Name of the explicit handle alias (`ei_<name>_impulse`)
    pub fn handle_alias(&self) -> String {
        format!("ei_{}_impulse", self.name)
    }
}

/// CLI-level overrides (layer 3)
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub primary_name: Option<String>,
    pub secondary_name: Option<String>,
    pub primary_project_id: Option<u64>,
    pub secondary_project_id: Option<u64>,
}

/// Effective merge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeConfig {
    pub primary: ModelSpec,
    pub secondary: ModelSpec,

    /// Constant reconciled by maximum
    pub sizing_key: String,

    /// Allow-listed secondary keys and their namespaced names
    pub renames: RenameTable,

    /// Guard symbol stripped from both variables headers
    pub source_guard: String,

    /// Guard symbol of the merged variables header
    pub merged_guard: String,

    /// Slot used for a handle that could not be discovered
    pub fallback_slot: u32,
}

impl MergeConfig {
    /// Resolve the effective configuration.
    ///
    /// With `path` set the file must exist. Without it, `ei-merge.toml` in
    /// the working directory is used when present.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => Some(ConfigFile::from_file(p)?),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    tracing::debug!(path = %default_path.display(), "using config file from working directory");
                    Some(ConfigFile::from_file(default_path)?)
                } else {
                    None
                }
            }
        };
        Self::resolve(file.unwrap_or_default(), overrides)
    }

    /// Layer a parsed file and CLI overrides over the built-in defaults.
    pub fn resolve(file: ConfigFile, overrides: &Overrides) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let primary = file.models.primary;
        let secondary = file.models.secondary;
        if let Some(name) = primary.name {
            config.primary.name = name;
        }
        if primary.project_id.is_some() {
            config.primary.project_id = primary.project_id;
        }
        if let Some(name) = secondary.name {
            config.secondary.name = name;
        }
        if secondary.project_id.is_some() {
            config.secondary.project_id = secondary.project_id;
        }

        if let Some(key) = file.metadata.sizing_key {
            config.sizing_key = key;
        }
        if let Some(guard) = file.variables.source_guard {
            config.source_guard = guard;
        }
        if let Some(guard) = file.variables.merged_guard {
            config.merged_guard = guard;
        }
        if let Some(slot) = file.variables.fallback_slot {
            config.fallback_slot = slot;
        }

        if let Some(ref name) = overrides.primary_name {
            config.primary.name = name.clone();
        }
        if let Some(ref name) = overrides.secondary_name {
            config.secondary.name = name.clone();
        }
        if overrides.primary_project_id.is_some() {
            config.primary.project_id = overrides.primary_project_id;
        }
        if overrides.secondary_project_id.is_some() {
            config.secondary.project_id = overrides.secondary_project_id;
        }

        // An explicit table wins; otherwise namespace under the final secondary name
        config.renames = match file.metadata.renames {
            Some(pairs) => RenameTable::from_pairs(pairs)?,
            None => RenameTable::namespaced(&config.secondary.name),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for model in [&self.primary, &self.secondary] {
            if !is_c_identifier(&model.name) {
                return Err(ConfigError::ValidationError(format!(
                    "Model name must be a C identifier: {:?}",
                    model.name
                )));
            }
        }
        if self.primary.name == self.secondary.name {
            return Err(ConfigError::ValidationError(format!(
                "Primary and secondary models share the name '{}'",
                self.primary.name
            )));
        }

        if !is_define_key(&self.sizing_key) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid sizing key: {:?}",
                self.sizing_key
            )));
        }

        for (what, guard) in [
            ("source_guard", &self.source_guard),
            ("merged_guard", &self.merged_guard),
        ] {
            if !is_c_identifier(guard) {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be a C identifier: {:?}",
                    what, guard
                )));
            }
        }
        if self.source_guard == self.merged_guard {
            return Err(ConfigError::ValidationError(
                "merged_guard must differ from source_guard".to_string(),
            ));
        }

        self.renames.validate()
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
