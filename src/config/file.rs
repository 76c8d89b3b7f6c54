//! Config file format (`ei-merge.toml`)
//!
//! Every key is optional; absent keys keep the built-in default.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub models: ModelsSection,
    pub metadata: MetadataSection,
    pub variables: VariablesSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelsSection {
    pub primary: ModelSection,
    pub secondary: ModelSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelSection {
    pub name: Option<String>,
    pub project_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataSection {
    pub sizing_key: Option<String>,
    /// `[[source, renamed], ...]`; replaces the built-in allow-list
    pub renames: Option<Vec<(String, String)>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VariablesSection {
    pub source_guard: Option<String>,
    pub merged_guard: Option<String>,
    pub fallback_slot: Option<u32>,
}

impl ConfigFile {
    /// Load and parse a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&contents)
    }

    /// Parse config from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}
