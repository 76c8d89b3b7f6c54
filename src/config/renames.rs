//! Explicit rename table for secondary metadata constants

use std::collections::BTreeSet;

use ei_header::is_define_key;
use serde::Serialize;

use super::defaults::ALLOW_LIST;
use super::ConfigError;

/// One allow-listed key and the name it takes in the merged header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameEntry {
    pub source: String,
    pub renamed: String,
}

/// Allow-list and rename mapping in one: only keys listed here are copied
/// from the secondary header, in this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RenameTable {
    entries: Vec<RenameEntry>,
}

impl RenameTable {
    /// Built-in allow-list namespaced under `EI_<MODEL>_`.
    pub fn namespaced(model_name: &str) -> Self {
        let prefix = format!("EI_{}_", model_name.to_ascii_uppercase());
        let entries = ALLOW_LIST
            .iter()
            .map(|(source, suffix)| RenameEntry {
                source: source.to_string(),
                renamed: format!("{}{}", prefix, suffix),
            })
            .collect();
        Self { entries }
    }

    /// Build from `(source, renamed)` pairs and validate.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, ConfigError> {
        let table = Self {
            entries: pairs
                .into_iter()
                .map(|(source, renamed)| RenameEntry { source, renamed })
                .collect(),
        };
        table.validate()?;
        Ok(table)
    }

    /// Rules: non-empty; every key and target is a define identifier;
    /// sources unique; targets unique; no target is itself an allow-listed
    /// source.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entries.is_empty() {
            return Err(ConfigError::ValidationError(
                "Rename table must list at least one key".to_string(),
            ));
        }

        let mut sources = BTreeSet::new();
        let mut targets = BTreeSet::new();
        for entry in &self.entries {
            for name in [&entry.source, &entry.renamed] {
                if !is_define_key(name) {
                    return Err(ConfigError::ValidationError(format!(
                        "Invalid define key in rename table: {:?}",
                        name
                    )));
                }
            }
            if !sources.insert(entry.source.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "Duplicate source key in rename table: {}",
                    entry.source
                )));
            }
            if !targets.insert(entry.renamed.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "Duplicate renamed key in rename table: {}",
                    entry.renamed
                )));
            }
        }

        if let Some(clash) = targets.intersection(&sources).next() {
            return Err(ConfigError::ValidationError(format!(
                "Renamed key {} is also an allow-listed source key",
                clash
            )));
        }

        Ok(())
    }

    /// Renamed key for `source`, if it is allow-listed.
    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.source == source)
            .map(|e| e.renamed.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenameEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    #[test]
    fn test_namespaced_uses_model_name() {
        let table = RenameTable::namespaced("mite");
        assert_eq!(table.get("EI_CLASSIFIER_PROJECT_ID"), Some("EI_MITE_PROJECT_ID"));
        assert_eq!(table.len(), ALLOW_LIST.len());
    }

    #[test]
    fn test_from_pairs_keeps_order() {
        let table = RenameTable::from_pairs(pairs(&[("B_KEY", "X_B"), ("A_KEY", "X_A")])).unwrap();
        let order: Vec<_> = table.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(order, vec!["B_KEY", "A_KEY"]);
    }

    #[test]
    fn test_rejects_empty() {
        assert!(RenameTable::from_pairs(vec![]).is_err());
    }

    #[test]
    fn test_rejects_duplicate_target() {
        let err = RenameTable::from_pairs(pairs(&[("A", "X"), ("B", "X")])).unwrap_err();
        assert!(err.to_string().contains("Duplicate renamed key"));
    }

    #[test]
    fn test_rejects_duplicate_source() {
        let err = RenameTable::from_pairs(pairs(&[("A", "X"), ("A", "Y")])).unwrap_err();
        assert!(err.to_string().contains("Duplicate source key"));
    }

    #[test]
    fn test_rejects_invalid_key() {
        let err = RenameTable::from_pairs(pairs(&[("A", "ei_lower")])).unwrap_err();
        assert!(err.to_string().contains("Invalid define key"));
    }

    #[test]
    fn test_rejects_identity_rename() {
        let err = RenameTable::from_pairs(pairs(&[("A", "A")])).unwrap_err();
        assert!(err.to_string().contains("also an allow-listed source"));
    }

    #[test]
    fn test_rejects_chained_rename() {
        let err = RenameTable::from_pairs(pairs(&[("A", "B"), ("B", "C")])).unwrap_err();
        assert!(err.to_string().contains("also an allow-listed source"));
    }
}
