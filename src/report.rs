//! Machine-readable merge report (`--json`)

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::metadata::MetadataOutcome;
use crate::output::FileDigest;
use crate::variables::{HandleBinding, HandleSource, VariablesOutcome};

/// Schema identifier
pub const REPORT_SCHEMA_ID: &str = "ei-merge/report@1";

/// Which merger produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeKind {
    Metadata,
    Variables,
}

/// One merge, with digests of everything it read and wrote
#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    pub schema_id: String,
    pub kind: MergeKind,
    pub created_at: DateTime<Utc>,
    pub primary: FileDigest,
    pub secondary: FileDigest,
    pub output: FileDigest,
    /// Merger-specific details
    pub details: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl MergeReport {
    pub fn metadata(outcome: &MetadataOutcome) -> Self {
        let copied: Vec<Value> = outcome
            .copied
            .iter()
            .map(|e| json!({"source": e.source, "renamed": e.renamed}))
            .collect();
        Self {
            schema_id: REPORT_SCHEMA_ID.to_string(),
            kind: MergeKind::Metadata,
            created_at: Utc::now(),
            primary: outcome.primary.clone(),
            secondary: outcome.secondary.clone(),
            output: outcome.output.clone(),
            details: json!({
                "sizing": {
                    "key": outcome.sizing.key,
                    "primary": outcome.sizing.primary,
                    "secondary": outcome.sizing.secondary,
                    "merged": outcome.sizing.merged,
                },
                "copied": copied,
            }),
            warnings: Vec::new(),
        }
    }

    pub fn variables(outcome: &VariablesOutcome) -> Self {
        let merge = &outcome.merge;
        Self {
            schema_id: REPORT_SCHEMA_ID.to_string(),
            kind: MergeKind::Variables,
            created_at: Utc::now(),
            primary: outcome.primary.clone(),
            secondary: outcome.secondary.clone(),
            output: outcome.output.clone(),
            details: json!({
                "aliases_removed": merge.aliases_removed,
                "guards": {
                    "primary": {"opening": merge.primary_guard.opening, "closing": merge.primary_guard.closing},
                    "secondary": {"opening": merge.secondary_guard.opening, "closing": merge.secondary_guard.closing},
                },
                "handles": [handle_json(&merge.primary_handle), handle_json(&merge.secondary_handle)],
            }),
            warnings: merge.warnings.clone(),
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn handle_json(binding: &HandleBinding) -> Value {
    let source = match binding.source {
        HandleSource::Discovered => "discovered",
        HandleSource::Fallback => "fallback",
    };
    json!({
        "alias": binding.alias,
        "symbol": binding.handle.symbol(),
        "source": source,
    })
}
