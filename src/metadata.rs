//! Metadata merge (`model_metadata.h`)
//!
//! The primary header is the base. The sizing constant becomes the maximum
//! of both models, and the allow-listed secondary constants are appended
//! under their namespaced names just before the closing `#endif`.

use std::path::Path;

use ei_header::{parse_defines, Defines, SourceHeader};

use crate::config::{MergeConfig, RenameEntry};
use crate::error::{MergeError, Side};
use crate::output::{read_source, write_atomic, FileDigest};

const CLOSING_TOKEN: &str = "#endif";

/// Result of merging two metadata texts in memory
#[derive(Debug, Clone)]
pub struct MetadataMerge {
    pub text: String,
    pub sizing: SizingResolution,
    /// Secondary keys copied, in emission order
    pub copied: Vec<RenameEntry>,
}

/// How the sizing constant was reconciled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizingResolution {
    pub key: String,
    pub primary: i64,
    pub secondary: i64,
    pub merged: i64,
}

/// Outcome of a metadata merge written to disk
#[derive(Debug, Clone)]
pub struct MetadataOutcome {
    pub sizing: SizingResolution,
    pub copied: Vec<RenameEntry>,
    pub primary: FileDigest,
    pub secondary: FileDigest,
    pub output: FileDigest,
}

/// Merge with the built-in configuration.
pub fn merge(
    primary_path: &Path,
    secondary_path: &Path,
    output_path: &Path,
) -> Result<MetadataOutcome, MergeError> {
    merge_with(&MergeConfig::default(), primary_path, secondary_path, output_path)
}

/// Merge two metadata headers and write the result to `output_path`.
///
/// Nothing is written unless every check passes.
pub fn merge_with(
    config: &MergeConfig,
    primary_path: &Path,
    secondary_path: &Path,
    output_path: &Path,
) -> Result<MetadataOutcome, MergeError> {
    let primary = read_source(primary_path)?;
    let secondary = read_source(secondary_path)?;

    let merged = merge_text(config, &primary.text, &secondary.text)?;
    let output = write_atomic(output_path, &merged.text)?;

    tracing::info!(
        output = %output_path.display(),
        copied = merged.copied.len(),
        "merged model metadata"
    );

    Ok(MetadataOutcome {
        sizing: merged.sizing,
        copied: merged.copied,
        primary: primary.digest,
        secondary: secondary.digest,
        output,
    })
}

/// Pure text merge behind [`merge_with`].
pub fn merge_text(
    config: &MergeConfig,
    primary_text: &str,
    secondary_text: &str,
) -> Result<MetadataMerge, MergeError> {
    let primary_defs = parse_defines(primary_text);
    let secondary_defs = parse_defines(secondary_text);
    let mut header = SourceHeader::from_text(primary_text);

    let sizing = resolve_sizing(&config.sizing_key, &primary_defs, &secondary_defs)?;
    if !header.replace_define(&sizing.key, &sizing.merged.to_string()) {
        return Err(MergeError::DefineLineNotFound {
            key: sizing.key.clone(),
        });
    }
    tracing::debug!(
        key = %sizing.key,
        primary = sizing.primary,
        secondary = sizing.secondary,
        merged = sizing.merged,
        "reconciled sizing constant"
    );

    let insert_at = header
        .last_line_starting_with(CLOSING_TOKEN)
        .ok_or(MergeError::MissingEndif)?;

    let mut copied = Vec::new();
    let mut block = vec![
        String::new(),
        format!(
            "// ---- Secondary model metadata ({}) - namespaced to avoid collisions ----",
            config.secondary.title()
        ),
    ];
    for entry in config.renames.iter() {
        let Some(value) = secondary_defs.get(&entry.source) else {
            tracing::debug!(key = %entry.source, "allow-listed key absent from secondary header");
            continue;
        };
        if primary_defs.contains(&entry.renamed) {
            return Err(MergeError::RenameCollision {
                source_key: entry.source.clone(),
                renamed: entry.renamed.clone(),
            });
        }
        block.push(format!("#define {} {}", entry.renamed, value));
        copied.push(entry.clone());
    }
    block.push(
        "// -------------------------------------------------------------------------".to_string(),
    );

    header.insert_block(insert_at, block);

    Ok(MetadataMerge {
        text: header.render(),
        sizing,
        copied,
    })
}

fn resolve_sizing(
    key: &str,
    primary: &Defines,
    secondary: &Defines,
) -> Result<SizingResolution, MergeError> {
    let primary_value = sizing_value(key, primary, Side::Primary)?;
    let secondary_value = sizing_value(key, secondary, Side::Secondary)?;
    Ok(SizingResolution {
        key: key.to_string(),
        primary: primary_value,
        secondary: secondary_value,
        merged: primary_value.max(secondary_value),
    })
}

fn sizing_value(key: &str, defines: &Defines, side: Side) -> Result<i64, MergeError> {
    let raw = defines.get(key).ok_or_else(|| MergeError::MissingConstant {
        key: key.to_string(),
        side,
    })?;
    raw.trim()
        .parse()
        .map_err(|_| MergeError::InvalidConstant {
            key: key.to_string(),
            side,
            value: raw.to_string(),
        })
}
