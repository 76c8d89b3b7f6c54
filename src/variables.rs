//! Variables merge (`model_variables.h`)
//!
//! Both bodies lose their include guard, the secondary loses its generic
//! aliases, and the result is re-wrapped in one merged guard followed by
//! explicit per-model handle aliases.

use std::path::Path;

use ei_header::{resolve_handle, strip_guard, GenericAliasSet, GuardStrip, ImpulseHandle};

use crate::config::{MergeConfig, ModelSpec};
use crate::error::MergeError;
use crate::output::{read_source, write_atomic, FileDigest};

/// Where a handle symbol came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleSource {
    /// Declared in the body
    Discovered,
    /// Not declared; built from the configured project id and fallback slot
    Fallback,
}

/// Handle alias emitted for one model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleBinding {
    /// Local alias name (`ei_bee_impulse`)
    pub alias: String,
    pub handle: ImpulseHandle,
    pub source: HandleSource,
}

impl HandleBinding {
    fn declaration(&self) -> String {
        format!(
            "static inline ei_impulse_handle_t& {} = {};",
            self.alias,
            self.handle.symbol()
        )
    }
}

/// Which guard parts were found in one input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardReport {
    pub opening: bool,
    pub closing: bool,
}

impl From<&GuardStrip> for GuardReport {
    fn from(strip: &GuardStrip) -> Self {
        Self {
            opening: strip.opening,
            closing: strip.closing,
        }
    }
}

/// Result of merging two variables texts in memory
#[derive(Debug, Clone)]
pub struct VariablesMerge {
    pub text: String,
    pub primary_guard: GuardReport,
    pub secondary_guard: GuardReport,
    /// Generic alias lines dropped from the secondary body
    pub aliases_removed: usize,
    pub primary_handle: HandleBinding,
    pub secondary_handle: HandleBinding,
    /// Conditions that did not stop the merge but may need a look
    pub warnings: Vec<String>,
}

/// Outcome of a variables merge written to disk
#[derive(Debug, Clone)]
pub struct VariablesOutcome {
    pub merge: VariablesMerge,
    pub primary: FileDigest,
    pub secondary: FileDigest,
    pub output: FileDigest,
}

/// Merge with the built-in configuration.
pub fn merge(
    primary_path: &Path,
    secondary_path: &Path,
    output_path: &Path,
) -> Result<VariablesOutcome, MergeError> {
    merge_with(&MergeConfig::default(), primary_path, secondary_path, output_path)
}

/// Merge two variables headers and write the result to `output_path`.
pub fn merge_with(
    config: &MergeConfig,
    primary_path: &Path,
    secondary_path: &Path,
    output_path: &Path,
) -> Result<VariablesOutcome, MergeError> {
    let primary = read_source(primary_path)?;
    let secondary = read_source(secondary_path)?;

    let merge = merge_text(config, &primary.text, &secondary.text)?;
    let output = write_atomic(output_path, &merge.text)?;

    tracing::info!(
        output = %output_path.display(),
        aliases_removed = merge.aliases_removed,
        primary_handle = %merge.primary_handle.handle,
        secondary_handle = %merge.secondary_handle.handle,
        "merged model variables"
    );

    Ok(VariablesOutcome {
        merge,
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
) -> Result<VariablesMerge, MergeError> {
    let mut warnings = Vec::new();

    let primary_strip = strip_guard(primary_text, &config.source_guard)?;
    let secondary_strip = strip_guard(secondary_text, &config.source_guard)?;
    report_guard(&config.primary, &config.source_guard, &primary_strip, &mut warnings);
    report_guard(&config.secondary, &config.source_guard, &secondary_strip, &mut warnings);

    // The primary keeps its generic aliases so existing firmware code still
    // resolves ei_default_impulse to it
    let (secondary_body, aliases_removed) =
        GenericAliasSet::standard()?.remove_from(&secondary_strip.body);
    tracing::debug!(removed = aliases_removed, "removed generic aliases from secondary");

    let primary_handle = bind_handle(config, &config.primary, &primary_strip.body, &mut warnings)?;
    let secondary_handle =
        bind_handle(config, &config.secondary, &secondary_body, &mut warnings)?;

    let text = render(
        config,
        &primary_strip.body,
        &secondary_body,
        &primary_handle,
        &secondary_handle,
    );

    Ok(VariablesMerge {
        text,
        primary_guard: GuardReport::from(&primary_strip),
        secondary_guard: GuardReport::from(&secondary_strip),
        aliases_removed,
        primary_handle,
        secondary_handle,
        warnings,
    })
}

fn report_guard(model: &ModelSpec, guard: &str, strip: &GuardStrip, warnings: &mut Vec<String>) {
    if !strip.opening {
        let msg = format!("{} header: no leading #ifndef/#define {} pair", model.name, guard);
        tracing::warn!("{}", msg);
        warnings.push(msg);
    }
    if !strip.closing {
        let msg = format!("{} header: no trailing #endif // {}", model.name, guard);
        tracing::warn!("{}", msg);
        warnings.push(msg);
    }
}

/// Resolve the handle a model's alias points at.
///
/// A handle of the configured project wins, then any declared handle. With
/// nothing declared, a configured project id yields
/// `impulse_handle_<id>_<fallback_slot>`; without one the merge fails.
fn bind_handle(
    config: &MergeConfig,
    model: &ModelSpec,
    body: &str,
    warnings: &mut Vec<String>,
) -> Result<HandleBinding, MergeError> {
    let alias = model.handle_alias();

    if let Some(handle) = resolve_handle(body, model.project_id) {
        tracing::debug!(model = %model.name, handle = %handle, "discovered impulse handle");
        return Ok(HandleBinding {
            alias,
            handle,
            source: HandleSource::Discovered,
        });
    }

    let Some(project_id) = model.project_id else {
        return Err(MergeError::UnresolvedHandle {
            model: model.name.clone(),
        });
    };

    if let Some(handle) = resolve_handle(body, None) {
        let msg = format!(
            "{} header declares no handle of project {}; using {}",
            model.name, project_id, handle
        );
        tracing::warn!("{}", msg);
        warnings.push(msg);
        return Ok(HandleBinding {
            alias,
            handle,
            source: HandleSource::Discovered,
        });
    }

    let handle = ImpulseHandle::new(project_id, config.fallback_slot);
    let msg = format!(
        "{} header declares no {}; aliasing it anyway",
        model.name,
        handle.symbol()
    );
    tracing::warn!("{}", msg);
    warnings.push(msg);

    Ok(HandleBinding {
        alias,
        handle,
        source: HandleSource::Fallback,
    })
}

fn render(
    config: &MergeConfig,
    primary_body: &str,
    secondary_body: &str,
    primary_handle: &HandleBinding,
    secondary_handle: &HandleBinding,
) -> String {
    let lines = vec![
        format!(
            "/* AUTO-MERGED: {} + {} model_variables.h */",
            config.primary.name, config.secondary.name
        ),
        format!("#ifndef {}", config.merged_guard),
        format!("#define {}", config.merged_guard),
        String::new(),
        primary_body.trim_end().to_string(),
        String::new(),
        String::new(),
        format!(
            "/* ===== {} MODEL APPEND ===== */",
            config.secondary.name.to_uppercase()
        ),
        String::new(),
        secondary_body.trim_end().to_string(),
        String::new(),
        "/* ===== EXPLICIT HANDLE ALIASES (NON-COLLIDING) ===== */".to_string(),
        primary_handle.declaration(),
        secondary_handle.declaration(),
        String::new(),
        format!("#endif // {}", config.merged_guard),
    ];

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
