//! Built-in defaults (layer 1)
//!
//! Values match the layout the Edge Impulse C++ SDK generates into
//! `model-parameters/`.

use super::{MergeConfig, ModelSpec, RenameTable};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "ei-merge.toml";

pub const DEFAULT_PRIMARY_NAME: &str = "bee";
pub const DEFAULT_SECONDARY_NAME: &str = "varroa";

/// Edge Impulse projects the default model names were exported from
pub const DEFAULT_PRIMARY_PROJECT_ID: u64 = 872791;
pub const DEFAULT_SECONDARY_PROJECT_ID: u64 = 874563;

/// Constant reconciled by taking the maximum of both models
pub const SIZING_KEY: &str = "EI_CLASSIFIER_TFLITE_LARGEST_ARENA_SIZE";

/// Guard symbol of each generated `model_variables.h`
pub const SOURCE_GUARD: &str = "_EI_CLASSIFIER_MODEL_VARIABLES_H_";

/// Guard symbol of the merged `model_variables.h`
pub const MERGED_GUARD: &str = "_EI_CLASSIFIER_MODEL_VARIABLES_MERGED_H_";

/// Handle slot assumed when discovery finds nothing for a known project
pub const FALLBACK_SLOT: u32 = 1;

/// Secondary constants copied into the merged metadata, with the suffix each
/// one takes after the `EI_<SECONDARY>_` namespace.
///
/// Every key is listed explicitly so the rename is total: there is no prefix
/// substitution and no identity fallback.
pub const ALLOW_LIST: &[(&str, &str)] = &[
    ("EI_CLASSIFIER_PROJECT_ID", "PROJECT_ID"),
    ("EI_CLASSIFIER_PROJECT_OWNER", "PROJECT_OWNER"),
    ("EI_CLASSIFIER_PROJECT_NAME", "PROJECT_NAME"),
    ("EI_CLASSIFIER_PROJECT_DEPLOY_VERSION", "PROJECT_DEPLOY_VERSION"),
    ("EI_CLASSIFIER_NN_INPUT_FRAME_SIZE", "NN_INPUT_FRAME_SIZE"),
    ("EI_CLASSIFIER_RAW_SAMPLE_COUNT", "RAW_SAMPLE_COUNT"),
    ("EI_CLASSIFIER_RAW_SAMPLES_PER_FRAME", "RAW_SAMPLES_PER_FRAME"),
    ("EI_CLASSIFIER_DSP_INPUT_FRAME_SIZE", "DSP_INPUT_FRAME_SIZE"),
    ("EI_CLASSIFIER_INPUT_WIDTH", "INPUT_WIDTH"),
    ("EI_CLASSIFIER_INPUT_HEIGHT", "INPUT_HEIGHT"),
    ("EI_CLASSIFIER_NN_OUTPUT_COUNT", "NN_OUTPUT_COUNT"),
    ("EI_CLASSIFIER_LABEL_COUNT", "LABEL_COUNT"),
    ("EI_CLASSIFIER_TFLITE_LARGEST_ARENA_SIZE", "TFLITE_LARGEST_ARENA_SIZE"),
    ("EI_STUDIO_VERSION_MAJOR", "STUDIO_VERSION_MAJOR"),
    ("EI_STUDIO_VERSION_MINOR", "STUDIO_VERSION_MINOR"),
    ("EI_STUDIO_VERSION_PATCH", "STUDIO_VERSION_PATCH"),
];

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            primary: ModelSpec {
                project_id: Some(DEFAULT_PRIMARY_PROJECT_ID),
                ..ModelSpec::named(DEFAULT_PRIMARY_NAME)
            },
            secondary: ModelSpec {
                project_id: Some(DEFAULT_SECONDARY_PROJECT_ID),
                ..ModelSpec::named(DEFAULT_SECONDARY_NAME)
            },
            sizing_key: SIZING_KEY.to_string(),
            renames: RenameTable::namespaced(DEFAULT_SECONDARY_NAME),
            source_guard: SOURCE_GUARD.to_string(),
            merged_guard: MERGED_GUARD.to_string(),
            fallback_slot: FALLBACK_SLOT,
        }
    }
}
