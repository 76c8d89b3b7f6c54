//! Edge Impulse model header merger
//!
//! Combines the generated `model_metadata.h` and `model_variables.h` of two
//! separately trained Edge Impulse models so both can be linked into one
//! firmware image without symbol or constant collisions.

pub mod config;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod output;
pub mod report;
pub mod variables;

pub use config::{ConfigError, MergeConfig, ModelSpec, Overrides, RenameTable};
pub use error::{MergeError, Side};
pub use report::{MergeKind, MergeReport};

use std::path::{Path, PathBuf};

/// Location of the generated headers inside an exported SDK tree
pub const MODEL_PARAMETERS_DIR: &str = "model-parameters";
pub const METADATA_FILE: &str = "model_metadata.h";
pub const VARIABLES_FILE: &str = "model_variables.h";

/// Paths of both headers under an SDK root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPaths {
    pub metadata: PathBuf,
    pub variables: PathBuf,
}

impl HeaderPaths {
    /// `<root>/model-parameters/model_metadata.h` and `model_variables.h`
    pub fn under(root: &Path) -> Self {
        let dir = root.join(MODEL_PARAMETERS_DIR);
        Self {
            metadata: dir.join(METADATA_FILE),
            variables: dir.join(VARIABLES_FILE),
        }
    }
}

/// Run both mergers over two SDK roots, writing under `out_root`.
///
/// The metadata merge runs first; if it fails the variables header is not
/// touched.
pub fn merge_roots(
    config: &MergeConfig,
    primary_root: &Path,
    secondary_root: &Path,
    out_root: &Path,
) -> Result<(metadata::MetadataOutcome, variables::VariablesOutcome), MergeError> {
    let primary = HeaderPaths::under(primary_root);
    let secondary = HeaderPaths::under(secondary_root);
    let out = HeaderPaths::under(out_root);

    let meta = metadata::merge_with(config, &primary.metadata, &secondary.metadata, &out.metadata)?;
    let vars =
        variables::merge_with(config, &primary.variables, &secondary.variables, &out.variables)?;
    Ok((meta, vars))
}
