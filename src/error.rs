//! Merge error types

use std::fmt;
use std::io;
use std::path::PathBuf;

use ei_header::HeaderError;

/// Which input a condition refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Primary,
    Secondary,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

/// Fatal merge conditions. All of them are raised before the output is
/// written.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("Required constant {key} is missing from the {side} header")]
    MissingConstant { key: String, side: Side },

    #[error("Constant {key} in the {side} header is not an integer: {value:?}")]
    InvalidConstant {
        key: String,
        side: Side,
        value: String,
    },

    #[error("Could not find a #define line for {key} to rewrite")]
    DefineLineNotFound { key: String },

    #[error("Could not find a closing #endif in the primary header")]
    MissingEndif,

    #[error("Renamed key {renamed} (from {source_key}) is already defined by the primary header")]
    RenameCollision { source_key: String, renamed: String },

    #[error("No impulse handle found for model '{model}' and no project id configured")]
    UnresolvedHandle { model: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Header(#[from] HeaderError),
}

impl MergeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
