//! Line-oriented primitives for Edge Impulse generated C headers.
//!
//! Nothing here parses C. Every operation is a pattern match over lines of
//! `model_metadata.h` / `model_variables.h` as the Edge Impulse SDK
//! generates them: `#define` extraction and rewriting, include-guard
//! stripping, generic-alias removal and impulse-handle discovery.

mod aliases;
mod defines;
mod guard;
mod handles;
mod header;

pub use aliases::{GenericAliasSet, GENERIC_ALIAS_PATTERNS};
pub use defines::{parse_defines, DefineEntry, Defines};
pub use guard::{strip_guard, GuardStrip};
pub use handles::{find_impulse_handles, resolve_handle, ImpulseHandle};
pub use header::SourceHeader;

/// Errors raised by header primitives.
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    #[error("Invalid {kind} identifier: {value:?}")]
    InvalidIdentifier { kind: &'static str, value: String },

    #[error("Failed to compile pattern: {0}")]
    Pattern(#[from] regex_lite::Error),
}

/// True for names usable as a `#define` key (`[A-Z0-9_]+`).
pub fn is_define_key(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}

/// True for a C identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_c_identifier(s: &str) -> bool {
    let mut bytes = s.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
