//! Include-guard stripping.
//!
//! Best-effort: the guard is recognized by pattern, not by structure. A miss
//! is never an error, but it is reported so the caller can decide whether it
//! was expected.

use regex_lite::Regex;

use crate::{is_c_identifier, HeaderError};

/// Result of stripping one guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardStrip {
    /// Text with the recognized guard parts removed
    pub body: String,
    /// `#ifndef G` / `#define G` pair was found and removed
    pub opening: bool,
    /// Trailing `#endif // G` was found and removed
    pub closing: bool,
}

impl GuardStrip {
    /// Both halves of the guard were found.
    pub fn is_complete(&self) -> bool {
        self.opening && self.closing
    }
}

/// Remove the `#ifndef guard` / `#define guard` pair and the trailing
/// `#endif // guard` line from `text`.
///
/// The opening pair is the first one starting a line; anything before it
/// (typically the generated license comment) is kept. The closing line must
/// be the last non-blank line of the text.
pub fn strip_guard(text: &str, guard: &str) -> Result<GuardStrip, HeaderError> {
    if !is_c_identifier(guard) {
        return Err(HeaderError::InvalidIdentifier {
            kind: "guard",
            value: guard.to_string(),
        });
    }
    let g = regex_lite::escape(guard);

    let opening_re = Regex::new(&format!(
        r"(?m)^[ \t]*#ifndef[ \t]+{g}[ \t]*\r?\n[ \t]*#define[ \t]+{g}[ \t]*(?:\r?\n|\z)"
    ))?;
    let closing_re = Regex::new(&format!(
        r"(?:\A|\r?\n)[ \t]*#endif[ \t]*//[ \t]*{g}[ \t]*\s*\z"
    ))?;

    let (after_open, opening) = match opening_re.find(text) {
        Some(m) => {
            let mut s = String::with_capacity(text.len());
            s.push_str(&text[..m.start()]);
            s.push_str(&text[m.end()..]);
            (s, true)
        }
        None => (text.to_string(), false),
    };

    let (body, closing) = match closing_re.find(&after_open) {
        Some(m) => {
            let mut s = after_open[..m.start()].to_string();
            s.push('\n');
            (s, true)
        }
        None => (after_open, false),
    };

    Ok(GuardStrip {
        body,
        opening,
        closing,
    })
}
