//! Generic aliases: convenience declarations every generated
//! `model_variables.h` emits under the same name.

use regex_lite::Regex;

use crate::HeaderError;

/// Line patterns for the four generic aliases.
///
/// Each is anchored to one line and lazy up to the first `;`, so a
/// declaration wrapped over several lines is left in place.
pub const GENERIC_ALIAS_PATTERNS: &[&str] = &[
    r"^\s*ei_impulse_handle_t&\s+ei_default_impulse\s*=\s*.*?;\s*$",
    r"^\s*constexpr\s+auto&\s+ei_classifier_inferencing_categories\s*=\s*.*?;\s*$",
    r"^\s*const\s+auto\s+ei_dsp_blocks_size\s*=\s*.*?;\s*$",
    r"^\s*ei_model_dsp_t\s*\*\s*ei_dsp_blocks\s*=\s*.*?;\s*$",
];

/// Compiled alias patterns.
#[derive(Debug, Clone)]
pub struct GenericAliasSet {
    patterns: Vec<Regex>,
}

impl GenericAliasSet {
    /// The four standard aliases.
    pub fn standard() -> Result<Self, HeaderError> {
        Self::from_patterns(GENERIC_ALIAS_PATTERNS)
    }

    pub fn from_patterns(patterns: &[&str]) -> Result<Self, HeaderError> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Whether a single line (without terminator) is a generic alias.
    pub fn is_alias(&self, line: &str) -> bool {
        let line = line.strip_suffix('\r').unwrap_or(line);
        self.patterns.iter().any(|re| re.is_match(line))
    }

    /// Drop every alias line from `text`. Returns the filtered text and the
    /// number of lines removed.
    pub fn remove_from(&self, text: &str) -> (String, usize) {
        let mut out = String::with_capacity(text.len());
        let mut removed = 0;
        for line in text.split_inclusive('\n') {
            if self.is_alias(line.trim_end_matches('\n')) {
                removed += 1;
            } else {
                out.push_str(line);
            }
        }
        (out, removed)
    }
}
