//! `#define KEY VALUE` extraction.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex_lite::{Captures, Regex};

/// Pattern: optional indent, `#define`, an uppercase key, whitespace, then the
/// value verbatim to end of line.
pub(crate) fn define_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*#define\s+([A-Z0-9_]+)\s+(.*)$").expect("define pattern is valid")
    })
}

/// Match a single line (without terminator) against the define pattern.
pub(crate) fn match_define(line: &str) -> Option<Captures<'_>> {
    define_re().captures(line.strip_suffix('\r').unwrap_or(line))
}

/// One `#define` found in a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefineEntry {
    pub key: String,
    /// Raw value text, verbatim
    pub value: String,
    /// Zero-based line index in the source
    pub line: usize,
}

/// Defines of one header, in source order.
///
/// Lookups see the last occurrence of a repeated key.
#[derive(Debug, Clone, Default)]
pub struct Defines {
    entries: Vec<DefineEntry>,
    index: BTreeMap<String, usize>,
}

impl Defines {
    /// Value of `key`, last occurrence wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.entries[i].value.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// All entries in source order, duplicates included.
    pub fn entries(&self) -> &[DefineEntry] {
        &self.entries
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn push(&mut self, entry: DefineEntry) {
        self.index.insert(entry.key.clone(), self.entries.len());
        self.entries.push(entry);
    }
}

/// Extract every `#define KEY VALUE` line from `text`.
pub fn parse_defines(text: &str) -> Defines {
    let mut defines = Defines::default();
    for (line_no, line) in text.lines().enumerate() {
        if let Some(caps) = match_define(line) {
            defines.push(DefineEntry {
                key: caps[1].to_string(),
                value: caps[2].to_string(),
                line: line_no,
            });
        }
    }
    defines
}
