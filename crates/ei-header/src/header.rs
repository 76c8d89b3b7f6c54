//! Mutable line buffer over one header file.

use crate::defines::match_define;

/// Ordered lines of one header, without terminators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceHeader {
    lines: Vec<String>,
}

impl SourceHeader {
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Rewrite the value of the first `#define key ...` line, keeping the
    /// indent, keyword, key and separating whitespace as they were.
    ///
    /// Returns `false` when no line defines `key`.
    pub fn replace_define(&mut self, key: &str, new_value: &str) -> bool {
        for line in self.lines.iter_mut() {
            let prefix_end = match match_define(line) {
                Some(caps) if &caps[1] == key => caps.get(2).map(|m| m.start()),
                _ => None,
            };
            if let Some(end) = prefix_end {
                let mut rewritten = line[..end].to_string();
                rewritten.push_str(new_value);
                *line = rewritten;
                return true;
            }
        }
        false
    }

    /// Index of the last line whose trimmed text starts with `token`.
    pub fn last_line_starting_with(&self, token: &str) -> Option<usize> {
        self.lines
            .iter()
            .rposition(|line| line.trim_start().starts_with(token))
    }

    /// Insert `block` so that its first line lands at index `at`.
    pub fn insert_block(&mut self, at: usize, block: Vec<String>) {
        let at = at.min(self.lines.len());
        self.lines.splice(at..at, block);
    }

    /// Join lines, each terminated by `\n`.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}
