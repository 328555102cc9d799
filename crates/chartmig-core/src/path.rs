//! Indent-derived key path tracking
//!
//! A [`KeyPath`] is a stack of `(indent, key)` pairs mirroring the YAML
//! nesting of the line currently being scanned. It is maintained purely from
//! leading-space counts: opening a key pops every entry at the same or deeper
//! indent before pushing, so entries are always strictly increasing in indent
//! from outermost to innermost. Space-indented YAML only; tabs are not
//! supported (consistent with Kubernetes manifest conventions).

/// One level of YAML nesting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEntry {
    pub indent: usize,
    pub key: String,
}

/// Stack of open keys, outermost first
#[derive(Debug, Clone, Default)]
pub struct KeyPath {
    entries: Vec<KeyEntry>,
}

impl KeyPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a `key:` line at the given indent.
    ///
    /// Closes every sibling or child scope first (entries whose indent is at
    /// or beyond the new indent), then pushes the new key.
    pub fn open_key(&mut self, indent: usize, key: &str) {
        self.close_at(indent);
        self.entries.push(KeyEntry {
            indent,
            key: key.to_string(),
        });
    }

    /// Apply a dedent-close check for a non-key line: pop entries whose
    /// indent is at or beyond the line's leading-space count.
    pub fn close_at(&mut self, indent: usize) {
        while self
            .entries
            .last()
            .is_some_and(|top| top.indent >= indent)
        {
            self.entries.pop();
        }
    }

    /// Dotted path of the current line, e.g. `spec.template.metadata.labels`.
    pub fn dotted(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.key.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Count of leading space characters.
pub(crate) fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}
