//! Injected template fragments
//!
//! Every expression the rewriter inserts into a manifest is built here: the
//! header block binding the template variables, and the include lines that
//! replace label map bodies. Fragments are valid Helm template expressions,
//! one per line, so the rendered file stays valid YAML.
//!
//! The helper name prefix is configurable because charts keep their shared
//! helpers under a library-chart namespace (`common` by default).

/// Builder for the injected header and include lines.
#[derive(Debug, Clone)]
pub struct Fragments {
    prefix: String,
}

impl Fragments {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Substring identifying an already-migrated file (the `nameFor` include
    /// only ever appears in the header the rewriter itself inserts).
    pub fn marker(&self) -> String {
        format!("include \"{}.nameFor\"", self.prefix)
    }

    /// Header block binding `$base`, `$ctx` and `$name`, terminated by a
    /// blank separator line.
    pub fn header(&self, base: &str) -> String {
        format!(
            "{{{{- $base := \"{base}\" -}}}}\n\
             {{{{- $ctx := . -}}}}\n\
             {{{{- $name := include \"{prefix}.nameFor\" (dict \"ctx\" $ctx \"base\" $base) -}}}}\n\
             \n",
            base = base,
            prefix = self.prefix,
        )
    }

    /// Include line replacing a `metadata.labels` map body.
    pub fn meta_labels(&self, nindent: usize) -> String {
        self.include_line("metaLabels", nindent)
    }

    /// Include line replacing a selector-labels map body
    /// (`spec.template.metadata.labels` or `spec.selector.matchLabels`).
    pub fn selector_labels(&self, nindent: usize) -> String {
        self.include_line("selectorLabelsFor", nindent)
    }

    fn include_line(&self, helper: &str, nindent: usize) -> String {
        format!(
            "{:indent$}{{{{- include \"{prefix}.{helper}\" (dict \"ctx\" $ctx \"base\" $base) | nindent {nindent} }}}}\n",
            "",
            indent = nindent,
            prefix = self.prefix,
            helper = helper,
            nindent = nindent,
        )
    }
}
