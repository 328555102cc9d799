//! Line rewriter state machine
//!
//! Streams a manifest line by line, tracking the current document kind and a
//! dotted key path, and applies positional rewrites wherever the path hits a
//! recognized target. Untouched lines are copied through byte-for-byte; the
//! original formatting of everything outside the rewritten locations is
//! preserved exactly.

use regex::Regex;

use crate::fragments::Fragments;
use crate::path::{KeyPath, leading_spaces};

/// Default helper name prefix for the injected includes.
pub const DEFAULT_HELPER_PREFIX: &str = "common";

/// Options controlling the rewrite.
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// Rewrite every container `- name:` entry sitting directly under the
    /// containers list. The default rewrites only the first entry in document
    /// order, matching the usual one-primary-container layout.
    pub all_containers: bool,
    /// Helper name prefix used in the header and include lines.
    pub helper_prefix: String,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            all_containers: false,
            helper_prefix: DEFAULT_HELPER_PREFIX.to_string(),
        }
    }
}

/// Coarse location within a Deployment document, derived from the dotted key
/// path at each key line. Modeled as a tagged enum rather than ad hoc
/// booleans so transitions stay in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Default,
    TopMetadata,
    TopLabels,
    TemplateMetadata,
    TemplateLabels,
    Containers,
}

fn section_of(path: &str) -> Section {
    if path == "spec.template.spec.containers"
        || path.starts_with("spec.template.spec.containers.")
    {
        Section::Containers
    } else if path == "spec.template.metadata.labels"
        || path.starts_with("spec.template.metadata.labels.")
    {
        Section::TemplateLabels
    } else if path == "spec.template.metadata" || path.starts_with("spec.template.metadata.") {
        Section::TemplateMetadata
    } else if path == "metadata.labels" || path.starts_with("metadata.labels.") {
        Section::TopLabels
    } else if path == "metadata" || path.starts_with("metadata.") {
        Section::TopMetadata
    } else {
        Section::Default
    }
}

/// The rewriter itself. Stateless between files; all per-file state lives in
/// the [`rewrite`](Rewriter::rewrite) loop.
#[derive(Debug, Clone)]
pub struct Rewriter {
    options: RewriteOptions,
    fragments: Fragments,
}

impl Rewriter {
    pub fn new(options: RewriteOptions) -> Self {
        let fragments = Fragments::new(options.helper_prefix.clone());
        Self { options, fragments }
    }

    /// Rewrite one manifest. `base` is the canonical base name produced by
    /// [`base_name`](crate::detect::base_name).
    ///
    /// Prepends the header block unless its marker is already present, then
    /// streams every line through the state machine. Lines belonging to a
    /// replaced labels map body are consumed; everything else is copied
    /// verbatim.
    pub fn rewrite(&self, content: &str, base: &str) -> String {
        let re_key = Regex::new(r"^( *)([A-Za-z0-9_.-]+):(?:\s*(.*))?$").unwrap();
        let re_kind = Regex::new(r"^\s*kind:\s*([A-Za-z0-9]+)\s*$").unwrap();
        let re_dash_name = Regex::new(r"^( *)-\s*name:\s*(.+?)\s*$").unwrap();

        let marker = self.fragments.marker();
        let mut out = String::with_capacity(content.len() + 256);

        let inserted_header = !content.contains(&marker);
        if inserted_header {
            out.push_str(&self.fragments.header(base));
        }

        let mut kind = String::new();
        let mut path = KeyPath::new();
        let mut section = Section::Default;
        // While set, lines strictly deeper than this indent belong to a
        // labels map body that has been replaced by an include.
        let mut skip_below: Option<usize> = None;
        let mut container_renamed = false;

        for raw in content.split_inclusive('\n') {
            let line = raw.trim_end_matches('\n');
            let blank = line.trim().is_empty();
            let indent = leading_spaces(line);

            if let Some(threshold) = skip_below {
                if !blank && indent > threshold {
                    continue;
                }
                if !blank {
                    skip_below = None;
                }
            }

            // Track kind across documents: last seen wins until overwritten.
            if let Some(caps) = re_kind.captures(line) {
                kind = caps[1].to_string();
            }

            if let Some(caps) = re_key.captures(line) {
                let key_indent = caps[1].len();
                let key = caps[2].to_string();
                let value = caps.get(3).map(|m| m.as_str().trim()).unwrap_or("");
                let map_open = value.is_empty();

                path.open_key(key_indent, &key);
                let dotted = path.dotted();
                section = section_of(&dotted);

                if kind == "Deployment" {
                    match dotted.as_str() {
                        "metadata.name" => {
                            out.push_str(&" ".repeat(key_indent));
                            out.push_str("name: {{ $name }}\n");
                            continue;
                        }
                        "metadata.labels" if map_open => {
                            tracing::debug!("replacing metadata.labels body at indent {key_indent}");
                            out.push_str(raw);
                            out.push_str(&self.fragments.meta_labels(key_indent + 2));
                            skip_below = Some(key_indent);
                            continue;
                        }
                        "spec.template.metadata.labels" | "spec.selector.matchLabels"
                            if map_open =>
                        {
                            tracing::debug!("replacing {dotted} body at indent {key_indent}");
                            out.push_str(raw);
                            out.push_str(&self.fragments.selector_labels(key_indent + 2));
                            skip_below = Some(key_indent);
                            continue;
                        }
                        _ => {}
                    }
                }
            } else if !blank {
                if let Some(caps) = re_dash_name.captures(line) {
                    // A list item at the key's own indent still belongs to the
                    // key, so dash lines close strictly deeper scopes only.
                    path.close_at(indent + 1);
                    if kind == "Deployment"
                        && section == Section::Containers
                        && path.dotted() == "spec.template.spec.containers"
                        && (self.options.all_containers || !container_renamed)
                    {
                        out.push_str(&caps[1]);
                        out.push_str("- name: {{ $base }}\n");
                        container_renamed = true;
                        continue;
                    }
                } else {
                    path.close_at(indent);
                    section = section_of(&path.dotted());
                }
            }

            out.push_str(raw);
        }

        if inserted_header {
            out = collapse_duplicate_header(out, &marker);
        }
        out
    }
}

/// Defensive idempotence repair: if the header marker occurs more than once
/// (a pre-existing duplicate from a prior partial run), keep only the first
/// marker line and drop the later ones. Pure post-processing over the fully
/// rendered output, not part of the line loop.
fn collapse_duplicate_header(out: String, marker: &str) -> String {
    if out.matches(marker).count() <= 1 {
        return out;
    }
    let mut seen = false;
    let mut repaired = String::with_capacity(out.len());
    for line in out.split_inclusive('\n') {
        if line.contains(marker) {
            if seen {
                continue;
            }
            seen = true;
        }
        repaired.push_str(line);
    }
    repaired
}
