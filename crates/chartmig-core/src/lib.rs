//! Chartmig Core - line-oriented Deployment template rewriter
//!
//! This crate rewrites Kubernetes Deployment manifests living under a chart's
//! `templates/` tree so that resource names, labels, selector labels and the
//! primary container name all flow from a single detected base name.
//!
//! # Philosophy
//!
//! The rewriter is deliberately **not** a YAML parser. Charts care about the
//! exact bytes of everything the migration does not touch, so the core streams
//! a file line by line, tracking just enough structure (document kind plus a
//! dotted key path derived from indentation) to fire positional rewrites:
//!
//! | Location (kind: Deployment)         | Rewrite                              |
//! |-------------------------------------|--------------------------------------|
//! | `metadata.name`                     | `name: {{ $name }}`                  |
//! | `metadata.labels` body              | one `metaLabels` include             |
//! | `spec.template.metadata.labels`     | one `selectorLabelsFor` include      |
//! | `spec.selector.matchLabels` body    | one `selectorLabelsFor` include      |
//! | first container `- name:`           | `- name: {{ $base }}`                |
//!
//! Every other line is copied through verbatim, and a header block binding
//! `$base`, `$ctx` and `$name` is prepended exactly once.
//!
//! # Example
//!
//! ```no_run
//! use chartmig_core::{base_name, Rewriter, RewriteOptions};
//!
//! let manifest = std::fs::read_to_string("templates/deployment.yaml").unwrap();
//! let base = base_name(&manifest).unwrap();
//! let rewriter = Rewriter::new(RewriteOptions::default());
//! let migrated = rewriter.rewrite(&manifest, &base);
//! ```

pub mod detect;
pub mod error;
pub mod fragments;
pub mod path;
pub mod rewrite;

// Re-exports
pub use detect::{ROLLOUT_SUFFIX, base_name, detect_base};
pub use error::{Result, RewriteError};
pub use fragments::Fragments;
pub use rewrite::{RewriteOptions, Rewriter};
