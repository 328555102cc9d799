//! Base name detection
//!
//! The base name is the literal `metadata.name` of the first
//! `kind: Deployment` document in a file, with the blue/green rollout suffix
//! stripped. It seeds the templating header and the container name rewrite,
//! so detection runs once per file before any line is touched.

use regex::Regex;

use crate::error::{Result, RewriteError};
use crate::path::leading_spaces;

/// Suffix carried by blue/green rollout variants. The templating base must be
/// suffix-free.
pub const ROLLOUT_SUFFIX: &str = "-green";

/// Detect the base name and canonicalize it (strip [`ROLLOUT_SUFFIX`]).
pub fn base_name(content: &str) -> Result<String> {
    let raw = detect_base(content)?;
    let base = raw.strip_suffix(ROLLOUT_SUFFIX).unwrap_or(&raw);
    Ok(base.to_string())
}

/// Detect the literal `metadata.name` of the first Deployment document.
///
/// The scan is scoped to a top-level `metadata:` block of a
/// `kind: Deployment` section: the value must sit exactly two spaces deeper
/// than the `metadata:` key, and a dedent closes the block. Returns
/// [`RewriteError::AlreadyTemplated`] if the value contains a template
/// delimiter, meaning the file was already migrated.
pub fn detect_base(content: &str) -> Result<String> {
    let re_kind = Regex::new(r"^\s*kind:\s*([A-Za-z0-9]+)\s*$").unwrap();
    let re_meta = Regex::new(r"^( *)metadata:\s*$").unwrap();
    let re_name = Regex::new(r"^name:\s*(.+?)\s*$").unwrap();

    let mut kind = String::new();
    let mut meta_indent: Option<usize> = None;

    for line in content.lines() {
        if let Some(caps) = re_kind.captures(line) {
            kind = caps[1].to_string();
            meta_indent = None;
            continue;
        }
        if kind != "Deployment" {
            continue;
        }

        let Some(indent) = meta_indent else {
            if let Some(caps) = re_meta.captures(line) {
                meta_indent = Some(caps[1].len());
            }
            continue;
        };

        if line.trim().is_empty() {
            continue;
        }
        let cur = leading_spaces(line);
        if cur <= indent {
            // Dedent closed the metadata block before a name was seen.
            meta_indent = None;
            continue;
        }
        if cur == indent + 2
            && let Some(caps) = re_name.captures(line.trim_start_matches(' '))
        {
            let value = caps[1].trim().trim_matches(['"', '\'']);
            if value.contains("{{") {
                return Err(RewriteError::AlreadyTemplated {
                    value: value.to_string(),
                });
            }
            tracing::debug!("detected base name {value:?}");
            return Ok(value.to_string());
        }
    }

    Err(RewriteError::BaseNameNotFound)
}
