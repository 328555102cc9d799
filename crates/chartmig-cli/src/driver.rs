//! File discovery and per-file migration driver
//!
//! Walks the tree for `templates/**/deployment.yaml`, then runs each file
//! through detect + rewrite, writing a `.bak` copy of the original before
//! overwriting it. Per-file failures are reported and skipped; only a failed
//! directory walk aborts the run.

use console::style;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use chartmig_core::{RewriteError, RewriteOptions, Rewriter, base_name};

/// Suffix appended to the backup copy of each migrated file.
const BACKUP_SUFFIX: &str = ".bak";

/// Options for one driver run.
#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub all_containers: bool,
    pub helper_prefix: String,
    pub dry_run: bool,
}

/// Accumulated result of a run.
#[derive(Debug, Default)]
pub struct MigrationOutcome {
    pub updated: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, RewriteError)>,
}

pub fn run(root: &Path, options: DriverOptions) -> Result<()> {
    let files = discover(root)
        .into_diagnostic()
        .wrap_err("directory walk failed")?;

    if files.is_empty() {
        println!(
            "no templates/**/deployment.yaml files found under {}",
            root.display()
        );
        return Ok(());
    }

    let rewriter = Rewriter::new(RewriteOptions {
        all_containers: options.all_containers,
        helper_prefix: options.helper_prefix.clone(),
    });

    let mut outcome = MigrationOutcome::default();
    for file in files {
        match process_file(&rewriter, &file, options.dry_run) {
            Ok(()) => {
                let verb = if options.dry_run {
                    "would update"
                } else {
                    "updated"
                };
                println!("{} {}", style(verb).green().bold(), file.display());
                outcome.updated.push(file);
            }
            Err(err) => {
                eprintln!(
                    "{} {}: {}",
                    style("ERROR").red().bold(),
                    file.display(),
                    err
                );
                outcome.failed.push((file, err));
            }
        }
    }

    print_summary(&outcome, options.dry_run);

    // Per-file errors do not change the exit code.
    Ok(())
}

/// Select files named exactly `deployment.yaml` under a `templates` directory
/// segment. A walk error is fatal to the whole run.
fn discover(root: &Path) -> std::result::Result<Vec<PathBuf>, walkdir::Error> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name() == "deployment.yaml" && under_templates(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

fn under_templates(path: &Path) -> bool {
    path.parent()
        .is_some_and(|dir| dir.components().any(|c| c.as_os_str() == "templates"))
}

/// Read, detect, rewrite, back up, overwrite. Detection failure leaves the
/// file unmodified; a write failure after a successful backup leaves the
/// backup as the manual recovery path.
fn process_file(rewriter: &Rewriter, path: &Path, dry_run: bool) -> chartmig_core::Result<()> {
    let original = fs::read_to_string(path)?;
    let base = base_name(&original)?;
    let migrated = rewriter.rewrite(&original, &base);

    if dry_run {
        return Ok(());
    }

    fs::write(backup_path(path), &original)?;
    fs::write(path, &migrated)?;
    Ok(())
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

fn print_summary(outcome: &MigrationOutcome, dry_run: bool) {
    println!();
    println!(
        "  {} {} file{} {}",
        style(format!("{:>3}", outcome.updated.len())).green().bold(),
        style("deployment").dim(),
        if outcome.updated.len() == 1 { "" } else { "s" },
        if dry_run { "would be updated" } else { "updated" },
    );
    if !outcome.failed.is_empty() {
        println!(
            "  {} {} file{} skipped",
            style(format!("{:>3}", outcome.failed.len())).yellow().bold(),
            style("deployment").dim(),
            if outcome.failed.len() == 1 { "" } else { "s" },
        );
    }
}
