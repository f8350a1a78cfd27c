//! High-level counting API.
//!
//! This module provides the main entry points: counting a single file and
//! counting a tree of projects with exclusion rules applied.

use std::path::Path;

use crate::reader::{read_file, ReadOutcome};
use crate::rules::RuleRegistry;
use crate::stats::Tally;
use crate::walk::discover;
use crate::Result;

/// Options for counting a project tree.
#[derive(Debug, Default)]
pub struct ScanOptions {
    /// Exclusion rules (defaults to the built-in table)
    pub rules: RuleRegistry,
}

impl ScanOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rule registry.
    pub fn rules(mut self, rules: RuleRegistry) -> Self {
        self.rules = rules;
        self
    }
}

/// Count lines per project under `base`.
///
/// Project names for rule lookup are taken relative to `dev_root`; the
/// returned tally groups by the first segment under `base`.
///
/// # Example
///
/// ```rust,ignore
/// use projloclib::{count_projects, ScanOptions};
///
/// let tally = count_projects("/home/me/dev", "/home/me/dev", ScanOptions::new())?;
/// for row in tally.rows() {
///     println!("{} {} {}", row.name, row.files, row.lines);
/// }
/// ```
pub fn count_projects(
    base: impl AsRef<Path>,
    dev_root: impl AsRef<Path>,
    options: ScanOptions,
) -> Result<Tally> {
    let discovery = discover(base, dev_root, &options.rules)?;
    Ok(Tally::from_discovery(&discovery))
}

/// Count lines in a single file. No exclusion rules apply.
pub fn count_file(path: impl AsRef<Path>) -> ReadOutcome {
    read_file(path)
}
