//! Report-ready data structures.
//!
//! `Report` is the final data structure before presentation. Renderers
//! iterate over its rows and groups and apply formatting; no counting
//! happens past this point.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::stats::{ExclusionGroup, ProjectRow, ProjectStats, Tally};

/// Everything needed to print the summary of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Scanned path as given to the scan
    pub path: String,
    /// Project rows, most lines first
    pub projects: Vec<ProjectRow>,
    pub total: ProjectStats,
    pub excluded_files: u64,
    pub elapsed_secs: f64,
    /// Itemized exclusion listing, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<Vec<ExclusionGroup>>,
}

impl Report {
    pub fn new(path: &Path, tally: &Tally, elapsed: Duration) -> Self {
        Report {
            path: path.display().to_string(),
            projects: tally.rows(),
            total: tally.total(),
            excluded_files: tally.excluded_files(),
            elapsed_secs: elapsed.as_secs_f64(),
            exclusions: None,
        }
    }

    /// Attach the exclusion listing.
    pub fn with_exclusions(mut self, tally: &Tally) -> Self {
        self.exclusions = Some(tally.exclusion_groups());
        self
    }
}

/// Format a count with `,` thousands separators.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
