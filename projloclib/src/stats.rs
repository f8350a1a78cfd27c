//! Per-project aggregation.

use std::collections::BTreeMap;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::walk::{Discovery, EntryKind, ExcludedEntry};

/// File and line counters for one project (or for the whole run).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStats {
    pub files: u64,
    pub lines: u64,
}

impl ProjectStats {
    pub fn new(files: u64, lines: u64) -> Self {
        Self { files, lines }
    }
}

impl Add for ProjectStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            files: self.files + other.files,
            lines: self.lines + other.lines,
        }
    }
}

impl AddAssign for ProjectStats {
    fn add_assign(&mut self, other: Self) {
        self.files += other.files;
        self.lines += other.lines;
    }
}

/// One row of the project table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRow {
    pub name: String,
    pub files: u64,
    pub lines: u64,
}

/// Excluded paths of one project, directories and files listed apart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionGroup {
    pub project: String,
    pub directories: Vec<String>,
    pub files: Vec<String>,
}

/// Accumulated counters for a run.
///
/// Owned by whoever drives the scan; nothing here is global.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    projects: BTreeMap<String, ProjectStats>,
    excluded_files: u64,
    exclusions: Vec<ExcludedEntry>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tally from a finished discovery.
    pub fn from_discovery(discovery: &Discovery) -> Self {
        let mut tally = Self::new();
        tally.absorb(discovery);
        tally
    }

    /// Fold every entry of `discovery` into the counters.
    pub fn absorb(&mut self, discovery: &Discovery) {
        for file in &discovery.included {
            self.record_included(&file.group, file.outcome.lines());
        }
        for entry in &discovery.excluded {
            match entry.kind {
                EntryKind::File => self.record_excluded_file(entry.clone()),
                EntryKind::Directory => self.record_excluded_dir(entry.clone()),
            }
        }
    }

    /// Count one included file of `project`.
    pub fn record_included(&mut self, project: &str, lines: u64) {
        *self.projects.entry(project.to_string()).or_default() += ProjectStats::new(1, lines);
    }

    /// Count one excluded file.
    pub fn record_excluded_file(&mut self, entry: ExcludedEntry) {
        self.excluded_files += 1;
        self.exclusions.push(entry);
    }

    /// Log a pruned directory. Pruned directories are listed but not counted
    /// as excluded files.
    pub fn record_excluded_dir(&mut self, entry: ExcludedEntry) {
        self.exclusions.push(entry);
    }

    pub fn project(&self, name: &str) -> Option<ProjectStats> {
        self.projects.get(name).copied()
    }

    pub fn excluded_files(&self) -> u64 {
        self.excluded_files
    }

    pub fn exclusions(&self) -> &[ExcludedEntry] {
        &self.exclusions
    }

    /// Totals across every project.
    pub fn total(&self) -> ProjectStats {
        self.projects
            .values()
            .fold(ProjectStats::default(), |acc, s| acc + *s)
    }

    /// Project rows, most lines first; ties by name ascending.
    pub fn rows(&self) -> Vec<ProjectRow> {
        let mut rows: Vec<ProjectRow> = self
            .projects
            .iter()
            .map(|(name, stats)| ProjectRow {
                name: name.clone(),
                files: stats.files,
                lines: stats.lines,
            })
            .collect();
        rows.sort_by(|a, b| b.lines.cmp(&a.lines).then_with(|| a.name.cmp(&b.name)));
        rows
    }

    /// Exclusion log grouped by project, groups sorted by name and each
    /// list sorted alphabetically.
    pub fn exclusion_groups(&self) -> Vec<ExclusionGroup> {
        let mut groups: BTreeMap<&str, ExclusionGroup> = BTreeMap::new();

        for entry in &self.exclusions {
            let group = groups
                .entry(entry.group.as_str())
                .or_insert_with(|| ExclusionGroup {
                    project: entry.group.clone(),
                    ..Default::default()
                });
            let path = entry.display_path();
            match entry.kind {
                EntryKind::Directory => group.directories.push(path),
                EntryKind::File => group.files.push(path),
            }
        }

        groups
            .into_values()
            .map(|mut g| {
                g.directories.sort();
                g.files.sort();
                g
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn excluded(group: &str, path: &str, kind: EntryKind) -> ExcludedEntry {
        ExcludedEntry {
            group: group.to_string(),
            path: PathBuf::from(path),
            kind,
        }
    }

    #[test]
    fn test_record_included_accumulates() {
        let mut tally = Tally::new();
        tally.record_included("projA", 3);
        tally.record_included("projA", 4);
        tally.record_included("projB", 5);

        assert_eq!(tally.project("projA"), Some(ProjectStats::new(2, 7)));
        assert_eq!(tally.project("projB"), Some(ProjectStats::new(1, 5)));
        assert_eq!(tally.project("projC"), None);
        assert_eq!(tally.total(), ProjectStats::new(3, 12));
    }

    #[test]
    fn test_zero_line_file_still_counts() {
        let mut tally = Tally::new();
        tally.record_included("projA", 0);

        assert_eq!(tally.project("projA"), Some(ProjectStats::new(1, 0)));
        assert_eq!(tally.excluded_files(), 0);
    }

    #[test]
    fn test_rows_sorted_by_lines_then_name() {
        let mut tally = Tally::new();
        tally.record_included("zeta", 10);
        tally.record_included("alpha", 10);
        tally.record_included("mid", 50);
        tally.record_included("low", 1);

        let names: Vec<String> = tally.rows().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["mid", "alpha", "zeta", "low"]);
    }

    #[test]
    fn test_rows_sum_to_total() {
        let mut tally = Tally::new();
        for (i, name) in ["a", "b", "c", "a", "c", "c"].iter().enumerate() {
            tally.record_included(name, i as u64 * 11);
        }

        let rows = tally.rows();
        let files: u64 = rows.iter().map(|r| r.files).sum();
        let lines: u64 = rows.iter().map(|r| r.lines).sum();
        assert_eq!(ProjectStats::new(files, lines), tally.total());
    }

    #[test]
    fn test_excluded_dirs_not_counted_as_files() {
        let mut tally = Tally::new();
        tally.record_excluded_file(excluded("projA", "projA/b.log", EntryKind::File));
        tally.record_excluded_dir(excluded("projA", "projA/.git", EntryKind::Directory));

        assert_eq!(tally.excluded_files(), 1);
        assert_eq!(tally.exclusions().len(), 2);
    }

    #[test]
    fn test_exclusion_groups_sorted() {
        let mut tally = Tally::new();
        tally.record_excluded_file(excluded("web", "web/z.log", EntryKind::File));
        tally.record_excluded_dir(excluded("web", "web/node_modules", EntryKind::Directory));
        tally.record_excluded_file(excluded("web", "web/a.vsix", EntryKind::File));
        tally.record_excluded_dir(excluded("api", "api/.venv", EntryKind::Directory));
        tally.record_excluded_dir(excluded("web", "web/.cache", EntryKind::Directory));

        let groups = tally.exclusion_groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].project, "api");
        assert_eq!(groups[0].directories, vec!["api/.venv"]);
        assert!(groups[0].files.is_empty());

        assert_eq!(groups[1].project, "web");
        assert_eq!(groups[1].directories, vec!["web/.cache", "web/node_modules"]);
        assert_eq!(groups[1].files, vec!["web/a.vsix", "web/z.log"]);
    }
}
