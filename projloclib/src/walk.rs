//! Directory traversal and file classification.
//!
//! Walks the scanned path, prunes hidden and dependency-cache directories,
//! runs every file through the [`RuleRegistry`] and reads the ones that
//! survive.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::ProjlocError;
use crate::reader::{read_file, ReadOutcome};
use crate::rules::{FileCandidate, RuleRegistry, Verdict};
use crate::Result;

/// Dependency cache directory never descended into.
pub const DEPENDENCY_CACHE_DIR: &str = "node_modules";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// A file that passed the rules, with its read outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludedFile {
    pub group: String,
    /// Path relative to the scanned path
    pub path: PathBuf,
    pub outcome: ReadOutcome,
}

/// An excluded file or a pruned directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedEntry {
    pub group: String,
    /// Path relative to the scanned path
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl ExcludedEntry {
    /// Path with `/` separators, independent of platform.
    pub fn display_path(&self) -> String {
        slash_path(&self.path)
    }
}

/// Everything a walk found, in walk order.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub included: Vec<IncludedFile>,
    pub excluded: Vec<ExcludedEntry>,
}

/// The scanned path and the development root, resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    pub base: PathBuf,
    pub dev_root: PathBuf,
}

impl Roots {
    /// Resolve both roots. Canonicalization is best effort so that a
    /// development root that does not exist still works as a prefix.
    pub fn new(base: impl AsRef<Path>, dev_root: impl AsRef<Path>) -> Self {
        Self {
            base: resolve(base.as_ref()),
            dev_root: resolve(dev_root.as_ref()),
        }
    }

    /// Path used by the exclusion rules: relative to the development root,
    /// or to the scanned path when the file lies outside it.
    pub fn rule_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.dev_root)
            .or_else(|_| path.strip_prefix(&self.base))
            .unwrap_or(path)
            .to_path_buf()
    }

    /// Path relative to the scanned path.
    pub fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.base).unwrap_or(path).to_path_buf()
    }
}

fn resolve(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Report group of a path relative to the scanned path: its first
/// segment. A file directly in the scanned path is its own group.
pub fn group_of(relative: &Path) -> String {
    normal_segments(relative).next().unwrap_or_default()
}

fn normal_segments(path: &Path) -> impl Iterator<Item = String> + '_ {
    path.components().filter_map(|c| match c {
        Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
        _ => None,
    })
}

fn slash_path(path: &Path) -> String {
    normal_segments(path).collect::<Vec<_>>().join("/")
}

/// Check if a directory should be pruned during traversal.
fn should_skip_dir(name: &str) -> bool {
    name.starts_with('.') || name == DEPENDENCY_CACHE_DIR
}

/// Walk `base`, classify every file against `rules`, and read the
/// included ones.
///
/// Entries are visited in file-name order so repeated runs produce the
/// same sequence.
pub fn discover(
    base: impl AsRef<Path>,
    dev_root: impl AsRef<Path>,
    rules: &RuleRegistry,
) -> Result<Discovery> {
    let base = base.as_ref();

    if !base.exists() {
        return Err(ProjlocError::PathNotFound(base.to_path_buf()));
    }
    if !base.is_dir() {
        return Err(ProjlocError::NotADirectory(base.to_path_buf()));
    }

    let roots = Roots::new(base, dev_root);
    info!(
        base = %roots.base.display(),
        dev_root = %roots.dev_root.display(),
        "scanning"
    );

    let mut discovery = Discovery::default();
    let mut pruned: Vec<PathBuf> = Vec::new();

    let walker = WalkDir::new(&roots.base)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            // Always include the root directory
            if e.depth() == 0 {
                return true;
            }
            let is_dir = e.file_type().is_dir() || (e.path_is_symlink() && e.path().is_dir());
            if is_dir && should_skip_dir(&e.file_name().to_string_lossy()) {
                pruned.push(e.path().to_path_buf());
                return false;
            }
            true
        });

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        // Symlinks are not followed: a link to a directory is skipped, while
        // links to files and dangling links are counted as files.
        let path = entry.path();
        let file_type = entry.file_type();
        let is_file = file_type.is_file() || (file_type.is_symlink() && !path.is_dir());
        if !is_file {
            continue;
        }

        let relative = roots.relative(path);
        let group = group_of(&relative);
        let candidate = FileCandidate::new(roots.rule_path(path)).located_at(path);

        match rules.classify(&candidate) {
            Verdict::Include => {
                let outcome = read_file(path);
                discovery.included.push(IncludedFile {
                    group,
                    path: relative,
                    outcome,
                });
            }
            Verdict::Exclude(reason) => {
                debug!(path = %relative.display(), %reason, "excluded");
                discovery.excluded.push(ExcludedEntry {
                    group,
                    path: relative,
                    kind: EntryKind::File,
                });
            }
        }
    }

    for dir in pruned {
        let relative = roots.relative(&dir);
        debug!(path = %relative.display(), "pruned directory");
        discovery.excluded.push(ExcludedEntry {
            group: group_of(&relative),
            path: relative,
            kind: EntryKind::Directory,
        });
    }

    info!(
        included = discovery.included.len(),
        excluded = discovery.excluded.len(),
        "scan finished"
    );

    Ok(discovery)
}
