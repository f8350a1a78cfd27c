//! # projloclib
//!
//! A line counter for a directory of projects, with per-project exclusion
//! rules.
//!
//! ## Overview
//!
//! The library walks a tree whose top-level directories are projects, drops
//! files that the exclusion rules reject, counts raw text lines in the rest
//! and aggregates them per project:
//!
//! - **Traversal**: hidden directories and `node_modules` are never entered
//! - **Global exclusions**: anything with `log` in its path, `.log` and
//!   `.vsix` files
//! - **Project rules**: a registry keyed by project name, each entry a
//!   predicate over the file's name, extension and path segments
//! - **Line reading**: UTF-8, then Latin-1, then Windows-1252; a file that
//!   cannot be read still counts, with zero lines
//!
//! Project names for rule lookup are taken relative to a *development root*,
//! so scanning a single project still applies that project's rules.
//!
//! ## Example
//!
//! ```rust
//! use projloclib::{count_projects, ProjectStats, ScanOptions};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::create_dir(dir.path().join("projA")).unwrap();
//! fs::write(dir.path().join("projA/a.txt"), "one\ntwo\nthree\n").unwrap();
//! fs::write(dir.path().join("projA/b.log"), "ignored\n").unwrap();
//!
//! let tally = count_projects(dir.path(), dir.path(), ScanOptions::new()).unwrap();
//! assert_eq!(tally.project("projA"), Some(ProjectStats::new(1, 3)));
//! assert_eq!(tally.excluded_files(), 1);
//! ```

pub mod config;
pub mod counter;
pub mod error;
pub mod reader;
pub mod rules;
pub mod stats;
pub mod table;
pub mod walk;

pub use config::Config;
pub use counter::{count_file, count_projects, ScanOptions};
pub use error::ProjlocError;
pub use reader::{Encoding, ReadOutcome};
pub use rules::{AnyOf, Exclusion, ExclusionRule, FileCandidate, RuleRegistry, Verdict};
pub use stats::{ExclusionGroup, ProjectRow, ProjectStats, Tally};
pub use table::{format_count, Report};
pub use walk::{discover, Discovery, EntryKind, ExcludedEntry, IncludedFile};

/// Result type for projloclib operations
pub type Result<T> = std::result::Result<T, ProjlocError>;
