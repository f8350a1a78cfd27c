//! Exclusion rules.
//!
//! Every discovered file is classified exactly once. Global exclusions are
//! applied first (log files, log directories, packaged `.vsix` extensions);
//! then the rule registered for the file's project, if any, gets a say.
//! Projects without a registered rule include everything.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A file as seen by the exclusion rules.
///
/// `rule_path` is relative to the development root (or to the scanned path
/// when the file lives outside the development root); `full_path` is where
/// the file actually lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub full_path: PathBuf,
    pub rule_path: PathBuf,
    pub name: String,
    pub extension: Option<String>,
    pub segments: Vec<String>,
}

impl FileCandidate {
    /// A candidate known only by its rule path, which doubles as its full
    /// path.
    pub fn new(rule_path: impl Into<PathBuf>) -> Self {
        let rule_path = rule_path.into();
        let segments: Vec<String> = rule_path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        let name = segments.last().cloned().unwrap_or_default();
        let extension = rule_path
            .extension()
            .map(|e| e.to_string_lossy().into_owned());

        Self {
            full_path: rule_path.clone(),
            rule_path,
            name,
            extension,
            segments,
        }
    }

    /// Builder: set the on-disk location.
    pub fn located_at(mut self, full_path: impl Into<PathBuf>) -> Self {
        self.full_path = full_path.into();
        self
    }

    /// The project this file belongs to for rule lookup: the first segment
    /// of the rule path.
    pub fn project(&self) -> Option<&str> {
        self.segments.first().map(|s| s.as_str())
    }

    /// Whether any path segment (file name included) equals `segment`.
    pub fn has_segment(&self, segment: &str) -> bool {
        self.segments.iter().any(|s| s == segment)
    }

    fn has_extension(&self, ext: &str) -> bool {
        self.extension.as_deref() == Some(ext)
    }
}

/// Why a file was excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    /// File has the `.log` extension
    LogExtension,
    /// `log` appears somewhere in the full path
    LogPath,
    /// Packaged editor extension (`.vsix`)
    VsixArchive,
    /// Rejected by the named project's rule
    Project(String),
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclusion::LogExtension => write!(f, "log file"),
            Exclusion::LogPath => write!(f, "log path"),
            Exclusion::VsixArchive => write!(f, "vsix archive"),
            Exclusion::Project(p) => write!(f, "{p} rule"),
        }
    }
}

/// Outcome of classifying a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Include,
    Exclude(Exclusion),
}

/// Global exclusions that apply regardless of project.
///
/// The `log` substring is matched against the full path, so a tree living
/// under a directory such as `catalog` is excluded wholesale.
pub fn global_exclusion(file: &FileCandidate) -> Option<Exclusion> {
    if file.has_extension("log") {
        return Some(Exclusion::LogExtension);
    }
    if file
        .full_path
        .to_string_lossy()
        .to_lowercase()
        .contains("log")
    {
        return Some(Exclusion::LogPath);
    }
    if file.has_extension("vsix") {
        return Some(Exclusion::VsixArchive);
    }
    None
}

/// A project-scoped predicate deciding whether a file is left out.
pub trait ExclusionRule: fmt::Debug {
    /// Returns `true` if `file` must not be counted.
    fn excludes(&self, file: &FileCandidate) -> bool;
}

/// Default for projects without a rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncludeAll;

impl ExclusionRule for IncludeAll {
    fn excludes(&self, _file: &FileCandidate) -> bool {
        false
    }
}

/// Excludes every file of the project.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcludeAll;

impl ExclusionRule for ExcludeAll {
    fn excludes(&self, _file: &FileCandidate) -> bool {
        true
    }
}

/// Keeps only files with one of the given names.
#[derive(Debug, Clone, Default)]
pub struct KeepOnly {
    pub names: Vec<String>,
}

impl KeepOnly {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ExclusionRule for KeepOnly {
    fn excludes(&self, file: &FileCandidate) -> bool {
        !self.names.iter().any(|n| *n == file.name)
    }
}

/// Excludes files below any directory with one of the given names.
#[derive(Debug, Clone, Default)]
pub struct ExcludeUnder {
    pub segments: Vec<String>,
}

impl ExcludeUnder {
    pub fn new(segments: &[&str]) -> Self {
        Self {
            segments: segments.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ExclusionRule for ExcludeUnder {
    fn excludes(&self, file: &FileCandidate) -> bool {
        self.segments.iter().any(|s| file.has_segment(s))
    }
}

/// Excludes files by extension (without the leading dot).
#[derive(Debug, Clone, Default)]
pub struct ExcludeExtensions {
    pub extensions: Vec<String>,
}

impl ExcludeExtensions {
    pub fn new(extensions: &[&str]) -> Self {
        Self {
            extensions: extensions.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ExclusionRule for ExcludeExtensions {
    fn excludes(&self, file: &FileCandidate) -> bool {
        self.extensions.iter().any(|e| file.has_extension(e))
    }
}

/// Excludes files by name: exact match, prefix, or case-insensitive
/// substring.
#[derive(Debug, Clone, Default)]
pub struct ExcludeNames {
    pub exact: Vec<String>,
    pub prefixes: Vec<String>,
    pub containing: Vec<String>,
}

impl ExcludeNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exact(mut self, names: &[&str]) -> Self {
        self.exact.extend(names.iter().map(|s| s.to_string()));
        self
    }

    pub fn prefixed(mut self, prefixes: &[&str]) -> Self {
        self.prefixes.extend(prefixes.iter().map(|s| s.to_string()));
        self
    }

    /// Substrings are matched against the lowercased file name.
    pub fn containing(mut self, needles: &[&str]) -> Self {
        self.containing
            .extend(needles.iter().map(|s| s.to_lowercase()));
        self
    }
}

impl ExclusionRule for ExcludeNames {
    fn excludes(&self, file: &FileCandidate) -> bool {
        if self.exact.iter().any(|n| *n == file.name) {
            return true;
        }
        if self.prefixes.iter().any(|p| file.name.starts_with(p.as_str())) {
            return true;
        }
        let lower = file.name.to_lowercase();
        self.containing.iter().any(|c| lower.contains(c.as_str()))
    }
}

/// Excludes a file when any of its rules does.
#[derive(Debug, Default)]
pub struct AnyOf {
    rules: Vec<Box<dyn ExclusionRule>>,
}

impl AnyOf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add another rule.
    pub fn or(mut self, rule: impl ExclusionRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }
}

impl ExclusionRule for AnyOf {
    fn excludes(&self, file: &FileCandidate) -> bool {
        self.rules.iter().any(|r| r.excludes(file))
    }
}

static INCLUDE_ALL: IncludeAll = IncludeAll;

/// Mapping from project name to its exclusion rule.
#[derive(Debug)]
pub struct RuleRegistry {
    rules: BTreeMap<String, Box<dyn ExclusionRule>>,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RuleRegistry {
    /// A registry with no project rules; only global exclusions apply.
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// The built-in rule table.
    pub fn builtin() -> Self {
        Self::empty()
            .with("alohomora", KeepOnly::new(&["common.go", "alohomora.go"]))
            .with("e911", ExcludeAll)
            .with(
                "meraki-api",
                ExcludeUnder::new(&["backups", "logs", "config"]),
            )
            .with(
                "misc-scripts",
                ExcludeNames::new()
                    .exact(&["30001_KEVLAR_61F.conf", "vpn_config_output.xlsx"])
                    .prefixed(&["hpp3"]),
            )
            .with("defender", ExcludeExtensions::new(&["csv"]))
            .with(
                "powershell-console",
                AnyOf::new()
                    .or(ExcludeNames::new()
                        .exact(&["npm-packages.json"])
                        .containing(&["backup"]))
                    .or(ExcludeUnder::new(&["_prod"])),
            )
    }

    /// Builder: register `rule` for `project`, replacing any previous rule.
    pub fn with(mut self, project: &str, rule: impl ExclusionRule + 'static) -> Self {
        self.register(project, rule);
        self
    }

    /// Register `rule` for `project`, replacing any previous rule.
    pub fn register(&mut self, project: &str, rule: impl ExclusionRule + 'static) {
        self.rules.insert(project.to_string(), Box::new(rule));
    }

    /// The rule for `project`; unknown projects get [`IncludeAll`].
    pub fn rule_for(&self, project: &str) -> &dyn ExclusionRule {
        self.rules
            .get(project)
            .map(|r| r.as_ref())
            .unwrap_or(&INCLUDE_ALL)
    }

    /// Classify a file: global exclusions first, then the project rule.
    pub fn classify(&self, file: &FileCandidate) -> Verdict {
        if let Some(reason) = global_exclusion(file) {
            return Verdict::Exclude(reason);
        }
        match file.project() {
            Some(project) if self.rule_for(project).excludes(file) => {
                Verdict::Exclude(Exclusion::Project(project.to_string()))
            }
            _ => Verdict::Include,
        }
    }

    /// Convenience wrapper around [`classify`](Self::classify) for a path
    /// relative to the development root.
    pub fn classify_path(&self, rule_path: &Path) -> Verdict {
        self.classify(&FileCandidate::new(rule_path))
    }
}
