//! Configuration loading.
//!
//! The configuration is a small JSON document that names the development
//! root, the directory project names are derived from:
//!
//! ```json
//! { "devRoot": "/home/me/dev" }
//! ```
//!
//! The same key may also sit in a `paths` section:
//!
//! ```json
//! { "paths": { "devRoot": "/home/me/dev" } }
//! ```
//!
//! Unknown keys are ignored so the same document can carry settings for
//! other tools.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ProjlocError;
use crate::Result;

/// Environment variable pointing at the configuration document.
pub const CONFIG_ENV: &str = "PROJLOC_CONFIG";

/// Location of the configuration document relative to `$HOME`.
pub const DEFAULT_CONFIG_PATH: &str = ".config/projloc/config.json";

/// Loaded tool configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Reference root used to derive project names for rule lookup
    pub dev_root: PathBuf,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PathsSection {
    dev_root: PathBuf,
}

/// Accepted document shapes; the nested form is tried first.
#[derive(Deserialize)]
#[serde(untagged)]
enum ConfigDocument {
    Nested { paths: PathsSection },
    Flat(PathsSection),
}

impl From<ConfigDocument> for Config {
    fn from(doc: ConfigDocument) -> Self {
        let section = match doc {
            ConfigDocument::Nested { paths } => paths,
            ConfigDocument::Flat(section) => section,
        };
        Config {
            dev_root: section.dev_root,
        }
    }
}

impl Config {
    /// Find the configuration document.
    ///
    /// Checks, in order: the explicit path, `$PROJLOC_CONFIG`, then
    /// `$HOME/.config/projloc/config.json`. The first candidate found is
    /// returned even if it does not exist, so an explicit path that is
    /// missing is reported as such instead of silently falling through.
    pub fn locate(explicit: Option<&Path>) -> Result<PathBuf> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let home = std::env::var_os("HOME").map(PathBuf::from);
        locate_from(explicit, from_env, home)
    }

    /// Read and validate the configuration document at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ProjlocError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &content)
    }

    fn from_json(path: &Path, content: &str) -> Result<Config> {
        let config: Config = serde_json::from_str::<ConfigDocument>(content)
            .map_err(|e| ProjlocError::ConfigParse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .into();

        if config.dev_root.as_os_str().is_empty() {
            return Err(ProjlocError::ConfigInvalid {
                path: path.to_path_buf(),
                message: "devRoot must not be empty".to_string(),
            });
        }

        Ok(config)
    }
}

fn locate_from(
    explicit: Option<&Path>,
    from_env: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = from_env.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path);
    }
    match home {
        Some(home) => Ok(home.join(DEFAULT_CONFIG_PATH)),
        None => Err(ProjlocError::ConfigNotFound(format!(
            "--config, ${CONFIG_ENV}, $HOME/{DEFAULT_CONFIG_PATH}"
        ))),
    }
}
