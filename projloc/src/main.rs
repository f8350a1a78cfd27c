//! # projloc
//!
//! A CLI tool for counting lines per project directory, with per-project
//! exclusion rules.
//!
//! ## Overview
//!
//! projloc is built on top of projloclib. It scans a directory whose
//! top-level entries are projects, applies the exclusion rules, and prints
//! a table of files and lines per project, biggest first.
//!
//! ## Usage
//!
//! ```bash
//! # Scan the configured development root
//! projloc
//!
//! # Scan a single project (its rules still apply)
//! projloc ~/dev/meraki-api
//!
//! # Also list everything that was left out
//! projloc --show-exclusions
//!
//! # Count one file
//! projloc notes.txt
//!
//! # Output as JSON
//! projloc --output json
//! ```
//!
//! The development root is read from a JSON document, either
//! `{"devRoot": "/path/to/dev"}` or `{"paths": {"devRoot": "/path/to/dev"}}`,
//! located via `--config`, `$PROJLOC_CONFIG` or
//! `~/.config/projloc/config.json`.

mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use projloclib::{count_file, count_projects, Config, ProjlocError, Report, ScanOptions};
use tracing::Level;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("projloc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Count lines per project directory, with per-project exclusion rules")
        .arg(
            Arg::new("path")
                .help("Path to analyze (defaults to the configured development root)"),
        )
        .arg(
            Arg::new("show-exclusions")
                .long("show-exclusions")
                .action(ArgAction::SetTrue)
                .help("Also list every excluded file and directory"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Configuration file (JSON with a \"devRoot\" key)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["table", "json"])
                .default_value("table")
                .help("Output format"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log more detail to stderr (repeat for debug output)"),
        )
}

/// Initialise structured logging on stderr.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolve the scan target: explicit paths are taken relative to the
/// current directory, otherwise the development root is used.
fn resolve_target(matches: &ArgMatches, config: &Config) -> Result<PathBuf, anyhow::Error> {
    let target = match matches.get_one::<String>("path") {
        Some(path) => std::env::current_dir()
            .context("cannot determine current directory")?
            .join(path),
        None => config.dev_root.clone(),
    };

    if !target.exists() {
        return Err(ProjlocError::PathNotFound(target).into());
    }
    Ok(target)
}

fn load_config(matches: &ArgMatches) -> Result<Config, anyhow::Error> {
    let explicit = matches.get_one::<PathBuf>("config").map(|p| p.as_path());
    let path = Config::locate(explicit)?;
    tracing::info!(path = %path.display(), "loading config");
    Ok(Config::load(&path)?)
}

fn count_single_file(path: &Path) -> String {
    let outcome = count_file(path);
    if !outcome.is_ok() {
        tracing::warn!(path = %path.display(), ?outcome, "file could not be read");
    }
    render::render_single_file(path, outcome.lines())
}

fn run(matches: &ArgMatches) -> Result<String, anyhow::Error> {
    let config = load_config(matches)?;
    let target = resolve_target(matches, &config)?;

    if target.is_file() {
        return Ok(count_single_file(&target));
    }

    let show_exclusions = matches.get_flag("show-exclusions");
    let json = matches
        .get_one::<String>("output")
        .is_some_and(|s| s == "json");

    let start = Instant::now();
    let tally = count_projects(&target, &config.dev_root, ScanOptions::new())?;
    let mut report = Report::new(&target, &tally, start.elapsed());

    if json {
        if show_exclusions {
            report = report.with_exclusions(&tally);
        }
        let mut out = serde_json::to_string_pretty(&report)?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = render::render_table(&report);
    if show_exclusions {
        out.push_str(&render::render_exclusions(
            &tally.exclusion_groups(),
            console::colors_enabled(),
        ));
    }
    Ok(out)
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(matches.get_count("verbose"));

    match run(&matches) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_valid() {
        build_command().debug_assert();
    }

    #[test]
    fn test_parse_defaults() {
        let matches = build_command().get_matches_from(["projloc"]);

        assert!(matches.get_one::<String>("path").is_none());
        assert!(!matches.get_flag("show-exclusions"));
        assert_eq!(matches.get_one::<String>("output").unwrap(), "table");
        assert_eq!(matches.get_count("verbose"), 0);
    }

    #[test]
    fn test_parse_all_options() {
        let matches = build_command().get_matches_from([
            "projloc",
            "some/dir",
            "--show-exclusions",
            "--config",
            "/etc/projloc.json",
            "-o",
            "json",
            "-vv",
        ]);

        assert_eq!(matches.get_one::<String>("path").unwrap(), "some/dir");
        assert!(matches.get_flag("show-exclusions"));
        assert_eq!(
            matches.get_one::<PathBuf>("config").unwrap(),
            &PathBuf::from("/etc/projloc.json")
        );
        assert_eq!(matches.get_one::<String>("output").unwrap(), "json");
        assert_eq!(matches.get_count("verbose"), 2);
    }

    #[test]
    fn test_rejects_unknown_output() {
        let result = build_command().try_get_matches_from(["projloc", "-o", "csv"]);
        assert!(result.is_err());
    }
}
