//! Text rendering for CLI output.

use console::Style;
use projloclib::{format_count, ExclusionGroup, ProjectRow, Report};

const RULE_WIDTH: usize = 70;
const NAME_WIDTH: usize = 30;
const FILES_WIDTH: usize = 12;
const LINES_WIDTH: usize = 15;

/// Truncate a name to fit within max_len, adding ".." prefix if needed
fn truncate_name(name: &str, max_len: usize) -> String {
    let len = name.chars().count();
    if len > max_len {
        let tail: String = name.chars().skip(len - max_len + 2).collect();
        format!("..{tail}")
    } else {
        name.to_string()
    }
}

fn format_row(name: &str, files: u64, lines: u64) -> String {
    format!(
        "{:<nw$} {:>fw$} {:>lw$}",
        truncate_name(name, NAME_WIDTH),
        format_count(files),
        format_count(lines),
        nw = NAME_WIDTH,
        fw = FILES_WIDTH,
        lw = LINES_WIDTH,
    )
}

fn project_row(row: &ProjectRow) -> String {
    format_row(&row.name, row.files, row.lines)
}

/// Render the project summary table.
pub fn render_table(report: &Report) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    let mut lines = vec![
        String::new(),
        heavy.clone(),
        format!("ANALYZING: {}", report.path),
        heavy.clone(),
        format!(
            "{:<nw$} {:>fw$} {:>lw$}",
            "Project",
            "Files",
            "Lines",
            nw = NAME_WIDTH,
            fw = FILES_WIDTH,
            lw = LINES_WIDTH,
        ),
        light,
    ];
    lines.extend(report.projects.iter().map(project_row));
    lines.push(heavy.clone());
    lines.push(format_row("TOTAL", report.total.files, report.total.lines));
    lines.push(heavy.clone());
    lines.push(String::new());
    lines.push(format!(
        "Excluded files: {}",
        format_count(report.excluded_files)
    ));
    lines.push(format!(
        "Processing time: {:.2} seconds",
        report.elapsed_secs
    ));
    lines.push(heavy);

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render the exclusion listing: one block per project, directories
/// before files, followed by a summary line. Empty when nothing was
/// excluded.
pub fn render_exclusions(groups: &[ExclusionGroup], color: bool) -> String {
    if groups.is_empty() {
        return String::new();
    }

    let dir_tag = Style::new().blue().bright().force_styling(color);
    let file_tag = Style::new().yellow().bright().force_styling(color);

    let heavy = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        String::new(),
        heavy.clone(),
        "EXCLUSIONS".to_string(),
        heavy.clone(),
    ];

    let mut dirs = 0u64;
    let mut files = 0u64;
    for group in groups {
        lines.push(String::new());
        lines.push(format!("{}:", group.project));
        for dir in &group.directories {
            lines.push(format!("  {}  {dir}", dir_tag.apply_to("[DIR]")));
        }
        for file in &group.files {
            lines.push(format!("  {} {file}", file_tag.apply_to("[FILE]")));
        }
        dirs += group.directories.len() as u64;
        files += group.files.len() as u64;
    }

    lines.push(String::new());
    lines.push(heavy.clone());
    lines.push(format!(
        "Total exclusions: {} ({} dirs, {} files)",
        format_count(dirs + files),
        format_count(dirs),
        format_count(files)
    ));
    lines.push(heavy);

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render the single-file result.
pub fn render_single_file(path: &std::path::Path, lines: u64) -> String {
    format!(
        "\nCounting single file: {}\nLines: {}\n",
        path.display(),
        format_count(lines)
    )
}
