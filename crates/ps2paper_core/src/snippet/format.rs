//! Snippet file text format.
//!
//! A snippet is exactly four lines:
//!
//! ```text
//! % Created by PS2Paper
//! %%BeginFeature: PageSize <name>
//! << /PageSize [ <width_pt> <height_pt> ] >> setpagedevice
//! %%EndFeature
//! ```

use crate::model::paper::{FileStatus, PaperDefinition};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::BufRead;

/// First line of every snippet this tool generates.
pub const SNIPPET_MARKER: &str = "% Created by PS2Paper";

/// Upper bound on bytes read while classifying; the header fits well within it.
const MAX_HEADER_BYTES: u64 = 4096;

static PAGE_SIZE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^<<\s*/PageSize\s*\[\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s+([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*\]\s*>>\s*setpagedevice",
    )
    .expect("valid page size regex")
});

/// Renders the canonical snippet text for a definition.
pub fn render_snippet(paper: &PaperDefinition) -> String {
    format!(
        "{SNIPPET_MARKER}\n%%BeginFeature: PageSize {}\n<< /PageSize [ {:.3} {:.3} ] >> setpagedevice\n%%EndFeature\n",
        paper.name,
        f64::from(paper.width) / 1000.0,
        f64::from(paper.height) / 1000.0,
    )
}

/// Extracts the `(width, height)` point values from a `setpagedevice` line.
pub fn parse_page_size_line(line: &str) -> Option<(f64, f64)> {
    let captures = PAGE_SIZE_RE.captures(line)?;
    let width = captures.get(1)?.as_str().parse::<f64>().ok()?;
    let height = captures.get(2)?.as_str().parse::<f64>().ok()?;
    Some((width, height))
}

/// Classifies snippet content against a definition.
///
/// Only the first three lines, and at most `MAX_HEADER_BYTES`, are read.
/// Anything that is not our header, including unreadable or truncated
/// content, is `Unknown`.
pub fn classify_snippet(reader: impl BufRead, paper: &PaperDefinition) -> FileStatus {
    let mut lines = reader.take(MAX_HEADER_BYTES).lines();

    let marker = match lines.next() {
        Some(Ok(line)) => line,
        _ => return FileStatus::Unknown,
    };
    if marker != SNIPPET_MARKER {
        return FileStatus::Unknown;
    }

    // The BeginFeature line is informational only.
    if !matches!(lines.next(), Some(Ok(_))) {
        return FileStatus::Unknown;
    }

    let size_line = match lines.next() {
        Some(Ok(line)) => line,
        _ => return FileStatus::Unknown,
    };
    let Some((width_pt, height_pt)) = parse_page_size_line(size_line.as_str()) else {
        return FileStatus::Unknown;
    };

    if to_millidots(width_pt) == i64::from(paper.width)
        && to_millidots(height_pt) == i64::from(paper.height)
    {
        FileStatus::Correct
    } else {
        FileStatus::Incorrect
    }
}

fn to_millidots(points: f64) -> i64 {
    (points * 1000.0).round() as i64
}
