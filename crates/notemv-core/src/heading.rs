//! First-line heading helpers.
//!
//! A note's title is its first line when that line is a level-one markdown
//! heading. Two readings exist: the reverse synchronizer accepts `#`
//! followed by any whitespace run, while the move path only treats a
//! literal `"# "` prefix as a title.

use crate::sanitize::sanitize_file_name;

/// Heading text of a first line matching `^#\s+(.*)`, untrimmed.
///
/// Returns `None` when the line is not a level-one heading (including
/// `"##"` headings and a bare `"#"`).
pub fn parse_heading(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('#')?;
    let text = rest.trim_start();
    if text.len() == rest.len() {
        return None;
    }
    Some(text)
}

/// Trimmed title text of a line starting with `"# "`, or `""` otherwise.
pub fn title_text(line: &str) -> &str {
    line.strip_prefix("# ").map(str::trim).unwrap_or("")
}

/// Whether the heading line already tracks `base_name`, comparing both
/// sides after sanitizing.
pub fn heading_tracks_name(line: &str, base_name: &str) -> bool {
    sanitize_file_name(title_text(line)) == sanitize_file_name(base_name)
}

/// The heading line written for a note named `base_name`.
pub fn title_line(base_name: &str) -> String {
    format!("# {}", sanitize_file_name(base_name))
}

/// First line of `content` (everything before the first `\n`).
pub fn first_line(content: &str) -> &str {
    content.split('\n').next().unwrap_or("")
}

/// Replace the first line of `content`, keeping every other line intact.
pub fn replace_first_line(content: &str, line: &str) -> String {
    match content.split_once('\n') {
        Some((_, rest)) => format!("{line}\n{rest}"),
        None => line.to_string(),
    }
}
