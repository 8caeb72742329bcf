//! File name sanitizing and note-name helpers.
//!
//! Every name that ends up on disk goes through [`sanitize_file_name`].
//! The function is pure, total, and idempotent.

/// Extension every note file carries, without the dot.
pub const NOTE_EXTENSION: &str = "md";

/// Characters that may not appear in a note file name.
pub const FORBIDDEN_CHARS: [char; 10] = ['\\', '/', ':', '*', '?', '"', '<', '>', ',', '|'];

/// Replace every forbidden character with `-`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if FORBIDDEN_CHARS.contains(&c) { '-' } else { c })
        .collect()
}

/// Strip the note extension from a file name, if present.
///
/// `"Idea.md"` becomes `"Idea"`; names without the extension are returned
/// unchanged.
pub fn base_name(file_name: &str) -> &str {
    file_name
        .strip_suffix(NOTE_EXTENSION)
        .and_then(|rest| rest.strip_suffix('.'))
        .unwrap_or(file_name)
}

/// Sanitize `name` and append the note extension.
pub fn note_file_name(name: &str) -> String {
    format!("{}.{NOTE_EXTENSION}", sanitize_file_name(name))
}

/// Whether `file_name` carries the note extension.
pub fn is_note_file(file_name: &str) -> bool {
    base_name(file_name).len() != file_name.len()
}
