//! Vault-relative path helpers.
//!
//! Paths inside the vault are `/`-separated strings relative to the vault
//! root, without leading or trailing slashes. The vault root itself is the
//! empty string.

/// Normalize a vault-relative path.
///
/// Backslashes count as separators, repeated separators collapse, `.`
/// segments and leading/trailing slashes are dropped, and non-breaking
/// spaces become plain spaces. `..` removes the previous segment and
/// stops at the vault root, so the result never points outside the vault.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\u{00A0}', " ");
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments.join("/")
}

/// Join a folder and a file name. An empty folder means the vault root.
pub fn join_path(folder: &str, name: &str) -> String {
    let folder = normalize_path(folder);
    if folder.is_empty() {
        normalize_path(name)
    } else {
        normalize_path(&format!("{folder}/{name}"))
    }
}

/// Split a vault path into `(folder, file_name)`.
pub fn split_path(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some((folder, name)) => (folder, name),
        None => ("", path),
    }
}

/// Folder part of a vault path (`""` for files in the root).
pub fn parent_folder(path: &str) -> &str {
    split_path(path).0
}

/// File name part of a vault path.
pub fn file_name(path: &str) -> &str {
    split_path(path).1
}

/// Whether `path` lives directly or transitively under `folder`.
pub fn is_within(path: &str, folder: &str) -> bool {
    if folder.is_empty() {
        return true;
    }
    path.strip_prefix(folder)
        .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_and_trims_separators() {
        assert_eq!(normalize_path("Projects//Alpha/"), "Projects/Alpha");
        assert_eq!(normalize_path("/Projects"), "Projects");
        assert_eq!(normalize_path("./Projects/./Alpha"), "Projects/Alpha");
        assert_eq!(normalize_path(r"Projects\Alpha"), "Projects/Alpha");
        assert_eq!(normalize_path("My\u{00A0}Notes"), "My Notes");
    }

    #[test]
    fn normalize_resolves_parent_segments_inside_the_vault() {
        assert_eq!(normalize_path("Projects/../Archive/a.md"), "Archive/a.md");
        assert_eq!(normalize_path("../escaped/X"), "escaped/X");
        assert_eq!(normalize_path("a/../../.."), "");
        assert_eq!(normalize_path(r"..\..\etc"), "etc");
        assert_eq!(normalize_path("a..b/c"), "a..b/c");
    }

    #[test]
    fn normalize_maps_empty_to_vault_root() {
        assert_eq!(normalize_path(""), "");
        assert_eq!(normalize_path("/"), "");
        assert_eq!(normalize_path("//./"), "");
    }

    #[test]
    fn join_places_bare_names_in_root() {
        assert_eq!(join_path("", "Idea.md"), "Idea.md");
        assert_eq!(join_path("Projects", "Alpha.md"), "Projects/Alpha.md");
        assert_eq!(join_path("Projects/", "Alpha.md"), "Projects/Alpha.md");
    }

    #[test]
    fn split_separates_folder_and_name() {
        assert_eq!(split_path("Projects/Alpha.md"), ("Projects", "Alpha.md"));
        assert_eq!(split_path("a/b/c.md"), ("a/b", "c.md"));
        assert_eq!(split_path("Idea.md"), ("", "Idea.md"));
        assert_eq!(parent_folder("a/b/c.md"), "a/b");
        assert_eq!(file_name("a/b/c.md"), "c.md");
    }

    #[test]
    fn is_within_requires_a_segment_boundary() {
        assert!(is_within("Inbox/a.md", "Inbox"));
        assert!(is_within("Inbox/deep/a.md", "Inbox"));
        assert!(!is_within("Inboxes/a.md", "Inbox"));
        assert!(!is_within("Inbox", "Inbox"));
        assert!(is_within("a.md", ""));
    }
}
