//! Collaborator interfaces the sync engine drives.
//!
//! The engine never touches the filesystem or an editor directly. It asks
//! a [`NoteStore`] for file-tree operations, a [`Workspace`] for the open
//! document and its [`Editor`], and reports outcomes through a
//! [`Notifier`]. Paths are vault-relative, `/`-separated strings.

#![allow(async_fn_in_trait)]

use std::io;
use std::sync::Mutex;

/// File-tree operations on a vault.
///
/// Every call is a single-object operation that either completes or
/// fails; callers must not assume any atomicity across calls.
pub trait NoteStore {
    async fn folder_exists(&self, path: &str) -> io::Result<bool>;

    /// Create `path` and any missing ancestors.
    async fn create_folder(&self, path: &str) -> io::Result<()>;

    async fn file_exists(&self, path: &str) -> io::Result<bool>;

    /// Resolve a note link to the path of the file it points at, using
    /// [`resolve_link_in`] semantics.
    async fn resolve_link(&self, link: &str) -> io::Result<Option<String>>;

    /// Move `from` to `to`. Fails if `to` is already taken by another file.
    async fn rename_file(&self, from: &str, to: &str) -> io::Result<()>;

    async fn read_file(&self, path: &str) -> io::Result<String>;

    async fn write_file(&self, path: &str, content: &str) -> io::Result<()>;

    /// Every file in the vault, hidden entries excluded, sorted.
    async fn list_all_files(&self) -> io::Result<Vec<String>>;
}

/// A cursor position in an editor buffer. `ch` counts characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// A live text buffer for the open document.
pub trait Editor {
    /// Text of line `n`, or `None` past the end of the buffer.
    fn line(&self, n: usize) -> Option<String>;

    /// Line the cursor sits on.
    fn cursor_line(&self) -> usize;

    /// Replace the text between `from` and `to` with `text`.
    fn replace_range(&mut self, text: &str, from: Position, to: Position);
}

/// The host's view of which document is open.
pub trait Workspace {
    type Editor: Editor;

    /// Path of the file shown in the active editor, if any.
    fn active_file(&self) -> Option<String>;

    /// Editor of the active file.
    fn active_editor(&mut self) -> Option<&mut Self::Editor>;

    /// Tell the workspace a file moved so open views follow it.
    fn file_renamed(&mut self, from: &str, to: &str);
}

/// User-facing notices. Never fails the caller.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Notifier that only logs through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::info!(target: "notemv::notice", "{message}");
    }
}

/// Notifier that records every message, for tests and batch reporting.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    messages: Mutex<Vec<String>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<String> {
        self.messages().pop()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, message: &str) {
        (**self).notify(message);
    }
}

/// Resolve `link` against the vault file list the way note links resolve.
///
/// 1. The normalized link, then the link with `.md` appended, as exact
///    paths.
/// 2. Otherwise any file whose path ends with the link (with or without
///    `.md`) at a segment boundary, compared case-insensitively. This is
///    how a bare `Note` finds `Deep/Folder/Note.md`. The shortest matching
///    path wins; ties break lexically.
pub fn resolve_link_in<'a, I>(files: I, link: &str) -> Option<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let target = notemv_core::path::normalize_path(link);
    if target.is_empty() {
        return None;
    }
    let with_ext = format!("{target}.{}", notemv_core::NOTE_EXTENSION);
    let files: Vec<&String> = files.into_iter().collect();

    for exact in [&target, &with_ext] {
        if let Some(found) = files.iter().find(|f| f.as_str() == exact.as_str()) {
            return Some((*found).clone());
        }
    }

    let wanted = [target.to_lowercase(), with_ext.to_lowercase()];
    files
        .iter()
        .filter(|f| {
            let lower = f.to_lowercase();
            wanted.iter().any(|w| {
                lower == *w
                    || lower
                        .strip_suffix(w.as_str())
                        .is_some_and(|head| head.ends_with('/'))
            })
        })
        .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
        .map(|f| (*f).clone())
}
