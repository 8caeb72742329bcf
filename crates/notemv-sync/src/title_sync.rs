//! Heading → file name synchronization.
//!
//! Watches first-line edits and renames the file when its level-one
//! heading and its name diverge. It only ever reads headings and writes
//! paths. The move path does the opposite, and after it rewrites a
//! heading to match a new name the next edit event finds the name already
//! correct, so the two directions cannot chase each other.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Serialize;

use notemv_core::config::Config;
use notemv_core::error::{NotemvError, Result};
use notemv_core::heading::{first_line, parse_heading};
use notemv_core::path::{file_name, join_path, parent_folder};
use notemv_core::sanitize::note_file_name;
use notemv_vault::{Editor, NoteStore, Workspace};

use crate::debounce::Debouncer;

/// What the synchronizer did with one edit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum SyncDecision {
    /// Dropped by the edit debouncer.
    Debounced,
    /// First line is not a `#` heading.
    NotAHeading,
    /// Heading text is blank.
    EmptyHeading,
    /// Same heading as last time for this document.
    Unchanged,
    /// The file is already named after the heading.
    AlreadyNamed,
    /// Dropped by the rename debouncer.
    RenameSuppressed,
    Renamed { from: String, to: String },
}

/// Per-session heading synchronizer.
///
/// Remembers the last heading seen for each document so duplicate event
/// delivery is ignored. The memory is best-effort and lost on restart.
#[derive(Debug)]
pub struct TitleSynchronizer {
    last_seen: HashMap<String, String>,
    edit_gate: Debouncer<String>,
    rename_gate: Debouncer<String>,
}

impl TitleSynchronizer {
    pub fn new(edit_window: Duration, rename_window: Duration) -> Self {
        Self {
            last_seen: HashMap::new(),
            edit_gate: Debouncer::new(edit_window),
            rename_gate: Debouncer::new(rename_window),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.edit_window(), config.rename_window())
    }

    /// Last heading recorded for `path`.
    pub fn last_seen(&self, path: &str) -> Option<&str> {
        self.last_seen.get(path).map(String::as_str)
    }

    /// Handle an edit event for `path` whose first line is now `line`.
    ///
    /// # Errors
    ///
    /// Returns [`NotemvError::Rename`] if the induced rename fails.
    pub async fn on_edit<S: NoteStore>(
        &mut self,
        store: &S,
        path: &str,
        line: &str,
    ) -> Result<SyncDecision> {
        self.on_edit_at(store, path, line, Instant::now()).await
    }

    /// [`TitleSynchronizer::on_edit`] at an explicit time.
    ///
    /// # Errors
    ///
    /// Returns [`NotemvError::Rename`] if the induced rename fails.
    pub async fn on_edit_at<S: NoteStore>(
        &mut self,
        store: &S,
        path: &str,
        line: &str,
        now: Instant,
    ) -> Result<SyncDecision> {
        let key = path.to_string();
        if !self.edit_gate.call_at(&key, now) {
            return Ok(SyncDecision::Debounced);
        }

        let Some(heading) = parse_heading(line) else {
            return Ok(SyncDecision::NotAHeading);
        };
        let heading = heading.trim();
        if heading.is_empty() {
            return Ok(SyncDecision::EmptyHeading);
        }
        if self.last_seen(path) == Some(heading) {
            tracing::debug!(%path, %heading, "heading unchanged");
            return Ok(SyncDecision::Unchanged);
        }
        self.last_seen.insert(key.clone(), heading.to_string());

        let candidate = note_file_name(heading);
        if candidate == file_name(path) {
            return Ok(SyncDecision::AlreadyNamed);
        }

        if !self.rename_gate.call_at(&key, now) {
            return Ok(SyncDecision::RenameSuppressed);
        }
        let target = join_path(parent_folder(path), &candidate);
        store
            .rename_file(path, &target)
            .await
            .map_err(|source| NotemvError::Rename {
                from: path.to_string(),
                to: target.clone(),
                source,
            })?;
        tracing::info!(from = %path, to = %target, "renamed to match heading");

        // Per-document state follows the file so a burst spanning the
        // rename stays one burst.
        if let Some(seen) = self.last_seen.remove(path) {
            self.last_seen.insert(target.clone(), seen);
        }
        self.edit_gate.rename_key(&key, target.clone());
        self.rename_gate.rename_key(&key, target.clone());
        Ok(SyncDecision::Renamed {
            from: path.to_string(),
            to: target,
        })
    }

    /// Handle a change to a stored file, reading its first line from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`NotemvError::Io`] if the file cannot be read and
    /// [`NotemvError::Rename`] if the induced rename fails.
    pub async fn on_file_change<S: NoteStore>(
        &mut self,
        store: &S,
        path: &str,
    ) -> Result<SyncDecision> {
        let content = store.read_file(path).await?;
        self.on_edit(store, path, first_line(&content)).await
    }

    /// Handle a change in the active editor, telling the workspace about
    /// any rename so the open view follows the file.
    ///
    /// # Errors
    ///
    /// Returns [`NotemvError::NoActiveContext`] without an open editor and
    /// [`NotemvError::Rename`] if the induced rename fails.
    pub async fn on_editor_change<S: NoteStore, W: Workspace>(
        &mut self,
        store: &S,
        workspace: &mut W,
    ) -> Result<SyncDecision> {
        let path = workspace
            .active_file()
            .ok_or(NotemvError::NoActiveContext("markdown view"))?;
        let line = workspace
            .active_editor()
            .ok_or(NotemvError::NoActiveContext("markdown view"))?
            .line(0)
            .unwrap_or_default();

        let decision = self.on_edit(store, &path, &line).await?;
        if let SyncDecision::Renamed { from, to } = &decision {
            workspace.file_renamed(from, to);
        }
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notemv_vault::{LineBuffer, MemoryVault, OpenNote, Position};

    const EDIT: Duration = Duration::from_millis(500);
    const RENAME: Duration = Duration::from_millis(200);

    fn sync() -> TitleSynchronizer {
        TitleSynchronizer::new(EDIT, RENAME)
    }

    #[tokio::test]
    async fn heading_edit_renames_file() {
        let vault = MemoryVault::new().with_file("Draft.md", "# Final Plan\nbody");
        let mut sync = sync();

        let decision = sync
            .on_edit_at(&vault, "Draft.md", "# Final Plan", Instant::now())
            .await
            .unwrap();
        assert_eq!(
            decision,
            SyncDecision::Renamed {
                from: "Draft.md".to_string(),
                to: "Final Plan.md".to_string()
            }
        );
        assert_eq!(vault.paths(), vec!["Final Plan.md"]);
        assert_eq!(sync.last_seen("Final Plan.md"), Some("Final Plan"));
        assert_eq!(sync.last_seen("Draft.md"), None);
    }

    #[tokio::test]
    async fn duplicate_delivery_is_a_no_op() {
        let vault = MemoryVault::new().with_file("Draft.md", "# Final Plan");
        let mut sync = sync();
        let t0 = Instant::now();

        sync.on_edit_at(&vault, "Draft.md", "# Final Plan", t0)
            .await
            .unwrap();
        // Delivered again right away, for the renamed file: still the same burst.
        let decision = sync
            .on_edit_at(&vault, "Final Plan.md", "# Final Plan", t0 + Duration::from_millis(1))
            .await
            .unwrap();
        assert_eq!(decision, SyncDecision::Debounced);

        // And again for the same path after the edit window.
        let decision = sync
            .on_edit_at(&vault, "Final Plan.md", "# Final Plan", t0 + EDIT * 2)
            .await
            .unwrap();
        assert_eq!(decision, SyncDecision::Unchanged);
        assert_eq!(vault.renames().len(), 1);
    }

    #[tokio::test]
    async fn burst_of_edits_runs_once() {
        let vault = MemoryVault::new().with_file("Draft.md", "");
        let mut sync = sync();
        let t0 = Instant::now();

        // Each event is delivered for wherever the file currently lives.
        let mut path = "Draft.md".to_string();
        let mut executed = 0;
        for (i, line) in ["# F", "# Fi", "# Fin", "# Fina", "# Final"].iter().enumerate() {
            let at = t0 + Duration::from_millis(50 * i as u64);
            let decision = sync.on_edit_at(&vault, &path, line, at).await.unwrap();
            if let SyncDecision::Renamed { to, .. } = &decision {
                path = to.clone();
            }
            if decision != SyncDecision::Debounced {
                executed += 1;
            }
        }
        assert_eq!(executed, 1);
        assert_eq!(vault.renames(), vec![("Draft.md".to_string(), "F.md".to_string())]);
    }

    #[tokio::test]
    async fn live_typing_in_the_editor_renames_once() {
        let vault = MemoryVault::new().with_file("Draft.md", "# Draft");
        let mut workspace = OpenNote::open("Draft.md", "# Draft");
        let mut sync = sync();

        for heading in ["# F", "# Fi", "# Fin", "# Fina", "# Final"] {
            let editor = workspace.buffer_mut();
            let old_len = editor.line(0).unwrap_or_default().chars().count();
            editor.replace_range(heading, Position::new(0, 0), Position::new(0, old_len));
            sync.on_editor_change(&vault, &mut workspace).await.unwrap();
        }

        assert_eq!(vault.renames().len(), 1, "renames: {:?}", vault.renames());
        assert_eq!(workspace.active_file().as_deref(), Some("F.md"));
    }

    #[tokio::test]
    async fn ignores_non_headings_and_blank_headings() {
        let vault = MemoryVault::new().with_file("Draft.md", "");
        let mut sync = sync();
        let t0 = Instant::now();

        let decision = sync.on_edit_at(&vault, "Draft.md", "Just text", t0).await.unwrap();
        assert_eq!(decision, SyncDecision::NotAHeading);

        let decision = sync
            .on_edit_at(&vault, "Draft.md", "#   ", t0 + EDIT)
            .await
            .unwrap();
        assert_eq!(decision, SyncDecision::EmptyHeading);

        let decision = sync
            .on_edit_at(&vault, "Draft.md", "## Sub", t0 + EDIT * 2)
            .await
            .unwrap();
        assert_eq!(decision, SyncDecision::NotAHeading);
        assert!(vault.renames().is_empty());
        assert_eq!(sync.last_seen("Draft.md"), None);
    }

    #[tokio::test]
    async fn matching_name_is_left_alone_but_remembered() {
        let vault = MemoryVault::new().with_file("Notes/Q1- plan.md", "");
        let mut sync = sync();

        let decision = sync
            .on_edit_at(&vault, "Notes/Q1- plan.md", "# Q1: plan ", Instant::now())
            .await
            .unwrap();
        assert_eq!(decision, SyncDecision::AlreadyNamed);
        assert_eq!(sync.last_seen("Notes/Q1- plan.md"), Some("Q1: plan"));
    }

    #[tokio::test]
    async fn rename_stays_in_the_same_folder() {
        let vault = MemoryVault::new().with_file("Projects/Draft.md", "");
        let mut sync = sync();

        sync.on_edit_at(&vault, "Projects/Draft.md", "# Alpha/Beta", Instant::now())
            .await
            .unwrap();
        assert_eq!(vault.paths(), vec!["Projects/Alpha-Beta.md"]);
    }

    #[tokio::test]
    async fn failed_rename_is_an_error_but_heading_is_remembered() {
        let vault = MemoryVault::new()
            .with_file("Draft.md", "")
            .with_file("Taken.md", "");
        let mut sync = sync();

        let err = sync
            .on_edit_at(&vault, "Draft.md", "# Taken", Instant::now())
            .await
            .unwrap_err();
        assert!(matches!(err, NotemvError::Rename { .. }));
        assert_eq!(sync.last_seen("Draft.md"), Some("Taken"));
        assert_eq!(vault.paths(), vec!["Draft.md", "Taken.md"]);
    }

    #[tokio::test]
    async fn rename_gate_suppresses_overlapping_renames() {
        let vault = MemoryVault::new().with_file("Draft.md", "");
        let mut sync = TitleSynchronizer::new(Duration::ZERO, RENAME);
        let t0 = Instant::now();

        // The first rename fails, so the file is still at Draft.md.
        vault.fail_renames(true);
        assert!(sync.on_edit_at(&vault, "Draft.md", "# One", t0).await.is_err());
        vault.fail_renames(false);

        let decision = sync
            .on_edit_at(&vault, "Draft.md", "# Two", t0 + Duration::from_millis(10))
            .await
            .unwrap();
        assert_eq!(decision, SyncDecision::RenameSuppressed);

        let decision = sync
            .on_edit_at(&vault, "Draft.md", "# Three", t0 + RENAME * 2)
            .await
            .unwrap();
        assert!(matches!(decision, SyncDecision::Renamed { .. }));
        assert_eq!(vault.paths(), vec!["Three.md"]);
    }

    #[tokio::test]
    async fn reads_heading_from_store() {
        let vault = MemoryVault::new().with_file("Draft.md", "# Stored\nbody");
        let mut sync = sync();
        let decision = sync.on_file_change(&vault, "Draft.md").await.unwrap();
        assert!(matches!(decision, SyncDecision::Renamed { .. }));
        assert_eq!(vault.contents("Stored.md").as_deref(), Some("# Stored\nbody"));
    }

    #[tokio::test]
    async fn editor_change_moves_the_open_view() {
        let vault = MemoryVault::new().with_file("Draft.md", "# Draft");
        let mut workspace = OpenNote::open("Draft.md", "# Draft");
        let editor: &mut LineBuffer = workspace.buffer_mut();
        editor.replace_range("# Renamed", Position::new(0, 0), Position::new(0, 7));

        let mut sync = sync();
        let decision = sync.on_editor_change(&vault, &mut workspace).await.unwrap();
        assert!(matches!(decision, SyncDecision::Renamed { .. }));
        assert_eq!(workspace.active_file().as_deref(), Some("Renamed.md"));
    }

    #[tokio::test]
    async fn editor_change_without_editor_is_reported() {
        let vault = MemoryVault::new();
        let mut workspace = OpenNote::empty();
        let err = sync()
            .on_editor_change(&vault, &mut workspace)
            .await
            .unwrap_err();
        assert!(matches!(err, NotemvError::NoActiveContext(_)));
    }
}
