//! `move` execution: relocate the active file and keep its title in step.
//!
//! Ordering is strict. The destination folder exists before any rename is
//! attempted, and the rename succeeds before the title is touched. A title
//! rewrite that fails after a successful rename is reported and the file
//! stays moved.

use serde::Serialize;

use notemv_core::config::CollisionCheck;
use notemv_core::error::{NotemvError, Result};
use notemv_core::heading::{first_line, heading_tracks_name, replace_first_line, title_line};
use notemv_core::path::file_name;
use notemv_core::sanitize::base_name;
use notemv_vault::{Editor, NoteStore, Notifier, Position, Workspace};

use crate::resolver::resolve;

/// Result of a completed move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    pub final_path: String,
    /// The file took the destination's name (no collision).
    pub renamed_with_new_name: bool,
    /// The first-line heading was rewritten to the new name.
    pub title_updated: bool,
}

/// Moves the active file to a destination link.
pub struct MoveExecutor<'a, S, W, N> {
    store: &'a S,
    workspace: &'a mut W,
    notifier: &'a N,
    collision: CollisionCheck,
}

impl<'a, S, W, N> MoveExecutor<'a, S, W, N>
where
    S: NoteStore,
    W: Workspace,
    N: Notifier,
{
    pub fn new(store: &'a S, workspace: &'a mut W, notifier: &'a N) -> Self {
        Self {
            store,
            workspace,
            notifier,
            collision: CollisionCheck::default(),
        }
    }

    pub fn with_collision(mut self, collision: CollisionCheck) -> Self {
        self.collision = collision;
        self
    }

    /// Move the active file to `destination_link`.
    ///
    /// # Errors
    ///
    /// - [`NotemvError::NoActiveContext`] when no file is open; nothing changes.
    /// - [`NotemvError::FolderCreate`] when the folder cannot be created; no rename.
    /// - [`NotemvError::Rename`] when the rename fails; no title rewrite.
    /// - [`NotemvError::TitleRewrite`] when the file moved but its heading
    ///   could not be updated.
    pub async fn execute(&mut self, destination_link: &str) -> Result<MoveOutcome> {
        let source = self
            .workspace
            .active_file()
            .ok_or(NotemvError::NoActiveContext("file to move"))?;
        let current_name = file_name(&source).to_string();

        let resolved = resolve(self.store, destination_link, &current_name, self.collision).await?;
        self.ensure_folder(&resolved.folder_path).await?;

        let target = resolved.target_path(&current_name);
        if target == source {
            tracing::debug!(path = %source, "already at destination");
            self.notifier.notify(&format!("File is already at {target}"));
            return Ok(MoveOutcome {
                final_path: target,
                renamed_with_new_name: false,
                title_updated: false,
            });
        }

        // Must be read before the rename changes the current name.
        let title_was_synced = self.title_tracks_name(&source, &current_name).await;

        self.store
            .rename_file(&source, &target)
            .await
            .map_err(|source_err| NotemvError::Rename {
                from: source.clone(),
                to: target.clone(),
                source: source_err,
            })?;
        self.workspace.file_renamed(&source, &target);
        tracing::info!(from = %source, to = %target, title_was_synced, "moved");
        self.notifier.notify(&format!("Moved file to {target}"));

        if title_was_synced {
            self.rewrite_title(&target).await?;
        }

        Ok(MoveOutcome {
            renamed_with_new_name: !resolved.target_exists,
            title_updated: title_was_synced,
            final_path: target,
        })
    }

    async fn ensure_folder(&self, folder: &str) -> Result<()> {
        if self.store.folder_exists(folder).await? {
            return Ok(());
        }
        tracing::debug!(%folder, "creating folder");
        self.store
            .create_folder(folder)
            .await
            .map_err(|source| NotemvError::FolderCreate {
                path: folder.to_string(),
                source,
            })
    }

    /// Whether the file's heading currently tracks its name. Reads the live
    /// editor when the file is open, the stored content otherwise; an
    /// unreadable file counts as not tracking.
    async fn title_tracks_name(&mut self, path: &str, current_name: &str) -> bool {
        let base = base_name(current_name);
        if self.workspace.active_file().as_deref() == Some(path) {
            if let Some(editor) = self.workspace.active_editor() {
                let line = editor.line(0).unwrap_or_default();
                return heading_tracks_name(&line, base);
            }
        }
        match self.store.read_file(path).await {
            Ok(content) => heading_tracks_name(first_line(&content), base),
            Err(e) => {
                tracing::warn!(%path, error = %e, "cannot read heading");
                false
            }
        }
    }

    async fn rewrite_title(&mut self, path: &str) -> Result<()> {
        let title = title_line(base_name(file_name(path)));

        if self.workspace.active_file().as_deref() == Some(path) {
            if let Some(editor) = self.workspace.active_editor() {
                let old = editor.line(0).unwrap_or_default();
                editor.replace_range(
                    &title,
                    Position::new(0, 0),
                    Position::new(0, old.chars().count()),
                );
                return Ok(());
            }
        }

        let rewrite_err = |source| NotemvError::TitleRewrite {
            path: path.to_string(),
            source,
        };
        let content = self.store.read_file(path).await.map_err(rewrite_err)?;
        self.store
            .write_file(path, &replace_first_line(&content, &title))
            .await
            .map_err(rewrite_err)
    }
}
