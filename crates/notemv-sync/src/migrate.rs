//! Batch relocation of one folder's notes into another.

use serde::Serialize;

use notemv_core::error::{NotemvError, Result};
use notemv_core::path::{is_within, join_path, normalize_path, parent_folder};
use notemv_vault::{NoteStore, Notifier};

/// A single file that could not be moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationFailure {
    pub path: String,
    pub error: String,
}

/// What a migration did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub from: String,
    pub to: String,
    /// `(old, new)` pairs in the order they were moved.
    pub moved: Vec<(String, String)>,
    pub failed: Vec<MigrationFailure>,
}

impl MigrationReport {
    /// The notice shown once the batch is done.
    pub fn summary(&self) -> String {
        if self.moved.is_empty() && self.failed.is_empty() {
            return format!("No files found in {}", self.from);
        }
        let mut summary = format!(
            "Moved {} file(s) from {} to {}",
            self.moved.len(),
            self.from,
            self.to
        );
        if !self.failed.is_empty() {
            summary.push_str(&format!(" ({} failed)", self.failed.len()));
        }
        summary
    }
}

/// Move every file under `from` to the same relative place under `to`.
///
/// Folders are created as needed. A file that fails to move is recorded in
/// the report and the batch continues.
///
/// # Errors
///
/// Returns an error only if the vault cannot be listed.
pub async fn migrate_folder<S: NoteStore, N: Notifier>(
    store: &S,
    from: &str,
    to: &str,
    notifier: &N,
) -> Result<MigrationReport> {
    let from = normalize_path(from);
    let to = normalize_path(to);
    let mut report = MigrationReport {
        from: from.clone(),
        to: to.clone(),
        ..MigrationReport::default()
    };

    if from == to {
        tracing::warn!(%from, "source and target folders are the same");
        notifier.notify(&report.summary());
        return Ok(report);
    }

    let files: Vec<String> = store
        .list_all_files()
        .await?
        .into_iter()
        .filter(|path| is_within(path, &from))
        // A target nested inside the source is not migrated into itself.
        .filter(|path| to.is_empty() || !is_within(path, &to))
        .collect();
    tracing::info!(%from, %to, count = files.len(), "migrating");

    for path in files {
        let relative = path
            .strip_prefix(from.as_str())
            .map(|rest| rest.trim_start_matches('/'))
            .unwrap_or(path.as_str());
        let target = join_path(&to, relative);

        match move_one(store, &path, &target).await {
            Ok(()) => {
                tracing::debug!(from = %path, to = %target, "migrated");
                report.moved.push((path, target));
            }
            Err(e) => {
                tracing::warn!(%path, error = %e, "migration of file failed");
                report.failed.push(MigrationFailure {
                    path,
                    error: e.to_string(),
                });
            }
        }
    }

    notifier.notify(&report.summary());
    Ok(report)
}

async fn move_one<S: NoteStore>(store: &S, from: &str, to: &str) -> Result<()> {
    let folder = parent_folder(to);
    if !store.folder_exists(folder).await? {
        store
            .create_folder(folder)
            .await
            .map_err(|source| NotemvError::FolderCreate {
                path: folder.to_string(),
                source,
            })?;
    }
    store
        .rename_file(from, to)
        .await
        .map_err(|source| NotemvError::Rename {
            from: from.to_string(),
            to: to.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use notemv_vault::{CollectingNotifier, MemoryVault};

    #[tokio::test]
    async fn moves_nested_files_keeping_relative_layout() {
        let vault = MemoryVault::new()
            .with_file("Inbox/a.md", "a")
            .with_file("Inbox/deep/b.md", "b")
            .with_file("Other/c.md", "c");
        let notifier = CollectingNotifier::new();

        let report = migrate_folder(&vault, "Inbox", "Archive", &notifier)
            .await
            .unwrap();

        assert_eq!(report.moved.len(), 2);
        assert!(report.failed.is_empty());
        assert_eq!(
            vault.paths(),
            vec!["Archive/a.md", "Archive/deep/b.md", "Other/c.md"]
        );
        assert_eq!(
            notifier.messages(),
            vec!["Moved 2 file(s) from Inbox to Archive"]
        );
    }

    #[tokio::test]
    async fn empty_source_is_reported() {
        let vault = MemoryVault::new().with_file("Other/c.md", "c");
        let notifier = CollectingNotifier::new();

        let report = migrate_folder(&vault, "Inbox", "Archive", &notifier)
            .await
            .unwrap();
        assert!(report.moved.is_empty());
        assert_eq!(notifier.last().as_deref(), Some("No files found in Inbox"));
    }

    #[tokio::test]
    async fn prefix_sharing_folders_are_not_included() {
        let vault = MemoryVault::new()
            .with_file("Inbox/a.md", "")
            .with_file("Inboxes/b.md", "");
        let notifier = CollectingNotifier::new();

        migrate_folder(&vault, "Inbox", "Archive", &notifier)
            .await
            .unwrap();
        assert_eq!(vault.paths(), vec!["Archive/a.md", "Inboxes/b.md"]);
    }

    #[tokio::test]
    async fn conflicts_are_counted_not_fatal() {
        let vault = MemoryVault::new()
            .with_file("Inbox/a.md", "new")
            .with_file("Inbox/b.md", "")
            .with_file("Archive/a.md", "old");
        let notifier = CollectingNotifier::new();

        let report = migrate_folder(&vault, "Inbox", "Archive", &notifier)
            .await
            .unwrap();

        assert_eq!(report.moved, vec![("Inbox/b.md".to_string(), "Archive/b.md".to_string())]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].path, "Inbox/a.md");
        assert_eq!(vault.contents("Archive/a.md").as_deref(), Some("old"));
        assert_eq!(
            notifier.last().as_deref(),
            Some("Moved 1 file(s) from Inbox to Archive (1 failed)")
        );
    }

    #[tokio::test]
    async fn same_folder_is_a_no_op() {
        let vault = MemoryVault::new().with_file("Inbox/a.md", "");
        let notifier = CollectingNotifier::new();

        let report = migrate_folder(&vault, "Inbox/", "/Inbox", &notifier)
            .await
            .unwrap();
        assert!(report.moved.is_empty());
        assert!(vault.renames().is_empty());
    }
}
