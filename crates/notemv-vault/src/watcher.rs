//! File system watcher feeding edit-change events to the title synchronizer.
//!
//! Uses the `notify` crate for cross-platform file system events
//! (FSEvents on macOS, inotify on Linux, ReadDirectoryChanges on Windows).
//! Events are forwarded into a tokio channel so the watch loop can await
//! them on the same runtime as the engine.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use notemv_core::error::NotemvError;
use notemv_core::sanitize::is_note_file;

/// Events emitted by the vault watcher, with vault-relative paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultEvent {
    /// A note was created or its content changed.
    Changed(String),
    /// A note was deleted or moved away.
    Removed(String),
}

/// Watches a vault directory for note changes and emits events.
pub struct VaultWatcher {
    _watcher: RecommendedWatcher,
    receiver: mpsc::UnboundedReceiver<VaultEvent>,
}

/// Vault-relative path of a watched note, or `None` for anything the
/// synchronizer should ignore (non-notes, hidden entries, outside paths).
fn vault_path(root: &Path, path: &Path) -> Option<String> {
    if !is_note_file(path.file_name()?.to_str()?) {
        return None;
    }
    let rel = path.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in rel.components() {
        let name = component.as_os_str().to_str()?;
        if name.starts_with('.') {
            return None;
        }
        segments.push(name);
    }
    Some(segments.join("/"))
}

impl VaultWatcher {
    /// Start watching a vault directory for changes.
    ///
    /// # Errors
    ///
    /// Returns [`NotemvError::Watch`] if the watcher cannot be created.
    pub fn start(vault_root: &Path) -> Result<Self, NotemvError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let root: PathBuf = vault_root
            .canonicalize()
            .map_err(|e| NotemvError::Watch(e.to_string()))?;
        let root_owned = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(error = %e, "watch error");
                    return;
                }
            };
            for path in &event.paths {
                let Some(rel) = vault_path(&root_owned, path) else {
                    continue;
                };
                let vault_event = match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) => {
                        // Renames show up as modify events for both ends.
                        if path.exists() {
                            VaultEvent::Changed(rel)
                        } else {
                            VaultEvent::Removed(rel)
                        }
                    }
                    EventKind::Remove(_) => VaultEvent::Removed(rel),
                    _ => continue,
                };
                let _ = tx.send(vault_event);
            }
        })
        .map_err(|e| NotemvError::Watch(e.to_string()))?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|e| NotemvError::Watch(e.to_string()))?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
        })
    }

    /// Wait for the next event. Returns `None` once the watcher is gone.
    pub async fn recv(&mut self) -> Option<VaultEvent> {
        self.receiver.recv().await
    }
}
