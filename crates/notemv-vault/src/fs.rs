//! Directory-backed vault.
//!
//! The vault directory is the source of truth; every call goes straight
//! to the filesystem through `tokio::fs`. Entries whose name starts with
//! `.` (`.notemv`, `.git`, `.obsidian`) are invisible to the vault.

use std::io;
use std::path::{Component, Path, PathBuf};

use notemv_core::path::{file_name, normalize_path, parent_folder};

use crate::host::{resolve_link_in, NoteStore};

/// A [`NoteStore`] over a directory on disk.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    /// Open the vault rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` does not exist or is not a directory.
    pub fn open(root: &Path) -> io::Result<Self> {
        let meta = std::fs::metadata(root)?;
        if !meta.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            ));
        }
        Ok(Self {
            root: root.canonicalize()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a vault path. `..` segments are resolved by
    /// [`normalize_path`], so the result always lies under the root.
    pub fn absolute(&self, path: &str) -> PathBuf {
        let normalized = normalize_path(path);
        if normalized.is_empty() {
            self.root.clone()
        } else {
            self.root.join(normalized)
        }
    }

    /// Vault path of an absolute location, or `None` if it lies outside
    /// the vault or inside a hidden entry.
    pub fn relative(&self, absolute: &Path) -> Option<String> {
        let rel = absolute.strip_prefix(&self.root).ok()?;
        let mut segments = Vec::new();
        for component in rel.components() {
            match component {
                Component::Normal(name) => {
                    let name = name.to_str()?;
                    if name.starts_with('.') {
                        return None;
                    }
                    segments.push(name);
                }
                _ => return None,
            }
        }
        if segments.is_empty() {
            None
        } else {
            Some(segments.join("/"))
        }
    }

    async fn walk(&self) -> io::Result<Vec<String>> {
        let mut files = Vec::new();
        let mut pending = vec![self.root.clone()];
        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                if entry.file_name().to_string_lossy().starts_with('.') {
                    continue;
                }
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() {
                    if let Some(rel) = self.relative(&entry.path()) {
                        files.push(rel);
                    }
                }
            }
        }
        files.sort();
        Ok(files)
    }
}

impl FsVault {
    /// Whether the parent folder holds an entry whose name is byte-equal
    /// to the last segment of `path`.
    async fn entry_named_exactly(&self, path: &str) -> io::Result<bool> {
        let wanted = file_name(path);
        let mut entries = match tokio::fs::read_dir(self.absolute(parent_folder(path))).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_name().to_str() == Some(wanted) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl NoteStore for FsVault {
    async fn folder_exists(&self, path: &str) -> io::Result<bool> {
        match tokio::fs::metadata(self.absolute(path)).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_folder(&self, path: &str) -> io::Result<()> {
        tokio::fs::create_dir_all(self.absolute(path)).await
    }

    async fn file_exists(&self, path: &str) -> io::Result<bool> {
        match tokio::fs::metadata(self.absolute(path)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn resolve_link(&self, link: &str) -> io::Result<Option<String>> {
        let files = self.walk().await?;
        Ok(resolve_link_in(&files, link))
    }

    async fn rename_file(&self, from: &str, to: &str) -> io::Result<()> {
        let (from, to) = (normalize_path(from), normalize_path(to));
        if from == to {
            return Ok(());
        }
        // On a case-insensitive filesystem a case-only rename finds its own
        // source at `to`; only an entry spelled exactly `to` is a conflict.
        let occupied = if from.eq_ignore_ascii_case(&to) {
            self.entry_named_exactly(&to).await?
        } else {
            self.file_exists(&to).await?
        };
        if occupied {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "Destination file already exists!",
            ));
        }
        if !self.folder_exists(parent_folder(&to)).await? {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("folder {} does not exist", parent_folder(&to)),
            ));
        }
        tracing::debug!(%from, %to, "renaming");
        tokio::fs::rename(self.absolute(&from), self.absolute(&to)).await
    }

    async fn read_file(&self, path: &str) -> io::Result<String> {
        tokio::fs::read_to_string(self.absolute(path)).await
    }

    async fn write_file(&self, path: &str, content: &str) -> io::Result<()> {
        tokio::fs::write(self.absolute(path), content).await
    }

    async fn list_all_files(&self) -> io::Result<Vec<String>> {
        self.walk().await
    }
}
