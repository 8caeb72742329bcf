//! In-memory vault.
//!
//! Holds files as strings keyed by vault path. Used by the engine's tests
//! and by embedders that keep notes somewhere other than a directory.
//! Individual operations can be told to fail, to exercise error paths.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::sync::{Mutex, MutexGuard};

use notemv_core::path::{is_within, normalize_path, parent_folder};

use crate::host::{resolve_link_in, NoteStore};

#[derive(Debug, Default)]
struct MemoryState {
    files: BTreeMap<String, String>,
    folders: BTreeSet<String>,
    fail_create_folder: bool,
    fail_rename: bool,
    fail_write: bool,
    renames: Vec<(String, String)>,
}

impl MemoryState {
    fn add_folder_chain(&mut self, folder: &str) {
        let mut current = folder.to_string();
        while !current.is_empty() {
            let parent = parent_folder(&current).to_string();
            self.folders.insert(current);
            current = parent;
        }
    }

    fn folder_exists(&self, folder: &str) -> bool {
        folder.is_empty()
            || self.folders.contains(folder)
            || self.files.keys().any(|f| is_within(f, folder))
    }
}

/// A [`NoteStore`] backed by in-memory maps.
#[derive(Debug, Default)]
pub struct MemoryVault {
    state: Mutex<MemoryState>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`MemoryVault::insert_file`].
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.insert_file(path, content);
        self
    }

    /// Create or overwrite a file, creating its folders.
    pub fn insert_file(&self, path: &str, content: &str) {
        let path = normalize_path(path);
        let mut state = self.state();
        state.add_folder_chain(parent_folder(&path));
        state.files.insert(path, content.to_string());
    }

    /// Content of `path`, if the file exists.
    pub fn contents(&self, path: &str) -> Option<String> {
        self.state().files.get(path).cloned()
    }

    /// All file paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.state().files.keys().cloned().collect()
    }

    /// Every successful rename so far, as `(from, to)`.
    pub fn renames(&self) -> Vec<(String, String)> {
        self.state().renames.clone()
    }

    pub fn fail_folder_creation(&self, fail: bool) {
        self.state().fail_create_folder = fail;
    }

    pub fn fail_renames(&self, fail: bool) {
        self.state().fail_rename = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state().fail_write = fail;
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn not_found(path: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{path} does not exist"))
}

impl NoteStore for MemoryVault {
    async fn folder_exists(&self, path: &str) -> io::Result<bool> {
        Ok(self.state().folder_exists(&normalize_path(path)))
    }

    async fn create_folder(&self, path: &str) -> io::Result<()> {
        let mut state = self.state();
        if state.fail_create_folder {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "folder creation disabled",
            ));
        }
        state.add_folder_chain(&normalize_path(path));
        Ok(())
    }

    async fn file_exists(&self, path: &str) -> io::Result<bool> {
        Ok(self.state().files.contains_key(&normalize_path(path)))
    }

    async fn resolve_link(&self, link: &str) -> io::Result<Option<String>> {
        Ok(resolve_link_in(self.state().files.keys(), link))
    }

    async fn rename_file(&self, from: &str, to: &str) -> io::Result<()> {
        let (from, to) = (normalize_path(from), normalize_path(to));
        let mut state = self.state();
        if state.fail_rename {
            return Err(io::Error::other("rename disabled"));
        }
        if !state.files.contains_key(&from) {
            return Err(not_found(&from));
        }
        if from == to {
            return Ok(());
        }
        if state.files.contains_key(&to) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "Destination file already exists!",
            ));
        }
        if !state.folder_exists(parent_folder(&to)) {
            return Err(not_found(parent_folder(&to)));
        }
        let content = state.files.remove(&from).unwrap_or_default();
        state.files.insert(to.clone(), content);
        state.renames.push((from, to));
        Ok(())
    }

    async fn read_file(&self, path: &str) -> io::Result<String> {
        let path = normalize_path(path);
        self.state()
            .files
            .get(&path)
            .cloned()
            .ok_or_else(|| not_found(&path))
    }

    async fn write_file(&self, path: &str, content: &str) -> io::Result<()> {
        let path = normalize_path(path);
        let mut state = self.state();
        if state.fail_write {
            return Err(io::Error::other("write disabled"));
        }
        if !state.folder_exists(parent_folder(&path)) {
            return Err(not_found(parent_folder(&path)));
        }
        state.files.insert(path, content.to_string());
        Ok(())
    }

    async fn list_all_files(&self) -> io::Result<Vec<String>> {
        Ok(self.paths())
    }
}
