//! # notemv-vault
//!
//! The host side of notemv: the interfaces the sync engine calls, and
//! concrete implementations of them.
//!
//! The vault directory is the source of truth; nothing is cached between
//! operations, so every engine call sees the current file tree.
//!
//! - [`host`]: [`NoteStore`], [`Editor`], [`Workspace`], [`Notifier`]
//! - [`fs`]: [`FsVault`], a directory on disk
//! - [`memory`]: [`MemoryVault`], an in-memory tree with failure injection
//! - [`buffer`]: [`LineBuffer`] editor and [`OpenNote`] workspace
//! - [`watcher`]: [`VaultWatcher`], note change events from `notify`

pub mod buffer;
pub mod fs;
pub mod host;
pub mod memory;
pub mod watcher;

pub use buffer::{LineBuffer, OpenNote};
pub use fs::FsVault;
pub use host::{
    resolve_link_in, CollectingNotifier, Editor, NoteStore, Notifier, Position, TracingNotifier,
    Workspace,
};
pub use memory::MemoryVault;
pub use watcher::{VaultEvent, VaultWatcher};
