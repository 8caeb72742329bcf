//! # notemv-core
//!
//! Core types shared by every notemv crate:
//! - [`sanitize`]: file-name sanitizing and note-name helpers
//! - [`path`]: vault-relative path normalization
//! - [`heading`]: first-line heading reading and writing
//! - [`Config`]: per-vault settings
//! - Error hierarchy ([`NotemvError`])

pub mod config;
pub mod error;
pub mod heading;
pub mod path;
pub mod sanitize;

pub use config::{CollisionCheck, Config, MigrationConfig};
pub use error::{NotemvError, Result};
pub use sanitize::{base_name, sanitize_file_name, NOTE_EXTENSION};
