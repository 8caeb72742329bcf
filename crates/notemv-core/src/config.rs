//! Vault configuration.
//!
//! Optional settings live in `.notemv/config.yaml` inside the vault. Every
//! field has a default, so a missing file and an empty file both load as
//! [`Config::default`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::NotemvError;

/// Directory inside the vault holding notemv state.
pub const CONFIG_DIR: &str = ".notemv";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yaml";

/// How a move decides that its destination is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionCheck {
    /// Resolve the destination like a note link (base name across folders).
    #[default]
    LinkResolution,
    /// Only a file at the literal destination path counts.
    LiteralPath,
}

/// Source and target of the fixed two-folder migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationConfig {
    #[serde(default = "default_migration_from")]
    pub from: String,
    #[serde(default = "default_migration_to")]
    pub to: String,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            from: default_migration_from(),
            to: default_migration_to(),
        }
    }
}

fn default_migration_from() -> String {
    "Inbox".to_string()
}

fn default_migration_to() -> String {
    "Archive".to_string()
}

/// notemv settings for one vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Window coalescing raw edit events, in milliseconds.
    #[serde(default = "default_edit_debounce_ms")]
    pub edit_debounce_ms: u64,
    /// Window coalescing induced rename calls, in milliseconds.
    #[serde(default = "default_rename_debounce_ms")]
    pub rename_debounce_ms: u64,
    #[serde(default)]
    pub collision: CollisionCheck,
    #[serde(default)]
    pub migration: MigrationConfig,
}

fn default_edit_debounce_ms() -> u64 {
    500
}

fn default_rename_debounce_ms() -> u64 {
    200
}

impl Default for Config {
    fn default() -> Self {
        Self {
            edit_debounce_ms: default_edit_debounce_ms(),
            rename_debounce_ms: default_rename_debounce_ms(),
            collision: CollisionCheck::default(),
            migration: MigrationConfig::default(),
        }
    }
}

impl Config {
    /// Load the config for the vault at `vault_root`.
    ///
    /// # Errors
    ///
    /// Returns [`NotemvError::Config`] if the file exists but is not valid
    /// YAML for this schema, and [`NotemvError::Io`] if it cannot be read.
    pub fn load(vault_root: &Path) -> Result<Self, NotemvError> {
        let path = vault_root.join(CONFIG_DIR).join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)?;
        Self::from_yaml(&raw)
    }

    /// Parse a config from YAML text. Blank input yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`NotemvError::Config`] on malformed YAML.
    pub fn from_yaml(raw: &str) -> Result<Self, NotemvError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).map_err(|e| NotemvError::Config(e.to_string()))
    }

    pub fn edit_window(&self) -> Duration {
        Duration::from_millis(self.edit_debounce_ms)
    }

    pub fn rename_window(&self) -> Duration {
        Duration::from_millis(self.rename_debounce_ms)
    }
}
