//! Parsed command line types.
//!
//! A command line is produced fresh from the editor line on every
//! invocation and never persisted.

use serde::{Deserialize, Serialize};

/// A command line split into its verb and raw argument text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLine {
    /// Lower-cased first token; empty for a blank line.
    pub verb: String,
    /// Everything after the whitespace following the verb.
    pub raw_args: String,
}

impl CommandLine {
    /// The recognized action for this line's verb.
    pub fn action(&self) -> Verb {
        match self.verb.as_str() {
            "move" => Verb::Move,
            "title" => Verb::Title,
            _ => Verb::Unknown,
        }
    }
}

/// Actions a command line can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    /// `move [[destination|alias]]`
    Move,
    /// `title ...` (accepted but not implemented)
    Title,
    /// Anything else, including a blank line.
    Unknown,
}

/// Destination of a `move` command, parsed from a wiki link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationSpec {
    /// Link target, trimmed (e.g. `Projects/Alpha`).
    pub link_target: String,
    /// Display alias after `|`; never used for path resolution.
    pub alias: Option<String>,
}
