//! Error types for notemv.

use thiserror::Error;

/// Top-level result type for notemv operations.
pub type Result<T> = std::result::Result<T, NotemvError>;

/// Top-level error type for notemv.
///
/// Benign outcomes (an unrecognized verb, a first line that is not a
/// heading) are not errors; they surface as no-op decisions from the
/// engine instead.
#[derive(Debug, Error)]
pub enum NotemvError {
    /// An action needs an open document or file and there is none.
    #[error("No active {0}.")]
    NoActiveContext(&'static str),

    /// A command line failed its verb grammar.
    #[error("{0}")]
    InvalidSyntax(String),

    #[error("Failed to create folder: {path}: {source}")]
    FolderCreate {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot rename {from} to {to}: {source}")]
    Rename {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    #[error("moved, but failed to update title of {path}: {source}")]
    TitleRewrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("watch error: {0}")]
    Watch(String),
}

impl NotemvError {
    /// Build an [`NotemvError::InvalidSyntax`] for a malformed move command.
    pub fn invalid_move() -> Self {
        Self::InvalidSyntax("Invalid move command format.".to_string())
    }
}
