//! # Menu Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring or showing a menu.
#[derive(Error, Debug)]
pub enum MenuError {
    /// The popup was positioned without a stored anchor.
    #[error("Menu has no anchor rectangle; call one of the popup_at_* functions first")]
    MissingAnchor,

    /// Configuration file could not be read.
    #[error("Failed to read menu config {path:?}: {source}")]
    ConfigRead {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML or has wrongly typed keys.
    #[error("Failed to parse menu config {path:?}: {details}")]
    ConfigParse {
        /// The path of the file that failed to parse.
        path: PathBuf,
        /// Details about the parse error.
        details: String,
    },

    /// The XDG base directories could not be resolved.
    #[error("Failed to resolve XDG directories: {0}")]
    Xdg(String),
}

/// Result alias used throughout traymenu.
pub type Result<T> = std::result::Result<T, MenuError>;
