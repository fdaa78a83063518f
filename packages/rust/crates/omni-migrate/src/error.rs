//! Error types for assertion migration.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use thiserror::Error;

/// Error types for migrate operations.
///
/// Each variant represents a specific failure mode in the migration pipeline.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Root directory handed to the walker does not exist.
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    /// Source file does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// Source file exceeds size limit.
    #[error("File too large: {0} bytes (limit: {1})")]
    TooLarge(u64, u64),

    /// Source file contains binary content (NULL bytes detected).
    #[error("Binary file detected: {0}")]
    BinaryFile(String),

    /// Source file is not valid UTF-8.
    #[error("UTF-8 decoding error: {0}")]
    Encoding(String),

    /// Low-level I/O error from std::io.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Invalid rule regex.
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// Replacement template and pattern capture groups disagree.
    #[error("Rule '{rule}' has an invalid replacement template: {detail}")]
    Template {
        /// Rule name.
        rule: String,
        /// What is wrong with the template.
        detail: String,
    },

    /// Settings file could not be read or parsed.
    #[error("Settings error: {0}")]
    Settings(String),
}
