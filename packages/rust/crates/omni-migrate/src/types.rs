//! Core types for assertion migration.
//!
//! Defines the data structures used throughout the migration pipeline.

use serde::Serialize;

/// Result of running a rule set over one piece of source text.
///
/// Contains both the migrated content and metadata about the rules that fired.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationResult {
    /// Original content before migration.
    pub original: String,
    /// Content after every rule has been applied.
    pub modified: String,
    /// Total number of replacements made.
    pub count: usize,
    /// Unified diff showing changes.
    pub diff: String,
    /// Rules that matched, in application order.
    pub hits: Vec<RuleHit>,
}

impl MigrationResult {
    /// Whether any rule changed the text.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.original != self.modified
    }
}

/// Match count of a single rule within one migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleHit {
    /// Rule name (usually the fluent matcher it rewrites).
    pub rule: String,
    /// Number of replacements the rule made.
    pub count: usize,
}

/// Configuration for single-file migration.
///
/// Controls behavior like file size limits and preview mode.
#[derive(Debug, Clone)]
pub struct MigrateConfig {
    /// Maximum file size in bytes (default 1MB).
    pub max_file_size: u64,
    /// Whether to preview only (no actual file modification).
    pub preview_only: bool,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            max_file_size: 1024 * 1024, // 1MB
            preview_only: false,
        }
    }
}
