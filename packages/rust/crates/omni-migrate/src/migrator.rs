//! Single-file assertion migration.
//!
//! Runs a [`RuleSet`] over source text or over a file on disk.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::MigrateError;
use crate::rules::RuleSet;
use crate::source::read_source;
use crate::types::{MigrateConfig, MigrationResult};

/// AssertionMigrator - Fluent Assertions to xUnit rewriting engine.
///
/// # Example
///
/// ```rust,ignore
/// use omni_migrate::AssertionMigrator;
///
/// let result = AssertionMigrator::migrate("list.Should().Contain(x);");
/// assert_eq!(result.modified, "Assert.Contains(x, list);");
/// ```
pub struct AssertionMigrator;

impl AssertionMigrator {
    /// Migrate source text with the built-in rules.
    #[must_use]
    pub fn migrate(content: &str) -> MigrationResult {
        RuleSet::builtin().apply(content)
    }

    /// Migrate source text with a custom rule set.
    #[must_use]
    pub fn migrate_with(content: &str, rules: &RuleSet) -> MigrationResult {
        rules.apply(content)
    }

    /// Migrate a file on disk.
    ///
    /// The file is written back only when `config.preview_only` is false and
    /// at least one rule changed the content, so untouched files keep their
    /// bytes and modification time.
    ///
    /// # Errors
    /// Read errors from [`read_source`] and write errors as `MigrateError::Io`.
    pub fn migrate_file<P: AsRef<Path>>(
        path: P,
        rules: &RuleSet,
        config: &MigrateConfig,
    ) -> Result<MigrationResult, MigrateError> {
        let path = path.as_ref();
        let content = read_source(path, config.max_file_size)?;
        let result = rules.apply_labelled(&content, &path.display().to_string());

        if !config.preview_only && result.changed() {
            fs::write(path, &result.modified)?;
            info!(
                path = %path.display(),
                replacements = result.count,
                "migrated file"
            );
        }

        Ok(result)
    }

    /// Preview migration of a file with the built-in rules (no file modification).
    ///
    /// # Errors
    /// See [`AssertionMigrator::migrate_file`].
    pub fn preview<P: AsRef<Path>>(path: P) -> Result<MigrationResult, MigrateError> {
        Self::migrate_file(
            path,
            RuleSet::builtin(),
            &MigrateConfig {
                preview_only: true,
                ..Default::default()
            },
        )
    }

    /// Migrate a file in place with the built-in rules.
    ///
    /// # Errors
    /// See [`AssertionMigrator::migrate_file`].
    pub fn apply<P: AsRef<Path>>(path: P) -> Result<MigrationResult, MigrateError> {
        Self::migrate_file(path, RuleSet::builtin(), &MigrateConfig::default())
    }

    /// Format a migration result for display.
    #[must_use]
    pub fn format_result(result: &MigrationResult, path: Option<&Path>) -> String {
        let mut output = String::new();

        if let Some(p) = path {
            let _ = writeln!(output, "// MIGRATE: {}", p.display());
        }
        let _ = writeln!(output, "// Replacements: {}", result.count);

        if result.count == 0 {
            output.push_str("[No fluent assertions matched]\n");
            return output;
        }

        output.push_str("\n// Rules:\n");
        for hit in &result.hits {
            let _ = writeln!(output, "{} x{}", hit.rule, hit.count);
        }

        output.push_str("\n// Diff:\n");
        output.push_str(&result.diff);

        output
    }
}
