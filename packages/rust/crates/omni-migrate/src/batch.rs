//! Directory migration - walk a tree and migrate every matching source file.
//!
//! Files are visited one at a time in file-name order, so repeated runs over
//! the same tree touch files in the same sequence.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::AssertionMigrator;
use crate::error::MigrateError;
use crate::rules::RuleSet;
use crate::types::{MigrateConfig, MigrationResult};

/// Statistics for a directory migration.
#[derive(Debug, Default)]
pub struct BatchMigrationStats {
    /// Number of files with the designated extension that were processed
    pub files_scanned: usize,
    /// Number of files whose content changed
    pub files_changed: usize,
    /// Total number of replacements made
    pub replacements: usize,
    /// Changed files, in visit order
    pub modified_files: Vec<PathBuf>,
    /// Files that could not be migrated (path, error message)
    pub errors: Vec<(PathBuf, String)>,
}

/// Configuration for directory migration.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// File extension to migrate (e.g., "cs"; a leading dot is ignored)
    pub extension: String,
    /// Migrate in memory only, never write files
    pub dry_run: bool,
    /// Maximum file size in bytes (default 1MB)
    pub max_file_size: u64,
    /// Skip directories with these names (none by default)
    pub skip_dirs: Vec<String>,
    /// Abort the walk on the first per-file error instead of recording it
    pub fail_fast: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            extension: "cs".to_string(),
            dry_run: false,
            max_file_size: 1_048_576,
            skip_dirs: Vec::new(),
            fail_fast: false,
        }
    }
}

impl BatchConfig {
    fn file_config(&self) -> MigrateConfig {
        MigrateConfig {
            max_file_size: self.max_file_size,
            preview_only: self.dry_run,
        }
    }

    fn is_skipped(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .skip_dirs
                .iter()
                .any(|skip| entry.file_name().to_string_lossy() == skip.as_str())
    }

    fn matches_extension(&self, path: &Path) -> bool {
        let extension = self.extension.trim_start_matches('.');
        path.file_name()
            .map(|name| name.to_string_lossy())
            .is_some_and(|name| {
                name.strip_suffix(extension)
                    .is_some_and(|stem| stem.ends_with('.'))
            })
    }
}

impl AssertionMigrator {
    /// Migrate every matching file under `root`.
    ///
    /// # Errors
    /// - `DirectoryNotFound` when `root` is not an existing directory; no file
    ///   is touched.
    /// - With `config.fail_fast`, the first per-file error. Files visited
    ///   before it stay migrated.
    pub fn migrate_directory(
        root: &Path,
        rules: &RuleSet,
        config: &BatchConfig,
    ) -> Result<BatchMigrationStats, MigrateError> {
        Self::migrate_directory_with(root, rules, config, |_, _| {})
    }

    /// Like [`AssertionMigrator::migrate_directory`], calling `on_file` after
    /// each processed file.
    ///
    /// # Errors
    /// See [`AssertionMigrator::migrate_directory`].
    pub fn migrate_directory_with<F>(
        root: &Path,
        rules: &RuleSet,
        config: &BatchConfig,
        mut on_file: F,
    ) -> Result<BatchMigrationStats, MigrateError>
    where
        F: FnMut(&Path, &MigrationResult),
    {
        if !root.is_dir() {
            return Err(MigrateError::DirectoryNotFound(root.display().to_string()));
        }

        let file_config = config.file_config();
        let mut stats = BatchMigrationStats::default();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !config.is_skipped(entry));

        for entry in walker {
            let path = match entry {
                Ok(entry) => entry.into_path(),
                Err(err) => {
                    let path = err.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                    record_failure(&mut stats, config, path, err.into())?;
                    continue;
                }
            };
            if !path.is_file() || !config.matches_extension(&path) {
                continue;
            }

            stats.files_scanned += 1;
            match Self::migrate_file(&path, rules, &file_config) {
                Ok(result) => {
                    if result.changed() {
                        stats.files_changed += 1;
                        stats.replacements += result.count;
                        stats.modified_files.push(path.clone());
                    }
                    on_file(&path, &result);
                }
                Err(err) => record_failure(&mut stats, config, path, err)?,
            }
        }

        info!(
            root = %root.display(),
            scanned = stats.files_scanned,
            changed = stats.files_changed,
            replacements = stats.replacements,
            errors = stats.errors.len(),
            "directory migration finished"
        );

        Ok(stats)
    }
}

fn record_failure(
    stats: &mut BatchMigrationStats,
    config: &BatchConfig,
    path: PathBuf,
    err: MigrateError,
) -> Result<(), MigrateError> {
    if config.fail_fast {
        return Err(err);
    }
    warn!(path = %path.display(), error = %err, "skipping file");
    stats.errors.push((path, err.to_string()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_matches_extension() {
        let config = BatchConfig::default();
        assert!(config.matches_extension(Path::new("Tests.cs")));
        assert!(config.matches_extension(Path::new("deep/nested/Tests.cs")));
        assert!(config.matches_extension(Path::new(".cs")));
        assert!(!config.matches_extension(Path::new("Tests.CS")));
        assert!(!config.matches_extension(Path::new("Tests.csproj")));
        assert!(!config.matches_extension(Path::new("notcs")));
    }

    #[test]
    fn test_extension_leading_dot_ignored() {
        let config = BatchConfig {
            extension: ".cs".to_string(),
            ..Default::default()
        };
        assert!(config.matches_extension(Path::new("A.cs")));
        assert!(!config.matches_extension(Path::new("A.csx")));
    }

    #[test]
    fn test_skip_dirs() {
        let dir = TempDir::new().expect("Create temp dir");
        let obj = dir.path().join("obj");
        std::fs::create_dir(&obj).expect("Create obj");
        std::fs::write(obj.join("Gen.cs"), "x.Should().BeTrue();").expect("Write Gen.cs");
        std::fs::write(dir.path().join("A.cs"), "y.Should().BeTrue();").expect("Write A.cs");

        let config = BatchConfig {
            skip_dirs: vec!["obj".to_string()],
            ..Default::default()
        };
        let stats = AssertionMigrator::migrate_directory(dir.path(), RuleSet::builtin(), &config)
            .expect("Should migrate");

        assert_eq!(stats.files_scanned, 1);
        let generated = std::fs::read_to_string(obj.join("Gen.cs")).expect("Read Gen.cs");
        assert_eq!(generated, "x.Should().BeTrue();");
    }

    #[test]
    fn test_root_named_like_skip_dir_is_walked() {
        let dir = TempDir::new().expect("Create temp dir");
        let root = dir.path().join("bin");
        std::fs::create_dir(&root).expect("Create root");
        std::fs::write(root.join("A.cs"), "y.Should().BeTrue();").expect("Write A.cs");

        let config = BatchConfig {
            skip_dirs: vec!["bin".to_string()],
            ..Default::default()
        };
        let stats = AssertionMigrator::migrate_directory(&root, RuleSet::builtin(), &config)
            .expect("Should migrate");

        assert_eq!(stats.files_changed, 1);
    }

    #[test]
    fn test_visit_order_is_sorted() {
        let dir = TempDir::new().expect("Create temp dir");
        for name in ["c.cs", "a.cs", "b.cs"] {
            std::fs::write(dir.path().join(name), "v.Should().BeNull();").expect("Write file");
        }

        let mut seen = Vec::new();
        AssertionMigrator::migrate_directory_with(
            dir.path(),
            RuleSet::builtin(),
            &BatchConfig::default(),
            |path, _| seen.push(path.file_name().map(|n| n.to_string_lossy().into_owned())),
        )
        .expect("Should migrate");

        let seen: Vec<_> = seen.into_iter().flatten().collect();
        assert_eq!(seen, ["a.cs", "b.cs", "c.cs"]);
    }
}
