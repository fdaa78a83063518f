//! YAML settings for directory migration.
//!
//! Every field is optional; missing fields fall back to [`BatchConfig`]
//! defaults. Extra rules run after the built-in catalogue.

use std::path::Path;

use serde::Deserialize;

use crate::batch::BatchConfig;
use crate::error::MigrateError;
use crate::rules::{Rule, RuleSet};

/// Settings file looked up in the working directory when none is given.
pub const DEFAULT_SETTINGS_FILE: &str = ".omni-migrate.yaml";

/// Settings loaded from YAML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MigrateSettings {
    /// File extension to migrate, without the dot.
    pub extension: Option<String>,
    /// Directory names to skip.
    pub skip_dirs: Option<Vec<String>>,
    /// Maximum file size in bytes.
    pub max_file_size: Option<u64>,
    /// Abort on the first per-file error.
    pub fail_fast: Option<bool>,
    /// Extra rewrite rules.
    pub rules: Vec<RuleSpec>,
}

/// A user-defined rule as written in the settings file.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSpec {
    /// Rule name.
    pub name: String,
    /// Regex pattern.
    pub pattern: String,
    /// Replacement template (`$1`, `${1}`, `${name}`).
    pub replacement: String,
}

impl RuleSpec {
    /// Compile into a [`Rule`].
    ///
    /// # Errors
    /// See [`Rule::new`].
    pub fn compile(&self) -> Result<Rule, MigrateError> {
        Rule::new(self.name.as_str(), &self.pattern, self.replacement.as_str())
    }
}

impl MigrateSettings {
    /// Parse settings from YAML text.
    ///
    /// # Errors
    /// `MigrateError::Settings` when the YAML is malformed.
    pub fn from_yaml(raw: &str) -> Result<Self, MigrateError> {
        serde_yaml::from_str(raw).map_err(|err| MigrateError::Settings(err.to_string()))
    }

    /// Load an explicitly requested settings file.
    ///
    /// # Errors
    /// `MigrateError::Settings` when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, MigrateError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|err| MigrateError::Settings(format!("{}: {err}", path.display())))?;
        Self::from_yaml(&raw)
            .map_err(|err| MigrateError::Settings(format!("{}: {err}", path.display())))
    }

    /// Load `.omni-migrate.yaml` from `dir` if present.
    ///
    /// A missing file yields defaults; an unreadable or malformed one is
    /// logged and ignored.
    #[must_use]
    pub fn load_default(dir: &Path) -> Self {
        let path = dir.join(DEFAULT_SETTINGS_FILE);
        if !path.exists() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(settings) => settings,
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %error,
                    "failed to load settings file; ignoring"
                );
                Self::default()
            }
        }
    }

    /// Batch configuration with these settings applied over the defaults.
    #[must_use]
    pub fn batch_config(&self) -> BatchConfig {
        let defaults = BatchConfig::default();
        BatchConfig {
            extension: self.extension.clone().unwrap_or(defaults.extension),
            dry_run: defaults.dry_run,
            max_file_size: self.max_file_size.unwrap_or(defaults.max_file_size),
            skip_dirs: self.skip_dirs.clone().unwrap_or(defaults.skip_dirs),
            fail_fast: self.fail_fast.unwrap_or(defaults.fail_fast),
        }
    }

    /// Built-in rules followed by the compiled extra rules.
    ///
    /// # Errors
    /// The first extra rule that fails to compile.
    pub fn rule_set(&self) -> Result<RuleSet, MigrateError> {
        let extra = self
            .rules
            .iter()
            .map(RuleSpec::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RuleSet::with_rules(extra))
    }
}
