#![allow(clippy::doc_markdown)]

//! omni-migrate - Fluent Assertions to xUnit migration for Omni DevEnv
//!
//! Rewrites `subject.Should().Matcher(args);` assertions in C# test sources
//! into xUnit `Assert.*` calls with an ordered chain of regex rewrite rules.
//! Text in, text out: there is no C# parser, and matchers the rules do not
//! know are left exactly as they were.
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! omni-migrate/src/
//! ├── lib.rs       # Re-exports (this file)
//! ├── error.rs     # MigrateError enum (thiserror)
//! ├── types.rs     # MigrationResult, RuleHit, MigrateConfig
//! ├── rules.rs     # Rule, RuleSet, built-in catalogue
//! ├── migrator.rs  # AssertionMigrator (text and single file)
//! ├── batch.rs     # Directory walk (walkdir)
//! ├── source.rs    # Safe source reading
//! ├── diff.rs      # Diff generation utilities
//! └── settings.rs  # YAML settings (serde_yaml)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use omni_migrate::{AssertionMigrator, BatchConfig, RuleSet};
//!
//! let result = AssertionMigrator::migrate("result.Should().BeTrue();");
//! assert_eq!(result.modified, "Assert.True(result);");
//!
//! let stats = AssertionMigrator::migrate_directory(
//!     Path::new("tests/Api.Tests"),
//!     RuleSet::builtin(),
//!     &BatchConfig::default(),
//! )?;
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

mod batch;
pub mod diff;
mod error;
mod migrator;
mod rules;
mod settings;
mod source;
mod types;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use batch::{BatchConfig, BatchMigrationStats};
pub use error::MigrateError;
pub use migrator::AssertionMigrator;
pub use rules::{Rule, RuleSet};
pub use settings::{DEFAULT_SETTINGS_FILE, MigrateSettings, RuleSpec};
pub use source::{is_binary, read_source};
pub use types::{MigrateConfig, MigrationResult, RuleHit};

// Re-export diff utility for external use
pub use diff::generate_unified_diff;
