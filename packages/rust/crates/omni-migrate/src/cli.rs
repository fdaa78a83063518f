use std::path::PathBuf;

use clap::Parser;

/// Migrate Fluent Assertions to xUnit asserts in place.
#[derive(Parser, Debug)]
#[command(name = "omni-migrate")]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Directory containing C# files (prompted for when omitted)
    pub(crate) dir: Option<PathBuf>,

    /// File extension to migrate, e.g. cs or .cs (default: cs)
    #[arg(long)]
    pub(crate) ext: Option<String>,

    /// Skip directories with this name (repeatable)
    #[arg(long = "skip-dir", value_name = "NAME")]
    pub(crate) skip_dirs: Vec<String>,

    /// Migrate in memory only; leave files untouched
    #[arg(long)]
    pub(crate) dry_run: bool,

    /// Print a diff for every changed file
    #[arg(long)]
    pub(crate) diff: bool,

    /// Stop at the first file that cannot be migrated
    #[arg(long)]
    pub(crate) fail_fast: bool,

    /// Settings file (default: ./.omni-migrate.yaml when present)
    #[arg(long)]
    pub(crate) settings: Option<PathBuf>,

    /// Skip files larger than this many bytes (default: 1048576)
    #[arg(long)]
    pub(crate) max_file_size: Option<u64>,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    pub(crate) verbose: bool,
}
