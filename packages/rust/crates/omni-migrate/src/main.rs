//! main.rs - Binary entry point for omni-migrate
//!
//! Usage:
//!   omni-migrate path/to/Tests            # migrate every .cs file in place
//!   omni-migrate path/to/Tests --dry-run --diff
//!   omni-migrate path/to/Tests --skip-dir bin --skip-dir obj
//!   omni-migrate                          # prompts for the directory

mod cli;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use omni_migrate::{AssertionMigrator, MigrateError, MigrateSettings};

use crate::cli::Cli;

fn prompt_directory() -> Result<PathBuf> {
    print!("Enter the directory containing C# files: ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read directory from stdin")?;
    Ok(PathBuf::from(line.trim()))
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG overrides; --verbose => debug; else warn
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "omni_migrate=debug"
        } else {
            "omni_migrate=warn"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let settings = match &cli.settings {
        Some(path) => MigrateSettings::load(path)?,
        None => MigrateSettings::load_default(Path::new(".")),
    };
    let rules = settings.rule_set().context("Invalid rule in settings")?;

    let mut config = settings.batch_config();
    if let Some(ext) = cli.ext {
        config.extension = ext;
    }
    config.skip_dirs.extend(cli.skip_dirs);
    if let Some(max_file_size) = cli.max_file_size {
        config.max_file_size = max_file_size;
    }
    config.dry_run = cli.dry_run;
    config.fail_fast |= cli.fail_fast;

    let root = match cli.dir {
        Some(dir) => dir,
        None => prompt_directory()?,
    };

    let show_diff = cli.diff;
    let outcome =
        AssertionMigrator::migrate_directory_with(&root, &rules, &config, |path, result| {
            println!("Migration completed for: {}", path.display());
            if show_diff && result.changed() {
                print!("{}", AssertionMigrator::format_result(result, Some(path)));
            }
        });

    let stats = match outcome {
        Ok(stats) => stats,
        Err(MigrateError::DirectoryNotFound(_)) => {
            println!("Directory not found!");
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => return Err(anyhow::Error::new(err).context("Migration aborted")),
    };

    println!(
        "{} files scanned, {} changed, {} replacements{}",
        stats.files_scanned,
        stats.files_changed,
        stats.replacements,
        if config.dry_run { " (dry run)" } else { "" }
    );

    if stats.errors.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    for (path, error) in &stats.errors {
        eprintln!("Failed: {}: {error}", path.display());
    }
    Ok(ExitCode::FAILURE)
}
