//! Format command implementation.
//!
//! The format command:
//! 1. Validates the requested batch directories
//! 2. Runs the per-batch pipeline over each one
//! 3. Removes the whole output tree of any batch that failed
//! 4. Writes the optional run report
//! 5. Prints a summary of failed batches

use crate::output::{write_report, RunReport};
use crate::pipeline::{process_batch, BatchSummary};
use crate::utils::config::FormatOptions;
use anyhow::{Context, Result};
use log::{error, info, warn};
use std::fs;
use std::path::PathBuf;

/// Arguments for the format command
#[derive(Debug, Clone)]
pub struct FormatArgs {
    /// Batch directories to process
    pub directories: Vec<PathBuf>,

    /// Pipeline options (tool prefix, dedup policy)
    pub options: FormatOptions,

    /// Optional path for the JSON run report
    pub report: Option<PathBuf>,
}

/// What a whole formatting run produced
#[derive(Debug)]
pub struct FormatOutcome {
    /// Summaries of the batches that completed
    pub summaries: Vec<BatchSummary>,

    /// Batch directories that failed and were removed
    pub failed: Vec<String>,
}

/// Validate format arguments before running anything
pub fn validate_args(args: &FormatArgs) -> Result<()> {
    if args.directories.is_empty() {
        anyhow::bail!("At least one batch directory is required");
    }

    if args.options.tool_prefix.is_empty() {
        anyhow::bail!("Tool prefix cannot be empty");
    }

    for dir in &args.directories {
        if !dir.is_dir() {
            anyhow::bail!("Not a directory: {}", dir.display());
        }
    }

    Ok(())
}

/// Execute the format command.
///
/// A failing batch does not stop the run: its entire directory tree is
/// removed so no partial output survives, its path is recorded, and the
/// remaining batches are still processed. Returns the outcome; the caller
/// decides the exit status from `outcome.failed`.
pub fn execute_format(args: FormatArgs) -> Result<FormatOutcome> {
    let mut summaries = Vec::new();
    let mut failed = Vec::new();

    for dir in &args.directories {
        match process_batch(dir, &args.options) {
            Ok(summary) => {
                info!(
                    "✓ {}: {} traces, {} operand columns",
                    summary.path.display(),
                    summary.traces,
                    summary.operand_width
                );
                summaries.push(summary);
            }
            Err(e) => {
                error!("Batch {} failed: {}", dir.display(), e);
                warn!("Removing {}", dir.display());
                fs::remove_dir_all(dir)
                    .with_context(|| format!("Failed to remove batch {}", dir.display()))?;
                failed.push(dir.display().to_string());
            }
        }
    }

    if let Some(report_path) = &args.report {
        let report = RunReport::new(&summaries, &failed);
        write_report(&report, report_path).context("Failed to write run report")?;
        info!("✓ Run report written to: {}", report_path.display());
    }

    if !failed.is_empty() {
        println!("There were problems with the following folders:");
        for path in &failed {
            println!("{}", path);
        }
    }

    Ok(FormatOutcome { summaries, failed })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with_dirs(dirs: Vec<PathBuf>) -> FormatArgs {
        FormatArgs {
            directories: dirs,
            options: FormatOptions::default(),
            report: None,
        }
    }

    #[test]
    fn test_validate_args_no_directories() {
        assert!(validate_args(&args_with_dirs(vec![])).is_err());
    }

    #[test]
    fn test_validate_args_missing_directory() {
        let args = args_with_dirs(vec![PathBuf::from("/definitely/not/here")]);
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_valid() {
        let dir = tempfile::tempdir().unwrap();
        let args = args_with_dirs(vec![dir.path().to_path_buf()]);
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_empty_tool_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args_with_dirs(vec![dir.path().to_path_buf()]);
        args.options.tool_prefix = String::new();
        assert!(validate_args(&args).is_err());
    }
}
