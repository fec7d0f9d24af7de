//! JSON run-report writer.
//!
//! Writes a versioned summary of one formatting run: which batches were
//! processed, which failed and were removed. Schema is versioned to allow
//! future evolution.

use crate::pipeline::BatchSummary;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Top-level run report written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// One entry per successfully formatted batch
    pub batches: Vec<BatchReport>,

    /// Batch directories that failed and were removed
    pub failed: Vec<String>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// Summary of one formatted batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// The batch directory
    pub path: String,

    /// Number of trace files in the batch
    pub traces: usize,

    /// Inferred number of generated operand columns
    pub operand_width: usize,
}

impl RunReport {
    /// Assemble a report from the run's outcomes
    pub fn new(summaries: &[BatchSummary], failed: &[String]) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            batches: summaries
                .iter()
                .map(|s| BatchReport {
                    path: s.path.display().to_string(),
                    traces: s.traces,
                    operand_width: s.operand_width,
                })
                .collect(),
            failed: failed.to_vec(),
            generated_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Write a run report to a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report(report: &RunReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing run report to: {}", output_path.display());

    validate_output_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    Ok(())
}

/// Read a run report back from a JSON file (validation, testing)
pub fn read_report(input_path: impl AsRef<Path>) -> Result<RunReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading run report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let report: RunReport = serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    Ok(report)
}

/// Validate that output path is writable
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
