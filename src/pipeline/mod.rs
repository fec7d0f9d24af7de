//! Per-batch pipeline.
//!
//! Drives one batch directory through the two-phase pipeline:
//! 1. Heal every trace file in place and infer the batch-wide operand width.
//! 2. Split each trace (dedup + metadata), write its padded table against
//!    the shared header, and fold its metadata into the batch aggregates.
//!
//! Phase 2 never starts before phase 1 has seen every file; the shared
//! header is the only value crossing the barrier. On any error the batch is
//! abandoned mid-flight — the caller owns cleanup of the output tree.

use crate::classifier::Classifier;
use crate::merger::{build_logical_mapping, distribute, BatchAccumulator};
use crate::schema::Header;
use crate::splitter::{split_lines, write_streams};
use crate::table::write_table;
use crate::utils::config::{FormatOptions, BATCH_DIR_NAME, TEMP_SUFFIX, TRACE_SUFFIX};
use crate::utils::error::PipelineError;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// What one successfully processed batch looked like
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// The batch directory
    pub path: PathBuf,
    /// Number of trace files processed
    pub traces: usize,
    /// Inferred number of generated operand columns
    pub operand_width: usize,
}

/// Enumerate candidate trace filenames in a batch directory:
/// regular files whose name contains `trace` and does not end in the
/// temporary-file suffix. Sorted so the discovery order (and with it the
/// logical-mapping index) is deterministic.
pub fn discover_traces(dir: &Path) -> Result<Vec<String>, PipelineError> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.contains("trace") && !name.ends_with(TEMP_SUFFIX) {
            files.push(name);
        }
    }

    files.sort();
    Ok(files)
}

/// Output directory name for one trace file: tool prefix and suffix dropped
pub fn derived_name(filename: &str, tool_prefix: &str) -> String {
    filename.replace(tool_prefix, "").replace(TRACE_SUFFIX, "")
}

/// Table filename inside the output directory: only the suffix dropped
pub fn table_name(filename: &str) -> String {
    filename.replace(TRACE_SUFFIX, "")
}

/// Process one batch directory end to end.
///
/// Expects the directory to exist and be writable; creates the per-trace
/// output directories and the batch-level directory itself. Returns a
/// summary on success. On error the output tree is left as-is for the
/// caller to remove — the pipeline never deletes anything.
pub fn process_batch(dir: &Path, options: &FormatOptions) -> Result<BatchSummary, PipelineError> {
    let start = Instant::now();
    info!("Processing batch {}", dir.display());

    let files = discover_traces(dir)?;
    info!("Found {} trace files", files.len());

    let classifier = Classifier::new();

    // Phase 1: heal every file, infer the shared width
    let mut max_operands = 0;
    for f in &files {
        max_operands = max_operands.max(classifier.heal_file(&dir.join(f))?);
    }
    info!("Maximal number of operands: {}", max_operands);

    let header = Header::infer(max_operands);

    // Phase 2: split, pad, aggregate
    let batch_dir = dir.join(BATCH_DIR_NAME);
    fs::create_dir_all(&batch_dir)?;

    let mut accumulator = BatchAccumulator::new();
    let mut trace_dirs = Vec::with_capacity(files.len());

    for f in &files {
        let outdir = dir.join(derived_name(f, &options.tool_prefix));
        fs::create_dir_all(&outdir)?;
        debug!("Rewriting {} into {}", f, outdir.display());

        let healed = fs::read_to_string(dir.join(f))?;
        let lines: Vec<String> = healed.lines().map(str::to_string).collect();

        let streams = split_lines(&lines, options.preserve_call_index);
        write_streams(&outdir, &streams)?;
        write_table(&streams.instructions, &header, &outdir.join(table_name(f)))?;

        accumulator.absorb(&streams);
        trace_dirs.push(outdir);
    }

    accumulator.write(&batch_dir)?;

    let logical_mapping = build_logical_mapping(&files, &options.tool_prefix);
    distribute(&batch_dir, &trace_dirs, &logical_mapping)?;

    info!(
        "Batch {} done in {:.2}s",
        dir.display(),
        start.elapsed().as_secs_f64()
    );

    Ok(BatchSummary {
        path: dir.to_path_buf(),
        traces: files.len(),
        operand_width: max_operands,
    })
}
