//! Batch-level aggregation.
//!
//! Accumulates every trace's metadata streams into the batch-level
//! `trace_linear` files, builds the logical-mapping index that ties each
//! output directory back to its run identifier, and copies the aggregates
//! into every trace directory so each one can be consumed on its own.
//!
//! Aggregate files are built in memory and written once per batch with
//! truncating creates; a repeated run starts from scratch instead of
//! appending to stale files.

use crate::splitter::SplitStreams;
use crate::utils::config::{
    FAULTINJ_FILE, GLOBALS_FILE, LOGICAL_MAPPING_FILE, MAPPING_FILE, TRACE_SUFFIX,
};
use crate::utils::error::PipelineError;
use log::debug;
use std::fs;
use std::path::Path;

/// In-memory union of all trace metadata in one batch
#[derive(Debug, Default)]
pub struct BatchAccumulator {
    globals: String,
    mapping: String,
    faultinj: String,
}

impl BatchAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one trace's metadata streams into the batch union
    pub fn absorb(&mut self, streams: &SplitStreams) {
        self.globals.push_str(&streams.globals);
        self.mapping.push_str(&streams.mapping);
        self.faultinj.push_str(&streams.faultinj);
    }

    /// Write the aggregate files into the batch-level directory,
    /// replacing whatever a previous run may have left there
    pub fn write(&self, batch_dir: &Path) -> Result<(), PipelineError> {
        debug!("Writing batch aggregates to {}", batch_dir.display());
        fs::write(batch_dir.join(GLOBALS_FILE), &self.globals)?;
        fs::write(batch_dir.join(MAPPING_FILE), &self.mapping)?;
        fs::write(batch_dir.join(FAULTINJ_FILE), &self.faultinj)?;
        Ok(())
    }
}

/// Derive the human-readable run identifier for one trace filename:
/// drop the tool prefix and the `trace` stem, drop the suffix, and turn
/// the internal separator into a comma.
pub fn logical_name(filename: &str, tool_prefix: &str) -> String {
    filename
        .replace(&format!("{}trace", tool_prefix), "")
        .replace(TRACE_SUFFIX, "")
        .replace('-', ",")
}

/// Build the batch-wide index, one line per trace file in discovery order
pub fn build_logical_mapping(files: &[String], tool_prefix: &str) -> String {
    let mut index = String::new();
    for f in files {
        index.push_str(&logical_name(f, tool_prefix));
        index.push('\n');
    }
    index
}

/// Distribute the batch-scope data into every trace directory and the
/// batch-level directory: the logical-mapping index everywhere, plus a
/// copy of each aggregate file into each trace directory.
pub fn distribute(
    batch_dir: &Path,
    trace_dirs: &[std::path::PathBuf],
    logical_mapping: &str,
) -> Result<(), PipelineError> {
    for outdir in trace_dirs {
        fs::write(outdir.join(LOGICAL_MAPPING_FILE), logical_mapping)?;
        for name in [GLOBALS_FILE, MAPPING_FILE, FAULTINJ_FILE] {
            fs::copy(batch_dir.join(name), outdir.join(name))?;
        }
    }
    fs::write(batch_dir.join(LOGICAL_MAPPING_FILE), logical_mapping)?;
    Ok(())
}
