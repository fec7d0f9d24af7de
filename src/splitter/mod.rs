//! Call-record deduplication and metadata extraction.
//!
//! The raw source emits every nonzero-depth call twice: once as the real
//! entry (instance index 0) and once as a duplicate echo carrying the
//! callee-side instance index. The splitter drops the echoes and routes the
//! interleaved metadata lines (globals, thread mapping, injected faults)
//! into their own streams; everything else passes through unchanged.

use crate::utils::config::{
    FAULTINJ_FILE, FAULT_PREFIX, GLOBALS_FILE, GLOBALS_PREFIX, MAPPING_FILE, MAPPING_PREFIX,
};
use crate::utils::error::PipelineError;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Marker identifying a call record with a depth qualifier
const CALL_MARKER: &str = ",call-";
const DEPTH_QUALIFIER: &str = "-d,";

/// The four streams produced from one healed trace file
#[derive(Debug, Default, Clone)]
pub struct SplitStreams {
    /// Instruction records, in original order, echoes removed
    pub instructions: Vec<String>,
    /// `GlobalVariables:` payloads, prefix stripped
    pub globals: String,
    /// `Mapping:` payloads, prefix stripped
    pub mapping: String,
    /// `FAULT:` payloads, prefix stripped
    pub faultinj: String,
}

/// True if the line's instance-index field (third column) is zero
fn has_zero_index(line: &str) -> bool {
    line.split(',').nth(2) == Some("0")
}

/// True for the duplicate echo of an already-recorded call:
/// a depth-qualified call record whose instance index is nonzero.
fn is_call_echo(line: &str) -> bool {
    line.contains(CALL_MARKER) && line.contains(DEPTH_QUALIFIER) && !has_zero_index(line)
}

/// Route a metadata line into `streams`, returning false if it is not one
fn route_metadata(line: &str, streams: &mut SplitStreams) -> bool {
    for (prefix, stream) in [
        (GLOBALS_PREFIX, &mut streams.globals),
        (MAPPING_PREFIX, &mut streams.mapping),
        (FAULT_PREFIX, &mut streams.faultinj),
    ] {
        if let Some(rest) = line.strip_prefix(prefix) {
            stream.push_str(rest.trim_start());
            stream.push('\n');
            return true;
        }
    }
    false
}

/// Split one healed trace into instruction and metadata streams.
///
/// With `preserve_call_index` off (the default) duplicate call echoes are
/// simply discarded. With it on, each zero-index entry is paired with its
/// echo and rewritten to carry the entry's timestamp and opcode alongside
/// the echo's remaining fields, so the callee-side instance index survives.
pub fn split_lines(lines: &[String], preserve_call_index: bool) -> SplitStreams {
    if preserve_call_index {
        split_preserving_call_index(lines)
    } else {
        split_dropping_echoes(lines)
    }
}

/// Default policy: metadata out, echoes dropped, the rest verbatim
fn split_dropping_echoes(lines: &[String]) -> SplitStreams {
    let mut streams = SplitStreams::default();

    for line in lines {
        if route_metadata(line, &mut streams) {
            continue;
        }
        if is_call_echo(line) {
            continue;
        }
        streams.instructions.push(line.clone());
    }

    debug!("Split {} lines into {} instruction records", lines.len(), streams.instructions.len());

    streams
}

/// Alternate policy: substitute each entry's timestamp into its echo
/// instead of discarding the echo's fields.
fn split_preserving_call_index(lines: &[String]) -> SplitStreams {
    // First pass: pair every zero-index call entry with its echo.
    // Calls nest, so entries are matched stack-wise.
    let mut stack: Vec<&String> = Vec::new();
    let mut pairs: HashMap<&String, &String> = HashMap::new();

    for line in lines {
        if line.contains(CALL_MARKER) && line.contains("-d") {
            if has_zero_index(line) {
                stack.push(line);
            } else if let Some(entry) = stack.pop() {
                pairs.insert(entry, line);
            } else {
                warn!("Unmatched call echo: {}", line);
            }
        }
    }

    let echoes: HashSet<&String> = pairs.values().copied().collect();

    // Second pass: emit the substituted record at the entry's position,
    // drop the echo at its own.
    let mut streams = SplitStreams::default();

    for line in lines {
        if route_metadata(line, &mut streams) {
            continue;
        }
        if let Some(echo) = pairs.get(line) {
            streams.instructions.push(substitute_timestamp(line, echo));
            continue;
        }
        if echoes.contains(line) {
            continue;
        }
        streams.instructions.push(line.clone());
    }

    streams
}

/// Combine an entry and its echo: the entry's timestamp and opcode,
/// the echo's remaining fields (including its instance index).
fn substitute_timestamp(entry: &str, echo: &str) -> String {
    let entry_fields: Vec<&str> = entry.split(',').collect();
    let mut fields: Vec<&str> = echo.split(',').collect();
    if !fields.is_empty() && !entry_fields.is_empty() {
        fields[0] = entry_fields[0];
    }
    if fields.len() > 3 && entry_fields.len() > 3 {
        fields[3] = entry_fields[3];
    }
    fields.join(",")
}

/// Write the three metadata streams into a trace output directory
pub fn write_streams(outdir: &Path, streams: &SplitStreams) -> Result<(), PipelineError> {
    fs::write(outdir.join(GLOBALS_FILE), &streams.globals)?;
    fs::write(outdir.join(MAPPING_FILE), &streams.mapping)?;
    fs::write(outdir.join(FAULTINJ_FILE), &streams.faultinj)?;
    Ok(())
}
