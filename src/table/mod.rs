//! Padded table writer.
//!
//! Writes the final rectangular table for one trace: the shared header row
//! first, then every instruction record padded with empty trailing fields up
//! to the header width. Padding never truncates; a record wider than the
//! header means the width pass and the rewrite pass disagreed, which aborts
//! the batch.

use crate::schema::Header;
use crate::utils::config::IGNORED_PREFIXES;
use crate::utils::error::PipelineError;
use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Pad one record to the header width, or fail on overflow
fn pad_record(line: &str, header_width: usize) -> Result<String, PipelineError> {
    let trimmed = line.trim_end();
    let fields = trimmed.split(',').count();

    if fields > header_width {
        return Err(PipelineError::SchemaOverflow {
            width: fields,
            header_width,
            line: trimmed.to_string(),
        });
    }

    let mut row = String::with_capacity(trimmed.len() + (header_width - fields));
    row.push_str(trimmed);
    for _ in 0..header_width - fields {
        row.push(',');
    }
    Ok(row)
}

/// Write the padded table for one trace.
///
/// Ignored-prefix lines are skipped here as a final guard; the splitter has
/// normally routed them away already, but lines like `#TraceStartInstNumber`
/// survive it and must never reach the table.
pub fn write_table(
    lines: &[String],
    header: &Header,
    path: &Path,
) -> Result<(), PipelineError> {
    debug!("Writing table {}", path.display());

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", header.render())?;

    for line in lines {
        if IGNORED_PREFIXES.iter().any(|p| line.starts_with(p)) {
            continue;
        }
        writeln!(writer, "{}", pad_record(line, header.len())?)?;
    }

    writer.flush()?;
    Ok(())
}
