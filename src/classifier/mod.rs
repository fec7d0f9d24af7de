//! Line classifier for raw trace lines.
//!
//! Recognizes each raw line as pass-through metadata, a valid instruction
//! record, a suspected malformed record, or unrelated noise. The heal pass
//! rewrites a trace file in place keeping only the first two categories and
//! reports the widest operand count seen, which feeds schema inference.

use crate::utils::config::{IGNORED_PREFIXES, INSTRUCTION_MARKERS};
use crate::utils::error::PipelineError;
use log::{debug, warn};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Number of fixed schema columns (Timestamp, TID, IID, OPName, Value).
/// A record's first operand descriptor lands in the Value column, so its
/// generated-column demand is total fields minus this.
pub const FIXED_FIELDS: usize = 5;

/// Operand descriptor: basic block (00..16), instruction id, hex address
const OPERAND: &str = "(?:0[0-9]|1[0-6])-[0-9]+-[0-9a-f]+";

/// Classification of one raw trace line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Metadata passed through verbatim, extracted by a later stage
    Ignored,
    /// Valid instruction record, with the number of generated operand
    /// columns it needs beyond the five fixed ones
    Instruction { operands: usize },
    /// Carries an instruction marker but fails the full grammar
    Suspect,
    /// Matches nothing we know; assumed unrelated noise
    Noise,
}

/// Validates raw lines against the instruction grammar.
///
/// The grammar is fixed, so the matcher is compiled once and reused
/// for every line of every file in the batch.
pub struct Classifier {
    record: Regex,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    pub fn new() -> Self {
        let kinds = [
            format!("load(?:,{OPERAND}){{2}}"),
            format!("br(?:,{OPERAND}){{2}}"),
            format!("br(?:,{OPERAND}){{4}}"),
            format!("store(?:,{OPERAND}){{3}}"),
            format!("alloca(?:,{OPERAND}){{3}}"),
            format!(r"ret-[\w.]+(?:,{OPERAND}){{1,2}}"),
            format!(r"call-[\w.]+-\w(?:,{OPERAND})+"),
        ];
        let entry = format!(
            r"\A[0-9]+,[0-9]+,[0-9]+,(?:{})\z",
            kinds.join("|")
        );
        let record = Regex::new(&entry).expect("instruction grammar compiles");
        Self { record }
    }

    /// Classify one raw line (without its trailing newline).
    ///
    /// Ignored prefixes win over everything: a `Mapping:` line is never
    /// validated as an instruction even if it happens to contain a marker.
    pub fn classify(&self, line: &str) -> LineKind {
        if IGNORED_PREFIXES.iter().any(|p| line.starts_with(p)) {
            return LineKind::Ignored;
        }
        if self.record.is_match(line) {
            let fields = line.split(',').count();
            return LineKind::Instruction {
                operands: fields - FIXED_FIELDS,
            };
        }
        if INSTRUCTION_MARKERS.iter().any(|m| line.contains(m)) {
            return LineKind::Suspect;
        }
        LineKind::Noise
    }

    /// Heal one trace file in place.
    ///
    /// Keeps ignored and valid instruction lines, drops everything else,
    /// and returns the maximum operand count over the kept instruction
    /// lines (0 if the file has none). Suspected malformed records are
    /// logged before being dropped; noise is dropped silently.
    ///
    /// Input bytes are decoded leniently: invalid UTF-8 sequences are
    /// replaced, never rejected.
    pub fn heal_file(&self, path: &Path) -> Result<usize, PipelineError> {
        debug!("Healing {}", path.display());

        let bytes = fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);

        let mut kept = String::with_capacity(text.len());
        let mut max_operands = 0;

        for line in text.lines() {
            match self.classify(line) {
                LineKind::Ignored => {
                    kept.push_str(line);
                    kept.push('\n');
                }
                LineKind::Instruction { operands } => {
                    kept.push_str(line);
                    kept.push('\n');
                    max_operands = max_operands.max(operands);
                }
                LineKind::Suspect => {
                    warn!("Issue with line: {}", line);
                }
                LineKind::Noise => {}
            }
        }

        fs::write(path, kept)?;

        Ok(max_operands)
    }
}
