//! Configuration and constants for the pipeline.

/// Current run-report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Fixed leading columns of every trace table
pub const FIXED_COLUMNS: &[&str] = &["Timestamp", "TID", "IID", "OPName", "Value"];

/// Line prefixes the classifier passes through verbatim.
/// Later stages extract or skip them; the classifier never validates them.
pub const IGNORED_PREFIXES: &[&str] =
    &["GlobalVariables", "Mapping", "#TraceStartInstNumber", "FAULT"];

/// Infix markers that flag a line as a suspected instruction record.
/// A line carrying one of these but failing the full grammar is malformed.
pub const INSTRUCTION_MARKERS: &[&str] =
    &[",load,", ",store,", ",br,", ",call-", ",alloca,", ",ret-"];

// Metadata prefixes recognized by the splitter
pub const GLOBALS_PREFIX: &str = "GlobalVariables:";
pub const MAPPING_PREFIX: &str = "Mapping:";
pub const FAULT_PREFIX: &str = "FAULT:";

/// Default instrumentation-tool prefix stripped from trace filenames
pub const DEFAULT_TOOL_PREFIX: &str = "llfi.stat.";

/// Trace filename suffix stripped when deriving output names
pub const TRACE_SUFFIX: &str = ".txt";

/// Suffix marking in-progress temporary files, excluded from discovery
pub const TEMP_SUFFIX: &str = "tmp";

/// Name of the batch-level aggregate directory
pub const BATCH_DIR_NAME: &str = "trace_linear";

// Filenames for the metadata side files and the cross-run index
pub const GLOBALS_FILE: &str = "globals";
pub const MAPPING_FILE: &str = "mapping";
pub const FAULTINJ_FILE: &str = "faultinj";
pub const LOGICAL_MAPPING_FILE: &str = "logical_mapping";

/// Options controlling how one batch is formatted
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Instrumentation-tool prefix stripped from filenames
    pub tool_prefix: String,

    /// Pair zero-index call entries with their duplicate echoes and
    /// substitute timestamps instead of dropping the echoes
    pub preserve_call_index: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            tool_prefix: DEFAULT_TOOL_PREFIX.to_string(),
            preserve_call_index: false,
        }
    }
}
