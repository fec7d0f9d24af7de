//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod format;

// Re-export main command functions
pub use format::{execute_format, validate_args, FormatArgs, FormatOutcome};
