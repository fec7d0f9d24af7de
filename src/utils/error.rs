//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Malformed instruction records are deliberately not represented here:
//! they are recovered locally (logged, line dropped) and never propagate.

use thiserror::Error;

/// Errors that abort processing of a whole batch
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A record wider than the inferred header reached the rewrite stage.
    /// The width pass and the rewrite pass saw different data.
    #[error("record has {width} fields but the batch header has {header_width}: {line}")]
    SchemaOverflow {
        width: usize,
        header_width: usize,
        line: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while writing the run report
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
