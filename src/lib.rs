//! Fitrace
//!
//! Normalization of fault-injection instruction traces into uniform,
//! rectangular tables.
//!
//! Raw traces interleave per-instruction records of varying width with
//! side-channel metadata (global variables, thread mappings, injected
//! faults). This crate classifies and heals each trace, infers one shared
//! schema per batch, rewrites every trace against it with explicit column
//! padding, and merges the metadata into batch-level aggregates plus a
//! cross-run logical index.
//!
//! Most users should use the CLI:
//!
//! ```bash
//! fitrace format path/to/batch
//! ```

pub mod classifier;
pub mod commands;
pub mod merger;
pub mod output;
pub mod pipeline;
pub mod schema;
pub mod splitter;
pub mod table;
pub mod utils;
