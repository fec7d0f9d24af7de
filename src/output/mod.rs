//! Output artifact writers.

pub mod report;

pub use report::{read_report, write_report, BatchReport, RunReport};
