//! Batch-wide table schema.
//!
//! The header is inferred once per batch from the widest instruction record
//! and then applied identically to every trace, so all tables of one batch
//! are rectangular and column-aligned. It is an immutable value threaded
//! through the pipeline, never shared mutable state.

use crate::utils::config::FIXED_COLUMNS;

/// The ordered column list shared by every table in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
}

impl Header {
    /// Build the header for a batch whose widest record needs
    /// `max_operands` generated operand columns.
    pub fn infer(max_operands: usize) -> Self {
        let mut columns: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
        for i in 0..max_operands {
            columns.push(format!("Operand-{}", i));
        }
        Self { columns }
    }

    /// Total number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The comma-joined header row
    pub fn render(&self) -> String {
        self.columns.join(",")
    }
}
