//! Per-run summary of what the demultiplexer wrote.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HexcutError, HexcutResult};
use crate::tensor::BankId;

/// Line counts produced by one demultiplexing pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Lines the address space can hold (`height * norm`).
    pub capacity_lines: u64,
    /// Lines read from the source and written out.
    pub lines_written: u64,
    /// Zero bytes appended to complete the final line.
    pub padding_bytes: usize,
    /// Lines written to each bank, indexed by bank id.
    pub lines_per_bank: Vec<u64>,
}

impl RunReport {
    /// Empty report for `norm` banks.
    pub fn new(capacity_lines: u64, norm: u64) -> Self {
        Self {
            capacity_lines,
            lines_written: 0,
            padding_bytes: 0,
            lines_per_bank: vec![0; norm as usize],
        }
    }

    /// Account for one line written to `bank`.
    pub fn record(&mut self, bank: BankId) {
        self.lines_written += 1;
        self.lines_per_bank[bank.index()] += 1;
    }

    /// Whether the source ran out before the address space was full.
    pub fn exhausted_early(&self) -> bool {
        self.lines_written < self.capacity_lines
    }

    /// Number of banks that received no line at all.
    pub fn empty_banks(&self) -> usize {
        self.lines_per_bank.iter().filter(|&&n| n == 0).count()
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> HexcutResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| HexcutError::file_io(path, e))
    }
}
