//! # Line Demultiplexer
//!
//! Reads the source image one `width`-byte line at a time, routes line `n`
//! to the bank that [`AddressDecomposer::to_bank`] assigns it, and writes
//! the line as hex to that bank and to the aggregate output.
//!
//! ## Line format
//!
//! ```text
//! [cc]bb..b0\n
//! ```
//!
//! `cc` is the check code (only with ECC), followed by the data bytes from
//! byte `width - 1` down to byte 0, two lowercase hex digits each.
//!
//! The loop stops at the end of the address space or as soon as the source
//! has no byte left. A short final read is zero-padded.

use std::io::{ErrorKind, Read};

use crate::decompose::AddressDecomposer;
use crate::ecc;
use crate::error::HexcutResult;
use crate::layout::{CutLayout, ECC_LINE_WIDTH};
use crate::report::RunReport;
use crate::tensor::BankId;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Destination for rendered lines.
///
/// Every line goes to the aggregate output and to the bank it belongs to.
/// Lines for a given bank arrive in ascending address order.
pub trait LineSink {
    /// Write one rendered line (terminator included).
    fn write_line(&mut self, bank: BankId, line: &str) -> HexcutResult<()>;
}

/// Drives the per-line loop for one layout.
#[derive(Debug, Clone)]
pub struct LineDemultiplexer {
    decomposer: AddressDecomposer,
    width: usize,
    ecc: bool,
    total_lines: u64,
}

impl LineDemultiplexer {
    /// Demultiplexer for a validated layout.
    pub fn new(layout: &CutLayout) -> Self {
        Self {
            decomposer: AddressDecomposer::new(layout),
            width: layout.width(),
            ecc: layout.ecc(),
            total_lines: layout.total_lines(),
        }
    }

    /// Route every line of `source` into `sink`.
    ///
    /// # Errors
    ///
    /// Read or write failures, and decomposition consistency violations.
    /// Running out of source data is not an error.
    pub fn run<R: Read, S: LineSink>(
        &self,
        mut source: R,
        sink: &mut S,
    ) -> HexcutResult<RunReport> {
        let norm = self.decomposer.shape().norm();
        let mut report = RunReport::new(self.total_lines, norm);
        let mut buf = vec![0u8; self.width];
        let mut rendered = String::with_capacity(2 * (self.width + 1) + 1);

        for line in 0..self.total_lines {
            let (coord, bank) = self.decomposer.to_bank(line)?;

            let read = fill_line(&mut source, &mut buf)?;
            if read == 0 {
                break;
            }
            if read < self.width {
                buf[read..].fill(0);
                report.padding_bytes = self.width - read;
            }

            self.render_line(&buf, &mut rendered);
            sink.write_line(bank, &rendered)?;
            report.record(bank);

            tracing::trace!(line, bank = %bank, coord = %coord, "line routed");
        }

        if report.exhausted_early() {
            tracing::warn!(
                lines = report.lines_written,
                capacity = report.capacity_lines,
                empty_banks = report.empty_banks(),
                "source exhausted before the address space was full"
            );
        }

        Ok(report)
    }

    /// Render one line into `out`, replacing its previous contents.
    pub fn render_line(&self, data: &[u8], out: &mut String) {
        out.clear();
        if self.ecc {
            if let Ok(word) = <&[u8; ECC_LINE_WIDTH]>::try_from(data) {
                push_hex(out, ecc::encode_line(word));
            }
        }
        for &byte in data.iter().rev() {
            push_hex(out, byte);
        }
        out.push('\n');
    }
}

fn push_hex(out: &mut String, byte: u8) {
    out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
    out.push(HEX_DIGITS[(byte & 0x0f) as usize] as char);
}

/// Read until `buf` is full or the source ends; returns the bytes read.
fn fill_line<R: Read>(source: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
