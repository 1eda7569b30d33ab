//! # Output Files
//!
//! A run writes `main.hex` (every line, in address order) and one
//! `cutNNN.hex` per bank into the output folder. [`OutputSet`] owns all of
//! those handles for the duration of the demultiplexing pass, keyed by
//! [`BankId`].
//!
//! Bank numbers are zero-padded to three digits. Arrays with more than 1000
//! banks get wider numbers so file names stay unique.
//!
//! All handles are buffered. [`OutputSet::finish`] flushes them and reports
//! the first failure with its path; dropping the set without calling
//! `finish` still flushes on a best-effort basis.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::demux::LineSink;
use crate::error::{HexcutError, HexcutResult};
use crate::tensor::BankId;

/// Name of the aggregate file.
pub const MAIN_FILE_NAME: &str = "main.hex";

/// Minimum number of digits in a bank file number.
pub const MIN_BANK_DIGITS: usize = 3;

/// Deterministic bank file names inside an output folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankFileNaming {
    folder: PathBuf,
    digits: usize,
}

impl BankFileNaming {
    /// Naming for `norm` banks under `folder`.
    pub fn new(folder: impl Into<PathBuf>, norm: u64) -> Self {
        let largest = norm.saturating_sub(1);
        let digits = largest.to_string().len().max(MIN_BANK_DIGITS);
        Self {
            folder: folder.into(),
            digits,
        }
    }

    /// The output folder.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Digits used for bank numbers.
    pub fn digits(&self) -> usize {
        self.digits
    }

    /// File name of a bank, e.g. `cut007.hex`.
    pub fn file_name(&self, id: BankId) -> String {
        format!("cut{:0width$}.hex", id.get(), width = self.digits)
    }

    /// Full path of a bank file.
    pub fn bank_path(&self, id: BankId) -> PathBuf {
        self.folder.join(self.file_name(id))
    }

    /// Full path of the aggregate file.
    pub fn main_path(&self) -> PathBuf {
        self.folder.join(MAIN_FILE_NAME)
    }
}

/// An open output file and the path it was created at.
#[derive(Debug)]
struct OutputFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl OutputFile {
    fn create(path: PathBuf) -> HexcutResult<Self> {
        let file = File::create(&path).map_err(|e| HexcutError::file_io(&path, e))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    fn write_all(&mut self, bytes: &[u8]) -> HexcutResult<()> {
        self.writer
            .write_all(bytes)
            .map_err(|e| HexcutError::file_io(&self.path, e))
    }

    fn flush(&mut self) -> HexcutResult<()> {
        self.writer
            .flush()
            .map_err(|e| HexcutError::file_io(&self.path, e))
    }
}

/// The aggregate file plus one file per bank, all created (or truncated)
/// up front.
#[derive(Debug)]
pub struct OutputSet {
    main: OutputFile,
    banks: Vec<OutputFile>,
}

impl OutputSet {
    /// Create `main.hex` and every bank file. The folder must exist.
    ///
    /// # Errors
    ///
    /// [`HexcutError::FileIo`] naming the first file that could not be
    /// created.
    pub fn create(naming: &BankFileNaming, norm: u64) -> HexcutResult<Self> {
        let main = OutputFile::create(naming.main_path())?;
        let banks = (0..norm)
            .map(|id| {
                let path = naming.bank_path(BankId::new(id));
                tracing::trace!(path = %path.display(), "creating bank file");
                OutputFile::create(path)
            })
            .collect::<HexcutResult<Vec<_>>>()?;
        tracing::debug!(
            folder = %naming.folder().display(),
            banks = banks.len(),
            "created output files"
        );
        Ok(Self { main, banks })
    }

    /// Number of bank files.
    pub fn bank_count(&self) -> usize {
        self.banks.len()
    }

    /// Flush and close every file.
    pub fn finish(mut self) -> HexcutResult<()> {
        self.main.flush()?;
        for bank in &mut self.banks {
            bank.flush()?;
        }
        Ok(())
    }
}

impl LineSink for OutputSet {
    fn write_line(&mut self, bank: BankId, line: &str) -> HexcutResult<()> {
        self.main.write_all(line.as_bytes())?;
        self.banks[bank.index()].write_all(line.as_bytes())
    }
}
