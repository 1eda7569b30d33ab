//! # Error Hierarchy
//!
//! Structured error types for hexcut, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Every failure is fatal for the run. The variants split along what the
//! operator has to fix: the configuration, the source image, the output
//! folder, or (for [`ConsistencyError`]) the tool itself.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for hexcut.
#[derive(Error, Debug)]
pub enum HexcutError {
    /// Invalid shape, placement, width, height or template.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An internal invariant did not hold. Always a defect in hexcut.
    #[error("internal consistency violation: {0}")]
    Consistency(#[from] ConsistencyError),

    /// The source image does not fit into the declared bank array.
    #[error("source image is too big: {source_len} bytes exceed capacity of {capacity} bytes")]
    Capacity {
        /// Size of the source image in bytes.
        source_len: u64,
        /// `width * height * norm` in bytes.
        capacity: u64,
    },

    /// The source image does not exist.
    #[error("unable to open {path}: file not found")]
    SourceNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// I/O failure on a specific file.
    #[error("I/O error on {path}: {source}")]
    FileIo {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// I/O failure not tied to a named file (stdout, in-memory sinks).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Job file is not valid YAML for [`crate::JobConfig`].
    #[error("failed to parse job file {path}: {source}")]
    YamlParse {
        /// Job file path.
        path: PathBuf,
        /// Underlying parser error.
        source: serde_yaml::Error,
    },

    /// Report serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HexcutError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn file_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileIo {
            path: path.into(),
            source,
        }
    }

    /// Whether this error signals a defect rather than bad input.
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::Consistency(_))
    }
}

/// Configuration errors, detected before or during setup.
///
/// Each variant carries the offending input so that a bad invocation can be
/// fixed without re-reading the source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Tensor shape string is empty or has an empty token (`"2--4"`).
    #[error("malformed tensor shape {input:?}: {reason}")]
    MalformedShape {
        /// The raw shape string.
        input: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A dimension is not a power of two.
    #[error("dimension {index} has {value} banks, which is not a power of two")]
    DimensionNotPowerOfTwo {
        /// Dimension index.
        index: usize,
        /// Declared bank count.
        value: u64,
    },

    /// Height is not a power of two.
    #[error("height {0} is not a power of two")]
    HeightNotPowerOfTwo(u64),

    /// Placement symbol other than `@` or `D`.
    #[error("unsupported placement symbol {symbol:?} at dimension {index} (expected '@' or 'D')")]
    UnsupportedPlacement {
        /// Dimension index.
        index: usize,
        /// The rejected symbol.
        symbol: char,
    },

    /// Placement string length differs from the dimension count.
    #[error("placement mode has {modes} symbols but tensor shape has {dims} dimensions")]
    PlacementLengthMismatch {
        /// Number of placement symbols.
        modes: usize,
        /// Number of dimensions.
        dims: usize,
    },

    /// Line width of zero bytes.
    #[error("line width must be at least one byte")]
    ZeroWidth,

    /// ECC requested with a line width other than 8 bytes.
    #[error("invalid width for ECC: {0} bytes (ECC requires 8-byte lines)")]
    EccWidth(usize),

    /// `height * norm` does not fit a 64-bit line address.
    #[error("address space of {height} rows x {norm} banks does not fit a 64-bit line address")]
    AddressSpaceOverflow {
        /// Rows per bank.
        height: u64,
        /// Number of banks.
        norm: u64,
    },

    /// Template consumes more coordinate components than there are dimensions.
    #[error("template {template:?} uses {used} coordinate placeholders but the tensor has {dims} dimensions")]
    TemplateTooManyPlaceholders {
        /// The template.
        template: String,
        /// Number of `%` placeholders.
        used: usize,
        /// Number of dimensions.
        dims: usize,
    },

    /// ECC flag other than `0` or `1`.
    #[error("invalid ECC flag {0:?} (expected 0 or 1)")]
    InvalidEccFlag(String),
}

/// Internal invariants of the address decomposition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    /// The placement did not consume exactly the bank bits of the address.
    #[error("line {line} left {remaining} address bits after decomposition, expected {expected}")]
    ResidualAddressBits {
        /// Line address being decomposed.
        line: u64,
        /// Bits left after all dimensions.
        remaining: u32,
        /// `log2(height)`.
        expected: u32,
    },

    /// `serialize(unserialize(id)) != id`.
    #[error("bank id {id} does not survive a coordinate round trip (got {round_tripped})")]
    BankIdRoundTrip {
        /// The bank id that was unserialized.
        id: u64,
        /// The id recomputed from its coordinate.
        round_tripped: u64,
    },
}

/// Result type alias for hexcut operations.
pub type HexcutResult<T> = Result<T, HexcutError>;
