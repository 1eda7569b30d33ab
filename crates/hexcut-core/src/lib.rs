#![deny(missing_docs)]

//! # hexcut-core: Memory Image to Bank Hex Files
//!
//! Splits a flat binary memory image into one hex file per physical memory
//! bank of a multi-dimensional bank array, plus an aggregate file in
//! address order, and renders a one-line-per-bank listing for downstream
//! tooling.
//!
//! ## Modules
//!
//! - **Tensor** (`tensor.rs`): [`TensorShape`], [`Coordinate`] and the
//!   mixed-radix [`BankId`] serialization.
//! - **Placement** (`placement.rs`): per-dimension MSB/LSB bit placement.
//! - **Layout** (`layout.rs`): [`CutLayout`], the validated run geometry.
//! - **Decompose** (`decompose.rs`): [`AddressDecomposer`], line address to
//!   bank coordinate.
//! - **ECC** (`ecc.rs`): the 8-bit check code of a 64-bit line.
//! - **Demux** (`demux.rs`): [`LineDemultiplexer`], the per-line loop.
//! - **Output** (`output.rs`): [`OutputSet`] and bank file naming.
//! - **Template** (`template.rs`): [`TemplateRenderer`], the bank listing.
//! - **Pipeline** (`pipeline.rs`): [`Job`], one complete run.
//! - **Config** (`config.rs`): [`JobConfig`], YAML job files.
//!
//! ## Crate Policy
//!
//! - Every configuration check happens before any output file is created.
//! - All errors are [`HexcutError`] variants built with `thiserror`. No
//!   `.unwrap()` outside tests.
//! - Logging goes through `tracing`; the crate never prints.

pub mod config;
pub mod decompose;
pub mod demux;
pub mod ecc;
pub mod error;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod placement;
pub mod report;
pub mod size;
pub mod template;
pub mod tensor;

// Re-export primary types at crate root for ergonomic imports.
pub use config::{parse_ecc_flag, JobConfig};
pub use decompose::AddressDecomposer;
pub use demux::{LineDemultiplexer, LineSink};
pub use error::{ConfigError, ConsistencyError, HexcutError, HexcutResult};
pub use layout::{CutLayout, ECC_LINE_WIDTH};
pub use output::{BankFileNaming, OutputSet};
pub use pipeline::Job;
pub use placement::{Placement, PlacementMode};
pub use report::RunReport;
pub use size::ByteSize;
pub use template::{Template, TemplateRenderer};
pub use tensor::{BankId, Coordinate, TensorShape};
