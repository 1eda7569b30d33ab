//! # Job Configuration
//!
//! A run is described by eight settings: source image, output folder,
//! tensor shape, placement modes, line width, height, template and the ECC
//! flag. They arrive either as positional command-line arguments or as a
//! YAML job file:
//!
//! ```yaml
//! source: build/firmware.bin
//! output: build/cuts
//! shape: 2-4-2
//! mode: "@D@"
//! width: 8
//! height: 1024
//! template: "mem_%_%_% @"
//! ecc: true
//! ```
//!
//! Both paths end in [`JobConfig::into_job`], which validates everything
//! before a single file is touched.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, HexcutError, HexcutResult};
use crate::layout::CutLayout;
use crate::pipeline::Job;
use crate::placement::PlacementMode;
use crate::template::Template;
use crate::tensor::TensorShape;

/// Unvalidated run settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    /// Flat binary memory image.
    pub source: PathBuf,
    /// Existing folder receiving `main.hex` and the cut files.
    pub output: PathBuf,
    /// Dash-separated bank counts, e.g. `2-4-2`.
    pub shape: String,
    /// One placement symbol per dimension (`@` = MSB, `D` = LSB).
    pub mode: String,
    /// Bytes per line.
    pub width: usize,
    /// Rows per bank.
    pub height: u64,
    /// Listing template rendered once per bank.
    pub template: String,
    /// Prefix each line with its check code.
    #[serde(default)]
    pub ecc: bool,
}

impl JobConfig {
    /// Load a YAML job file.
    pub fn load(path: &Path) -> HexcutResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| HexcutError::file_io(path, e))?;
        serde_yaml::from_str(&content).map_err(|e| HexcutError::YamlParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Validate the settings into a runnable [`Job`].
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from the shape, placement, layout or template.
    pub fn into_job(self) -> Result<Job, ConfigError> {
        let shape = TensorShape::parse(&self.shape)?;
        let mode = PlacementMode::parse(&self.mode)?;
        let layout = CutLayout::new(shape, mode, self.width, self.height, self.ecc)?;
        Job::new(self.source, self.output, layout, Template::parse(&self.template))
    }
}

/// Parse the command-line ECC flag, `0` or `1`.
pub fn parse_ecc_flag(raw: &str) -> Result<bool, ConfigError> {
    match raw.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(ConfigError::InvalidEccFlag(raw.to_string())),
    }
}
