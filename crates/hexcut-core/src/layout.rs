//! # Cut Layout
//!
//! The validated description of one run: how the bank array is shaped,
//! where each dimension's bits sit in the line address, how wide a line is,
//! how many rows each bank holds, and whether lines carry a check code.
//!
//! [`CutLayout::new`] performs every configuration check up front, so the
//! demultiplexing loop never meets a bad shape halfway through the image.

use crate::error::ConfigError;
use crate::placement::PlacementMode;
use crate::tensor::TensorShape;

/// Width in bytes of a line that can carry a check code.
pub const ECC_LINE_WIDTH: usize = 8;

/// Validated run geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutLayout {
    shape: TensorShape,
    mode: PlacementMode,
    width: usize,
    height: u64,
    ecc: bool,
    total_lines: u64,
    capacity: u64,
}

impl CutLayout {
    /// Validate a layout.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::PlacementLengthMismatch`] if `mode` and `shape`
    ///   disagree on the dimension count.
    /// - [`ConfigError::DimensionNotPowerOfTwo`] / [`ConfigError::HeightNotPowerOfTwo`].
    /// - [`ConfigError::ZeroWidth`], or [`ConfigError::EccWidth`] when ECC
    ///   is enabled on lines that are not 8 bytes wide.
    /// - [`ConfigError::AddressSpaceOverflow`] if the line count or the
    ///   byte capacity does not fit 64 bits.
    pub fn new(
        shape: TensorShape,
        mode: PlacementMode,
        width: usize,
        height: u64,
        ecc: bool,
    ) -> Result<Self, ConfigError> {
        if mode.len() != shape.size() {
            return Err(ConfigError::PlacementLengthMismatch {
                modes: mode.len(),
                dims: shape.size(),
            });
        }
        if let Some((index, &value)) = shape
            .dims()
            .iter()
            .enumerate()
            .find(|(_, d)| !d.is_power_of_two())
        {
            return Err(ConfigError::DimensionNotPowerOfTwo { index, value });
        }
        if !height.is_power_of_two() {
            return Err(ConfigError::HeightNotPowerOfTwo(height));
        }
        if width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if ecc && width != ECC_LINE_WIDTH {
            return Err(ConfigError::EccWidth(width));
        }

        let overflow = || ConfigError::AddressSpaceOverflow {
            height,
            norm: shape.norm(),
        };
        let total_lines = height.checked_mul(shape.norm()).ok_or_else(overflow)?;
        let capacity = total_lines
            .checked_mul(width as u64)
            .ok_or_else(overflow)?;

        Ok(Self {
            shape,
            mode,
            width,
            height,
            ecc,
            total_lines,
            capacity,
        })
    }

    /// The bank array shape.
    pub fn shape(&self) -> &TensorShape {
        &self.shape
    }

    /// Per-dimension placement.
    pub fn mode(&self) -> &PlacementMode {
        &self.mode
    }

    /// Bytes per line.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows per bank.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Whether each line is prefixed with a check code.
    pub fn ecc(&self) -> bool {
        self.ecc
    }

    /// Number of banks.
    pub fn norm(&self) -> u64 {
        self.shape.norm()
    }

    /// Bytes held by one bank (`width * height`).
    pub fn cut_size(&self) -> u64 {
        self.width as u64 * self.height
    }

    /// Bytes held by the whole array (`width * height * norm`).
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Lines in the whole address space (`height * norm`).
    pub fn total_lines(&self) -> u64 {
        self.total_lines
    }

    /// `log2(height * norm)`.
    pub fn addr_bits(&self) -> u32 {
        self.total_lines.trailing_zeros()
    }

    /// `log2(height)`: address bits left for the row inside a bank.
    pub fn row_bits(&self) -> u32 {
        self.height.trailing_zeros()
    }
}
