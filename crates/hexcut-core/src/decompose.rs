//! # Address Decomposition
//!
//! Maps a line address in `[0, height * norm)` to the bank that stores it.
//!
//! The address is `addr_bits = log2(height * norm)` bits wide. Dimensions are
//! visited from the last (outermost) to dimension 0, and each one takes
//! `log2(dims[i])` bits according to its [`Placement`]:
//!
//! - [`Placement::Msb`] reads the bits at the top of the remaining window
//!   and leaves the address untouched.
//! - [`Placement::Lsb`] reads the lowest bits and shifts them out.
//!
//! Every dimension narrows the window by its bit count. Once all dimensions
//! are consumed exactly `log2(height)` bits must remain: the row inside the
//! bank. Because every dimension reads a disjoint bit range, each bank
//! receives exactly `height` line addresses.

use crate::error::ConsistencyError;
use crate::layout::CutLayout;
use crate::placement::Placement;
use crate::tensor::{BankId, Coordinate, TensorShape};

/// Bit extraction plan for one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DimensionPlan {
    placement: Placement,
    shift: u32,
    mask: u64,
}

/// Precomputed decomposition for a validated [`CutLayout`].
#[derive(Debug, Clone)]
pub struct AddressDecomposer {
    shape: TensorShape,
    plans: Vec<DimensionPlan>,
    addr_bits: u32,
    row_bits: u32,
}

impl AddressDecomposer {
    /// Build the per-dimension plans. The layout guarantees every dimension
    /// and the height are powers of two.
    pub fn new(layout: &CutLayout) -> Self {
        let plans = layout
            .shape()
            .dims()
            .iter()
            .zip(layout.mode().placements())
            .map(|(&d, &placement)| {
                let shift = d.trailing_zeros();
                DimensionPlan {
                    placement,
                    shift,
                    mask: (1u64 << shift) - 1,
                }
            })
            .collect();

        Self {
            shape: layout.shape().clone(),
            plans,
            addr_bits: layout.addr_bits(),
            row_bits: layout.row_bits(),
        }
    }

    /// The tensor shape banks are addressed in.
    pub fn shape(&self) -> &TensorShape {
        &self.shape
    }

    /// Bank coordinate and id for a line address.
    ///
    /// # Errors
    ///
    /// [`ConsistencyError::ResidualAddressBits`] if the dimensions did not
    /// leave exactly `log2(height)` address bits.
    pub fn to_bank(&self, line: u64) -> Result<(Coordinate, BankId), ConsistencyError> {
        let mut addr = line;
        let mut addr_size = self.addr_bits;
        let mut components = vec![0u64; self.plans.len()];

        for (i, plan) in self.plans.iter().enumerate().rev() {
            components[i] = match plan.placement {
                Placement::Msb => (addr >> (addr_size - plan.shift)) & plan.mask,
                Placement::Lsb => {
                    let c = addr & plan.mask;
                    addr >>= plan.shift;
                    c
                }
            };
            addr_size -= plan.shift;
        }

        if addr_size != self.row_bits {
            return Err(ConsistencyError::ResidualAddressBits {
                line,
                remaining: addr_size,
                expected: self.row_bits,
            });
        }

        let coord = Coordinate::new(components);
        let id = self.shape.serialize(&coord);
        Ok((coord, id))
    }

    /// Coordinate of a bank id, checked against [`TensorShape::serialize`].
    ///
    /// # Errors
    ///
    /// [`ConsistencyError::BankIdRoundTrip`] if the coordinate does not map
    /// back to `id`.
    pub fn coordinate_of(&self, id: BankId) -> Result<Coordinate, ConsistencyError> {
        let coord = self.shape.unserialize(id);
        let round_tripped = self.shape.serialize(&coord);
        if round_tripped != id {
            return Err(ConsistencyError::BankIdRoundTrip {
                id: id.get(),
                round_tripped: round_tripped.get(),
            });
        }
        Ok(coord)
    }
}
