//! # Placement Modes
//!
//! For each tensor dimension, the placement decides which end of the line
//! address supplies that dimension's bank bits. The textual form is one
//! character per dimension, aligned with the tensor shape by index:
//!
//! - `@`: [`Placement::Msb`], bits taken from the top of the remaining
//!   address window.
//! - `D`: [`Placement::Lsb`], bits taken from the bottom of the address,
//!   which is then shifted right.

use crate::error::ConfigError;

/// Where a dimension's bank bits sit in the line address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Most-significant end of the remaining address window.
    Msb,
    /// Least-significant end; consumes the bits.
    Lsb,
}

impl Placement {
    /// Parse one placement symbol.
    pub fn from_symbol(index: usize, symbol: char) -> Result<Self, ConfigError> {
        match symbol {
            '@' => Ok(Self::Msb),
            'D' => Ok(Self::Lsb),
            _ => Err(ConfigError::UnsupportedPlacement { index, symbol }),
        }
    }

    /// The command-line symbol for this placement.
    pub fn symbol(self) -> char {
        match self {
            Self::Msb => '@',
            Self::Lsb => 'D',
        }
    }
}

/// One [`Placement`] per tensor dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementMode(Vec<Placement>);

impl PlacementMode {
    /// Build from explicit placements, dimension 0 first.
    pub fn new(placements: Vec<Placement>) -> Self {
        Self(placements)
    }

    /// Parse a mode string such as `@D@`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        raw.chars()
            .enumerate()
            .map(|(i, c)| Placement::from_symbol(i, c))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Placements in dimension order.
    pub fn placements(&self) -> &[Placement] {
        &self.0
    }

    /// Number of placements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mode is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(#{}) ", self.0.len())?;
        for p in &self.0 {
            write!(f, "{}", p.symbol())?;
        }
        Ok(())
    }
}
