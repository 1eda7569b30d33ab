//! # Tensor Shape and Bank Identity
//!
//! The bank array is declared as a tensor shape `dims[0..n)`: dimension `i`
//! holds `dims[i]` banks, and the array holds `norm = Π dims` banks in total.
//!
//! A bank is identified either by its [`Coordinate`] (one component per
//! dimension) or by its scalar [`BankId`], the mixed-radix serialization of
//! the coordinate with dimension 0 varying fastest:
//!
//! ```text
//! id = Σ_i coord[i] * Π_{j<i} dims[j]
//! ```
//!
//! [`TensorShape::serialize`] and [`TensorShape::unserialize`] are mutual
//! inverses over `[0, norm)`.

use crate::error::ConfigError;

/// Scalar bank identifier in `[0, norm)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BankId(u64);

impl BankId {
    /// Wrap a raw bank index.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw bank index.
    pub fn get(self) -> u64 {
        self.0
    }

    /// The bank index as a slice index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for BankId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of a bank in the tensor, one component per dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate(Vec<u64>);

impl Coordinate {
    /// Build a coordinate from its components, dimension 0 first.
    pub fn new(components: Vec<u64>) -> Self {
        Self(components)
    }

    /// Components in dimension order.
    pub fn components(&self) -> &[u64] {
        &self.0
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the coordinate has no components.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Components from the last (outermost) dimension to the first.
    pub fn outermost_first(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().rev().copied()
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for c in &self.0 {
            write!(f, " {c}")?;
        }
        f.write_str(" ]")
    }
}

/// Ordered per-dimension bank counts.
///
/// Parsing only checks that every dimension is a positive integer. Whether
/// the dimensions are powers of two is checked when the shape is used for
/// address decomposition (see [`crate::CutLayout`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorShape {
    dims: Vec<u64>,
    norm: u64,
}

impl TensorShape {
    /// Build a shape from explicit dimensions.
    pub fn new(dims: Vec<u64>) -> Result<Self, ConfigError> {
        if dims.is_empty() {
            return Err(ConfigError::MalformedShape {
                input: String::new(),
                reason: "at least one dimension is required".to_string(),
            });
        }
        let mut norm: u64 = 1;
        for &d in &dims {
            if d == 0 {
                return Err(ConfigError::MalformedShape {
                    input: render_dims(&dims),
                    reason: "dimensions must be positive".to_string(),
                });
            }
            norm = norm
                .checked_mul(d)
                .ok_or_else(|| ConfigError::MalformedShape {
                    input: render_dims(&dims),
                    reason: "total bank count overflows 64 bits".to_string(),
                })?;
        }
        Ok(Self { dims, norm })
    }

    /// Parse a dash-separated shape such as `2-4-2`, left to right.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let malformed = |reason: String| ConfigError::MalformedShape {
            input: raw.to_string(),
            reason,
        };

        let dims = raw
            .split('-')
            .enumerate()
            .map(|(i, token)| {
                if token.is_empty() {
                    return Err(malformed(format!("token {i} is empty")));
                }
                token
                    .parse::<u64>()
                    .map_err(|e| malformed(format!("token {i} ({token:?}): {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(dims).map_err(|e| match e {
            ConfigError::MalformedShape { reason, .. } => malformed(reason),
            other => other,
        })
    }

    /// Per-dimension bank counts.
    pub fn dims(&self) -> &[u64] {
        &self.dims
    }

    /// Number of dimensions.
    pub fn size(&self) -> usize {
        self.dims.len()
    }

    /// Total number of banks.
    pub fn norm(&self) -> u64 {
        self.norm
    }

    /// Mixed-radix serialization of a coordinate, dimension 0 fastest.
    pub fn serialize(&self, coord: &Coordinate) -> BankId {
        let mut id = 0;
        let mut radix = 1;
        for (c, d) in coord.components().iter().zip(&self.dims) {
            id += c * radix;
            radix *= d;
        }
        BankId(id)
    }

    /// Inverse of [`serialize`](Self::serialize).
    pub fn unserialize(&self, id: BankId) -> Coordinate {
        let mut radix = 1;
        let components = self
            .dims
            .iter()
            .map(|&d| {
                let c = id.0 / radix % d;
                radix *= d;
                c
            })
            .collect();
        Coordinate(components)
    }

    /// Every bank id in ascending order.
    pub fn bank_ids(&self) -> impl Iterator<Item = BankId> {
        (0..self.norm).map(BankId)
    }
}

impl std::fmt::Display for TensorShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(#{}) [", self.dims.len())?;
        for d in &self.dims {
            write!(f, " {d}")?;
        }
        f.write_str(" ]")
    }
}

fn render_dims(dims: &[u64]) -> String {
    dims.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join("-")
}
