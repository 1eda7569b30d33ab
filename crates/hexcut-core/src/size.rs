//! Human-readable byte counts for diagnostics.

/// A byte count displayed with a binary unit (`B`, `kB`, `MB`, `GB`).
///
/// The unit is the largest one the count reaches, shown with three
/// decimals: `ByteSize(1536)` displays as `1.500kB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteSize(pub u64);

impl std::fmt::Display for ByteSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self.0;
        let (scaled, unit) = if bytes >> 30 != 0 {
            (bytes as f64 / (1u64 << 30) as f64, "GB")
        } else if bytes >> 20 != 0 {
            (bytes as f64 / (1u64 << 20) as f64, "MB")
        } else if bytes >> 10 != 0 {
            (bytes as f64 / (1u64 << 10) as f64, "kB")
        } else {
            (bytes as f64, "B")
        };
        write!(f, "{scaled:.3}{unit}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_counts_are_bytes() {
        assert_eq!(ByteSize(0).to_string(), "0.000B");
        assert_eq!(ByteSize(1023).to_string(), "1023.000B");
    }

    #[test]
    fn unit_boundaries() {
        assert_eq!(ByteSize(1024).to_string(), "1.000kB");
        assert_eq!(ByteSize(1536).to_string(), "1.500kB");
        assert_eq!(ByteSize(1 << 20).to_string(), "1.000MB");
        assert_eq!(ByteSize(3 << 30).to_string(), "3.000GB");
    }

    #[test]
    fn gigabytes_do_not_roll_over() {
        assert_eq!(ByteSize(2048 << 30).to_string(), "2048.000GB");
    }
}
