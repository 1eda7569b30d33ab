//! # Check-Code Encoder
//!
//! Computes the 8-bit check code stored alongside each 64-bit memory line.
//!
//! Check bit `b` is the parity of the data word ANDed with the parity-check
//! mask `PARITY_MASKS[b]`, where mask bit `63 - k` lines up with data bit
//! `k`. The masks are the values the memory controller expects and must not
//! be reinterpreted as a textbook Hamming layout.
//!
//! Only encoding is provided. Nothing in hexcut reads check codes back.

use crate::layout::ECC_LINE_WIDTH;

/// Parity-check masks, one per check bit, in stored bit order.
pub const PARITY_MASKS: [u64; 8] = [
    0x5555_5555_5555_5555,
    0x5555_5555_aaaa_aaaa,
    0x5555_aaaa_5555_aaaa,
    0x55aa_55aa_55aa_55aa,
    0xda5a_5a5a_5a5a_5a5a,
    0xe666_6666_6666_6666,
    0x6aaa_aaaa_aaaa_aaa9,
    0xa996_9669_9669_6995,
];

/// `PARITY_MASKS` with bit `k` moved to `63 - k`, so data bits and mask
/// bits line up directly.
const ALIGNED_MASKS: [u64; 8] = {
    let mut aligned = [0u64; 8];
    let mut b = 0;
    while b < aligned.len() {
        aligned[b] = PARITY_MASKS[b].reverse_bits();
        b += 1;
    }
    aligned
};

/// Check code for one 64-bit data word.
pub fn encode(word: u64) -> u8 {
    ALIGNED_MASKS
        .iter()
        .enumerate()
        .fold(0u8, |code, (b, mask)| {
            code | ((((word & mask).count_ones() & 1) as u8) << b)
        })
}

/// Check code for an 8-byte line, byte 0 being the least significant.
pub fn encode_line(line: &[u8; ECC_LINE_WIDTH]) -> u8 {
    encode(u64::from_le_bytes(*line))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The encoder agrees with the bit-by-bit definition.
        #[test]
        fn matches_bitwise_definition(word in any::<u64>()) {
            prop_assert_eq!(encode(word), super::tests::reference(word));
        }

        /// Parity is linear over XOR.
        #[test]
        fn encode_is_xor_linear(a in any::<u64>(), b in any::<u64>()) {
            prop_assert_eq!(encode(a ^ b), encode(a) ^ encode(b));
        }
    }
}
