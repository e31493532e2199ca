// construct_uint! expands to code that trips a few clippy lints
#![allow(clippy::manual_div_ceil)]
#![allow(clippy::assign_op_pattern)]

use uint::construct_uint;

use crate::error::LedgerError;

construct_uint! {
    /// 256-bit unsigned integer, big enough to hold any SHA-256 digest.
    pub struct U256(4);
}

/// Number of bits in a SHA-256 digest.
const HASH_BITS: u32 = 256;

/// Comparison threshold derived from a difficulty (bit count).
///
/// A hash is valid when, read as a big-endian integer, it is strictly below
/// `threshold = 1 << (256 - difficulty)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashTarget {
    difficulty: u32,
    threshold: U256,
}

impl HashTarget {
    /// Build a target for `difficulty`, rejecting the degenerate values
    /// 0 (every hash passes) and >= 256 (no hash passes).
    pub fn new(difficulty: u32) -> crate::error::Result<Self> {
        let threshold = Self::derive(difficulty)?;
        Ok(Self {
            difficulty,
            threshold,
        })
    }

    /// Pure threshold derivation: `1 << (256 - difficulty)`.
    pub fn derive(difficulty: u32) -> crate::error::Result<U256> {
        if difficulty == 0 || difficulty >= HASH_BITS {
            return Err(LedgerError::InvalidDifficulty(difficulty));
        }
        Ok(U256::one() << (HASH_BITS - difficulty) as usize)
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    pub fn threshold(&self) -> U256 {
        self.threshold
    }

    /// True when `hash` (big-endian) is strictly below the threshold.
    #[inline]
    pub fn is_met_by(&self, hash: &[u8; 32]) -> bool {
        U256::from_big_endian(hash) < self.threshold
    }

    /// Threshold as 32 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        self.threshold().to_big_endian(&mut out);
        out
    }

    /// Threshold as lowercase hex, for display.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_difficulties() {
        assert!(matches!(
            HashTarget::new(0),
            Err(LedgerError::InvalidDifficulty(0))
        ));
        assert!(matches!(
            HashTarget::new(256),
            Err(LedgerError::InvalidDifficulty(256))
        ));
        assert!(HashTarget::new(1).is_ok());
        assert!(HashTarget::new(255).is_ok());
    }

    #[test]
    fn threshold_is_single_bit() {
        let t = HashTarget::new(12).unwrap();
        let bytes = t.to_bytes();
        // 1 << 244: bit 4 of the second byte
        assert_eq!(bytes[0], 0x00);
        assert_eq!(bytes[1], 0x10);
        assert!(bytes[2..].iter().all(|b| *b == 0));
        assert_eq!(t.threshold(), U256::one() << 244);
    }

    #[test]
    fn threshold_shrinks_as_difficulty_grows() {
        let mut prev = HashTarget::derive(1).unwrap();
        for d in 2..256 {
            let next = HashTarget::derive(d).unwrap();
            assert!(prev > next, "difficulty {} should lower threshold", d);
            prev = next;
        }
    }

    #[test]
    fn threshold_matches_decimal_form() {
        let expected = U256::from_dec_str("256").unwrap();
        assert_eq!(HashTarget::derive(248).unwrap(), expected);
        assert_eq!(HashTarget::new(248).unwrap().threshold().to_string(), "256");
    }

    #[test]
    fn comparison_is_strict() {
        let t = HashTarget::new(8).unwrap();
        let at_threshold = t.to_bytes();
        assert!(!t.is_met_by(&at_threshold));

        let mut below = [0xFF; 32];
        below[0] = 0x00;
        assert!(t.is_met_by(&below));

        let mut above = [0x00; 32];
        above[0] = 0x01;
        above[31] = 0x01;
        assert!(!t.is_met_by(&above));
    }
}
