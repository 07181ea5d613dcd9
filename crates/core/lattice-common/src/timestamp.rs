//! Opaque 64-bit timestamp value used to order revisions across the
//! ecosystem.
//!
//! The value is a plain tick count; the byte representation is big-endian
//! so that byte-wise comparison matches numeric ordering.

use crate::{LatticeError, LatticeResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonic revision marker wrapping a 64-bit tick count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The zero timestamp, ordered before every non-zero value.
    pub const ZERO: Timestamp = Timestamp(0);

    /// Creates a timestamp from a raw tick count.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw tick count.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Big-endian byte representation.
    #[must_use]
    pub const fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Reconstructs a timestamp from its big-endian bytes.
    #[must_use]
    pub const fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }

    /// The later of two timestamps.
    #[must_use]
    pub fn max(self, other: Timestamp) -> Timestamp {
        if self.0 < other.0 { other } else { self }
    }

    /// Whether this is the zero timestamp.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl From<u64> for Timestamp {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<i64> for Timestamp {
    fn from(value: i64) -> Self {
        Self(value as u64)
    }
}

impl From<Timestamp> for u64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl From<Timestamp> for [u8; 8] {
    fn from(ts: Timestamp) -> Self {
        ts.to_be_bytes()
    }
}

impl TryFrom<&[u8]> for Timestamp {
    type Error = LatticeError;

    fn try_from(bytes: &[u8]) -> LatticeResult<Self> {
        let array: [u8; 8] = bytes
            .try_into()
            .map_err(|_| LatticeError::invalid_input(format!("expected 8 bytes, got {}", bytes.len())))?;
        Ok(Self::from_be_bytes(array))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        let a = Timestamp::new(1);
        let b = Timestamp::new(2);
        assert!(a < b);
        assert!(b >= a);
        assert_eq!(a.max(b), b);
        assert_eq!(b.max(a), b);
        assert!(Timestamp::ZERO < a);
        assert!(Timestamp::ZERO.is_zero());
    }

    #[test]
    fn test_byte_round_trip() {
        let ts = Timestamp::new(0x0102_0304_0506_0708);
        let bytes = ts.to_be_bytes();
        assert_eq!(bytes, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(Timestamp::from_be_bytes(bytes), ts);
        assert_eq!(Timestamp::try_from(&bytes[..]).unwrap(), ts);
    }

    #[test]
    fn test_byte_order_matches_numeric_order() {
        let a = Timestamp::new(0x00FF);
        let b = Timestamp::new(0x0100);
        assert!(a.to_be_bytes() < b.to_be_bytes());
    }

    #[test]
    fn test_try_from_rejects_wrong_length() {
        let err = Timestamp::try_from(&[1u8, 2, 3][..]).unwrap_err();
        assert!(matches!(err, LatticeError::InvalidInput(_)));
    }

    #[test]
    fn test_display_is_fixed_width_hex() {
        assert_eq!(Timestamp::new(0xAB).to_string(), "00000000000000ab");
        assert_eq!(Timestamp::ZERO.to_string(), "0000000000000000");
    }

    #[test]
    fn test_serde_transparent() {
        let ts = Timestamp::new(42);
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "42");
        assert_eq!(serde_json::from_str::<Timestamp>("42").unwrap(), ts);
    }

    #[test]
    fn test_negative_i64_wraps() {
        let ts = Timestamp::from(-1_i64);
        assert_eq!(ts.value(), u64::MAX);
    }
}
