//! 160-bit Chord identifiers and the ring arithmetic built on top of them.

use serde::Serialize;
use sha1::{Digest, Sha1};
use std::fmt;

/// Number of bits in a Chord identifier (one SHA-1 digest).
pub const ID_BITS: u32 = 160;
const ID_BYTES: usize = 20;

/// A 160-bit unsigned integer, stored big-endian, compared and added
/// modulo 2^160. This is the Chord ring's address space.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChordId([u8; ID_BYTES]);

impl ChordId {
    pub const ZERO: ChordId = ChordId([0u8; ID_BYTES]);

    /// SHA-1 of `bytes`, interpreted as a big-endian 160-bit integer with
    /// all bits retained.
    pub fn hash(bytes: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(bytes);
        let digest = hasher.finalize();
        let mut out = [0u8; ID_BYTES];
        out.copy_from_slice(&digest);
        ChordId(out)
    }

    /// Parse exactly 40 hex characters into an id override.
    pub fn from_hex40(s: &str) -> Option<Self> {
        if s.len() != ID_BYTES * 2 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let mut out = [0u8; ID_BYTES];
        for i in 0..ID_BYTES {
            out[i] = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(ChordId(out))
    }

    pub fn as_bytes(&self) -> &[u8; ID_BYTES] {
        &self.0
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != ID_BYTES {
            return None;
        }
        let mut out = [0u8; ID_BYTES];
        out.copy_from_slice(bytes);
        Some(ChordId(out))
    }

    /// `(self + 2^(k-1)) mod 2^160`, for `k` in `1..=160`.
    pub fn jump(&self, k: u32) -> Self {
        assert!((1..=ID_BITS).contains(&k), "finger index out of range: {k}");
        let mut addend = [0u8; ID_BYTES];
        let bit = k - 1;
        let byte_index = ID_BYTES - 1 - (bit / 8) as usize;
        addend[byte_index] = 1u8 << (bit % 8);
        self.wrapping_add(&addend)
    }

    fn wrapping_add(&self, other: &[u8; ID_BYTES]) -> Self {
        let mut out = [0u8; ID_BYTES];
        let mut carry: u16 = 0;
        for i in (0..ID_BYTES).rev() {
            let sum = self.0[i] as u16 + other[i] as u16 + carry;
            out[i] = sum as u8;
            carry = sum >> 8;
        }
        // Final carry is the mod-2^160 overflow bit; discarded by design.
        ChordId(out)
    }
}

impl fmt::Debug for ChordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChordId({self})")
    }
}

impl fmt::Display for ChordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for ChordId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Tests whether `x` lies on the clockwise arc from `a` to `b`,
/// excluding `a`, including `b` iff `inclusive_right`.
///
/// `a == b` is a special case: the arc is empty unless `inclusive_right`,
/// in which case it is the singleton `{b}`.
pub fn in_between(x: &ChordId, a: &ChordId, b: &ChordId, inclusive_right: bool) -> bool {
    if a == b {
        return inclusive_right && x == b;
    }
    if a < b {
        (x > a && x < b) || (inclusive_right && x == b)
    } else {
        (x > a) || (x < b) || (inclusive_right && x == b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u8) -> ChordId {
        let mut bytes = [0u8; ID_BYTES];
        bytes[ID_BYTES - 1] = n;
        ChordId(bytes)
    }

    #[test]
    fn jump_adds_power_of_two() {
        let zero = ChordId::ZERO;
        assert_eq!(zero.jump(1), id(1));
        assert_eq!(zero.jump(2), id(2));
        assert_eq!(zero.jump(3), id(4));
    }

    #[test]
    fn jump_wraps_at_2_pow_160() {
        let max = ChordId([0xffu8; ID_BYTES]);
        assert_eq!(max.jump(1), ChordId::ZERO);
    }

    #[test]
    fn in_between_same_endpoint() {
        let a = id(5);
        assert!(in_between(&a, &a, &a, true));
        assert!(!in_between(&a, &a, &a, false));
    }

    #[test]
    fn in_between_non_wrapping_arc() {
        let a = id(10);
        let b = id(20);
        assert!(!in_between(&id(10), &a, &b, true));
        assert!(in_between(&id(15), &a, &b, true));
        assert!(in_between(&id(20), &a, &b, true));
        assert!(!in_between(&id(20), &a, &b, false));
        assert!(!in_between(&id(25), &a, &b, true));
    }

    #[test]
    fn in_between_wrapping_arc() {
        let a = id(250);
        let b = id(5);
        assert!(in_between(&id(255), &a, &b, true));
        assert!(in_between(&id(0), &a, &b, true));
        assert!(in_between(&id(5), &a, &b, true));
        assert!(!in_between(&id(5), &a, &b, false));
        assert!(!in_between(&id(10), &a, &b, true));
        assert!(!in_between(&id(250), &a, &b, true));
    }

    #[test]
    fn hash_is_deterministic_and_full_width() {
        let a = ChordId::hash(b"127.0.0.1:5000");
        let b = ChordId::hash(b"127.0.0.1:5000");
        assert_eq!(a, b);
        let c = ChordId::hash(b"127.0.0.1:5001");
        assert_ne!(a, c);
    }

    #[test]
    fn hex40_round_trip() {
        let hex = "a".repeat(40);
        let parsed = ChordId::from_hex40(&hex).unwrap();
        assert_eq!(parsed.to_string(), hex);
        assert!(ChordId::from_hex40("abc").is_none());
        assert!(ChordId::from_hex40(&"g".repeat(40)).is_none());
    }
}
