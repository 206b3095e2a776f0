//! Ring positions.
//!
//! Both series keys and ketama sections are mapped onto the same `u64` token
//! space so a lookup is a plain comparison of tokens.

use crate::labels::{hash_with_prefix, Label};
use xxhash_rust::xxh64::xxh64;

/// Position on the hash ring.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Token(pub u64);

impl Token {
    /// Token of a tenant's series.
    #[inline]
    pub fn for_series(tenant: &str, labels: &[Label]) -> Self {
        Token(hash_with_prefix(tenant, labels))
    }

    /// Token of the `ordinal`-th virtual section of an endpoint.
    ///
    /// Hashes `"{address}:{ordinal}"`. Ordinals start at 1.
    pub fn for_section(address: &str, ordinal: usize) -> Self {
        let key = format!("{}:{}", address, ordinal);
        Token(xxh64(key.as_bytes(), 0))
    }

    /// Clockwise distance from `self` to `other`, wrapping at `u64::MAX`.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> u64 {
        other.0.wrapping_sub(self.0)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
