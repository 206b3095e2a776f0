//! Ring sections.
//!
//! A section is one virtual position of an endpoint on a ketama ring. Each
//! endpoint owns `sections_per_node` of them, which smooths the share of the
//! token space every endpoint ends up owning.
//!
//! # Memory Layout
//!
//! Besides the token and the owner, every section carries the replica list
//! that was computed for it when the ring was built, so a lookup never has
//! to walk the ring:
//!
//! ```text
//! Section {
//!     token: Token(u64),        // 8 bytes
//!     endpoint_index: usize,    // 8 bytes
//!     az: Arc<str>,             // shared with the owner's other sections
//!     replicas: Vec<usize>,     // replication_factor entries
//! }
//! ```

use crate::token::Token;
use std::sync::Arc;

/// A virtual position on the ring owned by exactly one endpoint.
///
/// # Invariants
///
/// - `replicas` holds distinct endpoint indices and starts with the first
///   owner found clockwise from `token` (the section's own endpoint).
/// - `replicas` is filled once while the ring is built and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Position on the ring, derived from `"address:ordinal"`.
    pub token: Token,
    /// Index of the owning endpoint in the ring's endpoint list.
    pub endpoint_index: usize,
    /// Availability zone of the owning endpoint.
    pub az: Arc<str>,
    /// Endpoint indices that hold replicas for keys landing on this section.
    pub replicas: Vec<usize>,
}

impl Section {
    /// Create the `ordinal`-th section of an endpoint with an empty replica list.
    pub fn new(address: &str, ordinal: usize, endpoint_index: usize, az: Arc<str>) -> Self {
        Self {
            token: Token::for_section(address, ordinal),
            endpoint_index,
            az,
            replicas: Vec::new(),
        }
    }

    #[inline]
    pub fn token(&self) -> Token {
        self.token
    }

    /// Endpoint index holding replica `n` of this section, if any.
    #[inline]
    pub fn replica(&self, n: usize) -> Option<usize> {
        self.replicas.get(n).copied()
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Section(token={}, endpoint={}, replicas={:?})",
            self.token, self.endpoint_index, self.replicas
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_creation() {
        let s = Section::new("node1:10901", 1, 0, Arc::from("az1"));
        assert_eq!(s.token(), Token::for_section("node1:10901", 1));
        assert_eq!(s.endpoint_index, 0);
        assert_eq!(&*s.az, "az1");
        assert_eq!(s.replica(0), None);
    }

    #[test]
    fn test_sections_order_by_token() {
        let mut a = Section::new("a", 1, 0, Arc::from(""));
        let mut b = Section::new("b", 1, 1, Arc::from(""));
        a.token = Token(100);
        b.token = Token(200);
        assert!(a.token() < b.token());
    }
}
