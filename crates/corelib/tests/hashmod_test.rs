//! Tests for the hash-modulo and single-node hashrings.
//!
//! # Test Strategy
//!
//! 1. **Basic functionality**: construction, sorting, lookup
//! 2. **Edge cases**: replica rank boundaries, AZ rejection, empty rings
//! 3. **Properties**: determinism across calls and threads

use corelib::{hash_with_prefix, Endpoint, Error, Hashring, Label, SimpleHashring, SingleNodeHashring};
use proptest::prelude::*;

fn endpoints(addrs: &[&str]) -> Vec<Endpoint> {
    addrs.iter().map(|a| Endpoint::new(*a)).collect()
}

fn series() -> Vec<Label> {
    vec![Label::new("__name__", "http_requests_total"), Label::new("job", "api")]
}

// ============================================================================
// Basic Functionality Tests
// ============================================================================

#[test]
fn test_hashmod_end_to_end() {
    let ring = SimpleHashring::new(endpoints(&["n3", "n1", "n2"])).unwrap();
    let labels = series();

    let expected = (hash_with_prefix("t1", &labels) % 3) as usize;
    let got = ring.get_n("t1", &labels, 0).unwrap();
    assert_eq!(got.address, ["n1", "n2", "n3"][expected]);

    assert_eq!(
        ring.get_n("t1", &labels, 3),
        Err(Error::InsufficientNodes { have: 3, want: 4 })
    );
}

#[test]
fn test_hashmod_replicas_are_consecutive() {
    let ring = SimpleHashring::new(endpoints(&["n1", "n2", "n3", "n4"])).unwrap();
    let labels = series();
    let base = hash_with_prefix("tenant", &labels);

    for n in 0..4u64 {
        let idx = (base.wrapping_add(n) % 4) as usize;
        assert_eq!(ring.get_n("tenant", &labels, n).unwrap(), &ring.nodes()[idx]);
    }
}

#[test]
fn test_hashmod_replicas_are_distinct() {
    let ring = SimpleHashring::new(endpoints(&["n1", "n2", "n3"])).unwrap();
    let replicas = ring.replicas("tenant", &series(), 3).unwrap();
    let mut addrs: Vec<&str> = replicas.iter().map(|e| e.address.as_str()).collect();
    addrs.sort();
    addrs.dedup();
    assert_eq!(addrs.len(), 3);
}

#[test]
fn test_get_is_rank_zero() {
    let ring = SimpleHashring::new(endpoints(&["n1", "n2", "n3"])).unwrap();
    assert_eq!(
        ring.get("t", &series()).unwrap(),
        ring.get_n("t", &series(), 0).unwrap()
    );
}

// ============================================================================
// Edge Cases
// ============================================================================

#[test]
fn test_hashmod_rejects_any_az() {
    let eps = vec![Endpoint::new("n1"), Endpoint::with_az("n2", "az-b")];
    assert!(matches!(
        SimpleHashring::new(eps),
        Err(Error::AzUnsupported { .. })
    ));
}

#[test]
fn test_replicas_stop_at_first_error() {
    let ring = SimpleHashring::new(endpoints(&["n1", "n2"])).unwrap();
    assert_eq!(
        ring.replicas("t", &series(), 3),
        Err(Error::InsufficientNodes { have: 2, want: 3 })
    );
}

#[test]
fn test_single_node_ring() {
    let ring = SingleNodeHashring::new("localhost:10901");
    for tenant in ["a", "b", "c"] {
        assert_eq!(ring.get(tenant, &series()).unwrap().address, "localhost:10901");
    }
    assert_eq!(
        ring.get_n("a", &series(), 5),
        Err(Error::InsufficientNodes { have: 1, want: 6 })
    );
}

#[test]
fn test_concurrent_lookups_agree() {
    let ring = SimpleHashring::new(endpoints(&["n1", "n2", "n3", "n4", "n5"])).unwrap();
    let labels = series();
    let expected = ring.get("t1", &labels).unwrap().clone();

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..1000 {
                    assert_eq!(ring.get("t1", &labels).unwrap(), &expected);
                }
            });
        }
    });
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_hashmod_is_deterministic(
        tenant in "[a-z]{1,12}",
        name in "[a-z_]{1,10}",
        value in "[a-z0-9]{0,10}",
        n in 0u64..5,
    ) {
        let ring = SimpleHashring::new(endpoints(&["n1", "n2", "n3", "n4", "n5"])).unwrap();
        let labels = vec![Label::new(name, value)];
        let first = ring.get_n(&tenant, &labels, n).unwrap().clone();
        for _ in 0..3 {
            prop_assert_eq!(ring.get_n(&tenant, &labels, n).unwrap(), &first);
        }
    }

    #[test]
    fn prop_hashmod_boundary(n in 0u64..64, size in 1usize..8) {
        let addrs: Vec<String> = (0..size).map(|i| format!("n{i}")).collect();
        let ring = SimpleHashring::new(addrs.iter().map(Endpoint::new).collect()).unwrap();
        let res = ring.get_n("t", &[], n);
        if n >= size as u64 {
            prop_assert_eq!(res, Err(Error::InsufficientNodes { have: size as u64, want: n + 1 }));
        } else {
            prop_assert!(res.is_ok());
        }
    }
}
