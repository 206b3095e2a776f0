//! Tests for the ketama hashring.
//!
//! # Test Strategy
//!
//! 1. **Construction**: replication floor, sorting, section layout
//! 2. **Replica sets**: distinctness, AZ balance
//! 3. **Lookups**: boundaries, determinism, distribution
//! 4. **Consistency**: adding a node moves only a fraction of series

use corelib::{Endpoint, Error, Hashring, Label};
use proptest::prelude::*;
use replication::{KetamaHashring, SECTIONS_PER_NODE};
use std::collections::HashSet;

fn endpoints(addrs: &[&str]) -> Vec<Endpoint> {
    addrs.iter().map(|a| Endpoint::new(*a)).collect()
}

fn series(i: usize) -> Vec<Label> {
    vec![
        Label::new("__name__", "up"),
        Label::new("instance", format!("host-{i}")),
    ]
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_rejects_fewer_endpoints_than_replication_factor() {
    let err = KetamaHashring::new(endpoints(&["n1", "n2"]), 3).unwrap_err();
    assert_eq!(
        err,
        Error::NotEnoughEndpoints {
            endpoints: 2,
            replication_factor: 3
        }
    );
}

#[test]
fn test_default_sections_per_node() {
    let ring = KetamaHashring::new(endpoints(&["n1", "n2", "n3"]), 3).unwrap();
    assert_eq!(ring.sections().len(), 3 * SECTIONS_PER_NODE);
    assert_eq!(ring.replication_factor(), 3);
}

#[test]
fn test_nodes_sorted_by_address() {
    let ring = KetamaHashring::with_sections(endpoints(&["c", "a", "b"]), 8, 1).unwrap();
    let addrs: Vec<&str> = ring.nodes().iter().map(|e| e.address.as_str()).collect();
    assert_eq!(addrs, vec!["a", "b", "c"]);
}

#[test]
fn test_empty_ring() {
    let ring = KetamaHashring::new(Vec::new(), 0).unwrap();
    assert!(ring.nodes().is_empty());
    assert_eq!(
        ring.get_n("t", &series(0), 0),
        Err(Error::InsufficientNodes { have: 0, want: 1 })
    );
}

// ============================================================================
// Replica Sets
// ============================================================================

#[test]
fn test_replicas_are_distinct() {
    let ring = KetamaHashring::with_sections(endpoints(&["n1", "n2", "n3", "n4", "n5"]), 100, 3)
        .unwrap();
    for section in ring.sections() {
        let unique: HashSet<_> = section.replicas.iter().collect();
        assert_eq!(unique.len(), 3);
        assert_eq!(section.replicas[0], section.endpoint_index);
    }

    for i in 0..200 {
        let got = ring.replicas("tenant", &series(i), 3).unwrap();
        let unique: HashSet<_> = got.iter().map(|e| &e.address).collect();
        assert_eq!(unique.len(), 3, "series {i}");
    }
}

#[test]
fn test_az_balance_two_zones() {
    let eps = vec![
        Endpoint::with_az("a", "az1"),
        Endpoint::with_az("b", "az2"),
        Endpoint::with_az("c", "az2"),
    ];
    let ring = KetamaHashring::with_sections(eps, 200, 2).unwrap();
    for section in ring.sections() {
        let zones: Vec<&str> = section
            .replicas
            .iter()
            .map(|&i| ring.nodes()[i].az.as_str())
            .collect();
        assert_ne!(zones[0], zones[1], "section {section}");
    }
}

#[test]
fn test_az_balance_three_zones() {
    let eps = vec![
        Endpoint::with_az("a1", "az1"),
        Endpoint::with_az("a2", "az1"),
        Endpoint::with_az("b1", "az2"),
        Endpoint::with_az("b2", "az2"),
        Endpoint::with_az("c1", "az3"),
        Endpoint::with_az("c2", "az3"),
    ];
    let ring = KetamaHashring::with_sections(eps, 100, 3).unwrap();
    for section in ring.sections() {
        let zones: HashSet<&str> = section
            .replicas
            .iter()
            .map(|&i| ring.nodes()[i].az.as_str())
            .collect();
        assert_eq!(zones.len(), 3, "section {section}");
    }
}

#[test]
fn test_single_zone_uses_plain_ring_order() {
    let eps = vec![
        Endpoint::with_az("a", "az1"),
        Endpoint::with_az("b", "az1"),
        Endpoint::with_az("c", "az1"),
    ];
    let ring = KetamaHashring::with_sections(eps, 50, 3).unwrap();
    assert!(ring.sections().iter().all(|s| s.replicas.len() == 3));
}

#[test]
fn test_unbalanced_zones_still_fill_replicas() {
    let eps = vec![
        Endpoint::with_az("a1", "az1"),
        Endpoint::with_az("a2", "az1"),
        Endpoint::with_az("a3", "az1"),
        Endpoint::with_az("b1", "az2"),
    ];
    let ring = KetamaHashring::with_sections(eps, 50, 4).unwrap();
    for section in ring.sections() {
        let unique: HashSet<_> = section.replicas.iter().collect();
        assert_eq!(unique.len(), 4);
    }
}

// ============================================================================
// Lookups
// ============================================================================

#[test]
fn test_boundary() {
    let ring = KetamaHashring::with_sections(endpoints(&["n1", "n2", "n3"]), 50, 3).unwrap();
    for n in 0..3 {
        assert!(ring.get_n("t1", &series(1), n).is_ok());
    }
    assert_eq!(
        ring.get_n("t1", &series(1), 3),
        Err(Error::InsufficientNodes { have: 3, want: 4 })
    );
}

#[test]
fn test_distribution_roughly_balanced() {
    let ring = KetamaHashring::new(endpoints(&["n1", "n2", "n3"]), 1).unwrap();
    let mut counts = std::collections::HashMap::new();
    let total = 9_000;
    for i in 0..total {
        let ep = ring.get("tenant", &series(i)).unwrap();
        *counts.entry(ep.address.clone()).or_insert(0usize) += 1;
    }
    for (addr, count) in counts {
        let ratio = count as f64 / total as f64;
        assert!((0.2..=0.5).contains(&ratio), "{addr} got {count}/{total}");
    }

    for (ep, share) in ring.ownership() {
        assert!((0.2..=0.5).contains(&share), "{ep} owns {share:.3}");
    }
}

#[test]
fn test_adding_node_moves_fraction_of_series() {
    let before = KetamaHashring::new(endpoints(&["n1", "n2", "n3"]), 1).unwrap();
    let after = KetamaHashring::new(endpoints(&["n1", "n2", "n3", "n4"]), 1).unwrap();

    let total = 5_000;
    let moved = (0..total)
        .filter(|&i| {
            before.get("t", &series(i)).unwrap().address != after.get("t", &series(i)).unwrap().address
        })
        .count();

    // ~1/4 should move.
    let ratio = moved as f64 / total as f64;
    assert!((0.1..=0.4).contains(&ratio), "moved {moved}/{total}");
}

#[test]
fn test_concurrent_lookups_agree() {
    let ring = KetamaHashring::with_sections(endpoints(&["n1", "n2", "n3", "n4"]), 100, 2).unwrap();
    let expected: Vec<Endpoint> = (0..100)
        .map(|i| ring.get_n("t", &series(i), 1).unwrap().clone())
        .collect();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for (i, want) in expected.iter().enumerate() {
                    assert_eq!(ring.get_n("t", &series(i), 1).unwrap(), want);
                }
            });
        }
    });
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_lookup_is_deterministic_and_distinct(
        tenant in "[a-z]{1,8}",
        value in "[a-z0-9]{0,12}",
    ) {
        let ring = KetamaHashring::with_sections(endpoints(&["n1", "n2", "n3", "n4"]), 32, 3).unwrap();
        let labels = vec![Label::new("job", value)];

        let first = ring.replicas(&tenant, &labels, 3).unwrap();
        let again = ring.replicas(&tenant, &labels, 3).unwrap();
        prop_assert_eq!(&first, &again);

        let unique: HashSet<_> = first.iter().map(|e| &e.address).collect();
        prop_assert_eq!(unique.len(), 3);
    }
}
