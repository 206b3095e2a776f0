//! AZ-aware replica placement.
//!
//! Replicas for a section are found by walking the ring clockwise from the
//! section itself and collecting distinct endpoints until the replication
//! factor is reached. While walking, an endpoint is passed over when its
//! availability zone already holds more replicas than the least occupied
//! zone, so replicas spread across zones before doubling up in one.
//!
//! # Algorithm
//!
//! 1. Start every known zone at a tally of zero
//! 2. Walk forward from the section, skipping endpoints already picked
//! 3. Skip endpoints whose zone is over-represented
//! 4. Pick the rest until `replication_factor` endpoints are chosen
//!
//! If a whole lap passes without a pick, zone balancing cannot be satisfied
//! any more (e.g. one zone holds most endpoints) and the remaining replicas
//! are taken in plain ring order.
//!
//! # Performance
//!
//! - **Time**: O(s * r) per section in the common case, s = sections, r = RF
//! - **Space**: O(z) per section, z = number of zones

use corelib::Section;
use std::collections::HashMap;
use std::sync::Arc;

/// Running number of replicas per availability zone for one section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AzSpread {
    counts: HashMap<Arc<str>, u64>,
}

impl AzSpread {
    /// Tally with every zone of `zones` present at zero.
    pub fn new<'a>(zones: impl IntoIterator<Item = &'a Arc<str>>) -> Self {
        Self {
            counts: zones.into_iter().map(|z| (Arc::clone(z), 0)).collect(),
        }
    }

    pub fn count(&self, az: &str) -> u64 {
        self.counts.get(az).copied().unwrap_or(0)
    }

    /// Tally of the zone holding the fewest replicas.
    pub fn least_occupied(&self) -> u64 {
        self.counts.values().copied().min().unwrap_or(0)
    }

    /// True when adding to `az` should wait for other zones to catch up.
    pub fn is_over_represented(&self, az: &str) -> bool {
        let count = self.count(az);
        self.counts.len() > 1 && count > 0 && count > self.least_occupied()
    }

    pub fn add(&mut self, az: &Arc<str>) {
        *self.counts.entry(Arc::clone(az)).or_insert(0) += 1;
    }
}

/// Fill the replica list of every section of a sorted ring.
///
/// `sections` must already be sorted by token. The caller guarantees at
/// least `replication_factor` distinct endpoints own sections.
pub fn place_replicas(sections: &mut [Section], replication_factor: usize) {
    let mut zones: Vec<Arc<str>> = sections.iter().map(|s| Arc::clone(&s.az)).collect();
    zones.sort();
    zones.dedup();
    let spread = AzSpread::new(&zones);

    for i in 0..sections.len() {
        let replicas = select_replicas(sections, i, replication_factor, &spread);
        sections[i].replicas = replicas;
    }
}

fn select_replicas(
    sections: &[Section],
    start: usize,
    replication_factor: usize,
    empty_spread: &AzSpread,
) -> Vec<usize> {
    let mut replicas = Vec::with_capacity(replication_factor);
    let mut spread = empty_spread.clone();
    let mut balanced = true;
    let mut since_last_pick = 0;
    let mut j = start;

    while replicas.len() < replication_factor {
        if since_last_pick >= sections.len() {
            if !balanced {
                break;
            }
            balanced = false;
            since_last_pick = 0;
        }

        let candidate = &sections[j];
        j = (j + 1) % sections.len();
        since_last_pick += 1;

        if replicas.contains(&candidate.endpoint_index) {
            continue;
        }
        if balanced && spread.is_over_represented(&candidate.az) {
            continue;
        }

        replicas.push(candidate.endpoint_index);
        spread.add(&candidate.az);
        since_last_pick = 0;
    }

    replicas
}
