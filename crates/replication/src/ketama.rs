//! Ketama-style consistent hashing ring.
//!
//! # Structure
//!
//! ```text
//!            token space (u64, wraps)
//!   0 ──[s0]────[s1]──[s2]───────[s3]──── u64::MAX ─┐
//!        │       │     │          │                 │
//!        └ replicas precomputed per section ◄───────┘
//! ```
//!
//! A series is hashed onto the same token space; the first section whose
//! token is `>=` the series token owns it, wrapping to the first section
//! past the end. Rank `n` of the series is entry `n` of that section's
//! replica list, so a lookup is one binary search and one index.

use crate::placement::place_replicas;
use corelib::{Endpoint, Error, Hashring, Label, Result, Section, Token};
use std::sync::Arc;
use tracing::debug;

/// Number of sections every endpoint owns on the ring.
///
/// More sections give a smoother series distribution at the cost of memory
/// (one section plus `replication_factor` indices each).
pub const SECTIONS_PER_NODE: usize = 1000;

/// Consistent hashing ring with AZ-aware replica sets.
#[derive(Debug, Clone)]
pub struct KetamaHashring {
    /// Members, sorted by address. Sections refer to them by index.
    endpoints: Vec<Endpoint>,
    /// All sections, sorted by token.
    sections: Vec<Section>,
    replication_factor: u64,
}

impl KetamaHashring {
    /// Build a ring with [`SECTIONS_PER_NODE`] sections per endpoint.
    pub fn new(endpoints: Vec<Endpoint>, replication_factor: u64) -> Result<Self> {
        Self::with_sections(endpoints, SECTIONS_PER_NODE, replication_factor)
    }

    /// Build a ring with a custom number of sections per endpoint.
    ///
    /// Fails when there are fewer endpoints than `replication_factor`.
    pub fn with_sections(
        mut endpoints: Vec<Endpoint>,
        sections_per_node: usize,
        replication_factor: u64,
    ) -> Result<Self> {
        if (endpoints.len() as u64) < replication_factor {
            return Err(Error::NotEnoughEndpoints {
                endpoints: endpoints.len(),
                replication_factor,
            });
        }
        endpoints.sort_by(|a, b| a.address.cmp(&b.address));

        let sections_per_node = sections_per_node.max(1);
        let mut sections = Vec::with_capacity(endpoints.len() * sections_per_node);
        for (endpoint_index, endpoint) in endpoints.iter().enumerate() {
            let az: Arc<str> = Arc::from(endpoint.az.as_str());
            for ordinal in 1..=sections_per_node {
                sections.push(Section::new(
                    &endpoint.address,
                    ordinal,
                    endpoint_index,
                    Arc::clone(&az),
                ));
            }
        }
        sections.sort_by_key(|s| s.token);
        place_replicas(&mut sections, replication_factor as usize);

        debug!(
            endpoints = endpoints.len(),
            sections = sections.len(),
            replication_factor,
            "built ketama hashring"
        );

        Ok(Self {
            endpoints,
            sections,
            replication_factor,
        })
    }

    /// Sections of the ring in token order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn replication_factor(&self) -> u64 {
        self.replication_factor
    }

    /// Index of the section owning `token`.
    fn section_for(&self, token: Token) -> usize {
        let i = self.sections.partition_point(|s| s.token < token);
        if i == self.sections.len() {
            0
        } else {
            i
        }
    }

    /// Fraction of the token space each endpoint owns as primary.
    ///
    /// Section `i` owns the range `(token[i-1], token[i]]`; the first
    /// section also owns the wrap-around range past the last token.
    pub fn ownership(&self) -> Vec<(&Endpoint, f64)> {
        const RING_SIZE: f64 = 18_446_744_073_709_551_616.0; // 2^64

        let mut owned = vec![0f64; self.endpoints.len()];
        match self.sections.len() {
            0 => {}
            1 => owned[self.sections[0].endpoint_index] = 1.0,
            len => {
                for i in 0..len {
                    let prev = &self.sections[(i + len - 1) % len];
                    let cur = &self.sections[i];
                    owned[cur.endpoint_index] +=
                        prev.token.distance_to(&cur.token) as f64 / RING_SIZE;
                }
            }
        }
        self.endpoints.iter().zip(owned).collect()
    }
}

impl Hashring for KetamaHashring {
    fn get_n(&self, tenant: &str, series: &[Label], n: u64) -> Result<&Endpoint> {
        let have = self.endpoints.len() as u64;
        if n >= have {
            return Err(Error::InsufficientNodes {
                have,
                want: n.saturating_add(1),
            });
        }

        let section = &self.sections[self.section_for(Token::for_series(tenant, series))];
        match section.replica(n as usize) {
            Some(idx) => Ok(&self.endpoints[idx]),
            None => Err(Error::InsufficientNodes {
                have: section.replicas.len() as u64,
                want: n.saturating_add(1),
            }),
        }
    }

    fn nodes(&self) -> &[Endpoint] {
        &self.endpoints
    }
}
