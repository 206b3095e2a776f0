//! Hash-modulo sharding.
//!
//! The simplest ring: `(hash(tenant, series) + n) % len(endpoints)`. Adding or
//! removing a single endpoint reshuffles most keys, which is the price paid
//! for having no ring state at all.

use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use crate::labels::{hash_with_prefix, Label};
use crate::ring::Hashring;
use tracing::debug;

/// Hashring that hash-mods series over an address-sorted endpoint list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleHashring {
    endpoints: Vec<Endpoint>,
}

impl SimpleHashring {
    /// Build a hash-modulo ring.
    ///
    /// Rejects any endpoint carrying an AZ: modulo placement cannot spread
    /// replicas across zones, so accepting the label would be misleading.
    pub fn new(mut endpoints: Vec<Endpoint>) -> Result<Self> {
        if let Some(ep) = endpoints.iter().find(|ep| ep.has_az()) {
            return Err(Error::AzUnsupported {
                address: ep.address.clone(),
                az: ep.az.clone(),
            });
        }
        endpoints.sort_by(|a, b| a.address.cmp(&b.address));
        debug!(endpoints = endpoints.len(), "built hashmod hashring");
        Ok(Self { endpoints })
    }

    /// Number of endpoints in the ring.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl Hashring for SimpleHashring {
    fn get_n(&self, tenant: &str, series: &[Label], n: u64) -> Result<&Endpoint> {
        let have = self.endpoints.len() as u64;
        if n >= have {
            return Err(Error::InsufficientNodes {
                have,
                want: n.saturating_add(1),
            });
        }
        let idx = hash_with_prefix(tenant, series).wrapping_add(n) % have;
        Ok(&self.endpoints[idx as usize])
    }

    fn nodes(&self) -> &[Endpoint] {
        &self.endpoints
    }
}
