//! The multi-tenant hashring.
//!
//! Holds an ordered list of ring groups. The first group whose tenant set
//! matches a tenant serves it; a group without a tenant set matches every
//! tenant. The winning group is remembered per tenant for the lifetime of
//! the instance. A configuration change builds a new `MultiHashring`.
//!
//! # Concurrency Model
//!
//! Rings are immutable once built. The only shared mutable state is the
//! tenant cache behind a `RwLock`:
//!
//! - a lookup takes the read lock just for the map access
//! - a miss scans the groups without any lock, then takes the write lock
//!   just for the insert
//! - no lock is held while the chosen ring computes the endpoint
//!
//! Two concurrent first lookups of the same tenant may both scan and both
//! insert; they resolve to the same group so the second insert is a no-op.

use crate::config::{HashringAlgorithm, HashringConfig};
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::factory::new_hashring;
use crate::matcher::TenantSet;
use corelib::{Endpoint, Error, Hashring, Label, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, trace};

/// A ring together with the tenants it serves.
pub struct RingGroup {
    pub name: String,
    pub ring: Box<dyn Hashring>,
    /// `None` makes this a catch-all group.
    pub tenants: Option<TenantSet>,
}

impl RingGroup {
    pub fn new(name: impl Into<String>, ring: Box<dyn Hashring>, tenants: Option<TenantSet>) -> Self {
        Self {
            name: name.into(),
            ring,
            tenants,
        }
    }

    fn matches(&self, tenant: &str) -> Result<bool> {
        match &self.tenants {
            None => Ok(true),
            Some(set) => set.matches(tenant),
        }
    }
}

impl std::fmt::Debug for RingGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingGroup")
            .field("name", &self.name)
            .field("nodes", &self.ring.nodes().len())
            .field("tenants", &self.tenants)
            .finish()
    }
}

/// Routes each tenant to the ring of the first matching group.
#[derive(Debug)]
pub struct MultiHashring {
    groups: Vec<RingGroup>,
    /// Every group's nodes, sorted by address. Duplicates are kept.
    nodes: Vec<Endpoint>,
    /// Tenant -> index into `groups`.
    cache: RwLock<HashMap<String, usize>>,
}

impl MultiHashring {
    /// Build every group of `configs`, reporting fallbacks through `tracing`.
    ///
    /// A group uses its own algorithm when set, `algorithm` otherwise.
    pub fn new(
        algorithm: &HashringAlgorithm,
        replication_factor: u64,
        configs: &[HashringConfig],
    ) -> Result<Self> {
        Self::with_diagnostics(algorithm, replication_factor, configs, &TracingDiagnostics)
    }

    /// Like [`MultiHashring::new`] with an explicit diagnostics sink.
    pub fn with_diagnostics(
        algorithm: &HashringAlgorithm,
        replication_factor: u64,
        configs: &[HashringConfig],
        diagnostics: &dyn Diagnostics,
    ) -> Result<Self> {
        let mut groups = Vec::with_capacity(configs.len());
        for config in configs {
            let ring = new_hashring(
                config.algorithm_or(algorithm),
                config,
                replication_factor,
                diagnostics,
            )?;
            let tenants = if config.tenants.is_empty() {
                None
            } else {
                Some(TenantSet::new(&config.tenants, config.tenant_matcher_type))
            };
            groups.push(RingGroup::new(config.hashring.clone(), ring, tenants));
        }
        debug!(groups = groups.len(), replication_factor, "built multi hashring");
        Ok(Self::from_groups(groups))
    }

    /// Compose already built rings. Group order is match order.
    pub fn from_groups(groups: Vec<RingGroup>) -> Self {
        let mut nodes: Vec<Endpoint> = groups
            .iter()
            .flat_map(|g| g.ring.nodes().iter().cloned())
            .collect();
        nodes.sort_by(|a, b| a.address.cmp(&b.address));
        Self {
            groups,
            nodes,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn groups(&self) -> &[RingGroup] {
        &self.groups
    }

    /// The group serving `tenant`, resolving and caching it on first use.
    pub fn group_for(&self, tenant: &str) -> Result<&RingGroup> {
        self.resolve(tenant).map(|idx| &self.groups[idx])
    }

    /// Number of tenants resolved so far.
    pub fn cached_tenants(&self) -> usize {
        self.cache.read().len()
    }

    fn resolve(&self, tenant: &str) -> Result<usize> {
        let cached = self.cache.read().get(tenant).copied();
        if let Some(idx) = cached {
            return Ok(idx);
        }

        for (idx, group) in self.groups.iter().enumerate() {
            if group.matches(tenant)? {
                self.cache.write().insert(tenant.to_owned(), idx);
                trace!(tenant, hashring = %group.name, "resolved tenant hashring");
                return Ok(idx);
            }
        }
        Err(Error::NoMatchingHashring {
            tenant: tenant.to_owned(),
        })
    }
}

impl Hashring for MultiHashring {
    fn get_n(&self, tenant: &str, series: &[Label], n: u64) -> Result<&Endpoint> {
        let idx = self.resolve(tenant)?;
        self.groups[idx].ring.get_n(tenant, series, n)
    }

    fn nodes(&self) -> &[Endpoint] {
        &self.nodes
    }
}
