//! Multi-tenant hashring composition.
//!
//! This crate decides which ring serves a tenant:
//! - Ring-group configuration (hashrings file)
//! - Exact and glob tenant matching
//! - Per-group algorithm selection
//! - The multi-ring with its tenant resolution cache

pub mod config;
pub mod diagnostics;
pub mod factory;
pub mod matcher;
pub mod multi;

pub use config::{ConfigError, HashringAlgorithm, HashringConfig};
pub use diagnostics::{Diagnostics, TracingDiagnostics};
pub use factory::new_hashring;
pub use matcher::{TenantMatcher, TenantSet};
pub use multi::{MultiHashring, RingGroup};
