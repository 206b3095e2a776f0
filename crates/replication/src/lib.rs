//! Consistent hashing with AZ-aware replication.
//!
//! This crate provides the ketama hashring:
//! - Every endpoint is spread over `sections_per_node` virtual sections
//! - Replica lists are computed once per section when the ring is built
//! - Replicas are balanced across availability zones where possible

pub mod ketama;
pub mod placement;

pub use ketama::{KetamaHashring, SECTIONS_PER_NODE};
pub use placement::{place_replicas, AzSpread};
