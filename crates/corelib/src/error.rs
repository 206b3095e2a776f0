//! Error types for the core library.

use thiserror::Error;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a hashring or routing through one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested replica rank is beyond the nodes available for the key.
    ///
    /// `want` is `n + 1` (saturating at `u64::MAX`) for a `get_n(.., n)` call.
    #[error("insufficient nodes; have {have}, want {want}")]
    InsufficientNodes { have: u64, want: u64 },

    /// Hash-modulo sharding cannot honour availability zones.
    #[error(
        "hashmod algorithm does not support AZ aware hashring configuration \
         (endpoint {address} has AZ {az:?}); either use ketama or remove AZ configuration"
    )]
    AzUnsupported { address: String, az: String },

    /// A ketama ring needs at least `replication_factor` endpoints.
    #[error(
        "ketama: amount of endpoints ({endpoints}) needs to be at least the replication factor ({replication_factor})"
    )]
    NotEnoughEndpoints {
        endpoints: usize,
        replication_factor: u64,
    },

    /// A glob tenant pattern failed to compile.
    #[error("error matching tenant pattern {pattern} (tenant {tenant}): {msg} at position {pos}")]
    TenantPattern {
        pattern: String,
        tenant: String,
        pos: usize,
        msg: String,
    },

    /// No configured hashring claims the tenant and there is no default one.
    #[error("no matching hashring to handle tenant {tenant:?}")]
    NoMatchingHashring { tenant: String },
}

impl Error {
    /// True for errors that only mean "there are no more replicas".
    ///
    /// Callers fanning out writes can stop at this error instead of failing
    /// the whole request.
    pub fn is_insufficient_nodes(&self) -> bool {
        matches!(self, Error::InsufficientNodes { .. })
    }
}
