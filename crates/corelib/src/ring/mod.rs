//! The routing contract and the simple hashrings.
//!
//! A hashring maps a tenant's series to the endpoints that should receive it.
//! Rank 0 is the primary; ranks `1..` are the replicas, in order.

pub mod hashmod;
pub mod single;

pub use hashmod::SimpleHashring;
pub use single::SingleNodeHashring;

use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::labels::Label;

/// Finds the endpoint(s) responsible for a tenant's series.
///
/// # Thread Safety
///
/// Implementations are read-only after construction (apart from internal
/// caches that guard themselves) and must be shareable across threads.
pub trait Hashring: Send + Sync {
    /// The endpoint holding replica `n` (0 = primary) of the series.
    ///
    /// Fails with [`Error::InsufficientNodes`](crate::Error::InsufficientNodes)
    /// when fewer than `n + 1` distinct endpoints can own the series.
    fn get_n(&self, tenant: &str, series: &[Label], n: u64) -> Result<&Endpoint>;

    /// All endpoints of this ring, sorted by address.
    ///
    /// A composed ring may list the same address more than once.
    fn nodes(&self) -> &[Endpoint];

    /// The primary endpoint of the series.
    fn get(&self, tenant: &str, series: &[Label]) -> Result<&Endpoint> {
        self.get_n(tenant, series, 0)
    }

    /// The first `count` endpoints of the series, primary first.
    fn replicas(&self, tenant: &str, series: &[Label], count: u64) -> Result<Vec<&Endpoint>> {
        (0..count).map(|n| self.get_n(tenant, series, n)).collect()
    }
}
