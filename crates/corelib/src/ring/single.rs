//! A hashring with exactly one member.

use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use crate::labels::Label;
use crate::ring::Hashring;

/// Routes every series to the same endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleNodeHashring {
    endpoint: Endpoint,
}

impl SingleNodeHashring {
    /// Ring whose only member is reachable on `address` for both transports.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            endpoint: Endpoint::new(address),
        }
    }
}

impl From<Endpoint> for SingleNodeHashring {
    fn from(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }
}

impl Hashring for SingleNodeHashring {
    fn get_n(&self, _tenant: &str, _series: &[Label], n: u64) -> Result<&Endpoint> {
        if n > 0 {
            return Err(Error::InsufficientNodes {
                have: 1,
                want: n.saturating_add(1),
            });
        }
        Ok(&self.endpoint)
    }

    fn nodes(&self) -> &[Endpoint] {
        std::slice::from_ref(&self.endpoint)
    }
}
