//! Endpoint identity for hashring members.
//!
//! An endpoint is a passive value: the address writes are forwarded to, a
//! secondary address for the alternative transport, and an optional
//! availability zone label used by AZ-aware replica placement.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A storage node that can own series in a hashring.
///
/// Identity is the `address`; two endpoints with the same address are the
/// same node. An empty `az` means "no AZ grouping".
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "EndpointSpec")]
pub struct Endpoint {
    pub address: String,
    pub secondary_address: String,
    pub az: String,
}

impl Endpoint {
    /// Endpoint reachable on a single address, without an AZ.
    pub fn new(address: impl Into<String>) -> Self {
        let address = address.into();
        Self {
            secondary_address: address.clone(),
            address,
            az: String::new(),
        }
    }

    /// Endpoint with an availability zone label.
    pub fn with_az(address: impl Into<String>, az: impl Into<String>) -> Self {
        Self {
            az: az.into(),
            ..Self::new(address)
        }
    }

    /// Override the secondary address.
    pub fn secondary(mut self, secondary_address: impl Into<String>) -> Self {
        self.secondary_address = secondary_address.into();
        self
    }

    pub fn has_az(&self) -> bool {
        !self.az.is_empty()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_az() {
            write!(f, "{} (az={})", self.address, self.az)
        } else {
            f.write_str(&self.address)
        }
    }
}

/// Accepted on-disk shapes of an endpoint: a bare address or a full object.
#[derive(Deserialize)]
#[serde(untagged)]
enum EndpointSpec {
    Address(String),
    Full {
        address: String,
        #[serde(default, alias = "capnproto_address")]
        secondary_address: String,
        #[serde(default)]
        az: String,
    },
}

impl From<EndpointSpec> for Endpoint {
    fn from(spec: EndpointSpec) -> Self {
        match spec {
            EndpointSpec::Address(address) => Endpoint::new(address),
            EndpointSpec::Full {
                address,
                secondary_address,
                az,
            } => {
                let secondary_address = if secondary_address.is_empty() {
                    address.clone()
                } else {
                    secondary_address
                };
                Endpoint {
                    address,
                    secondary_address,
                    az,
                }
            }
        }
    }
}
