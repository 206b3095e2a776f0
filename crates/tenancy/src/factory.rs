//! Builds the ring of a single group from its configuration.

use crate::config::{HashringAlgorithm, HashringConfig};
use crate::diagnostics::Diagnostics;
use corelib::{Hashring, Result, SimpleHashring};
use replication::KetamaHashring;

/// Build the ring for `config` using `algorithm`.
///
/// An unrecognized algorithm is not an error: the group is built with
/// hash-modulo and the fallback is reported to `diagnostics`.
pub fn new_hashring(
    algorithm: &HashringAlgorithm,
    config: &HashringConfig,
    replication_factor: u64,
    diagnostics: &dyn Diagnostics,
) -> Result<Box<dyn Hashring>> {
    let endpoints = config.endpoints.clone();
    match algorithm {
        HashringAlgorithm::Hashmod => Ok(Box::new(SimpleHashring::new(endpoints)?)),
        HashringAlgorithm::Ketama => {
            Ok(Box::new(KetamaHashring::new(endpoints, replication_factor)?))
        }
        HashringAlgorithm::Unrecognized(name) => {
            diagnostics.unrecognized_algorithm(&config.hashring, &config.tenants, name);
            Ok(Box::new(SimpleHashring::new(endpoints)?))
        }
    }
}
