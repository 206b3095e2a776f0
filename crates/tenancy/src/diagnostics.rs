//! Side channel for configuration problems that do not fail construction.

use tracing::warn;

/// Receives notices about degraded ring-group configuration.
pub trait Diagnostics: Send + Sync {
    /// A group named an algorithm this build does not know; it was built
    /// with hash-modulo instead.
    fn unrecognized_algorithm(&self, hashring: &str, tenants: &[String], algorithm: &str);
}

/// Reports notices as `tracing` warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn unrecognized_algorithm(&self, hashring: &str, tenants: &[String], algorithm: &str) {
        warn!(
            hashring,
            ?tenants,
            algorithm,
            "unrecognizable hashring algorithm, falling back to hashmod"
        );
    }
}
