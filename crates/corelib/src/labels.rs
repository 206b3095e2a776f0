//! Series labels and the tenant-prefixed series hash.
//!
//! The hashrings never look inside a series; they only need a stable,
//! order-sensitive 64-bit hash of the tenant together with the label set.

use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::xxh64::Xxh64;

/// Separator written between the prefix, label names and label values.
const SEP: u8 = 0xff;

/// A single `name=value` pair of a time series.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.name, self.value)
    }
}

/// XXH64 of `prefix 0xff (name 0xff value 0xff)*`.
///
/// Labels are hashed in the order given. This byte layout decides where every
/// series lands; changing it is equivalent to rehashing the whole cluster.
pub fn hash_with_prefix(prefix: &str, labels: &[Label]) -> u64 {
    let mut hasher = Xxh64::new(0);
    hasher.update(prefix.as_bytes());
    hasher.update(&[SEP]);
    for label in labels {
        hasher.update(label.name.as_bytes());
        hasher.update(&[SEP]);
        hasher.update(label.value.as_bytes());
        hasher.update(&[SEP]);
    }
    hasher.digest()
}
