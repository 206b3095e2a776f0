//! Ring-group configuration.
//!
//! The hashrings file is a JSON array of groups:
//!
//! ```json
//! [
//!   {
//!     "hashring": "tenants-a",
//!     "tenants": ["a-*"],
//!     "tenant_matcher_type": "glob",
//!     "algorithm": "ketama",
//!     "endpoints": [
//!       "receive-0:10901",
//!       {"address": "receive-1:10901", "capnproto_address": "receive-1:19391", "az": "eu-1a"}
//!     ]
//!   },
//!   {"hashring": "default", "endpoints": ["receive-2:10901"]}
//! ]
//! ```
//!
//! Groups are matched in file order; a group without tenants is a catch-all.

use crate::matcher::TenantMatcher;
use corelib::Endpoint;
use serde::{Deserialize, Deserializer};
use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while loading a hashrings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read hashring config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse hashring config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("hashring config is empty")]
    Empty,
}

/// Sharding algorithm of a ring group.
///
/// Unknown names are kept rather than rejected; they are routed with
/// hash-modulo and reported through the diagnostics sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum HashringAlgorithm {
    #[default]
    Hashmod,
    Ketama,
    Unrecognized(String),
}

impl HashringAlgorithm {
    pub fn as_str(&self) -> &str {
        match self {
            HashringAlgorithm::Hashmod => "hashmod",
            HashringAlgorithm::Ketama => "ketama",
            HashringAlgorithm::Unrecognized(name) => name.as_str(),
        }
    }
}

impl From<&str> for HashringAlgorithm {
    fn from(name: &str) -> Self {
        match name {
            "hashmod" => HashringAlgorithm::Hashmod,
            "ketama" => HashringAlgorithm::Ketama,
            other => HashringAlgorithm::Unrecognized(other.to_owned()),
        }
    }
}

impl FromStr for HashringAlgorithm {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl fmt::Display for HashringAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ring group of the hashrings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HashringConfig {
    /// Name of the group, used in diagnostics only.
    #[serde(default)]
    pub hashring: String,
    /// Tenants served by this group; empty means every tenant.
    #[serde(default)]
    pub tenants: Vec<String>,
    #[serde(default)]
    pub tenant_matcher_type: TenantMatcher,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    /// Overrides the process-wide algorithm when set and non-empty.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub algorithm: Option<HashringAlgorithm>,
}

impl HashringConfig {
    /// Algorithm this group is built with.
    pub fn algorithm_or<'a>(&'a self, default: &'a HashringAlgorithm) -> &'a HashringAlgorithm {
        self.algorithm.as_ref().unwrap_or(default)
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<HashringAlgorithm>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.is_empty())
        .map(|s| HashringAlgorithm::from(s.as_str())))
}

/// Parse the JSON contents of a hashrings file.
pub fn parse(content: &str) -> Result<Vec<HashringConfig>, ConfigError> {
    let groups: Vec<HashringConfig> = serde_json::from_str(content)?;
    if groups.is_empty() {
        return Err(ConfigError::Empty);
    }
    Ok(groups)
}

/// Read and parse a hashrings file.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<HashringConfig>, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}
