//! Core library for tenant-aware hashrings.
//!
//! This crate provides the building blocks shared by every ring:
//! - Endpoint identity and AZ labels
//! - Series labels and the tenant-prefixed series hash
//! - Ring tokens and ketama sections
//! - The `Hashring` routing contract
//! - The single-node and hash-modulo rings

pub mod endpoint;
pub mod error;
pub mod labels;
pub mod ring;
pub mod section;
pub mod token;

pub use endpoint::Endpoint;
pub use error::{Error, Result};
pub use labels::{hash_with_prefix, Label};
pub use ring::{Hashring, SimpleHashring, SingleNodeHashring};
pub use section::Section;
pub use token::Token;
