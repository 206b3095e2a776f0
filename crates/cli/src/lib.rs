//! CLI tool for inspecting tenant hashrings.
//!
//! Provides commands for:
//! - Routing a tenant's series to its endpoints
//! - Listing every endpoint of the configured rings

pub mod commands;
pub mod config;
pub mod telemetry;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
