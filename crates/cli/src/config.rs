//! Command line configuration.

use crate::commands::Command;
use crate::telemetry;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tenancy::{HashringAlgorithm, MultiHashring};
use tracing::debug;

/// Route tenant series through a hashrings file.
#[derive(Debug, Parser)]
#[command(name = "hashring", version, about)]
pub struct CliConfig {
    /// Path to the JSON hashrings file.
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub config_file: PathBuf,

    /// Algorithm for groups that do not set one (hashmod or ketama).
    #[arg(long, default_value = "hashmod")]
    pub algorithm: HashringAlgorithm,

    /// Number of distinct endpoints each series is written to.
    #[arg(long, default_value_t = 1)]
    pub replication_factor: u64,

    /// Log level, overridden by RUST_LOG.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Load the hashrings, run the command and print its result.
    pub fn run(&self) -> anyhow::Result<()> {
        telemetry::init(&self.log_level);

        let groups = tenancy::config::load(&self.config_file)
            .with_context(|| format!("loading {}", self.config_file.display()))?;
        debug!(groups = groups.len(), path = %self.config_file.display(), "loaded hashrings");
        let ring = MultiHashring::new(&self.algorithm, self.replication_factor, &groups)
            .context("building hashrings")?;

        let result = self.command.execute(&ring, self.replication_factor)?;
        print!("{result}");
        Ok(())
    }
}
