//! CLI subcommands.

use clap::Subcommand;
use corelib::{Endpoint, Hashring, Label};
use std::fmt;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the endpoints a tenant's series is written to, primary first.
    Route {
        #[arg(long)]
        tenant: String,
        /// Series label as name=value, in series order. Repeatable.
        #[arg(long = "label", value_parser = parse_label)]
        labels: Vec<Label>,
        /// Number of replicas to print; defaults to the replication factor.
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        replicas: Option<u64>,
    },
    /// Print every endpoint of every group.
    Nodes,
}

/// Output of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Route(Vec<Endpoint>),
    Nodes(Vec<Endpoint>),
}

impl Command {
    pub fn execute(&self, ring: &dyn Hashring, replication_factor: u64) -> anyhow::Result<CommandResult> {
        match self {
            Command::Route {
                tenant,
                labels,
                replicas,
            } => {
                let count = replicas.unwrap_or(replication_factor);
                let mut out = Vec::new();
                for n in 0..count {
                    match ring.get_n(tenant, labels, n) {
                        Ok(ep) => out.push(ep.clone()),
                        // Fewer endpoints than asked for: print what exists.
                        Err(e) if e.is_insufficient_nodes() && !out.is_empty() => break,
                        Err(e) => return Err(e.into()),
                    }
                }
                Ok(CommandResult::Route(out))
            }
            Command::Nodes => Ok(CommandResult::Nodes(ring.nodes().to_vec())),
        }
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Route(endpoints) => {
                for (rank, ep) in endpoints.iter().enumerate() {
                    writeln!(f, "{rank}\t{}", ep.address)?;
                }
            }
            CommandResult::Nodes(endpoints) => {
                for ep in endpoints {
                    writeln!(f, "{}\t{}\t{}", ep.address, ep.secondary_address, ep.az)?;
                }
            }
        }
        Ok(())
    }
}

/// Parse `name=value`. The value may itself contain `=`.
pub fn parse_label(s: &str) -> Result<Label, String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok(Label::new(name, value)),
        _ => Err(format!("invalid label {s:?}, expected name=value")),
    }
}
