// crates/cli/src/cli.rs
//! Command-line arguments. Every flag can also come from the environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for read commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text for terminals
    #[default]
    Text,
    /// JSON for scripts
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "provenance")]
#[command(version)]
#[command(about = "Commit attribution stats: recompute global buckets and inspect attribution", long_about = None)]
pub struct Cli {
    /// SQLite database path (default: ~/.cache/provenance/provenance.db)
    #[arg(long, global = true, env = "PROVENANCE_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Rebuild global weekly and daily stats from synced repositories
    Recompute {
        /// Keep running, recomputing every SECS seconds
        #[arg(long, env = "PROVENANCE_RECOMPUTE_INTERVAL_SECS", value_name = "SECS")]
        every: Option<u64>,
    },

    /// Attribution summary and rank for one repository (id or owner/name)
    Summary {
        repo: String,
    },

    /// Global weekly buckets with ISO week labels, newest last
    Weeks {
        /// Only show the most recent N weeks
        #[arg(long, default_value = "12")]
        limit: usize,
    },

    /// Repositories whose commits sit in the unspecified catch-all buckets
    Unspecified,
}

impl Command {
    /// Recompute interval, if the command asks for a loop.
    ///
    /// Zero is treated as "run once".
    pub fn recompute_interval(&self) -> Option<Duration> {
        match self {
            Command::Recompute { every: Some(secs) } if *secs > 0 => {
                Some(Duration::from_secs(*secs))
            }
            _ => None,
        }
    }
}
