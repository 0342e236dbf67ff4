//! CLI command definitions.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::config::Config;

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to bind (overrides `server.bind`)
    #[arg(short, long)]
    pub bind: Option<IpAddr>,

    /// Port to listen on (overrides `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Don't start the background data stream
    #[arg(long)]
    pub no_stream: bool,
}

impl ServeCommand {
    /// Apply the command-line overrides to `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

/// Generate command arguments.
#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Number of records to generate
    #[arg(short = 'n', long, default_value = "5")]
    pub count: usize,

    /// Seed for reproducible output (overrides `generator.seed`)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Report command arguments.
#[derive(Debug, Args)]
pub struct ReportCommand {
    /// Number of synthetic records to report on
    #[arg(short = 'n', long, default_value = "50")]
    pub records: usize,

    /// Seed for reproducible output (overrides `generator.seed`)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Output file (defaults to a timestamped name in the current directory)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
