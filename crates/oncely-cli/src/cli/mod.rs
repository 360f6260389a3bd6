//! CLI for the oncely retry engine and task arbiter.

mod commands;
mod error;
mod store;

use anyhow::Result;
use clap::{Parser, Subcommand};
use oncely_core::config;
use oncely_core::retry::ErrorCatalog;
use std::path::PathBuf;

use commands::{run_once, run_show_config, run_simulate};

pub use error::CliError;
pub use store::JsonFileStore;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "oncely")]
#[command(about = "oncely: retries with backoff and at-most-once task execution", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the XDG config dir.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run an action that fails a number of times before succeeding.
    Simulate {
        /// Operation name shown in retry events (default: generated).
        #[arg(long)]
        name: Option<String>,
        /// Number of leading attempts that fail.
        #[arg(long, default_value_t = 0)]
        failures: u32,
        /// Failure kind reported by the failing attempts.
        #[arg(long, default_value = "runtime")]
        kind: String,
        /// Print this value instead of failing when retries run out.
        #[arg(long, value_name = "VALUE")]
        fallback: Option<String>,
    },

    /// Print a message at most once, tracked by a JSON state file.
    Once {
        /// State file recording whether the task is done.
        #[arg(long, value_name = "PATH")]
        state: PathBuf,
        /// Operation name shown in retry events (default: generated).
        #[arg(long)]
        name: Option<String>,
        /// Message printed by the protected task.
        #[arg(long, default_value = "task executed")]
        message: String,
    },

    /// Show the config file location and the effective configuration.
    Config,
}

/// Failure kinds known to the CLI.
pub fn catalog() -> ErrorCatalog {
    ErrorCatalog::new()
        .declare("runtime", None)
        .declare("illegal_argument", Some("runtime"))
        .declare("conflict", Some("runtime"))
        .declare("io", None)
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let (cfg, cfg_path) = match &cli.config {
            Some(path) => (config::load_from(path)?, path.clone()),
            None => (config::load_or_init()?, config::config_path()?),
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Simulate {
                name,
                failures,
                kind,
                fallback,
            } => run_simulate(&cfg, name.as_deref(), failures, &kind, fallback.as_deref())?,
            CliCommand::Once {
                state,
                name,
                message,
            } => run_once(&cfg, &state, name.as_deref(), &message)?,
            CliCommand::Config => run_show_config(&cfg, &cfg_path)?,
        }

        Ok(())
    }
}
