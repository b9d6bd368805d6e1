//! CLI for the retrier retry-policy tool.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use retrier_core::config;

use commands::{run_completions, run_demo, run_probe};

/// Top-level CLI for the retrier retry-policy tool.
#[derive(Debug, Parser)]
#[command(name = "retrier")]
#[command(about = "retrier: declarative retry policies for flaky operations", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run the retry showcase against a scripted flaky operation.
    Demo {
        /// Number of failures before the operation succeeds (omit: never succeeds).
        #[arg(long, value_name = "N")]
        fail: Option<u32>,
        /// Shrink the wait-and-retry delays to milliseconds for quick runs.
        #[arg(long)]
        fast: bool,
    },

    /// HEAD-probe a URL, retrying transient failures per the configured policy.
    Probe {
        /// HTTP/HTTPS URL to probe.
        url: String,
        /// Override the configured number of retries.
        #[arg(long, value_name = "N")]
        retries: Option<u32>,
        /// Override the configured base backoff delay, in milliseconds.
        #[arg(long, value_name = "MS")]
        base_delay_ms: Option<u64>,
    },

    /// Generate a shell completion script on stdout.
    Completions {
        /// Shell to generate for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Demo { fail, fast } => run_demo(fail, fast)?,
            CliCommand::Probe {
                url,
                retries,
                base_delay_ms,
            } => run_probe(&cfg, &url, retries, base_delay_ms)?,
            CliCommand::Completions { shell } => run_completions(shell),
        }

        Ok(())
    }
}
