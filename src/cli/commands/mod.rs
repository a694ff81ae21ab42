//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod lookup;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{load_settings, Settings};

#[derive(Parser)]
#[command(name = "corpdir")]
#[command(about = "Company directory service with geo-restricted writes")]
#[command(version)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Bind address: port, host, or host:port
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Look up the country for an IP address
    Lookup {
        /// IP address to resolve
        ip: String,
    },
}

/// Initialize logging. `RUST_LOG` wins; otherwise verbosity follows
/// the `--verbose` flag or the `debug` config key.
fn init_logging(settings: &Settings, verbose: bool) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.default_log_filter(verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Parse arguments and dispatch to the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(cli.config.as_deref())?;
    init_logging(&settings, cli.verbose);

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.listen_addr.clone());
            serve::cmd_serve(&settings, &bind).await
        }
        Commands::Lookup { ip } => lookup::cmd_lookup(&settings, &ip).await,
    }
}
