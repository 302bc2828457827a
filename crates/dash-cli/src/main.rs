//! # dash-cli
//!
//! Command line access to the devfile registries of the workspace dashboard.
//!
//! This is the main entry point for the `dash` tool. It handles command parsing,
//! sets up logging and error handling, and dispatches to the command handlers.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use dash_core::error::{DashError, DashResult};
use tracing::{error, info};

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Devfile registry tooling for the workspace dashboard
#[derive(Parser)]
#[command(name = "dash", version, about = "Devfile registry tooling for the workspace dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the nearest dashboard.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List configured registries
    Registries,
    /// Fetch devfile metadata and print it as JSON
    Devfiles {
        /// Read this registry instead of the configured ones
        #[arg(long)]
        url: Option<String>,
        /// Treat --url as an external registry
        #[arg(long, requires = "url")]
        external: bool,
        /// Print records as published, without resolving links and tags
        #[arg(long)]
        raw: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    info!("Starting dash v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_cli(cli) {
        eprint!("{}", ErrorFormatter::new().format_error(&e));
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> DashResult<()> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| DashError::io("Failed to create async runtime".to_string(), e))?;

    rt.block_on(async {
        let ctx = CommandContext::new(cli.config.as_deref()).await?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "dash={level},dash_registry={level},dash_config={level}",
            level = level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("dash encountered an unexpected error: {}", panic_info);
        eprintln!("dash crashed! This is a bug.");
        eprintln!("Error: {}", panic_info);
    }));
}
