//! # nbis-admin CLI entry point
//!
//! Parses command-line arguments, configures logging, resolves the project
//! environment and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nbis_cli::config::{run_config, ConfigArgs};
use nbis_cli::Environment;

/// nbis-admin: NBIS project administration tool.
///
/// Manages the YAML project configuration of a project directory and shows
/// example configurations for the bundled schemas.
#[derive(Parser, Debug)]
#[command(name = "nbis-admin", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Turn on debugging.
    #[arg(long, global = true)]
    debug: bool,

    /// Path to project configuration file. Defaults to <DIRNAME>.yaml.
    #[arg(long)]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration administration utilities.
    Config(ConfigArgs),
}

fn log_filter(verbose: u8, debug: bool) -> EnvFilter {
    let level = match (verbose, debug) {
        (0, false) => "warn",
        (1, false) => "info",
        (0..=2, _) => "debug",
        _ => "trace",
    };
    EnvFilter::new(level)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, cli.debug))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("nbis-admin v{} starting", env!("CARGO_PKG_VERSION"));

    let result = Environment::from_current_dir(cli.config_file.as_deref()).and_then(|env| {
        let mut stdout = std::io::stdout().lock();
        match &cli.command {
            Commands::Config(args) => run_config(args, &env, &mut stdout),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
