//! # pricesync CLI entry point
//!
//! Parses command-line arguments, initialises logging, and dispatches to
//! subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pricesync_cli::filename::{run_filename, FilenameArgs};
use pricesync_cli::merge::{run_merge, MergeArgs};
use pricesync_cli::pointer::{run_pointer, PointerArgs};
use pricesync_cli::promote::{run_promote, PromoteArgs};

/// Price-list promotion between repository branches.
///
/// Copies the generated price-list artifact and its latest-filename pointer
/// from the staging branch to the production branch through the host's
/// content API.
#[derive(Parser, Debug)]
#[command(name = "pricesync", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy the current artifact and pointer from source to target branch.
    Promote(PromoteArgs),

    /// Print the artifact filename a branch's pointer names.
    Pointer(PointerArgs),

    /// Merge one branch into another.
    Merge(MergeArgs),

    /// Print the dated artifact filename.
    Filename(FilenameArgs),
}

fn init_tracing(verbose: u8, json: bool) {
    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    tracing::debug!("pricesync v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Promote(args) => run_promote(&args).await,
        Commands::Pointer(args) => run_pointer(&args).await,
        Commands::Merge(args) => run_merge(&args).await,
        Commands::Filename(args) => run_filename(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
