//! # Pointer Subcommand
//!
//! Prints the artifact filename a branch's pointer file names.

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

use pricesync_promote::resolve_pointer;
use pricesync_repo::naming::parse_artifact_date;
use pricesync_repo::POINTER_FILENAME;

/// Arguments for the pointer subcommand.
#[derive(Args, Debug)]
pub struct PointerArgs {
    /// Branch to inspect. Defaults to `GIT_BRANCH`.
    #[arg(long)]
    pub branch: Option<String>,
}

/// Execute the pointer subcommand.
pub async fn run_pointer(args: &PointerArgs) -> Result<u8> {
    let client = crate::client(crate::load_config(args.branch.as_deref())?)?;
    let filename = resolve_pointer(&client, POINTER_FILENAME).await?;
    log_list_date(client.branch(), &filename);
    println!("{filename}");
    Ok(0)
}

/// Log the list date carried in `filename`, warning when it has none.
fn log_list_date(branch: &str, filename: &str) -> Option<NaiveDate> {
    let date = parse_artifact_date(filename);
    match date {
        Some(d) => tracing::info!(branch, filename, list_date = %d, "pointer resolved"),
        None => tracing::warn!(branch, filename, "pointer names an undated artifact"),
    }
    date
}
