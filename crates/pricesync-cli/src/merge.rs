//! # Merge Subcommand
//!
//! Merges one branch into another through the host's merge endpoint.

use anyhow::Result;
use clap::Args;

use pricesync_repo::{MergeOutcome, RepoConfig};

/// Arguments for the merge subcommand.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Branch receiving the merge.
    #[arg(long, env = "GIT_TARGET_BRANCH", default_value = "master")]
    pub base: String,

    /// Branch being merged. Defaults to `GIT_BRANCH`.
    #[arg(long)]
    pub head: Option<String>,

    /// Merge commit message.
    #[arg(long)]
    pub message: Option<String>,
}

/// Execute the merge subcommand.
pub async fn run_merge(args: &MergeArgs) -> Result<u8> {
    run_merge_with(crate::load_config(None)?, args).await
}

/// Execute the merge subcommand with an already loaded configuration.
pub async fn run_merge_with(config: RepoConfig, args: &MergeArgs) -> Result<u8> {
    let head = args.head.clone().unwrap_or_else(|| config.branch.clone());
    let message = args
        .message
        .clone()
        .unwrap_or_else(|| format!("Merge {head} into {}", args.base));

    let client = crate::client(config)?;
    match client.merge_branch(&args.base, &head, &message).await? {
        MergeOutcome::Merged { sha } => println!("Merged {head} into {}: {sha}", args.base),
        MergeOutcome::UpToDate => println!("{} already contains {head}", args.base),
    }
    Ok(0)
}
