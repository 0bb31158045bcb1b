//! # Promote Subcommand
//!
//! Copies the current artifact and pointer from the source branch to the
//! target branch.

use anyhow::{bail, Result};
use clap::Args;

use pricesync_promote::{promote, PromotionOptions, PurgeOutcome};
use pricesync_repo::RepoConfig;

/// Arguments for the promote subcommand.
#[derive(Args, Debug)]
pub struct PromoteArgs {
    /// Branch to copy from. Defaults to `GIT_BRANCH`.
    #[arg(long)]
    pub source: Option<String>,

    /// Branch to copy to.
    #[arg(long, env = "GIT_TARGET_BRANCH", default_value = "master")]
    pub target: String,

    /// Commit message for the artifact write.
    #[arg(long)]
    pub artifact_message: Option<String>,

    /// Commit message for the pointer write.
    #[arg(long)]
    pub pointer_message: Option<String>,
}

/// Execute the promote subcommand.
pub async fn run_promote(args: &PromoteArgs) -> Result<u8> {
    let config = crate::load_config(args.source.as_deref())?;
    run_promote_with(config, args).await
}

/// Execute the promote subcommand with an already loaded configuration.
///
/// `config` is scoped to the source branch; the target configuration is
/// derived from it.
pub async fn run_promote_with(config: RepoConfig, args: &PromoteArgs) -> Result<u8> {
    if config.branch == args.target {
        bail!(
            "source and target branch are both {:?}; nothing to promote",
            args.target
        );
    }

    let target = crate::client(config.with_branch(&args.target))?;
    let source = crate::client(config)?;

    let options = PromotionOptions {
        artifact_message: args.artifact_message.clone(),
        pointer_message: args.pointer_message.clone(),
        ..PromotionOptions::default()
    };

    let report = promote(&source, &target, &options).await?;

    println!("Promoted {} -> {}", report.source_branch, report.target_branch);
    println!("  artifact: {} ({} bytes)", report.filename, report.artifact_bytes);
    match &report.purge {
        PurgeOutcome::Completed(purge) => {
            for name in &purge.deleted {
                println!("  purged:   {name}");
            }
            for failure in &purge.failed {
                println!("  kept:     {} ({})", failure.name, failure.error);
            }
        }
        PurgeOutcome::Skipped(reason) => println!("  purge skipped: {reason}"),
    }

    Ok(0)
}
