//! # pricesync-cli — price-list promotion command line
//!
//! Provides the `pricesync` binary run by the scheduler / CI job.
//!
//! ## Subcommands
//!
//! - `pricesync promote` — copy artifact and pointer from source to target branch.
//! - `pricesync pointer` — print the artifact filename a branch's pointer names.
//! - `pricesync merge` — merge one branch into another.
//! - `pricesync filename` — print the dated artifact filename (and footer label).
//!
//! Repository settings come from the `GIT_*` environment variables; see
//! [`pricesync_repo::RepoConfig::from_env`].
//!
//! ```bash
//! GIT_TOKEN=... GIT_OWNER=acme GIT_REPO=prices pricesync promote --target master
//! ```

pub mod filename;
pub mod merge;
pub mod pointer;
pub mod promote;

use anyhow::{Context, Result};
use pricesync_repo::{RepoClient, RepoConfig};

/// Load repository configuration from the environment, optionally
/// rescoped to `branch`.
pub fn load_config(branch: Option<&str>) -> Result<RepoConfig> {
    load_config_with(|var| std::env::var(var).ok(), branch)
}

/// [`load_config`] over an arbitrary variable source.
pub fn load_config_with<F>(lookup: F, branch: Option<&str>) -> Result<RepoConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config = RepoConfig::from_lookup(lookup).context("loading repository configuration")?;
    Ok(match branch {
        Some(b) => config.with_branch(b),
        None => config,
    })
}

/// Build a client for `config`.
pub fn client(config: RepoConfig) -> Result<RepoClient> {
    let branch = config.branch.clone();
    RepoClient::new(config).with_context(|| format!("building client for branch {branch}"))
}
