//! The promotion procedure.
//!
//! Copies the artifact named by the source branch's pointer file, and the
//! pointer itself, onto the target branch:
//!
//! 1. resolve the pointer on the source
//! 2. fetch the artifact it names from the source
//! 3. purge stale artifacts on the target (best effort)
//! 4. write the artifact, then the pointer, to the target
//!
//! Stages 1, 2 and 4 abort the run on failure. Stage 3 only warns.
//!
//! ## Inconsistency window
//!
//! The contents API commits one file per call. Between the artifact write
//! and the pointer write the target holds the new artifact while its
//! pointer still names the old one (which the purge may already have
//! removed). If the pointer write fails the run reports
//! [`PromotionError::PointerNotUpdated`] and the window stays open until
//! the next successful run.

use pricesync_repo::{PurgeReport, ARTIFACT_SUFFIX, POINTER_FILENAME};

use crate::error::{PromotionError, Stage};
use crate::pointer::{decode_pointer, encode_pointer};
use crate::store::ContentStore;

/// Knobs for one promotion run.
#[derive(Debug, Clone)]
pub struct PromotionOptions {
    /// Pointer file path, relative to the store folder.
    pub pointer_path: String,
    /// Suffix identifying artifacts to purge on the target.
    pub artifact_suffix: String,
    /// Commit message for the artifact write. `None` derives one from the
    /// branch names.
    pub artifact_message: Option<String>,
    /// Commit message for the pointer write. `None` derives one from the
    /// branch names.
    pub pointer_message: Option<String>,
}

impl Default for PromotionOptions {
    fn default() -> Self {
        Self {
            pointer_path: POINTER_FILENAME.to_string(),
            artifact_suffix: ARTIFACT_SUFFIX.to_string(),
            artifact_message: None,
            pointer_message: None,
        }
    }
}

/// How the purge stage ended.
#[derive(Debug)]
pub enum PurgeOutcome {
    /// Listing succeeded; individual deletes may still have failed.
    Completed(PurgeReport),
    /// Listing failed; nothing was deleted.
    Skipped(String),
}

/// Summary of a successful run.
#[derive(Debug)]
pub struct PromotionReport {
    pub source_branch: String,
    pub target_branch: String,
    /// Artifact filename now named by both pointers.
    pub filename: String,
    pub artifact_bytes: usize,
    pub purge: PurgeOutcome,
}

impl PromotionReport {
    /// Stale artifacts actually removed from the target.
    pub fn purged(&self) -> &[String] {
        match &self.purge {
            PurgeOutcome::Completed(report) => report.deleted.as_slice(),
            PurgeOutcome::Skipped(_) => &[],
        }
    }
}

/// Log a fatal stage failure against `branch` and pass it through.
fn logged(branch: &str) -> impl Fn(PromotionError) -> PromotionError + '_ {
    move |e| {
        tracing::error!(%branch, stage = %e.stage(), "{e}");
        e
    }
}

/// Resolve the artifact filename named by `store`'s pointer file.
pub async fn resolve_pointer<S>(store: &S, pointer_path: &str) -> Result<String, PromotionError>
where
    S: ContentStore + ?Sized,
{
    let branch = store.branch();
    let raw = store
        .read_text(pointer_path)
        .await
        .map_err(|source| PromotionError::Repo {
            stage: Stage::ResolvePointer,
            source,
        })?
        .ok_or_else(|| PromotionError::PointerUnresolved {
            branch: branch.to_string(),
            reason: format!("{pointer_path} not found"),
        })?;

    let filename = decode_pointer(&raw).map_err(|source| PromotionError::PointerDecode {
        branch: branch.to_string(),
        source,
    })?;

    if filename.is_empty() {
        return Err(PromotionError::PointerUnresolved {
            branch: branch.to_string(),
            reason: format!("{pointer_path} is empty"),
        });
    }
    Ok(filename)
}

/// Run one promotion from `source` to `target`.
pub async fn promote<S, T>(
    source: &S,
    target: &T,
    options: &PromotionOptions,
) -> Result<PromotionReport, PromotionError>
where
    S: ContentStore + ?Sized,
    T: ContentStore + ?Sized,
{
    let source_branch = source.branch().to_string();
    let target_branch = target.branch().to_string();

    // 1. Resolve pointer.
    let filename = resolve_pointer(source, &options.pointer_path)
        .await
        .map_err(logged(&source_branch))?;
    tracing::info!(branch = %source_branch, %filename, "pointer resolved");

    // 2. Fetch artifact.
    let artifact = source
        .read_binary(&filename)
        .await
        .map_err(|source| PromotionError::Repo {
            stage: Stage::FetchArtifact,
            source,
        })
        .and_then(|bytes| {
            bytes
                .filter(|b| !b.is_empty())
                .ok_or_else(|| PromotionError::ArtifactUnavailable {
                    branch: source_branch.clone(),
                    filename: filename.clone(),
                    reason: "missing or empty".into(),
                })
        })
        .map_err(logged(&source_branch))?;
    tracing::info!(branch = %source_branch, %filename, bytes = artifact.len(), "artifact fetched");

    // 3. Purge stale artifacts. Never fatal.
    let purge = match target.delete_matching(&options.artifact_suffix).await {
        Ok(report) => {
            for failure in &report.failed {
                tracing::warn!(
                    branch = %target_branch,
                    file = %failure.name,
                    "stale artifact not deleted: {}",
                    failure.error
                );
            }
            tracing::info!(
                branch = %target_branch,
                deleted = report.deleted.len(),
                failed = report.failed.len(),
                "stale artifacts purged"
            );
            PurgeOutcome::Completed(report)
        }
        Err(e) => {
            tracing::warn!(branch = %target_branch, "purge skipped, publishing anyway: {e}");
            PurgeOutcome::Skipped(e.to_string())
        }
    };

    // 4. Publish artifact, then pointer.
    let artifact_message = options
        .artifact_message
        .clone()
        .unwrap_or_else(|| format!("Copy price list from {source_branch} to {target_branch}"));
    target
        .write_binary(&filename, &artifact, &artifact_message)
        .await
        .map_err(|source| PromotionError::Repo {
            stage: Stage::PublishArtifact,
            source,
        })
        .map_err(logged(&target_branch))?;

    let pointer_message = options
        .pointer_message
        .clone()
        .unwrap_or_else(|| format!("Copy latest filename from {source_branch} to {target_branch}"));
    target
        .write_text(&options.pointer_path, &encode_pointer(&filename), &pointer_message)
        .await
        .map_err(|source| PromotionError::PointerNotUpdated {
            branch: target_branch.clone(),
            filename: filename.clone(),
            source,
        })
        .map_err(logged(&target_branch))?;

    tracing::info!(
        source = %source_branch,
        target = %target_branch,
        %filename,
        "price list promoted"
    );

    Ok(PromotionReport {
        source_branch,
        target_branch,
        filename,
        artifact_bytes: artifact.len(),
        purge,
    })
}
