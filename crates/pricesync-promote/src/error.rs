//! Promotion error types.

use pricesync_repo::RepoError;

use crate::pointer::PointerError;

/// Stage of a promotion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolvePointer,
    FetchArtifact,
    Purge,
    PublishArtifact,
    PublishPointer,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResolvePointer => write!(f, "resolve pointer"),
            Self::FetchArtifact => write!(f, "fetch artifact"),
            Self::Purge => write!(f, "purge stale artifacts"),
            Self::PublishArtifact => write!(f, "publish artifact"),
            Self::PublishPointer => write!(f, "publish pointer"),
        }
    }
}

/// Why a promotion run stopped.
#[derive(Debug, thiserror::Error)]
pub enum PromotionError {
    /// The source pointer is absent or names nothing.
    #[error("pointer unresolved on {branch}: {reason}")]
    PointerUnresolved { branch: String, reason: String },

    /// The source pointer exists but cannot be decoded.
    #[error("pointer on {branch} could not be decoded: {source}")]
    PointerDecode {
        branch: String,
        #[source]
        source: PointerError,
    },

    /// The artifact named by the pointer is absent or empty.
    #[error("artifact {filename} unavailable on {branch}: {reason}")]
    ArtifactUnavailable {
        branch: String,
        filename: String,
        reason: String,
    },

    /// A host call failed.
    #[error("{stage} failed: {source}")]
    Repo {
        stage: Stage,
        #[source]
        source: RepoError,
    },

    /// The artifact was published but the pointer still names the previous
    /// one. The target stays in this state until the next successful run.
    #[error("artifact {filename} published on {branch} but pointer not updated: {source}")]
    PointerNotUpdated {
        branch: String,
        filename: String,
        #[source]
        source: RepoError,
    },
}

impl PromotionError {
    /// Stage at which the run stopped.
    pub fn stage(&self) -> Stage {
        match self {
            Self::PointerUnresolved { .. } | Self::PointerDecode { .. } => Stage::ResolvePointer,
            Self::ArtifactUnavailable { .. } => Stage::FetchArtifact,
            Self::Repo { stage, .. } => *stage,
            Self::PointerNotUpdated { .. } => Stage::PublishPointer,
        }
    }

    /// Whether the target branch may have been modified before the failure.
    pub fn target_touched(&self) -> bool {
        matches!(
            self.stage(),
            Stage::PublishArtifact | Stage::PublishPointer
        )
    }
}
