//! Branch merges via `POST /repos/{owner}/{repo}/merges`.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::contents::ContentSha;
use crate::error::RepoError;
use crate::{remote_error, RepoClient};

#[derive(Debug, Serialize)]
struct MergeRequest<'a> {
    base: &'a str,
    head: &'a str,
    commit_message: &'a str,
}

#[derive(Debug, Deserialize)]
struct MergeCommit {
    sha: ContentSha,
}

/// Result of a successful merge call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A merge commit was created on `base`.
    Merged { sha: ContentSha },
    /// `base` already contains `head`; nothing was committed.
    UpToDate,
}

impl RepoClient {
    /// Merge `head` into `base`.
    ///
    /// Both branch names are explicit; the client's own branch is not used.
    /// A merge conflict is reported as [`RepoError::Conflict`].
    pub async fn merge_branch(
        &self,
        base: &str,
        head: &str,
        message: &str,
    ) -> Result<MergeOutcome, RepoError> {
        let endpoint = "POST merges";
        let url = self.repo_url(["merges"])?;
        let body = MergeRequest {
            base,
            head,
            commit_message: message,
        };

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RepoError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        match resp.status() {
            StatusCode::OK | StatusCode::CREATED => {
                let commit: MergeCommit =
                    resp.json().await.map_err(|e| RepoError::Deserialization {
                        endpoint: endpoint.into(),
                        source: e,
                    })?;
                tracing::info!(%base, %head, sha = %commit.sha, "branches merged");
                Ok(MergeOutcome::Merged { sha: commit.sha })
            }
            StatusCode::NO_CONTENT => {
                tracing::info!(%base, %head, "nothing to merge");
                Ok(MergeOutcome::UpToDate)
            }
            StatusCode::CONFLICT => {
                let body = resp.text().await.unwrap_or_default();
                Err(RepoError::Conflict {
                    endpoint: endpoint.into(),
                    status: 409,
                    body,
                })
            }
            _ => Err(remote_error(endpoint, resp).await),
        }
    }
}
