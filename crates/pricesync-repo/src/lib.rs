//! # pricesync-repo -- Typed client for a repository content API
//!
//! Provides branch-scoped access to the files of one hosted repository:
//! - **Reads** of text and binary files (`GET /repos/{owner}/{repo}/contents/{path}`)
//! - **Writes** with optimistic concurrency via the prior content hash (`PUT`)
//! - **Purges** of every file in a folder matching a suffix (`DELETE` per file)
//! - **Merges** of one branch into another (`POST /repos/{owner}/{repo}/merges`)
//!
//! ## Scoping
//!
//! A [`RepoClient`] is bound to exactly one [`RepoConfig`]: one owner, one
//! repository, one branch, one folder prefix. Every path handed to the client
//! is relative to that folder. Working on two branches means two clients.
//!
//! ## Retries
//!
//! None. Each operation issues its requests once and reports the outcome.

pub mod config;
pub mod contents;
pub mod error;
pub mod merge;
pub mod naming;

pub use config::{ConfigError, RepoConfig};
pub use contents::{ContentSha, DirectoryEntry, PurgeFailure, PurgeReport};
pub use error::RepoError;
pub use merge::MergeOutcome;
pub use naming::{dated_filename, generate_dated_filename, ARTIFACT_SUFFIX, POINTER_FILENAME};

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use url::Url;

/// Media type for JSON metadata responses.
pub const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Media type asking the host for the file's raw bytes.
pub const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";

const API_VERSION: &str = "2022-11-28";

/// Branch-scoped repository client.
#[derive(Debug, Clone)]
pub struct RepoClient {
    http: reqwest::Client,
    config: RepoConfig,
}

impl RepoClient {
    /// Create a new client from configuration.
    pub fn new(config: RepoConfig) -> Result<Self, RepoError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = HeaderMap::new();
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {}", config.token.as_str()))
                        .map_err(|_| RepoError::Config(ConfigError::InvalidToken))?,
                );
                headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
                headers.insert(
                    USER_AGENT,
                    HeaderValue::from_static(concat!("pricesync/", env!("CARGO_PKG_VERSION"))),
                );
                headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));
                headers
            })
            .build()
            .map_err(|e| RepoError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        tracing::debug!(
            owner = %config.owner,
            repo = %config.repo,
            branch = %config.branch,
            folder = %config.folder_prefix,
            "repository client ready"
        );

        Ok(Self { http, config })
    }

    /// The configuration this client is bound to.
    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    /// Branch every operation of this client targets.
    pub fn branch(&self) -> &str {
        &self.config.branch
    }

    /// `{api_url}/repos/{owner}/{repo}/{tail...}`.
    fn repo_url<'a, I>(&self, tail: I) -> Result<Url, RepoError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.config.api_url.clone();
        url.path_segments_mut()
            .map_err(|()| RepoError::InvalidBaseUrl(self.config.api_url.to_string()))?
            .pop_if_empty()
            .extend(["repos", self.config.owner.as_str(), self.config.repo.as_str()])
            .extend(tail);
        Ok(url)
    }

    /// URL of `full_path` under the contents endpoint.
    ///
    /// An empty `full_path` addresses the repository root listing.
    fn contents_url(&self, full_path: &str) -> Result<Url, RepoError> {
        self.repo_url(std::iter::once("contents").chain(full_path.split('/')))
    }
}

/// Turn a non-success response into [`RepoError::Remote`].
pub(crate) async fn remote_error(endpoint: &str, resp: reqwest::Response) -> RepoError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    RepoError::Remote {
        endpoint: endpoint.to_string(),
        status,
        body,
    }
}
