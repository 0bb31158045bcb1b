//! File operations against the contents endpoint.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/repos/{owner}/{repo}/contents/{path}?ref={branch}` | Read file, read hash, list folder |
//! | PUT    | `/repos/{owner}/{repo}/contents/{path}` | Create or update file |
//! | DELETE | `/repos/{owner}/{repo}/contents/{path}` | Delete file |

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::RepoError;
use crate::{remote_error, RepoClient, RAW_MEDIA_TYPE};

// -- Types matching the host API schemas --------------------------------------

/// Host-assigned identifier of a file's current version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentSha(String);

impl ContentSha {
    pub fn new(sha: impl Into<String>) -> Self {
        Self(sha.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentSha {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// File metadata returned by `GET contents/{path}` for a single file.
///
/// Only the fields this client consumes are modelled.
#[derive(Debug, Clone, Deserialize)]
struct FileMetadata {
    sha: ContentSha,
}

/// One element of a folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: String,
    pub sha: ContentSha,
    /// `"file"`, `"dir"`, `"symlink"` or `"submodule"`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl DirectoryEntry {
    pub fn is_file(&self) -> bool {
        self.kind == "file"
    }
}

#[derive(Debug, Serialize)]
struct PutContentRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DeleteContentRequest<'a> {
    message: &'a str,
    sha: &'a str,
    branch: &'a str,
}

/// A purge candidate whose delete call failed.
#[derive(Debug)]
pub struct PurgeFailure {
    pub name: String,
    pub error: RepoError,
}

/// Outcome of one [`RepoClient::delete_matching`] call.
#[derive(Debug, Default)]
pub struct PurgeReport {
    /// Names of the files deleted, in listing order.
    pub deleted: Vec<String>,
    /// Files that matched but could not be deleted.
    pub failed: Vec<PurgeFailure>,
}

impl PurgeReport {
    /// True when every matching file was deleted.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

// -- Client -------------------------------------------------------------------

impl RepoClient {
    /// Read a text file relative to the configured folder.
    ///
    /// Returns `Ok(None)` when the file does not exist on the branch.
    pub async fn read_text(&self, path: &str) -> Result<Option<String>, RepoError> {
        let full_path = self.config.full_path(path);
        let endpoint = format!("GET contents/{full_path}");
        let Some(resp) = self.get_raw(&full_path, &endpoint).await? else {
            return Ok(None);
        };
        resp.text()
            .await
            .map(Some)
            .map_err(|e| RepoError::Deserialization { endpoint, source: e })
    }

    /// Read a binary file relative to the configured folder.
    ///
    /// Returns `Ok(None)` when the file does not exist on the branch.
    pub async fn read_binary(&self, path: &str) -> Result<Option<Vec<u8>>, RepoError> {
        let full_path = self.config.full_path(path);
        let endpoint = format!("GET contents/{full_path}");
        let Some(resp) = self.get_raw(&full_path, &endpoint).await? else {
            return Ok(None);
        };
        resp.bytes()
            .await
            .map(|b| Some(b.to_vec()))
            .map_err(|e| RepoError::Deserialization { endpoint, source: e })
    }

    /// Current content hash of a file, or `None` if it does not exist yet.
    ///
    /// Any failure other than 404 is returned as
    /// [`RepoError::ContentHashLookup`]; it is never mistaken for absence.
    pub async fn get_content_hash(&self, path: &str) -> Result<Option<ContentSha>, RepoError> {
        let full_path = self.config.full_path(path);
        self.lookup_hash(&full_path)
            .await
            .map_err(|e| RepoError::ContentHashLookup {
                path: full_path,
                source: Box::new(e),
            })
    }

    /// Create or overwrite a binary file with a single commit.
    pub async fn write_binary(
        &self,
        path: &str,
        bytes: &[u8],
        message: &str,
    ) -> Result<(), RepoError> {
        let sha = self.get_content_hash(path).await?;
        let full_path = self.config.full_path(path);
        let endpoint = format!("PUT contents/{full_path}");
        let body = PutContentRequest {
            message,
            content: STANDARD.encode(bytes),
            branch: &self.config.branch,
            sha: sha.as_ref().map(ContentSha::as_str),
        };

        let action = if sha.is_some() { "update" } else { "create" };

        let url = self.contents_url(&full_path)?;
        let resp = self
            .http
            .put(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RepoError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        match resp.status() {
            StatusCode::OK | StatusCode::CREATED => {
                tracing::info!(
                    path = %full_path,
                    branch = %self.config.branch,
                    bytes = bytes.len(),
                    action,
                    "file committed"
                );
                Ok(())
            }
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                let status = resp.status().as_u16();
                let body = resp.text().await.unwrap_or_default();
                // 422 also covers malformed payloads; only the sha complaints
                // are concurrency rejections.
                if status == 409 || body.contains("sha") {
                    Err(RepoError::Conflict {
                        endpoint,
                        status,
                        body,
                    })
                } else {
                    Err(RepoError::Remote {
                        endpoint,
                        status,
                        body,
                    })
                }
            }
            _ => Err(remote_error(&endpoint, resp).await),
        }
    }

    /// Create or overwrite a text file with a single commit.
    pub async fn write_text(&self, path: &str, text: &str, message: &str) -> Result<(), RepoError> {
        self.write_binary(path, text.as_bytes(), message).await
    }

    /// Delete every file in the configured folder whose name ends with `suffix`.
    ///
    /// Per-file delete failures are logged and collected in the report; only
    /// a failed folder listing aborts the call. A missing folder has nothing
    /// to purge and yields an empty report.
    pub async fn delete_matching(&self, suffix: &str) -> Result<PurgeReport, RepoError> {
        let entries = self.list_folder().await?;
        let mut report = PurgeReport::default();

        for entry in entries
            .into_iter()
            .filter(|e| e.is_file() && e.name.ends_with(suffix))
        {
            let message = format!("Delete stale artifact {}", entry.name);
            match self.delete_entry(&entry, &message).await {
                Ok(()) => {
                    tracing::info!(path = %entry.path, branch = %self.config.branch, "file deleted");
                    report.deleted.push(entry.name);
                }
                Err(error) => {
                    tracing::warn!(path = %entry.path, branch = %self.config.branch, "delete failed: {error}");
                    report.failed.push(PurgeFailure {
                        name: entry.name,
                        error,
                    });
                }
            }
        }

        Ok(report)
    }

    /// List the configured folder.
    pub async fn list_folder(&self) -> Result<Vec<DirectoryEntry>, RepoError> {
        let full_path = self.config.full_path("");
        let endpoint = format!("GET contents/{full_path}");
        let url = self.contents_url(&full_path)?;

        let resp = self
            .http
            .get(url)
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await
            .map_err(|e| RepoError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if resp.status() == StatusCode::NOT_FOUND {
            tracing::debug!(folder = %full_path, branch = %self.config.branch, "folder absent");
            return Ok(Vec::new());
        }
        if !resp.status().is_success() {
            return Err(remote_error(&endpoint, resp).await);
        }

        resp.json()
            .await
            .map_err(|e| RepoError::Deserialization { endpoint, source: e })
    }

    async fn delete_entry(&self, entry: &DirectoryEntry, message: &str) -> Result<(), RepoError> {
        let endpoint = format!("DELETE contents/{}", entry.path);
        let url = self.contents_url(&entry.path)?;
        let body = DeleteContentRequest {
            message,
            sha: entry.sha.as_str(),
            branch: &self.config.branch,
        };

        let resp = self
            .http
            .delete(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RepoError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        match resp.status() {
            s if s.is_success() => Ok(()),
            StatusCode::CONFLICT => {
                let body = resp.text().await.unwrap_or_default();
                Err(RepoError::Conflict {
                    endpoint,
                    status: 409,
                    body,
                })
            }
            _ => Err(remote_error(&endpoint, resp).await),
        }
    }

    async fn lookup_hash(&self, full_path: &str) -> Result<Option<ContentSha>, RepoError> {
        let endpoint = format!("GET contents/{full_path}");
        let url = self.contents_url(full_path)?;

        let resp = self
            .http
            .get(url)
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await
            .map_err(|e| RepoError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(remote_error(&endpoint, resp).await);
        }

        let meta: FileMetadata = resp
            .json()
            .await
            .map_err(|e| RepoError::Deserialization { endpoint, source: e })?;
        Ok(Some(meta.sha))
    }

    /// GET a file's raw bytes. `Ok(None)` on 404.
    async fn get_raw(
        &self,
        full_path: &str,
        endpoint: &str,
    ) -> Result<Option<reqwest::Response>, RepoError> {
        let url = self.contents_url(full_path)?;
        let resp = self
            .http
            .get(url)
            .header(ACCEPT, RAW_MEDIA_TYPE)
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await
            .map_err(|e| RepoError::Http {
                endpoint: endpoint.to_string(),
                source: e,
            })?;

        if resp.status() == StatusCode::NOT_FOUND {
            tracing::info!(path = %full_path, branch = %self.config.branch, "file not found");
            return Ok(None);
        }
        if resp.status() != StatusCode::OK {
            return Err(remote_error(endpoint, resp).await);
        }
        Ok(Some(resp))
    }
}
