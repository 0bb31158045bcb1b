//! The branch-scoped file store the promotion runs against.

use async_trait::async_trait;
use pricesync_repo::{PurgeReport, RepoClient, RepoError};

/// File operations on one branch of one repository.
///
/// Paths are relative to the store's folder. Reads return `Ok(None)` for
/// files that do not exist.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Branch this store reads from and writes to.
    fn branch(&self) -> &str;

    async fn read_text(&self, path: &str) -> Result<Option<String>, RepoError>;

    async fn read_binary(&self, path: &str) -> Result<Option<Vec<u8>>, RepoError>;

    /// Delete every file whose name ends with `suffix`.
    async fn delete_matching(&self, suffix: &str) -> Result<PurgeReport, RepoError>;

    async fn write_binary(&self, path: &str, bytes: &[u8], message: &str)
        -> Result<(), RepoError>;

    async fn write_text(&self, path: &str, text: &str, message: &str) -> Result<(), RepoError>;
}

#[async_trait]
impl ContentStore for RepoClient {
    fn branch(&self) -> &str {
        RepoClient::branch(self)
    }

    async fn read_text(&self, path: &str) -> Result<Option<String>, RepoError> {
        RepoClient::read_text(self, path).await
    }

    async fn read_binary(&self, path: &str) -> Result<Option<Vec<u8>>, RepoError> {
        RepoClient::read_binary(self, path).await
    }

    async fn delete_matching(&self, suffix: &str) -> Result<PurgeReport, RepoError> {
        RepoClient::delete_matching(self, suffix).await
    }

    async fn write_binary(
        &self,
        path: &str,
        bytes: &[u8],
        message: &str,
    ) -> Result<(), RepoError> {
        RepoClient::write_binary(self, path, bytes, message).await
    }

    async fn write_text(&self, path: &str, text: &str, message: &str) -> Result<(), RepoError> {
        RepoClient::write_text(self, path, text, message).await
    }
}
