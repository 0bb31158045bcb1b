//! Repository client configuration.
//!
//! One [`RepoConfig`] scopes every operation to a single
//! (owner, repo, branch, folder-prefix) tuple. Configurations are values:
//! pointing a client at another branch means deriving a new configuration
//! with [`RepoConfig::with_branch`], never editing a shared one.

use url::Url;
use zeroize::Zeroizing;

/// Default host API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Branch used when `GIT_BRANCH` is unset.
pub const DEFAULT_BRANCH: &str = "dev";

/// Push mode used when `GIT_PUSH_MODE` is unset.
pub const DEFAULT_PUSH_MODE: &str = "staged";

/// Folder used when `GIT_FOLDER_PATH` is unset.
pub const DEFAULT_FOLDER_PREFIX: &str = "price-lists-json";

/// Configuration for one branch-scoped repository client.
///
/// Custom `Debug` implementation redacts the `token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct RepoConfig {
    /// Base URL of the host API.
    /// Default: <https://api.github.com>
    pub api_url: Url,
    /// Bearer token for API authentication.
    pub token: Zeroizing<String>,
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Branch every read and write is scoped to.
    pub branch: String,
    /// Accepted for compatibility with existing deployments; no operation
    /// currently consults it.
    pub push_mode: String,
    /// Folder all file paths are relative to. Empty means repository root.
    pub folder_prefix: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for RepoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepoConfig")
            .field("api_url", &self.api_url)
            .field("token", &"[REDACTED]")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("push_mode", &self.push_mode)
            .field("folder_prefix", &self.folder_prefix)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl RepoConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `GIT_TOKEN` (required)
    /// - `GIT_OWNER` (required)
    /// - `GIT_REPO` (required)
    /// - `GIT_BRANCH` (default: `dev`)
    /// - `GIT_PUSH_MODE` (default: `staged`)
    /// - `GIT_FOLDER_PATH` (default: `price-lists-json`; empty means root)
    /// - `GIT_API_URL` (default: `https://api.github.com`)
    /// - `GIT_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = required(&lookup, "GIT_TOKEN")?;
        let owner = required(&lookup, "GIT_OWNER")?;
        let repo = required(&lookup, "GIT_REPO")?;

        let raw_url = lookup("GIT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&raw_url)
            .map_err(|e| ConfigError::InvalidUrl("GIT_API_URL".to_string(), e.to_string()))?;

        let timeout_secs = match lookup("GIT_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: "GIT_TIMEOUT_SECS",
                value: raw,
            })?,
            None => 30,
        };

        Ok(Self {
            api_url,
            token: Zeroizing::new(token),
            owner,
            repo,
            branch: lookup("GIT_BRANCH")
                .filter(|b| !b.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            push_mode: lookup("GIT_PUSH_MODE").unwrap_or_else(|| DEFAULT_PUSH_MODE.to_string()),
            // An explicitly empty folder is meaningful (repository root), so
            // only absence falls back to the default.
            folder_prefix: lookup("GIT_FOLDER_PATH")
                .map(|f| f.trim_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_FOLDER_PREFIX.to_string()),
            timeout_secs,
        })
    }

    /// Derive a configuration identical to this one but scoped to `branch`.
    #[must_use]
    pub fn with_branch(&self, branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            ..self.clone()
        }
    }

    /// Create a configuration pointing at a local mock server (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base_url` cannot be parsed.
    pub fn local_mock(base_url: &str, branch: &str) -> Result<Self, ConfigError> {
        let api_url = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl("mock".to_string(), e.to_string()))?;
        Ok(Self {
            api_url,
            token: Zeroizing::new("test-token".to_string()),
            owner: "acme".to_string(),
            repo: "prices".to_string(),
            branch: branch.to_string(),
            push_mode: DEFAULT_PUSH_MODE.to_string(),
            folder_prefix: DEFAULT_FOLDER_PREFIX.to_string(),
            timeout_secs: 5,
        })
    }

    /// Path of `path` inside the configured folder.
    pub fn full_path(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if self.folder_prefix.is_empty() {
            path.to_string()
        } else if path.is_empty() {
            self.folder_prefix.clone()
        } else {
            format!("{}/{}", self.folder_prefix, path)
        }
    }
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(var))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
    #[error("token contains characters not allowed in an HTTP header")]
    InvalidToken,
}
