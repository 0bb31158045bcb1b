//! In-process [`ContentStore`] holding one branch's folder in memory.
//!
//! Used to rehearse promotions without a host and to observe exactly which
//! writes a run performs. Failures can be injected per operation.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use pricesync_repo::{PurgeFailure, PurgeReport, RepoError};

use crate::store::ContentStore;

/// One mutating call observed by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Write(String),
    Delete(String),
}

#[derive(Debug, Default)]
struct State {
    files: BTreeMap<String, Vec<u8>>,
    ops: Vec<StoreOp>,
    fail_listing: bool,
    fail_writes: BTreeSet<String>,
    fail_deletes: BTreeSet<String>,
}

/// In-memory branch folder.
#[derive(Debug)]
pub struct MemoryStore {
    branch: String,
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            state: Mutex::new(State::default()),
        }
    }

    /// Seed a file without recording an operation.
    #[must_use]
    pub fn with_file(self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.state.lock().files.insert(path.to_string(), bytes.into());
        self
    }

    /// Make the folder listing behind `delete_matching` fail.
    #[must_use]
    pub fn failing_listing(self) -> Self {
        self.state.lock().fail_listing = true;
        self
    }

    /// Make writes to `path` fail.
    #[must_use]
    pub fn failing_write(self, path: &str) -> Self {
        self.state.lock().fail_writes.insert(path.to_string());
        self
    }

    /// Make deleting `path` fail.
    #[must_use]
    pub fn failing_delete(self, path: &str) -> Self {
        self.state.lock().fail_deletes.insert(path.to_string());
        self
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().files.get(path).cloned()
    }

    /// Current file names, sorted.
    pub fn file_names(&self) -> Vec<String> {
        self.state.lock().files.keys().cloned().collect()
    }

    /// Mutating calls that succeeded, in order.
    pub fn ops(&self) -> Vec<StoreOp> {
        self.state.lock().ops.clone()
    }

    pub fn write_count(&self) -> usize {
        self.state
            .lock()
            .ops
            .iter()
            .filter(|op| matches!(op, StoreOp::Write(_)))
            .count()
    }

    fn injected(&self, endpoint: String) -> RepoError {
        RepoError::Remote {
            endpoint,
            status: 500,
            body: format!("injected failure on {}", self.branch),
        }
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    fn branch(&self) -> &str {
        &self.branch
    }

    async fn read_text(&self, path: &str) -> Result<Option<String>, RepoError> {
        Ok(self
            .state
            .lock()
            .files
            .get(path)
            .map(|b| String::from_utf8_lossy(b).into_owned()))
    }

    async fn read_binary(&self, path: &str) -> Result<Option<Vec<u8>>, RepoError> {
        Ok(self.file(path))
    }

    async fn delete_matching(&self, suffix: &str) -> Result<PurgeReport, RepoError> {
        let mut state = self.state.lock();
        if state.fail_listing {
            return Err(self.injected("GET contents".into()));
        }

        let matching: Vec<String> = state
            .files
            .keys()
            .filter(|name| name.ends_with(suffix))
            .cloned()
            .collect();

        let mut report = PurgeReport::default();
        for name in matching {
            if state.fail_deletes.contains(&name) {
                report.failed.push(PurgeFailure {
                    error: self.injected(format!("DELETE contents/{name}")),
                    name,
                });
                continue;
            }
            state.files.remove(&name);
            state.ops.push(StoreOp::Delete(name.clone()));
            report.deleted.push(name);
        }
        Ok(report)
    }

    async fn write_binary(
        &self,
        path: &str,
        bytes: &[u8],
        _message: &str,
    ) -> Result<(), RepoError> {
        let mut state = self.state.lock();
        if state.fail_writes.contains(path) {
            return Err(self.injected(format!("PUT contents/{path}")));
        }
        state.files.insert(path.to_string(), bytes.to_vec());
        state.ops.push(StoreOp::Write(path.to_string()));
        Ok(())
    }

    async fn write_text(&self, path: &str, text: &str, message: &str) -> Result<(), RepoError> {
        self.write_binary(path, text.as_bytes(), message).await
    }
}
