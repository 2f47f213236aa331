//! In-process blob repository.
//!
//! Clones share the same underlying map, so a caller can keep a handle for
//! inspection after moving another into a tracker. An optional byte quota
//! mimics browser storage limits.

use super::blob_repo::{ensure_key, BlobRepository, RepoError, RepoResult};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Default)]
struct MemoryState {
    blobs: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryState {
    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.blobs
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(existing, value)| existing.len() + value.len())
            .sum()
    }
}

/// Shared in-memory blob storage for tests and ephemeral runs.
#[derive(Clone, Debug, Default)]
pub struct MemoryBlobRepository {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryBlobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage that rejects writes once keys plus values exceed
    /// `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        let repo = Self::default();
        repo.set_quota(Some(quota_bytes));
        repo
    }

    /// Changes the quota for this and every cloned handle.
    pub fn set_quota(&self, quota_bytes: Option<usize>) {
        self.state.borrow_mut().quota_bytes = quota_bytes;
    }

    /// Seeds a blob directly, bypassing the quota.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.state
            .borrow_mut()
            .blobs
            .insert(key.into(), value.into());
    }

    pub fn used_bytes(&self) -> usize {
        self.state.borrow().used_bytes_excluding("")
    }
}

impl BlobRepository for MemoryBlobRepository {
    fn read_blob(&self, key: &str) -> RepoResult<Option<String>> {
        ensure_key(key)?;
        Ok(self.state.borrow().blobs.get(key).cloned())
    }

    fn write_blob(&self, key: &str, value: &str) -> RepoResult<()> {
        ensure_key(key)?;
        let mut state = self.state.borrow_mut();
        if let Some(quota_bytes) = state.quota_bytes {
            let required_bytes = state.used_bytes_excluding(key) + key.len() + value.len();
            if required_bytes > quota_bytes {
                return Err(RepoError::QuotaExceeded {
                    key: key.to_string(),
                    required_bytes,
                    quota_bytes,
                });
            }
        }
        state.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
