//! Persisted layout of the two collections.
//!
//! Each collection is stored as one JSON array under its own key. The layout
//! is the wire format of the blobs and must stay loadable across versions.

use crate::repo::blob_repo::{BlobRepository, RepoError};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure to mirror a collection to, or seed it from, blob storage.
///
/// Write-side failures are non-fatal: in-memory state stays authoritative.
#[derive(Debug)]
pub enum PersistenceError {
    Encode {
        key: String,
        source: serde_json::Error,
    },
    Decode {
        key: String,
        source: serde_json::Error,
    },
    Repo {
        key: String,
        source: RepoError,
    },
}

impl PersistenceError {
    /// Storage key of the blob involved.
    pub fn key(&self) -> &str {
        match self {
            Self::Encode { key, .. } | Self::Decode { key, .. } | Self::Repo { key, .. } => {
                key.as_str()
            }
        }
    }
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode { key, source } => write!(f, "failed to encode `{key}`: {source}"),
            Self::Decode { key, source } => write!(f, "stored `{key}` is malformed: {source}"),
            Self::Repo { key, source } => write!(f, "storage failure for `{key}`: {source}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode { source, .. } | Self::Decode { source, .. } => Some(source),
            Self::Repo { source, .. } => Some(source),
        }
    }
}

/// Serializes a collection into its persisted JSON array form.
pub fn encode_collection<T: Serialize>(
    key: &str,
    items: &[T],
) -> Result<String, PersistenceError> {
    serde_json::to_string(items).map_err(|source| PersistenceError::Encode {
        key: key.to_string(),
        source,
    })
}

/// Parses a persisted JSON array back into an ordered collection.
pub fn decode_collection<T: DeserializeOwned>(
    key: &str,
    raw: &str,
) -> Result<Vec<T>, PersistenceError> {
    serde_json::from_str(raw).map_err(|source| PersistenceError::Decode {
        key: key.to_string(),
        source,
    })
}

/// Reads a collection; a key that was never written yields an empty one.
pub fn load_collection<T, R>(repo: &R, key: &str) -> Result<Vec<T>, PersistenceError>
where
    T: DeserializeOwned,
    R: BlobRepository + ?Sized,
{
    let raw = repo.read_blob(key).map_err(|source| PersistenceError::Repo {
        key: key.to_string(),
        source,
    })?;
    match raw {
        Some(raw) => decode_collection(key, &raw),
        None => {
            debug!("event=snapshot_load module=snapshot status=empty key={key}");
            Ok(Vec::new())
        }
    }
}

/// Writes the whole collection under `key`, replacing the previous blob.
pub fn save_collection<T, R>(repo: &R, key: &str, items: &[T]) -> Result<(), PersistenceError>
where
    T: Serialize,
    R: BlobRepository + ?Sized,
{
    let encoded = encode_collection(key, items)?;
    repo.write_blob(key, &encoded)
        .map_err(|source| PersistenceError::Repo {
            key: key.to_string(),
            source,
        })
}
