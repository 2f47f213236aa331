//! Tracker configuration and process bootstrap.
//!
//! # Responsibility
//! - Name the storage keys and on-disk locations used by the tracker.
//! - Wire logging, storage and load-on-start into one entry point.
//!
//! # Invariants
//! - Default keys match blobs written by earlier releases.
//! - `open_tracker` performs the only storage read of the process lifetime.

use crate::logging::{default_log_level, init_logging};
use crate::repo::blob_repo::{RepoError, SqliteBlobRepository};
use crate::service::snapshot::PersistenceError;
use crate::service::tracker::AttendanceTracker;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_PARTICIPANTS_KEY: &str = "ngo-participants";
pub const DEFAULT_SESSIONS_KEY: &str = "ngo-sessions";
pub const DEFAULT_DB_FILE_NAME: &str = "attendance.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Blob keys for the two persisted collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub participants: String,
    pub sessions: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            participants: DEFAULT_PARTICIPANTS_KEY.to_string(),
            sessions: DEFAULT_SESSIONS_KEY.to_string(),
        }
    }
}

/// On-disk layout and logging settings for one tracker process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Absolute directory holding the database and the `logs/` folder.
    pub data_dir: PathBuf,
    pub db_file_name: String,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    pub keys: StorageKeys,
}

impl TrackerConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            log_level: default_log_level().to_string(),
            keys: StorageKeys::default(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

#[derive(Debug)]
pub enum BootstrapError {
    Logging(String),
    DataDir(std::io::Error),
    Storage(RepoError),
    Load(PersistenceError),
}

impl Display for BootstrapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
            Self::DataDir(err) => write!(f, "failed to create data directory: {err}"),
            Self::Storage(err) => write!(f, "storage setup failed: {err}"),
            Self::Load(err) => write!(f, "loading saved data failed: {err}"),
        }
    }
}

impl Error for BootstrapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(_) => None,
            Self::DataDir(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Load(err) => Some(err),
        }
    }
}

impl From<RepoError> for BootstrapError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

impl From<PersistenceError> for BootstrapError {
    fn from(value: PersistenceError) -> Self {
        Self::Load(value)
    }
}

/// Initializes logging, opens the database and loads saved collections.
///
/// # Errors
/// - Logging setup errors, e.g. an invalid level or a relative `data_dir`.
/// - Data directory creation errors.
/// - Storage open/migration errors.
/// - Malformed saved data.
pub fn open_tracker(
    config: &TrackerConfig,
) -> Result<AttendanceTracker<SqliteBlobRepository>, BootstrapError> {
    let log_dir = config.log_dir();
    init_logging(&config.log_level, &log_dir.to_string_lossy()).map_err(BootstrapError::Logging)?;

    std::fs::create_dir_all(&config.data_dir).map_err(BootstrapError::DataDir)?;
    let repo = SqliteBlobRepository::open(config.db_path())?;
    let tracker = AttendanceTracker::load_with_keys(repo, config.keys.clone())?;

    info!(
        "event=tracker_open module=config status=ok data_dir={}",
        config.data_dir.display()
    );
    Ok(tracker)
}

#[cfg(test)]
mod tests {
    use super::{StorageKeys, TrackerConfig};
    use std::path::PathBuf;

    #[test]
    fn default_keys_match_saved_blob_names() {
        let keys = StorageKeys::default();
        assert_eq!(keys.participants, "ngo-participants");
        assert_eq!(keys.sessions, "ngo-sessions");
    }

    #[test]
    fn derived_paths_live_under_data_dir() {
        let config = TrackerConfig::new("/var/lib/attendance");
        assert_eq!(
            config.db_path(),
            PathBuf::from("/var/lib/attendance/attendance.sqlite3")
        );
        assert_eq!(config.log_dir(), PathBuf::from("/var/lib/attendance/logs"));
    }
}
