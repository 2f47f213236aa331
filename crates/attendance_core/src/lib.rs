//! Core state and persistence for a single-user attendance tracker.
//!
//! Participants and sessions live in memory inside an [`AttendanceTracker`],
//! which mirrors every change to keyed blob storage and renders plain-text
//! attendance reports. Presentation is left to callers.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod service;

pub use config::{open_tracker, BootstrapError, StorageKeys, TrackerConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::participant::{Participant, ParticipantDraft};
pub use model::session::{today_iso, AttendanceMap, Session, SessionDraft};
pub use model::{ParticipantId, SessionId, ValidationError};
pub use report::{
    generate_report, report_file_name, summarize, write_report, AttendanceReport,
    AttendanceSummary, ExportError,
};
pub use repo::blob_repo::{BlobRepository, RepoError, RepoResult, SqliteBlobRepository};
pub use repo::memory_repo::MemoryBlobRepository;
pub use service::participant_store::ParticipantStore;
pub use service::session_store::SessionStore;
pub use service::snapshot::PersistenceError;
pub use service::tracker::{Applied, AttendanceTracker};
pub use service::{EntityKind, StoreError, StoreResult};
