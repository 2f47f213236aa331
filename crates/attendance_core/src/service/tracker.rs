//! Attendance tracker facade.
//!
//! # Responsibility
//! - Own the participant and session collections and their blob mirror.
//! - Seed collections once from storage, then write through after every
//!   successful mutation.
//! - Track which session is open for attendance-taking.
//!
//! # Invariants
//! - Storage is read only in [`AttendanceTracker::load`].
//! - A rejected operation performs no write.
//! - A failed write never rolls back memory; it is returned as a warning.
//! - Removing the open session closes the attendance view.

use super::participant_store::ParticipantStore;
use super::session_store::SessionStore;
use super::snapshot::{load_collection, save_collection, PersistenceError};
use super::{EntityKind, StoreError, StoreResult};
use crate::config::StorageKeys;
use crate::model::participant::{Participant, ParticipantDraft};
use crate::model::session::{Session, SessionDraft};
use crate::model::SessionId;
use crate::report::{self, AttendanceReport, AttendanceSummary, ExportError};
use crate::repo::blob_repo::BlobRepository;
use log::{error, info, warn};
use std::path::{Path, PathBuf};

/// Result of a mutation that was applied in memory.
///
/// `warning` is set when the write-through failed; the change is visible now
/// but may not survive a restart.
#[derive(Debug)]
#[must_use]
pub struct Applied<T> {
    value: T,
    warning: Option<PersistenceError>,
}

impl<T> Applied<T> {
    fn new(value: T, warning: Option<PersistenceError>) -> Self {
        Self { value, warning }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn warning(&self) -> Option<&PersistenceError> {
        self.warning.as_ref()
    }

    pub fn is_durable(&self) -> bool {
        self.warning.is_none()
    }

    pub fn into_parts(self) -> (T, Option<PersistenceError>) {
        (self.value, self.warning)
    }
}

/// Single owner of tracker state, created once per process.
pub struct AttendanceTracker<R: BlobRepository> {
    repo: R,
    keys: StorageKeys,
    participants: ParticipantStore,
    sessions: SessionStore,
    active_session: Option<SessionId>,
}

impl<R: BlobRepository> AttendanceTracker<R> {
    /// Loads both collections from `repo` under the default keys.
    pub fn load(repo: R) -> Result<Self, PersistenceError> {
        Self::load_with_keys(repo, StorageKeys::default())
    }

    /// Loads both collections from `repo` under custom keys.
    ///
    /// # Errors
    /// - Storage read failures and malformed blobs. Nothing is written.
    pub fn load_with_keys(repo: R, keys: StorageKeys) -> Result<Self, PersistenceError> {
        let participants: Vec<Participant> = load_collection(&repo, &keys.participants)
            .inspect_err(|err| log_load_failure(err))?;
        let sessions: Vec<Session> =
            load_collection(&repo, &keys.sessions).inspect_err(|err| log_load_failure(err))?;

        info!(
            "event=tracker_load module=tracker status=ok participants={} sessions={}",
            participants.len(),
            sessions.len()
        );

        Ok(Self {
            repo,
            keys,
            participants: ParticipantStore::from_vec(participants),
            sessions: SessionStore::from_vec(sessions),
            active_session: None,
        })
    }

    pub fn participants(&self) -> &[Participant] {
        self.participants.list()
    }

    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.get(id)
    }

    pub fn sessions(&self) -> &[Session] {
        self.sessions.list()
    }

    pub fn session(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn add_participant(
        &mut self,
        draft: ParticipantDraft,
    ) -> StoreResult<Applied<Participant>> {
        let participant = self
            .participants
            .add(draft)
            .inspect_err(|err| log_rejected("participant_add", err))?;
        info!(
            "event=participant_add module=tracker status=ok id={}",
            participant.id
        );
        Ok(Applied::new(participant, self.persist_participants()))
    }

    pub fn update_participant(
        &mut self,
        id: &str,
        draft: ParticipantDraft,
    ) -> StoreResult<Applied<Participant>> {
        let participant = self
            .participants
            .update(id, draft)
            .inspect_err(|err| log_rejected("participant_update", err))?;
        info!("event=participant_update module=tracker status=ok id={id}");
        Ok(Applied::new(participant, self.persist_participants()))
    }

    /// Removes a participant. Attendance entries referencing it are kept.
    pub fn remove_participant(&mut self, id: &str) -> StoreResult<Applied<Participant>> {
        let participant = self
            .participants
            .remove(id)
            .inspect_err(|err| log_rejected("participant_remove", err))?;
        info!("event=participant_remove module=tracker status=ok id={id}");
        Ok(Applied::new(participant, self.persist_participants()))
    }

    pub fn add_session(&mut self, draft: SessionDraft) -> StoreResult<Applied<Session>> {
        let session = self
            .sessions
            .add(draft)
            .inspect_err(|err| log_rejected("session_add", err))?;
        info!("event=session_add module=tracker status=ok id={}", session.id);
        Ok(Applied::new(session, self.persist_sessions()))
    }

    pub fn update_session(
        &mut self,
        id: &str,
        draft: SessionDraft,
    ) -> StoreResult<Applied<Session>> {
        let session = self
            .sessions
            .update(id, draft)
            .inspect_err(|err| log_rejected("session_update", err))?;
        info!("event=session_update module=tracker status=ok id={id}");
        Ok(Applied::new(session, self.persist_sessions()))
    }

    /// Removes a session, closing the attendance view if it was open on it.
    pub fn remove_session(&mut self, id: &str) -> StoreResult<Applied<Session>> {
        let session = self
            .sessions
            .remove(id)
            .inspect_err(|err| log_rejected("session_remove", err))?;
        if self.active_session.as_deref() == Some(id) {
            self.active_session = None;
            info!("event=attendance_close module=tracker status=ok id={id} reason=session_removed");
        }
        info!("event=session_remove module=tracker status=ok id={id}");
        Ok(Applied::new(session, self.persist_sessions()))
    }

    /// Flips presence for one participant and returns the new value.
    pub fn toggle_attendance(
        &mut self,
        session_id: &str,
        participant_id: &str,
    ) -> StoreResult<Applied<bool>> {
        let present = self
            .sessions
            .toggle_attendance(session_id, participant_id)
            .inspect_err(|err| log_rejected("attendance_toggle", err))?;
        info!(
            "event=attendance_toggle module=tracker status=ok session_id={session_id} participant_id={participant_id} present={present}"
        );
        Ok(Applied::new(present, self.persist_sessions()))
    }

    /// Opens `session_id` for attendance-taking, replacing any open session.
    pub fn open_attendance(&mut self, session_id: &str) -> StoreResult<&Session> {
        let session = self
            .sessions
            .get(session_id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Session, session_id))?;
        self.active_session = Some(session.id.clone());
        Ok(session)
    }

    pub fn close_attendance(&mut self) {
        self.active_session = None;
    }

    /// Session currently open for attendance-taking.
    pub fn active_session(&self) -> Option<&Session> {
        self.active_session
            .as_deref()
            .and_then(|id| self.sessions.get(id))
    }

    /// Present/absent counts for a session against current participants.
    pub fn summary(&self, session_id: &str) -> StoreResult<AttendanceSummary> {
        let session = self.require_session(session_id)?;
        Ok(report::summarize(session, self.participants.list()))
    }

    pub fn report(&self, session_id: &str) -> StoreResult<AttendanceReport> {
        let session = self.require_session(session_id)?;
        Ok(report::generate_report(session, self.participants.list()))
    }

    /// Renders the session report and writes it into `dir`.
    pub fn export_report(
        &self,
        session_id: &str,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf, ExportError> {
        let report = self.report(session_id)?;
        let path = report::write_report(&report, dir.as_ref())?;
        info!("event=report_export module=tracker status=ok session_id={session_id}");
        Ok(path)
    }

    /// Rewrites both collections, e.g. after an earlier write-through failed.
    pub fn flush(&self) -> Result<(), PersistenceError> {
        save_collection(&self.repo, &self.keys.participants, self.participants.list())?;
        save_collection(&self.repo, &self.keys.sessions, self.sessions.list())?;
        info!("event=tracker_flush module=tracker status=ok");
        Ok(())
    }

    fn require_session(&self, id: &str) -> StoreResult<&Session> {
        self.sessions
            .get(id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Session, id))
    }

    fn persist_participants(&self) -> Option<PersistenceError> {
        save_collection(&self.repo, &self.keys.participants, self.participants.list())
            .inspect_err(log_write_failure)
            .err()
    }

    fn persist_sessions(&self) -> Option<PersistenceError> {
        save_collection(&self.repo, &self.keys.sessions, self.sessions.list())
            .inspect_err(log_write_failure)
            .err()
    }
}

fn log_rejected(event: &str, err: &StoreError) {
    let reason = match err {
        StoreError::Validation(_) => "validation",
        StoreError::NotFound { .. } => "not_found",
    };
    warn!("event={event} module=tracker status=rejected reason={reason} error={err}");
}

fn log_write_failure(err: &PersistenceError) {
    warn!(
        "event=persist module=tracker status=error key={} durable=false error={}",
        err.key(),
        err
    );
}

fn log_load_failure(err: &PersistenceError) {
    error!(
        "event=tracker_load module=tracker status=error key={} error={}",
        err.key(),
        err
    );
}
