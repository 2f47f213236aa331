//! Session collection and attendance toggling.
//!
//! # Invariants
//! - Listing preserves insertion order.
//! - Updates keep identity and the attendance map.
//! - Toggling never validates the participant identity.

use super::{fresh_id, EntityKind, StoreError, StoreResult};
use crate::model::session::{Session, SessionDraft};

/// Ordered, in-memory session collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStore {
    items: Vec<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<Session>) -> Self {
        Self { items }
    }

    /// Validates the draft and appends a session with an empty attendance map.
    pub fn add(&mut self, draft: SessionDraft) -> StoreResult<Session> {
        draft.validate()?;
        let id = fresh_id(|candidate| self.contains(candidate));
        let session = Session::from_draft(id, draft)?;
        self.items.push(session.clone());
        Ok(session)
    }

    pub fn update(&mut self, id: &str, draft: SessionDraft) -> StoreResult<Session> {
        let session = self.get_mut(id)?;
        session.apply(draft)?;
        Ok(session.clone())
    }

    pub fn remove(&mut self, id: &str) -> StoreResult<Session> {
        let index = self
            .items
            .iter()
            .position(|session| session.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Session, id))?;
        Ok(self.items.remove(index))
    }

    /// Flips presence of `participant_id` in the session and returns the new
    /// value.
    pub fn toggle_attendance(
        &mut self,
        session_id: &str,
        participant_id: &str,
    ) -> StoreResult<bool> {
        let session = self.get_mut(session_id)?;
        Ok(session.attendance.toggle(participant_id))
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.items.iter().find(|session| session.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn list(&self) -> &[Session] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn get_mut(&mut self, id: &str) -> StoreResult<&mut Session> {
        self.items
            .iter_mut()
            .find(|session| session.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Session, id))
    }
}

#[cfg(test)]
mod tests {
    use super::SessionStore;
    use crate::model::session::SessionDraft;
    use crate::service::{EntityKind, StoreError};

    fn draft(name: &str) -> SessionDraft {
        SessionDraft::new(name, "2024-05-01", "Hall A")
    }

    #[test]
    fn toggle_on_missing_session_is_not_found() {
        let mut store = SessionStore::new();
        let err = store.toggle_attendance("ghost", "p1").unwrap_err();
        assert_eq!(
            err,
            StoreError::NotFound {
                kind: EntityKind::Session,
                id: "ghost".to_string()
            }
        );
    }

    #[test]
    fn toggle_accepts_unknown_participant_ids() {
        let mut store = SessionStore::new();
        let session = store.add(draft("Intake")).unwrap();
        assert!(store.toggle_attendance(&session.id, "never-existed").unwrap());
        assert!(store.get(&session.id).unwrap().is_present("never-existed"));
    }

    #[test]
    fn failed_update_keeps_session() {
        let mut store = SessionStore::new();
        let session = store.add(draft("Intake")).unwrap();
        store
            .update(&session.id, SessionDraft::new("Intake", "2024-05-01", " "))
            .unwrap_err();
        assert_eq!(store.get(&session.id), Some(&session));
    }
}
