//! Participant collection.
//!
//! # Invariants
//! - Listing preserves insertion order.
//! - Removal never touches session attendance maps.

use super::{fresh_id, EntityKind, StoreError, StoreResult};
use crate::model::participant::{Participant, ParticipantDraft};

/// Ordered, in-memory participant collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantStore {
    items: Vec<Participant>,
}

impl ParticipantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the collection from previously persisted participants.
    pub fn from_vec(items: Vec<Participant>) -> Self {
        Self { items }
    }

    /// Validates the draft and appends a participant under a fresh identity.
    pub fn add(&mut self, draft: ParticipantDraft) -> StoreResult<Participant> {
        draft.validate()?;
        let id = fresh_id(|candidate| self.contains(candidate));
        let participant = Participant::from_draft(id, draft)?;
        self.items.push(participant.clone());
        Ok(participant)
    }

    /// Replaces name/email/phone of an existing participant.
    ///
    /// # Errors
    /// - `NotFound` is checked before validation.
    pub fn update(&mut self, id: &str, draft: ParticipantDraft) -> StoreResult<Participant> {
        let participant = self
            .items
            .iter_mut()
            .find(|participant| participant.id == id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Participant, id))?;
        participant.apply(draft)?;
        Ok(participant.clone())
    }

    /// Removes a participant and returns it.
    pub fn remove(&mut self, id: &str) -> StoreResult<Participant> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::not_found(EntityKind::Participant, id))?;
        Ok(self.items.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.items.iter().find(|participant| participant.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn list(&self) -> &[Participant] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|participant| participant.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::ParticipantStore;
    use crate::model::participant::ParticipantDraft;
    use crate::model::ValidationError;
    use crate::service::{EntityKind, StoreError};

    #[test]
    fn update_prefers_not_found_over_validation() {
        let mut store = ParticipantStore::new();
        let err = store.update("ghost", ParticipantDraft::new("")).unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                kind: EntityKind::Participant,
                ..
            }
        ));
    }

    #[test]
    fn add_rejects_blank_name_without_growing() {
        let mut store = ParticipantStore::new();
        let err = store.add(ParticipantDraft::new("   ")).unwrap_err();
        assert_eq!(err, StoreError::Validation(ValidationError::EmptyField("name")));
        assert!(store.is_empty());
    }

    #[test]
    fn remove_returns_removed_participant_and_keeps_order() {
        let mut store = ParticipantStore::new();
        let ann = store.add(ParticipantDraft::new("Ann")).unwrap();
        let bo = store.add(ParticipantDraft::new("Bo")).unwrap();
        let cy = store.add(ParticipantDraft::new("Cy")).unwrap();

        let removed = store.remove(&bo.id).unwrap();
        assert_eq!(removed, bo);
        let names: Vec<_> = store.list().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Ann", "Cy"]);
        assert!(store.contains(&ann.id));
        assert!(store.contains(&cy.id));
    }
}
