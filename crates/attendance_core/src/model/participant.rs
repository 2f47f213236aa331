//! Participant domain model.
//!
//! # Invariants
//! - `id` is stable and never reassigned after creation.
//! - `name` is non-empty after trimming.
//! - Updates replace `name`/`email`/`phone` wholesale and keep `id`.

use super::{
    deserialize_optional_text, normalize_optional, require_text, ParticipantId, ValidationError,
};
use serde::{Deserialize, Serialize};

/// A tracked individual eligible for attendance.
///
/// Serialized as `{id, name, email?, phone?}`; absent optional fields are
/// omitted from the persisted blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
}

/// User-editable participant fields, as collected by an add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantDraft {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ParticipantDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Validates required fields.
    ///
    /// # Errors
    /// - `ValidationError::EmptyField("name")` for blank names.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}

impl Participant {
    /// Builds a participant from a validated draft under the given identity.
    pub(crate) fn from_draft(
        id: ParticipantId,
        draft: ParticipantDraft,
    ) -> Result<Self, ValidationError> {
        draft.validate()?;
        Ok(Self {
            id,
            name: draft.name,
            email: normalize_optional(draft.email),
            phone: normalize_optional(draft.phone),
        })
    }

    /// Replaces every editable field with the draft, keeping identity.
    ///
    /// On error `self` is left untouched.
    pub(crate) fn apply(&mut self, draft: ParticipantDraft) -> Result<(), ValidationError> {
        draft.validate()?;
        self.name = draft.name;
        self.email = normalize_optional(draft.email);
        self.phone = normalize_optional(draft.phone);
        Ok(())
    }

    /// Renders `name (email) - phone`, omitting absent segments.
    pub fn contact_line(&self) -> String {
        let mut line = self.name.clone();
        if let Some(email) = &self.email {
            line.push_str(&format!(" ({email})"));
        }
        if let Some(phone) = &self.phone {
            line.push_str(&format!(" - {phone}"));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::{Participant, ParticipantDraft};
    use crate::model::ValidationError;

    #[test]
    fn from_draft_normalizes_blank_contact_fields() {
        let draft = ParticipantDraft::new("Ann").with_email("  ").with_phone(" 555-0101 ");
        let participant = Participant::from_draft("p1".to_string(), draft).unwrap();
        assert_eq!(participant.email, None);
        assert_eq!(participant.phone.as_deref(), Some("555-0101"));
    }

    #[test]
    fn apply_rejects_blank_name_without_mutation() {
        let mut participant =
            Participant::from_draft("p1".to_string(), ParticipantDraft::new("Ann")).unwrap();
        let err = participant.apply(ParticipantDraft::new("  ")).unwrap_err();
        assert_eq!(err, ValidationError::EmptyField("name"));
        assert_eq!(participant.name, "Ann");
    }

    #[test]
    fn contact_line_omits_missing_segments() {
        let full = Participant::from_draft(
            "p1".to_string(),
            ParticipantDraft::new("Ann")
                .with_email("ann@example.org")
                .with_phone("555"),
        )
        .unwrap();
        assert_eq!(full.contact_line(), "Ann (ann@example.org) - 555");

        let phone_only = Participant::from_draft(
            "p2".to_string(),
            ParticipantDraft::new("Bo").with_phone("777"),
        )
        .unwrap();
        assert_eq!(phone_only.contact_line(), "Bo - 777");
    }

    #[test]
    fn blank_stored_contact_fields_load_as_absent() {
        let participant: Participant = serde_json::from_str(
            r#"{"id":"1","name":"Ann","email":"","phone":"  555 "}"#,
        )
        .unwrap();
        assert_eq!(participant.email, None);
        assert_eq!(participant.phone.as_deref(), Some("555"));
        assert_eq!(participant.contact_line(), "Ann - 555");
    }

    #[test]
    fn serialization_omits_absent_optional_fields() {
        let participant =
            Participant::from_draft("p1".to_string(), ParticipantDraft::new("Ann")).unwrap();
        let json = serde_json::to_value(&participant).unwrap();
        assert_eq!(json, serde_json::json!({"id": "p1", "name": "Ann"}));
    }
}
