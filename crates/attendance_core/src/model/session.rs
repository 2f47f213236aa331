//! Session domain model and attendance map.
//!
//! # Invariants
//! - `id` is stable and never reassigned after creation.
//! - `name` and `location` are non-empty after trimming.
//! - Updates never touch `id` or `attendance`.
//! - The attendance map is sparse: a missing key means "not present", and a
//!   key is never removed once written.

use super::{
    deserialize_optional_text, normalize_optional, require_text, ParticipantId, SessionId,
    ValidationError,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DEFAULT_START_TIME: &str = "09:00";
const DEFAULT_END_TIME: &str = "10:00";

/// Sparse participant-id -> presence mapping for one session.
///
/// All reads go through [`AttendanceMap::is_present`] so every caller shares
/// the same default-absent semantics. Entries may reference participants that
/// no longer exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceMap(BTreeMap<ParticipantId, bool>);

impl AttendanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns presence for `participant_id`; missing entries read as `false`.
    pub fn is_present(&self, participant_id: &str) -> bool {
        self.0.get(participant_id).copied().unwrap_or(false)
    }

    /// Flips presence and returns the new value.
    ///
    /// A missing entry becomes `true`; an existing entry is negated and kept.
    pub fn toggle(&mut self, participant_id: &str) -> bool {
        let next = !self.is_present(participant_id);
        self.0.insert(participant_id.to_string(), next);
        next
    }

    /// Returns whether an entry was ever written for `participant_id`.
    pub fn has_entry(&self, participant_id: &str) -> bool {
        self.0.contains_key(participant_id)
    }

    /// Number of explicit entries, including explicit `false` and dangling ids.
    pub fn entry_count(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ParticipantId, bool)> for AttendanceMap {
    fn from_iter<T: IntoIterator<Item = (ParticipantId, bool)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A single dated event with its own attendance map.
///
/// Persisted as `{id, name, date, startTime, endTime, location, description?,
/// attendance}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    /// Calendar date in ISO `YYYY-MM-DD` form. Not parsed.
    pub date: String,
    /// Local time of day, e.g. `09:00`. No ordering check against `end_time`.
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(default)]
    pub attendance: AttendanceMap,
}

/// User-editable session fields, as collected by an add/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDraft {
    pub name: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub description: Option<String>,
}

impl Default for SessionDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            date: today_iso(),
            start_time: DEFAULT_START_TIME.to_string(),
            end_time: DEFAULT_END_TIME.to_string(),
            location: String::new(),
            description: None,
        }
    }
}

/// Current UTC calendar date as `YYYY-MM-DD`.
pub fn today_iso() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

impl SessionDraft {
    /// Creates a draft with the default `09:00`-`10:00` time window.
    pub fn new(
        name: impl Into<String>,
        date: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            location: location.into(),
            ..Self::default()
        }
    }

    pub fn with_times(
        mut self,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        self.start_time = start_time.into();
        self.end_time = end_time.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validates required fields, `name` first.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("location", &self.location)
    }
}

impl Session {
    /// Builds a session with an empty attendance map.
    pub(crate) fn from_draft(id: SessionId, draft: SessionDraft) -> Result<Self, ValidationError> {
        draft.validate()?;
        Ok(Self {
            id,
            name: draft.name,
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            location: draft.location,
            description: normalize_optional(draft.description),
            attendance: AttendanceMap::new(),
        })
    }

    /// Replaces every editable field, keeping `id` and `attendance`.
    ///
    /// On error `self` is left untouched.
    pub(crate) fn apply(&mut self, draft: SessionDraft) -> Result<(), ValidationError> {
        draft.validate()?;
        self.name = draft.name;
        self.date = draft.date;
        self.start_time = draft.start_time;
        self.end_time = draft.end_time;
        self.location = draft.location;
        self.description = normalize_optional(draft.description);
        Ok(())
    }

    pub fn is_present(&self, participant_id: &str) -> bool {
        self.attendance.is_present(participant_id)
    }
}

#[cfg(test)]
mod tests {
    use super::{today_iso, AttendanceMap, Session, SessionDraft};
    use crate::model::ValidationError;

    #[test]
    fn toggle_inserts_true_then_keeps_explicit_false() {
        let mut map = AttendanceMap::new();
        assert!(!map.is_present("p1"));
        assert!(!map.has_entry("p1"));

        assert!(map.toggle("p1"));
        assert!(map.is_present("p1"));

        assert!(!map.toggle("p1"));
        assert!(!map.is_present("p1"));
        assert!(map.has_entry("p1"));
        assert_eq!(map.entry_count(), 1);
    }

    #[test]
    fn draft_defaults_to_morning_window() {
        let draft = SessionDraft::new("Intake", "2024-05-01", "Hall A");
        assert_eq!(draft.start_time, "09:00");
        assert_eq!(draft.end_time, "10:00");
    }

    #[test]
    fn default_draft_is_dated_today() {
        let before = today_iso();
        let draft = SessionDraft::default();
        let after = today_iso();

        assert!(draft.date == before || draft.date == after);
        assert!(chrono::NaiveDate::parse_from_str(&draft.date, "%Y-%m-%d").is_ok());
        assert!(draft.name.is_empty());
    }

    #[test]
    fn validate_reports_name_before_location() {
        let draft = SessionDraft::new(" ", "2024-05-01", "");
        assert_eq!(draft.validate(), Err(ValidationError::EmptyField("name")));

        let draft = SessionDraft::new("Intake", "2024-05-01", "  ");
        assert_eq!(
            draft.validate(),
            Err(ValidationError::EmptyField("location"))
        );
    }

    #[test]
    fn apply_preserves_attendance() {
        let mut session = Session::from_draft(
            "s1".to_string(),
            SessionDraft::new("Intake", "2024-05-01", "Hall A"),
        )
        .unwrap();
        session.attendance.toggle("p1");

        session
            .apply(
                SessionDraft::new("Intake (moved)", "2024-05-02", "Hall B").with_description("x"),
            )
            .unwrap();

        assert_eq!(session.id, "s1");
        assert_eq!(session.location, "Hall B");
        assert!(session.is_present("p1"));
    }

    #[test]
    fn persisted_layout_uses_camel_case_and_defaults_attendance() {
        let json = serde_json::json!({
            "id": "s1",
            "name": "Intake",
            "date": "2024-05-01",
            "startTime": "09:00",
            "endTime": "10:00",
            "location": "Hall A"
        });
        let session: Session = serde_json::from_value(json).unwrap();
        assert!(session.attendance.is_empty());
        assert_eq!(session.description, None);

        let encoded = serde_json::to_value(&session).unwrap();
        assert_eq!(encoded["startTime"], "09:00");
        assert_eq!(encoded["attendance"], serde_json::json!({}));
        assert!(encoded.get("description").is_none());
    }
}
