//! Domain model for the attendance tracker.
//!
//! # Responsibility
//! - Define participant/session records and their persisted shape.
//! - Own field validation shared by every write path.
//!
//! # Invariants
//! - Identities are opaque strings assigned once at creation.
//! - Required text fields must be non-empty after trimming.
//! - Optional text fields never hold empty or whitespace-only values.

use serde::{Deserialize, Deserializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod participant;
pub mod session;

/// Opaque participant identity.
pub type ParticipantId = String;

/// Opaque session identity.
pub type SessionId = String;

/// Field-level validation failure. No mutation is applied when returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty or whitespace-only.
    EmptyField(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} is required"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

/// Maps blank optional input to `None` and trims surrounding whitespace.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Serde hook applying [`normalize_optional`] to stored optional text, so
/// blobs holding `""` load as absent.
pub(crate) fn deserialize_optional_text<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(normalize_optional)
}

#[cfg(test)]
mod tests {
    use super::{normalize_optional, require_text, ValidationError};

    #[test]
    fn require_text_rejects_whitespace_only() {
        assert_eq!(
            require_text("name", " \t\n"),
            Err(ValidationError::EmptyField("name"))
        );
        assert!(require_text("name", " Ann ").is_ok());
    }

    #[test]
    fn normalize_optional_drops_blank_values() {
        assert_eq!(normalize_optional(None), None);
        assert_eq!(normalize_optional(Some("   ".to_string())), None);
        assert_eq!(
            normalize_optional(Some(" ann@example.org ".to_string())),
            Some("ann@example.org".to_string())
        );
    }
}
