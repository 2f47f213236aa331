//! Tracker use-case services.
//!
//! # Responsibility
//! - Hold the participant/session collections as the source of truth.
//! - Mirror every collection change to blob storage (write-through).
//!
//! # Invariants
//! - A rejected operation leaves both collections unchanged.
//! - Identities are unique within a collection and never reassigned.

use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod participant_store;
pub mod session_store;
pub mod snapshot;
pub mod tracker;

pub type StoreResult<T> = Result<T, StoreError>;

/// Collection targeted by an operation, used in not-found reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Participant,
    Session,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Participant => write!(f, "participant"),
            Self::Session => write!(f, "session"),
        }
    }
}

/// Rejection of a store operation. Prior state is always unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Validation(ValidationError),
    NotFound { kind: EntityKind, id: String },
}

impl StoreError {
    pub(crate) fn not_found(kind: EntityKind, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Generates an identity not present in `taken`.
pub(crate) fn fresh_id(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let candidate = Uuid::new_v4().to_string();
        if !taken(&candidate) {
            return candidate;
        }
    }
}
