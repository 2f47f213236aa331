//! Keyed blob storage used as the durable mirror of tracker collections.
//!
//! # Responsibility
//! - Define the key/value contract the tracker writes through to.
//! - Keep SQLite details out of the service layer.
//!
//! # Invariants
//! - Keys are non-empty.
//! - A write either replaces the whole blob for a key or leaves it unchanged.

pub mod blob_repo;
pub mod memory_repo;
