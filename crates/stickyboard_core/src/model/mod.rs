//! Domain model for sticky note cards.
//!
//! # Responsibility
//! - Define the canonical note record and its validated value types.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
