//! Persistence contract consumed by the board.
//!
//! # Responsibility
//! - Describe the key-value storage surface the board relies on.
//! - Provide the memory-only fallback used when storage is unavailable.
//!
//! # Invariants
//! - `load_all` never fails; it degrades to an empty list.
//! - `save_all` replaces the whole persisted set (clear-then-write).

use crate::db::DbError;
use crate::model::note::{Note, NoteId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PersistResult<T> = Result<T, PersistError>;

/// Failure of one persistence call.
#[derive(Debug)]
pub enum PersistError {
    Db(DbError),
    /// A note could not be encoded into its stored record.
    Encode(serde_json::Error),
    /// The adapter reports no storage support.
    Unsupported,
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode note record: {err}"),
            Self::Unsupported => write!(f, "persistence is not supported in this environment"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Unsupported => None,
        }
    }
}

impl From<DbError> for PersistError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Durable key-value storage for notes, keyed by note id.
pub trait NotePersistence {
    /// Capability probe. When `false` the board runs memory-only.
    fn is_supported(&self) -> bool;
    /// Loads every stored note. Failures are logged and yield an empty list.
    fn load_all(&mut self) -> Vec<Note>;
    /// Atomically replaces the stored set with `notes`.
    fn save_all(&mut self, notes: &[Note]) -> PersistResult<()>;
    /// Removes one stored note. Missing ids are not an error.
    fn delete_one(&mut self, id: NoteId) -> PersistResult<()>;
}

/// Adapter used when no durable storage is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryOnlyPersistence;

impl NotePersistence for MemoryOnlyPersistence {
    fn is_supported(&self) -> bool {
        false
    }

    fn load_all(&mut self) -> Vec<Note> {
        Vec::new()
    }

    fn save_all(&mut self, _notes: &[Note]) -> PersistResult<()> {
        Err(PersistError::Unsupported)
    }

    fn delete_one(&mut self, _id: NoteId) -> PersistResult<()> {
        Err(PersistError::Unsupported)
    }
}

impl<P: NotePersistence + ?Sized> NotePersistence for Box<P> {
    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }

    fn load_all(&mut self) -> Vec<Note> {
        (**self).load_all()
    }

    fn save_all(&mut self, notes: &[Note]) -> PersistResult<()> {
        (**self).save_all(notes)
    }

    fn delete_one(&mut self, id: NoteId) -> PersistResult<()> {
        (**self).delete_one(id)
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryOnlyPersistence, NotePersistence, PersistError};
    use crate::model::note::Note;

    #[test]
    fn memory_only_reports_unsupported_and_loads_nothing() {
        let mut adapter = MemoryOnlyPersistence;
        assert!(!adapter.is_supported());
        assert!(adapter.load_all().is_empty());
        let note = Note::new(0.0, 0.0, 200.0, 200.0);
        assert!(matches!(
            adapter.save_all(&[note.clone()]),
            Err(PersistError::Unsupported)
        ));
        assert!(matches!(
            adapter.delete_one(note.id),
            Err(PersistError::Unsupported)
        ));
    }
}
