//! SQLite-backed note persistence.
//!
//! # Responsibility
//! - Store one JSON record per note, keyed by note id.
//! - Replace the full stored set in a single transaction.
//!
//! # Invariants
//! - `save_all` is atomic: readers see either the old or the new set.
//! - Corrupt rows are skipped on load, never surfaced as errors.

use crate::db::{open_db, open_db_in_memory};
use crate::model::note::{Note, NoteId};
use crate::persist::adapter::{NotePersistence, PersistResult};
use log::{error, info, warn};
use rusqlite::{params, Connection, TransactionBehavior};
use std::path::Path;
use std::time::Instant;

/// Note persistence over a migrated SQLite connection.
pub struct SqliteNotePersistence {
    conn: Connection,
}

impl SqliteNotePersistence {
    /// Opens (or creates) a board database file.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a throwaway in-memory database.
    pub fn open_in_memory() -> PersistResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Read-only access for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Loads all rows, reporting storage failures to the caller.
    pub fn try_load_all(&self) -> PersistResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, record FROM notes ORDER BY rowid ASC;")?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get("id")?;
            let record: String = row.get("record")?;
            match decode_record(&id, &record) {
                Some(note) => notes.push(note),
                None => warn!(
                    "event=note_load module=persist status=error error_code=corrupt_record key={}",
                    id
                ),
            }
        }
        Ok(notes)
    }
}

impl NotePersistence for SqliteNotePersistence {
    fn is_supported(&self) -> bool {
        true
    }

    fn load_all(&mut self) -> Vec<Note> {
        let started_at = Instant::now();
        match self.try_load_all() {
            Ok(notes) => {
                info!(
                    "event=notes_load module=persist status=ok count={} duration_ms={}",
                    notes.len(),
                    started_at.elapsed().as_millis()
                );
                notes
            }
            Err(err) => {
                error!(
                    "event=notes_load module=persist status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Vec::new()
            }
        }
    }

    fn save_all(&mut self, notes: &[Note]) -> PersistResult<()> {
        let records = notes
            .iter()
            .map(|note| Ok((note.id.to_string(), serde_json::to_string(note)?)))
            .collect::<PersistResult<Vec<_>>>()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM notes;", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO notes (id, record, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000));",
            )?;
            for (id, record) in &records {
                insert.execute(params![id, record])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn delete_one(&mut self, id: NoteId) -> PersistResult<()> {
        self.conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id.to_string()])?;
        Ok(())
    }
}

/// Decodes one stored row; the key must match the record's own id.
fn decode_record(key: &str, record: &str) -> Option<Note> {
    let note: Note = serde_json::from_str(record).ok()?;
    (note.id.to_string() == key).then_some(note)
}

#[cfg(test)]
mod tests {
    use super::decode_record;
    use crate::model::note::Note;

    #[test]
    fn decode_record_rejects_mismatched_key() {
        let note = Note::new(0.0, 0.0, 200.0, 200.0);
        let record = serde_json::to_string(&note).unwrap();
        assert!(decode_record(&note.id.to_string(), &record).is_some());
        assert!(decode_record("other-key", &record).is_none());
        assert!(decode_record(&note.id.to_string(), "{not json").is_none());
    }
}
