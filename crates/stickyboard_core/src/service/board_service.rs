//! Board facade for render hosts.
//!
//! # Responsibility
//! - Wire note store, interaction controller and persistence together.
//! - Load persisted notes once at startup.
//! - Forward deletions and schedule debounced whole-board saves.
//!
//! # Invariants
//! - In-memory state is authoritative; persistence failures are logged and
//!   never undo a mutation.
//! - Every change re-arms the single pending save; a save always writes the
//!   current full state.
//! - Memory-only boards never touch the persistence adapter after startup.

use crate::config::BoardConfig;
use crate::interaction::controller::{GestureOutcome, InteractionController};
use crate::layout::clamp::{Point, ResizeHandle, Size, Viewport};
use crate::model::note::{Note, NoteId, NotePatch};
use crate::persist::adapter::{MemoryOnlyPersistence, NotePersistence};
use crate::persist::debounce::SaveDebouncer;
use crate::persist::sqlite::SqliteNotePersistence;
use crate::store::note_store::{NoteStore, StoreListener, SubscriptionId};
use log::{error, info, warn};
use std::path::Path;
use std::time::Instant;

/// Result of one save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// The full note set was written.
    Saved { count: usize },
    /// The write failed; another attempt is scheduled.
    Failed,
    /// The board runs memory-only.
    Skipped,
}

/// One sticky-notes board with its persistence wiring.
pub struct Board<P: NotePersistence> {
    store: NoteStore,
    controller: InteractionController,
    persistence: P,
    debouncer: SaveDebouncer,
    memory_only: bool,
    saved_revision: u64,
}

impl Board<Box<dyn NotePersistence>> {
    /// Opens a board stored in a SQLite file.
    ///
    /// Falls back to memory-only mode when the database cannot be opened.
    pub fn open_sqlite(config: BoardConfig, path: impl AsRef<Path>) -> Self {
        let persistence: Box<dyn NotePersistence> = match SqliteNotePersistence::open(path) {
            Ok(persistence) => Box::new(persistence),
            Err(err) => {
                error!(
                    "event=board_storage module=service status=error error_code=storage_unavailable error={}",
                    err
                );
                Box::new(MemoryOnlyPersistence)
            }
        };
        Self::open(config, persistence)
    }
}

impl<P: NotePersistence> Board<P> {
    /// Opens a board, loading persisted notes when storage is supported.
    pub fn open(config: BoardConfig, mut persistence: P) -> Self {
        let config = config.normalized();
        let memory_only = !persistence.is_supported();
        let notes = if memory_only {
            warn!("event=board_open module=service status=degraded mode=memory_only");
            Vec::new()
        } else {
            persistence.load_all()
        };

        let store = NoteStore::with_notes(config.viewport, notes);
        info!(
            "event=board_open module=service status=ok notes={} memory_only={}",
            store.len(),
            memory_only
        );

        Self {
            saved_revision: store.revision(),
            store,
            controller: InteractionController::new(config.trash),
            persistence,
            debouncer: SaveDebouncer::new(config.save_debounce()),
            memory_only,
        }
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Whether changes are kept for this session only.
    pub fn is_memory_only(&self) -> bool {
        self.memory_only
    }

    pub fn notes(&self) -> &[Note] {
        self.store.notes()
    }

    /// Stacking value the render layer should use for `note`.
    pub fn render_z(&self, note: &Note) -> i64 {
        self.controller.render_z(&self.store, note)
    }

    pub fn create_note(&mut self, position: Option<Point>, size: Option<Size>) -> Note {
        self.mutate(|store, _| store.create(position, size))
    }

    pub fn update_note(&mut self, id: NoteId, patch: NotePatch) -> bool {
        self.mutate(|store, _| store.update(id, patch))
    }

    pub fn delete_note(&mut self, id: NoteId) -> bool {
        self.mutate(|store, _| store.delete(id))
    }

    pub fn pointer_down_on_note(&mut self, id: NoteId, point: Point) -> bool {
        self.mutate(|store, controller| controller.pointer_down_on_note(store, id, point))
    }

    pub fn pointer_down_on_handle(&mut self, id: NoteId, handle: ResizeHandle, point: Point) -> bool {
        self.mutate(|store, controller| controller.pointer_down_on_handle(store, id, handle, point))
    }

    pub fn pointer_move(&mut self, point: Point) -> bool {
        self.mutate(|store, controller| controller.pointer_move(store, point))
    }

    pub fn pointer_up(&mut self, point: Point) -> GestureOutcome {
        self.mutate(|store, controller| controller.pointer_up(store, point))
    }

    pub fn cancel_gesture(&mut self) {
        self.controller.cancel();
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.store.set_viewport(viewport);
    }

    pub fn subscribe(&mut self, listener: StoreListener) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        self.store.unsubscribe(subscription)
    }

    /// Whether the in-memory board differs from the last successful save.
    pub fn has_unsaved_changes(&self) -> bool {
        !self.memory_only && self.store.revision() != self.saved_revision
    }

    /// Deadline of the pending save, if one is scheduled.
    pub fn pending_save_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Runs the pending save if its quiesce window has elapsed.
    pub fn flush_due(&mut self) -> Option<FlushOutcome> {
        self.flush_due_at(Instant::now())
    }

    pub fn flush_due_at(&mut self, now: Instant) -> Option<FlushOutcome> {
        if !self.debouncer.take_due_at(now) {
            return None;
        }
        Some(self.save_current(now))
    }

    /// Saves immediately, replacing any pending save.
    pub fn flush_now(&mut self) -> FlushOutcome {
        self.debouncer.cancel();
        self.save_current(Instant::now())
    }

    fn mutate<T>(&mut self, op: impl FnOnce(&mut NoteStore, &mut InteractionController) -> T) -> T {
        let revision = self.store.revision();
        let result = op(&mut self.store, &mut self.controller);
        self.sync_persistence(revision, Instant::now());
        result
    }

    fn sync_persistence(&mut self, revision_before: u64, now: Instant) {
        let deleted = self.store.take_pending_deletions();
        if self.memory_only {
            return;
        }

        for id in deleted {
            if let Err(err) = self.persistence.delete_one(id) {
                warn!(
                    "event=note_delete module=service status=error error_code=persist_delete_failed note_id={} error={}",
                    id, err
                );
            }
        }

        if self.store.revision() != revision_before {
            self.debouncer.schedule_at(now);
        }
    }

    fn save_current(&mut self, now: Instant) -> FlushOutcome {
        if self.memory_only {
            return FlushOutcome::Skipped;
        }

        let started_at = Instant::now();
        let revision = self.store.revision();
        let notes = self.store.notes();
        match self.persistence.save_all(notes) {
            Ok(()) => {
                self.saved_revision = revision;
                info!(
                    "event=notes_save module=service status=ok count={} duration_ms={}",
                    notes.len(),
                    started_at.elapsed().as_millis()
                );
                FlushOutcome::Saved { count: notes.len() }
            }
            Err(err) => {
                error!(
                    "event=notes_save module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                self.debouncer.schedule_at(now);
                FlushOutcome::Failed
            }
        }
    }
}
