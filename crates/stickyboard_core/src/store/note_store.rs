//! Authoritative in-memory note collection.
//!
//! # Responsibility
//! - Own every note and apply clamp/layering rules on each mutation.
//! - Notify subscribers after each completed mutation.
//! - Queue deleted ids so the persistence side can remove them.
//!
//! # Invariants
//! - Listeners only ever observe a collection with consistent z-order.
//! - Unknown ids are ignored by every operation; nothing here errors.
//! - `revision` strictly increases with every published event.

use crate::layout::clamp::{
    clamp_fully_visible, clamp_geometry, random_position, Geometry, Point, Size, Viewport,
};
use crate::layout::layering::{bring_to_front, creation_z_index, is_consistent, recompute_all};
use crate::model::note::{Note, NoteId, NotePatch};
use log::{debug, warn};
use std::collections::HashSet;
use std::fmt::{Debug, Formatter};

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Created(NoteId),
    Updated(NoteId),
    Deleted(NoteId),
}

impl StoreEvent {
    pub fn note_id(&self) -> NoteId {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Deleted(id) => *id,
        }
    }
}

/// Handle returned by `NoteStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback receiving each event plus the post-mutation note list.
pub type StoreListener = Box<dyn FnMut(&StoreEvent, &[Note])>;

/// Single owner of all notes on the board.
pub struct NoteStore {
    notes: Vec<Note>,
    viewport: Viewport,
    listeners: Vec<(SubscriptionId, StoreListener)>,
    next_subscription: u64,
    revision: u64,
    pending_deletions: Vec<NoteId>,
}

impl Debug for NoteStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteStore")
            .field("notes", &self.notes)
            .field("viewport", &self.viewport)
            .field("listeners", &self.listeners.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl NoteStore {
    /// Creates an empty store for the given viewport.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            notes: Vec::new(),
            viewport: viewport.normalized(),
            listeners: Vec::new(),
            next_subscription: 0,
            revision: 0,
            pending_deletions: Vec::new(),
        }
    }

    /// Creates a store seeded with previously persisted notes.
    ///
    /// Records with non-finite geometry and repeated ids are dropped,
    /// undersized records are floored, and z-order is re-derived when the
    /// stored values are not consistent with priorities.
    pub fn with_notes(viewport: Viewport, notes: Vec<Note>) -> Self {
        let mut store = Self::new(viewport);
        let mut seen = HashSet::new();
        for mut note in notes {
            if !seen.insert(note.id) {
                warn!(
                    "event=note_load module=store status=error error_code=duplicate_id note_id={}",
                    note.id
                );
                continue;
            }
            let finite = [note.x, note.y, note.width, note.height]
                .iter()
                .all(|value| value.is_finite());
            if !finite {
                warn!(
                    "event=note_load module=store status=error error_code=non_finite_geometry note_id={}",
                    note.id
                );
                continue;
            }
            let size = Size::new(note.width, note.height).floored();
            note.width = size.width;
            note.height = size.height;
            store.notes.push(note);
        }

        if !is_consistent(&store.notes) {
            debug!("event=layering_recompute module=store status=ok reason=load");
            recompute_all(&mut store.notes, None);
        }
        store
    }

    /// Creates a note with default attributes and returns a copy of it.
    ///
    /// Without `position` the note lands at a random fully visible spot.
    /// The result is always clamped fully into the viewport.
    pub fn create(&mut self, position: Option<Point>, size: Option<Size>) -> Note {
        let size = size.unwrap_or_default().floored();
        let proposed =
            position.unwrap_or_else(|| random_position(&mut rand::rng(), size, self.viewport));
        let placed = clamp_fully_visible(proposed, size, self.viewport);

        let mut note = Note::new(placed.x, placed.y, size.width, size.height);
        note.z_index = creation_z_index(&mut self.notes, note.priority);
        self.notes.push(note.clone());

        debug!(
            "event=note_create module=store status=ok note_id={} z_index={}",
            note.id, note.z_index
        );
        self.publish(StoreEvent::Created(note.id));
        note
    }

    /// Merges `patch` into the note and re-applies layout rules.
    ///
    /// Returns whether anything changed. Unknown ids and empty patches are
    /// no-ops.
    pub fn update(&mut self, id: NoteId, patch: NotePatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        let Some(index) = self.index_of(id) else {
            debug!("event=note_update module=store status=ignored reason=unknown_id note_id={id}");
            return false;
        };

        let before = self.notes[index].clone();
        {
            let note = &mut self.notes[index];
            // Non-finite coordinates keep the current value; non-finite
            // lengths fall to the minimum in `clamp_geometry`.
            let proposed = Geometry::new(
                finite_or(patch.x, note.x),
                finite_or(patch.y, note.y),
                patch.width.unwrap_or(note.width),
                patch.height.unwrap_or(note.height),
            );
            let geometry = clamp_geometry(proposed, self.viewport);
            note.x = geometry.x;
            note.y = geometry.y;
            note.width = geometry.width;
            note.height = geometry.height;
            if let Some(content) = patch.content {
                note.content = content;
            }
            if let Some(color) = patch.color {
                note.color = color;
            }
            if let Some(priority) = patch.priority {
                note.priority = priority;
            }
        }

        let after = &self.notes[index];
        let priority_changed = after.priority != before.priority;
        let geometry_changed = after.x != before.x
            || after.y != before.y
            || after.width != before.width
            || after.height != before.height;

        if priority_changed {
            debug!(
                "event=layering_recompute module=store status=ok reason=priority_change note_id={id}"
            );
            recompute_all(&mut self.notes, Some(id));
        } else if geometry_changed {
            bring_to_front(&mut self.notes, id);
        }

        if self.notes[index] == before {
            return false;
        }
        self.publish(StoreEvent::Updated(id));
        true
    }

    /// Raises the note above its same-priority siblings.
    ///
    /// Returns whether the z-index changed.
    pub fn bring_to_front(&mut self, id: NoteId) -> bool {
        if !bring_to_front(&mut self.notes, id) {
            return false;
        }
        self.publish(StoreEvent::Updated(id));
        true
    }

    /// Removes a note. Returns `false` when the id is unknown.
    pub fn delete(&mut self, id: NoteId) -> bool {
        let Some(index) = self.index_of(id) else {
            debug!("event=note_delete module=store status=ignored reason=unknown_id note_id={id}");
            return false;
        };
        self.notes.remove(index);
        self.pending_deletions.push(id);
        debug!("event=note_delete module=store status=ok note_id={id}");
        self.publish(StoreEvent::Deleted(id));
        true
    }

    /// Registers a change listener.
    pub fn subscribe(&mut self, listener: StoreListener) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Removes a listener. Returns `false` when it was already removed.
    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription);
        self.listeners.len() != before
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn contains(&self, id: NoteId) -> bool {
        self.index_of(id).is_some()
    }

    /// All notes in creation order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Updates the bounds used by subsequent clamps.
    ///
    /// Existing notes are not moved until they are next updated.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport.normalized();
    }

    /// Counter bumped by every published event.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drains ids deleted since the last call.
    pub fn take_pending_deletions(&mut self) -> Vec<NoteId> {
        std::mem::take(&mut self.pending_deletions)
    }

    fn index_of(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }

    fn publish(&mut self, event: StoreEvent) {
        self.revision += 1;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event, &self.notes);
        }
    }
}

fn finite_or(value: Option<f64>, current: f64) -> f64 {
    value.filter(|value| value.is_finite()).unwrap_or(current)
}
