//! Pointer gesture state machine.
//!
//! # Responsibility
//! - Translate pointer down/move/up into note store operations.
//! - Own transient gesture state: active note, grab offset, trash hover.
//!
//! # Invariants
//! - Every gesture leaves `Dragging`/`Resizing` exactly once, on pointer up
//!   or cancel.
//! - A drag released over the trash deletes the note instead of moving it.
//! - A note deleted mid-gesture ends the gesture without errors.

use crate::interaction::trash::TrashZone;
use crate::layout::clamp::{
    clamp_drag, clamp_resize, Geometry, Point, ResizeHandle, ResizeStart, Size,
};
use crate::layout::layering::front_most_z;
use crate::model::note::{Note, NoteId, NotePatch};
use crate::store::note_store::NoteStore;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging {
        note_id: NoteId,
        /// Pointer position relative to the note's top-left corner.
        grab_offset: Point,
    },
    Resizing {
        note_id: NoteId,
        handle: ResizeHandle,
        start: ResizeStart,
    },
}

/// Result of a finished gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    None,
    Moved(NoteId),
    Resized(NoteId),
    Deleted(NoteId),
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    trash: TrashZone,
    trash_hover: bool,
}

impl InteractionController {
    pub fn new(trash: TrashZone) -> Self {
        Self {
            state: InteractionState::Idle,
            trash,
            trash_hover: false,
        }
    }

    /// Starts dragging a note and raises it within its band.
    ///
    /// Returns `false` when another gesture is active or the note is unknown.
    pub fn pointer_down_on_note(&mut self, store: &mut NoteStore, id: NoteId, point: Point) -> bool {
        if self.state != InteractionState::Idle {
            return false;
        }
        let Some(note) = store.get(id) else {
            return false;
        };
        let grab_offset = Point::new(point.x - note.x, point.y - note.y);
        store.bring_to_front(id);
        self.state = InteractionState::Dragging {
            note_id: id,
            grab_offset,
        };
        debug!("event=gesture_start module=interaction status=ok kind=drag note_id={id}");
        true
    }

    /// Starts resizing a note from one of its corner handles.
    pub fn pointer_down_on_handle(
        &mut self,
        store: &NoteStore,
        id: NoteId,
        handle: ResizeHandle,
        point: Point,
    ) -> bool {
        if self.state != InteractionState::Idle {
            return false;
        }
        let Some(note) = store.get(id) else {
            return false;
        };
        self.state = InteractionState::Resizing {
            note_id: id,
            handle,
            start: ResizeStart {
                mouse: point,
                geometry: Geometry::new(note.x, note.y, note.width, note.height),
            },
        };
        debug!("event=gesture_start module=interaction status=ok kind=resize note_id={id}");
        true
    }

    /// Applies an in-progress gesture at the new pointer position.
    ///
    /// Returns whether the store changed.
    pub fn pointer_move(&mut self, store: &mut NoteStore, point: Point) -> bool {
        match self.state {
            InteractionState::Idle => false,
            InteractionState::Dragging {
                note_id,
                grab_offset,
            } => {
                if !store.contains(note_id) {
                    self.reset();
                    return false;
                }
                self.trash_hover = self.trash.contains(store.viewport(), point);
                Self::apply_drag(store, note_id, grab_offset, point)
            }
            InteractionState::Resizing {
                note_id,
                handle,
                start,
            } => {
                if !store.contains(note_id) {
                    self.reset();
                    return false;
                }
                Self::apply_resize(store, note_id, handle, &start, point)
            }
        }
    }

    /// Ends the active gesture.
    ///
    /// A drag released over the trash deletes the note; otherwise the final
    /// position or size is committed.
    pub fn pointer_up(&mut self, store: &mut NoteStore, point: Point) -> GestureOutcome {
        let state = std::mem::take(&mut self.state);
        self.trash_hover = false;

        let outcome = match state {
            InteractionState::Idle => GestureOutcome::None,
            InteractionState::Dragging {
                note_id,
                grab_offset,
            } => {
                if !store.contains(note_id) {
                    GestureOutcome::None
                } else if self.trash.contains(store.viewport(), point) {
                    store.delete(note_id);
                    GestureOutcome::Deleted(note_id)
                } else {
                    Self::apply_drag(store, note_id, grab_offset, point);
                    GestureOutcome::Moved(note_id)
                }
            }
            InteractionState::Resizing {
                note_id,
                handle,
                start,
            } => {
                if store.contains(note_id) {
                    Self::apply_resize(store, note_id, handle, &start, point);
                    GestureOutcome::Resized(note_id)
                } else {
                    GestureOutcome::None
                }
            }
        };

        if outcome != GestureOutcome::None {
            debug!("event=gesture_end module=interaction status=ok outcome={outcome:?}");
        }
        outcome
    }

    /// Abandons the active gesture without deleting anything.
    pub fn cancel(&mut self) {
        self.reset();
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_dragging(&self, id: NoteId) -> bool {
        matches!(self.state, InteractionState::Dragging { note_id, .. } if note_id == id)
    }

    /// Whether the dragged note currently hovers over the trash.
    pub fn trash_hover(&self) -> bool {
        self.trash_hover
    }

    pub fn trash(&self) -> &TrashZone {
        &self.trash
    }

    /// Stacking value the render layer should use for `note`.
    ///
    /// The dragged note renders above everything until it is dropped.
    pub fn render_z(&self, store: &NoteStore, note: &Note) -> i64 {
        if self.is_dragging(note.id) {
            front_most_z(store.notes())
        } else {
            note.z_index
        }
    }

    fn apply_drag(
        store: &mut NoteStore,
        note_id: NoteId,
        grab_offset: Point,
        point: Point,
    ) -> bool {
        let Some(note) = store.get(note_id) else {
            return false;
        };
        let proposed = Point::new(point.x - grab_offset.x, point.y - grab_offset.y);
        let placed = clamp_drag(
            proposed,
            Size::new(note.width, note.height),
            store.viewport(),
        );
        store.update(note_id, NotePatch::position(placed.x, placed.y))
    }

    fn apply_resize(
        store: &mut NoteStore,
        note_id: NoteId,
        handle: ResizeHandle,
        start: &ResizeStart,
        point: Point,
    ) -> bool {
        let geometry = clamp_resize(start, handle, point, store.viewport());
        store.update(
            note_id,
            NotePatch::geometry(geometry.x, geometry.y, geometry.width, geometry.height),
        )
    }

    fn reset(&mut self) {
        self.state = InteractionState::Idle;
        self.trash_hover = false;
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(TrashZone::default())
    }
}
