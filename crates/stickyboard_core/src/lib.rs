//! Core engine for the sticky-notes board.
//! This crate is the single source of truth for note geometry, stacking and
//! persistence invariants.

pub mod config;
pub mod db;
pub mod interaction;
pub mod layout;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod store;

pub use config::BoardConfig;
pub use interaction::controller::{GestureOutcome, InteractionController, InteractionState};
pub use interaction::trash::{TrashCorner, TrashZone};
pub use layout::clamp::{Geometry, Point, ResizeHandle, ResizeStart, Size, Viewport};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteColor, NoteId, NotePatch, NoteValidationError, Priority};
pub use persist::adapter::{MemoryOnlyPersistence, NotePersistence, PersistError, PersistResult};
pub use persist::sqlite::SqliteNotePersistence;
pub use service::board_service::{Board, FlushOutcome};
pub use store::note_store::{NoteStore, StoreEvent, StoreListener, SubscriptionId};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
