//! In-memory note ownership and change notification.
//!
//! # Responsibility
//! - Hold the single mutable copy of every note.
//! - Route every mutation through the layout rules.
//!
//! # See also
//! - `layout` for the clamp and layering rules applied here.

pub mod note_store;
