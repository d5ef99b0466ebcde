//! Pure layout rules: geometry clamping and z-order layering.
//!
//! # Responsibility
//! - Decide where a note may be and how large it may get.
//! - Decide which note renders above which.
//!
//! # Invariants
//! - Functions here have no side effects beyond the slices they are given.

pub mod clamp;
pub mod layering;
