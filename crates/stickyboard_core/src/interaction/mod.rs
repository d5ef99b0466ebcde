//! Pointer interaction handling.
//!
//! # Responsibility
//! - Turn raw pointer events into note store operations.
//! - Resolve trash drops before plain repositioning.

pub mod controller;
pub mod trash;
