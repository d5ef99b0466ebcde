//! Durable storage for board state.
//!
//! # Responsibility
//! - Define the persistence contract and its implementations.
//! - Schedule debounced whole-board writes.
//!
//! # Invariants
//! - In-memory state stays authoritative; storage failures never roll it back.

pub mod adapter;
pub mod debounce;
pub mod sqlite;
