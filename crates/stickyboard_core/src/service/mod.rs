//! Use-case level facade over store, interaction and persistence.
//!
//! # Responsibility
//! - Keep render hosts decoupled from storage and scheduling details.

pub mod board_service;
