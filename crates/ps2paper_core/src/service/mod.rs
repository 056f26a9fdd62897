//! Use-case services consumed by presentation layers.
//!
//! # Responsibility
//! - Bundle the registry, the snippet store and a launcher behind one facade.
//! - Provide the grouped list index a list view renders.
//!
//! # Invariants
//! - Writes never mutate in-memory definitions; only a reload does.
//! - A batch write always finishes with exactly one reload.

pub mod launcher;
pub mod list_view;
pub mod paper_service;
