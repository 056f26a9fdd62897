//! Paper definition domain model.
//!
//! # Responsibility
//! - Define the record produced for every paper size read from a source file.
//! - Define the computed size and snippet-file status classifications.
//!
//! # Invariants
//! - `snippet_key` is always derived from `name`; it is never parsed.
//! - Status fields are recomputed on every reload, never edited in place.

pub mod paper;
