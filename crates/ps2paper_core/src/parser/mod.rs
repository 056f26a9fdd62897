//! Paper definition source parsing.
//!
//! # Responsibility
//! - Turn one definition source file into ordered `PaperDefinition` records.
//!
//! # Invariants
//! - Output order is file order.
//! - A missing or unreadable source yields no records, never an error.

pub mod definition_file;

pub use definition_file::{parse_definition_file, parse_definitions};
