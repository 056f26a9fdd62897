//! Merged paper definition registry.
//!
//! # Responsibility
//! - Rebuild the definition collection from the three layered sources.
//! - Classify size ambiguity across all sources.
//! - Offer checked, read-only access to presentation collaborators.
//!
//! # Invariants
//! - Every reload starts from an empty collection; nothing survives it.
//! - Sources are read Master, User, Device.
//! - Callers re-fetch by index after any reload; `get` returns owned copies.

pub mod ambiguity;
pub mod paper_registry;

pub use ambiguity::scan_ambiguity;
pub use paper_registry::{
    DefinitionSources, PaperRegistry, RegistryError, RegistryObserver, RegistryResult,
};
