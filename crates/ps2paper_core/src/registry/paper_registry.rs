//! Registry of all paper definitions read from the layered sources.

use super::ambiguity::scan_ambiguity;
use crate::model::paper::{PaperDefinition, PaperSource, SizeStatus};
use crate::parser::parse_definition_file;
use crate::snippet::SnippetProbe;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Instant;

pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// `get` was called with an index past the end of the collection.
    IndexOutOfRange { index: usize, count: usize },
    /// The collection could not grow; it has been left empty.
    StorageExhausted { requested: usize },
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, count } => {
                write!(f, "paper index {index} out of range (count {count})")
            }
            Self::StorageExhausted { requested } => {
                write!(f, "no memory for {requested} more paper definitions")
            }
        }
    }
}

impl Error for RegistryError {}

/// Locations of the three definition source files.
///
/// Any of them may be unset or absent on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionSources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<PathBuf>,
}

impl DefinitionSources {
    pub fn path(&self, source: PaperSource) -> Option<&Path> {
        match source {
            PaperSource::Master => self.master.as_deref(),
            PaperSource::User => self.user.as_deref(),
            PaperSource::Device => self.device.as_deref(),
        }
    }
}

/// Notified after every reload so views can rebuild their indexes.
pub trait RegistryObserver {
    fn definitions_changed(&self, registry: &PaperRegistry);
}

/// Owns the merged definition collection.
pub struct PaperRegistry {
    sources: DefinitionSources,
    definitions: Vec<PaperDefinition>,
    observers: Vec<Rc<dyn RegistryObserver>>,
}

impl PaperRegistry {
    /// Creates an empty registry; call [`PaperRegistry::reload`] to populate it.
    pub fn new(sources: DefinitionSources) -> Self {
        Self {
            sources,
            definitions: Vec::new(),
            observers: Vec::new(),
        }
    }

    pub fn sources(&self) -> &DefinitionSources {
        &self.sources
    }

    /// Registers a view to be told about reloads.
    pub fn subscribe(&mut self, observer: Rc<dyn RegistryObserver>) {
        self.observers.push(observer);
    }

    /// Discards all definitions and reads them back from the sources.
    ///
    /// # Side effects
    /// - Probes every definition's snippet file through `probe`.
    /// - Notifies observers, also when the reload fails.
    ///
    /// # Errors
    /// - `StorageExhausted` when the collection cannot grow. The registry is
    ///   left empty and should be treated as unusable.
    pub fn reload(&mut self, probe: &impl SnippetProbe) -> RegistryResult<usize> {
        let started_at = Instant::now();
        self.definitions.clear();

        let result = self.load_sources(probe);
        match &result {
            Ok(count) => {
                let ambiguous = self
                    .definitions
                    .iter()
                    .filter(|paper| paper.size_status == SizeStatus::Ambiguous)
                    .count();
                info!(
                    "event=registry_reload module=registry status=ok count={} ambiguous={} duration_ms={}",
                    count,
                    ambiguous,
                    started_at.elapsed().as_millis()
                );
            }
            Err(err) => {
                self.definitions = Vec::new();
                error!(
                    "event=registry_reload module=registry status=error error={}",
                    err
                );
            }
        }

        for observer in &self.observers {
            observer.definitions_changed(self);
        }
        result
    }

    fn load_sources(&mut self, probe: &impl SnippetProbe) -> RegistryResult<usize> {
        for source in PaperSource::LOAD_ORDER {
            let Some(path) = self.sources.path(source) else {
                continue;
            };
            let parsed = parse_definition_file(path, source, probe);
            self.definitions
                .try_reserve(parsed.len())
                .map_err(|_| RegistryError::StorageExhausted {
                    requested: parsed.len(),
                })?;
            self.definitions.extend(parsed);
        }

        self.scan_ambiguity();
        Ok(self.definitions.len())
    }

    /// Classifies any unscanned definitions; see [`scan_ambiguity`].
    pub fn scan_ambiguity(&mut self) {
        scan_ambiguity(&mut self.definitions);
    }

    pub fn count(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns a snapshot of one definition.
    pub fn get(&self, index: usize) -> RegistryResult<PaperDefinition> {
        self.definitions
            .get(index)
            .cloned()
            .ok_or(RegistryError::IndexOutOfRange {
                index,
                count: self.definitions.len(),
            })
    }

    /// Borrowed view of the whole collection, valid until the next reload.
    pub fn definitions(&self) -> &[PaperDefinition] {
        &self.definitions
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaperDefinition> {
        self.definitions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::{DefinitionSources, PaperRegistry, RegistryError};
    use crate::model::paper::{FileStatus, PaperDefinition, PaperSource};
    use crate::snippet::SnippetProbe;
    use std::path::PathBuf;

    struct NoFiles;

    impl SnippetProbe for NoFiles {
        fn probe(&self, _paper: &PaperDefinition) -> FileStatus {
            FileStatus::Missing
        }
    }

    #[test]
    fn sources_map_to_paths() {
        let sources = DefinitionSources {
            master: Some(PathBuf::from("/m")),
            user: None,
            device: Some(PathBuf::from("/d")),
        };
        assert_eq!(
            sources.path(PaperSource::Master),
            Some(std::path::Path::new("/m"))
        );
        assert_eq!(sources.path(PaperSource::User), None);
    }

    #[test]
    fn unset_sources_reload_empty() {
        let mut registry = PaperRegistry::new(DefinitionSources::default());
        assert_eq!(registry.reload(&NoFiles).unwrap(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn get_is_checked() {
        let registry = PaperRegistry::new(DefinitionSources::default());
        assert_eq!(
            registry.get(0).unwrap_err(),
            RegistryError::IndexOutOfRange { index: 0, count: 0 }
        );
    }
}
