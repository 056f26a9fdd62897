//! Paper definition use-case service.
//!
//! # Responsibility
//! - Expose reload/count/get/launch/write to a presentation layer.
//! - Run "write selected" batches: prepare the output directory, write each
//!   selection, then reload once.
//!
//! # Invariants
//! - Overwriting a file not generated by this tool requires the caller's
//!   confirmation callback to agree.
//! - Failed writes leave the registry untouched until the batch reload.

use super::launcher::Launcher;
use crate::model::paper::{FileStatus, PaperDefinition};
use crate::registry::{PaperRegistry, RegistryError, RegistryObserver};
use crate::snippet::{SnippetError, SnippetStore, WriteOutcome};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::rc::Rc;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    Registry(RegistryError),
    Snippet(SnippetError),
    Launch {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registry(err) => write!(f, "{err}"),
            Self::Snippet(err) => write!(f, "{err}"),
            Self::Launch { path, source } => {
                write!(f, "failed to open `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Registry(err) => Some(err),
            Self::Snippet(err) => Some(err),
            Self::Launch { source, .. } => Some(source),
        }
    }
}

impl From<RegistryError> for ServiceError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<SnippetError> for ServiceError {
    fn from(value: SnippetError) -> Self {
        Self::Snippet(value)
    }
}

/// What happened to one definition in a write request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaperWrite {
    Written(PathBuf),
    AlreadyCorrect,
    /// The file was not ours and the caller declined to overwrite it.
    Declined,
}

/// Per-definition outcome of a batch write.
#[derive(Debug)]
pub struct WriteReportEntry {
    pub index: usize,
    /// Paper name, empty when the index was out of range.
    pub name: String,
    pub result: ServiceResult<PaperWrite>,
}

/// Outcome of [`PaperService::write_selected`].
#[derive(Debug, Default)]
pub struct WriteReport {
    pub entries: Vec<WriteReportEntry>,
}

impl WriteReport {
    pub fn written(&self) -> usize {
        self.count(|result| matches!(result, Ok(PaperWrite::Written(_))))
    }

    pub fn declined(&self) -> usize {
        self.count(|result| matches!(result, Ok(PaperWrite::Declined)))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|result| matches!(result, Ok(PaperWrite::AlreadyCorrect)))
    }

    pub fn failed(&self) -> usize {
        self.count(Result::is_err)
    }

    fn count(&self, predicate: impl Fn(&ServiceResult<PaperWrite>) -> bool) -> usize {
        self.entries
            .iter()
            .filter(|entry| predicate(&entry.result))
            .count()
    }
}

/// Facade over the registry and the snippet directory.
pub struct PaperService<L: Launcher> {
    registry: PaperRegistry,
    store: SnippetStore,
    launcher: L,
}

impl<L: Launcher> PaperService<L> {
    /// Creates a service; the registry stays empty until [`Self::reload`].
    pub fn new(registry: PaperRegistry, store: SnippetStore, launcher: L) -> Self {
        Self {
            registry,
            store,
            launcher,
        }
    }

    pub fn registry(&self) -> &PaperRegistry {
        &self.registry
    }

    pub fn store(&self) -> &SnippetStore {
        &self.store
    }

    pub fn subscribe(&mut self, observer: Rc<dyn RegistryObserver>) {
        self.registry.subscribe(observer);
    }

    /// Re-reads every source and reclassifies all definitions.
    pub fn reload(&mut self) -> ServiceResult<usize> {
        Ok(self.registry.reload(&self.store)?)
    }

    pub fn count(&self) -> usize {
        self.registry.count()
    }

    pub fn get(&self, index: usize) -> ServiceResult<PaperDefinition> {
        Ok(self.registry.get(index)?)
    }

    /// Opens the snippet file for a definition.
    ///
    /// Returns `Ok(None)` without doing anything when no file exists.
    pub fn launch(&self, index: usize) -> ServiceResult<Option<PathBuf>> {
        let paper = self.registry.get(index)?;
        if paper.file_status == FileStatus::Missing {
            return Ok(None);
        }
        let path = self
            .store
            .locate(paper.snippet_key.as_str())
            .ok_or_else(|| SnippetError::NotFound {
                key: paper.snippet_key.clone(),
            })?;

        self.launcher
            .launch(&path)
            .map_err(|source| ServiceError::Launch {
                path: path.clone(),
                source,
            })?;
        Ok(Some(path))
    }

    /// Creates the output directory chain if any part is missing.
    pub fn ensure_output_directory_exists(&self) -> ServiceResult<()> {
        Ok(self.store.ensure_output_dir()?)
    }

    /// Writes the snippet for one definition without reloading.
    ///
    /// `confirm_overwrite` is asked only when the existing file is `Unknown`.
    /// Call [`Self::reload`] afterwards to refresh statuses.
    pub fn write(
        &self,
        index: usize,
        confirm_overwrite: impl FnOnce(&PaperDefinition) -> bool,
    ) -> ServiceResult<PaperWrite> {
        let paper = self.registry.get(index)?;
        write_definition(&self.store, &paper, confirm_overwrite)
    }

    /// Writes every selected definition, then reloads.
    ///
    /// Individual failures are reported per entry and do not stop the batch.
    ///
    /// # Errors
    /// - The output directory cannot be created.
    /// - The closing reload fails.
    pub fn write_selected(
        &mut self,
        indexes: &[usize],
        mut confirm_overwrite: impl FnMut(&PaperDefinition) -> bool,
    ) -> ServiceResult<WriteReport> {
        let mut report = WriteReport::default();
        if indexes.is_empty() {
            return Ok(report);
        }

        self.ensure_output_directory_exists()?;

        for &index in indexes {
            let entry = match self.registry.get(index) {
                Ok(paper) => WriteReportEntry {
                    index,
                    result: write_definition(&self.store, &paper, &mut confirm_overwrite),
                    name: paper.name,
                },
                Err(err) => WriteReportEntry {
                    index,
                    name: String::new(),
                    result: Err(err.into()),
                },
            };
            if let Err(err) = &entry.result {
                warn!(
                    "event=write_selected module=service status=entry_failed index={} error={}",
                    index, err
                );
            }
            report.entries.push(entry);
        }

        info!(
            "event=write_selected module=service status=ok selected={} written={} declined={} failed={}",
            indexes.len(),
            report.written(),
            report.declined(),
            report.failed()
        );

        self.reload()?;
        Ok(report)
    }
}

fn write_definition(
    store: &SnippetStore,
    paper: &PaperDefinition,
    confirm_overwrite: impl FnOnce(&PaperDefinition) -> bool,
) -> ServiceResult<PaperWrite> {
    if paper.file_status == FileStatus::Correct {
        return Ok(PaperWrite::AlreadyCorrect);
    }
    if paper.file_status == FileStatus::Unknown && !confirm_overwrite(paper) {
        return Ok(PaperWrite::Declined);
    }

    match store.write(paper)? {
        WriteOutcome::Written(path) => Ok(PaperWrite::Written(path)),
        WriteOutcome::AlreadyCorrect => Ok(PaperWrite::AlreadyCorrect),
    }
}
