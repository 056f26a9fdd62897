//! Snippet directory access: probing, locating and writing snippet files.

use super::format::{classify_snippet, render_snippet};
use crate::model::paper::{FileStatus, PaperDefinition};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Directory chain created below the choices root to hold written snippets.
pub const OUTPUT_SUBDIRS: [&str; 3] = ["Printers", "ps", "Paper"];

/// File type tag for PostScript snippets.
pub const POSTSCRIPT_FILE_TYPE: u16 = 0xff5;

pub type SnippetResult<T> = Result<T, SnippetError>;

/// Snippet write and lookup failures.
#[derive(Debug)]
pub enum SnippetError {
    /// The definition has an empty snippet key.
    NoSnippetFile { name: String },
    /// No snippet file exists for the key.
    NotFound { key: String },
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for SnippetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSnippetFile { name } => {
                write!(f, "paper `{name}` has no snippet file name")
            }
            Self::NotFound { key } => write!(f, "no snippet file found for `{key}`"),
            Self::CreateDirectory { path, source } => {
                write!(f, "failed to create directory `{}`: {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "failed to write snippet `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for SnippetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDirectory { source, .. } | Self::Write { source, .. } => Some(source),
            Self::NoSnippetFile { .. } | Self::NotFound { .. } => None,
        }
    }
}

/// Result of a successful write request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The snippet was (re)written at this path.
    Written(PathBuf),
    /// The existing file already matched; nothing was touched.
    AlreadyCorrect,
}

/// Classifies the snippet file for a definition.
///
/// Implemented by [`SnippetStore`]; the parser is generic over it so tests
/// can substitute a fixed classification.
pub trait SnippetProbe {
    fn probe(&self, paper: &PaperDefinition) -> FileStatus;
}

/// Snippet files on disk.
///
/// Reads resolve through the output directory followed by the search path,
/// first match wins. Writes always target the output directory.
#[derive(Debug, Clone)]
pub struct SnippetStore {
    choices_root: PathBuf,
    output_dir: PathBuf,
    search_path: Vec<PathBuf>,
    filetype_suffix: bool,
}

impl SnippetStore {
    /// Creates a store whose output directory is `<choices_root>/Printers/ps/Paper`.
    pub fn new(choices_root: impl Into<PathBuf>) -> Self {
        let choices_root = choices_root.into();
        let output_dir = OUTPUT_SUBDIRS
            .iter()
            .fold(choices_root.clone(), |path, segment| path.join(segment));
        Self {
            choices_root,
            output_dir,
            search_path: Vec::new(),
            filetype_suffix: false,
        }
    }

    /// Adds read-only directories probed after the output directory.
    pub fn with_search_path(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.search_path.extend(dirs);
        self
    }

    /// Writes files as `<key>,ff5` so hosts without type metadata keep the type.
    pub fn with_filetype_suffix(mut self, enabled: bool) -> Self {
        self.filetype_suffix = enabled;
        self
    }

    pub fn choices_root(&self) -> &Path {
        &self.choices_root
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path a definition's snippet is written to.
    pub fn output_path(&self, key: &str) -> PathBuf {
        if self.filetype_suffix {
            self.output_dir.join(suffixed_name(key))
        } else {
            self.output_dir.join(key)
        }
    }

    /// Finds the existing snippet file for a key, if any.
    ///
    /// Within each directory the spelling this store writes is tried first,
    /// so a freshly written file shadows the other spelling.
    pub fn locate(&self, key: &str) -> Option<PathBuf> {
        if key.is_empty() {
            return None;
        }
        let (preferred, other) = if self.filetype_suffix {
            (suffixed_name(key), key.to_string())
        } else {
            (key.to_string(), suffixed_name(key))
        };
        std::iter::once(&self.output_dir)
            .chain(self.search_path.iter())
            .flat_map(|dir| [dir.join(&preferred), dir.join(&other)])
            .find(|candidate| candidate.is_file())
    }

    /// Creates the choices root and any missing segment of the output
    /// directory chain.
    ///
    /// Idempotent; existing directories are left untouched.
    pub fn ensure_output_dir(&self) -> SnippetResult<()> {
        if !self.choices_root.is_dir() {
            if let Err(source) = std::fs::create_dir_all(&self.choices_root) {
                error!(
                    "event=snippet_dir module=snippet status=error path={} error={}",
                    self.choices_root.display(),
                    source
                );
                return Err(SnippetError::CreateDirectory {
                    path: self.choices_root.clone(),
                    source,
                });
            }
            debug!(
                "event=snippet_dir module=snippet status=created path={}",
                self.choices_root.display()
            );
        }

        let mut path = self.choices_root.clone();
        for segment in OUTPUT_SUBDIRS {
            path.push(segment);
            if path.is_dir() {
                continue;
            }
            if let Err(source) = std::fs::create_dir(&path) {
                // Another process may have won the race.
                if path.is_dir() {
                    continue;
                }
                error!(
                    "event=snippet_dir module=snippet status=error path={} error={}",
                    path.display(),
                    source
                );
                return Err(SnippetError::CreateDirectory { path, source });
            }
            debug!(
                "event=snippet_dir module=snippet status=created path={}",
                path.display()
            );
        }
        Ok(())
    }

    /// Writes the canonical snippet for a definition.
    ///
    /// The caller owns the overwrite decision for `Unknown` files; this only
    /// skips files already classified `Correct`.
    ///
    /// # Errors
    /// - `NoSnippetFile` when the definition has an empty key.
    /// - `CreateDirectory` / `Write` on filesystem failure. Nothing is
    ///   partially written in that case beyond what the OS left behind.
    pub fn write(&self, paper: &PaperDefinition) -> SnippetResult<WriteOutcome> {
        if paper.file_status == FileStatus::Correct {
            return Ok(WriteOutcome::AlreadyCorrect);
        }
        if !paper.has_snippet_file() {
            return Err(SnippetError::NoSnippetFile {
                name: paper.name.clone(),
            });
        }

        self.ensure_output_dir()?;

        let path = self.output_path(paper.snippet_key.as_str());
        let contents = render_snippet(paper);
        if let Err(source) = std::fs::write(&path, contents) {
            error!(
                "event=snippet_write module=snippet status=error key={} error={}",
                paper.snippet_key, source
            );
            return Err(SnippetError::Write { path, source });
        }

        info!(
            "event=snippet_write module=snippet status=ok key={} file_type={:03x}",
            paper.snippet_key, POSTSCRIPT_FILE_TYPE
        );
        Ok(WriteOutcome::Written(path))
    }
}

impl SnippetProbe for SnippetStore {
    fn probe(&self, paper: &PaperDefinition) -> FileStatus {
        let Some(path) = self.locate(paper.snippet_key.as_str()) else {
            return FileStatus::Missing;
        };

        match File::open(&path) {
            Ok(file) => classify_snippet(BufReader::new(file), paper),
            Err(err) => {
                debug!(
                    "event=snippet_probe module=snippet status=unreadable key={} error={}",
                    paper.snippet_key, err
                );
                FileStatus::Unknown
            }
        }
    }
}

fn suffixed_name(key: &str) -> String {
    format!("{key},{POSTSCRIPT_FILE_TYPE:03x}")
}

#[cfg(test)]
mod tests {
    use super::{SnippetError, SnippetProbe, SnippetStore, WriteOutcome};
    use crate::model::paper::{FileStatus, PaperDefinition, PaperSource};

    #[test]
    fn output_dir_nests_three_levels() {
        let store = SnippetStore::new("/choices");
        assert_eq!(
            store.output_dir(),
            std::path::Path::new("/choices/Printers/ps/Paper")
        );
        assert_eq!(
            store.output_path("a4"),
            std::path::Path::new("/choices/Printers/ps/Paper/a4")
        );
        let suffixed = store.with_filetype_suffix(true);
        assert_eq!(
            suffixed.output_path("a4"),
            std::path::Path::new("/choices/Printers/ps/Paper/a4,ff5")
        );
    }

    #[test]
    fn empty_key_is_missing_without_touching_disk() {
        let store = SnippetStore::new("/nonexistent/choices");
        let paper = PaperDefinition::new("", 1000, 1000, PaperSource::User);
        assert_eq!(store.probe(&paper), FileStatus::Missing);
        assert_eq!(store.locate(""), None);
    }

    #[test]
    fn write_refuses_definitions_without_key() {
        let store = SnippetStore::new("/nonexistent/choices");
        let mut paper = PaperDefinition::new("A4", 1000, 1000, PaperSource::User);
        paper.snippet_key.clear();
        let err = store.write(&paper).expect_err("empty key must be rejected");
        assert!(matches!(err, SnippetError::NoSnippetFile { .. }));
    }

    #[test]
    fn write_skips_correct_files() {
        let store = SnippetStore::new("/nonexistent/choices");
        let mut paper = PaperDefinition::new("A4", 1000, 1000, PaperSource::User);
        paper.file_status = FileStatus::Correct;
        assert_eq!(store.write(&paper).unwrap(), WriteOutcome::AlreadyCorrect);
    }
}
