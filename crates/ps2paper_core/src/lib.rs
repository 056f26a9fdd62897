//! Core of PS2Paper: paper definitions and their PostScript page-size snippets.
//! This crate owns every paper-definition invariant; presentation layers only
//! call into it.

pub mod config;
pub mod logging;
pub mod model;
pub mod parser;
pub mod registry;
pub mod service;
pub mod snippet;
pub mod units;

pub use config::{ConfigError, Settings};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::paper::{snippet_file_key, FileStatus, PaperDefinition, PaperSource, SizeStatus};
pub use parser::{parse_definition_file, parse_definitions};
pub use registry::{
    scan_ambiguity, DefinitionSources, PaperRegistry, RegistryError, RegistryObserver,
    RegistryResult,
};
pub use service::launcher::{CommandLauncher, Launcher};
pub use service::list_view::{build_display_index, DisplayIndex, ListLine};
pub use service::paper_service::{
    PaperService, PaperWrite, ServiceError, ServiceResult, WriteReport, WriteReportEntry,
};
pub use snippet::{
    render_snippet, SnippetError, SnippetProbe, SnippetStore, WriteOutcome, POSTSCRIPT_FILE_TYPE,
    SNIPPET_MARKER,
};
pub use units::{format_dimension, DisplayUnits};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
