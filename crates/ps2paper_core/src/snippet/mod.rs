//! PostScript page-size snippet files.
//!
//! # Responsibility
//! - Classify the snippet file for a paper definition against its size.
//! - Render and write canonical snippet files into the output directory.
//!
//! # Invariants
//! - Probing never fails; every filesystem problem maps onto a `FileStatus`.
//! - A snippet file is written with one buffered write, never line by line.

mod format;
mod store;

pub use format::{
    classify_snippet, parse_page_size_line, render_snippet, SNIPPET_MARKER,
};
pub use store::{
    SnippetError, SnippetProbe, SnippetResult, SnippetStore, WriteOutcome, OUTPUT_SUBDIRS,
    POSTSCRIPT_FILE_TYPE,
};
