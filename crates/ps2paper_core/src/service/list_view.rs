//! Grouped list index for displaying the registry.
//!
//! The list shows one heading per source (Master, Device, User), each
//! followed by that source's definitions in registry order.

use crate::model::paper::{PaperDefinition, PaperSource};
use crate::registry::{PaperRegistry, RegistryObserver};
use std::cell::{Ref, RefCell};

/// One line of the list display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListLine {
    /// Heading for a source group.
    Separator(PaperSource),
    /// A definition, by registry index.
    Paper(usize),
}

/// Builds the display index for a definition collection.
///
/// There is always one separator per source, even for empty groups.
pub fn build_display_index(definitions: &[PaperDefinition]) -> Vec<ListLine> {
    let mut lines = Vec::with_capacity(definitions.len() + PaperSource::DISPLAY_ORDER.len());
    for source in PaperSource::DISPLAY_ORDER {
        lines.push(ListLine::Separator(source));
        lines.extend(
            definitions
                .iter()
                .enumerate()
                .filter(|(_, paper)| paper.source == source)
                .map(|(index, _)| ListLine::Paper(index)),
        );
    }
    lines
}

/// Display index kept in step with a registry through reload notifications.
#[derive(Debug, Default)]
pub struct DisplayIndex {
    lines: RefCell<Vec<ListLine>>,
}

impl DisplayIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Ref<'_, Vec<ListLine>> {
        self.lines.borrow()
    }

    /// Registry indexes of the definitions in display order.
    pub fn paper_indexes(&self) -> Vec<usize> {
        self.lines
            .borrow()
            .iter()
            .filter_map(|line| match line {
                ListLine::Paper(index) => Some(*index),
                ListLine::Separator(_) => None,
            })
            .collect()
    }
}

impl RegistryObserver for DisplayIndex {
    fn definitions_changed(&self, registry: &PaperRegistry) {
        *self.lines.borrow_mut() = build_display_index(registry.definitions());
    }
}
