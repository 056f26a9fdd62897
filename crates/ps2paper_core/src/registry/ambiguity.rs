//! Size ambiguity classification.

use crate::model::paper::{PaperDefinition, SizeStatus};

/// Marks every definition `Ok` or `Ambiguous`.
///
/// A definition is ambiguous when another definition shares its snippet key
/// but disagrees on `(width, height)`. Already classified entries are
/// skipped, so running the scan twice changes nothing. Definitions without a
/// snippet key cannot conflict over a file and are always `Ok`.
pub fn scan_ambiguity(definitions: &mut [PaperDefinition]) {
    for index in 0..definitions.len() {
        if definitions[index].size_status != SizeStatus::Unscanned {
            continue;
        }

        if !definitions[index].has_snippet_file() {
            definitions[index].size_status = SizeStatus::Ok;
            continue;
        }

        let (head, tail) = definitions.split_at_mut(index + 1);
        let current = &mut head[index];

        let ambiguous = tail.iter().any(|other| {
            other.snippet_key == current.snippet_key && other.dimensions() != current.dimensions()
        });
        let status = if ambiguous {
            SizeStatus::Ambiguous
        } else {
            SizeStatus::Ok
        };

        current.size_status = status;
        for other in tail
            .iter_mut()
            .filter(|other| other.snippet_key == current.snippet_key)
        {
            other.size_status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::scan_ambiguity;
    use crate::model::paper::{PaperDefinition, PaperSource, SizeStatus};

    fn paper(name: &str, width: u32, height: u32) -> PaperDefinition {
        PaperDefinition::new(name, width, height, PaperSource::Master)
    }

    fn statuses(definitions: &[PaperDefinition]) -> Vec<SizeStatus> {
        definitions.iter().map(|paper| paper.size_status).collect()
    }

    #[test]
    fn conflicting_keys_are_ambiguous_and_unique_keys_ok() {
        let mut definitions = vec![
            paper("A4", 595_276, 841_890),
            paper("Letter", 612_000, 792_000),
            paper("a4 special", 600_000, 850_000),
        ];
        scan_ambiguity(&mut definitions);
        assert_eq!(
            statuses(&definitions),
            vec![SizeStatus::Ambiguous, SizeStatus::Ok, SizeStatus::Ambiguous]
        );
    }

    #[test]
    fn agreeing_duplicates_are_ok() {
        let mut definitions = vec![
            paper("A4", 595_276, 841_890),
            paper("A4 (ISO)", 595_276, 841_890),
            paper("a4", 595_276, 841_890),
        ];
        scan_ambiguity(&mut definitions);
        assert!(statuses(&definitions)
            .iter()
            .all(|status| *status == SizeStatus::Ok));
    }

    #[test]
    fn later_conflict_marks_whole_group() {
        // The first and second agree, the third disagrees with both.
        let mut definitions = vec![
            paper("A4", 1, 2),
            paper("A4", 1, 2),
            paper("A4 Wide", 3, 2),
        ];
        scan_ambiguity(&mut definitions);
        assert!(statuses(&definitions)
            .iter()
            .all(|status| *status == SizeStatus::Ambiguous));
    }

    #[test]
    fn empty_keys_never_conflict() {
        let mut definitions = vec![paper("X", 1, 2), paper("Y", 3, 4)];
        for definition in &mut definitions {
            definition.snippet_key.clear();
        }
        scan_ambiguity(&mut definitions);
        assert_eq!(statuses(&definitions), vec![SizeStatus::Ok, SizeStatus::Ok]);
    }

    #[test]
    fn scan_skips_classified_entries() {
        let mut definitions = vec![paper("A4", 1, 2), paper("A4", 3, 4)];
        definitions[0].size_status = SizeStatus::Ok;
        definitions[1].size_status = SizeStatus::Ok;
        scan_ambiguity(&mut definitions);
        assert_eq!(statuses(&definitions), vec![SizeStatus::Ok, SizeStatus::Ok]);
    }
}
