//! `pn:` / `pw:` / `ph:` definition file reader.
//!
//! Records have no delimiter: keys accumulate into a pending triple and a
//! record is emitted the moment name, width and height are all set. Blank
//! lines and `#` comments are ignored.

use crate::model::paper::{PaperDefinition, PaperSource};
use crate::snippet::SnippetProbe;
use log::{debug, warn};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const NAME_KEY: &str = "pn:";
const WIDTH_KEY: &str = "pw:";
const HEIGHT_KEY: &str = "ph:";

#[derive(Debug, Default)]
struct PendingDefinition {
    name: String,
    width: u32,
    height: u32,
}

impl PendingDefinition {
    fn is_complete(&self) -> bool {
        !self.name.is_empty() && self.width != 0 && self.height != 0
    }
}

/// Reads a definition source file from disk.
///
/// A file that does not exist or cannot be opened contributes nothing.
pub fn parse_definition_file(
    path: impl AsRef<Path>,
    source: PaperSource,
    probe: &impl SnippetProbe,
) -> Vec<PaperDefinition> {
    let path = path.as_ref();
    match File::open(path) {
        Ok(file) => {
            let definitions = parse_definitions(BufReader::new(file), source, probe);
            debug!(
                "event=definition_file module=parser status=ok source={} count={}",
                source.as_str(),
                definitions.len()
            );
            definitions
        }
        Err(err) => {
            debug!(
                "event=definition_file module=parser status=skipped source={} path={} error={}",
                source.as_str(),
                path.display(),
                err
            );
            Vec::new()
        }
    }
}

/// Parses definition records from any buffered reader.
///
/// Every emitted record has its file status probed immediately. Lines that
/// are not UTF-8 are decoded as Latin-1. Reading stops quietly at the first
/// I/O error, keeping the records completed so far.
pub fn parse_definitions(
    mut reader: impl BufRead,
    source: PaperSource,
    probe: &impl SnippetProbe,
) -> Vec<PaperDefinition> {
    let mut definitions = Vec::new();
    let mut pending = PendingDefinition::default();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => line_no += 1,
            Err(err) => {
                warn!(
                    "event=definition_file module=parser status=truncated source={} line={} error={}",
                    source.as_str(),
                    line_no + 1,
                    err
                );
                break;
            }
        }
        let line = decode_line(&buf);

        let clean = clean_line(&line);
        if clean.is_empty() || clean.starts_with('#') {
            continue;
        }

        if let Some(value) = clean.strip_prefix(NAME_KEY) {
            pending.name = value.trim().to_string();
        } else if let Some(value) = clean.strip_prefix(WIDTH_KEY) {
            pending.width = parse_dimension(value);
        } else if let Some(value) = clean.strip_prefix(HEIGHT_KEY) {
            pending.height = parse_dimension(value);
        }

        if pending.is_complete() {
            let done = std::mem::take(&mut pending);
            let mut paper = PaperDefinition::new(done.name, done.width, done.height, source);
            if paper.has_snippet_file() {
                paper.file_status = probe.probe(&paper);
            }
            definitions.push(paper);
        }
    }

    definitions
}

/// Decodes one raw line, falling back to Latin-1 for non-UTF-8 bytes.
fn decode_line(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&byte| char::from(byte)).collect()),
    }
}

/// Cuts the line at the first control character other than tab and trims
/// whitespace.
fn clean_line(line: &str) -> &str {
    let end = line
        .find(|c: char| c.is_control() && c != '\t')
        .unwrap_or(line.len());
    line[..end].trim()
}

/// Reads the leading decimal digits of a value; anything unparsable is 0.
///
/// Mirrors C `atoi` on the non-negative range, so `"595276 pts"` is 595276.
/// Negative or overflowing values count as unset.
fn parse_dimension(value: &str) -> u32 {
    let value = value.trim_start();
    let digits = value.strip_prefix('+').unwrap_or(value);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<u32>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{clean_line, decode_line, parse_definitions, parse_dimension};
    use crate::model::paper::{FileStatus, PaperDefinition, PaperSource, SizeStatus};
    use crate::snippet::SnippetProbe;
    use std::cell::RefCell;

    struct RecordingProbe {
        probed: RefCell<Vec<String>>,
    }

    impl RecordingProbe {
        fn new() -> Self {
            Self {
                probed: RefCell::new(Vec::new()),
            }
        }
    }

    impl SnippetProbe for RecordingProbe {
        fn probe(&self, paper: &PaperDefinition) -> FileStatus {
            self.probed.borrow_mut().push(paper.snippet_key.clone());
            FileStatus::Correct
        }
    }

    fn parse(text: &str) -> Vec<PaperDefinition> {
        parse_definitions(text.as_bytes(), PaperSource::Master, &RecordingProbe::new())
    }

    #[test]
    fn parses_records_in_file_order() {
        let papers = parse(
            "# Printers paper sizes\n\npn: A4\npw: 595276\nph: 841890\n\npn: Letter\npw: 612000\nph: 792000\n",
        );
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].name, "A4");
        assert_eq!(papers[0].dimensions(), (595_276, 841_890));
        assert_eq!(papers[1].name, "Letter");
        assert_eq!(papers[1].snippet_key, "letter");
        assert!(papers
            .iter()
            .all(|paper| paper.source == PaperSource::Master
                && paper.size_status == SizeStatus::Unscanned));
    }

    #[test]
    fn key_order_within_record_does_not_matter() {
        let forward = parse("pn:A5\npw:419528\nph:595276\n");
        let reversed = parse("ph:595276\npw:419528\npn:A5\n");
        assert_eq!(forward, reversed);
    }

    #[test]
    fn repeated_name_before_completion_keeps_last() {
        let papers = parse("pn: First\npn: Second\npw: 1000\nph: 2000\n");
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].name, "Second");
    }

    #[test]
    fn incomplete_trailing_record_is_dropped() {
        let papers = parse("pn: A4\npw: 595276\nph: 841890\npn: A3\npw: 841890\n");
        assert_eq!(papers.len(), 1);
    }

    #[test]
    fn zero_or_garbage_dimensions_never_complete() {
        let papers = parse("pn: Bad\npw: 0\nph: 1000\npw: wide\n");
        assert!(papers.is_empty());
    }

    #[test]
    fn unknown_keys_and_comments_are_ignored() {
        let papers = parse("  # comment\npx: 12\npn: DL Envelope\n\tpw: 311811\nph: 623622  \r\n");
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].name, "DL Envelope");
        assert_eq!(papers[0].snippet_key, "dl");
    }

    #[test]
    fn probes_each_emitted_record() {
        let probe = RecordingProbe::new();
        let papers = parse_definitions(
            "pn: A4\npw: 1\nph: 2\npn: B5\npw: 3\nph: 4\n".as_bytes(),
            PaperSource::User,
            &probe,
        );
        assert_eq!(*probe.probed.borrow(), vec!["a4".to_string(), "b5".to_string()]);
        assert!(papers
            .iter()
            .all(|paper| paper.file_status == FileStatus::Correct));
    }

    #[test]
    fn latin1_names_do_not_end_the_file() {
        let text = b"pn: A4\npw: 595276\nph: 841890\npn: Gr\xf6sse\npw: 1000\nph: 2000\npn: Letter\npw: 612000\nph: 792000\n";
        let papers = parse_definitions(&text[..], PaperSource::Device, &RecordingProbe::new());
        let names: Vec<&str> = papers.iter().map(|paper| paper.name.as_str()).collect();
        assert_eq!(names, vec!["A4", "Gr\u{f6}sse", "Letter"]);
        assert_eq!(papers[1].snippet_key, "gr\u{f6}sse");
    }

    #[test]
    fn decode_line_keeps_utf8_and_maps_other_bytes() {
        assert_eq!(decode_line("pn: Größe\n".as_bytes()), "pn: Größe\n");
        assert_eq!(decode_line(b"pn: \xc9tiquette"), "pn: \u{c9}tiquette");
    }

    #[test]
    fn dimension_parsing_follows_leading_digits() {
        assert_eq!(parse_dimension(" 595276"), 595_276);
        assert_eq!(parse_dimension("595276 pts"), 595_276);
        assert_eq!(parse_dimension("+12"), 12);
        assert_eq!(parse_dimension("-12"), 0);
        assert_eq!(parse_dimension(""), 0);
        assert_eq!(parse_dimension("99999999999"), 0);
    }

    #[test]
    fn clean_line_stops_at_control_characters() {
        assert_eq!(clean_line("  pn: A4\r"), "pn: A4");
        assert_eq!(clean_line("pn: A4\u{0}junk"), "pn: A4");
        assert_eq!(clean_line("\tpw: 100\t"), "pw: 100");
    }
}
