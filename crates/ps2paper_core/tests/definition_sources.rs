use ps2paper_core::{
    parse_definition_file, FileStatus, PaperDefinition, PaperSource, SizeStatus, SnippetProbe,
    SnippetStore,
};
use std::fs;

#[test]
fn reads_definition_file_from_disk_with_probing() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnippetStore::new(dir.path().join("choices"));
    let a5 = PaperDefinition::new("A5", 419_528, 595_276, PaperSource::Device);
    store.write(&a5).unwrap();

    let source = dir.path().join("PaperRO");
    fs::write(
        &source,
        "# device sizes\r\npn: A5\r\npw: 419528\r\nph: 595276\r\n\r\npn: B5\r\nph: 708661\r\npw: 498898\r\n",
    )
    .unwrap();

    let papers = parse_definition_file(&source, PaperSource::Device, &store);

    assert_eq!(papers.len(), 2);
    assert_eq!(papers[0].file_status, FileStatus::Correct);
    assert_eq!(papers[1].file_status, FileStatus::Missing);
    assert_eq!(papers[1].dimensions(), (498_898, 708_661));
    assert!(papers
        .iter()
        .all(|paper| paper.size_status == SizeStatus::Unscanned));
}

#[test]
fn missing_file_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnippetStore::new(dir.path());
    let papers = parse_definition_file(dir.path().join("nope"), PaperSource::User, &store);
    assert!(papers.is_empty());
}

#[test]
fn directory_instead_of_file_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = SnippetStore::new(dir.path());
    assert!(parse_definition_file(dir.path(), PaperSource::Master, &store).is_empty());
    assert_eq!(store.probe(&PaperDefinition::new("x", 1, 1, PaperSource::Master)), FileStatus::Missing);
}

#[test]
fn definitions_serialize_with_snake_case_statuses() {
    let mut paper = PaperDefinition::new("Letter Rotated", 792_000, 612_000, PaperSource::User);
    paper.size_status = SizeStatus::Ok;

    let json = serde_json::to_value(&paper).unwrap();
    assert_eq!(json["name"], "Letter Rotated");
    assert_eq!(json["snippet_key"], "letter");
    assert_eq!(json["source"], "user");
    assert_eq!(json["size_status"], "ok");
    assert_eq!(json["file_status"], "missing");

    let decoded: PaperDefinition = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, paper);
}
