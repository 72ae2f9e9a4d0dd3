use owlcheck_core::vocab::{RDF_TYPE, XSD_STRING};
use owlcheck_core::{ClassDescription, ClassKind, DataGraph, OntologyDocument, PropertyDescription, Term, Triple};
use owlcheck_owl::{OntologyResolver, ResolvedOntology};
use owlcheck_store::{
    describe, hash_bytes, load, read_marker, read_metadata, save, Metadata, PersistenceError, StoredKind,
    CASEDATA_FORMAT_VERSION, ONTOLOGY_FORMAT_VERSION,
};
use std::fs;

fn resolved() -> ResolvedOntology {
    let document = OntologyDocument {
        bindings: vec![("ex".to_string(), "http://example.org/".to_string())],
        classes: vec![
            ClassDescription::new("http://example.org/A", ClassKind::OwlClass),
            ClassDescription::new("http://example.org/B", ClassKind::OwlClass).with_parent("http://example.org/A"),
        ],
        properties: vec![PropertyDescription::new("http://example.org/p").with_range(XSD_STRING)],
    };
    OntologyResolver::default().resolve(&document)
}

fn graph() -> DataGraph {
    DataGraph::new(vec![
        Triple::new(Term::iri("http://example.org/kb/x"), RDF_TYPE, Term::iri("http://example.org/B")),
        Triple::new(
            Term::iri("http://example.org/kb/x"),
            "http://example.org/p",
            Term::typed_literal("v", XSD_STRING),
        ),
    ])
    .with_line(Term::iri("http://example.org/kb/x"), 12)
}

#[test]
fn test_ontology_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("ontology.bin");
    let ontology = resolved();

    save(&ontology, &Metadata::new(StoredKind::Ontology).with_comment("test"), &file).unwrap();
    let (restored, metadata): (ResolvedOntology, Metadata) = load(&file).unwrap();

    assert_eq!(restored, ontology);
    assert_eq!(metadata.version, ONTOLOGY_FORMAT_VERSION);
    assert_eq!(metadata.comment.as_deref(), Some("test"));
    assert_eq!(read_marker(&file).unwrap(), StoredKind::Ontology);
    assert_eq!(&fs::read(&file).unwrap()[..8], b"ontology");
}

#[test]
fn test_casedata_round_trip_with_source() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("case.json");
    fs::write(&source, serde_json::to_vec(&graph()).unwrap()).unwrap();
    let file = dir.path().join("case.bin");

    let metadata = Metadata::for_source(StoredKind::CaseData, &source).unwrap();
    save(&graph(), &metadata, &file).unwrap();

    let (restored, stored): (DataGraph, Metadata) = load(&file).unwrap();
    assert_eq!(restored, graph());
    assert_eq!(stored.version, CASEDATA_FORMAT_VERSION);
    assert_eq!(stored.hash, Some(hash_bytes(&fs::read(&source).unwrap())));
    assert!(stored.path.unwrap().is_absolute());
}

#[test]
fn test_wrong_kind_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("case.bin");
    save(&graph(), &Metadata::new(StoredKind::CaseData), &file).unwrap();

    let err = load::<ResolvedOntology, _>(&file).unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::WrongKind {
            expected: StoredKind::Ontology,
            found: StoredKind::CaseData,
            ..
        }
    ));
}

#[test]
fn test_version_mismatch_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("old.bin");
    let metadata = Metadata {
        version: "0.9".to_string(),
        ..Metadata::new(StoredKind::Ontology)
    };
    save(&resolved(), &metadata, &file).unwrap();

    match load::<ResolvedOntology, _>(&file) {
        Err(PersistenceError::VersionMismatch { expected, found, .. }) => {
            assert_eq!(expected, ONTOLOGY_FORMAT_VERSION);
            assert_eq!(found, "0.9");
        }
        other => panic!("expected version mismatch, got {:?}", other.map(|(_, m)| m)),
    }
    // Metadata is still readable
    assert_eq!(read_metadata(&file).unwrap().1.version, "0.9");
}

#[test]
fn test_foreign_file_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("notes.txt");
    fs::write(&file, "hello").unwrap();
    assert!(matches!(read_marker(&file), Err(PersistenceError::NotOwlcheckFile { .. })));

    fs::write(&file, "unknown-marker").unwrap();
    assert!(matches!(
        load::<DataGraph, _>(&file),
        Err(PersistenceError::NotOwlcheckFile { .. })
    ));
}

#[test]
fn test_metadata_read_without_body() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("ontology.bin");
    save(&resolved(), &Metadata::new(StoredKind::Ontology).with_comment("partial"), &file).unwrap();

    // Drop the tail of the body
    let bytes = fs::read(&file).unwrap();
    fs::write(&file, &bytes[..bytes.len() - 4]).unwrap();

    let (kind, metadata) = read_metadata(&file).unwrap();
    assert_eq!(kind, StoredKind::Ontology);
    assert_eq!(metadata.comment.as_deref(), Some("partial"));
    assert!(load::<ResolvedOntology, _>(&file).is_err());
}

#[test]
fn test_describe_directory_source() {
    let dir = tempfile::tempdir().unwrap();
    let sources = dir.path().join("ontology");
    fs::create_dir(&sources).unwrap();
    fs::write(sources.join("core.json"), "{}").unwrap();
    fs::write(sources.join("extra.json"), "{}").unwrap();
    let file = dir.path().join("ontology.bin");

    let metadata = Metadata::for_source(StoredKind::Ontology, &sources)
        .unwrap()
        .with_comment("two files");
    save(&resolved(), &metadata, &file).unwrap();

    let text = describe(&file).unwrap();
    assert!(text.contains("Kind:      ontology"));
    assert!(text.contains(&format!("Version:   {}", ONTOLOGY_FORMAT_VERSION)));
    assert!(text.contains("Comment:   two files"));
    assert!(text.contains("Manifest:  2 files"));
    assert!(text.contains("core.json"));
}
