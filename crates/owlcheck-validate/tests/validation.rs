use owlcheck_core::vocab::{
    OWL_CARDINALITY, OWL_MAX_CARDINALITY, OWL_MAX_QUALIFIED_CARDINALITY, OWL_MIN_QUALIFIED_CARDINALITY,
    OWL_ONE_OF, OWL_ON_CLASS, OWL_ON_DATA_RANGE, OWL_ON_PROPERTY, OWL_RESTRICTION, RDFS_RESOURCE,
    RDFS_SUBCLASS_OF, RDF_FIRST, RDF_NIL, RDF_REST, RDF_TYPE, UCO_CORE_ID, XSD_BASE64_BINARY, XSD_INTEGER,
    XSD_LONG, XSD_NON_NEGATIVE_INTEGER, XSD_STRING,
};
use owlcheck_core::{
    ClassDescription, ClassKind, DataGraph, DiagnosticKind, Iri, OntologyDocument, PropertyDescription, Term,
    Triple,
};
use owlcheck_owl::{OntologyResolver, ResolvedOntology};
use owlcheck_validate::{ValidationConfig, ValidationReport, Validator};
use std::sync::Arc;

const EX: &str = "http://example.org/ontology/";
const KB: &str = "http://example.org/kb/";

fn ex(local: &str) -> String {
    format!("{}{}", EX, local)
}

fn kb(local: &str) -> Term {
    Term::iri(format!("{}{}", KB, local))
}

fn count(n: u32) -> Term {
    Term::typed_literal(n.to_string(), XSD_NON_NEGATIVE_INTEGER)
}

fn restriction(class: &str, node: &str, facts: Vec<(&str, Term)>) -> Vec<Triple> {
    let mut triples = vec![
        Triple::new(Term::iri(ex(class)), RDFS_SUBCLASS_OF, Term::blank(node)),
        Triple::new(Term::blank(node), RDF_TYPE, Term::iri(OWL_RESTRICTION)),
    ];
    triples.extend(
        facts
            .into_iter()
            .map(|(predicate, object)| Triple::new(Term::blank(node), predicate, object)),
    );
    triples
}

fn vocabulary(class: &str, values: &[&str]) -> Vec<Triple> {
    let mut triples = vec![
        Triple::new(Term::iri(ex(class)), RDFS_SUBCLASS_OF, Term::iri(RDFS_RESOURCE)),
        Triple::new(Term::iri(ex(class)), OWL_ONE_OF, Term::blank("v0")),
    ];
    for (i, value) in values.iter().enumerate() {
        let next = if i + 1 == values.len() {
            Term::iri(RDF_NIL)
        } else {
            Term::blank(format!("v{}", i + 1))
        };
        triples.push(Triple::new(Term::blank(format!("v{}", i)), RDF_FIRST, Term::literal(*value)));
        triples.push(Triple::new(Term::blank(format!("v{}", i)), RDF_REST, next));
    }
    triples
}

fn ontology() -> ResolvedOntology {
    let mut trace = restriction(
        "Trace",
        "id",
        vec![(OWL_ON_PROPERTY, Term::iri(UCO_CORE_ID)), (OWL_CARDINALITY, count(1))],
    );
    trace.extend(restriction(
        "Trace",
        "name",
        vec![
            (OWL_ON_PROPERTY, Term::iri(ex("name"))),
            (OWL_ON_DATA_RANGE, Term::iri(XSD_STRING)),
            (OWL_MIN_QUALIFIED_CARDINALITY, count(1)),
            (OWL_MAX_QUALIFIED_CARDINALITY, count(1)),
        ],
    ));
    trace.extend(restriction(
        "Trace",
        "size",
        vec![(OWL_ON_PROPERTY, Term::iri(ex("size"))), (OWL_MAX_CARDINALITY, count(1))],
    ));
    trace.extend(restriction(
        "Trace",
        "hash",
        vec![
            (OWL_ON_PROPERTY, Term::iri(ex("hash"))),
            (OWL_ON_CLASS, Term::iri(ex("Hash"))),
            (OWL_MAX_QUALIFIED_CARDINALITY, count(2)),
        ],
    ));

    let document = OntologyDocument {
        bindings: vec![("ex".to_string(), EX.to_string())],
        classes: vec![
            ClassDescription::new(ex("Trace"), ClassKind::OwlClass).with_triples(trace),
            ClassDescription::new(ex("File"), ClassKind::OwlClass).with_parent(ex("Trace")),
            ClassDescription::new(ex("Hash"), ClassKind::OwlClass),
            ClassDescription::new(ex("Sha256"), ClassKind::OwlClass).with_parent(ex("Hash")),
            ClassDescription::new(ex("Tool"), ClassKind::OwlClass),
            ClassDescription::new(ex("HashNameVocab"), ClassKind::Datatype)
                .with_triples(vocabulary("HashNameVocab", &["MD5", "SHA256"])),
        ],
        properties: vec![
            PropertyDescription::new(UCO_CORE_ID).with_range(XSD_STRING),
            PropertyDescription::new(ex("name")).with_range(XSD_STRING),
            PropertyDescription::new(ex("size")).with_range(XSD_LONG),
            PropertyDescription::new(ex("hash")).with_range(ex("Hash")),
            PropertyDescription::new(ex("algorithm")).with_range(ex("HashNameVocab")),
            PropertyDescription::new(ex("content")).with_range(XSD_BASE64_BINARY),
        ],
    };
    let resolved = OntologyResolver::default().resolve(&document);
    assert!(resolved.diagnostics.is_empty(), "{:?}", resolved.diagnostics);
    resolved
}

fn validate(ontology: &ResolvedOntology, graph: &DataGraph) -> ValidationReport {
    Validator::new(ontology, ValidationConfig::default()).validate(graph)
}

fn typed(subject: &Term, class: &str) -> Triple {
    Triple::new(subject.clone(), RDF_TYPE, Term::iri(ex(class)))
}

fn named(subject: &Term, name: &str) -> Triple {
    Triple::new(subject.clone(), ex("name"), Term::literal(name))
}

#[test]
fn test_conforming_graph() {
    let ontology = ontology();
    let file = kb("file-1");
    let hash = Term::blank("h1");
    let graph = DataGraph::new(vec![
        typed(&file, "File"),
        named(&file, "evidence.img"),
        Triple::new(file.clone(), ex("size"), Term::typed_literal("4096", XSD_INTEGER)),
        Triple::new(file.clone(), ex("hash"), hash.clone()),
        Triple::new(file.clone(), ex("content"), Term::typed_literal("not base64 at all", XSD_BASE64_BINARY)),
        typed(&hash, "Sha256"),
        Triple::new(hash.clone(), ex("algorithm"), Term::typed_literal("SHA256", "ex:HashNameVocab")),
    ]);

    let report = validate(&ontology, &graph);
    assert!(report.conforms(), "{:?}", report.diagnostics);
    assert_eq!(report.subjects, 2);
}

#[test]
fn test_two_types_single_error() {
    let ontology = ontology();
    let subject = kb("both");
    let graph = DataGraph::new(vec![
        typed(&subject, "Trace"),
        typed(&subject, "Tool"),
        Triple::new(subject.clone(), ex("size"), Term::literal("many")),
        Triple::new(subject.clone(), ex("hash"), kb("missing")),
    ]);

    let report = validate(&ontology, &graph);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].kind, DiagnosticKind::DataError);
    assert!(report.diagnostics[0].message.contains("has 2 types"));
}

#[test]
fn test_untyped_and_unknown_subjects() {
    let ontology = ontology();
    let graph = DataGraph::new(vec![
        named(&kb("untyped"), "x"),
        Triple::new(kb("alien"), RDF_TYPE, Term::iri("http://example.org/other/Alien")),
    ]);
    let report = validate(&ontology, &graph);
    let messages: Vec<_> = report.diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            format!("{}untyped has no ranges", KB).as_str(),
            "class not in ontology"
        ]
    );
    assert_eq!(
        report.diagnostics[1].class_iri,
        Some(Iri::new("http://example.org/other/Alien"))
    );
}

#[test]
fn test_cardinality_and_identity_exemption() {
    let ontology = ontology();
    let subject = kb("trace");
    let graph = DataGraph::new(vec![
        typed(&subject, "Trace"),
        Triple::new(subject.clone(), ex("size"), Term::typed_literal("1", XSD_LONG)),
        Triple::new(subject.clone(), ex("size"), Term::typed_literal("2", XSD_LONG)),
    ]);

    let report = validate(&ontology, &graph);
    let found: Vec<_> = report
        .diagnostics
        .iter()
        .map(|d| (d.kind, d.property_iri.as_ref().map(Iri::as_str), d.message.as_str()))
        .collect();
    let name = ex("name");
    let size = ex("size");
    assert_eq!(
        found,
        vec![
            (DiagnosticKind::ConstraintError, Some(name.as_str()), "data is missing required property"),
            (
                DiagnosticKind::ConstraintError,
                Some(size.as_str()),
                "property has 2 values but must have at most 1"
            ),
        ]
    );
    assert!(report.diagnostics.iter().all(|d| d.class_iri == Some(Iri::new(ex("Trace")))));
}

#[test]
fn test_identity_exemption_is_configurable() {
    let ontology = ontology();
    let subject = kb("trace");
    let graph = DataGraph::new(vec![typed(&subject, "Trace"), named(&subject, "x")]);
    let config = ValidationConfig {
        identity_property: None,
        ..ValidationConfig::default()
    };
    let report = Validator::new(&ontology, config).validate(&graph);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].property_iri, Some(Iri::new(UCO_CORE_ID)));
}

#[test]
fn test_range_subsumption() {
    let ontology = ontology();
    let subject = kb("file");
    let good = Term::blank("good");
    let bad = Term::blank("bad");
    let graph = DataGraph::new(vec![
        typed(&subject, "File"),
        named(&subject, "x"),
        Triple::new(subject.clone(), ex("hash"), good.clone()),
        Triple::new(subject.clone(), ex("hash"), bad.clone()),
        typed(&good, "Sha256"),
        typed(&bad, "Tool"),
    ]);

    let report = validate(&ontology, &graph);
    assert_eq!(report.diagnostics.len(), 1, "{:?}", report.diagnostics);
    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::ConstraintError);
    assert_eq!(diagnostic.property_iri, Some(Iri::new(ex("hash"))));
    assert_eq!(diagnostic.message, "property's value _:bad is a <ex:Tool> but must be a <ex:Hash>");
}

#[test]
fn test_dangling_link_also_breaks_range() {
    let ontology = ontology();
    let subject = kb("trace");
    let graph = DataGraph::new(vec![
        typed(&subject, "Trace"),
        named(&subject, "x"),
        Triple::new(subject.clone(), ex("hash"), kb("dangling")),
    ]);

    let report = validate(&ontology, &graph);
    let found: Vec<_> = report
        .diagnostics
        .iter()
        .map(|d| (d.kind, d.message.as_str()))
        .collect();
    let range = format!("property's value {}dangling is a None but must be a <ex:Hash>", KB);
    let link = format!("malformed case data: missing link <{}dangling>", KB);
    assert_eq!(
        found,
        vec![
            (DiagnosticKind::DataError, link.as_str()),
            (DiagnosticKind::ConstraintError, range.as_str()),
        ]
    );
    assert_eq!(report.diagnostics[1].property_iri, Some(Iri::new(ex("hash"))));
}

#[test]
fn test_literal_checks() {
    let ontology = ontology();
    let subject = kb("file");
    let hash = Term::blank("h");
    let graph = DataGraph::new(vec![
        typed(&subject, "File"),
        named(&subject, "x"),
        Triple::new(subject.clone(), ex("size"), Term::typed_literal("big", XSD_LONG)),
        Triple::new(subject.clone(), ex("hash"), hash.clone()),
        typed(&hash, "Hash"),
        Triple::new(hash.clone(), ex("algorithm"), Term::typed_literal("SHA1", ex("HashNameVocab"))),
        Triple::new(hash.clone(), ex("note"), Term::typed_literal("x", "http://example.org/other/Unknown")),
    ]);

    let report = validate(&ontology, &graph);
    let kinds: Vec<_> = report.diagnostics.iter().map(|d| (d.kind, d.property_iri.clone())).collect();
    assert_eq!(
        kinds,
        vec![
            (DiagnosticKind::DataError, Some(Iri::new(ex("size")))),
            (DiagnosticKind::ConstraintError, Some(Iri::new(ex("algorithm")))),
            (DiagnosticKind::UnsupportedFeature, Some(Iri::new(ex("note")))),
        ]
    );
    assert_eq!(
        report.diagnostics[0].message,
        "'big' is not a valid value of the atomic type 'xsd:long'"
    );
    assert_eq!(report.diagnostics[2].class_iri, Some(Iri::new(ex("Hash"))));
}

#[test]
fn test_sorted_by_line() {
    let ontology = ontology();
    let graph = DataGraph::new(vec![
        named(&kb("late"), "x"),
        named(&kb("nowhere"), "x"),
        named(&kb("early"), "x"),
    ])
    .with_line(kb("late"), 40)
    .with_line(kb("early"), 3);

    let report = validate(&ontology, &graph);
    let lines: Vec<_> = report.diagnostics.iter().map(|d| d.line_number).collect();
    assert_eq!(lines, vec![None, Some(3), Some(40)]);
}

#[test]
fn test_shared_ontology_across_threads() {
    let ontology = Arc::new(ontology());
    let graphs: Vec<DataGraph> = (0..4)
        .map(|i| {
            let subject = kb(&format!("trace-{}", i));
            let mut triples = vec![typed(&subject, "Trace")];
            for n in 0..i {
                triples.push(named(&subject, &format!("name-{}", n)));
            }
            DataGraph::new(triples)
        })
        .collect();

    let reports: Vec<ValidationReport> = std::thread::scope(|scope| {
        let handles: Vec<_> = graphs
            .iter()
            .map(|graph| {
                let ontology = Arc::clone(&ontology);
                scope.spawn(move || Validator::new(&ontology, ValidationConfig::default()).validate(graph))
            })
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    let counts: Vec<_> = reports.iter().map(|report| report.diagnostics.len()).collect();
    // 0 names: missing; 1 name: fine; 2 and 3 names: too many
    assert_eq!(counts, vec![1, 0, 1, 1]);
}
