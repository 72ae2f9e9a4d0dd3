use owlcheck_core::vocab::{
    OWL_CARDINALITY, OWL_MAX_CARDINALITY, OWL_MAX_QUALIFIED_CARDINALITY, OWL_MIN_QUALIFIED_CARDINALITY,
    OWL_ON_DATA_RANGE, OWL_ON_PROPERTY, OWL_RESTRICTION, RDFS_SUBCLASS_OF, RDF_TYPE, XSD_DECIMAL, XSD_FLOAT,
    XSD_INTEGER, XSD_LONG, XSD_NON_NEGATIVE_INTEGER, XSD_STRING,
};
use owlcheck_core::{
    ClassDescription, ClassKind, DiagnosticKind, Iri, OntologyDocument, PropertyDescription, Term, Triple,
};
use owlcheck_owl::{inherit_constraints, ClassDefinition, ClassHierarchy, OntologyResolver, ResolverConfig};

const EX: &str = "http://example.org/ontology/";

fn ex(local: &str) -> String {
    format!("{}{}", EX, local)
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

/// C1 { P max 5 ; Q min 0 max 5 of R1 }, C2 ⊑ C1 { P min 3 max 5 of R1 ; Q2 }
fn two_level_document() -> OntologyDocument {
    let mut c1 = restriction(
        "C1",
        "c1p",
        vec![(OWL_ON_PROPERTY, Term::iri(ex("P"))), (OWL_MAX_CARDINALITY, count(5))],
    );
    c1.extend(restriction(
        "C1",
        "c1q",
        vec![
            (OWL_ON_PROPERTY, Term::iri(ex("Q"))),
            (OWL_ON_DATA_RANGE, Term::iri(ex("R1"))),
            (OWL_MIN_QUALIFIED_CARDINALITY, count(0)),
            (OWL_MAX_QUALIFIED_CARDINALITY, count(5)),
        ],
    ));

    let mut c2 = restriction(
        "C2",
        "c2p",
        vec![
            (OWL_ON_PROPERTY, Term::iri(ex("P"))),
            (OWL_ON_DATA_RANGE, Term::iri(ex("R1"))),
            (OWL_MIN_QUALIFIED_CARDINALITY, count(3)),
            (OWL_MAX_QUALIFIED_CARDINALITY, count(5)),
        ],
    );
    c2.extend(restriction(
        "C2",
        "c2q2",
        vec![(OWL_ON_PROPERTY, Term::iri(ex("Q2"))), (OWL_MAX_CARDINALITY, count(1))],
    ));

    OntologyDocument {
        bindings: vec![("ex".to_string(), EX.to_string())],
        classes: vec![
            ClassDescription::new(ex("C1"), ClassKind::OwlClass).with_triples(c1),
            ClassDescription::new(ex("C2"), ClassKind::OwlClass)
                .with_parent(ex("C1"))
                .with_triples(c2),
            ClassDescription::new(ex("R1"), ClassKind::OwlClass),
        ],
        properties: vec![
            PropertyDescription::new(ex("P")).with_range(ex("R1")),
            PropertyDescription::new(ex("Q")).with_range(ex("R1")),
            PropertyDescription::new(ex("Q2")).with_range(XSD_STRING),
        ],
    }
}

#[test]
fn test_two_level_inheritance() {
    let resolved = OntologyResolver::default().resolve(&two_level_document());
    assert!(resolved.diagnostics.is_empty(), "{:?}", resolved.diagnostics);

    let c2 = resolved.class_constraints(&ex("C2")).unwrap();
    let p = c2.get_property_constraints(&ex("P")).unwrap();
    assert_eq!((p.min_cardinality, p.max_cardinality), (Some(3), Some(5)));

    let q = c2.get_property_constraints(&ex("Q")).unwrap();
    assert_eq!((q.min_cardinality, q.max_cardinality), (Some(0), Some(5)));
    assert_eq!(q.value_range, Some(Iri::new(ex("R1"))));
    assert!(c2.contains_property(&ex("Q2")));

    let c1 = resolved.class_constraints(&ex("C1")).unwrap();
    assert!(!c1.contains_property(&ex("Q2")));
    assert_eq!(resolved.get(&ex("R1")), Some(&ClassDefinition::Unconstrained));
}

#[test]
fn test_conflicting_data_range() {
    let triples = restriction(
        "C",
        "b0",
        vec![
            (OWL_ON_PROPERTY, Term::iri(ex("P"))),
            (OWL_ON_DATA_RANGE, Term::iri(XSD_STRING)),
            (OWL_ON_DATA_RANGE, Term::iri(XSD_LONG)),
            (OWL_CARDINALITY, count(1)),
        ],
    );
    let document = OntologyDocument {
        bindings: Vec::new(),
        classes: vec![ClassDescription::new(ex("C"), ClassKind::OwlClass).with_triples(triples)],
        properties: vec![PropertyDescription::new(ex("P")).with_range(XSD_STRING)],
    };

    let resolved = OntologyResolver::default().resolve(&document);
    let conflicts: Vec<_> = resolved
        .diagnostics
        .iter()
        .filter(|d| d.message.starts_with("conflicting specification"))
        .collect();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, DiagnosticKind::OntologyError);

    let pc = resolved
        .class_constraints(&ex("C"))
        .and_then(|constraints| constraints.get_property_constraints(&ex("P")))
        .unwrap();
    assert_eq!(pc.value_range, None);
    assert_eq!(pc.min_cardinality, Some(1));
}

#[test]
fn test_inheritance_idempotent() {
    let document = two_level_document();
    let resolved = OntologyResolver::default().resolve(&document);

    let mut hierarchy = ClassHierarchy::from_classes(&document.classes);
    hierarchy.break_cycles();
    let again = inherit_constraints(&resolved.class_definitions, hierarchy.children(), 100);

    assert_eq!(again.definitions, resolved.class_definitions);
    assert!(again.diagnostics.is_empty());
    assert_eq!(again.passes, 1);
}

#[test]
fn test_rerun_reports_nothing_new() {
    // Child declares a looser minimum than its parent
    let parent = restriction(
        "A",
        "a",
        vec![(OWL_ON_PROPERTY, Term::iri(ex("P"))), (OWL_CARDINALITY, count(2))],
    );
    let child = restriction(
        "B",
        "b",
        vec![(OWL_ON_PROPERTY, Term::iri(ex("P"))), (OWL_MAX_CARDINALITY, count(1))],
    );
    let document = OntologyDocument {
        bindings: Vec::new(),
        classes: vec![
            ClassDescription::new(ex("A"), ClassKind::OwlClass).with_triples(parent),
            ClassDescription::new(ex("B"), ClassKind::OwlClass)
                .with_parent(ex("A"))
                .with_triples(child),
        ],
        properties: vec![PropertyDescription::new(ex("P")).with_range(XSD_STRING)],
    };
    let resolved = OntologyResolver::default().resolve(&document);
    assert!(!resolved.diagnostics.is_empty());

    let hierarchy = ClassHierarchy::from_classes(&document.classes);
    let again = inherit_constraints(&resolved.class_definitions, hierarchy.children(), 100);
    assert_eq!(again.definitions, resolved.class_definitions);
    assert!(again.diagnostics.iter().all(|d| resolved.diagnostics.contains(d)));
}

#[test]
fn test_cycle_reported_and_resolution_terminates() {
    let a = restriction(
        "A",
        "a",
        vec![(OWL_ON_PROPERTY, Term::iri(ex("P"))), (OWL_MAX_CARDINALITY, count(1))],
    );
    let document = OntologyDocument {
        bindings: Vec::new(),
        classes: vec![
            ClassDescription::new(ex("A"), ClassKind::OwlClass)
                .with_parent(ex("B"))
                .with_triples(a),
            ClassDescription::new(ex("B"), ClassKind::OwlClass).with_parent(ex("A")),
            ClassDescription::new(ex("C"), ClassKind::OwlClass).with_parent(ex("A")),
        ],
        properties: vec![PropertyDescription::new(ex("P")).with_range(XSD_STRING)],
    };

    let resolved = OntologyResolver::default().resolve(&document);
    let cyclic: Vec<_> = resolved
        .diagnostics
        .iter()
        .filter(|d| d.message == "class is part of a subclass cycle")
        .filter_map(|d| d.class_iri.as_ref().map(Iri::as_str))
        .collect();
    assert_eq!(cyclic.len(), 2);
    assert!(!resolved.diagnostics.iter().any(|d| d.kind == DiagnosticKind::SoftwareBug));

    // The edge outside the cycle still carries constraints
    let c = resolved.class_constraints(&ex("C")).unwrap();
    assert_eq!(c.get_property_constraints(&ex("P")).unwrap().max_cardinality, Some(1));
}

#[test]
fn test_ancestor_table() {
    let document = OntologyDocument {
        bindings: Vec::new(),
        classes: vec![
            ClassDescription::new(ex("Root"), ClassKind::OwlClass),
            ClassDescription::new(ex("Mid"), ClassKind::OwlClass).with_parent(ex("Root")),
            ClassDescription::new(ex("Leaf"), ClassKind::OwlClass).with_parent(ex("Mid")),
            ClassDescription {
                ancestors: Some(vec![Iri::new(ex("Explicit"))]),
                ..ClassDescription::new(ex("Listed"), ClassKind::OwlClass).with_parent(ex("Root"))
            },
            ClassDescription::new(
                "https://ontology.unifiedcyberontology.org/uco/vocabulary/HashNameVocab",
                ClassKind::Datatype,
            ),
        ],
        properties: Vec::new(),
    };
    let resolved = OntologyResolver::default().resolve(&document);

    let leaf: Vec<_> = resolved.ancestors(&ex("Leaf")).iter().map(Iri::as_str).collect();
    assert_eq!(leaf, vec![ex("Mid"), ex("Root")]);
    assert!(resolved.is_compatible(&ex("Leaf"), &ex("Root")));
    assert!(!resolved.is_compatible(&ex("Root"), &ex("Leaf")));
    assert_eq!(resolved.ancestors(&ex("Listed")), &[Iri::new(ex("Explicit"))]);

    assert!(resolved.is_compatible(XSD_INTEGER, XSD_LONG));
    assert!(resolved.is_compatible(XSD_DECIMAL, XSD_FLOAT));
    assert!(!resolved.is_compatible(XSD_LONG, XSD_INTEGER));
    assert!(resolved.is_compatible(
        XSD_STRING,
        "https://ontology.unifiedcyberontology.org/uco/vocabulary/HashNameVocab"
    ));
}

#[test]
fn test_widening_is_configurable() {
    let config = ResolverConfig {
        numeric_widening: Vec::new(),
        vocabulary_namespaces: Vec::new(),
        max_passes: Some(4),
    };
    let resolved = OntologyResolver::new(config).resolve(&two_level_document());
    assert!(!resolved.is_compatible(XSD_INTEGER, XSD_LONG));
    assert!(resolved.ancestors(XSD_STRING).is_empty());
}

#[test]
fn test_mismatched_class_range_reported() {
    let mut document = two_level_document();
    document.properties[1] = PropertyDescription::new(ex("Q")).with_range(XSD_STRING);
    let resolved = OntologyResolver::default().resolve(&document);

    // Reported for C1 and for C2, which inherits Q
    let mismatches: Vec<_> = resolved
        .diagnostics
        .iter()
        .filter(|d| d.message.starts_with("owl subclass constraint"))
        .filter_map(|d| d.class_iri.as_ref().map(Iri::as_str))
        .collect();
    assert_eq!(mismatches, vec![ex("C1"), ex("C2")]);
}

#[test]
fn test_resolved_ontology_json_round_trip() {
    let resolved = OntologyResolver::default().resolve(&two_level_document());
    let json = serde_json::to_string(&resolved).unwrap();
    let restored: owlcheck_owl::ResolvedOntology = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, resolved);
}
