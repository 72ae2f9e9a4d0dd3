//! Enumerated-vocabulary datatypes (`owl:oneOf` over string literals)

use owlcheck_core::vocab::{OWL_ONE_OF, RDFS_RESOURCE, RDFS_SUBCLASS_OF, RDF_FIRST};
use owlcheck_core::{Diagnostic, Iri, Term, Triple, TripleIndex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Datatype whose values must belong to a fixed vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatatypeConstraints {
    pub class_iri: Iri,
    vocabulary: BTreeSet<String>,
}

impl DatatypeConstraints {
    pub fn new<I, V, S>(class_iri: I, vocabulary: V) -> Self
    where
        I: Into<Iri>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            class_iri: class_iri.into(),
            vocabulary: vocabulary.into_iter().map(Into::into).collect(),
        }
    }

    pub fn vocabulary(&self) -> &BTreeSet<String> {
        &self.vocabulary
    }

    /// One `ConstraintError` if `value` is not in the vocabulary
    pub fn validate(&self, value: &str) -> Vec<Diagnostic> {
        if self.vocabulary.contains(value) {
            return Vec::new();
        }
        vec![Diagnostic::constraint_error(format!(
            "value \"{}\" not in vocabulary {:?}",
            value, self.vocabulary
        ))
        .with_class(self.class_iri.clone())]
    }

    pub fn describe(&self) -> String {
        format!("VocabularyDatatypeConstraint: one of {:?}", self.vocabulary)
    }
}

/// Build the constraints of a datatype from its triples.
///
/// Only `X rdfs:subClassOf rdfs:Resource ; owl:oneOf ( ... )` is understood.
/// The list cells are not walked in order: every `rdf:first` on a blank node
/// contributes one vocabulary entry.
pub fn get_datatype_constraints<I: Into<Iri>>(
    class_iri: I,
    triples: &[Triple],
) -> (Option<DatatypeConstraints>, Vec<Diagnostic>) {
    let class_iri = class_iri.into();
    let index = TripleIndex::from_triples(triples);

    let parents: Vec<&Term> = index.subjects().filter(|subject| !subject.is_blank_node()).collect();
    let parent = match parents.as_slice() {
        [parent] => *parent,
        [] => {
            return (
                None,
                vec![Diagnostic::ontology_error(format!("No parent node in {} triples", triples.len()))
                    .with_class(class_iri)],
            )
        }
        many => {
            return (
                None,
                vec![Diagnostic::ontology_error(format!(
                    "Multiple parent nodes in triples: {}",
                    many.iter().map(|term| term.to_string()).collect::<Vec<_>>().join(", ")
                ))
                .with_class(class_iri)],
            )
        }
    };

    let is_vocabulary = {
        let resource_only = index.objects(parent, RDFS_SUBCLASS_OF).map_or(false, |objects| {
            objects.len() == 1 && objects.first().and_then(Term::as_iri).map(Iri::as_str) == Some(RDFS_RESOURCE)
        });
        resource_only && index.objects(parent, OWL_ONE_OF).map_or(false, |objects| !objects.is_empty())
    };
    if !is_vocabulary {
        return (
            None,
            vec![Diagnostic::unsupported(format!(
                "Cannot figure out datatype for {} triples",
                triples.len()
            ))
            .with_class(class_iri)],
        );
    }

    let mut vocabulary = BTreeSet::new();
    let mut diagnostics = Vec::new();
    for (subject, predicates) in &index {
        if !subject.is_blank_node() {
            continue;
        }
        let Some(firsts) = predicates.get(RDF_FIRST) else {
            continue;
        };
        if firsts.len() > 1 {
            diagnostics.push(
                Diagnostic::ontology_error(format!(
                    "Multiple values for rdf:first in linked list: {}",
                    firsts.iter().map(|term| term.to_string()).collect::<Vec<_>>().join(", ")
                ))
                .with_class(class_iri.clone()),
            );
        } else {
            vocabulary.extend(firsts.iter().map(|term| term.identifier().to_string()));
        }
    }

    if !diagnostics.is_empty() {
        return (None, diagnostics);
    }
    (Some(DatatypeConstraints { class_iri, vocabulary }), diagnostics)
}
