//! Resolved ontology model

use crate::class::ClassConstraints;
use crate::datatype::DatatypeConstraints;
use indexmap::IndexMap;
use owlcheck_core::{Context, Diagnostic, Iri};
use serde::{Deserialize, Serialize};

/// What an ontology class constrains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassDefinition {
    /// OWL class with restriction-derived property constraints
    Restricted(ClassConstraints),
    /// Datatype with an enumerated vocabulary
    Datatype(DatatypeConstraints),
    /// Known class that constrains nothing
    Unconstrained,
}

impl ClassDefinition {
    pub fn as_class_constraints(&self) -> Option<&ClassConstraints> {
        match self {
            ClassDefinition::Restricted(constraints) => Some(constraints),
            _ => None,
        }
    }

    pub fn as_datatype_constraints(&self) -> Option<&DatatypeConstraints> {
        match self {
            ClassDefinition::Datatype(constraints) => Some(constraints),
            _ => None,
        }
    }

    pub fn describe(&self, ctx: &Context) -> String {
        match self {
            ClassDefinition::Restricted(constraints) => constraints.describe(ctx),
            ClassDefinition::Datatype(constraints) => constraints.describe(),
            ClassDefinition::Unconstrained => "Unconstrained".to_string(),
        }
    }
}

/// Ontology after inheritance resolution. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedOntology {
    /// (qualifier, namespace) bindings of the ontology sources
    pub bindings: Vec<(String, String)>,
    /// Every ontology class and what it constrains
    pub class_definitions: IndexMap<Iri, ClassDefinition>,
    /// property → single declared range, `None` when missing or ambiguous
    pub property_ranges: IndexMap<Iri, Option<Iri>>,
    /// class → ancestors, nearest first, plus the widening rules
    pub ancestor_classes: IndexMap<Iri, Vec<Iri>>,
    /// Problems found in the ontology, without repeats
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolvedOntology {
    /// Namespace context built from the default bindings and the ontology's own
    pub fn context(&self) -> Context {
        Context::with_bindings(self.bindings.iter().map(|(q, n)| (q.as_str(), n.as_str())))
    }

    pub fn contains_class(&self, class_iri: &str) -> bool {
        self.class_definitions.contains_key(class_iri)
    }

    pub fn get(&self, class_iri: &str) -> Option<&ClassDefinition> {
        self.class_definitions.get(class_iri)
    }

    pub fn class_constraints(&self, class_iri: &str) -> Option<&ClassConstraints> {
        self.get(class_iri).and_then(ClassDefinition::as_class_constraints)
    }

    pub fn datatype_constraints(&self, class_iri: &str) -> Option<&DatatypeConstraints> {
        self.get(class_iri).and_then(ClassDefinition::as_datatype_constraints)
    }

    /// Declared range of a property, if exactly one was found
    pub fn property_range(&self, property_iri: &str) -> Option<&Iri> {
        self.property_ranges.get(property_iri).and_then(Option::as_ref)
    }

    pub fn ancestors(&self, class_iri: &str) -> &[Iri] {
        self.ancestor_classes
            .get(class_iri)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True if a value of type `value_type` may stand where `expected` is required
    pub fn is_compatible(&self, value_type: &str, expected: &str) -> bool {
        value_type == expected || self.ancestors(value_type).iter().any(|a| a.as_str() == expected)
    }
}
