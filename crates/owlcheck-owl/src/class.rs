//! Per-class collections of property constraints built from restriction triples

use crate::property::{Facet, PropertyConstraints};
use indexmap::IndexMap;
use itertools::Itertools;
use owlcheck_core::vocab::{
    OWL_CARDINALITY, OWL_MAX_CARDINALITY, OWL_MAX_QUALIFIED_CARDINALITY, OWL_MIN_CARDINALITY,
    OWL_MIN_QUALIFIED_CARDINALITY, OWL_ON_CLASS, OWL_ON_DATA_RANGE, OWL_ON_PROPERTY,
    OWL_QUALIFIED_CARDINALITY, OWL_RESTRICTION, RDF_TYPE,
};
use owlcheck_core::{Context, Diagnostic, Iri, Term, Triple, TripleIndex};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Property constraints of one ontology class, keyed by property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassConstraints {
    pub class_iri: Iri,
    properties: IndexMap<Iri, PropertyConstraints>,
}

impl ClassConstraints {
    pub fn new<I: Into<Iri>>(class_iri: I) -> Self {
        Self {
            class_iri: class_iri.into(),
            properties: IndexMap::new(),
        }
    }

    /// Attach constraints to a property, replacing any existing entry
    pub fn set_property_constraints<I: Into<Iri>>(&mut self, property_iri: I, constraints: PropertyConstraints) {
        self.properties.insert(property_iri.into(), constraints);
    }

    pub fn get_property_constraints(&self, property_iri: &str) -> Option<&PropertyConstraints> {
        self.properties.get(property_iri)
    }

    pub fn contains_property(&self, property_iri: &str) -> bool {
        self.properties.contains_key(property_iri)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&Iri, &PropertyConstraints)> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Properties with min_cardinality > 0
    pub fn get_required_properties(&self) -> Vec<&Iri> {
        self.properties
            .iter()
            .filter(|(_, pc)| pc.min_cardinality.map_or(false, |min| min > 0))
            .map(|(property_iri, _)| property_iri)
            .collect()
    }

    /// Properties with max_cardinality == 0
    pub fn get_forbidden_properties(&self) -> Vec<&Iri> {
        self.properties
            .iter()
            .filter(|(_, pc)| pc.max_cardinality == Some(0))
            .map(|(property_iri, _)| property_iri)
            .collect()
    }

    /// Copy owned by another class; every property constraint is relabelled too
    pub fn relabelled<I: Into<Iri>>(&self, class_iri: I) -> Self {
        let class_iri = class_iri.into();
        Self {
            properties: self
                .properties
                .iter()
                .map(|(property_iri, pc)| (property_iri.clone(), pc.relabelled(class_iri.clone())))
                .collect(),
            class_iri,
        }
    }

    /// Multi-line plain-text description
    pub fn describe(&self, ctx: &Context) -> String {
        let class = ctx.format(self.class_iri.as_str());
        let mut lines: Vec<String> = self.properties.values().map(|pc| pc.describe(ctx)).collect();
        for property_iri in self.get_required_properties() {
            lines.push(format!("Class {}: Property {} is required", class, ctx.format(property_iri.as_str())));
        }
        for property_iri in self.get_forbidden_properties() {
            lines.push(format!("Class {}: Property {} is forbidden", class, ctx.format(property_iri.as_str())));
        }
        if lines.is_empty() {
            lines.push("Empty".to_string());
        }
        lines.join("\n")
    }
}

impl fmt::Display for ClassConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.properties.is_empty() {
            return f.write_str("<Empty>");
        }
        write!(f, "{}", self.properties.values().join("\n"))
    }
}

/// Build the naive (not yet inherited) constraints of one class from its
/// restriction triples.
///
/// Only blank-node subjects are read. A predicate with several objects on one
/// node is dropped and reported. Nodes that are not `owl:Restriction`, or that
/// lack `owl:onProperty`, are skipped.
pub fn get_class_constraints<I: Into<Iri>>(class_iri: I, triples: &[Triple]) -> (ClassConstraints, Vec<Diagnostic>) {
    let class_iri = class_iri.into();
    let mut class_constraints = ClassConstraints::new(class_iri.clone());
    let mut diagnostics = Vec::new();

    let index = TripleIndex::from_triples(triples);
    for (subject, predicates) in &index {
        if !subject.is_blank_node() {
            continue;
        }

        let on_property = predicates
            .get(OWL_ON_PROPERTY)
            .filter(|objects| objects.len() == 1)
            .and_then(|objects| objects.first())
            .and_then(Term::as_iri)
            .cloned();

        // Collapse to single values, dropping conflicting predicates
        let mut facts: IndexMap<&str, &Term> = IndexMap::new();
        for (predicate, objects) in predicates {
            match objects.len() {
                1 => {
                    if let Some(object) = objects.first() {
                        facts.insert(predicate.as_str(), object);
                    }
                }
                _ => {
                    let mut diagnostic = Diagnostic::ontology_error(format!(
                        "conflicting specification of {} as [{}]",
                        predicate,
                        objects.iter().join(", ")
                    ))
                    .with_class(class_iri.clone());
                    diagnostic.property_iri = on_property.clone();
                    diagnostics.push(diagnostic);
                }
            }
        }

        let constraints_type = facts.get(RDF_TYPE).copied();
        if constraints_type.and_then(Term::as_iri).map(Iri::as_str) != Some(OWL_RESTRICTION) {
            let mut diagnostic = Diagnostic::unsupported(format!(
                "unsupported constraints type {}",
                constraints_type.map_or_else(|| "None".to_string(), Term::to_string)
            ))
            .with_class(class_iri.clone());
            diagnostic.property_iri = on_property.clone();
            diagnostics.push(diagnostic);
            continue;
        }

        let Some(property_iri) = facts.get(OWL_ON_PROPERTY).and_then(|term| term.as_iri()).cloned() else {
            diagnostics.push(
                Diagnostic::ontology_error("constraints has no property value").with_class(class_iri.clone()),
            );
            continue;
        };

        let mut property_constraints = PropertyConstraints::new(class_iri.clone(), property_iri.clone());
        for (&predicate, &object) in &facts {
            if predicate == RDF_TYPE || predicate == OWL_ON_PROPERTY {
                continue;
            }
            match facet(predicate, object) {
                Some(Ok(facet)) => diagnostics.extend(property_constraints.apply(facet)),
                Some(Err(message)) => diagnostics.push(
                    Diagnostic::ontology_error(message)
                        .with_class(class_iri.clone())
                        .with_property(property_iri.clone()),
                ),
                None => diagnostics.push(
                    Diagnostic::unsupported(format!("unsupported predicate {}", predicate))
                        .with_class(class_iri.clone())
                        .with_property(property_iri.clone()),
                ),
            }
        }
        diagnostics.extend(property_constraints.check_consistency());
        class_constraints.set_property_constraints(property_iri, property_constraints);
    }

    (class_constraints, diagnostics)
}

/// Facet for a restriction predicate; `None` for unsupported predicates
fn facet(predicate: &str, object: &Term) -> Option<Result<Facet, String>> {
    let facet = match predicate {
        OWL_ON_DATA_RANGE | OWL_ON_CLASS => match object {
            Term::Iri(range) => Ok(Facet::ValueRange(range.clone())),
            other => Err(format!("value range {} is not a named class", other)),
        },
        OWL_MIN_CARDINALITY => cardinality(object).map(Facet::MinCardinality),
        OWL_MAX_CARDINALITY => cardinality(object).map(Facet::MaxCardinality),
        OWL_CARDINALITY => cardinality(object).map(Facet::Cardinality),
        OWL_MIN_QUALIFIED_CARDINALITY => cardinality(object).map(Facet::MinQualifiedCardinality),
        OWL_MAX_QUALIFIED_CARDINALITY => cardinality(object).map(Facet::MaxQualifiedCardinality),
        OWL_QUALIFIED_CARDINALITY => cardinality(object).map(Facet::QualifiedCardinality),
        _ => return None,
    };
    Some(facet)
}

fn cardinality(object: &Term) -> Result<u32, String> {
    object
        .as_literal()
        .and_then(|literal| literal.lexical.trim().parse().ok())
        .ok_or_else(|| format!("invalid cardinality {}", object))
}
