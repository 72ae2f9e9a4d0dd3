//! Data graph validation against a resolved ontology

use crate::report::ValidationReport;
use indexmap::IndexMap;
use owlcheck_core::diagnostic;
use owlcheck_core::vocab::{self, RDF_TYPE, UCO_CORE_ID, XSD_BASE64_BINARY};
use owlcheck_core::{Context, DataGraph, Diagnostic, Iri, PredicateMap, Term, TripleIndex};
use owlcheck_owl::{ClassConstraints, ClassDefinition, ResolvedOntology};
use owlcheck_xsd::XsdValidator;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Validation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Property never reported as missing, even when required
    pub identity_property: Option<Iri>,
    /// Literal datatypes whose lexical form is not checked
    pub blacklisted_datatypes: Vec<Iri>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            identity_property: Some(Iri::new(UCO_CORE_ID)),
            blacklisted_datatypes: vec![Iri::new(XSD_BASE64_BINARY)],
        }
    }
}

/// Values observed for one property of one subject, with their resolved types
type Observed<'g> = IndexMap<&'g Iri, Vec<(&'g Term, Option<Iri>)>>;

/// Validates data graphs against one resolved ontology.
///
/// The ontology is only read. Each validator keeps its own XSD cache, so
/// independent validators may share one ontology across threads.
pub struct Validator<'a> {
    ontology: &'a ResolvedOntology,
    config: ValidationConfig,
    xsd: XsdValidator,
}

impl<'a> Validator<'a> {
    pub fn new(ontology: &'a ResolvedOntology, config: ValidationConfig) -> Self {
        Self {
            ontology,
            config,
            xsd: XsdValidator::new(),
        }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a data graph; diagnostics come back sorted by line number
    pub fn validate(&mut self, graph: &DataGraph) -> ValidationReport {
        let mut ctx = self.ontology.context();
        ctx.populate(graph.bindings.iter().map(|(q, n)| (q.as_str(), n.as_str())));
        let index = graph.index();
        let diagnostics = self.validate_index(&index, &graph.line_map(), &ctx);
        ValidationReport::new(index.len(), diagnostics)
    }

    /// Validate every subject of an index
    pub fn validate_index(
        &mut self,
        index: &TripleIndex,
        line_numbers: &HashMap<Term, u32>,
        ctx: &Context,
    ) -> Vec<Diagnostic> {
        info!(subjects = index.len(), "validating data graph");
        let mut diagnostics = Vec::new();
        for (subject, predicates) in index {
            let line_number = line_numbers.get(subject).copied();
            let found = self.validate_subject(subject, predicates, index, ctx);
            if !found.is_empty() {
                debug!(subject = %subject, diagnostics = found.len(), "subject checked");
            }
            diagnostics.extend(found.into_iter().map(|d| d.with_line(line_number)));
        }
        diagnostic::sort_by_line(&mut diagnostics);
        info!(diagnostics = diagnostics.len(), "data graph validated");
        diagnostics
    }

    fn validate_subject(
        &mut self,
        subject: &Term,
        predicates: &PredicateMap,
        index: &TripleIndex,
        ctx: &Context,
    ) -> Vec<Diagnostic> {
        let class_iri = match subject_type(subject, predicates, ctx) {
            Ok(class_iri) => class_iri,
            Err(diagnostic) => return vec![diagnostic],
        };
        let Some(definition) = self.ontology.get(class_iri.as_str()) else {
            return vec![Diagnostic::data_error("class not in ontology").with_class(class_iri.clone())];
        };

        let mut diagnostics = Vec::new();
        let mut observed: Observed<'_> = IndexMap::new();
        for (predicate, objects) in predicates {
            if predicate.as_str() == RDF_TYPE {
                continue;
            }
            let values = observed.entry(predicate).or_default();
            for value in objects {
                let (value_type, errors) = get_value_type(value, index, ctx);
                diagnostics.extend(errors);
                values.push((value, value_type));
            }
        }

        let class_constraints = match definition {
            ClassDefinition::Restricted(constraints) => Some(constraints),
            ClassDefinition::Datatype(_) => {
                diagnostics.push(Diagnostic::unsupported(
                    "expected ClassConstraints, found DatatypeConstraints",
                ));
                None
            }
            ClassDefinition::Unconstrained => None,
        };
        if let Some(constraints) = class_constraints {
            diagnostics.extend(self.check_cardinality(&observed, constraints));
        }
        diagnostics.extend(self.check_ranges(&observed, class_constraints, ctx));

        for (&property_iri, values) in &observed {
            for (value, value_type) in values {
                let Term::Literal(_) = value else {
                    continue;
                };
                let Some(datatype) = value_type else {
                    continue;
                };
                diagnostics.extend(
                    self.check_literal(value, datatype)
                        .into_iter()
                        .map(|d| d.with_property(property_iri.clone())),
                );
            }
        }

        diagnostics.into_iter().map(|d| d.with_class(class_iri.clone())).collect()
    }

    /// Required, minimum and maximum counts for one subject
    pub fn check_cardinality(&self, observed: &Observed<'_>, constraints: &ClassConstraints) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for required in constraints.get_required_properties() {
            if self.config.identity_property.as_ref() == Some(required) {
                continue;
            }
            if !observed.contains_key(required) {
                diagnostics.push(Diagnostic::constraint_error("data is missing required property").with_property(required.clone()));
            }
        }

        for (&property_iri, values) in observed {
            let Some(pc) = constraints.get_property_constraints(property_iri.as_str()) else {
                continue;
            };
            let count = values.len();
            if let Some(min) = pc.min_cardinality {
                if count < min as usize {
                    diagnostics.push(
                        Diagnostic::constraint_error(format!(
                            "property has {} values but must have at least {}",
                            count, min
                        ))
                        .with_property(property_iri.clone()),
                    );
                }
            }
            if let Some(max) = pc.max_cardinality {
                if count > max as usize {
                    diagnostics.push(
                        Diagnostic::constraint_error(format!(
                            "property has {} values but must have at most {}",
                            count, max
                        ))
                        .with_property(property_iri.clone()),
                    );
                }
            }
        }
        diagnostics
    }

    /// Each value's type must be the expected range or one of its descendants.
    ///
    /// The class's own range wins over the ontology-wide property range. A value
    /// whose type could not be resolved never matches and is shown as `None`.
    pub fn check_ranges(
        &self,
        observed: &Observed<'_>,
        constraints: Option<&ClassConstraints>,
        ctx: &Context,
    ) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for (&property_iri, values) in observed {
            let class_range = constraints
                .and_then(|constraints| constraints.get_property_constraints(property_iri.as_str()))
                .and_then(|pc| pc.value_range.as_ref());
            let Some(expected) = class_range.or_else(|| self.ontology.property_range(property_iri.as_str())) else {
                continue;
            };
            for (value, value_type) in values {
                let compatible = value_type
                    .as_ref()
                    .map_or(false, |value_type| self.ontology.is_compatible(value_type.as_str(), expected.as_str()));
                if !compatible {
                    let shown = value_type
                        .as_ref()
                        .map_or_else(|| "None".to_string(), |value_type| ctx.format(value_type.as_str()));
                    diagnostics.push(
                        Diagnostic::constraint_error(format!(
                            "property's value {} is a {} but must be a {}",
                            value,
                            shown,
                            ctx.format(expected.as_str())
                        ))
                        .with_property(property_iri.clone()),
                    );
                }
            }
        }
        diagnostics
    }

    /// Lexical check of one typed literal
    pub fn check_literal(&mut self, literal: &Term, datatype: &Iri) -> Vec<Diagnostic> {
        let Term::Literal(inner) = literal else {
            return Vec::new();
        };
        if inner.datatype.is_none() || self.config.blacklisted_datatypes.contains(datatype) {
            return Vec::new();
        }
        if vocab::is_xsd(datatype.as_str()) {
            return self.xsd.validate(&inner.lexical, datatype.as_str());
        }
        match self.ontology.datatype_constraints(datatype.as_str()) {
            Some(constraints) => constraints.validate(&inner.lexical),
            None => vec![Diagnostic::unsupported(format!("Literal has unrecognized datatype: {}", literal))],
        }
    }
}

/// The single `rdf:type` of a subject
fn subject_type<'g>(subject: &Term, predicates: &'g PredicateMap, ctx: &Context) -> Result<&'g Iri, Diagnostic> {
    let types: Vec<&Term> = predicates
        .get(RDF_TYPE)
        .map(|objects| objects.iter().collect())
        .unwrap_or_default();
    match types.as_slice() {
        [] => Err(Diagnostic::data_error(format!("{} has no ranges", subject))),
        [single] => match *single {
            Term::Iri(class_iri) => Ok(class_iri),
            other => Err(Diagnostic::data_error(format!("{} has a type that is not an IRI: {}", subject, other))),
        },
        many => Err(Diagnostic::data_error(format!(
            "{} has {} types: {}",
            ctx.format(subject.identifier()),
            many.len(),
            ctx.format_list(many.iter().map(|term| term.identifier()))
        ))),
    }
}

/// Resolve the type of an object value.
///
/// A literal's type is its datatype (`xsd:string` when untyped); a qname
/// datatype is expanded through `ctx`. An IRI or blank node value names
/// another subject of `index` whose single `rdf:type` is the type.
pub fn get_value_type(value: &Term, index: &TripleIndex, ctx: &Context) -> (Option<Iri>, Vec<Diagnostic>) {
    match value {
        Term::Literal(literal) => {
            let Some(datatype) = &literal.datatype else {
                return (Some(vocab::xsd_string()), Vec::new());
            };
            let datatype = datatype.as_str();
            if datatype.starts_with("http://") || datatype.starts_with("https://") {
                return (Some(Iri::new(datatype)), Vec::new());
            }
            match datatype.split_once(':') {
                Some((prefix, rest)) => match ctx.namespace(prefix) {
                    Some(namespace) => (Some(Iri::new(format!("{}{}", namespace, rest))), Vec::new()),
                    None => (
                        None,
                        vec![Diagnostic::data_error(format!("unknown prefix in literal datatype {}", datatype))],
                    ),
                },
                None => (
                    None,
                    vec![Diagnostic::data_error(format!("unsupported datatype {}", datatype))],
                ),
            }
        }
        Term::Iri(_) | Term::BlankNode(_) => {
            let Some(predicates) = index.get(value) else {
                return (
                    None,
                    vec![Diagnostic::data_error(format!(
                        "malformed case data: missing link <{}>",
                        value.identifier()
                    ))],
                );
            };
            let types: Vec<&Term> = predicates
                .get(RDF_TYPE)
                .map(|objects| objects.iter().collect())
                .unwrap_or_default();
            match types.as_slice() {
                [] => (
                    None,
                    vec![Diagnostic::data_error(format!(
                        "malformed case data: {} {} has no datatypes",
                        value.kind_name(),
                        ctx.format(value.identifier())
                    ))],
                ),
                [single] => (Some(Iri::new(single.identifier())), Vec::new()),
                many => (
                    None,
                    vec![Diagnostic::data_error(format!(
                        "malformed case data: {} {} has {} datatypes {}",
                        value.kind_name(),
                        ctx.format(value.identifier()),
                        many.len(),
                        ctx.format_list(many.iter().map(|term| term.identifier()))
                    ))],
                ),
            }
        }
    }
}
