//! Ontology resolution: naive constraints, inheritance fixed point, property
//! ranges, range consistency and the ancestor table

use crate::class::{get_class_constraints, ClassConstraints};
use crate::datatype::get_datatype_constraints;
use crate::hierarchy::ClassHierarchy;
use crate::model::{ClassDefinition, ResolvedOntology};
use indexmap::{IndexMap, IndexSet};
use owlcheck_core::diagnostic;
use owlcheck_core::vocab::{
    CASE_VOCABULARY_NS, RDFS_RANGE, UCO_VOCABULARY_NS, XSD_DECIMAL, XSD_FLOAT, XSD_INTEGER, XSD_LONG, XSD_STRING,
};
use owlcheck_core::{ClassDescription, ClassKind, Context, Diagnostic, Iri, OntologyDocument, PropertyDescription};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Resolver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Namespaces whose classes accept plain `xsd:string` values
    pub vocabulary_namespaces: Vec<String>,
    /// (narrow, wide) pairs: `wide` becomes an ancestor of `narrow`
    pub numeric_widening: Vec<(Iri, Iri)>,
    /// Pass limit for the inheritance fixed point; derived from the input when unset
    pub max_passes: Option<usize>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            vocabulary_namespaces: vec![UCO_VOCABULARY_NS.to_string(), CASE_VOCABULARY_NS.to_string()],
            numeric_widening: vec![
                (Iri::new(XSD_INTEGER), Iri::new(XSD_LONG)),
                (Iri::new(XSD_DECIMAL), Iri::new(XSD_FLOAT)),
            ],
            max_passes: None,
        }
    }
}

/// Result of the inheritance fixed point
#[derive(Debug, Clone)]
pub struct Inheritance {
    pub definitions: IndexMap<Iri, ClassDefinition>,
    pub diagnostics: Vec<Diagnostic>,
    /// Passes run, including the final pass without changes
    pub passes: usize,
}

/// Builds a [`ResolvedOntology`] from an ontology document
#[derive(Debug, Clone, Default)]
pub struct OntologyResolver {
    config: ResolverConfig,
}

impl OntologyResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn resolve(&self, document: &OntologyDocument) -> ResolvedOntology {
        info!(
            classes = document.classes.len(),
            properties = document.properties.len(),
            "resolving ontology"
        );
        let ctx = Context::with_bindings(document.bindings.iter().map(|(q, n)| (q.as_str(), n.as_str())));
        let mut diagnostics = Vec::new();

        let (naive, errors) = naive_definitions(&document.classes);
        diagnostics.extend(errors);

        let mut hierarchy = ClassHierarchy::from_classes(&document.classes);
        let cycle_errors = hierarchy.break_cycles();
        if !cycle_errors.is_empty() {
            warn!(classes = cycle_errors.len(), "subclass cycles removed from hierarchy");
        }
        diagnostics.extend(cycle_errors);

        let max_passes = self.config.max_passes.unwrap_or_else(|| default_max_passes(&naive));
        let inheritance = inherit_constraints(&naive, hierarchy.children(), max_passes);
        debug!(passes = inheritance.passes, "inheritance converged");
        diagnostics.extend(inheritance.diagnostics);

        let (property_ranges, errors) = get_property_ranges(&document.properties, &ctx);
        diagnostics.extend(errors);
        diagnostics.extend(check_range_consistency(&inheritance.definitions, &property_ranges, &ctx));

        let ancestor_classes = self.ancestor_table(&document.classes, &hierarchy);

        let mut diagnostics = diagnostic::dedup(diagnostics);
        diagnostics.sort_by(|a, b| {
            (a.class_iri.as_ref(), a.property_iri.as_ref()).cmp(&(b.class_iri.as_ref(), b.property_iri.as_ref()))
        });
        info!(diagnostics = diagnostics.len(), "ontology resolved");

        ResolvedOntology {
            bindings: document.bindings.clone(),
            class_definitions: inheritance.definitions,
            property_ranges,
            ancestor_classes,
            diagnostics,
        }
    }

    /// class → ancestors, plus the numeric widening edges and the vocabulary rule
    pub fn ancestor_table(&self, classes: &[ClassDescription], hierarchy: &ClassHierarchy) -> IndexMap<Iri, Vec<Iri>> {
        let mut table: IndexMap<Iri, Vec<Iri>> = classes
            .iter()
            .map(|class| {
                let ancestors = class
                    .ancestors
                    .clone()
                    .unwrap_or_else(|| hierarchy.ancestors(class.iri.as_str()));
                (class.iri.clone(), ancestors)
            })
            .collect();

        for (narrow, wide) in &self.config.numeric_widening {
            push_unique(table.entry(narrow.clone()).or_default(), wide);
        }

        let vocabulary_classes: Vec<Iri> = classes
            .iter()
            .filter(|class| {
                self.config
                    .vocabulary_namespaces
                    .iter()
                    .any(|namespace| class.iri.as_str().starts_with(namespace.as_str()))
            })
            .map(|class| class.iri.clone())
            .collect();
        if !vocabulary_classes.is_empty() {
            let string_ancestors = table.entry(Iri::new(XSD_STRING)).or_default();
            for class_iri in &vocabulary_classes {
                push_unique(string_ancestors, class_iri);
            }
        }
        table
    }
}

fn push_unique(list: &mut Vec<Iri>, iri: &Iri) {
    if !list.contains(iri) {
        list.push(iri.clone());
    }
}

/// Per-class constraints read from each class's own triples, ignoring the hierarchy
pub fn naive_definitions(classes: &[ClassDescription]) -> (IndexMap<Iri, ClassDefinition>, Vec<Diagnostic>) {
    let mut definitions = IndexMap::new();
    let mut diagnostics = Vec::new();
    for class in classes {
        let definition = match class.kind {
            ClassKind::OwlClass => {
                let (constraints, errors) = get_class_constraints(class.iri.clone(), &class.triples);
                diagnostics.extend(errors);
                if constraints.is_empty() {
                    ClassDefinition::Unconstrained
                } else {
                    ClassDefinition::Restricted(constraints)
                }
            }
            ClassKind::Datatype => {
                let (constraints, errors) = get_datatype_constraints(class.iri.clone(), &class.triples);
                diagnostics.extend(errors);
                constraints.map_or(ClassDefinition::Unconstrained, ClassDefinition::Datatype)
            }
            ClassKind::Other => ClassDefinition::Unconstrained,
        };
        definitions.insert(class.iri.clone(), definition);
    }
    (definitions, diagnostics)
}

/// Pass limit no terminating run can reach.
///
/// Every pass with a change fills at least one unset field of one
/// (class, property) pair or gives an unconstrained class its parent's
/// constraints.
fn default_max_passes(definitions: &IndexMap<Iri, ClassDefinition>) -> usize {
    let properties: IndexSet<&Iri> = definitions
        .values()
        .filter_map(ClassDefinition::as_class_constraints)
        .flat_map(|constraints| constraints.properties().map(|(property_iri, _)| property_iri))
        .collect();
    definitions.len() * (3 * properties.len() + 1) + 2
}

/// Propagate constraints from parents to children until nothing changes.
///
/// `children` maps each parent class to its direct subclasses and must be
/// acyclic. A child without constraints receives a relabelled copy of its
/// parent's. A child with constraints gains the parent's properties it lacks
/// and merges those both declare.
pub fn inherit_constraints(
    definitions: &IndexMap<Iri, ClassDefinition>,
    children: &IndexMap<Iri, Vec<Iri>>,
    max_passes: usize,
) -> Inheritance {
    let mut net = definitions.clone();
    let mut diagnostics = Vec::new();
    let mut passes = 0;

    loop {
        if passes >= max_passes {
            diagnostics.push(Diagnostic::software_bug(format!(
                "constraint inheritance did not converge after {} passes",
                passes
            )));
            break;
        }
        passes += 1;

        let mut changes = 0;
        for (parent_iri, child_iris) in children {
            let parent = match net.get(parent_iri) {
                Some(ClassDefinition::Restricted(parent)) => parent.clone(),
                _ => continue,
            };
            for child_iri in child_iris {
                match net.get_mut(child_iri) {
                    Some(ClassDefinition::Restricted(child)) => {
                        changes += merge_into(child, &parent, &mut diagnostics);
                    }
                    Some(ClassDefinition::Datatype(_)) => {}
                    Some(ClassDefinition::Unconstrained) | None => {
                        net.insert(child_iri.clone(), ClassDefinition::Restricted(parent.relabelled(child_iri.clone())));
                        changes += 1;
                    }
                }
            }
        }

        debug!(pass = passes, changes, "inheritance pass");
        if changes == 0 {
            break;
        }
    }

    Inheritance {
        definitions: net,
        diagnostics: diagnostic::dedup(diagnostics),
        passes,
    }
}

/// Merge one parent's constraints into a child's; returns the number of changes
fn merge_into(child: &mut ClassConstraints, parent: &ClassConstraints, diagnostics: &mut Vec<Diagnostic>) -> usize {
    let mut changes = 0;
    for (property_iri, inherited) in parent.properties() {
        match child.get_property_constraints(property_iri.as_str()) {
            Some(own) => {
                let (merged, errors) = own.merge_parent(inherited);
                diagnostics.extend(errors);
                if merged != *own {
                    child.set_property_constraints(property_iri.clone(), merged);
                    changes += 1;
                }
            }
            None => {
                let copy = inherited.relabelled(child.class_iri.clone());
                child.set_property_constraints(property_iri.clone(), copy);
                changes += 1;
            }
        }
    }
    changes
}

/// Single range per property; missing or ambiguous ranges are reported and
/// recorded as `None`
pub fn get_property_ranges(
    properties: &[PropertyDescription],
    ctx: &Context,
) -> (IndexMap<Iri, Option<Iri>>, Vec<Diagnostic>) {
    let mut ranges = IndexMap::new();
    let mut diagnostics = Vec::new();

    for property in properties {
        let candidates: IndexSet<&Iri> = property.ranges.iter().collect();
        let range = match candidates.len() {
            0 => {
                let declared = property.triples.iter().any(|triple| triple.predicate.as_str() == RDFS_RANGE);
                let diagnostic = if declared {
                    Diagnostic::unsupported("Property has unsupported property type")
                } else {
                    Diagnostic::ontology_error("Property has no ranges")
                };
                diagnostics.push(diagnostic.with_property(property.iri.clone()));
                None
            }
            1 => candidates.first().map(|range| (*range).clone()),
            n => {
                diagnostics.push(
                    Diagnostic::ontology_error(format!(
                        "Property has {} ranges {}",
                        n,
                        ctx.format_list(candidates.iter().map(|range| range.as_str()))
                    ))
                    .with_property(property.iri.clone()),
                );
                None
            }
        };
        ranges.insert(property.iri.clone(), range);
    }

    (ranges, diagnostics)
}

/// Compare each class-level range with the property's declared range
pub fn check_range_consistency(
    definitions: &IndexMap<Iri, ClassDefinition>,
    property_ranges: &IndexMap<Iri, Option<Iri>>,
    ctx: &Context,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (class_iri, definition) in definitions {
        let ClassDefinition::Restricted(constraints) = definition else {
            continue;
        };
        for (property_iri, pc) in constraints.properties() {
            let Some(value_range) = &pc.value_range else {
                continue;
            };
            match property_ranges.get(property_iri) {
                None => diagnostics.push(
                    Diagnostic::ontology_error(format!(
                        "property {} missing from ontology property list",
                        ctx.format(property_iri.as_str())
                    ))
                    .with_class(class_iri.clone())
                    .with_property(property_iri.clone()),
                ),
                Some(Some(declared)) if declared != value_range => diagnostics.push(
                    Diagnostic::ontology_error(format!(
                        "owl subclass constraint {} does not match explicit property constraint {}",
                        ctx.format(value_range.as_str()),
                        ctx.format(declared.as_str())
                    ))
                    .with_class(class_iri.clone())
                    .with_property(property_iri.clone()),
                ),
                Some(_) => {}
            }
        }
    }
    diagnostics
}
