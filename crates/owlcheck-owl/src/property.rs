//! Cardinality and range constraints for one property of one class

use owlcheck_core::{Context, Diagnostic, Iri};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One raw fact read from an `owl:Restriction` node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Facet {
    MinCardinality(u32),
    MaxCardinality(u32),
    Cardinality(u32),
    MinQualifiedCardinality(u32),
    MaxQualifiedCardinality(u32),
    QualifiedCardinality(u32),
    /// `owl:onClass` or `owl:onDataRange`
    ValueRange(Iri),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Min,
    Max,
}

/// Type and cardinality constraints on one property of one class.
///
/// Equality ignores `qualified`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyConstraints {
    /// Owning class, used in diagnostics and descriptions only
    pub class_iri: Option<Iri>,
    pub property_iri: Option<Iri>,
    pub min_cardinality: Option<u32>,
    pub max_cardinality: Option<u32>,
    pub value_range: Option<Iri>,
    /// `None` until a cardinality facet is seen; then whether it was qualified
    pub qualified: Option<bool>,
}

impl PartialEq for PropertyConstraints {
    fn eq(&self, other: &Self) -> bool {
        self.class_iri == other.class_iri
            && self.property_iri == other.property_iri
            && self.min_cardinality == other.min_cardinality
            && self.max_cardinality == other.max_cardinality
            && self.value_range == other.value_range
    }
}

impl Eq for PropertyConstraints {}

impl PropertyConstraints {
    pub fn new<C: Into<Iri>, P: Into<Iri>>(class_iri: C, property_iri: P) -> Self {
        Self {
            class_iri: Some(class_iri.into()),
            property_iri: Some(property_iri.into()),
            ..Self::default()
        }
    }

    /// Build constraints by applying facets in order
    pub fn from_facets<C, P, I>(class_iri: C, property_iri: P, facets: I) -> (Self, Vec<Diagnostic>)
    where
        C: Into<Iri>,
        P: Into<Iri>,
        I: IntoIterator<Item = Facet>,
    {
        let mut constraints = Self::new(class_iri, property_iri);
        let diagnostics = facets
            .into_iter()
            .flat_map(|facet| constraints.apply(facet))
            .collect();
        (constraints, diagnostics)
    }

    /// Apply one facet. The state is updated even when diagnostics are returned.
    pub fn apply(&mut self, facet: Facet) -> Vec<Diagnostic> {
        match facet {
            Facet::MinCardinality(n) => self.add_min_cardinality(n),
            Facet::MaxCardinality(n) => self.add_max_cardinality(n),
            Facet::Cardinality(n) => self.add_cardinality(n),
            Facet::MinQualifiedCardinality(n) => self.add_qualified_min_cardinality(n),
            Facet::MaxQualifiedCardinality(n) => self.add_qualified_max_cardinality(n),
            Facet::QualifiedCardinality(n) => self.add_qualified_cardinality(n),
            Facet::ValueRange(range) => self.add_value_range(range),
        }
    }

    pub fn add_min_cardinality(&mut self, n: u32) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        diagnostics.extend(self.reduce_qualified(false, "min_cardinality"));
        diagnostics.extend(self.reduce_bound(Bound::Min, n));
        diagnostics
    }

    pub fn add_max_cardinality(&mut self, n: u32) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        diagnostics.extend(self.reduce_qualified(false, "max_cardinality"));
        diagnostics.extend(self.reduce_bound(Bound::Max, n));
        diagnostics
    }

    /// Sets both bounds to `n`
    pub fn add_cardinality(&mut self, n: u32) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        diagnostics.extend(self.reduce_qualified(false, "cardinality"));
        diagnostics.extend(self.reduce_exact(n));
        diagnostics
    }

    pub fn add_qualified_min_cardinality(&mut self, n: u32) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        diagnostics.extend(self.reduce_qualified(true, "min_cardinality"));
        diagnostics.extend(self.reduce_bound(Bound::Min, n));
        diagnostics
    }

    pub fn add_qualified_max_cardinality(&mut self, n: u32) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        diagnostics.extend(self.reduce_qualified(true, "max_cardinality"));
        diagnostics.extend(self.reduce_bound(Bound::Max, n));
        diagnostics
    }

    pub fn add_qualified_cardinality(&mut self, n: u32) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        diagnostics.extend(self.reduce_qualified(true, "cardinality"));
        diagnostics.extend(self.reduce_exact(n));
        diagnostics
    }

    /// First range wins
    pub fn add_value_range<I: Into<Iri>>(&mut self, range: I) -> Vec<Diagnostic> {
        if self.value_range.is_some() {
            return vec![self.ontology_error("multiple ranges specified")];
        }
        self.value_range = Some(range.into());
        Vec::new()
    }

    /// Facts that can only be checked once every facet is in
    pub fn check_consistency(&self) -> Vec<Diagnostic> {
        match (self.qualified, &self.value_range) {
            (Some(true), None) => vec![self.ontology_error("qualified constraint has no range")],
            (Some(false), Some(_)) => vec![self.ontology_error("unqualified constraint has range")],
            _ => Vec::new(),
        }
    }

    /// Combine with the constraints inherited from a parent class.
    ///
    /// Fields set here win over the parent's; unset fields take the parent's
    /// value. A parent that is tighter than this constraint is reported. If an
    /// inherited bound makes the combined bounds cross, both bounds revert to
    /// this constraint's values.
    /// `qualified` is not carried into the result.
    pub fn merge_parent(&self, parent: &PropertyConstraints) -> (PropertyConstraints, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let origin = parent
            .class_iri
            .as_ref()
            .map_or_else(|| "parent".to_string(), Iri::to_string);

        if let (Some(own), Some(inherited)) = (self.min_cardinality, parent.min_cardinality) {
            if inherited > own {
                diagnostics.push(self.ontology_error(format!(
                    "cannot merge min_cardinality {} with {} from {}",
                    own, inherited, origin
                )));
            }
        }
        if let (Some(own), Some(inherited)) = (self.max_cardinality, parent.max_cardinality) {
            if inherited < own {
                diagnostics.push(self.ontology_error(format!(
                    "cannot merge max_cardinality {} with {} from {}",
                    own, inherited, origin
                )));
            }
        }
        if let (Some(own), Some(inherited)) = (&self.value_range, &parent.value_range) {
            if inherited != own {
                diagnostics.push(self.ontology_error(format!(
                    "cannot merge value_range {} with {} from {}",
                    own, inherited, origin
                )));
            }
        }

        let mut merged = PropertyConstraints {
            class_iri: self.class_iri.clone(),
            property_iri: self.property_iri.clone(),
            min_cardinality: self.min_cardinality.or(parent.min_cardinality),
            max_cardinality: self.max_cardinality.or(parent.max_cardinality),
            value_range: self.value_range.clone().or_else(|| parent.value_range.clone()),
            qualified: None,
        };

        let inherited_bound = (merged.min_cardinality, merged.max_cardinality)
            != (self.min_cardinality, self.max_cardinality);
        if let (Some(min), Some(max)) = (merged.min_cardinality, merged.max_cardinality) {
            if inherited_bound && min > max {
                diagnostics.push(self.ontology_error(format!(
                    "cannot merge cardinalities from {} because min_cardinality exceeds max_cardinality",
                    origin
                )));
                merged.min_cardinality = self.min_cardinality;
                merged.max_cardinality = self.max_cardinality;
            }
        }

        (merged, diagnostics)
    }

    /// Copy owned by another class
    pub fn relabelled<I: Into<Iri>>(&self, class_iri: I) -> Self {
        Self {
            class_iri: Some(class_iri.into()),
            ..self.clone()
        }
    }

    /// One-line plain-text description
    pub fn describe(&self, ctx: &Context) -> String {
        let noun = |n: u32| if n == 1 { "value" } else { "values" };
        let mut phrases = Vec::new();
        if let Some(class_iri) = &self.class_iri {
            phrases.push(format!("Class {}", ctx.format(class_iri.as_str())));
        }
        match &self.property_iri {
            Some(property_iri) => phrases.push(format!("Property {}", ctx.format(property_iri.as_str()))),
            None => phrases.push("Property".to_string()),
        }

        let cardinality = match (self.min_cardinality.unwrap_or(0), self.max_cardinality) {
            (_, Some(0)) => "may have no values".to_string(),
            (0, None) => "may have any number of values".to_string(),
            (0, Some(max)) => format!("may have at most {} {}", max, noun(max)),
            (min, None) => format!("must have at least {} {}", min, noun(min)),
            (min, Some(max)) if min == max => format!("must have exactly {} {}", min, noun(min)),
            (min, Some(max)) => format!("must have between {} and {} values", min, max),
        };
        phrases.push(cardinality);

        if let Some(range) = &self.value_range {
            phrases.push(format!("of type {}", ctx.format(range.as_str())));
        }
        phrases.join(" ")
    }

    fn reduce_qualified(&mut self, qualified: bool, facet: &str) -> Option<Diagnostic> {
        match self.qualified {
            None => {
                self.qualified = Some(qualified);
                None
            }
            Some(existing) if existing == qualified => None,
            Some(_) if qualified => Some(self.ontology_error(format!(
                "qualified {} specified for an unqualified constraint",
                facet
            ))),
            Some(_) => Some(self.ontology_error(format!(
                "unqualified {} specified for a qualified constraint",
                facet
            ))),
        }
    }

    /// Both bounds to `n`; one diagnostic if either already differs
    fn reduce_exact(&mut self, n: u32) -> Vec<Diagnostic> {
        let conflicts = |bound: Option<u32>| bound.map_or(false, |existing| existing != n);
        if conflicts(self.min_cardinality) || conflicts(self.max_cardinality) {
            return vec![self.ontology_error("multiple cardinality values specified")];
        }
        [Bound::Min, Bound::Max]
            .into_iter()
            .filter_map(|bound| self.reduce_bound(bound, n))
            .collect()
    }

    fn reduce_bound(&mut self, bound: Bound, n: u32) -> Option<Diagnostic> {
        let (current, other) = match bound {
            Bound::Min => (self.min_cardinality, self.max_cardinality),
            Bound::Max => (self.max_cardinality, self.min_cardinality),
        };
        match current {
            Some(existing) if existing == n => None,
            Some(_) => Some(self.ontology_error(match bound {
                Bound::Min => "multiple min_cardinality values specified",
                Bound::Max => "multiple max_cardinality values specified",
            })),
            None => match (bound, other) {
                (Bound::Min, Some(max)) if n > max => {
                    Some(self.ontology_error("min_cardinality exceeds max_cardinality"))
                }
                (Bound::Max, Some(min)) if n < min => {
                    Some(self.ontology_error("max_cardinality is less than min_cardinality"))
                }
                (Bound::Min, _) => {
                    self.min_cardinality = Some(n);
                    None
                }
                (Bound::Max, _) => {
                    self.max_cardinality = Some(n);
                    None
                }
            },
        }
    }

    fn ontology_error<S: AsRef<str>>(&self, message: S) -> Diagnostic {
        let mut diagnostic =
            Diagnostic::ontology_error(format!("constraint violation: {}", message.as_ref()));
        diagnostic.class_iri = self.class_iri.clone();
        diagnostic.property_iri = self.property_iri.clone();
        diagnostic
    }
}

impl fmt::Display for PropertyConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |n: Option<u32>| n.map_or_else(|| "?".to_string(), |n| n.to_string());
        write!(
            f,
            "<{} {} [{}-{}] {}>",
            self.class_iri.as_ref().map_or("None", Iri::as_str),
            self.property_iri.as_ref().map_or("DATATYPE", Iri::as_str),
            show(self.min_cardinality),
            show(self.max_cardinality),
            self.value_range.as_ref().map_or("?", Iri::as_str),
        )
    }
}
