//! Diagnostics accumulated by resolution and validation
//!
//! Diagnostics are data. No operation in this workspace aborts because of one;
//! they are appended to a running list and reported at the end.

use crate::context::Context;
use crate::model::Iri;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Diagnostic category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Malformed instance data
    DataError,
    /// A resolved constraint is violated by data
    ConstraintError,
    /// Internal invariant violation
    CriticalError,
    /// The ontology contradicts itself or lacks a required facet
    OntologyError,
    /// A construct outside the supported OWL/XSD subset
    UnsupportedFeature,
    /// Internal invariant violation
    SoftwareBug,
}

impl DiagnosticKind {
    pub const ALL: [DiagnosticKind; 6] = [
        DiagnosticKind::DataError,
        DiagnosticKind::ConstraintError,
        DiagnosticKind::CriticalError,
        DiagnosticKind::OntologyError,
        DiagnosticKind::UnsupportedFeature,
        DiagnosticKind::SoftwareBug,
    ];

    /// Human-readable label used as the message prefix
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticKind::DataError => "Data Error",
            DiagnosticKind::ConstraintError => "Constraint Error",
            DiagnosticKind::CriticalError => "Critical Error",
            DiagnosticKind::OntologyError => "Ontology Error",
            DiagnosticKind::UnsupportedFeature => "Unsupported Feature",
            DiagnosticKind::SoftwareBug => "Software Bug",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unknown diagnostic kind name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown diagnostic kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for DiagnosticKind {
    type Err = UnknownKind;

    /// Accepts the variant name in any case, with or without separators
    /// (`DataError`, `data-error`, `data_error`, `Data Error`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let kind = match normalized.as_str() {
            "dataerror" => DiagnosticKind::DataError,
            "constrainterror" => DiagnosticKind::ConstraintError,
            "criticalerror" => DiagnosticKind::CriticalError,
            "ontologyerror" => DiagnosticKind::OntologyError,
            "unsupportedfeature" | "unsupported" => DiagnosticKind::UnsupportedFeature,
            "softwarebug" => DiagnosticKind::SoftwareBug,
            _ => return Err(UnknownKind(s.to_string())),
        };
        Ok(kind)
    }
}

/// One reported problem.
///
/// Two diagnostics are equal when kind, message, class, property and line
/// number are all equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub class_iri: Option<Iri>,
    pub property_iri: Option<Iri>,
    pub line_number: Option<u32>,
}

impl Diagnostic {
    pub fn new<S: Into<String>>(kind: DiagnosticKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
            class_iri: None,
            property_iri: None,
            line_number: None,
        }
    }

    pub fn data_error<S: Into<String>>(message: S) -> Self {
        Self::new(DiagnosticKind::DataError, message)
    }

    pub fn constraint_error<S: Into<String>>(message: S) -> Self {
        Self::new(DiagnosticKind::ConstraintError, message)
    }

    pub fn critical<S: Into<String>>(message: S) -> Self {
        Self::new(DiagnosticKind::CriticalError, message)
    }

    pub fn ontology_error<S: Into<String>>(message: S) -> Self {
        Self::new(DiagnosticKind::OntologyError, message)
    }

    pub fn unsupported<S: Into<String>>(message: S) -> Self {
        Self::new(DiagnosticKind::UnsupportedFeature, message)
    }

    pub fn software_bug<S: Into<String>>(message: S) -> Self {
        Self::new(DiagnosticKind::SoftwareBug, message)
    }

    pub fn with_class<I: Into<Iri>>(mut self, class_iri: I) -> Self {
        self.class_iri = Some(class_iri.into());
        self
    }

    pub fn with_property<I: Into<Iri>>(mut self, property_iri: I) -> Self {
        self.property_iri = Some(property_iri.into());
        self
    }

    pub fn with_line(mut self, line_number: Option<u32>) -> Self {
        self.line_number = line_number;
        self
    }

    /// `<Kind>: Line N, Class <q> Property <q> message.`
    ///
    /// Line, class and property phrases are omitted when absent.
    pub fn format(&self, ctx: &Context) -> String {
        let mut phrases = vec![format!("{}:", self.kind)];
        if let Some(line) = self.line_number.filter(|line| *line > 0) {
            phrases.push(format!("Line {},", line));
        }
        if let Some(class_iri) = &self.class_iri {
            phrases.push(format!("Class {}", ctx.format(class_iri.as_str())));
        }
        if let Some(property_iri) = &self.property_iri {
            phrases.push(format!("Property {}", ctx.format(property_iri.as_str())));
        }
        phrases.push(format!("{}.", self.message));
        phrases.join(" ")
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(&Context::new()))
    }
}

/// Remove repeated diagnostics, keeping the first occurrence of each
pub fn dedup(diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    let mut seen = HashSet::new();
    diagnostics
        .into_iter()
        .filter(|diagnostic| seen.insert(diagnostic.clone()))
        .collect()
}

/// Stable sort by line number; diagnostics without one sort as line 0
pub fn sort_by_line(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|diagnostic| diagnostic.line_number.unwrap_or(0));
}
