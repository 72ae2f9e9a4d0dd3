//! Documents supplied by the triple-source collaborator
//!
//! Parsing RDF syntaxes happens upstream. What arrives here is an already
//! decomposed description of an ontology (classes with their restriction
//! triples, properties with their range triples) or of a data graph (a flat
//! triple list with source line numbers), serialized as JSON.

use crate::index::TripleIndex;
use crate::model::{Iri, Term, Triple};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors reading a collaborator document
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid document: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read a JSON document from disk
pub fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, SourceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| SourceError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// How the host graph library classified a class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    /// `owl:Class`, constrained through `owl:Restriction` blank nodes
    #[default]
    OwlClass,
    /// `rdfs:Datatype`, constrained through `owl:oneOf`
    Datatype,
    /// Anything else; never constrained
    Other,
}

/// One class of the ontology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDescription {
    pub iri: Iri,
    #[serde(default)]
    pub kind: ClassKind,
    /// Restriction triples (for OWL classes) or the `oneOf` list triples
    /// (for datatypes)
    #[serde(default)]
    pub triples: Vec<Triple>,
    /// Direct superclasses
    #[serde(default)]
    pub parents: Vec<Iri>,
    /// Transitive superclasses, nearest first. Derived from `parents` when absent.
    #[serde(default)]
    pub ancestors: Option<Vec<Iri>>,
}

impl ClassDescription {
    pub fn new<I: Into<Iri>>(iri: I, kind: ClassKind) -> Self {
        Self {
            iri: iri.into(),
            kind,
            triples: Vec::new(),
            parents: Vec::new(),
            ancestors: None,
        }
    }

    pub fn with_parent<I: Into<Iri>>(mut self, parent: I) -> Self {
        self.parents.push(parent.into());
        self
    }

    pub fn with_triples(mut self, triples: Vec<Triple>) -> Self {
        self.triples = triples;
        self
    }
}

/// One property of the ontology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescription {
    pub iri: Iri,
    /// Ranges the host library managed to parse
    #[serde(default)]
    pub ranges: Vec<Iri>,
    /// All triples whose subject is the property
    #[serde(default)]
    pub triples: Vec<Triple>,
}

impl PropertyDescription {
    pub fn new<I: Into<Iri>>(iri: I) -> Self {
        Self {
            iri: iri.into(),
            ranges: Vec::new(),
            triples: Vec::new(),
        }
    }

    pub fn with_range<I: Into<Iri>>(mut self, range: I) -> Self {
        self.ranges.push(range.into());
        self
    }
}

/// Decomposed ontology directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OntologyDocument {
    /// (qualifier, namespace) bindings found in the sources
    #[serde(default)]
    pub bindings: Vec<(String, String)>,
    #[serde(default)]
    pub classes: Vec<ClassDescription>,
    #[serde(default)]
    pub properties: Vec<PropertyDescription>,
}

/// Source line of a subject node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineNumber {
    pub node: Term,
    pub line: u32,
}

/// Decomposed data document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataGraph {
    #[serde(default)]
    pub bindings: Vec<(String, String)>,
    #[serde(default)]
    pub triples: Vec<Triple>,
    #[serde(default)]
    pub line_numbers: Vec<LineNumber>,
}

impl DataGraph {
    pub fn new(triples: Vec<Triple>) -> Self {
        Self {
            triples,
            ..Self::default()
        }
    }

    /// Record the source line of a node
    pub fn with_line(mut self, node: Term, line: u32) -> Self {
        self.line_numbers.push(LineNumber { node, line });
        self
    }

    /// Group the triples by subject and predicate
    pub fn index(&self) -> TripleIndex {
        TripleIndex::from_triples(&self.triples)
    }

    /// node -> line number; later entries win
    pub fn line_map(&self) -> HashMap<Term, u32> {
        self.line_numbers
            .iter()
            .map(|entry| (entry.node.clone(), entry.line))
            .collect()
    }
}
