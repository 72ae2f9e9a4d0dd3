//! # owlcheck core
//!
//! RDF terms and triples, the subject/predicate triple index, diagnostics,
//! namespace contexts, vocabulary IRIs and the documents exchanged with the
//! triple-source collaborator.

pub mod context;
pub mod diagnostic;
pub mod index;
pub mod model;
pub mod source;
pub mod vocab;

pub use context::Context;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use index::{ObjectSet, PredicateMap, TripleIndex};
pub use model::{Iri, Literal, Term, Triple};
pub use source::{
    load_json, ClassDescription, ClassKind, DataGraph, LineNumber, OntologyDocument,
    PropertyDescription, SourceError,
};
