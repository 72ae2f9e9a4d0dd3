//! # Owlcheck - OWL constraint resolution and data validation
//!
//! Owlcheck reads class and property descriptions of an OWL ontology (UCO and
//! CASE are the reference vocabularies), resolves the cardinality and range
//! restrictions every class inherits from its ancestors, and checks instance
//! data graphs against the result. Problems are collected as diagnostics
//! rather than aborting the run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use owlcheck::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let document: OntologyDocument = load_json("ontology.json")?;
//!     let ontology = OntologyResolver::default().resolve(&document);
//!
//!     let graph: DataGraph = load_json("case.json")?;
//!     let report = Validator::new(&ontology, ValidationConfig::default()).validate(&graph);
//!
//!     print!("{}", report.to_simple_string(&ontology.context()));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`owlcheck-core`**: terms, triples, namespace context, diagnostics
//! - **`owlcheck-xsd`**: lexical validation of XSD datatypes
//! - **`owlcheck-owl`**: restriction extraction and inheritance resolution
//! - **`owlcheck-validate`**: instance data validation
//! - **`owlcheck-store`**: on-disk storage of resolved ontologies and data
//!
//! ## Feature Flags
//!
//! - `full` (default): all crates included
//! - `xsd`, `owl`, `validate`, `store`: one crate each, with what it needs

pub use owlcheck_core as core;

#[cfg(feature = "owlcheck-xsd")]
pub use owlcheck_xsd as xsd;

#[cfg(feature = "owlcheck-owl")]
pub use owlcheck_owl as owl;

#[cfg(feature = "owlcheck-validate")]
pub use owlcheck_validate as validate;

#[cfg(feature = "owlcheck-store")]
pub use owlcheck_store as store;

// Convenience re-exports for common types
pub use owlcheck_core::{load_json, Context, DataGraph, Diagnostic, DiagnosticKind, Iri, OntologyDocument, Term, Triple};

#[cfg(feature = "owlcheck-owl")]
pub use owlcheck_owl::{OntologyResolver, ResolvedOntology, ResolverConfig};

#[cfg(feature = "owlcheck-validate")]
pub use owlcheck_validate::{ValidationConfig, ValidationReport, Validator};

#[cfg(feature = "owlcheck-store")]
pub use owlcheck_store::{Metadata, PersistenceError, StoredKind};

pub use serde;
pub use serde_json;

/// Prelude module for convenient imports
///
/// ```rust
/// use owlcheck::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{load_json, Context, DataGraph, Diagnostic, DiagnosticKind, Iri, OntologyDocument, Term, Triple};

    #[cfg(feature = "owlcheck-owl")]
    pub use crate::{OntologyResolver, ResolvedOntology, ResolverConfig};

    #[cfg(feature = "owlcheck-validate")]
    pub use crate::{ValidationConfig, ValidationReport, Validator};

    #[cfg(feature = "owlcheck-store")]
    pub use crate::{Metadata, StoredKind};
}

/// Current version of Owlcheck
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crates compiled into this build
pub fn enabled_modules() -> Vec<&'static str> {
    let mut modules = vec!["core"];
    if cfg!(feature = "owlcheck-xsd") {
        modules.push("xsd");
    }
    if cfg!(feature = "owlcheck-owl") {
        modules.push("owl");
    }
    if cfg!(feature = "owlcheck-validate") {
        modules.push("validate");
    }
    if cfg!(feature = "owlcheck-store") {
        modules.push("store");
    }
    modules
}
