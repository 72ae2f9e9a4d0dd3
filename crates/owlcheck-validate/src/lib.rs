//! # owlcheck validate
//!
//! Checks instance data against a [`ResolvedOntology`](owlcheck_owl::ResolvedOntology):
//! every subject needs exactly one known type, property counts must respect
//! the resolved cardinalities, values must fall in the expected range (or a
//! subclass of it) and typed literals must be lexically valid.

pub mod report;
pub mod validator;

pub use report::ValidationReport;
pub use validator::{get_value_type, ValidationConfig, Validator};
