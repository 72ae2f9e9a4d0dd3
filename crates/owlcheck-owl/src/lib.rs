//! # owlcheck OWL
//!
//! Reads cardinality and range restrictions out of OWL class descriptions,
//! recognises enumerated-vocabulary datatypes and resolves subclass
//! inheritance into a [`ResolvedOntology`] the validator can query.
//!
//! ```ignore
//! use owlcheck_owl::{OntologyResolver, ResolverConfig};
//!
//! let resolved = OntologyResolver::new(ResolverConfig::default()).resolve(&document);
//! for diagnostic in &resolved.diagnostics {
//!     println!("{}", diagnostic.format(&resolved.context()));
//! }
//! ```

pub mod class;
pub mod datatype;
pub mod hierarchy;
pub mod model;
pub mod property;
pub mod resolver;

pub use class::{get_class_constraints, ClassConstraints};
pub use datatype::{get_datatype_constraints, DatatypeConstraints};
pub use hierarchy::ClassHierarchy;
pub use model::{ClassDefinition, ResolvedOntology};
pub use property::{Facet, PropertyConstraints};
pub use resolver::{
    check_range_consistency, get_property_ranges, inherit_constraints, naive_definitions, Inheritance,
    OntologyResolver, ResolverConfig,
};
