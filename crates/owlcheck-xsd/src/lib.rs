//! # owlcheck XSD
//!
//! Validation of literal values against XSD datatypes.
//!
//! An [`XsdValidator`] owns its cache of compiled type checkers. A type is
//! compiled the first time it is requested and cached under both its URI
//! spelling (`http://www.w3.org/2001/XMLSchema#integer`) and its qname
//! spelling (`xsd:integer`). A type that cannot be compiled is blacklisted for
//! the lifetime of the validator: the diagnostic from the first failure is
//! returned again on every later call for that type.

pub mod types;

pub use types::{compile, CompiledType};

use owlcheck_core::vocab::XSD_NS;
use owlcheck_core::Diagnostic;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

const XSD_QUALIFIER: &str = "xsd:";

/// Cache of compiled XSD checkers plus the blacklist of bad types
#[derive(Debug, Default)]
pub struct XsdValidator {
    compiled: HashMap<String, Arc<CompiledType>>,
    blacklist: HashMap<String, Vec<Diagnostic>>,
}

impl XsdValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `value` against `xsd_type` (URI or qname spelling).
    ///
    /// Returns no diagnostics on success, one `DataError` if the value is not
    /// in the type's lexical space, or the cached failure for a bad type.
    pub fn validate(&mut self, value: &str, xsd_type: &str) -> Vec<Diagnostic> {
        if let Some(diagnostics) = self.blacklist.get(xsd_type) {
            return diagnostics.clone();
        }

        let compiled = match self.get_compiled(xsd_type) {
            Ok(compiled) => compiled,
            Err(diagnostic) => {
                warn!(xsd_type, "blacklisting XSD type: {}", diagnostic.message);
                let diagnostics = vec![diagnostic];
                for key in spellings(xsd_type) {
                    self.blacklist.insert(key, diagnostics.clone());
                }
                return diagnostics;
            }
        };

        if compiled.accepts(value) {
            Vec::new()
        } else {
            vec![Diagnostic::data_error(format!(
                "'{}' is not a valid value of the atomic type 'xsd:{}'",
                value,
                compiled.local_name()
            ))]
        }
    }

    /// Cached checker for `xsd_type`, compiling and caching it on first use
    pub fn get_compiled(&mut self, xsd_type: &str) -> Result<Arc<CompiledType>, Diagnostic> {
        if let Some(compiled) = self.compiled.get(xsd_type) {
            return Ok(Arc::clone(compiled));
        }

        let local_name = local_name(xsd_type)
            .ok_or_else(|| Diagnostic::unsupported(format!("Invalid xsd type {}", xsd_type)))?;
        let compiled = match compile(local_name) {
            Ok(Some(compiled)) => Arc::new(compiled),
            Ok(None) => {
                return Err(Diagnostic::unsupported(format!(
                    "Unsupported xsd type {}",
                    xsd_type
                )))
            }
            Err(error) => {
                return Err(Diagnostic::software_bug(format!(
                    "cannot compile checker for {}: {}",
                    xsd_type, error
                )))
            }
        };

        debug!(xsd_type = local_name, "compiled XSD checker");
        for key in spellings(xsd_type) {
            self.compiled.insert(key, Arc::clone(&compiled));
        }
        Ok(compiled)
    }

    /// Type identifiers currently holding a compiled checker, sorted
    pub fn cached_types(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.compiled.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// True if `xsd_type` failed to compile earlier
    pub fn is_blacklisted(&self, xsd_type: &str) -> bool {
        self.blacklist.contains_key(xsd_type)
    }
}

/// Local name of an XSD type identifier in either spelling
fn local_name(xsd_type: &str) -> Option<&str> {
    xsd_type
        .strip_prefix(XSD_QUALIFIER)
        .or_else(|| xsd_type.strip_prefix(XSD_NS))
}

/// Every spelling `xsd_type` is cached under
fn spellings(xsd_type: &str) -> Vec<String> {
    match local_name(xsd_type) {
        Some(name) => vec![format!("{}{}", XSD_QUALIFIER, name), format!("{}{}", XSD_NS, name)],
        None => vec![xsd_type.to_string()],
    }
}
