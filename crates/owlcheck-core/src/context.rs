//! Namespace context: qualifier ↔ namespace bindings and pretty printing
//!
//! A qualifier abbreviates a namespace (`xsd` for
//! `http://www.w3.org/2001/XMLSchema#`). A qname is `qualifier:name`.

use crate::model::Iri;
use crate::vocab;
use itertools::Itertools;
use std::collections::HashMap;

/// Bindings every context starts with
pub const DEFAULT_BINDINGS: [(&str, &str); 6] = [
    ("rdf", vocab::RDF_NS),
    ("rdfs", vocab::RDFS_NS),
    ("xsd", vocab::XSD_NS),
    ("owl", vocab::OWL_NS),
    ("sh", vocab::SHACL_NS),
    ("olo", vocab::OLO_NS),
];

/// Set of namespace bindings
#[derive(Debug, Clone)]
pub struct Context {
    /// qualifier -> namespace
    namespace_mapping: HashMap<String, String>,
    /// namespace -> qualifier
    inverse_namespace_mapping: HashMap<String, String>,
    /// Bindings in the order they were applied
    bindings: Vec<(String, String)>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Context holding only the default bindings
    pub fn new() -> Self {
        let mut context = Self {
            namespace_mapping: HashMap::new(),
            inverse_namespace_mapping: HashMap::new(),
            bindings: Vec::new(),
        };
        context.populate(DEFAULT_BINDINGS);
        context
    }

    /// Bind a qualifier to a namespace.
    ///
    /// The forward mapping is last-one-wins. The inverse mapping keeps an
    /// existing qualifier unless it is empty or ends in a digit and the new one
    /// does not (generated prefixes such as `ns1` lose to real ones).
    pub fn bind<Q: AsRef<str>, N: AsRef<str>>(&mut self, qualifier: Q, namespace: N) -> &mut Self {
        let qualifier = qualifier.as_ref().to_string();
        let namespace = namespace.as_ref().to_string();
        self.bindings.push((qualifier.clone(), namespace.clone()));
        self.namespace_mapping.insert(qualifier.clone(), namespace.clone());

        let replace = match self.inverse_namespace_mapping.get(&namespace) {
            None => true,
            Some(existing) if existing.is_empty() => true,
            Some(_) if qualifier.is_empty() => false,
            Some(existing) if ends_with_digit(existing) => true,
            Some(_) if ends_with_digit(&qualifier) => false,
            Some(_) => true,
        };
        if replace {
            self.inverse_namespace_mapping.insert(namespace, qualifier);
        }
        self
    }

    /// Apply bindings in order
    pub fn populate<I, Q, N>(&mut self, bindings: I) -> &mut Self
    where
        I: IntoIterator<Item = (Q, N)>,
        Q: AsRef<str>,
        N: AsRef<str>,
    {
        for (qualifier, namespace) in bindings {
            self.bind(qualifier, namespace);
        }
        self
    }

    /// Context with the default bindings plus `bindings`
    pub fn with_bindings<I, Q, N>(bindings: I) -> Self
    where
        I: IntoIterator<Item = (Q, N)>,
        Q: AsRef<str>,
        N: AsRef<str>,
    {
        let mut context = Self::new();
        context.populate(bindings);
        context
    }

    /// Bindings in application order
    pub fn bindings(&self) -> &[(String, String)] {
        &self.bindings
    }

    /// qualifier -> namespace
    pub fn namespace(&self, qualifier: &str) -> Option<&str> {
        self.namespace_mapping.get(qualifier).map(String::as_str)
    }

    /// namespace -> qualifier
    pub fn qualifier(&self, namespace: &str) -> Option<&str> {
        self.inverse_namespace_mapping.get(namespace).map(String::as_str)
    }

    /// Split a qname into (qualifier, name) if its qualifier is bound
    pub fn split_qname<'a>(&self, identifier: &'a str) -> Option<(&'a str, &'a str)> {
        let (qualifier, name) = identifier.split_once(':')?;
        if self.namespace_mapping.contains_key(qualifier) {
            Some((qualifier, name))
        } else {
            None
        }
    }

    /// Split a URI into (namespace, name) using the longest bound namespace
    pub fn split_uri<'a>(&self, identifier: &'a str) -> Option<(&'a str, &'a str)> {
        self.inverse_namespace_mapping
            .keys()
            .filter(|namespace| !namespace.is_empty() && identifier.starts_with(namespace.as_str()))
            .max_by_key(|namespace| namespace.len())
            .map(|namespace| identifier.split_at(namespace.len()))
    }

    /// Express an identifier as a qname if possible
    pub fn qname(&self, identifier: &str) -> Option<String> {
        if self.split_qname(identifier).is_some() {
            return Some(identifier.to_string());
        }
        let (namespace, name) = self.split_uri(identifier)?;
        let qualifier = self.inverse_namespace_mapping.get(namespace)?;
        Some(format!("{}:{}", qualifier, name))
    }

    /// Express an identifier as a full URI string if possible
    pub fn uri_string(&self, identifier: &str) -> Option<String> {
        if let Some((qualifier, name)) = self.split_qname(identifier) {
            let namespace = self.namespace_mapping.get(qualifier)?;
            return Some(format!("{}{}", namespace, name));
        }
        self.split_uri(identifier).map(|_| identifier.to_string())
    }

    /// Expand an identifier to an [`Iri`] if it is a known URI or a bound qname
    pub fn expand(&self, identifier: &str) -> Option<Iri> {
        self.uri_string(identifier).map(Iri::new)
    }

    /// Pretty form of one identifier: `<qname>` when possible, `<raw>` otherwise
    pub fn format(&self, identifier: &str) -> String {
        match self.qname(identifier) {
            Some(qname) => format!("<{}>", qname),
            None => format!("<{}>", identifier),
        }
    }

    /// Pretty form of a list of identifiers: `[<a>, <b>]`
    pub fn format_list<I, S>(&self, identifiers: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        format!(
            "[{}]",
            identifiers.into_iter().map(|id| self.format(id.as_ref())).join(", ")
        )
    }
}

fn ends_with_digit(s: &str) -> bool {
    s.chars().last().map_or(false, |c| c.is_ascii_digit())
}
