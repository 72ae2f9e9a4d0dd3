//! RDF term and triple models

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// IRI wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(pub String);

impl Iri {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Iri::new(s)
    }
}

impl From<String> for Iri {
    fn from(s: String) -> Self {
        Iri(s)
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

// Lets maps keyed by Iri be queried with &str
impl Borrow<str> for Iri {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Literal value with an optional datatype.
///
/// A literal without a datatype is an implicit `xsd:string`. The datatype may
/// still be a qname such as `xsd:integer` when the data source did not expand it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    #[serde(default)]
    pub datatype: Option<Iri>,
}

/// RDF term: the subject or object position of a triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    /// Globally unique identifier
    Iri(Iri),
    /// Locally scoped anonymous node
    BlankNode(String),
    /// Scalar value
    Literal(Literal),
}

impl Term {
    pub fn iri<S: Into<String>>(s: S) -> Self {
        Term::Iri(Iri::new(s))
    }

    pub fn blank<S: Into<String>>(id: S) -> Self {
        Term::BlankNode(id.into())
    }

    /// Untyped (implicit string) literal
    pub fn literal<S: Into<String>>(lexical: S) -> Self {
        Term::Literal(Literal {
            lexical: lexical.into(),
            datatype: None,
        })
    }

    pub fn typed_literal<S: Into<String>, D: Into<String>>(lexical: S, datatype: D) -> Self {
        Term::Literal(Literal {
            lexical: lexical.into(),
            datatype: Some(Iri::new(datatype)),
        })
    }

    pub fn is_blank_node(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// Short name of the term variant, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Term::Iri(_) => "IRI",
            Term::BlankNode(_) => "BlankNode",
            Term::Literal(_) => "Literal",
        }
    }

    /// Identifier string without blank-node or literal decoration
    pub fn identifier(&self) -> &str {
        match self {
            Term::Iri(iri) => iri.as_str(),
            Term::BlankNode(id) => id,
            Term::Literal(literal) => &literal.lexical,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "{}", iri),
            Term::BlankNode(id) => write!(f, "_:{}", id),
            Term::Literal(Literal { lexical, datatype: None }) => write!(f, "\"{}\"", lexical),
            Term::Literal(Literal { lexical, datatype: Some(dt) }) => write!(f, "\"{}\"^^{}", lexical, dt),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

/// RDF Triple representation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Iri,
    pub object: Term,
}

impl Triple {
    pub fn new<P: Into<Iri>>(subject: Term, predicate: P, object: Term) -> Self {
        Triple {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {} {})", self.subject, self.predicate, self.object)
    }
}
