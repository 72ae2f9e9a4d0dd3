//! Subject → predicate → objects grouping of a flat triple list

use crate::model::{Iri, Term, Triple};
use indexmap::{IndexMap, IndexSet};

/// Objects of one (subject, predicate) pair, in first-seen order
pub type ObjectSet = IndexSet<Term>;

/// Predicates of one subject, in first-seen order
pub type PredicateMap = IndexMap<Iri, ObjectSet>;

/// Triple index grouping triples by subject and predicate.
///
/// Duplicate triples collapse into one object entry. Iteration follows the
/// order in which subjects and predicates were first inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripleIndex {
    subjects: IndexMap<Term, PredicateMap>,
}

impl TripleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from borrowed triples
    pub fn from_triples<'a, I>(triples: I) -> Self
    where
        I: IntoIterator<Item = &'a Triple>,
    {
        let mut index = Self::new();
        for triple in triples {
            index.insert(triple);
        }
        index
    }

    /// Add a triple to the index
    pub fn insert(&mut self, triple: &Triple) {
        self.subjects
            .entry(triple.subject.clone())
            .or_default()
            .entry(triple.predicate.clone())
            .or_default()
            .insert(triple.object.clone());
    }

    /// Predicate map of a subject
    pub fn get(&self, subject: &Term) -> Option<&PredicateMap> {
        self.subjects.get(subject)
    }

    /// Objects of a (subject, predicate) pair
    pub fn objects(&self, subject: &Term, predicate: &str) -> Option<&ObjectSet> {
        self.subjects.get(subject)?.get(predicate)
    }

    pub fn contains_subject(&self, subject: &Term) -> bool {
        self.subjects.contains_key(subject)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Term, &PredicateMap)> {
        self.subjects.iter()
    }

    pub fn subjects(&self) -> impl Iterator<Item = &Term> {
        self.subjects.keys()
    }

    /// Number of distinct subjects
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

impl FromIterator<Triple> for TripleIndex {
    fn from_iter<T: IntoIterator<Item = Triple>>(iter: T) -> Self {
        let mut index = Self::new();
        for triple in iter {
            index.insert(&triple);
        }
        index
    }
}

impl<'a> IntoIterator for &'a TripleIndex {
    type Item = (&'a Term, &'a PredicateMap);
    type IntoIter = indexmap::map::Iter<'a, Term, PredicateMap>;

    fn into_iter(self) -> Self::IntoIter {
        self.subjects.iter()
    }
}
