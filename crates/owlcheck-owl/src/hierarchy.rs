//! Class hierarchy: parent → children edges, ancestor closure, cycle detection

use indexmap::{IndexMap, IndexSet};
use owlcheck_core::{ClassDescription, Diagnostic, Iri};
use std::collections::VecDeque;

/// Direct subclass edges of an ontology, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassHierarchy {
    parents: IndexMap<Iri, Vec<Iri>>,
    children: IndexMap<Iri, Vec<Iri>>,
}

impl ClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hierarchy from the direct parents of each class description
    pub fn from_classes<'a, I>(classes: I) -> Self
    where
        I: IntoIterator<Item = &'a ClassDescription>,
    {
        let mut hierarchy = Self::new();
        for class in classes {
            hierarchy.parents.entry(class.iri.clone()).or_default();
            for parent in &class.parents {
                hierarchy.add_edge(parent.clone(), class.iri.clone());
            }
        }
        hierarchy
    }

    /// Record `child rdfs:subClassOf parent`
    pub fn add_edge<P: Into<Iri>, C: Into<Iri>>(&mut self, parent: P, child: C) {
        let (parent, child) = (parent.into(), child.into());
        let children = self.children.entry(parent.clone()).or_default();
        if !children.contains(&child) {
            children.push(child.clone());
        }
        let parents = self.parents.entry(child).or_default();
        if !parents.contains(&parent) {
            parents.push(parent);
        }
    }

    /// parent → direct children
    pub fn children(&self) -> &IndexMap<Iri, Vec<Iri>> {
        &self.children
    }

    pub fn parents_of(&self, class_iri: &str) -> &[Iri] {
        self.parents.get(class_iri).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of parent → child edges
    pub fn edge_count(&self) -> usize {
        self.children.values().map(Vec::len).sum()
    }

    /// Transitive superclasses of a class, nearest first, without duplicates
    pub fn ancestors(&self, class_iri: &str) -> Vec<Iri> {
        let mut seen: IndexSet<Iri> = IndexSet::new();
        let mut queue: VecDeque<&Iri> = self.parents_of(class_iri).iter().collect();
        while let Some(next) = queue.pop_front() {
            if next.as_str() == class_iri || !seen.insert(next.clone()) {
                continue;
            }
            queue.extend(self.parents_of(next.as_str()));
        }
        seen.into_iter().collect()
    }

    /// True if `to` can be reached from `from` by following child edges
    fn reaches(&self, from: &Iri, to: &Iri) -> bool {
        let mut seen: IndexSet<&Iri> = IndexSet::new();
        let mut queue: VecDeque<&Iri> = VecDeque::new();
        queue.push_back(from);
        while let Some(next) = queue.pop_front() {
            if let Some(children) = self.children.get(next) {
                for child in children {
                    if child == to {
                        return true;
                    }
                    if seen.insert(child) {
                        queue.push_back(child);
                    }
                }
            }
        }
        false
    }

    /// Remove every edge that closes a cycle and report each class on one.
    ///
    /// An edge parent → child lies on a cycle when the parent is reachable
    /// from the child.
    pub fn break_cycles(&mut self) -> Vec<Diagnostic> {
        let cyclic_edges: Vec<(Iri, Iri)> = self
            .children
            .iter()
            .flat_map(|(parent, children)| children.iter().map(move |child| (parent.clone(), child.clone())))
            .filter(|(parent, child)| parent == child || self.reaches(child, parent))
            .collect();
        if cyclic_edges.is_empty() {
            return Vec::new();
        }

        let mut cyclic_classes: IndexSet<Iri> = IndexSet::new();
        for (parent, child) in &cyclic_edges {
            cyclic_classes.insert(parent.clone());
            cyclic_classes.insert(child.clone());
            if let Some(children) = self.children.get_mut(parent) {
                children.retain(|existing| existing != child);
            }
            if let Some(parents) = self.parents.get_mut(child) {
                parents.retain(|existing| existing != parent);
            }
        }

        cyclic_classes
            .into_iter()
            .map(|class_iri| Diagnostic::ontology_error("class is part of a subclass cycle").with_class(class_iri))
            .collect()
    }
}
