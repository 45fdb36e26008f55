//! Triple store queries used by the viewer.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use log::trace;

use super::{
    MetadataProperties, MetadataPropertyValue, NamedNode, Statement, Term, namespaces::rdf,
    namespaces::rdfs,
};

/// The queries the viewer makes of an RDF graph.
///
/// Only [`statements_matching`](MetadataStore::statements_matching),
/// [`add`](MetadataStore::add) and
/// [`remove_statements`](MetadataStore::remove_statements) must be
/// implemented; everything else is derived from them.
pub trait MetadataStore {
    /// Returns every statement matching a pattern; `None` matches anything.
    fn statements_matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<&NamedNode>,
        object: Option<&Term>,
    ) -> Vec<Statement>;

    fn add(&mut self, statement: Statement);

    /// Removes every statement matching a pattern.
    fn remove_statements(
        &mut self,
        subject: Option<&Term>,
        predicate: Option<&NamedNode>,
        object: Option<&Term>,
    );

    fn contains(
        &self,
        subject: Option<&Term>,
        predicate: Option<&NamedNode>,
        object: Option<&Term>,
    ) -> bool {
        !self
            .statements_matching(subject, predicate, object)
            .is_empty()
    }

    /// Replaces a subject's values for `predicate` with a single object.
    fn set_statement(&mut self, subject: &Term, predicate: &NamedNode, object: Term) {
        self.remove_statements(Some(subject), Some(predicate), None);
        self.add(Statement::new(subject.clone(), predicate.clone(), object));
    }

    /// Finds the named subjects whose type is `rdf_type` or a subclass of it.
    ///
    /// Returns `(subject, type)` pairs sorted by subject, one for each type a
    /// subject is given within the class hierarchy.
    fn subjects_of_type(&self, rdf_type: &NamedNode) -> Vec<(NamedNode, NamedNode)> {
        let sub_class_of = rdfs().uri("subClassOf");
        let mut classes: IndexSet<NamedNode> = IndexSet::new();
        classes.insert(rdf_type.clone());
        let mut index = 0;
        while let Some(class) = classes.get_index(index).cloned() {
            let class_term = Term::from(class);
            for statement in self.statements_matching(None, Some(&sub_class_of), Some(&class_term))
            {
                if let Some(subclass) = statement.subject().as_named() {
                    classes.insert(subclass.clone());
                }
            }
            index += 1;
        }

        let type_predicate = rdf().uri("type");
        let mut subjects: IndexSet<(NamedNode, NamedNode)> = IndexSet::new();
        for class in &classes {
            let class_term = Term::from(class.clone());
            for statement in
                self.statements_matching(None, Some(&type_predicate), Some(&class_term))
            {
                if let Some(subject) = statement.subject().as_named() {
                    subjects.insert((subject.clone(), class.clone()));
                }
            }
        }
        let mut subjects: Vec<_> = subjects.into_iter().collect();
        subjects.sort_by(|a, b| a.0.cmp(&b.0));
        subjects
    }

    /// Collects every property of `subject`.
    ///
    /// Blank node objects become nested maps, and RDF collections become
    /// lists. Several values for one predicate are merged into a set.
    fn metadata_properties_for_subject(&self, subject: &Term) -> MetadataProperties {
        let mut visited = HashSet::new();
        properties_for_subject(self, subject, &mut visited)
    }
}

fn properties_for_subject<S: MetadataStore + ?Sized>(
    store: &S,
    subject: &Term,
    visited: &mut HashSet<Term>,
) -> MetadataProperties {
    let mut properties = MetadataProperties::new();
    if !visited.insert(subject.clone()) {
        trace!(subject = subject.value(); "Cycle in metadata, skipping");
        return properties;
    }
    for statement in store.statements_matching(Some(subject), None, None) {
        let value = property_value(store, statement.object(), visited);
        properties.set_property(statement.predicate(), value, true);
    }
    visited.remove(subject);
    properties
}

fn property_value<S: MetadataStore + ?Sized>(
    store: &S,
    object: &Term,
    visited: &mut HashSet<Term>,
) -> MetadataPropertyValue {
    match object {
        Term::Named(node) => MetadataPropertyValue::Named(node.clone()),
        Term::Literal(literal) => MetadataPropertyValue::Literal(literal.clone()),
        Term::Blank(_) => {
            if store.contains(Some(object), Some(&rdf().uri("rest")), None) {
                MetadataPropertyValue::List(collection_items(store, object, visited))
            } else {
                MetadataPropertyValue::Map(properties_for_subject(store, object, visited))
            }
        }
    }
}

/// Walks an RDF collection starting at `head`.
fn collection_items<S: MetadataStore + ?Sized>(
    store: &S,
    head: &Term,
    visited: &mut HashSet<Term>,
) -> Vec<MetadataPropertyValue> {
    let first = rdf().uri("first");
    let rest = rdf().uri("rest");
    let nil = Term::from(rdf().uri("nil"));

    let mut items = Vec::new();
    let mut seen = HashSet::new();
    let mut node = head.clone();
    while node != nil && seen.insert(node.clone()) {
        if let Some(statement) = store
            .statements_matching(Some(&node), Some(&first), None)
            .into_iter()
            .next()
        {
            items.push(property_value(store, statement.object(), visited));
        }
        match store
            .statements_matching(Some(&node), Some(&rest), None)
            .into_iter()
            .next()
        {
            Some(statement) => node = statement.object().clone(),
            None => break,
        }
    }
    items
}

/// An in-memory triple store.
///
/// Statements are kept in insertion order and duplicates are ignored.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    statements: IndexSet<Statement>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Groups the store's statements by subject.
    pub fn subjects(&self) -> IndexMap<&Term, Vec<&Statement>> {
        let mut subjects: IndexMap<&Term, Vec<&Statement>> = IndexMap::new();
        for statement in &self.statements {
            subjects.entry(statement.subject()).or_default().push(statement);
        }
        subjects
    }
}

impl FromIterator<Statement> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        Self {
            statements: iter.into_iter().collect(),
        }
    }
}

impl MetadataStore for MemoryStore {
    fn statements_matching(
        &self,
        subject: Option<&Term>,
        predicate: Option<&NamedNode>,
        object: Option<&Term>,
    ) -> Vec<Statement> {
        self.statements
            .iter()
            .filter(|statement| statement.matches(subject, predicate, object))
            .cloned()
            .collect()
    }

    fn add(&mut self, statement: Statement) {
        self.statements.insert(statement);
    }

    fn remove_statements(
        &mut self,
        subject: Option<&Term>,
        predicate: Option<&NamedNode>,
        object: Option<&Term>,
    ) {
        self.statements
            .retain(|statement| !statement.matches(subject, predicate, object));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{BlankNode, Literal, namespaces::celldl};

    fn doc(local: &str) -> NamedNode {
        NamedNode::new(format!("file:///tmp/test.celldl#{local}"))
    }

    #[test]
    fn test_contains_and_remove() {
        let mut store = MemoryStore::new();
        let subject = Term::from(doc("a"));
        store.add(Statement::new(
            doc("a"),
            rdfs().uri("label"),
            Literal::new("A"),
        ));
        store.add(Statement::new(
            doc("a"),
            rdfs().uri("label"),
            Literal::new("A"),
        ));
        assert_eq!(store.len(), 1);
        assert!(store.contains(Some(&subject), Some(&rdfs().uri("label")), None));

        store.remove_statements(Some(&subject), None, None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_statement_replaces() {
        let mut store = MemoryStore::new();
        let subject = Term::from(doc("a"));
        let label = rdfs().uri("label");
        store.add(Statement::new(doc("a"), label.clone(), Literal::new("old")));
        store.add(Statement::new(doc("a"), label.clone(), Literal::new("older")));
        store.set_statement(&subject, &label, Literal::new("new").into());

        let labels = store.statements_matching(Some(&subject), Some(&label), None);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].object().value(), "new");
    }

    #[test]
    fn test_subjects_of_type_includes_subclasses() {
        let mut store = MemoryStore::new();
        let rdf_type = rdf().uri("type");
        store.add(Statement::new(
            celldl().uri("Conduit"),
            rdfs().uri("subClassOf"),
            celldl().uri("Component"),
        ));
        store.add(Statement::new(doc("b"), rdf_type.clone(), celldl().uri("Conduit")));
        store.add(Statement::new(doc("a"), rdf_type.clone(), celldl().uri("Component")));
        store.add(Statement::new(doc("c"), rdf_type, celldl().uri("Connection")));

        let subjects = store.subjects_of_type(&celldl().uri("Component"));
        assert_eq!(
            subjects,
            vec![
                (doc("a"), celldl().uri("Component")),
                (doc("b"), celldl().uri("Conduit")),
            ]
        );
    }

    #[test]
    fn test_properties_with_blank_node_and_list() {
        let mut store = MemoryStore::new();
        let owner = doc("owner");
        let info = BlankNode::new("info");
        let list = BlankNode::new("l0");
        let list_tail = BlankNode::new("l1");
        let members = NamedNode::new("http://example.org/members");
        let detail = NamedNode::new("http://example.org/detail");

        store.add(Statement::new(owner.clone(), detail.clone(), info.clone()));
        store.add(Statement::new(info, rdfs().uri("label"), Literal::new("nested")));
        store.add(Statement::new(owner.clone(), members.clone(), list.clone()));
        store.add(Statement::new(list.clone(), rdf().uri("first"), doc("x")));
        store.add(Statement::new(list, rdf().uri("rest"), list_tail.clone()));
        store.add(Statement::new(list_tail.clone(), rdf().uri("first"), doc("y")));
        store.add(Statement::new(list_tail, rdf().uri("rest"), rdf().uri("nil")));

        let properties = store.metadata_properties_for_subject(&owner.into());
        match properties.get_property(&detail) {
            Some(MetadataPropertyValue::Map(nested)) => {
                assert_eq!(
                    nested
                        .get_property(&rdfs().uri("label"))
                        .and_then(|v| v.as_literal())
                        .map(|l| l.value()),
                    Some("nested")
                );
            }
            other => panic!("expected nested map, got {other:?}"),
        }
        let items: Vec<_> = properties
            .get_property_as_array(&members)
            .into_iter()
            .filter_map(|v| v.as_named().cloned())
            .collect();
        assert_eq!(items, vec![doc("x"), doc("y")]);
    }

    #[test]
    fn test_cyclic_blank_nodes_terminate() {
        let mut store = MemoryStore::new();
        let a = BlankNode::new("a");
        let b = BlankNode::new("b");
        let link = NamedNode::new("http://example.org/link");
        store.add(Statement::new(doc("root"), link.clone(), a.clone()));
        store.add(Statement::new(a.clone(), link.clone(), b.clone()));
        store.add(Statement::new(b, link.clone(), a));

        let properties = store.metadata_properties_for_subject(&doc("root").into());
        assert!(properties.get_property(&link).is_some());
    }
}
