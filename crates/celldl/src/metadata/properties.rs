//! A subject's metadata as a map from predicate to value.

use indexmap::{IndexMap, IndexSet};

use super::{Literal, NamedNode, namespaces};

/// The value of one predicate of a subject.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataPropertyValue {
    Literal(Literal),
    Named(NamedNode),
    /// An RDF collection (`rdf:first`/`rdf:rest` list), in order.
    List(Vec<MetadataPropertyValue>),
    /// Several values given for one predicate, without duplicates.
    Set(Vec<MetadataPropertyValue>),
    /// The properties of a blank node.
    Map(MetadataProperties),
}

impl MetadataPropertyValue {
    pub fn as_named(&self) -> Option<&NamedNode> {
        match self {
            MetadataPropertyValue::Named(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            MetadataPropertyValue::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    fn is_term(&self) -> bool {
        matches!(
            self,
            MetadataPropertyValue::Literal(_) | MetadataPropertyValue::Named(_)
        )
    }
}

impl From<NamedNode> for MetadataPropertyValue {
    fn from(node: NamedNode) -> Self {
        MetadataPropertyValue::Named(node)
    }
}

impl From<Literal> for MetadataPropertyValue {
    fn from(literal: Literal) -> Self {
        MetadataPropertyValue::Literal(literal)
    }
}

/// The properties of one subject, keyed by predicate IRI.
///
/// The subject's `rdf:type` values are also tracked separately so that type
/// checks don't need to unpack the `rdf:type` entry.
///
/// # Examples
///
/// ```
/// # use celldl::metadata::{MetadataProperties, Literal, namespaces};
/// let mut properties = MetadataProperties::new();
/// let label = namespaces::rdfs().uri("label");
///
/// properties.set_property(&label, Literal::new("first").into(), true);
/// properties.set_property(&label, Literal::new("second").into(), true);
/// assert_eq!(properties.get_property_as_array(&label).len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataProperties {
    properties: IndexMap<String, MetadataPropertyValue>,
    rdf_types: IndexSet<String>,
}

impl MetadataProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds properties from `(predicate, value)` pairs; later pairs replace earlier ones.
    pub fn from_properties(
        properties: impl IntoIterator<Item = (NamedNode, MetadataPropertyValue)>,
    ) -> Self {
        let mut metadata = Self::new();
        for (predicate, value) in properties {
            metadata.set_property(&predicate, value, false);
        }
        metadata
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// The IRIs of the subject's `rdf:type` values.
    pub fn rdf_types(&self) -> impl Iterator<Item = &str> {
        self.rdf_types.iter().map(String::as_str)
    }

    pub fn is_a(&self, rdf_type: &NamedNode) -> bool {
        self.rdf_types.contains(rdf_type.value())
    }

    pub fn get_property(&self, predicate: &NamedNode) -> Option<&MetadataPropertyValue> {
        self.properties.get(predicate.value())
    }

    /// Returns a predicate's values as a flat list.
    ///
    /// Single values become one-element lists, and sets and lists give their
    /// members.
    pub fn get_property_as_array(&self, predicate: &NamedNode) -> Vec<&MetadataPropertyValue> {
        match self.get_property(predicate) {
            None => Vec::new(),
            Some(MetadataPropertyValue::List(values) | MetadataPropertyValue::Set(values)) => {
                values.iter().collect()
            }
            Some(value) => vec![value],
        }
    }

    /// Sets a predicate's value.
    ///
    /// When `multi_valued` is set and the predicate already has a value, the
    /// new value is merged with the old into a set, skipping a value that is
    /// already present.
    pub fn set_property(
        &mut self,
        predicate: &NamedNode,
        value: MetadataPropertyValue,
        multi_valued: bool,
    ) {
        if *predicate == namespaces::rdf().uri("type") {
            if let MetadataPropertyValue::Named(node) = &value {
                self.rdf_types.insert(node.value().to_string());
            }
        }
        let key = predicate.value().to_string();
        if !multi_valued {
            self.properties.insert(key, value);
            return;
        }
        match self.properties.get_mut(&key) {
            None => {
                self.properties.insert(key, value);
            }
            Some(MetadataPropertyValue::Set(values)) => {
                if !(value.is_term() && values.contains(&value)) {
                    values.push(value);
                }
            }
            Some(existing) => {
                if !existing.is_term() || *existing != value {
                    let previous = std::mem::replace(existing, MetadataPropertyValue::Set(Vec::new()));
                    *existing = MetadataPropertyValue::Set(vec![previous, value]);
                }
            }
        }
    }

    /// Iterates over `(predicate, value)` pairs in insertion order.
    pub fn predicate_values(&self) -> impl Iterator<Item = (NamedNode, &MetadataPropertyValue)> {
        self.properties
            .iter()
            .map(|(predicate, value)| (NamedNode::new(predicate.clone()), value))
    }
}
