//! RDF terms and statements.

use std::fmt;

use celldl_core::identifier::Id;

/// An IRI-named RDF node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedNode(String);

impl NamedNode {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// The node's full IRI.
    pub fn value(&self) -> &str {
        &self.0
    }

    /// The identifier of the diagram object named by this node.
    pub fn id(&self) -> Id {
        Id::from_uri(&self.0)
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// An anonymous RDF node, named only within one graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankNode(String);

impl BlankNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

/// A literal value, optionally typed or language-tagged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    value: String,
    datatype: Option<String>,
    language: Option<String>,
}

impl Literal {
    /// Creates a plain string literal.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: &NamedNode) -> Self {
        Self {
            value: value.into(),
            datatype: Some(datatype.value().to_string()),
            language: None,
        }
    }

    pub fn with_language(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

/// Any RDF term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Named(NamedNode),
    Blank(BlankNode),
    Literal(Literal),
}

impl Term {
    /// The term's lexical value: IRI, blank node label or literal text.
    pub fn value(&self) -> &str {
        match self {
            Term::Named(node) => node.value(),
            Term::Blank(node) => node.value(),
            Term::Literal(literal) => literal.value(),
        }
    }

    pub fn as_named(&self) -> Option<&NamedNode> {
        match self {
            Term::Named(node) => Some(node),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }
}

impl From<NamedNode> for Term {
    fn from(node: NamedNode) -> Self {
        Term::Named(node)
    }
}

impl From<BlankNode> for Term {
    fn from(node: BlankNode) -> Self {
        Term::Blank(node)
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}

/// A single RDF triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    subject: Term,
    predicate: NamedNode,
    object: Term,
}

impl Statement {
    pub fn new(subject: impl Into<Term>, predicate: NamedNode, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }

    pub fn subject(&self) -> &Term {
        &self.subject
    }

    pub fn predicate(&self) -> &NamedNode {
        &self.predicate
    }

    pub fn object(&self) -> &Term {
        &self.object
    }

    /// Whether the statement matches a pattern; `None` matches anything.
    pub fn matches(
        &self,
        subject: Option<&Term>,
        predicate: Option<&NamedNode>,
        object: Option<&Term>,
    ) -> bool {
        subject.is_none_or(|s| *s == self.subject)
            && predicate.is_none_or(|p| *p == self.predicate)
            && object.is_none_or(|o| *o == self.object)
    }
}
