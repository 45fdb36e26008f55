//! Semantic diagram objects.
//!
//! Every object loaded from a diagram's metadata has an [`ObjectKind`], and
//! the kind alone decides what the object can do: whether connections may
//! attach to it, whether it snaps to the alignment grid, and whether it gets
//! a movable [`BoundedElement`] once its rendered shape is bound.

use std::fmt;

use log::trace;

use celldl_core::{
    geometry::{IdGenerator, Point},
    identifier::Id,
};

use crate::{
    config::StyleConfig,
    element::{BoundedElement, GraphicElement},
    error::CellDLError,
    metadata::{MetadataProperties, NamedNode, namespaces},
    surface::{RenderSurface, ShapeId},
};

/// The CSS class that tags each kind of rendered CellDL shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellDLClass {
    Annotation,
    Component,
    Connector,
    Connection,
    Conduit,
    Compartment,
    Interface,
    Layer,
    UnconnectedPort,
}

impl CellDLClass {
    pub fn class_name(self) -> &'static str {
        match self {
            CellDLClass::Annotation => "celldl-Annotation",
            CellDLClass::Component => "celldl-Component",
            CellDLClass::Connector => "celldl-Connector",
            CellDLClass::Connection => "celldl-Connection",
            CellDLClass::Conduit => "celldl-Conduit",
            CellDLClass::Compartment => "celldl-Compartment",
            CellDLClass::Interface => "celldl-InterfacePort",
            CellDLClass::Layer => "celldl-Layer",
            CellDLClass::UnconnectedPort => "celldl-Unconnected",
        }
    }
}

impl fmt::Display for CellDLClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// What an object kind is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub connectable: bool,
    pub alignable: bool,
    pub moveable: bool,
}

/// The kinds of object a diagram is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Annotation,
    Component,
    Conduit,
    Compartment,
    Connection,
    Interface,
    UnconnectedPort,
}

impl ObjectKind {
    pub fn class(self) -> CellDLClass {
        match self {
            ObjectKind::Annotation => CellDLClass::Annotation,
            ObjectKind::Component => CellDLClass::Component,
            ObjectKind::Conduit => CellDLClass::Conduit,
            ObjectKind::Compartment => CellDLClass::Compartment,
            ObjectKind::Connection => CellDLClass::Connection,
            ObjectKind::Interface => CellDLClass::Interface,
            ObjectKind::UnconnectedPort => CellDLClass::UnconnectedPort,
        }
    }

    /// Local name of the kind's own type in the CellDL vocabulary.
    pub fn type_name(self) -> &'static str {
        match self {
            ObjectKind::Annotation => "Annotation",
            ObjectKind::Component => "Component",
            ObjectKind::Conduit => "Conduit",
            ObjectKind::Compartment => "Compartment",
            ObjectKind::Connection => "Connection",
            ObjectKind::Interface => "Interface",
            ObjectKind::UnconnectedPort => "UnconnectedPort",
        }
    }

    pub fn rdf_type(self) -> NamedNode {
        namespaces::celldl().uri(self.type_name())
    }

    /// The RDF type whose subjects are loaded as this kind.
    ///
    /// Interfaces are declared as plain `celldl:Connector`s.
    pub fn load_type(self) -> NamedNode {
        match self {
            ObjectKind::Interface => namespaces::celldl().uri("Connector"),
            kind => kind.rdf_type(),
        }
    }

    pub fn capabilities(self) -> Capabilities {
        match self {
            ObjectKind::Annotation => Capabilities {
                connectable: false,
                alignable: true,
                moveable: true,
            },
            ObjectKind::Component | ObjectKind::Conduit | ObjectKind::UnconnectedPort => {
                Capabilities {
                    connectable: true,
                    alignable: true,
                    moveable: true,
                }
            }
            ObjectKind::Compartment | ObjectKind::Interface => Capabilities {
                connectable: true,
                alignable: false,
                moveable: true,
            },
            ObjectKind::Connection => Capabilities {
                connectable: false,
                alignable: false,
                moveable: false,
            },
        }
    }

    pub fn is_connectable(self) -> bool {
        self.capabilities().connectable
    }

    pub fn is_alignable(self) -> bool {
        self.capabilities().alignable
    }

    pub fn is_moveable(self) -> bool {
        self.capabilities().moveable
    }

    /// Conduits are a kind of component.
    pub fn is_component(self) -> bool {
        matches!(self, ObjectKind::Component | ObjectKind::Conduit)
    }

    pub fn is_conduit(self) -> bool {
        self == ObjectKind::Conduit
    }

    pub fn is_connection(self) -> bool {
        self == ObjectKind::Connection
    }
}

/// A semantic diagram object.
///
/// An object owns at most one rendered element. Connectors also record the
/// connections attached to them, and connections record their two ends.
#[derive(Debug)]
pub struct CellDLObject {
    id: Id,
    uri: NamedNode,
    kind: ObjectKind,
    metadata: MetadataProperties,
    element: Option<BoundedElement>,
    connections: Vec<Id>,
    source: Option<Id>,
    target: Option<Id>,
}

impl CellDLObject {
    pub fn new(uri: NamedNode, kind: ObjectKind, metadata: MetadataProperties) -> Self {
        Self {
            id: uri.id(),
            uri,
            kind,
            metadata,
            element: None,
            connections: Vec::new(),
            source: None,
            target: None,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn uri(&self) -> &NamedNode {
        &self.uri
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn metadata(&self) -> &MetadataProperties {
        &self.metadata
    }

    /// Whether the object's own RDF type is `rdf_type`.
    pub fn is_a(&self, rdf_type: &NamedNode) -> bool {
        *rdf_type == self.kind.rdf_type()
    }

    /// The object's `rdfs:label`, if it has one.
    pub fn label(&self) -> Option<&str> {
        self.metadata
            .get_property(&namespaces::rdfs().uri("label"))
            .and_then(|value| value.as_literal())
            .map(|literal| literal.value())
    }

    pub fn is_connectable(&self) -> bool {
        self.kind.is_connectable()
    }

    pub fn is_alignable(&self) -> bool {
        self.kind.is_alignable()
    }

    pub fn is_moveable(&self) -> bool {
        self.kind.is_moveable()
    }

    pub fn is_component(&self) -> bool {
        self.kind.is_component()
    }

    pub fn is_conduit(&self) -> bool {
        self.kind.is_conduit()
    }

    pub fn is_connection(&self) -> bool {
        self.kind.is_connection()
    }

    /// The object's element, for moveable objects bound to a shape.
    pub fn bounded(&self) -> Option<&BoundedElement> {
        self.element.as_ref()
    }

    pub fn bounded_mut(&mut self) -> Option<&mut BoundedElement> {
        self.element.as_mut()
    }

    pub fn graphic(&self) -> Option<&GraphicElement> {
        self.element.as_ref().map(BoundedElement::element)
    }

    /// The shape the object is bound to.
    pub fn shape(&self) -> Option<ShapeId> {
        self.graphic().map(GraphicElement::shape)
    }

    /// Binds the object to its rendered shape.
    ///
    /// Moveable objects get a [`BoundedElement`]; other objects stay unbound.
    ///
    /// # Errors
    ///
    /// Fails if the shape's transforms can't be parsed or it has no bounding box.
    pub fn assign_svg_element(
        &mut self,
        surface: &mut dyn RenderSurface,
        ids: &mut IdGenerator,
        style: &StyleConfig,
        shape: ShapeId,
    ) -> Result<(), CellDLError> {
        if !self.is_moveable() {
            trace!(id = self.id.to_string(); "Object has no interactive geometry");
            return Ok(());
        }
        let bounded = BoundedElement::new(surface, ids, style, self.id, self.kind, shape)?;
        self.element = Some(bounded);
        Ok(())
    }

    pub fn connections(&self) -> &[Id] {
        &self.connections
    }

    pub(crate) fn add_connection(&mut self, connection: Id) {
        if !self.connections.contains(&connection) {
            self.connections.push(connection);
        }
    }

    /// The connector a connection starts from.
    pub fn source(&self) -> Option<Id> {
        self.source
    }

    /// The connector a connection ends at.
    pub fn target(&self) -> Option<Id> {
        self.target
    }

    pub(crate) fn set_ends(&mut self, source: Option<Id>, target: Option<Id>) {
        self.source = source;
        self.target = target;
    }

    pub fn selected(&self) -> bool {
        self.graphic().is_some_and(GraphicElement::selected)
    }

    pub fn activate(&mut self, surface: &mut dyn RenderSurface, active: bool) {
        if let Some(element) = self.element.as_mut() {
            element.element_mut().activate(surface, active);
        }
    }

    pub fn highlight(&mut self, surface: &mut dyn RenderSurface, highlight: bool) {
        if let Some(element) = self.element.as_mut() {
            element.element_mut().highlight(surface, highlight);
        }
    }

    pub fn select(&mut self, surface: &mut dyn RenderSurface, selected: bool) {
        if let Some(element) = self.element.as_mut() {
            element.element_mut().select(surface, selected);
        }
    }

    pub fn contains_point(&self, point: Point) -> bool {
        self.graphic()
            .is_some_and(|element| element.contains_point(point, 0.0))
    }

    /// Redraws the object's shape at its current position.
    ///
    /// # Errors
    ///
    /// Fails if the shape's global transform can't be inverted.
    pub fn redraw(&mut self, surface: &mut dyn RenderSurface) -> Result<(), CellDLError> {
        match self.bounded_mut() {
            Some(bounded) => bounded.redraw(surface),
            None => Ok(()),
        }
    }
}

impl fmt::Display for CellDLObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.class(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Literal;

    fn object(kind: ObjectKind) -> CellDLObject {
        CellDLObject::new(
            NamedNode::new("file:///tmp/test.celldl#ID-1"),
            kind,
            MetadataProperties::new(),
        )
    }

    #[test]
    fn test_capability_table() {
        use ObjectKind::*;

        for kind in [Component, Conduit, Compartment, Interface, UnconnectedPort] {
            assert!(kind.is_connectable(), "{kind:?}");
        }
        for kind in [Annotation, Connection] {
            assert!(!kind.is_connectable(), "{kind:?}");
        }
        for kind in [Compartment, Connection, Interface] {
            assert!(!kind.is_alignable(), "{kind:?}");
        }
        for kind in [Annotation, Component, Conduit, UnconnectedPort] {
            assert!(kind.is_alignable(), "{kind:?}");
        }
        assert!(!Connection.is_moveable());
        assert!(Annotation.is_moveable());
    }

    #[test]
    fn test_conduit_is_a_component() {
        assert!(ObjectKind::Conduit.is_component());
        assert!(ObjectKind::Component.is_component());
        assert!(!ObjectKind::Compartment.is_component());
        assert!(ObjectKind::Conduit.is_conduit());
    }

    #[test]
    fn test_rdf_and_load_types() {
        assert_eq!(
            ObjectKind::Conduit.rdf_type().value(),
            "http://celldl.org/ontologies/celldl#Conduit"
        );
        assert_eq!(
            ObjectKind::Interface.load_type().value(),
            "http://celldl.org/ontologies/celldl#Connector"
        );
        assert_eq!(ObjectKind::Component.load_type(), ObjectKind::Component.rdf_type());
    }

    #[test]
    fn test_class_names() {
        assert_eq!(ObjectKind::Interface.class().class_name(), "celldl-InterfacePort");
        assert_eq!(ObjectKind::UnconnectedPort.class().to_string(), "celldl-Unconnected");
        assert_eq!(CellDLClass::Layer.class_name(), "celldl-Layer");
    }

    #[test]
    fn test_object_identity_and_label() {
        let mut metadata = MetadataProperties::new();
        metadata.set_property(
            &namespaces::rdfs().uri("label"),
            Literal::new("Pump").into(),
            true,
        );
        let object = CellDLObject::new(
            NamedNode::new("file:///tmp/test.celldl#ID-7"),
            ObjectKind::Component,
            metadata,
        );
        assert_eq!(object.id(), "ID-7");
        assert_eq!(object.label(), Some("Pump"));
        assert!(object.is_a(&namespaces::celldl().uri("Component")));
        assert!(!object.is_a(&namespaces::celldl().uri("Conduit")));
        assert_eq!(object.to_string(), "celldl-Component ID-7");
    }

    #[test]
    fn test_unbound_object_state_is_inert() {
        let mut surface = crate::surface::MemorySurface::new();
        let mut connection = object(ObjectKind::Connection);
        connection.select(&mut surface, true);
        assert!(!connection.selected());
        assert!(connection.redraw(&mut surface).is_ok());
        assert!(connection.shape().is_none());
    }

    #[test]
    fn test_connections_are_unique() {
        let mut component = object(ObjectKind::Component);
        component.add_connection(Id::new("c1"));
        component.add_connection(Id::new("c1"));
        component.add_connection(Id::new("c2"));
        assert_eq!(component.connections().len(), 2);
    }
}
