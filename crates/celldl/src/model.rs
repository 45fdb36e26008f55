//! A loaded CellDL diagram.
//!
//! [`CellDLModel`] pairs a diagram's RDF metadata with its rendered SVG. It
//! checks that the metadata describes a CellDL document, then, once the
//! diagram has been rendered, loads each object the metadata declares and
//! binds it to the shape with the same id.
//!
//! Objects are loaded in a fixed order so that connections can resolve the
//! connectors they join:
//!
//! 1. components, unconnected ports and compartments
//! 2. interfaces
//! 3. conduits
//! 4. connections
//! 5. annotations

use std::fmt;

use indexmap::IndexMap;
use log::{debug, info, trace, warn};

use celldl_core::{
    geometry::{IdGenerator, Point},
    identifier::Id,
    units::length_to_pixels,
};

use crate::{
    config::StyleConfig,
    element::{ConnectionEnd, PathEnd},
    error::CellDLError,
    metadata::{
        Literal, MetadataPropertyValue, MetadataStore, NamedNode, Namespace, Term,
        namespaces::{celldl, dct, owl, rdf},
    },
    objects::{CellDLObject, ObjectKind},
    surface::{RenderSurface, ShapeId},
    viewer::{Annotations, EventComponent, ViewerEvent, ViewerEventKind},
};

/// Groups of object kinds, loaded one group after another.
const LOAD_ORDER: [&[ObjectKind]; 5] = [
    &[
        ObjectKind::Component,
        ObjectKind::UnconnectedPort,
        ObjectKind::Compartment,
    ],
    &[ObjectKind::Interface],
    &[ObjectKind::Conduit],
    &[ObjectKind::Connection],
    &[ObjectKind::Annotation],
];

/// Diagram properties and the predicates that hold them.
fn diagram_metadata() -> [(&'static str, NamedNode); 6] {
    [
        ("author", dct().uri("creator")),
        ("created", dct().uri("created")),
        ("description", dct().uri("description")),
        ("modified", dct().uri("modified")),
        ("title", dct().uri("title")),
        ("celldlVersion", owl().uri("versionInfo")),
    ]
}

/// Turns a file path into a document URI.
///
/// Paths that are already `file:`, `http:` or `https:` URIs are kept as they are.
pub fn document_uri(path: &str) -> String {
    if ["file:", "http:", "https:"]
        .iter()
        .any(|scheme| path.starts_with(scheme))
    {
        path.to_string()
    } else {
        format!("file://{path}")
    }
}

/// A CellDL diagram: its metadata, its rendering and its objects.
///
/// # Examples
///
/// ```
/// # use celldl::metadata::{MemoryStore, MetadataStore, NamedNode, Statement, namespaces};
/// # use celldl::model::CellDLModel;
/// # use celldl::surface::MemorySurface;
/// let document = NamedNode::new("file:///tmp/example.celldl");
/// let mut store = MemoryStore::new();
/// store.add(Statement::new(
///     document,
///     namespaces::rdf().uri("type"),
///     namespaces::celldl().uri("Document"),
/// ));
///
/// let mut model = CellDLModel::new("/tmp/example.celldl", store, MemorySurface::new()).unwrap();
/// model.finish_setup().unwrap();
/// assert_eq!(model.uri(), "file:///tmp/example.celldl");
/// assert_eq!(model.objects().count(), 0);
/// ```
pub struct CellDLModel {
    document: NamedNode,
    namespace: Namespace,
    store: Box<dyn MetadataStore>,
    surface: Box<dyn RenderSurface>,
    style: StyleConfig,
    ids: IdGenerator,
    diagram_properties: IndexMap<String, String>,
    annotations: Annotations,
    objects: IndexMap<Id, CellDLObject>,
    events: Vec<ViewerEvent>,
    set_up: bool,
}

impl fmt::Debug for CellDLModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellDLModel")
            .field("document", &self.document)
            .field("diagram_properties", &self.diagram_properties)
            .field("objects", &self.objects.len())
            .field("set_up", &self.set_up)
            .finish()
    }
}

impl CellDLModel {
    /// Opens a diagram whose metadata is in `store` and whose SVG is on `surface`.
    ///
    /// The root element's `width` and `height` are replaced by a `viewBox`
    /// so the diagram scales with its container.
    ///
    /// # Errors
    ///
    /// Returns [`CellDLError::InvalidDocument`] if the metadata doesn't
    /// declare the document to be a `celldl:Document`.
    pub fn new(
        path: &str,
        store: impl MetadataStore + 'static,
        surface: impl RenderSurface + 'static,
    ) -> Result<Self, CellDLError> {
        let uri = document_uri(path);
        let document = NamedNode::new(uri.as_str());
        let document_term = Term::from(document.clone());
        if !store.contains(
            Some(&document_term),
            Some(&rdf().uri("type")),
            Some(&celldl().uri("Document").into()),
        ) {
            return Err(CellDLError::InvalidDocument(uri));
        }

        let mut model = Self {
            namespace: Namespace::new(format!("{uri}#")),
            document,
            store: Box::new(store),
            surface: Box::new(surface),
            style: StyleConfig::default(),
            ids: IdGenerator::new(),
            diagram_properties: IndexMap::new(),
            annotations: Annotations::new(),
            objects: IndexMap::new(),
            events: Vec::new(),
            set_up: false,
        };
        model.normalise_view_box();
        model.load_diagram_properties();
        info!(uri = model.uri(); "Opened CellDL document");
        Ok(model)
    }

    /// Sets the style used to measure objects.
    pub fn with_style(mut self, style: StyleConfig) -> Self {
        self.style = style;
        self
    }

    pub(crate) fn set_style(&mut self, style: StyleConfig) {
        self.style = style;
    }

    /// Attaches host annotations, keyed by object id, to viewer events.
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn uri(&self) -> &str {
        self.document.value()
    }

    pub fn document(&self) -> &NamedNode {
        &self.document
    }

    /// Mints a URI for `id` within the document.
    pub fn make_uri(&self, id: &str) -> NamedNode {
        self.namespace.uri(id)
    }

    pub fn store(&self) -> &dyn MetadataStore {
        self.store.as_ref()
    }

    pub fn surface(&self) -> &dyn RenderSurface {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> &mut dyn RenderSurface {
        self.surface.as_mut()
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Whether the diagram's objects have been loaded.
    pub fn is_set_up(&self) -> bool {
        self.set_up
    }

    /// The document's known properties, such as `title` and `author`.
    pub fn metadata(&self) -> &IndexMap<String, String> {
        &self.diagram_properties
    }

    /// Updates document properties.
    ///
    /// Keys other than `author`, `created`, `description`, `modified`,
    /// `title` and `celldlVersion` are ignored. Accepted values are written
    /// to the metadata store, and a [`ViewerEvent::FileEdited`] is queued.
    pub fn set_metadata<K, V>(&mut self, data: impl IntoIterator<Item = (K, V)>)
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let known = diagram_metadata();
        let document = Term::from(self.document.clone());
        for (key, value) in data {
            let Some((key, predicate)) = known.iter().find(|(k, _)| *k == key.as_ref()) else {
                trace!(key = key.as_ref(); "Ignoring unknown diagram property");
                continue;
            };
            let value = value.into();
            self.store
                .set_statement(&document, predicate, Literal::new(value.as_str()).into());
            self.diagram_properties.insert((*key).to_string(), value);
        }
        self.events.push(ViewerEvent::FileEdited);
    }

    pub fn object_by_id(&self, id: Id) -> Option<&CellDLObject> {
        self.objects.get(&id)
    }

    pub fn object_by_id_mut(&mut self, id: Id) -> Option<&mut CellDLObject> {
        self.objects.get_mut(&id)
    }

    /// The loaded objects, in load order.
    pub fn objects(&self) -> impl Iterator<Item = &CellDLObject> {
        self.objects.values()
    }

    /// The connectable object named by a metadata value.
    ///
    /// Returns `None` unless the value is a URI within this document that
    /// names a loaded, connectable object.
    pub fn get_connector(&self, value: Option<&MetadataPropertyValue>) -> Option<&CellDLObject> {
        let node = value?.as_named()?;
        if !node.value().starts_with(self.uri()) {
            return None;
        }
        self.objects
            .get(&node.id())
            .filter(|object| object.is_connectable())
    }

    /// Loads every object in the diagram and binds it to its shape.
    ///
    /// Called once the diagram has been rendered. An object whose shape
    /// can't be found is skipped with a warning.
    ///
    /// # Errors
    ///
    /// Fails if a bound shape has a malformed transform or no bounding box.
    pub fn finish_setup(&mut self) -> Result<(), CellDLError> {
        if self.set_up {
            debug!(uri = self.uri(); "Diagram is already set up");
            return Ok(());
        }
        for group in LOAD_ORDER {
            for kind in group {
                self.load_objects(*kind)?;
            }
        }
        self.set_up = true;
        info!(uri = self.uri(), objects = self.objects.len(); "Loaded diagram objects");
        Ok(())
    }

    /// Re-derives an object's geometry after its shape's content changed.
    ///
    /// Returns the movement of the object's bottom-right and top-left corner
    /// offsets, or `None` if the object isn't bound to a shape. The paths of
    /// the object's connections follow its new bounds.
    pub fn update_svg_element(&mut self, id: Id) -> Result<Option<[Point; 2]>, CellDLError> {
        let Some(bounded) = self.objects.get_mut(&id).and_then(CellDLObject::bounded_mut) else {
            return Ok(None);
        };
        let deltas = bounded.update_svg_element(self.surface.as_mut(), &mut self.ids)?;
        Ok(Some(deltas))
    }

    /// Queues a viewer event about `object`, with its annotation if it has one.
    pub fn viewer_event(&mut self, kind: ViewerEventKind, object: Option<Id>) {
        let component = object.map(|id| EventComponent {
            id,
            annotation: self.annotations.get(&id.to_string()).cloned(),
        });
        self.events.push(ViewerEvent::Viewer { kind, component });
    }

    /// Takes the events queued since the last call.
    pub fn take_events(&mut self) -> Vec<ViewerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Borrows an object together with the surface it is drawn on.
    pub fn object_and_surface_mut(
        &mut self,
        id: Id,
    ) -> Option<(&mut CellDLObject, &mut dyn RenderSurface)> {
        let object = self.objects.get_mut(&id)?;
        Some((object, self.surface.as_mut()))
    }

    fn normalise_view_box(&mut self) {
        let root = self.surface.root();
        let width = self.surface.attribute(root, "width");
        let height = self.surface.attribute(root, "height");
        let (Some(width), Some(height)) = (
            width.as_deref().and_then(length_to_pixels),
            height.as_deref().and_then(length_to_pixels),
        ) else {
            return;
        };
        self.surface.remove_attribute(root, "width");
        self.surface.remove_attribute(root, "height");
        if self.surface.attribute(root, "viewBox").is_none() {
            self.surface
                .set_attribute(root, "viewBox", &format!("0 0 {width} {height}"));
        }
    }

    fn load_diagram_properties(&mut self) {
        let document = Term::from(self.document.clone());
        for (key, predicate) in diagram_metadata() {
            if let Some(statement) = self
                .store
                .statements_matching(Some(&document), Some(&predicate), None)
                .first()
            {
                self.diagram_properties
                    .insert(key.to_string(), statement.object().value().to_string());
            }
        }
    }

    fn load_objects(&mut self, kind: ObjectKind) -> Result<(), CellDLError> {
        let load_type = kind.load_type();
        let subjects = self.store.subjects_of_type(&load_type);
        for (subject, rdf_type) in subjects {
            if rdf_type != load_type || !subject.value().starts_with(self.uri()) {
                continue;
            }
            let id = subject.id();
            if self.objects.contains_key(&id) {
                trace!(id = id.to_string(); "Object already loaded");
                continue;
            }
            let metadata = self
                .store
                .metadata_properties_for_subject(&Term::from(subject.clone()));
            let mut object = CellDLObject::new(subject, kind, metadata);

            let Some(shape) = self.surface.element_by_id(&id.to_string()) else {
                let error = CellDLError::Binding(id);
                warn!(id = id.to_string(), kind = kind.type_name(); "{error}");
                continue;
            };
            object.assign_svg_element(self.surface.as_mut(), &mut self.ids, &self.style, shape)?;
            if kind.is_connection() {
                self.connect(&mut object, shape);
            }
            debug!(id = id.to_string(), kind = kind.type_name(); "Loaded object");
            self.objects.insert(id, object);
        }
        Ok(())
    }

    /// Resolves a connection's ends and records it on its connectors.
    ///
    /// Each connector that can be moved gets a [`ConnectionEnd`] so that the
    /// connection's path follows it.
    fn connect(&mut self, connection: &mut CellDLObject, shape: ShapeId) {
        let end = |predicate: &str| {
            self.get_connector(
                connection
                    .metadata()
                    .get_property(&celldl().uri(predicate)),
            )
            .map(CellDLObject::id)
        };
        let (source, target) = (end("hasSource"), end("hasTarget"));
        if source.is_none() || target.is_none() {
            debug!(id = connection.id().to_string(); "Connection has an unresolved end");
        }
        connection.set_ends(source, target);
        for (connector, end) in [(source, PathEnd::Source), (target, PathEnd::Target)] {
            let Some(connector) = connector.and_then(|id| self.objects.get_mut(&id)) else {
                continue;
            };
            connector.add_connection(connection.id());
            if let Some(bounded) = connector.bounded_mut() {
                let path = ConnectionEnd::new(connection.id(), shape, end);
                bounded.add_connected_path(path.key(), Box::new(path));
            }
        }
    }
}
