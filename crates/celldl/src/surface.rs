//! The rendered diagram, seen through a minimal DOM-like interface.
//!
//! The viewer never measures or edits a rendering toolkit directly. Instead it
//! works against [`RenderSurface`], which exposes just enough of an SVG tree
//! to look shapes up by id, walk their ancestors, read their bounding boxes
//! and transforms, and write back a `transform` attribute and CSS classes.
//!
//! [`MemorySurface`] is an in-memory implementation, built from SVG text or
//! programmatically, that computes bounding boxes from shape geometry.

mod memory;

pub use memory::MemorySurface;

use std::fmt;

use thiserror::Error;

use celldl_core::geometry::{Bounds, TransformError};

/// Handle to a shape on a [`RenderSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(usize);

impl ShapeId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shape#{}", self.0)
    }
}

/// Errors raised by a [`RenderSurface`].
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("invalid SVG markup: {0}")]
    Markup(String),

    #[error("unknown shape {0}")]
    UnknownShape(ShapeId),

    #[error("invalid transform on {shape}: {source}")]
    Transform {
        shape: ShapeId,
        #[source]
        source: TransformError,
    },
}

/// A tree of rendered SVG shapes.
///
/// Shape geometry is read-only input to the viewer, except for the
/// `transform` attribute and class list, and for the selection marks the
/// viewer inserts into groups.
pub trait RenderSurface {
    /// The diagram's root `<svg>` element.
    fn root(&self) -> ShapeId;

    /// Finds an attached shape by its `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<ShapeId>;

    fn parent(&self, shape: ShapeId) -> Option<ShapeId>;

    /// Child elements of a shape, in document order.
    fn children(&self, shape: ShapeId) -> Vec<ShapeId>;

    fn tag_name(&self, shape: ShapeId) -> Option<String>;

    fn attribute(&self, shape: ShapeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, shape: ShapeId, name: &str, value: &str);

    fn remove_attribute(&mut self, shape: ShapeId, name: &str);

    /// The shape's bounding box in its own coordinate system, excluding its
    /// own transform, or `None` if it has no measurable geometry.
    ///
    /// Fails if a descendant's transform, which carries its box into this
    /// shape's coordinates, can't be parsed.
    fn bounding_box(&self, shape: ShapeId) -> Result<Option<Bounds>, SurfaceError>;

    /// Parses `markup` and appends the resulting element to `parent`.
    ///
    /// Returns the new element.
    fn insert_markup(&mut self, parent: ShapeId, markup: &str) -> Result<ShapeId, SurfaceError>;

    /// Detaches a shape, and its descendants, from the tree.
    fn remove_shape(&mut self, shape: ShapeId);

    /// Lets the host apply pending changes before geometry is measured.
    ///
    /// Called once per diagram load, between attaching the diagram and
    /// binding its objects.
    fn render_tick(&mut self) {}

    /// The shape's transform as computed style text, `none` if untransformed.
    fn computed_transform(&self, shape: ShapeId) -> String {
        self.attribute(shape, "transform")
            .filter(|transform| !transform.trim().is_empty())
            .unwrap_or_else(|| "none".to_string())
    }

    /// Writes the shape's positioning transform, removing the attribute for `None`.
    fn set_transform_attribute(&mut self, shape: ShapeId, transform: Option<&str>) {
        match transform {
            Some(transform) => self.set_attribute(shape, "transform", transform),
            None => self.remove_attribute(shape, "transform"),
        }
    }

    fn has_class(&self, shape: ShapeId, class: &str) -> bool {
        self.attribute(shape, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    fn add_class(&mut self, shape: ShapeId, class: &str) {
        if self.has_class(shape, class) {
            return;
        }
        let classes = match self.attribute(shape, "class") {
            Some(classes) if !classes.trim().is_empty() => format!("{} {class}", classes.trim()),
            _ => class.to_string(),
        };
        self.set_attribute(shape, "class", &classes);
    }

    fn remove_class(&mut self, shape: ShapeId, class: &str) {
        if let Some(classes) = self.attribute(shape, "class") {
            let remaining: Vec<&str> = classes.split_whitespace().filter(|c| *c != class).collect();
            self.set_attribute(shape, "class", &remaining.join(" "));
        }
    }

    /// Whether `shape` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: ShapeId, shape: ShapeId) -> bool {
        let mut current = Some(shape);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }
}
