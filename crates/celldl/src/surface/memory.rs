//! An in-memory SVG tree.

use indexmap::IndexMap;
use log::trace;
use svgtypes::{PathParser, PathSegment, PointsParser};

use celldl_core::{
    geometry::{Bounds, Point, Transform},
    units::length_to_pixels,
};

use super::{RenderSurface, ShapeId, SurfaceError};

/// Elements that never contribute to a bounding box.
const NON_RENDERED: [&str; 9] = [
    "defs",
    "desc",
    "linearGradient",
    "marker",
    "metadata",
    "radialGradient",
    "style",
    "title",
    "script",
];

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attributes: IndexMap<String, String>,
    parent: Option<ShapeId>,
    children: Vec<ShapeId>,
    text: String,
    bounding_box: Option<Bounds>,
}

impl Node {
    fn new(tag: &str, parent: Option<ShapeId>) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: IndexMap::new(),
            parent,
            children: Vec::new(),
            text: String::new(),
            bounding_box: None,
        }
    }

    fn length(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).and_then(|v| length_to_pixels(v))
    }

    fn length_or_zero(&self, name: &str) -> f64 {
        self.length(name).unwrap_or(0.0)
    }
}

/// A [`RenderSurface`] held entirely in memory.
///
/// Bounding boxes are computed from element geometry: rectangles, circles,
/// ellipses, lines, polylines and paths are measured directly, and groups
/// take the union of their children, each carried through the child's own
/// `transform`. Path curves are measured by their control points. A box can
/// be overridden per shape with [`MemorySurface::set_bounding_box`].
///
/// Removing a shape frees the slots of the shape and its descendants, and
/// later insertions reuse them. A removed shape's [`ShapeId`] may therefore
/// come back as a different element and shouldn't be kept.
///
/// # Examples
///
/// ```
/// # use celldl::surface::{MemorySurface, RenderSurface};
/// let surface = MemorySurface::from_svg_str(
///     r#"<svg xmlns="http://www.w3.org/2000/svg">
///          <rect id="c1" x="10" y="20" width="100" height="50"/>
///        </svg>"#,
/// ).unwrap();
/// let shape = surface.element_by_id("c1").unwrap();
/// let bbox = surface.bounding_box(shape).unwrap().unwrap();
/// assert_eq!(bbox.as_array(), [10.0, 20.0, 110.0, 70.0]);
/// ```
#[derive(Debug, Clone)]
pub struct MemorySurface {
    nodes: Vec<Node>,
    free: Vec<ShapeId>,
    root: ShapeId,
    render_ticks: usize,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// Creates a surface holding an empty `<svg>` root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("svg", None)],
            free: Vec::new(),
            root: ShapeId::new(0),
            render_ticks: 0,
        }
    }

    /// Builds a surface from SVG text.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Markup`] if the text is not well-formed XML or
    /// its root element is not `<svg>`.
    pub fn from_svg_str(text: &str) -> Result<Self, SurfaceError> {
        let document =
            roxmltree::Document::parse(text).map_err(|e| SurfaceError::Markup(e.to_string()))?;
        let root = document.root_element();
        if root.tag_name().name() != "svg" {
            return Err(SurfaceError::Markup(format!(
                "expected an <svg> root element, found <{}>",
                root.tag_name().name()
            )));
        }
        let mut surface = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: ShapeId::new(0),
            render_ticks: 0,
        };
        surface.import(root, None);
        Ok(surface)
    }

    /// Appends a new element to `parent`.
    pub fn add_element(&mut self, parent: ShapeId, tag: &str, attributes: &[(&str, &str)]) -> ShapeId {
        let mut node = Node::new(tag, Some(parent));
        for (name, value) in attributes {
            node.attributes.insert((*name).to_string(), (*value).to_string());
        }
        let id = self.allocate(node);
        if let Some(parent) = self.nodes.get_mut(parent.index()) {
            parent.children.push(id);
        }
        id
    }

    /// Overrides the measured bounding box of a shape; `None` restores measurement.
    pub fn set_bounding_box(&mut self, shape: ShapeId, bounds: Option<Bounds>) {
        if let Some(node) = self.nodes.get_mut(shape.index()) {
            node.bounding_box = bounds;
        }
    }

    /// Text content directly inside a shape, such as a `<metadata>` CDATA block.
    pub fn text(&self, shape: ShapeId) -> Option<&str> {
        self.nodes.get(shape.index()).map(|node| node.text.as_str())
    }

    /// Number of times [`RenderSurface::render_tick`] has been called.
    pub fn render_ticks(&self) -> usize {
        self.render_ticks
    }

    fn node(&self, shape: ShapeId) -> Option<&Node> {
        self.nodes.get(shape.index())
    }

    /// Stores a node in a freed slot if there is one.
    fn allocate(&mut self, node: Node) -> ShapeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = node;
                id
            }
            None => {
                self.nodes.push(node);
                ShapeId::new(self.nodes.len() - 1)
            }
        }
    }

    fn import(&mut self, element: roxmltree::Node<'_, '_>, parent: Option<ShapeId>) -> ShapeId {
        let mut node = Node::new(element.tag_name().name(), parent);
        for attribute in element.attributes() {
            node.attributes
                .insert(attribute.name().to_string(), attribute.value().to_string());
        }
        let id = self.allocate(node);
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        for child in element.children() {
            if child.is_element() {
                self.import(child, Some(id));
            } else if child.is_text() {
                self.nodes[id.index()]
                    .text
                    .push_str(child.text().unwrap_or_default());
            }
        }
        id
    }

    fn measure(&self, shape: ShapeId) -> Result<Option<Bounds>, SurfaceError> {
        let Some(node) = self.node(shape) else {
            return Ok(None);
        };
        if let Some(bounds) = node.bounding_box {
            return Ok(Some(bounds));
        }
        let bounds = match node.tag.as_str() {
            "rect" | "image" | "use" | "svg" | "foreignObject" => {
                match (node.length("width"), node.length("height")) {
                    (Some(width), Some(height)) => {
                        let (x, y) = (node.length_or_zero("x"), node.length_or_zero("y"));
                        Some(Bounds::new(x, y, x + width, y + height))
                    }
                    _ => self.union_of_children(node)?,
                }
            }
            "circle" => node.length("r").map(|r| {
                let (cx, cy) = (node.length_or_zero("cx"), node.length_or_zero("cy"));
                Bounds::new(cx - r, cy - r, cx + r, cy + r)
            }),
            "ellipse" => match (node.length("rx"), node.length("ry")) {
                (Some(rx), Some(ry)) => {
                    let (cx, cy) = (node.length_or_zero("cx"), node.length_or_zero("cy"));
                    Some(Bounds::new(cx - rx, cy - ry, cx + rx, cy + ry))
                }
                _ => None,
            },
            "line" => Some(Bounds::new(
                node.length_or_zero("x1"),
                node.length_or_zero("y1"),
                node.length_or_zero("x2"),
                node.length_or_zero("y2"),
            )),
            "polyline" | "polygon" => node.attributes.get("points").and_then(|points| {
                bounds_of(PointsParser::from(points.as_str()).map(|(x, y)| Point::new(x, y)))
            }),
            "path" => node.attributes.get("d").and_then(|data| path_bounds(data)),
            tag if NON_RENDERED.contains(&tag) => None,
            _ => self.union_of_children(node)?,
        };
        Ok(bounds)
    }

    fn union_of_children(&self, node: &Node) -> Result<Option<Bounds>, SurfaceError> {
        let mut union: Option<Bounds> = None;
        for child in &node.children {
            let Some(bounds) = self.measure(*child)? else {
                continue;
            };
            let transform = match self.node(*child).and_then(|c| c.attributes.get("transform")) {
                Some(transform) => transform
                    .parse::<Transform>()
                    .map_err(|source| SurfaceError::Transform {
                        shape: *child,
                        source,
                    })?,
                None => Transform::default(),
            };
            let bounds = bounds.transform(&transform);
            union = Some(union.map_or(bounds, |acc| acc.merge(&bounds)));
        }
        Ok(union)
    }
}

fn bounds_of(points: impl Iterator<Item = Point>) -> Option<Bounds> {
    points
        .map(|p| Bounds::from_points(p, p))
        .reduce(|acc, bounds| acc.merge(&bounds))
}

/// Bounds of a path's end and control points.
fn path_bounds(data: &str) -> Option<Bounds> {
    let mut points = Vec::new();
    let mut current = Point::default();
    let mut start = Point::default();
    for segment in PathParser::from(data).flatten() {
        let origin = current;
        let resolve = |abs: bool, x: f64, y: f64| {
            if abs {
                Point::new(x, y)
            } else {
                origin.add_point(Point::new(x, y))
            }
        };
        match segment {
            PathSegment::MoveTo { abs, x, y } => {
                current = resolve(abs, x, y);
                start = current;
            }
            PathSegment::LineTo { abs, x, y }
            | PathSegment::SmoothQuadratic { abs, x, y }
            | PathSegment::EllipticalArc { abs, x, y, .. } => current = resolve(abs, x, y),
            PathSegment::HorizontalLineTo { abs, x } => {
                current = if abs {
                    current.with_x(x)
                } else {
                    current.add_point(Point::new(x, 0.0))
                };
            }
            PathSegment::VerticalLineTo { abs, y } => {
                current = if abs {
                    current.with_y(y)
                } else {
                    current.add_point(Point::new(0.0, y))
                };
            }
            PathSegment::CurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                points.push(resolve(abs, x1, y1));
                points.push(resolve(abs, x2, y2));
                current = resolve(abs, x, y);
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                points.push(resolve(abs, x2, y2));
                current = resolve(abs, x, y);
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                points.push(resolve(abs, x1, y1));
                current = resolve(abs, x, y);
            }
            PathSegment::ClosePath { .. } => current = start,
        }
        points.push(current);
    }
    bounds_of(points.into_iter())
}

impl RenderSurface for MemorySurface {
    fn root(&self) -> ShapeId {
        self.root
    }

    fn element_by_id(&self, id: &str) -> Option<ShapeId> {
        (0..self.nodes.len()).map(ShapeId::new).find(|shape| {
            self.nodes[shape.index()]
                .attributes
                .get("id")
                .is_some_and(|value| value == id)
                && self.contains(self.root, *shape)
        })
    }

    fn parent(&self, shape: ShapeId) -> Option<ShapeId> {
        self.node(shape)?.parent
    }

    fn children(&self, shape: ShapeId) -> Vec<ShapeId> {
        self.node(shape)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn tag_name(&self, shape: ShapeId) -> Option<String> {
        self.node(shape).map(|node| node.tag.clone())
    }

    fn attribute(&self, shape: ShapeId, name: &str) -> Option<String> {
        self.node(shape)?.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, shape: ShapeId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(shape.index()) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, shape: ShapeId, name: &str) {
        if let Some(node) = self.nodes.get_mut(shape.index()) {
            node.attributes.shift_remove(name);
        }
    }

    fn bounding_box(&self, shape: ShapeId) -> Result<Option<Bounds>, SurfaceError> {
        self.measure(shape)
    }

    fn insert_markup(&mut self, parent: ShapeId, markup: &str) -> Result<ShapeId, SurfaceError> {
        if self.node(parent).is_none() {
            return Err(SurfaceError::UnknownShape(parent));
        }
        let document =
            roxmltree::Document::parse(markup).map_err(|e| SurfaceError::Markup(e.to_string()))?;
        let shape = self.import(document.root_element(), Some(parent));
        trace!(parent = parent.index(), shape = shape.index(); "Inserted markup");
        Ok(shape)
    }

    fn remove_shape(&mut self, shape: ShapeId) {
        let Some(parent) = self.parent(shape) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(parent.index()) {
            node.children.retain(|child| *child != shape);
        }
        let mut pending = vec![shape];
        while let Some(removed) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(removed.index()) {
                node.parent = None;
                pending.extend(node.children.drain(..));
            }
            self.free.push(removed);
        }
        trace!(shape = shape.index(), free = self.free.len(); "Removed shape");
    }

    fn render_tick(&mut self) {
        self.render_ticks += 1;
    }
}
