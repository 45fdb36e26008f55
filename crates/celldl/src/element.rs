//! Rendered elements of diagram objects.
//!
//! A [`GraphicElement`] binds an object to its rendered shape. It measures
//! the shape in diagram coordinates, through every transform between the
//! shape and the diagram root, and keeps the corner offsets that connection
//! routing attaches to. It also owns the shape's selection state.
//!
//! A [`BoundedElement`] adds a [`ControlRect`](celldl_core::geometry::ControlRect)
//! so the shape can be moved and resized, writing its new position back as a
//! `transform` attribute. A [`ConnectionEnd`] registered on a bounded element
//! keeps a connection's path attached to it.

mod bounded;
mod connection;

pub use bounded::{Axis, BoundedElement, ConnectedPath};
pub use connection::{ConnectionEnd, PathEnd};

use indexmap::IndexSet;
use log::{debug, trace};
use svg::node::element::Circle;

use celldl_core::{
    geometry::{Bounds, ControlRect, IdGenerator, Point, Size, Transform},
    identifier::Id,
};

use crate::{
    config::StyleConfig,
    error::CellDLError,
    objects::{CellDLClass, ObjectKind},
    surface::{RenderSurface, ShapeId},
};

const SELECTION_CLASSES: [&str; 3] = ["selection-element", "parent-id", "editor-specific"];

/// An edge of an element's boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Left,
    Right,
    Top,
    Bottom,
}

/// Composes the transforms from `shape` up to, but excluding, the surface root.
///
/// Returns `None` when the composition is the identity.
pub(crate) fn global_transform(
    surface: &dyn RenderSurface,
    object_id: Id,
    shape: ShapeId,
) -> Result<Option<Transform>, CellDLError> {
    let root = surface.root();
    let mut transform = Transform::identity();
    let mut current = Some(shape);
    while let Some(node) = current {
        if node == root {
            break;
        }
        let text = surface.computed_transform(node);
        if text != "none" {
            let local: Transform = text
                .parse()
                .map_err(|e| CellDLError::new_transform_error(object_id.to_string(), e))?;
            transform = local.left_multiply(&transform);
        }
        current = surface.parent(node);
    }
    Ok((!transform.is_identity()).then_some(transform))
}

/// The rendered shape of a diagram object and its geometry.
///
/// Corner offsets are relative to the centroid and ordered anticlockwise
/// from the bottom right: bottom-right, top-right, top-left, bottom-left.
/// They sit a small gap outside the shape's bounds so that connections end
/// clear of the selection outline.
#[derive(Debug, Clone)]
pub struct GraphicElement {
    object_id: Id,
    kind: ObjectKind,
    shape: ShapeId,
    selection_element: ShapeId,
    selection_marks: Vec<ShapeId>,
    selection_classes: IndexSet<&'static str>,
    selected: bool,
    global_transform: Option<Transform>,
    bounds: Bounds,
    centroid: Option<Point>,
    centroid_offset: Point,
    corner_offsets: [Point; 4],
    size: Size,
    top_left: Point,
    style: StyleConfig,
}

impl GraphicElement {
    /// Binds an object to its shape and measures it.
    ///
    /// # Errors
    ///
    /// Returns [`CellDLError::Transform`] if a transform on the shape or one
    /// of its ancestors can't be parsed, and [`CellDLError::MissingGeometry`]
    /// if the shape has no bounding box.
    pub fn new(
        surface: &mut dyn RenderSurface,
        ids: &mut IdGenerator,
        style: &StyleConfig,
        object_id: Id,
        kind: ObjectKind,
        shape: ShapeId,
    ) -> Result<Self, CellDLError> {
        let global_transform = global_transform(surface, object_id, shape)?;
        let mut element = Self {
            object_id,
            kind,
            shape,
            selection_element: shape,
            selection_marks: Vec::new(),
            selection_classes: IndexSet::new(),
            selected: false,
            global_transform,
            bounds: Bounds::default(),
            centroid: None,
            centroid_offset: Point::new(0.5, 0.5),
            corner_offsets: [Point::default(); 4],
            size: Size::default(),
            top_left: Point::default(),
            style: style.clone(),
        };
        element.update_svg_element(surface, ids)?;
        debug!(id = object_id.to_string(), shape = shape.index(); "Bound graphic element");
        Ok(element)
    }

    pub fn object_id(&self) -> Id {
        self.object_id
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    /// The shape that carries the selection classes.
    pub fn selection_element(&self) -> ShapeId {
        self.selection_element
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn centroid(&self) -> Point {
        self.centroid.unwrap_or_default()
    }

    pub fn set_centroid(&mut self, centroid: Point) {
        self.centroid = Some(centroid);
    }

    pub fn centroid_offset(&self) -> Point {
        self.centroid_offset
    }

    /// The bottom-right and top-left corner offsets.
    pub fn corners(&self) -> [Point; 2] {
        [self.corner_offsets[0], self.corner_offsets[2]]
    }

    pub fn corner_offsets(&self) -> [Point; 4] {
        self.corner_offsets
    }

    pub fn global_transform(&self) -> Option<&Transform> {
        self.global_transform.as_ref()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> f64 {
        self.size.width()
    }

    pub fn height(&self) -> f64 {
        self.size.height()
    }

    pub fn top_left(&self) -> Point {
        self.top_left
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    /// Whether the element currently has a selection class such as `active`.
    pub fn has_selection_class(&self, class: &str) -> bool {
        self.selection_classes.contains(class)
    }

    /// The shape's bounding box in diagram coordinates.
    pub fn svg_bounds(&self, surface: &dyn RenderSurface) -> Result<Bounds, CellDLError> {
        let bounds = surface
            .bounding_box(self.shape)?
            .ok_or(CellDLError::MissingGeometry(self.object_id))?;
        Ok(match &self.global_transform {
            Some(transform) => bounds.transform(transform),
            None => bounds,
        })
    }

    /// Applies `transform` after the current global transform.
    pub fn update_global_transform(&mut self, transform: &Transform) -> Option<&Transform> {
        let updated = match &self.global_transform {
            Some(global) => transform.left_multiply(global),
            None => *transform,
        };
        self.global_transform = (!updated.is_identity()).then_some(updated);
        self.global_transform.as_ref()
    }

    pub fn activate(&mut self, surface: &mut dyn RenderSurface, active: bool) {
        self.set_selection_class(surface, "active", active);
    }

    pub fn highlight(&mut self, surface: &mut dyn RenderSurface, highlight: bool) {
        self.set_selection_class(surface, "highlight", highlight);
    }

    pub fn select(&mut self, surface: &mut dyn RenderSurface, selected: bool) {
        self.set_selection_class(surface, "selected", selected);
        self.selected = selected;
    }

    /// Padding along x: at most 1.0 is a fraction of the width, capped at the
    /// maximum splay padding, and anything larger is absolute.
    pub fn x_padding(&self, padding: f64) -> f64 {
        self.padding(padding, self.width())
    }

    pub fn y_padding(&self, padding: f64) -> f64 {
        self.padding(padding, self.height())
    }

    /// The element's horizontal extent, widened by `padding` on each side.
    pub fn x_bounds(&self, padding: f64) -> [f64; 2] {
        let padding = self.x_padding(padding);
        let x = self.centroid().x();
        [
            x + self.corner_offsets[2].x() - padding,
            x + self.corner_offsets[0].x() + padding,
        ]
    }

    pub fn y_bounds(&self, padding: f64) -> [f64; 2] {
        let padding = self.y_padding(padding);
        let y = self.centroid().y();
        [
            y + self.corner_offsets[2].y() - padding,
            y + self.corner_offsets[0].y() + padding,
        ]
    }

    pub fn point_outside(&self, point: Point, padding: f64) -> bool {
        let [left, right] = self.x_bounds(padding);
        let [top, bottom] = self.y_bounds(padding);
        point.x() < left || right < point.x() || point.y() < top || bottom < point.y()
    }

    /// Whether `point` lies within the corner offsets, widened by `padding`.
    pub fn contains_point(&self, point: Point, padding: f64) -> bool {
        let pad = Point::new(self.x_padding(padding), self.y_padding(padding));
        let top_left = self.corner_offsets[2].sub_point(pad);
        let bottom_right = self.corner_offsets[0].add_point(pad);
        let delta = point.sub_point(self.centroid());
        top_left.x() <= delta.x()
            && delta.x() <= bottom_right.x()
            && top_left.y() <= delta.y()
            && delta.y() <= bottom_right.y()
    }

    /// Padding around the element within which a connection's end belongs to it.
    pub fn splay_padding(&self) -> Point {
        let padding = self.style.connection_splay_padding();
        Point::new(self.x_padding(padding), self.y_padding(padding))
    }

    pub fn in_splay_region(&self, point: Point) -> bool {
        self.contains_point(point, self.style.connection_splay_padding())
    }

    /// The face a ray from the centroid through `point` leaves by.
    ///
    /// Returns `None` for a point inside the element.
    pub fn boundary_face(&self, point: Point) -> Option<Face> {
        if self.contains_point(point, 0.0) {
            return None;
        }
        let delta = point.sub_point(self.centroid());
        let [br, tr, tl, bl] = self.corner_offsets;
        let below = |corner: Point| corner.x() * delta.y() < corner.y() * delta.x();
        let face = match (delta.x() < 0.0, delta.y() < 0.0) {
            (true, true) => {
                if below(tl) {
                    Face::Left
                } else {
                    Face::Top
                }
            }
            (true, false) => {
                if below(bl) {
                    Face::Bottom
                } else {
                    Face::Left
                }
            }
            (false, true) => {
                if below(tr) {
                    Face::Top
                } else {
                    Face::Right
                }
            }
            (false, false) => {
                if below(br) {
                    Face::Right
                } else {
                    Face::Bottom
                }
            }
        };
        Some(face)
    }

    /// Re-derives the element's geometry from its shape.
    ///
    /// Called after the shape's content has been replaced. Any selection
    /// marks added earlier are removed and added again.
    pub fn update_svg_element(
        &mut self,
        surface: &mut dyn RenderSurface,
        ids: &mut IdGenerator,
    ) -> Result<(), CellDLError> {
        for mark in self.selection_marks.drain(..) {
            surface.remove_shape(mark);
        }
        self.selection_element = self.shape;

        self.centroid_offset = self.read_centroid_offset(surface);
        self.update_bounds(surface)?;
        self.add_selection_marks(surface, ids)
    }

    /// Moves the element's geometry to a new top-left corner and size.
    pub(crate) fn set_geometry(&mut self, top_left: Point, size: Size) {
        self.top_left = top_left;
        self.size = size;
        self.bounds = Bounds::new_from_top_left(top_left, size);
        self.centroid = Some(size.at_offset(self.centroid_offset).add_point(top_left));
        self.update_corner_offsets();
    }

    fn padding(&self, padding: f64, extent: f64) -> f64 {
        if padding <= 1.0 {
            (padding * extent).min(self.style.max_connection_splay_padding())
        } else {
            padding
        }
    }

    fn is_group(&self, surface: &dyn RenderSurface) -> bool {
        surface.tag_name(self.shape).as_deref() == Some("g")
    }

    fn read_centroid_offset(&self, surface: &dyn RenderSurface) -> Point {
        let default = Point::new(0.5, 0.5);
        if !self.is_group(surface) {
            return default;
        }
        let Some(first) = surface.children(self.shape).first().copied() else {
            return default;
        };
        let coordinate = |name: &str| {
            surface
                .attribute(first, name)
                .and_then(|value| value.trim().parse::<f64>().ok())
        };
        match coordinate("data-centre-x") {
            Some(x) => Point::new(x, coordinate("data-centre-y").unwrap_or(default.y())),
            None => default,
        }
    }

    fn update_bounds(&mut self, surface: &dyn RenderSurface) -> Result<(), CellDLError> {
        let bounds = self.svg_bounds(surface)?;
        self.size = bounds.to_size();
        match self.centroid {
            Some(centroid) => {
                self.top_left = centroid.sub_point(self.size.at_offset(self.centroid_offset));
                self.bounds = Bounds::new_from_top_left(self.top_left, self.size);
            }
            None => {
                self.top_left = bounds.top_left();
                self.bounds = bounds;
                self.centroid = Some(self.size.at_offset(self.centroid_offset).add_point(self.top_left));
            }
        }
        trace!(
            id = self.object_id.to_string(),
            width = self.size.width(),
            height = self.size.height();
            "Updated element bounds"
        );
        self.update_corner_offsets();
        Ok(())
    }

    fn update_corner_offsets(&mut self) {
        let gap = self.style.corner_gap();
        let (width, height) = (self.size.width(), self.size.height());
        let top_left = self.size.at_offset(self.centroid_offset).scale(-1.0);
        self.corner_offsets = [
            top_left.add_point(Point::new(width + gap, height + gap)),
            top_left.add_point(Point::new(width + gap, -gap)),
            top_left.add_point(Point::new(-gap, -gap)),
            top_left.add_point(Point::new(-gap, height + gap)),
        ];
    }

    /// Adds a selection rectangle to a group, and a centre mark to a conduit.
    fn add_selection_marks(
        &mut self,
        surface: &mut dyn RenderSurface,
        ids: &mut IdGenerator,
    ) -> Result<(), CellDLError> {
        if !self.is_group(surface)
            || surface.has_class(self.shape, CellDLClass::Connection.class_name())
        {
            return Ok(());
        }
        let Some(first) = surface.children(self.shape).first().copied() else {
            return Ok(());
        };
        let measured = if surface.has_class(self.shape, CellDLClass::Compartment.class_name()) {
            first
        } else {
            self.shape
        };
        let bounds = surface
            .bounding_box(measured)?
            .ok_or(CellDLError::MissingGeometry(self.object_id))?
            .expand(self.style.selection_stroke_width() / 2.0);

        if surface.tag_name(first).as_deref() == Some("svg") {
            let tl = bounds.top_left();
            surface.set_attribute(first, "x", &format!("{}px", tl.x()));
            surface.set_attribute(first, "y", &format!("{}px", tl.y()));
            surface.set_attribute(first, "width", &format!("{}px", bounds.width()));
            surface.set_attribute(first, "height", &format!("{}px", bounds.height()));
        }

        let classes: Vec<&str> = SELECTION_CLASSES
            .iter()
            .chain(self.selection_classes.iter())
            .copied()
            .collect();
        let rect = ControlRect::fixed_rect(ids, bounds.as_array()).svg(&classes);
        let selection = surface.insert_markup(self.shape, &rect.to_string())?;
        self.selection_marks.push(selection);
        self.selection_element = selection;

        if self.kind.is_conduit() {
            let centre = bounds
                .to_size()
                .at_offset(self.centroid_offset)
                .add_point(bounds.top_left());
            let mark = Circle::new()
                .set("cx", centre.x())
                .set("cy", centre.y())
                .set("r", self.style.conduit_selection_radius())
                .set("class", format!("{} conduit", SELECTION_CLASSES.join(" ")));
            let mark = surface.insert_markup(self.shape, &mark.to_string())?;
            self.selection_marks.push(mark);
        }
        Ok(())
    }

    /// The shapes that carry selection classes.
    ///
    /// A connection group spreads them over all of its parts.
    fn selection_members(&self, surface: &dyn RenderSurface) -> Vec<ShapeId> {
        let element = self.selection_element;
        if surface.tag_name(element).as_deref() == Some("g")
            && surface.has_class(element, CellDLClass::Connection.class_name())
        {
            surface.children(element)
        } else {
            vec![element]
        }
    }

    fn set_selection_class(&mut self, surface: &mut dyn RenderSurface, class: &'static str, enable: bool) {
        for member in self.selection_members(surface) {
            if enable {
                surface.add_class(member, class);
            } else {
                surface.remove_class(member, class);
            }
        }
        if enable {
            self.selection_classes.insert(class);
        } else {
            self.selection_classes.shift_remove(class);
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::surface::MemorySurface;

    const DIAGRAM: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <rect id="plain" x="0" y="0" width="100" height="50"/>
        <g id="layer" transform="translate(10, 20)">
            <g id="group" class="celldl-Component">
                <rect x="0" y="0" width="40" height="20" data-centre-x="0.25" data-centre-y="0.5"/>
            </g>
            <g id="conduit" class="celldl-Conduit" transform="scale(2)">
                <circle cx="10" cy="10" r="10"/>
            </g>
        </g>
        <g id="nested" class="celldl-Component">
            <svg x="0" y="0" width="30" height="30"/>
        </g>
        <g id="connection" class="celldl-Connection">
            <path d="M 0 0 L 10 0"/>
            <path d="M 10 0 L 10 10"/>
        </g>
        <g id="bad" transform="rotate(oops)"><rect width="1" height="1"/></g>
        <g id="empty"/>
    </svg>"#;

    fn bind(surface: &mut MemorySurface, id: &str, kind: ObjectKind) -> Result<GraphicElement, CellDLError> {
        let shape = surface.element_by_id(id).expect("shape exists");
        let mut ids = IdGenerator::new();
        GraphicElement::new(surface, &mut ids, &StyleConfig::default(), Id::new(id), kind, shape)
    }

    fn surface() -> MemorySurface {
        MemorySurface::from_svg_str(DIAGRAM).expect("valid diagram")
    }

    #[test]
    fn test_plain_shape_geometry() {
        let mut surface = surface();
        let element = bind(&mut surface, "plain", ObjectKind::Component).unwrap();

        assert!(element.global_transform().is_none());
        assert_eq!(element.bounds().as_array(), [0.0, 0.0, 100.0, 50.0]);
        assert_eq!(element.centroid(), Point::new(50.0, 25.0));
        assert_eq!(element.selection_element(), element.shape());
    }

    #[test]
    fn test_corner_offsets_include_gap() {
        let mut surface = surface();
        let element = bind(&mut surface, "plain", ObjectKind::Component).unwrap();
        // gap = 2/2 - 3/2
        let [br, tr, tl, bl] = element.corner_offsets();
        assert_eq!(br, Point::new(49.5, 24.5));
        assert_eq!(tr, Point::new(49.5, -24.5));
        assert_eq!(tl, Point::new(-49.5, -24.5));
        assert_eq!(bl, Point::new(-49.5, 24.5));
        assert_eq!(element.corners(), [br, tl]);
    }

    #[test]
    fn test_global_transform_composes_ancestors() {
        let mut surface = surface();
        let element = bind(&mut surface, "conduit", ObjectKind::Conduit).unwrap();

        let transform = element.global_transform().expect("transformed");
        assert_eq!(transform.as_array(), [2.0, 0.0, 0.0, 2.0, 10.0, 20.0]);
        assert_eq!(element.bounds().as_array(), [10.0, 20.0, 50.0, 60.0]);
    }

    #[test]
    fn test_group_centroid_offset_from_first_child() {
        let mut surface = surface();
        let element = bind(&mut surface, "group", ObjectKind::Component).unwrap();

        assert_eq!(element.centroid_offset(), Point::new(0.25, 0.5));
        assert_eq!(element.bounds().as_array(), [10.0, 20.0, 50.0, 40.0]);
        assert_eq!(element.centroid(), Point::new(20.0, 30.0));
    }

    #[test]
    fn test_group_gets_selection_rect() {
        let mut surface = surface();
        let element = bind(&mut surface, "group", ObjectKind::Component).unwrap();

        let selection = element.selection_element();
        assert_ne!(selection, element.shape());
        assert_eq!(surface.parent(selection), Some(element.shape()));
        for class in SELECTION_CLASSES {
            assert!(surface.has_class(selection, class));
        }
        let bbox = surface.bounding_box(selection).unwrap().unwrap();
        assert_eq!(bbox.as_array(), [-1.5, -1.5, 41.5, 21.5]);
    }

    #[test]
    fn test_conduit_gets_centre_mark() {
        let mut surface = surface();
        let element = bind(&mut surface, "conduit", ObjectKind::Conduit).unwrap();

        let children = surface.children(element.shape());
        assert_eq!(children.len(), 3);
        let mark = children[2];
        assert!(surface.has_class(mark, "conduit"));
        assert_eq!(surface.attribute(mark, "r").as_deref(), Some("9"));
        assert_eq!(surface.attribute(mark, "cx").as_deref(), Some("10"));
    }

    #[test]
    fn test_nested_svg_is_resized() {
        let mut surface = surface();
        let element = bind(&mut surface, "nested", ObjectKind::Component).unwrap();

        let first = surface.children(element.shape())[0];
        assert_eq!(surface.attribute(first, "x").as_deref(), Some("-1.5px"));
        assert_eq!(surface.attribute(first, "width").as_deref(), Some("33px"));
    }

    #[test]
    fn test_update_svg_element_replaces_marks() {
        let mut surface = surface();
        let mut ids = IdGenerator::new();
        let mut element = bind(&mut surface, "conduit", ObjectKind::Conduit).unwrap();

        element.update_svg_element(&mut surface, &mut ids).unwrap();
        assert_eq!(surface.children(element.shape()).len(), 3);
    }

    #[test]
    fn test_malformed_transform_is_an_error() {
        let mut surface = surface();
        let result = bind(&mut surface, "bad", ObjectKind::Component);
        assert!(matches!(result, Err(CellDLError::Transform { .. })));
    }

    #[test]
    fn test_missing_geometry_is_an_error() {
        let mut surface = surface();
        let result = bind(&mut surface, "empty", ObjectKind::Component);
        assert!(matches!(result, Err(CellDLError::MissingGeometry(_))));
    }

    #[test]
    fn test_selection_classes() {
        let mut surface = surface();
        let mut element = bind(&mut surface, "plain", ObjectKind::Component).unwrap();

        element.select(&mut surface, true);
        element.activate(&mut surface, true);
        assert!(element.selected());
        assert!(surface.has_class(element.shape(), "selected"));
        assert!(surface.has_class(element.shape(), "active"));

        element.select(&mut surface, false);
        assert!(!element.selected());
        assert!(!surface.has_class(element.shape(), "selected"));
        assert!(element.has_selection_class("active"));
    }

    #[test]
    fn test_connection_group_selects_every_part() {
        let mut surface = surface();
        let mut element = bind(&mut surface, "connection", ObjectKind::Connection).unwrap();

        element.highlight(&mut surface, true);
        let parts = surface.children(element.shape());
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|part| surface.has_class(*part, "highlight")));
        assert!(!surface.has_class(element.shape(), "highlight"));
    }

    #[test]
    fn test_padding_fraction_and_absolute() {
        let mut surface = surface();
        let element = bind(&mut surface, "plain", ObjectKind::Component).unwrap();

        assert_approx_eq!(f64, element.x_padding(0.1), 10.0);
        assert_approx_eq!(f64, element.x_padding(0.5), 20.0);
        assert_approx_eq!(f64, element.y_padding(0.2), 10.0);
        assert_approx_eq!(f64, element.x_padding(16.0), 16.0);
        // Exactly 1.0 is a fraction, capped
        assert_approx_eq!(f64, element.x_padding(1.0), 20.0);
    }

    #[test]
    fn test_bounds_and_point_outside() {
        let mut surface = surface();
        let element = bind(&mut surface, "plain", ObjectKind::Component).unwrap();

        assert_eq!(element.x_bounds(0.0), [0.5, 99.5]);
        assert_eq!(element.y_bounds(5.0), [-4.5, 54.5]);
        assert!(!element.point_outside(Point::new(50.0, 25.0), 0.0));
        assert!(element.point_outside(Point::new(100.0, 25.0), 0.0));
        assert!(!element.point_outside(Point::new(100.0, 25.0), 5.0));
    }

    #[test]
    fn test_contains_point() {
        let mut surface = surface();
        let element = bind(&mut surface, "plain", ObjectKind::Component).unwrap();

        assert!(element.contains_point(Point::new(1.0, 1.0), 0.0));
        assert!(!element.contains_point(Point::new(0.0, 0.0), 0.0));
        assert!(element.contains_point(Point::new(-5.0, 25.0), 10.0));
    }

    #[test]
    fn test_splay_region() {
        let mut surface = surface();
        let element = bind(&mut surface, "plain", ObjectKind::Component).unwrap();
        assert_eq!(element.splay_padding(), Point::new(16.0, 16.0));
        assert!(element.in_splay_region(Point::new(-10.0, 25.0)));
        assert!(!element.in_splay_region(Point::new(-20.0, 25.0)));

        let style: StyleConfig = toml::from_str("connection_splay_padding = 0.1").unwrap();
        let shape = surface.element_by_id("plain").unwrap();
        let element = GraphicElement::new(
            &mut surface,
            &mut IdGenerator::new(),
            &style,
            Id::new("plain"),
            ObjectKind::Component,
            shape,
        )
        .unwrap();
        assert_eq!(element.splay_padding(), Point::new(10.0, 5.0));
        assert!(!element.in_splay_region(Point::new(-10.0, 25.0)));
    }

    #[test]
    fn test_boundary_face() {
        let mut surface = surface();
        let element = bind(&mut surface, "plain", ObjectKind::Component).unwrap();

        assert_eq!(element.boundary_face(Point::new(50.0, 25.0)), None);
        assert_eq!(element.boundary_face(Point::new(-100.0, 20.0)), Some(Face::Left));
        assert_eq!(element.boundary_face(Point::new(-100.0, 30.0)), Some(Face::Left));
        assert_eq!(element.boundary_face(Point::new(200.0, 20.0)), Some(Face::Right));
        assert_eq!(element.boundary_face(Point::new(200.0, 30.0)), Some(Face::Right));
        assert_eq!(element.boundary_face(Point::new(45.0, -100.0)), Some(Face::Top));
        assert_eq!(element.boundary_face(Point::new(55.0, -100.0)), Some(Face::Top));
        assert_eq!(element.boundary_face(Point::new(45.0, 200.0)), Some(Face::Bottom));
        assert_eq!(element.boundary_face(Point::new(55.0, 200.0)), Some(Face::Bottom));
    }

    #[test]
    fn test_update_global_transform() {
        let mut surface = surface();
        let mut element = bind(&mut surface, "plain", ObjectKind::Component).unwrap();

        let moved = element
            .update_global_transform(&Transform::translate(5.0, 0.0))
            .copied();
        assert_eq!(moved, Some(Transform::translate(5.0, 0.0)));
        assert!(element
            .update_global_transform(&Transform::translate(-5.0, 0.0))
            .is_none());
    }
}
