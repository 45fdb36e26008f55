//! Movable, resizable elements.

use std::fmt;

use indexmap::IndexMap;
use log::{debug, trace};

use celldl_core::{
    geometry::{
        Bounds, ControlRect, Corner, IdGenerator, Limit, Point, RestrictedPoint, Transform,
    },
    identifier::Id,
};

use super::GraphicElement;
use crate::{
    config::StyleConfig,
    error::CellDLError,
    objects::ObjectKind,
    surface::{RenderSurface, ShapeId},
};

/// A direction in which an element's movement can be limited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A path attached to a connectable element.
///
/// Notified whenever the element is moved, resized or has its shape
/// re-derived, so that the path can move its end points.
pub trait ConnectedPath {
    /// `component` has already taken its new geometry; `previous` is where
    /// its bounds were before.
    fn component_resized(
        &mut self,
        surface: &mut dyn RenderSurface,
        component: &GraphicElement,
        previous: Bounds,
    ) -> Result<(), CellDLError>;
}

/// A [`GraphicElement`] that can be moved and resized.
///
/// The element's position is held in a [`ControlRect`]. Moving or resizing
/// changes the rectangle, and [`redraw`](Self::redraw) writes the shape's new
/// position back to the surface as a `transform` attribute.
pub struct BoundedElement {
    element: GraphicElement,
    control_rect: ControlRect,
    local_transform: Transform,
    rendered_top_left: Point,
    connected_paths: IndexMap<String, Box<dyn ConnectedPath>>,
}

impl fmt::Debug for BoundedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedElement")
            .field("element", &self.element)
            .field("control_rect", &self.control_rect)
            .field("local_transform", &self.local_transform)
            .field("rendered_top_left", &self.rendered_top_left)
            .field("connected_paths", &self.connected_paths.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl BoundedElement {
    /// Binds an object to its shape and builds its control rectangle.
    ///
    /// # Errors
    ///
    /// Fails as [`GraphicElement::new`] does, or if the shape's own
    /// transform can't be parsed.
    pub fn new(
        surface: &mut dyn RenderSurface,
        ids: &mut IdGenerator,
        style: &StyleConfig,
        object_id: Id,
        kind: ObjectKind,
        shape: ShapeId,
    ) -> Result<Self, CellDLError> {
        let mut element = GraphicElement::new(surface, ids, style, object_id, kind, shape)?;
        let local_transform: Transform = surface
            .computed_transform(shape)
            .parse()
            .map_err(|e| CellDLError::new_transform_error(object_id.to_string(), e))?;
        let control_rect = control_rect_for(ids, &element);
        element.set_centroid(control_rect.centroid().point());
        let rendered_top_left = control_rect.top_left_point();
        Ok(Self {
            element,
            control_rect,
            local_transform,
            rendered_top_left,
            connected_paths: IndexMap::new(),
        })
    }

    pub fn element(&self) -> &GraphicElement {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut GraphicElement {
        &mut self.element
    }

    pub fn control_rect(&self) -> &ControlRect {
        &self.control_rect
    }

    /// The transform on the shape itself.
    pub fn local_transform(&self) -> &Transform {
        &self.local_transform
    }

    /// Limits how far the centroid may move along one axis.
    ///
    /// Limits only ever tighten; see [`unlimit_direction`](Self::unlimit_direction).
    pub fn limit_direction(&mut self, axis: Axis, minimum: impl Into<Limit>, maximum: impl Into<Limit>) {
        let centroid = self.control_rect.centroid();
        let value = match axis {
            Axis::Horizontal => centroid.x_value(),
            Axis::Vertical => centroid.y_value(),
        };
        value.borrow_mut().narrow_range(minimum, maximum);
    }

    /// Removes all limits on the centroid's movement.
    pub fn unlimit_direction(&mut self) {
        let centroid = self.control_rect.centroid();
        for value in [centroid.x_value(), centroid.y_value()] {
            let mut value = value.borrow_mut();
            value.reassign_minimum(f64::NEG_INFINITY);
            value.reassign_maximum(f64::INFINITY);
        }
    }

    /// Moves the element so that its centroid is at `centroid`, within any limits.
    pub fn reposition(
        &mut self,
        surface: &mut dyn RenderSurface,
        centroid: Point,
    ) -> Result<(), CellDLError> {
        if self.control_rect.reposition(centroid) {
            self.redraw(surface)?;
        }
        Ok(())
    }

    /// Drags one corner of the element to `point`, resizing it.
    ///
    /// The shape isn't redrawn; call [`redraw`](Self::redraw) once the drag
    /// has been applied.
    pub fn set_corner(&mut self, corner: Corner, point: Point) -> bool {
        self.control_rect.set_corner(corner, point)
    }

    /// Writes the element's current position to its shape.
    ///
    /// The movement of the control rectangle's top-left corner since the last
    /// redraw is a translation in diagram coordinates. It is carried into the
    /// shape's parent coordinates through the global transform and composed
    /// with the shape's local transform. The `transform` attribute is removed
    /// when the result is the identity.
    ///
    /// # Errors
    ///
    /// Returns [`CellDLError::Transform`] if the global transform is singular,
    /// or the error of a connected path that fails to follow the element.
    pub fn redraw(&mut self, surface: &mut dyn RenderSurface) -> Result<(), CellDLError> {
        let previous = self.element.bounds();
        let top_left = self.control_rect.top_left_point();
        let delta = top_left.sub_point(self.rendered_top_left);
        if !delta.is_zero() {
            let translation = Transform::translate(delta.x(), delta.y());
            let local_translation = match self.element.global_transform() {
                Some(global) => {
                    let inverse = global.inverse().map_err(|e| {
                        CellDLError::new_transform_error(self.element.object_id().to_string(), e)
                    })?;
                    inverse.left_multiply(&translation.left_multiply(global))
                }
                None => translation,
            };
            self.local_transform = self.local_transform.left_multiply(&local_translation);
            self.element.update_global_transform(&translation);
            self.rendered_top_left = top_left;
            trace!(
                id = self.element.object_id().to_string(),
                dx = delta.x(),
                dy = delta.y();
                "Translated element"
            );
        }
        let transform = (!self.local_transform.is_identity()).then(|| self.local_transform.to_string());
        surface.set_transform_attribute(self.element.shape(), transform.as_deref());

        self.element.set_geometry(top_left, self.control_rect.size());
        self.control_rect.clean();
        if self.element.bounds() != previous {
            self.notify_connected_paths(surface, previous)?;
        }
        Ok(())
    }

    /// Re-derives geometry after the shape's content has been replaced.
    ///
    /// Returns how far the bottom-right and top-left corner offsets moved.
    /// Connectable elements also lose their movement limits and notify their
    /// connected paths.
    pub fn update_svg_element(
        &mut self,
        surface: &mut dyn RenderSurface,
        ids: &mut IdGenerator,
    ) -> Result<[Point; 2], CellDLError> {
        let saved_corners = self.element.corners();
        let previous = self.element.bounds();
        self.element.update_svg_element(surface, ids)?;
        self.control_rect.set_centroid_offset(self.element.centroid_offset());
        let top_left = self.element.top_left();
        self.control_rect.set_corner_positions(
            RestrictedPoint::from_point(ids, top_left),
            RestrictedPoint::from_point(ids, top_left.add_point(self.element.size().into())),
        );
        self.rendered_top_left = self.control_rect.top_left_point();

        let corners = self.element.corners();
        let corner_deltas = [
            corners[0].sub_point(saved_corners[0]),
            corners[1].sub_point(saved_corners[1]),
        ];
        if self.element.kind().is_connectable() {
            self.unlimit_direction();
        }
        self.notify_connected_paths(surface, previous)?;
        debug!(
            id = self.element.object_id().to_string(),
            paths = self.connected_paths.len();
            "Updated element"
        );
        Ok(corner_deltas)
    }

    fn notify_connected_paths(
        &mut self,
        surface: &mut dyn RenderSurface,
        previous: Bounds,
    ) -> Result<(), CellDLError> {
        if !self.element.kind().is_connectable() {
            return Ok(());
        }
        for path in self.connected_paths.values_mut() {
            path.component_resized(surface, &self.element, previous)?;
        }
        Ok(())
    }

    /// Registers a path to notify when the element is resized.
    ///
    /// A path registered again under the same key replaces the earlier one.
    pub fn add_connected_path(&mut self, key: impl Into<String>, path: Box<dyn ConnectedPath>) {
        self.connected_paths.insert(key.into(), path);
    }

    pub fn remove_connected_path(&mut self, key: &str) -> Option<Box<dyn ConnectedPath>> {
        self.connected_paths.shift_remove(key)
    }

    pub fn connected_path_count(&self) -> usize {
        self.connected_paths.len()
    }
}

fn control_rect_for(ids: &mut IdGenerator, element: &GraphicElement) -> ControlRect {
    let top_left = element.top_left();
    let bottom_right = top_left.add_point(element.size().into());
    let corner_0 = RestrictedPoint::from_point(ids, top_left);
    let corner_1 = RestrictedPoint::from_point(ids, bottom_right);
    ControlRect::new(ids, corner_0, corner_1, Some(element.centroid_offset()))
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::surface::MemorySurface;

    const DIAGRAM: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <rect id="box" x="0" y="0" width="100" height="50"/>
        <rect id="moved" x="0" y="0" width="10" height="10" transform="translate(5, 5)"/>
        <g id="layer" transform="scale(2)">
            <rect id="scaled" x="0" y="0" width="10" height="10"/>
        </g>
    </svg>"#;

    struct Bound {
        surface: MemorySurface,
        ids: IdGenerator,
        element: BoundedElement,
    }

    fn bind(id: &str) -> Bound {
        let mut surface = MemorySurface::from_svg_str(DIAGRAM).unwrap();
        let mut ids = IdGenerator::new();
        let shape = surface.element_by_id(id).unwrap();
        let element = BoundedElement::new(
            &mut surface,
            &mut ids,
            &StyleConfig::default(),
            Id::new(id),
            ObjectKind::Component,
            shape,
        )
        .unwrap();
        Bound {
            surface,
            ids,
            element,
        }
    }

    #[derive(Default)]
    struct RecordingPath {
        calls: Rc<RefCell<Vec<(Id, Bounds, Bounds)>>>,
    }

    impl ConnectedPath for RecordingPath {
        fn component_resized(
            &mut self,
            _surface: &mut dyn RenderSurface,
            component: &GraphicElement,
            previous: Bounds,
        ) -> Result<(), CellDLError> {
            self.calls
                .borrow_mut()
                .push((component.object_id(), previous, component.bounds()));
            Ok(())
        }
    }

    #[test]
    fn test_control_rect_matches_element() {
        let bound = bind("box");
        let rect = bound.element.control_rect();
        assert_eq!(rect.top_left_point(), Point::new(0.0, 0.0));
        assert_eq!(rect.bottom_right_point(), Point::new(100.0, 50.0));
        assert_eq!(bound.element.element().centroid(), Point::new(50.0, 25.0));
    }

    #[test]
    fn test_resize_keeps_top_left() {
        let mut bound = bind("box");
        let shape = bound.element.element().shape();

        assert!(bound
            .element
            .set_corner(Corner::BottomRight, Point::new(150.0, 50.0)));
        bound.element.redraw(&mut bound.surface).unwrap();

        let element = bound.element.element();
        assert_eq!(element.top_left(), Point::new(0.0, 0.0));
        assert_approx_eq!(f64, element.width(), 150.0);
        assert_eq!(bound.surface.attribute(shape, "transform"), None);
        assert!(!bound.element.control_rect().dirty());
    }

    #[test]
    fn test_reposition_writes_translation() {
        let mut bound = bind("box");
        let shape = bound.element.element().shape();

        bound
            .element
            .reposition(&mut bound.surface, Point::new(60.0, 45.0))
            .unwrap();

        assert_eq!(
            bound.surface.attribute(shape, "transform").as_deref(),
            Some("matrix(1, 0, 0, 1, 10, 20)")
        );
        assert_eq!(bound.element.element().top_left(), Point::new(10.0, 20.0));
        assert_eq!(bound.element.element().centroid(), Point::new(60.0, 45.0));

        bound
            .element
            .reposition(&mut bound.surface, Point::new(50.0, 25.0))
            .unwrap();
        assert_eq!(bound.surface.attribute(shape, "transform"), None);
    }

    #[test]
    fn test_redraw_preserves_local_transform() {
        let mut bound = bind("moved");
        let shape = bound.element.element().shape();
        assert_eq!(bound.element.element().top_left(), Point::new(5.0, 5.0));

        bound
            .element
            .reposition(&mut bound.surface, Point::new(20.0, 10.0))
            .unwrap();
        assert_eq!(
            bound.surface.attribute(shape, "transform").as_deref(),
            Some("matrix(1, 0, 0, 1, 15, 5)")
        );
    }

    #[test]
    fn test_redraw_under_scaled_parent() {
        let mut bound = bind("scaled");
        let shape = bound.element.element().shape();
        assert_eq!(bound.element.element().bounds().as_array(), [0.0, 0.0, 20.0, 20.0]);

        bound
            .element
            .reposition(&mut bound.surface, Point::new(20.0, 10.0))
            .unwrap();
        // A 10 unit move in the diagram is 5 units in the parent
        assert_eq!(
            bound.surface.attribute(shape, "transform").as_deref(),
            Some("matrix(1, 0, 0, 1, 5, 0)")
        );
        let bbox = bound.element.element().svg_bounds(&bound.surface).unwrap();
        assert_eq!(bbox.as_array(), [10.0, 0.0, 30.0, 20.0]);
    }

    #[test]
    fn test_limit_direction() {
        let mut bound = bind("box");
        bound.element.limit_direction(Axis::Horizontal, 0.0, 55.0);

        bound
            .element
            .reposition(&mut bound.surface, Point::new(80.0, 40.0))
            .unwrap();
        assert_eq!(bound.element.element().centroid(), Point::new(55.0, 40.0));

        bound.element.unlimit_direction();
        bound
            .element
            .reposition(&mut bound.surface, Point::new(80.0, 40.0))
            .unwrap();
        assert_eq!(bound.element.element().centroid(), Point::new(80.0, 40.0));
    }

    #[test]
    fn test_update_svg_element_notifies_paths() {
        let mut bound = bind("box");
        let shape = bound.element.element().shape();
        let path = RecordingPath::default();
        let calls = Rc::clone(&path.calls);
        bound.element.add_connected_path("c1", Box::new(path));
        bound.element.limit_direction(Axis::Vertical, 0.0, 30.0);

        bound.surface.set_attribute(shape, "width", "120");
        let deltas = bound
            .element
            .update_svg_element(&mut bound.surface, &mut bound.ids)
            .unwrap();

        assert_eq!(deltas, [Point::new(10.0, 0.0), Point::new(-10.0, 0.0)]);
        assert_eq!(
            calls.borrow().as_slice(),
            &[(
                Id::new("box"),
                Bounds::new(0.0, 0.0, 100.0, 50.0),
                Bounds::new(0.0, 0.0, 120.0, 50.0)
            )]
        );
        assert_eq!(bound.element.control_rect().size().width(), 120.0);
        assert_eq!(bound.element.element().centroid(), Point::new(50.0, 25.0));
        let limits = bound.element.control_rect().centroid().y_value().borrow().maximum();
        assert!(limits.is_infinite());
    }

    #[test]
    fn test_move_notifies_paths() {
        let mut bound = bind("box");
        let path = RecordingPath::default();
        let calls = Rc::clone(&path.calls);
        bound.element.add_connected_path("c1", Box::new(path));

        bound.element.redraw(&mut bound.surface).unwrap();
        assert!(calls.borrow().is_empty());

        bound
            .element
            .reposition(&mut bound.surface, Point::new(60.0, 25.0))
            .unwrap();
        assert_eq!(
            calls.borrow().as_slice(),
            &[(
                Id::new("box"),
                Bounds::new(0.0, 0.0, 100.0, 50.0),
                Bounds::new(10.0, 0.0, 110.0, 50.0)
            )]
        );
    }

    #[test]
    fn test_remove_connected_path() {
        let mut bound = bind("box");
        bound
            .element
            .add_connected_path("c1", Box::new(RecordingPath::default()));
        assert_eq!(bound.element.connected_path_count(), 1);
        assert!(bound.element.remove_connected_path("c1").is_some());
        assert_eq!(bound.element.connected_path_count(), 0);
    }
}
