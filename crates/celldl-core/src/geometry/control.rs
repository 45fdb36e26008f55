//! Movable and resizable rectangles.

use log::trace;
use svg::node::element as svg_element;

use super::{Bounds, IdGenerator, Point, RestrictedPoint, Size};

/// A corner of a [`ControlRect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

/// A rectangle defined by two restricted corner points.
///
/// The corners are always held in order, so the top-left point is never to the
/// right of or below the bottom-right point. The centroid sits at a fractional
/// offset within the rectangle, `(0.5, 0.5)` being the geometric centre.
///
/// Moving the rectangle goes through the corners' restricted values, so a
/// caller learns whether anything actually moved from [`ControlRect::dirty`]
/// and acknowledges the change with [`ControlRect::clean`].
///
/// # Examples
///
/// ```
/// # use celldl_core::geometry::{ControlRect, IdGenerator, Point, RestrictedPoint};
/// let mut ids = IdGenerator::new();
/// let tl = RestrictedPoint::from_point(&mut ids, Point::new(0.0, 0.0));
/// let br = RestrictedPoint::from_point(&mut ids, Point::new(100.0, 50.0));
/// let mut rect = ControlRect::new(&mut ids, tl, br, None);
///
/// assert_eq!(rect.centroid().point(), Point::new(50.0, 25.0));
/// assert!(rect.reposition(Point::new(60.0, 25.0)));
/// assert_eq!(rect.top_left_point(), Point::new(10.0, 0.0));
/// rect.clean();
/// assert!(!rect.dirty());
/// ```
#[derive(Debug, Clone)]
pub struct ControlRect {
    top_left: RestrictedPoint,
    bottom_right: RestrictedPoint,
    size: Size,
    centroid: RestrictedPoint,
    centroid_offset: Point,
}

impl ControlRect {
    /// Creates a rectangle from two corners given in any order.
    ///
    /// `centroid_offset` defaults to the geometric centre.
    pub fn new(
        ids: &mut IdGenerator,
        corner_0: RestrictedPoint,
        corner_1: RestrictedPoint,
        centroid_offset: Option<Point>,
    ) -> Self {
        let centroid = RestrictedPoint::from_point(ids, Point::default());
        let mut rect = Self {
            top_left: corner_0.clone(),
            bottom_right: corner_1.clone(),
            size: Size::default(),
            centroid,
            centroid_offset: Point::default(),
        };
        rect.set_corner_positions(corner_0, corner_1);
        rect.set_centroid_offset(centroid_offset.unwrap_or(Point::new(0.5, 0.5)));
        rect
    }

    /// Creates a rectangle whose corners can never move.
    ///
    /// `bounds` is `[left, top, right, bottom]`.
    pub fn fixed_rect(ids: &mut IdGenerator, bounds: [f64; 4]) -> Self {
        let tl = RestrictedPoint::fixed_at(ids, Point::new(bounds[0], bounds[1]));
        let br = RestrictedPoint::fixed_at(ids, Point::new(bounds[2], bounds[3]));
        Self::new(ids, tl, br, None)
    }

    pub fn top_left(&self) -> &RestrictedPoint {
        &self.top_left
    }

    pub fn bottom_right(&self) -> &RestrictedPoint {
        &self.bottom_right
    }

    pub fn top_left_point(&self) -> Point {
        self.top_left.point()
    }

    pub fn bottom_right_point(&self) -> Point {
        self.bottom_right.point()
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(self.top_left_point(), self.bottom_right_point())
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn centroid(&self) -> &RestrictedPoint {
        &self.centroid
    }

    pub fn centroid_offset(&self) -> Point {
        self.centroid_offset
    }

    /// Dirty if either corner has moved since the last [`clean`](Self::clean).
    pub fn dirty(&self) -> bool {
        self.top_left.dirty() || self.bottom_right.dirty()
    }

    pub fn fixed(&self) -> bool {
        self.top_left.fixed() && self.bottom_right.fixed()
    }

    pub fn clean(&self) {
        self.top_left.clean();
        self.bottom_right.clean();
        self.centroid.clean();
    }

    /// Creates another rectangle over the same corner values.
    pub fn copy(&self, ids: &mut IdGenerator) -> Self {
        Self::new(
            ids,
            self.top_left.clone(),
            self.bottom_right.clone(),
            Some(self.centroid_offset),
        )
    }

    /// Sets the corners, reordering their coordinates so that the top-left
    /// point is above and to the left of the bottom-right point.
    pub fn set_corner_positions(&mut self, corner_0: RestrictedPoint, corner_1: RestrictedPoint) {
        let (mut x0, mut y0) = (corner_0.x_value().clone(), corner_0.y_value().clone());
        let (mut x1, mut y1) = (corner_1.x_value().clone(), corner_1.y_value().clone());
        if x0.borrow().value() > x1.borrow().value() {
            std::mem::swap(&mut x0, &mut x1);
        }
        if y0.borrow().value() > y1.borrow().value() {
            std::mem::swap(&mut y0, &mut y1);
        }
        self.top_left = RestrictedPoint::new(x0, y0);
        self.bottom_right = RestrictedPoint::new(x1, y1);
        self.update_geometry();
    }

    /// Moves the centroid to a new fractional offset within the rectangle.
    pub fn set_centroid_offset(&mut self, centroid_offset: Point) {
        self.centroid_offset = centroid_offset;
        self.update_geometry();
    }

    /// Moves the rectangle so that its centroid is at `centroid`.
    ///
    /// The target is first clamped by the centroid's own range (see
    /// [`RestrictedPoint::x_value`]), then both corners are shifted by the
    /// resulting delta. Returns [`dirty`](Self::dirty).
    pub fn reposition(&mut self, centroid: Point) -> bool {
        let current = self.centroid.point();
        let target = Point::new(
            self.centroid.x_value().borrow().clamp(centroid.x()),
            self.centroid.y_value().borrow().clamp(centroid.y()),
        );
        let delta = target.sub_point(current);
        if !delta.is_zero() {
            trace!(dx = delta.x(), dy = delta.y(); "Repositioning control rect");
            let tl = self.top_left_point().add_point(delta);
            let br = self.bottom_right_point().add_point(delta);
            self.top_left.set_point(tl);
            self.bottom_right.set_point(br);
            self.update_geometry();
        }
        self.dirty()
    }

    /// Drags a single corner to `point`, resizing the rectangle.
    ///
    /// The opposite corner stays where it is. If the drag crosses the opposite
    /// edge the corners are reordered. Returns [`dirty`](Self::dirty).
    pub fn set_corner(&mut self, corner: Corner, point: Point) -> bool {
        let (x_value, y_value) = match corner {
            Corner::TopLeft => (self.top_left.x_value(), self.top_left.y_value()),
            Corner::TopRight => (self.bottom_right.x_value(), self.top_left.y_value()),
            Corner::BottomRight => (self.bottom_right.x_value(), self.bottom_right.y_value()),
            Corner::BottomLeft => (self.top_left.x_value(), self.bottom_right.y_value()),
        };
        x_value.borrow_mut().set_value(point.x());
        y_value.borrow_mut().set_value(point.y());
        let (tl, br) = (self.top_left.clone(), self.bottom_right.clone());
        self.set_corner_positions(tl, br);
        self.dirty()
    }

    /// Returns an SVG `<rect>` covering the rectangle.
    pub fn svg(&self, classes: &[&str]) -> svg_element::Rectangle {
        let tl = self.top_left_point();
        let mut rect = svg_element::Rectangle::new()
            .set("x", tl.x())
            .set("y", tl.y())
            .set("width", self.size.width())
            .set("height", self.size.height());
        if !classes.is_empty() {
            rect = rect.set("class", classes.join(" "));
        }
        rect
    }

    fn update_geometry(&mut self) {
        let tl = self.top_left_point();
        let size = self.bottom_right_point().sub_point(tl);
        self.size = Size::new(size.x(), size.y());
        self.centroid
            .reassign_value(self.size.at_offset(self.centroid_offset).add_point(tl));
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-500.0f64..500.0, -500.0f64..500.0).prop_map(|(x, y)| Point::new(x, y))
    }

    /// Corners are ordered however they are given.
    fn check_corners_ordered(p0: Point, p1: Point) -> Result<(), TestCaseError> {
        let mut ids = IdGenerator::new();
        let c0 = RestrictedPoint::from_point(&mut ids, p0);
        let c1 = RestrictedPoint::from_point(&mut ids, p1);
        let rect = ControlRect::new(&mut ids, c0, c1, None);
        prop_assert!(rect.top_left().x() <= rect.bottom_right().x());
        prop_assert!(rect.top_left().y() <= rect.bottom_right().y());
        Ok(())
    }

    /// Dragging a corner anywhere keeps the corners ordered.
    fn check_set_corner_keeps_order(
        p0: Point,
        p1: Point,
        target: Point,
    ) -> Result<(), TestCaseError> {
        let mut ids = IdGenerator::new();
        let c0 = RestrictedPoint::from_point(&mut ids, p0);
        let c1 = RestrictedPoint::from_point(&mut ids, p1);
        let mut rect = ControlRect::new(&mut ids, c0, c1, None);
        for corner in [
            Corner::TopLeft,
            Corner::TopRight,
            Corner::BottomRight,
            Corner::BottomLeft,
        ] {
            rect.set_corner(corner, target);
            prop_assert!(rect.top_left().x() <= rect.bottom_right().x());
            prop_assert!(rect.top_left().y() <= rect.bottom_right().y());
            prop_assert!(rect.size().width() >= 0.0);
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn corners_ordered(p0 in point_strategy(), p1 in point_strategy()) {
            check_corners_ordered(p0, p1)?;
        }

        #[test]
        fn set_corner_keeps_order(
            p0 in point_strategy(),
            p1 in point_strategy(),
            target in point_strategy(),
        ) {
            check_set_corner_keeps_order(p0, p1, target)?;
        }
    }
}
