//! Geometric primitives for CellDL diagrams.
//!
//! This module provides the fundamental geometric types used throughout the
//! viewer for locating diagram objects, measuring their extent and tracking
//! how they move.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate (or offset) in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A normalised rectangle defined by its left, top, right and bottom edges
//! - [`Transform`] - A 2×3 affine matrix, parsed from and serialised to SVG text
//! - [`RestrictedValue`] / [`RestrictedPoint`] - Scalars and points clamped to a range
//! - [`ControlRect`] - A movable, resizable rectangle built from two restricted corners
//!
//! # Coordinate System
//!
//! CellDL diagrams are SVG documents, so the coordinate system is SVG's:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward

mod control;
mod restricted;
mod transform;

pub use control::{ControlRect, Corner};
pub use restricted::{IdGenerator, Limit, RestrictedPoint, RestrictedValue, SharedValue};
pub use transform::{NormalTransform, Transform, TransformError};

/// A 2D point representing a position, an offset or a pair of scale factors.
///
/// Points are immutable values: every operation returns a new point.
///
/// # Examples
///
/// ```
/// # use celldl_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// // Vector addition
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// // Component-wise scaling, as used for centroid offsets
/// let centre = Point::new(100.0, 50.0).mul_point(Point::new(0.5, 0.5));
/// assert_eq!(centre, Point::new(50.0, 25.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f64) -> Self {
        self.x = x;
        self
    }

    /// Creates a new point with the specified y-coordinate
    pub fn with_y(mut self, y: f64) -> Self {
        self.y = y;
        self
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Multiplies the coordinates component-wise by another point's coordinates.
    pub fn mul_point(self, factors: Point) -> Self {
        Self {
            x: self.x * factors.x,
            y: self.y * factors.y,
        }
    }

    /// Returns a new point with absolute values of both coordinates
    pub fn abs(self) -> Self {
        Self {
            x: self.x.abs(),
            y: self.y.abs(),
        }
    }
}

impl From<Size> for Point {
    fn from(size: Size) -> Self {
        Self::new(size.width, size.height)
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f64 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f64 {
        self.height
    }

    /// Multiplies both dimensions by the given factor
    pub fn scale(self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    /// Returns true if both width and height are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Returns the point at the given fractional offset within a box of this size.
    ///
    /// An offset of `(0.5, 0.5)` is the geometric centre.
    pub fn at_offset(self, offset: Point) -> Point {
        Point::new(self.width * offset.x(), self.height * offset.y())
    }
}

/// A rectangle in diagram space.
///
/// Bounds are always normalised: whatever order the edges are given in,
/// `left <= right` and `top <= bottom` hold after construction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Bounds {
    /// Creates new bounds from edge coordinates, normalising their order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use celldl_core::geometry::Bounds;
    /// let bounds = Bounds::new(100.0, 50.0, 0.0, 0.0);
    /// assert_eq!(bounds.left(), 0.0);
    /// assert_eq!(bounds.right(), 100.0);
    /// assert_eq!(bounds.top(), 0.0);
    /// assert_eq!(bounds.bottom(), 50.0);
    /// ```
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        let (left, right) = if left <= right {
            (left, right)
        } else {
            (right, left)
        };
        let (top, bottom) = if top <= bottom {
            (top, bottom)
        } else {
            (bottom, top)
        };
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates bounds spanning two arbitrary corner points
    pub fn from_points(p0: Point, p1: Point) -> Self {
        Self::new(p0.x, p0.y, p1.x, p1.y)
    }

    /// Creates new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self::new(
            center.x - half_width,
            center.y - half_height,
            center.x + half_width,
            center.y + half_height,
        )
    }

    /// Creates new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self::new(
            top_left.x,
            top_left.y,
            top_left.x + size.width,
            top_left.y + size.height,
        )
    }

    pub fn left(self) -> f64 {
        self.left
    }

    pub fn top(self) -> f64 {
        self.top
    }

    pub fn right(self) -> f64 {
        self.right
    }

    pub fn bottom(self) -> f64 {
        self.bottom
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    /// Returns the top-left corner
    pub fn top_left(self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Returns the bottom-right corner
    pub fn bottom_right(self) -> Point {
        Point::new(self.right, self.bottom)
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Returns `[left, top, right, bottom]`
    pub fn as_array(self) -> [f64; 4] {
        [self.left, self.top, self.right, self.bottom]
    }

    /// Returns the top-left and bottom-right corners
    pub fn as_points(self) -> [Point; 2] {
        [self.top_left(), self.bottom_right()]
    }

    /// Merges two bounds to create a larger bounds that contains both.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Moves the bounds by the specified offset.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            left: self.left + offset.x,
            top: self.top + offset.y,
            right: self.right + offset.x,
            bottom: self.bottom + offset.y,
        }
    }

    /// Grows the bounds by `margin` on every side.
    ///
    /// A negative margin shrinks the bounds; the result is renormalised.
    pub fn expand(&self, margin: f64) -> Self {
        Self::new(
            self.left - margin,
            self.top - margin,
            self.right + margin,
            self.bottom + margin,
        )
    }

    /// Compares two bounds edge by edge, within `epsilon`.
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.left - other.left).abs() < epsilon
            && (self.top - other.top).abs() < epsilon
            && (self.right - other.right).abs() < epsilon
            && (self.bottom - other.bottom).abs() < epsilon
    }

    /// Checks if these bounds lie entirely within `container`.
    pub fn in_container(&self, container: &Self) -> bool {
        self.left >= container.left
            && self.right <= container.right
            && self.top >= container.top
            && self.bottom <= container.bottom
    }

    /// Projects the bounds through a transform.
    ///
    /// Only the two defining corners are mapped, matching how SVG bounding
    /// boxes are carried into a parent coordinate space by the viewer.
    pub fn transform(&self, transform: &Transform) -> Self {
        Self::from_points(
            transform.transform_point(self.top_left()),
            transform.transform_point(self.bottom_right()),
        )
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (point_strategy(), point_strategy()).prop_map(|(p0, p1)| Bounds::from_points(p0, p1))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Bounds built from two arbitrary corners are always normalised.
    fn check_bounds_are_normalised(p0: Point, p1: Point) -> Result<(), TestCaseError> {
        let bounds = Bounds::from_points(p0, p1);
        prop_assert!(bounds.left() <= bounds.right());
        prop_assert!(bounds.top() <= bounds.bottom());
        prop_assert!(bounds.width() >= 0.0);
        prop_assert!(bounds.height() >= 0.0);
        Ok(())
    }

    /// Corner order never changes the resulting bounds.
    fn check_bounds_ignore_corner_order(p0: Point, p1: Point) -> Result<(), TestCaseError> {
        prop_assert_eq!(Bounds::from_points(p0, p1), Bounds::from_points(p1, p0));
        Ok(())
    }

    /// Merged bounds contain both originals.
    fn check_merge_contains_both(b1: Bounds, b2: Bounds) -> Result<(), TestCaseError> {
        let merged = b1.merge(&b2);
        prop_assert!(b1.in_container(&merged));
        prop_assert!(b2.in_container(&merged));
        Ok(())
    }

    /// Adding then subtracting a point returns the original.
    fn check_add_sub_inverse(p1: Point, p2: Point) -> Result<(), TestCaseError> {
        let result = p1.add_point(p2).sub_point(p2);
        prop_assert!(approx_eq!(f64, result.x(), p1.x(), epsilon = 1e-9));
        prop_assert!(approx_eq!(f64, result.y(), p1.y(), epsilon = 1e-9));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn bounds_are_normalised(p0 in point_strategy(), p1 in point_strategy()) {
            check_bounds_are_normalised(p0, p1)?;
        }

        #[test]
        fn bounds_ignore_corner_order(p0 in point_strategy(), p1 in point_strategy()) {
            check_bounds_ignore_corner_order(p0, p1)?;
        }

        #[test]
        fn merge_contains_both(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            check_merge_contains_both(b1, b2)?;
        }

        #[test]
        fn add_sub_inverse(p1 in point_strategy(), p2 in point_strategy()) {
            check_add_sub_inverse(p1, p2)?;
        }
    }
}
