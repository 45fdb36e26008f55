//! Affine transforms in SVG's 2×3 matrix form.
//!
//! A [`Transform`] holds the six coefficients of the matrix
//!
//! ```text
//! | a  c  e |
//! | b  d  f |
//! | 0  0  1 |
//! ```
//!
//! and is parsed from, and serialised to, the text used by SVG `transform`
//! attributes and computed CSS transforms.

use std::{fmt, str::FromStr};

use thiserror::Error;

use super::Point;

/// Errors produced when parsing or inverting a [`Transform`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("malformed transform `{transform}`: {reason}")]
    Malformed { transform: String, reason: String },

    #[error("transform is singular and has no inverse")]
    Singular,
}

/// An affine transform.
///
/// Transforms compare exactly: two transforms are equal only when all six
/// coefficients are equal, and [`Transform::is_identity`] uses no tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Creates a transform from its six matrix coefficients.
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Creates a pure translation.
    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Creates a scale about the origin.
    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Returns the coefficients as `[a, b, c, d, e, f]`.
    pub fn as_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Returns the translation component of the transform.
    pub fn translation(&self) -> Point {
        Point::new(self.e, self.f)
    }

    /// Checks for the identity transform.
    ///
    /// The comparison is made on the serialised form so that a transform
    /// which would be written out as the identity is treated as one.
    ///
    /// ```
    /// # use celldl_core::geometry::Transform;
    /// assert!(Transform::translate(0.0, -0.0).is_identity());
    /// assert!(!Transform::translate(0.0, 1e-9).is_identity());
    /// ```
    pub fn is_identity(&self) -> bool {
        self.to_string() == Self::identity().to_string()
    }

    /// Composes `other` with this transform, applying `other` first.
    ///
    /// The result is the matrix product `self × other`, so
    /// `t1.left_multiply(&t2).transform_point(p)` equals
    /// `t1.transform_point(t2.transform_point(p))`.
    pub fn left_multiply(&self, other: &Transform) -> Transform {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Returns the determinant of the linear part of the matrix.
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Computes the inverse transform.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Singular`] when the matrix is not invertible.
    pub fn inverse(&self) -> Result<Transform, TransformError> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(TransformError::Singular);
        }
        Ok(Transform {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }

    /// Maps a point through the transform.
    pub fn transform_point(&self, point: Point) -> Point {
        Point::new(
            self.a * point.x() + self.c * point.y() + self.e,
            self.b * point.x() + self.d * point.y() + self.f,
        )
    }

    /// Maps every point in a slice through the transform.
    pub fn transform_points(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|p| self.transform_point(*p)).collect()
    }
}

/// Writes the transform as `matrix(a, b, c, d, e, f)`.
///
/// Negative zero is written as `0` so that serialised forms compare equal.
impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.as_array().map(|v| v + 0.0);
        write!(f, "matrix({a}, {b}, {c}, {d}, {e}, {g})")
    }
}

/// Parses an SVG transform list.
///
/// An empty string and `none` (the computed-style value for an untransformed
/// shape) both yield the identity.
impl FromStr for Transform {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() || text == "none" {
            return Ok(Self::identity());
        }
        let parsed =
            svgtypes::Transform::from_str(text).map_err(|err| TransformError::Malformed {
                transform: s.to_string(),
                reason: err.to_string(),
            })?;
        Ok(Self::new(
            parsed.a, parsed.b, parsed.c, parsed.d, parsed.e, parsed.f,
        ))
    }
}

/// Maps the segment from `p0` to `p1` onto the unit segment of the x-axis.
///
/// Used to express a point relative to a line: after normalising, `x` is the
/// fraction along the segment and `y` the perpendicular offset in segment
/// lengths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalTransform {
    matrix: Transform,
    inverse: Transform,
}

impl NormalTransform {
    /// Creates the normalising transform for the segment `p0 → p1`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Singular`] when `p0` and `p1` coincide.
    pub fn new(p0: Point, p1: Point) -> Result<Self, TransformError> {
        let translate = Transform::translate(-p0.x(), -p0.y());
        let delta = p1.sub_point(p0);
        let l2 = delta.x() * delta.x() + delta.y() * delta.y();
        if l2 == 0.0 {
            return Err(TransformError::Singular);
        }
        let scale_rotate = Transform::new(
            delta.x() / l2,
            -delta.y() / l2,
            delta.y() / l2,
            delta.x() / l2,
            0.0,
            0.0,
        );
        let matrix = scale_rotate.left_multiply(&translate);
        let inverse = matrix.inverse()?;
        Ok(Self { matrix, inverse })
    }

    /// Maps a point into the segment's normalised space.
    pub fn normalise(&self, point: Point) -> Point {
        self.matrix.transform_point(point)
    }

    /// Maps a normalised point back into diagram space.
    pub fn invert(&self, point: Point) -> Point {
        self.inverse.transform_point(point)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_parse_empty_and_none() {
        assert!(Transform::from_str("").unwrap().is_identity());
        assert!(Transform::from_str("none").unwrap().is_identity());
        assert!(Transform::from_str("  ").unwrap().is_identity());
    }

    #[test]
    fn test_parse_translate() {
        let transform: Transform = "translate(10, 20)".parse().unwrap();
        assert_eq!(transform, Transform::translate(10.0, 20.0));
    }

    #[test]
    fn test_parse_matrix() {
        let transform: Transform = "matrix(2, 0, 0, 3, 4, 5)".parse().unwrap();
        assert_eq!(transform.as_array(), [2.0, 0.0, 0.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_parse_malformed() {
        let err = Transform::from_str("translate(10,").unwrap_err();
        match err {
            TransformError::Malformed { transform, .. } => {
                assert_eq!(transform, "translate(10,");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(Transform::from_str("garbage").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Transform::translate(1.5, -2.0).to_string(),
            "matrix(1, 0, 0, 1, 1.5, -2)"
        );
        assert_eq!(
            Transform::new(1.0, -0.0, 0.0, 1.0, 0.0, 0.0).to_string(),
            "matrix(1, 0, 0, 1, 0, 0)"
        );
    }

    #[test]
    fn test_is_identity_is_exact() {
        assert!(Transform::identity().is_identity());
        assert!(!Transform::new(1.0, 0.0, 0.0, 1.0 + 1e-12, 0.0, 0.0).is_identity());
    }

    #[test]
    fn test_left_multiply_applies_argument_first() {
        let scale = Transform::scale(2.0, 2.0);
        let translate = Transform::translate(10.0, 0.0);

        // Translate, then scale
        let composed = scale.left_multiply(&translate);
        assert_eq!(
            composed.transform_point(Point::new(1.0, 1.0)),
            Point::new(22.0, 2.0)
        );
    }

    #[test]
    fn test_inverse() {
        let transform = Transform::new(2.0, 0.0, 0.0, 4.0, 6.0, 8.0);
        let inverse = transform.inverse().unwrap();
        let p = inverse.transform_point(transform.transform_point(Point::new(3.0, -7.0)));
        assert_approx_eq!(f64, p.x(), 3.0);
        assert_approx_eq!(f64, p.y(), -7.0);
    }

    #[test]
    fn test_inverse_singular() {
        let singular = Transform::new(1.0, 2.0, 2.0, 4.0, 0.0, 0.0);
        assert_eq!(singular.inverse(), Err(TransformError::Singular));
    }

    #[test]
    fn test_transform_points() {
        let transform = Transform::translate(1.0, 1.0);
        let points = transform.transform_points(&[Point::new(0.0, 0.0), Point::new(2.0, 3.0)]);
        assert_eq!(points, vec![Point::new(1.0, 1.0), Point::new(3.0, 4.0)]);
    }

    #[test]
    fn test_normal_transform() {
        let normal = NormalTransform::new(Point::new(10.0, 10.0), Point::new(10.0, 20.0)).unwrap();

        let start = normal.normalise(Point::new(10.0, 10.0));
        assert_approx_eq!(f64, start.x(), 0.0);
        assert_approx_eq!(f64, start.y(), 0.0);

        let end = normal.normalise(Point::new(10.0, 20.0));
        assert_approx_eq!(f64, end.x(), 1.0);
        assert_approx_eq!(f64, end.y(), 0.0, epsilon = 1e-12);

        let back = normal.invert(Point::new(0.5, 0.0));
        assert_approx_eq!(f64, back.x(), 10.0);
        assert_approx_eq!(f64, back.y(), 15.0);
    }

    #[test]
    fn test_normal_transform_degenerate_segment() {
        let p = Point::new(3.0, 3.0);
        assert_eq!(NormalTransform::new(p, p), Err(TransformError::Singular));
    }
}
