//! Connection paths that follow the elements they join.

use log::trace;
use svg::node::{Value, element::path::Data};
use svgtypes::{SimplePathSegment, SimplifyingPathParser};

use celldl_core::{
    geometry::{Bounds, Point},
    identifier::Id,
};

use super::{ConnectedPath, GraphicElement};
use crate::{
    error::CellDLError,
    surface::{RenderSurface, ShapeId},
};

/// The end of a connection's path attached to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathEnd {
    Source,
    Target,
}

impl PathEnd {
    fn name(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Target => "target",
        }
    }
}

/// One end of a connection, registered on the element it is attached to.
///
/// When the element's geometry changes, the matching end point of the
/// connection's path keeps its relative position within the element's
/// bounds. Only an end lying within the element's splay region is moved.
/// Path coordinates are taken to be diagram coordinates.
#[derive(Debug, Clone)]
pub struct ConnectionEnd {
    connection: Id,
    shape: ShapeId,
    end: PathEnd,
}

impl ConnectionEnd {
    pub fn new(connection: Id, shape: ShapeId, end: PathEnd) -> Self {
        Self {
            connection,
            shape,
            end,
        }
    }

    /// Key the end is registered under, unique per connection and end.
    pub fn key(&self) -> String {
        format!("{}:{}", self.connection, self.end.name())
    }

    fn parse(&self, data: &str) -> Result<Vec<SimplePathSegment>, CellDLError> {
        SimplifyingPathParser::from(data)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CellDLError::InvalidPath {
                id: self.connection,
                reason: e.to_string(),
            })
    }
}

impl ConnectedPath for ConnectionEnd {
    fn component_resized(
        &mut self,
        surface: &mut dyn RenderSurface,
        component: &GraphicElement,
        previous: Bounds,
    ) -> Result<(), CellDLError> {
        let Some(data) = surface.attribute(self.shape, "d") else {
            return Ok(());
        };
        let mut segments = self.parse(&data)?;
        let index = match self.end {
            PathEnd::Source => segments.iter().position(|s| end_point(s).is_some()),
            PathEnd::Target => segments.iter().rposition(|s| end_point(s).is_some()),
        };
        let Some((index, point)) = index.and_then(|i| end_point(&segments[i]).map(|p| (i, p))) else {
            return Ok(());
        };

        let padding = component.splay_padding();
        let region = Bounds::new(
            previous.left() - padding.x(),
            previous.top() - padding.y(),
            previous.right() + padding.x(),
            previous.bottom() + padding.y(),
        );
        if !Bounds::from_points(point, point).in_container(&region) {
            trace!(
                id = self.connection.to_string(),
                end = self.end.name();
                "Path end is clear of element"
            );
            return Ok(());
        }

        let current = component.bounds();
        let moved = Point::new(
            rescale(point.x(), previous.left(), previous.width(), current.left(), current.width()),
            rescale(point.y(), previous.top(), previous.height(), current.top(), current.height()),
        );
        if moved == point {
            return Ok(());
        }
        set_end_point(&mut segments[index], moved);
        surface.set_attribute(self.shape, "d", &path_data(&segments));
        trace!(
            id = self.connection.to_string(),
            end = self.end.name(),
            x = moved.x(),
            y = moved.y();
            "Moved path end"
        );
        Ok(())
    }
}

fn end_point(segment: &SimplePathSegment) -> Option<Point> {
    match *segment {
        SimplePathSegment::MoveTo { x, y }
        | SimplePathSegment::LineTo { x, y }
        | SimplePathSegment::CurveTo { x, y, .. }
        | SimplePathSegment::Quadratic { x, y, .. } => Some(Point::new(x, y)),
        SimplePathSegment::ClosePath => None,
    }
}

fn set_end_point(segment: &mut SimplePathSegment, point: Point) {
    match segment {
        SimplePathSegment::MoveTo { x, y }
        | SimplePathSegment::LineTo { x, y }
        | SimplePathSegment::CurveTo { x, y, .. }
        | SimplePathSegment::Quadratic { x, y, .. } => {
            *x = point.x();
            *y = point.y();
        }
        SimplePathSegment::ClosePath => {}
    }
}

/// Maps `value` from one extent onto another, translating if the first is empty.
fn rescale(value: f64, start: f64, extent: f64, new_start: f64, new_extent: f64) -> f64 {
    if extent == 0.0 {
        new_start + (value - start)
    } else {
        new_start + (value - start) * new_extent / extent
    }
}

fn path_data(segments: &[SimplePathSegment]) -> String {
    let data = segments.iter().fold(Data::new(), |data, segment| match *segment {
        SimplePathSegment::MoveTo { x, y } => data.move_to((x, y)),
        SimplePathSegment::LineTo { x, y } => data.line_to((x, y)),
        SimplePathSegment::CurveTo {
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        } => data.cubic_curve_to((x1, y1, x2, y2, x, y)),
        SimplePathSegment::Quadratic { x1, y1, x, y } => data.quadratic_curve_to((x1, y1, x, y)),
        SimplePathSegment::ClosePath => data.close(),
    });
    Value::from(data).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_data_is_absolute() {
        let segments = SimplifyingPathParser::from("m 10 20 h 30 v 5 z")
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(path_data(&segments), "M10,20 L40,20 L40,25 z");
    }

    #[test]
    fn test_rescale() {
        assert_eq!(rescale(100.0, 0.0, 100.0, 0.0, 120.0), 120.0);
        assert_eq!(rescale(50.0, 0.0, 100.0, 10.0, 100.0), 60.0);
        assert_eq!(rescale(5.0, 5.0, 0.0, 8.0, 0.0), 8.0);
    }

    #[test]
    fn test_key() {
        let end = ConnectionEnd::new(Id::new("k1"), ShapeId::new(3), PathEnd::Target);
        assert_eq!(end.key(), "k1:target");
    }
}
