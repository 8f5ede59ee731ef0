//! Orthogonal (Manhattan) wire routing.

use kurbo::{BezPath, Point};
use serde::{Deserialize, Serialize};

/// A two-segment orthogonal polyline: start, elbow, end.
///
/// Both segments are axis-aligned, so the combined segment length always
/// equals the Manhattan distance between start and end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrthogonalPath {
    pub points: [Point; 3],
}

impl OrthogonalPath {
    /// The start point.
    pub fn start(&self) -> Point {
        self.points[0]
    }

    /// The elbow where the path turns.
    pub fn elbow(&self) -> Point {
        self.points[1]
    }

    /// The end point.
    pub fn end(&self) -> Point {
        self.points[2]
    }

    /// Total length of both segments.
    pub fn manhattan_length(&self) -> f64 {
        let [a, m, b] = self.points;
        (m.x - a.x).abs() + (m.y - a.y).abs() + (b.x - m.x).abs() + (b.y - m.y).abs()
    }

    /// True when start and end coincide.
    pub fn is_degenerate(&self) -> bool {
        self.manhattan_length() == 0.0
    }

    /// Convert to a kurbo path for a rendering collaborator.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.points[0]);
        path.line_to(self.points[1]);
        path.line_to(self.points[2]);
        path
    }
}

/// Build the L-shaped path between two points.
///
/// Horizontal-first runs along y = a.y then turns at `(b.x, a.y)`;
/// vertical-first runs along x = a.x and turns at `(a.x, b.y)`.
fn elbow_path(a: Point, b: Point, horizontal_first: bool) -> OrthogonalPath {
    let elbow = if horizontal_first {
        Point::new(b.x, a.y)
    } else {
        Point::new(a.x, b.y)
    };
    OrthogonalPath {
        points: [a, elbow, b],
    }
}

/// Route between two arbitrary points with a single elbow, picking the
/// candidate whose total length is no longer than the other's.
///
/// Ties favor horizontal-first. Pure function; used for committed wires and
/// for the live preview during a connection drag.
pub fn best_orthogonal_path(a: Point, b: Point) -> OrthogonalPath {
    let horizontal = elbow_path(a, b, true);
    let vertical = elbow_path(a, b, false);
    if horizontal.manhattan_length() <= vertical.manhattan_length() {
        horizontal
    } else {
        vertical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_equals_manhattan_distance() {
        let cases = [
            (Point::new(0.0, 0.0), Point::new(100.0, 60.0)),
            (Point::new(300.0, 160.0), Point::new(420.0, 160.0)),
            (Point::new(50.0, 200.0), Point::new(50.0, 40.0)),
            (Point::new(-20.0, 10.0), Point::new(35.0, -80.0)),
        ];
        for (a, b) in cases {
            let path = best_orthogonal_path(a, b);
            let expected = (a.x - b.x).abs() + (a.y - b.y).abs();
            assert!((path.manhattan_length() - expected).abs() < 1e-9);
            assert_eq!(path.start(), a);
            assert_eq!(path.end(), b);
        }
    }

    #[test]
    fn test_tie_prefers_horizontal_first() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 60.0);
        let path = best_orthogonal_path(a, b);
        assert_eq!(path.elbow(), Point::new(100.0, 0.0));
    }

    #[test]
    fn test_collinear_points() {
        let a = Point::new(0.0, 40.0);
        let b = Point::new(120.0, 40.0);
        let path = best_orthogonal_path(a, b);
        // Horizontal run: the elbow collapses onto the end point.
        assert_eq!(path.elbow(), b);
        assert!((path.manhattan_length() - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_path() {
        let a = Point::new(60.0, 60.0);
        let path = best_orthogonal_path(a, a);
        assert!(path.is_degenerate());
    }

    #[test]
    fn test_to_bez_path_segments() {
        let path = best_orthogonal_path(Point::new(0.0, 0.0), Point::new(40.0, 40.0));
        let bez = path.to_bez_path();
        // MoveTo + two LineTo.
        assert_eq!(bez.elements().len(), 3);
    }
}
