//! Polygon geometry used by the polygon tool.

use bevy::prelude::*;

use crate::constants::{CLOSURE_RADIUS, MIN_CLOSABLE_VERTICES};

/// Check whether a click at `pointer` closes the polygon traced by `vertices`.
///
/// Closure is only considered once the polygon has at least three vertices,
/// and the click must land within [`CLOSURE_RADIUS`] of the first one
/// (boundary inclusive).
pub fn closes_polygon(vertices: &[Vec2], pointer: Vec2) -> bool {
    if vertices.len() < MIN_CLOSABLE_VERTICES {
        return false;
    }
    vertices[0].distance(pointer) <= CLOSURE_RADIUS
}

/// Axis-aligned bounds of a point set (min, max corners)
pub fn bounds(points: &[Vec2]) -> Option<(Vec2, Vec2)> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold((first, first), |(min, max), &p| (min.min(p), max.max(p))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Vec2> {
        vec![
            Vec2::new(100.0, 100.0),
            Vec2::new(200.0, 100.0),
            Vec2::new(200.0, 200.0),
        ]
    }

    #[test]
    fn test_click_near_first_vertex_closes() {
        // distance ~7.07
        assert!(closes_polygon(&triangle(), Vec2::new(105.0, 103.0)));
    }

    #[test]
    fn test_click_far_from_first_vertex_does_not_close() {
        // distance ~212
        assert!(!closes_polygon(&triangle(), Vec2::new(250.0, 250.0)));
    }

    #[test]
    fn test_closure_radius_is_inclusive() {
        assert!(closes_polygon(&triangle(), Vec2::new(115.0, 100.0)));
        assert!(!closes_polygon(&triangle(), Vec2::new(115.01, 100.0)));
    }

    #[test]
    fn test_two_vertices_never_close() {
        let vertices = vec![Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0)];
        assert!(!closes_polygon(&vertices, Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn test_empty_polygon_never_closes() {
        assert!(!closes_polygon(&[], Vec2::ZERO));
    }

    #[test]
    fn test_bounds() {
        let (min, max) = bounds(&triangle()).unwrap();
        assert_eq!(min, Vec2::new(100.0, 100.0));
        assert_eq!(max, Vec2::new(200.0, 200.0));
        assert!(bounds(&[]).is_none());
    }
}
