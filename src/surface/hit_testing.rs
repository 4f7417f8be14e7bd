//! Hit testing functions for picking surface objects.

use bevy::prelude::*;

use crate::constants::MIN_HIT_TOLERANCE;

use super::object::{Shape, SurfaceObject};

/// Check if a point is within a given distance of a line segment
pub fn point_near_segment(point: Vec2, seg_start: Vec2, seg_end: Vec2, threshold: f32) -> bool {
    let line_vec = seg_end - seg_start;
    let line_len_sq = line_vec.length_squared();

    if line_len_sq < 0.0001 {
        // Segment is essentially a point
        return point.distance(seg_start) <= threshold;
    }

    // Project point onto line, clamped to segment
    let t = ((point - seg_start).dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    let projection = seg_start + line_vec * t;

    point.distance(projection) <= threshold
}

/// Check if a point lies inside a closed polygon (even-odd rule)
pub fn point_in_polygon(point: Vec2, vertices: &[Vec2]) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > point.y) != (vj.y > point.y)
            && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Check if a point is near an open polyline
pub fn point_near_polyline(point: Vec2, points: &[Vec2], threshold: f32) -> bool {
    match points {
        [] => false,
        [only] => point.distance(*only) <= threshold,
        _ => points
            .windows(2)
            .any(|w| point_near_segment(point, w[0], w[1], threshold)),
    }
}

/// Check if a click at `point` picks `object`.
///
/// Closed shapes are picked anywhere inside their area, including transparent
/// fills. Freehand paths are picked near the stroke.
pub fn object_contains(object: &SurfaceObject, point: Vec2) -> bool {
    let tolerance = (object.style.stroke_width / 2.0).max(MIN_HIT_TOLERANCE);
    match &object.shape {
        Shape::Rect { origin, size } => {
            let min = *origin - Vec2::splat(tolerance);
            let max = *origin + *size + Vec2::splat(tolerance);
            point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
        }
        Shape::Circle { center, radius } => point.distance(*center) <= radius + tolerance,
        Shape::Polygon { points } => {
            point_in_polygon(point, points)
                || points
                    .iter()
                    .zip(points.iter().cycle().skip(1))
                    .any(|(a, b)| point_near_segment(point, *a, *b, tolerance))
        }
        Shape::Path { points } => point_near_polyline(point, points, tolerance),
    }
}
