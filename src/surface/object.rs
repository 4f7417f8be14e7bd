//! Object types held by the drawing surface.

use bevy::prelude::*;

use crate::constants::{
    POLYGON_STROKE_WIDTH, RECT_SIZE, RECT_STROKE_WIDTH, VERTEX_MARKER_RADIUS,
};
use crate::editor::Swatch;
use crate::editor::geometry::bounds;

/// Identifier assigned by the surface when an object is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fill {
    #[default]
    Transparent,
    Solid(Swatch),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// `None` leaves the outline invisible
    pub stroke: Option<Swatch>,
    pub stroke_width: f32,
    pub fill: Fill,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle from its top-left corner
    Rect { origin: Vec2, size: Vec2 },
    Circle { center: Vec2, radius: f32 },
    /// Closed outline through `points`
    Polygon { points: Vec<Vec2> },
    /// Open freehand stroke
    Path { points: Vec<Vec2> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceObject {
    pub shape: Shape,
    pub style: Style,
    pub selectable: bool,
}

impl SurfaceObject {
    /// The outlined square placed by the rectangle tool, at the surface's
    /// default position (top-left corner).
    pub fn spawned_rect(color: Swatch) -> Self {
        Self {
            shape: Shape::Rect {
                origin: Vec2::ZERO,
                size: Vec2::splat(RECT_SIZE),
            },
            style: Style {
                stroke: Some(color),
                stroke_width: RECT_STROKE_WIDTH,
                fill: Fill::Transparent,
            },
            selectable: true,
        }
    }

    /// Filled dot marking a polygon vertex.
    pub fn vertex_marker(center: Vec2, color: Option<Swatch>) -> Self {
        Self {
            shape: Shape::Circle {
                center,
                radius: VERTEX_MARKER_RADIUS,
            },
            style: Style {
                stroke: color,
                stroke_width: 1.0,
                fill: color.map(Fill::Solid).unwrap_or_default(),
            },
            selectable: false,
        }
    }

    pub fn polygon_outline(points: Vec<Vec2>, color: Option<Swatch>) -> Self {
        Self {
            shape: Shape::Polygon { points },
            style: Style {
                stroke: color,
                stroke_width: POLYGON_STROKE_WIDTH,
                fill: Fill::Transparent,
            },
            selectable: true,
        }
    }

    pub fn freehand_path(points: Vec<Vec2>, color: Swatch, width: f32) -> Self {
        Self {
            shape: Shape::Path { points },
            style: Style {
                stroke: Some(color),
                stroke_width: width,
                fill: Fill::Transparent,
            },
            selectable: true,
        }
    }

    /// Bounding box (min, max corners) including half the stroke width.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let pad = Vec2::splat(self.style.stroke_width / 2.0);
        let (min, max) = match &self.shape {
            Shape::Rect { origin, size } => (*origin, *origin + *size),
            Shape::Circle { center, radius } => {
                (*center - Vec2::splat(*radius), *center + Vec2::splat(*radius))
            }
            Shape::Polygon { points } | Shape::Path { points } => {
                bounds(points).unwrap_or((Vec2::ZERO, Vec2::ZERO))
            }
        };
        (min - pad, max + pad)
    }

    /// Move the object by `delta` in surface units.
    pub fn translate(&mut self, delta: Vec2) {
        match &mut self.shape {
            Shape::Rect { origin, .. } => *origin += delta,
            Shape::Circle { center, .. } => *center += delta,
            Shape::Polygon { points } | Shape::Path { points } => {
                for p in points.iter_mut() {
                    *p += delta;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawned_rect_matches_tool_parameters() {
        let rect = SurfaceObject::spawned_rect(Swatch::Red);
        assert_eq!(
            rect.shape,
            Shape::Rect {
                origin: Vec2::ZERO,
                size: Vec2::new(100.0, 100.0)
            }
        );
        assert_eq!(rect.style.stroke, Some(Swatch::Red));
        assert_eq!(rect.style.stroke_width, 1.0);
        assert_eq!(rect.style.fill, Fill::Transparent);
        assert!(rect.selectable);
    }

    #[test]
    fn test_vertex_marker_is_filled_and_unselectable() {
        let marker = SurfaceObject::vertex_marker(Vec2::new(10.0, 20.0), Some(Swatch::Green));
        assert_eq!(
            marker.shape,
            Shape::Circle {
                center: Vec2::new(10.0, 20.0),
                radius: 4.0
            }
        );
        assert_eq!(marker.style.fill, Fill::Solid(Swatch::Green));
        assert!(!marker.selectable);
    }

    #[test]
    fn test_uncolored_marker_is_transparent() {
        let marker = SurfaceObject::vertex_marker(Vec2::ZERO, None);
        assert_eq!(marker.style.fill, Fill::Transparent);
        assert!(marker.style.stroke.is_none());
    }

    #[test]
    fn test_polygon_outline_style() {
        let outline = SurfaceObject::polygon_outline(vec![Vec2::ZERO; 3], Some(Swatch::Red));
        assert_eq!(outline.style.stroke_width, 1.5);
        assert_eq!(outline.style.fill, Fill::Transparent);
    }

    #[test]
    fn test_translate_moves_every_point() {
        let mut path = SurfaceObject::freehand_path(
            vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)],
            Swatch::Red,
            10.0,
        );
        path.translate(Vec2::new(5.0, 5.0));
        assert_eq!(
            path.shape,
            Shape::Path {
                points: vec![Vec2::new(5.0, 5.0), Vec2::new(15.0, 5.0)]
            }
        );
    }

    #[test]
    fn test_bounds_include_stroke() {
        let rect = SurfaceObject::spawned_rect(Swatch::Red);
        let (min, max) = rect.bounds();
        assert_eq!(min, Vec2::splat(-0.5));
        assert_eq!(max, Vec2::splat(100.5));
    }
}
