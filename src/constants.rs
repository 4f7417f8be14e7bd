//! Centralized constants used across the application.
//!
//! Surface dimensions and tool parameters live here so the editor, the
//! surface and the renderer agree on them.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 860.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 600.0;

/// Width of the sidebar panel in logical pixels
pub const SIDEBAR_WIDTH: f32 = 180.0;

/// Drawing surface size in logical units
pub const SURFACE_WIDTH: u32 = 500;
pub const SURFACE_HEIGHT: u32 = 500;

/// Freehand brush width
pub const BRUSH_WIDTH: f32 = 10.0;

/// Side length of a spawned rectangle
pub const RECT_SIZE: f32 = 100.0;

/// Stroke width of a spawned rectangle
pub const RECT_STROKE_WIDTH: f32 = 1.0;

/// Distance from the first vertex within which a click closes a polygon
pub const CLOSURE_RADIUS: f32 = 15.0;

/// Vertices required before closure is checked
pub const MIN_CLOSABLE_VERTICES: usize = 3;

/// Radius of the marker drawn on each polygon vertex
pub const VERTEX_MARKER_RADIUS: f32 = 4.0;

/// Stroke width of a completed polygon outline
pub const POLYGON_STROKE_WIDTH: f32 = 1.5;

/// Default JPEG export quality (0.0 - 1.0)
pub const DEFAULT_EXPORT_QUALITY: f32 = 0.8;

/// Minimum distance between consecutive freehand points
pub const FREEHAND_MIN_SPACING: f32 = 2.0;

/// Minimum pick radius for thin outlines
pub const MIN_HIT_TOLERANCE: f32 = 4.0;

/// Background source used until the user uploads an image
pub const DEFAULT_BACKGROUND_SOURCE: &str =
    "https://media.forgecdn.net/avatars/107/154/636364134932167010.jpeg";
