//! Drawing surface: the capability the editor draws through.
//!
//! ## Module Structure
//!
//! - [`object`] - Object types (rectangles, markers, polygons, freehand paths)
//! - [`canvas`] - The in-memory [`Canvas`] surface and its pointer handling
//! - [`hit_testing`] - Picking objects under the pointer
//! - [`raster`] - Software rasterisation, JPEG encoding and data URLs
//! - [`background`] - Background sources and async loading
//! - [`rendering`] - Bevy camera, gizmo and sprite systems that display the canvas

pub mod background;
mod canvas;
mod error;
mod hit_testing;
mod object;
pub mod raster;
mod rendering;

pub use background::{BackgroundImage, BackgroundSource, LoadBackgroundRequest};
pub use canvas::Canvas;
pub use error::SurfaceError;
pub use object::{Fill, ObjectId, Shape, SurfaceObject};
pub use rendering::SurfacePointer;

use bevy::prelude::*;

use crate::editor::Swatch;

/// Freehand brush settings. Freehand mode is on while a brush is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub width: f32,
    pub color: Swatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceCursor {
    #[default]
    Default,
    Grab,
    Crosshair,
}

/// Raster encodings offered by [`DrawingSurface::export_raster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterFormat {
    #[default]
    Jpeg,
}

impl RasterFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            RasterFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            RasterFormat::Jpeg => "jpeg",
        }
    }
}

/// Operations the editor needs from a drawing surface.
///
/// Any retained-mode 2D surface satisfying this set can stand in for
/// [`Canvas`].
pub trait DrawingSurface {
    fn add_object(&mut self, object: SurfaceObject) -> ObjectId;

    /// Remove one object. Returns `None` if it was already gone.
    fn remove_object(&mut self, id: ObjectId) -> Option<SurfaceObject>;

    /// Remove every object. The background is not an object and stays.
    fn remove_all_objects(&mut self) -> usize;

    fn selected_objects(&self) -> Vec<ObjectId>;

    fn set_background_image(&mut self, background: Option<BackgroundImage>);

    /// Translate the visible viewport by `delta` (relative pan).
    fn pan_viewport_by(&mut self, delta: Vec2);

    /// `Some` enters freehand mode with that brush, `None` leaves it.
    fn set_freehand_mode(&mut self, brush: Option<Brush>);

    fn set_cursor(&mut self, cursor: SurfaceCursor);

    fn export_raster(&self, format: RasterFormat, quality: f32) -> Result<Vec<u8>, SurfaceError>;

    fn request_render(&mut self);
}

pub struct SurfacePlugin;

impl Plugin for SurfacePlugin {
    fn build(&self, app: &mut App) {
        // The one 500x500 surface, re-rendered on every add/remove
        app.insert_resource(Canvas::default())
            .add_message::<LoadBackgroundRequest>()
            // Register surface gizmo groups
            .init_gizmo_group::<rendering::SurfaceGizmoGroup>()
            .init_gizmo_group::<rendering::ThinGizmoGroup>()
            .init_gizmo_group::<rendering::BrushGizmoGroup>()
            .add_systems(
                Startup,
                (
                    rendering::spawn_surface_camera,
                    rendering::spawn_surface_backdrop,
                    rendering::configure_surface_gizmos,
                ),
            )
            .add_systems(
                Update,
                (
                    background::start_background_loads.run_if(on_message::<LoadBackgroundRequest>),
                    background::poll_background_loads,
                    rendering::sync_background_sprite,
                    rendering::render_objects,
                    rendering::render_stroke_preview,
                    rendering::render_selection,
                    rendering::update_surface_cursor,
                ),
            );
    }
}

#[cfg(test)]
mod tests;
