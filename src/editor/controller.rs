//! Editor controller: applies state transitions and runs their reactions
//! against a drawing surface.
//!
//! Every handler takes the surface as an `Option`. Without a surface the
//! state still advances but nothing is drawn, so input that arrives before
//! the surface is mounted is harmless.

use bevy::prelude::*;

use crate::constants::BRUSH_WIDTH;
use crate::surface::raster::data_url;
use crate::surface::{
    BackgroundSource, Brush, DrawingSurface, ObjectId, RasterFormat, SurfaceCursor,
    SurfaceError, SurfaceObject,
};

use super::handlers::HandlerSet;
use super::mode::Mode;
use super::state::{EditorEvent, EditorState, StateChanges};

/// Side effects the controller leaves to the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Background to load asynchronously and set on the surface
    pub background_reload: Option<BackgroundSource>,
}

/// An encoded export of the surface.
#[derive(Debug, Clone)]
pub struct Export {
    pub format: RasterFormat,
    pub bytes: Vec<u8>,
    pub data_url: String,
}

#[derive(Resource, Debug)]
pub struct EditorController {
    state: EditorState,
    handlers: HandlerSet,
    /// Markers and outline drawn for the polygon in progress
    overlay: Vec<ObjectId>,
    default_background: BackgroundSource,
}

impl EditorController {
    pub fn new(default_background: BackgroundSource) -> Self {
        let state = EditorState::default();
        Self {
            handlers: HandlerSet::for_state(&state),
            state,
            overlay: Vec::new(),
            default_background,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn handlers(&self) -> HandlerSet {
        self.handlers
    }

    pub fn set_default_background(&mut self, source: BackgroundSource) {
        self.default_background = source;
    }

    /// The uploaded background if there is one, otherwise the configured default.
    pub fn background_source(&self) -> BackgroundSource {
        self.state
            .background_upload
            .clone()
            .map(BackgroundSource::File)
            .unwrap_or_else(|| self.default_background.clone())
    }

    /// Run the initial mode-entry pass once the surface exists.
    pub fn mount(&mut self, surface: &mut dyn DrawingSurface) -> Outcome {
        let outcome = self.enter_mode(surface);
        self.redraw_polygon(surface);
        outcome
    }

    pub fn dispatch(
        &mut self,
        event: &EditorEvent,
        surface: Option<&mut dyn DrawingSurface>,
    ) -> Outcome {
        let next = self.state.apply(event);
        let changes = StateChanges::between(&self.state, &next);

        if self.state.mode != next.mode {
            debug!("Mode {} -> {}", self.state.mode.display_name(), next.mode.display_name());
        }
        self.state = next;
        self.handlers = HandlerSet::for_state(&self.state);

        let Some(surface) = surface else {
            return Outcome::default();
        };

        let mut outcome = Outcome::default();
        if changes.mode_entry {
            outcome = self.enter_mode(surface);
        }
        if changes.polygon {
            self.redraw_polygon(surface);
        }
        outcome
    }

    /// Pointer moved by `delta`. Returns whether the viewport was panned.
    pub fn pointer_move(&mut self, delta: Vec2, surface: Option<&mut dyn DrawingSurface>) -> bool {
        if !self.handlers.pans(self.state.pointer_down) {
            return false;
        }
        let Some(surface) = surface else {
            return false;
        };
        surface.pan_viewport_by(delta);
        true
    }

    /// Remove every selected object. Returns how many were removed.
    pub fn delete_selection(&mut self, surface: Option<&mut dyn DrawingSurface>) -> usize {
        let Some(surface) = surface else {
            return 0;
        };
        surface
            .selected_objects()
            .into_iter()
            .filter(|id| surface.remove_object(*id).is_some())
            .count()
    }

    /// Remove every object. The background stays.
    pub fn clear(&mut self, surface: Option<&mut dyn DrawingSurface>) -> usize {
        let Some(surface) = surface else {
            return 0;
        };
        self.overlay.clear();
        surface.remove_all_objects()
    }

    pub fn export(
        &self,
        surface: &dyn DrawingSurface,
        quality: f32,
    ) -> Result<Export, SurfaceError> {
        let format = RasterFormat::Jpeg;
        let bytes = surface.export_raster(format, quality)?;
        Ok(Export {
            format,
            data_url: data_url(format, &bytes),
            bytes,
        })
    }

    fn enter_mode(&mut self, surface: &mut dyn DrawingSurface) -> Outcome {
        surface.set_freehand_mode(None);
        surface.set_cursor(SurfaceCursor::Default);

        match self.state.mode {
            Mode::Drag => surface.set_cursor(SurfaceCursor::Grab),
            Mode::Draw => {
                if let Some(color) = self.handlers.freehand {
                    surface.set_freehand_mode(Some(Brush {
                        width: BRUSH_WIDTH,
                        color,
                    }));
                    surface.request_render();
                }
            }
            Mode::Spawn => {
                if let Some(color) = self.state.rect_color {
                    surface.add_object(SurfaceObject::spawned_rect(color));
                }
                // Spent whether or not a rectangle was placed
                self.state = self.state.consume_rect_color();
            }
            Mode::Polygon | Mode::None => {}
        }

        Outcome {
            background_reload: Some(self.background_source()),
        }
    }

    fn redraw_polygon(&mut self, surface: &mut dyn DrawingSurface) {
        if self.state.mode != Mode::Polygon || self.state.polygon_vertices.is_empty() {
            // What was drawn stays on the surface
            self.overlay.clear();
            return;
        }

        for id in self.overlay.drain(..) {
            surface.remove_object(id);
        }

        let color = self.state.polygon_color;
        for vertex in &self.state.polygon_vertices {
            let id = surface.add_object(SurfaceObject::vertex_marker(*vertex, color));
            self.overlay.push(id);
        }
        if self.state.polygon_completed {
            let id = surface.add_object(SurfaceObject::polygon_outline(
                self.state.polygon_vertices.clone(),
                color,
            ));
            self.overlay.push(id);
        }
    }
}

impl Default for EditorController {
    fn default() -> Self {
        Self::new(BackgroundSource::parse(
            crate::constants::DEFAULT_BACKGROUND_SOURCE,
        ))
    }
}
