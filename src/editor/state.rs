//! Editor state snapshot and its transitions.
//!
//! [`EditorState`] is a plain value. Every event produces a new snapshot via
//! [`EditorState::apply`], so the state machine can be exercised without a
//! drawing surface.

use std::path::PathBuf;

use bevy::prelude::*;

use super::geometry::closes_polygon;
use super::mode::{Mode, Swatch};

/// Inputs that change the editor state.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ToggleMode(Mode),
    SelectDrawingColor(Swatch),
    SelectRectColor(Swatch),
    SelectPolygonColor(Swatch),
    /// Pointer pressed at a surface (scene) position
    PointerDown(Vec2),
    PointerUp,
    /// A local image file was chosen as the new background
    ImageUploaded(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditorState {
    pub mode: Mode,
    /// True between a pointer-down and the next pointer-up
    pub pointer_down: bool,
    pub drawing_color: Swatch,
    /// Consumed by the next rectangle spawn
    pub rect_color: Option<Swatch>,
    pub polygon_color: Option<Swatch>,
    pub polygon_vertices: Vec<Vec2>,
    pub polygon_completed: bool,
    /// Path of the most recently uploaded background image
    pub background_upload: Option<PathBuf>,
}

impl EditorState {
    #[must_use]
    pub fn apply(&self, event: &EditorEvent) -> EditorState {
        match event {
            EditorEvent::ToggleMode(mode) => self.toggle_mode(*mode),
            EditorEvent::SelectDrawingColor(color) => EditorState {
                drawing_color: *color,
                ..self.clone()
            },
            EditorEvent::SelectRectColor(color) => EditorState {
                rect_color: Some(*color),
                ..self.clone()
            },
            EditorEvent::SelectPolygonColor(color) => EditorState {
                polygon_color: Some(*color),
                ..self.clone()
            },
            EditorEvent::PointerDown(position) => {
                let pressed = EditorState {
                    pointer_down: true,
                    ..self.clone()
                };
                if pressed.accepts_vertices() {
                    pressed.place_vertex(*position)
                } else {
                    pressed
                }
            }
            EditorEvent::PointerUp => EditorState {
                pointer_down: false,
                ..self.clone()
            },
            EditorEvent::ImageUploaded(path) => EditorState {
                background_upload: Some(path.clone()),
                ..self.clone()
            },
        }
    }

    /// Toggle `mode`: activate it, or fall back to [`Mode::None`] if it is
    /// already active. Leaving polygon mode discards the polygon in progress.
    #[must_use]
    pub fn toggle_mode(&self, mode: Mode) -> EditorState {
        let next_mode = mode.toggled_from(self.mode);
        let mut next = EditorState {
            mode: next_mode,
            ..self.clone()
        };
        if self.mode == Mode::Polygon && next_mode != Mode::Polygon {
            next.polygon_vertices.clear();
            next.polygon_completed = false;
        }
        next
    }

    /// Whether a pointer-down should be treated as a polygon vertex click.
    pub fn accepts_vertices(&self) -> bool {
        self.mode == Mode::Polygon && !self.polygon_completed
    }

    /// Append `position` as a vertex, or complete the polygon if the click
    /// lands on the first vertex. The closing click is not appended.
    #[must_use]
    pub fn place_vertex(&self, position: Vec2) -> EditorState {
        if !self.accepts_vertices() {
            return self.clone();
        }

        let mut next = self.clone();
        if closes_polygon(&self.polygon_vertices, position) {
            next.polygon_completed = true;
        } else {
            next.polygon_vertices.push(position);
        }
        next
    }

    /// Snapshot with the rectangle color spent.
    #[must_use]
    pub fn consume_rect_color(&self) -> EditorState {
        EditorState {
            rect_color: None,
            ..self.clone()
        }
    }
}

/// Which reactions a transition from one snapshot to another triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateChanges {
    /// Mode, drawing color, rectangle color or uploaded background changed
    pub mode_entry: bool,
    /// Vertices, polygon color, completion or mode changed
    pub polygon: bool,
}

impl StateChanges {
    pub fn between(previous: &EditorState, next: &EditorState) -> Self {
        let mode_changed = previous.mode != next.mode;
        Self {
            mode_entry: mode_changed
                || previous.drawing_color != next.drawing_color
                || previous.rect_color != next.rect_color
                || previous.background_upload != next.background_upload,
            polygon: mode_changed
                || previous.polygon_vertices != next.polygon_vertices
                || previous.polygon_color != next.polygon_color
                || previous.polygon_completed != next.polygon_completed,
        }
    }

    pub fn any(&self) -> bool {
        self.mode_entry || self.polygon
    }
}
