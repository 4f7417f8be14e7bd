//! In-memory drawing surface.
//!
//! [`Canvas`] keeps the object list, the selection, the viewport translation,
//! the background and the freehand brush. Besides the [`DrawingSurface`]
//! capabilities it has its own pointer handling (click selection, moving the
//! selection, freehand strokes) which stays active except while freehand
//! drawing.

use bevy::prelude::*;

use crate::constants::FREEHAND_MIN_SPACING;

use super::background::BackgroundImage;
use super::error::SurfaceError;
use super::hit_testing::object_contains;
use super::object::{ObjectId, SurfaceObject};
use super::raster;
use super::{Brush, DrawingSurface, RasterFormat, SurfaceCursor};

/// What the surface's own pointer handling is doing between press and release
#[derive(Debug, Clone, PartialEq, Default)]
enum Interaction {
    #[default]
    Idle,
    Stroke(Vec<Vec2>),
    MovingSelection,
}

#[derive(Resource, Debug)]
pub struct Canvas {
    size: UVec2,
    objects: Vec<(ObjectId, SurfaceObject)>,
    next_id: u64,
    selection: Vec<ObjectId>,
    viewport: Vec2,
    background: Option<BackgroundImage>,
    background_generation: u64,
    brush: Option<Brush>,
    cursor: SurfaceCursor,
    render_requests: u64,
    interaction: Interaction,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: UVec2::new(width, height),
            objects: Vec::new(),
            next_id: 1,
            selection: Vec::new(),
            viewport: Vec2::ZERO,
            background: None,
            background_generation: 0,
            brush: None,
            cursor: SurfaceCursor::Default,
            render_requests: 0,
            interaction: Interaction::Idle,
        }
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &SurfaceObject)> {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    pub fn object(&self, id: ObjectId) -> Option<&SurfaceObject> {
        self.objects
            .iter()
            .find(|(oid, _)| *oid == id)
            .map(|(_, object)| object)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn is_selected(&self, id: ObjectId) -> bool {
        self.selection.contains(&id)
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Convert a position on the surface element to scene coordinates.
    pub fn to_scene(&self, screen: Vec2) -> Vec2 {
        screen - self.viewport
    }

    /// Convert a scene position to a position on the surface element.
    pub fn to_screen(&self, scene: Vec2) -> Vec2 {
        scene + self.viewport
    }

    /// Whether a position on the surface element lies inside it.
    pub fn contains_screen(&self, screen: Vec2) -> bool {
        screen.x >= 0.0
            && screen.y >= 0.0
            && screen.x < self.size.x as f32
            && screen.y < self.size.y as f32
    }

    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    /// Bumped every time the background is replaced
    pub fn background_generation(&self) -> u64 {
        self.background_generation
    }

    pub fn brush(&self) -> Option<Brush> {
        self.brush
    }

    pub fn cursor(&self) -> SurfaceCursor {
        self.cursor
    }

    /// Bumped on every add, remove, move and pan. The renderer re-syncs the
    /// background sprite only when this or the background generation moves.
    pub fn render_requests(&self) -> u64 {
        self.render_requests
    }

    /// Points of the freehand stroke in progress, if any.
    pub fn current_stroke(&self) -> Option<&[Vec2]> {
        match &self.interaction {
            Interaction::Stroke(points) => Some(points),
            _ => None,
        }
    }

    /// Topmost selectable object under a scene position.
    pub fn hit_test(&self, point: Vec2) -> Option<ObjectId> {
        self.objects
            .iter()
            .rev()
            .find(|(_, object)| object.selectable && object_contains(object, point))
            .map(|(id, _)| *id)
    }

    /// Replace the selection with `id`, or toggle it when `additive`.
    pub fn select(&mut self, id: ObjectId, additive: bool) {
        if additive {
            if let Some(index) = self.selection.iter().position(|s| *s == id) {
                self.selection.remove(index);
            } else {
                self.selection.push(id);
            }
        } else {
            self.selection.clear();
            self.selection.push(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Pointer pressed at a scene position.
    pub fn handle_press(&mut self, point: Vec2, additive: bool) {
        if self.brush.is_some() {
            self.interaction = Interaction::Stroke(vec![point]);
            return;
        }

        match self.hit_test(point) {
            Some(id) => {
                if additive || !self.is_selected(id) {
                    self.select(id, additive);
                }
                self.interaction = if self.is_selected(id) {
                    Interaction::MovingSelection
                } else {
                    Interaction::Idle
                };
            }
            None => {
                if !additive {
                    self.clear_selection();
                }
                self.interaction = Interaction::Idle;
            }
        }
    }

    /// Pointer moved to a scene position while pressed.
    pub fn handle_drag(&mut self, point: Vec2, delta: Vec2) {
        match &mut self.interaction {
            Interaction::Stroke(points) => {
                if points
                    .last()
                    .is_some_and(|last| point.distance(*last) > FREEHAND_MIN_SPACING)
                {
                    points.push(point);
                }
            }
            Interaction::MovingSelection => {
                if delta == Vec2::ZERO {
                    return;
                }
                for (id, object) in self.objects.iter_mut() {
                    if self.selection.contains(id) {
                        object.translate(delta);
                    }
                }
                self.request_render();
            }
            Interaction::Idle => {}
        }
    }

    /// Pointer released. A finished freehand stroke becomes a path object.
    pub fn handle_release(&mut self) -> Option<ObjectId> {
        let interaction = std::mem::take(&mut self.interaction);
        let Interaction::Stroke(points) = interaction else {
            return None;
        };
        let brush = self.brush?;
        if points.len() < 2 {
            return None;
        }
        Some(self.add_object(SurfaceObject::freehand_path(
            points,
            brush.color,
            brush.width,
        )))
    }

    fn objects_changed(&mut self) {
        self.request_render();
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(
            crate::constants::SURFACE_WIDTH,
            crate::constants::SURFACE_HEIGHT,
        )
    }
}

impl DrawingSurface for Canvas {
    fn add_object(&mut self, object: SurfaceObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push((id, object));
        self.objects_changed();
        id
    }

    fn remove_object(&mut self, id: ObjectId) -> Option<SurfaceObject> {
        let index = self.objects.iter().position(|(oid, _)| *oid == id)?;
        let (_, object) = self.objects.remove(index);
        self.selection.retain(|s| *s != id);
        self.objects_changed();
        Some(object)
    }

    fn remove_all_objects(&mut self) -> usize {
        let removed = self.objects.len();
        self.objects.clear();
        self.selection.clear();
        self.interaction = Interaction::Idle;
        self.objects_changed();
        removed
    }

    fn selected_objects(&self) -> Vec<ObjectId> {
        self.selection.clone()
    }

    fn set_background_image(&mut self, background: Option<BackgroundImage>) {
        self.background = background;
        self.background_generation += 1;
    }

    fn pan_viewport_by(&mut self, delta: Vec2) {
        self.viewport += delta;
        self.request_render();
    }

    fn set_freehand_mode(&mut self, brush: Option<Brush>) {
        if brush.is_some() {
            self.clear_selection();
        }
        if brush.is_none() && matches!(self.interaction, Interaction::Stroke(_)) {
            self.interaction = Interaction::Idle;
        }
        self.brush = brush;
        self.cursor = if brush.is_some() {
            SurfaceCursor::Crosshair
        } else {
            SurfaceCursor::Default
        };
    }

    fn set_cursor(&mut self, cursor: SurfaceCursor) {
        self.cursor = cursor;
    }

    fn export_raster(&self, format: RasterFormat, quality: f32) -> Result<Vec<u8>, SurfaceError> {
        let pixels = raster::render(self);
        raster::encode(&pixels, format, quality)
    }

    fn request_render(&mut self) {
        self.render_requests += 1;
    }
}
