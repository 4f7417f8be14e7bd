//! Bevy systems that display the canvas.
//!
//! Surface coordinates are y-down with the origin at the surface's top-left
//! corner. The surface is centred in the window area right of the sidebar,
//! and everything drawn is clipped to its bounds.

use bevy::ecs::system::SystemParam;
use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};
use bevy_egui::EguiContexts;

use crate::constants::{BRUSH_WIDTH, POLYGON_STROKE_WIDTH, RECT_STROKE_WIDTH, SIDEBAR_WIDTH};

use super::canvas::Canvas;
use super::object::{Fill, Shape, SurfaceObject};
use super::SurfaceCursor;

const FRAME_COLOR: Color = Color::srgb(0.35, 0.35, 0.38);
const SELECTION_COLOR: Color = Color::srgb(0.2, 0.6, 1.0);

#[derive(Component)]
pub struct SurfaceCamera;

#[derive(Component)]
pub struct SurfaceBackdrop;

#[derive(Component)]
pub struct BackgroundSprite;

/// Gizmo group for polygon outlines, the selection and the surface frame
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct SurfaceGizmoGroup;

/// Gizmo group for rectangles and vertex markers
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct ThinGizmoGroup;

/// Gizmo group for freehand strokes
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct BrushGizmoGroup;

/// Which gizmo group draws a shape. Gizmo line width is per group, so each
/// layer matches the stroke width its shapes are exported with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeLayer {
    Thin,
    Outline,
    Brush,
}

impl StrokeLayer {
    pub fn of(shape: &Shape) -> Self {
        match shape {
            Shape::Rect { .. } | Shape::Circle { .. } => StrokeLayer::Thin,
            Shape::Polygon { .. } => StrokeLayer::Outline,
            Shape::Path { .. } => StrokeLayer::Brush,
        }
    }

    pub fn width(&self) -> f32 {
        match self {
            StrokeLayer::Thin => RECT_STROKE_WIDTH,
            StrokeLayer::Outline => POLYGON_STROKE_WIDTH,
            StrokeLayer::Brush => BRUSH_WIDTH,
        }
    }
}

pub fn configure_surface_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<SurfaceGizmoGroup>();
    config.line.width = StrokeLayer::Outline.width();

    let (thin_config, _) = config_store.config_mut::<ThinGizmoGroup>();
    thin_config.line.width = StrokeLayer::Thin.width();

    let (brush_config, _) = config_store.config_mut::<BrushGizmoGroup>();
    brush_config.line.width = StrokeLayer::Brush.width();
}

pub fn spawn_surface_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        SurfaceCamera,
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
    ));
}

/// World position of a point on the surface element.
pub fn surface_to_world(screen: Vec2, size: UVec2) -> Vec2 {
    let half = size.as_vec2() / 2.0;
    Vec2::new(SIDEBAR_WIDTH / 2.0 + screen.x - half.x, half.y - screen.y)
}

/// Point on the surface element under a world position.
pub fn world_to_surface(world: Vec2, size: UVec2) -> Vec2 {
    let half = size.as_vec2() / 2.0;
    Vec2::new(world.x - SIDEBAR_WIDTH / 2.0 + half.x, half.y - world.y)
}

/// Clip a segment to the rectangle `[min, max]` (Liang-Barsky).
pub fn clip_segment(a: Vec2, b: Vec2, min: Vec2, max: Vec2) -> Option<(Vec2, Vec2)> {
    let d = b - a;
    let mut t0: f32 = 0.0;
    let mut t1: f32 = 1.0;

    for (p, q) in [
        (-d.x, a.x - min.x),
        (d.x, max.x - a.x),
        (-d.y, a.y - min.y),
        (d.y, max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((a + d * t0, a + d * t1))
}

/// Cursor and camera access for mapping the window cursor onto the surface
#[derive(SystemParam)]
pub struct SurfacePointer<'w, 's> {
    pub window: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    pub camera: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<SurfaceCamera>>,
}

impl SurfacePointer<'_, '_> {
    /// Cursor position on the surface element, whether or not it is inside.
    pub fn surface_position(&self, size: UVec2) -> Option<Vec2> {
        let window = self.window.single().ok()?;
        let (camera, transform) = self.camera.single().ok()?;
        let cursor_pos = window.cursor_position()?;
        let world = camera.viewport_to_world_2d(transform, cursor_pos).ok()?;
        Some(world_to_surface(world, size))
    }
}

pub fn spawn_surface_backdrop(mut commands: Commands, canvas: Res<Canvas>) {
    let size = canvas.size();
    let center = surface_to_world(size.as_vec2() / 2.0, size);

    commands.spawn((
        Sprite::from_color(Color::WHITE, size.as_vec2()),
        Transform::from_translation(center.extend(0.0)),
        SurfaceBackdrop,
    ));
    commands.spawn((
        Sprite::default(),
        Transform::from_translation(center.extend(1.0)),
        Visibility::Hidden,
        BackgroundSprite,
    ));
}

fn background_to_image(pixels: &image::RgbaImage) -> Image {
    Image::new(
        Extent3d {
            width: pixels.width(),
            height: pixels.height(),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        pixels.as_raw().clone(),
        TextureFormat::Rgba8UnormSrgb,
        default(),
    )
}

/// Keep the background sprite in step with the canvas background and viewport,
/// cropped to the part that is visible on the surface.
pub fn sync_background_sprite(
    canvas: Option<Res<Canvas>>,
    mut images: ResMut<Assets<Image>>,
    mut sprites: Query<(&mut Sprite, &mut Transform, &mut Visibility), With<BackgroundSprite>>,
    mut uploaded: Local<Option<(u64, Handle<Image>)>>,
    mut synced: Local<Option<(u64, u64)>>,
) {
    let Some(canvas) = canvas else {
        return;
    };
    let key = (canvas.background_generation(), canvas.render_requests());
    if *synced == Some(key) {
        return;
    }
    let Ok((mut sprite, mut transform, mut visibility)) = sprites.single_mut() else {
        return;
    };
    *synced = Some(key);

    let Some(background) = canvas.background() else {
        *visibility = Visibility::Hidden;
        return;
    };

    let generation = canvas.background_generation();
    let handle = match uploaded.as_ref() {
        Some((uploaded_generation, handle)) if *uploaded_generation == generation => handle.clone(),
        _ => {
            if let Some((_, old)) = uploaded.take() {
                images.remove(&old);
            }
            let handle = images.add(background_to_image(&background.pixels));
            *uploaded = Some((generation, handle.clone()));
            handle
        }
    };

    // Visible part of the background in surface coordinates
    let size = canvas.size();
    let screen_min = canvas.to_screen(Vec2::ZERO).max(Vec2::ZERO);
    let screen_max = canvas
        .to_screen(background.size().as_vec2())
        .min(size.as_vec2());
    if screen_min.x >= screen_max.x || screen_min.y >= screen_max.y {
        *visibility = Visibility::Hidden;
        return;
    }

    let source = Rect::from_corners(canvas.to_scene(screen_min), canvas.to_scene(screen_max));
    let center = surface_to_world((screen_min + screen_max) / 2.0, size);

    sprite.image = handle;
    sprite.rect = Some(source);
    sprite.custom_size = Some(screen_max - screen_min);
    transform.translation = center.extend(1.0);
    *visibility = Visibility::Inherited;
}

fn stroke_clipped<G: GizmoConfigGroup>(
    gizmos: &mut Gizmos<G>,
    points: &[Vec2],
    closed: bool,
    size: UVec2,
    color: Color,
) {
    let max = size.as_vec2();
    let mut draw = |a: Vec2, b: Vec2| {
        if let Some((a, b)) = clip_segment(a, b, Vec2::ZERO, max) {
            gizmos.line_2d(surface_to_world(a, size), surface_to_world(b, size), color);
        }
    };

    for w in points.windows(2) {
        draw(w[0], w[1]);
    }
    if closed && points.len() > 2 {
        draw(points[points.len() - 1], points[0]);
    }
}

fn draw_object(
    gizmos: &mut Gizmos<SurfaceGizmoGroup>,
    thin_gizmos: &mut Gizmos<ThinGizmoGroup>,
    brush_gizmos: &mut Gizmos<BrushGizmoGroup>,
    canvas: &Canvas,
    object: &SurfaceObject,
) {
    let size = canvas.size();
    let stroke = object.style.stroke.map(|s| s.color());

    let (points, closed) = match &object.shape {
        Shape::Rect { origin, size: extent } => (
            vec![
                *origin,
                *origin + Vec2::new(extent.x, 0.0),
                *origin + *extent,
                *origin + Vec2::new(0.0, extent.y),
            ],
            true,
        ),
        Shape::Circle { center, radius } => {
            let screen = canvas.to_screen(*center);
            if !canvas.contains_screen(screen) {
                return;
            }
            let world = surface_to_world(screen, size);
            if let Fill::Solid(swatch) = object.style.fill {
                // Concentric rings read as a filled dot at marker sizes
                let mut r = 0.5;
                while r < *radius {
                    thin_gizmos.circle_2d(Isometry2d::from_translation(world), r, swatch.color());
                    r += 1.0;
                }
            }
            if let Some(color) = stroke {
                thin_gizmos.circle_2d(Isometry2d::from_translation(world), *radius, color);
            }
            return;
        }
        Shape::Polygon { points } => (points.clone(), true),
        Shape::Path { points } => (points.clone(), false),
    };

    let Some(color) = stroke else {
        return;
    };
    let screen: Vec<Vec2> = points.iter().map(|p| canvas.to_screen(*p)).collect();
    match StrokeLayer::of(&object.shape) {
        StrokeLayer::Thin => stroke_clipped(thin_gizmos, &screen, closed, size, color),
        StrokeLayer::Outline => stroke_clipped(gizmos, &screen, closed, size, color),
        StrokeLayer::Brush => stroke_clipped(brush_gizmos, &screen, closed, size, color),
    }
}

pub fn render_objects(
    mut gizmos: Gizmos<SurfaceGizmoGroup>,
    mut thin_gizmos: Gizmos<ThinGizmoGroup>,
    mut brush_gizmos: Gizmos<BrushGizmoGroup>,
    canvas: Option<Res<Canvas>>,
) {
    let Some(canvas) = canvas else {
        return;
    };

    for (_, object) in canvas.objects() {
        draw_object(&mut gizmos, &mut thin_gizmos, &mut brush_gizmos, &canvas, object);
    }

    // Surface frame
    let size = canvas.size();
    let center = surface_to_world(size.as_vec2() / 2.0, size);
    gizmos.rect_2d(
        Isometry2d::from_translation(center),
        size.as_vec2() + Vec2::splat(2.0),
        FRAME_COLOR,
    );
}

pub fn render_stroke_preview(mut gizmos: Gizmos<BrushGizmoGroup>, canvas: Option<Res<Canvas>>) {
    let Some(canvas) = canvas else {
        return;
    };
    let (Some(points), Some(brush)) = (canvas.current_stroke(), canvas.brush()) else {
        return;
    };

    let screen: Vec<Vec2> = points.iter().map(|p| canvas.to_screen(*p)).collect();
    stroke_clipped(&mut gizmos, &screen, false, canvas.size(), brush.color.color());
}

pub fn render_selection(mut gizmos: Gizmos<SurfaceGizmoGroup>, canvas: Option<Res<Canvas>>) {
    let Some(canvas) = canvas else {
        return;
    };

    for (id, object) in canvas.objects() {
        if !canvas.is_selected(id) {
            continue;
        }
        let (min, max) = object.bounds();
        let (min, max) = (canvas.to_screen(min), canvas.to_screen(max));
        let corners = [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)];
        stroke_clipped(&mut gizmos, &corners, true, canvas.size(), SELECTION_COLOR);
    }
}

fn cursor_icon(cursor: SurfaceCursor) -> CursorIcon {
    match cursor {
        SurfaceCursor::Default => CursorIcon::System(SystemCursorIcon::Default),
        SurfaceCursor::Grab => CursorIcon::System(SystemCursorIcon::Grab),
        SurfaceCursor::Crosshair => CursorIcon::System(SystemCursorIcon::Crosshair),
    }
}

pub fn update_surface_cursor(
    canvas: Option<Res<Canvas>>,
    window_query: Query<Entity, With<PrimaryWindow>>,
    pointer: SurfacePointer,
    mut commands: Commands,
    mut contexts: EguiContexts,
) {
    let Ok(entity) = window_query.single() else {
        return;
    };

    // Use default cursor over UI and outside the surface
    let over_ui = contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false);

    let icon = match canvas {
        Some(canvas)
            if !over_ui
                && pointer
                    .surface_position(canvas.size())
                    .is_some_and(|p| canvas.contains_screen(p)) =>
        {
            cursor_icon(canvas.cursor())
        }
        _ => cursor_icon(SurfaceCursor::Default),
    };

    commands.entity(entity).insert(icon);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_world_round_trip_corners() {
        let size = UVec2::new(500, 500);
        let top_left = surface_to_world(Vec2::ZERO, size);
        assert_eq!(top_left, Vec2::new(SIDEBAR_WIDTH / 2.0 - 250.0, 250.0));
        assert_eq!(world_to_surface(top_left, size), Vec2::ZERO);

        let bottom_right = surface_to_world(Vec2::new(500.0, 500.0), size);
        assert_eq!(bottom_right, Vec2::new(SIDEBAR_WIDTH / 2.0 + 250.0, -250.0));
    }

    #[test]
    fn test_clip_segment_inside_is_unchanged() {
        let clipped = clip_segment(
            Vec2::new(10.0, 10.0),
            Vec2::new(20.0, 20.0),
            Vec2::ZERO,
            Vec2::splat(100.0),
        );
        assert_eq!(clipped, Some((Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0))));
    }

    #[test]
    fn test_clip_segment_crossing_edge() {
        let (a, b) = clip_segment(
            Vec2::new(50.0, 50.0),
            Vec2::new(150.0, 50.0),
            Vec2::ZERO,
            Vec2::splat(100.0),
        )
        .unwrap();
        assert_eq!(a, Vec2::new(50.0, 50.0));
        assert_eq!(b, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_clip_segment_outside_is_dropped() {
        let clipped = clip_segment(
            Vec2::new(150.0, 10.0),
            Vec2::new(200.0, 90.0),
            Vec2::ZERO,
            Vec2::splat(100.0),
        );
        assert!(clipped.is_none());
    }

    #[test]
    fn test_stroke_layers_match_object_widths() {
        use crate::editor::Swatch;

        let objects = [
            SurfaceObject::spawned_rect(Swatch::Red),
            SurfaceObject::vertex_marker(Vec2::ZERO, Some(Swatch::Green)),
            SurfaceObject::polygon_outline(vec![Vec2::ZERO, Vec2::X, Vec2::Y], Some(Swatch::Red)),
            SurfaceObject::freehand_path(vec![Vec2::ZERO, Vec2::X], Swatch::Green, BRUSH_WIDTH),
        ];
        for object in &objects {
            assert_eq!(StrokeLayer::of(&object.shape).width(), object.style.stroke_width);
        }
        assert_eq!(StrokeLayer::of(&objects[0].shape), StrokeLayer::Thin);
        assert_eq!(StrokeLayer::of(&objects[2].shape), StrokeLayer::Outline);
        assert_eq!(StrokeLayer::of(&objects[3].shape), StrokeLayer::Brush);
    }

    #[test]
    fn test_cursor_icons() {
        assert_eq!(
            cursor_icon(SurfaceCursor::Grab),
            CursorIcon::System(SystemCursorIcon::Grab)
        );
        assert_eq!(
            cursor_icon(SurfaceCursor::Crosshair),
            CursorIcon::System(SystemCursorIcon::Crosshair)
        );
    }
}
