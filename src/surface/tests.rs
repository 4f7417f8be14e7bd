use super::*;
use crate::editor::Swatch;

fn rect_at(x: f32, y: f32) -> SurfaceObject {
    let mut rect = SurfaceObject::spawned_rect(Swatch::Red);
    rect.translate(Vec2::new(x, y));
    rect
}

#[test]
fn test_default_canvas_is_500_square() {
    let canvas = Canvas::default();
    assert_eq!(canvas.size(), UVec2::new(500, 500));
    assert!(canvas.is_empty());
    assert!(canvas.background().is_none());
    assert_eq!(canvas.viewport(), Vec2::ZERO);
}

#[test]
fn test_add_assigns_distinct_ids() {
    let mut canvas = Canvas::new(500, 500);
    let a = canvas.add_object(SurfaceObject::spawned_rect(Swatch::Red));
    let b = canvas.add_object(SurfaceObject::spawned_rect(Swatch::Green));
    assert_ne!(a, b);
    assert_eq!(canvas.len(), 2);
}

#[test]
fn test_add_and_remove_request_render() {
    let mut canvas = Canvas::new(500, 500);
    let before = canvas.render_requests();
    let id = canvas.add_object(SurfaceObject::spawned_rect(Swatch::Red));
    assert_eq!(canvas.render_requests(), before + 1);
    canvas.remove_object(id);
    assert_eq!(canvas.render_requests(), before + 2);
}

#[test]
fn test_pan_and_clear_request_render() {
    let mut canvas = Canvas::new(500, 500);
    canvas.pan_viewport_by(Vec2::new(5.0, 0.0));
    assert_eq!(canvas.render_requests(), 1);
    canvas.remove_all_objects();
    assert_eq!(canvas.render_requests(), 2);
}

#[test]
fn test_remove_missing_object_is_none() {
    let mut canvas = Canvas::new(500, 500);
    let id = canvas.add_object(SurfaceObject::spawned_rect(Swatch::Red));
    assert!(canvas.remove_object(id).is_some());
    assert!(canvas.remove_object(id).is_none());
}

#[test]
fn test_remove_selected_leaves_others() {
    let mut canvas = Canvas::new(500, 500);
    let a = canvas.add_object(rect_at(0.0, 0.0));
    let b = canvas.add_object(rect_at(200.0, 0.0));
    let c = canvas.add_object(rect_at(0.0, 200.0));

    canvas.select(a, false);
    canvas.select(b, true);
    for id in canvas.selected_objects() {
        canvas.remove_object(id);
    }

    assert_eq!(canvas.len(), 1);
    assert!(canvas.object(c).is_some());
    assert!(canvas.selected_objects().is_empty());
}

#[test]
fn test_remove_all_keeps_background() {
    let mut canvas = Canvas::new(500, 500);
    let pixels = image::RgbaImage::new(4, 4);
    canvas.set_background_image(Some(BackgroundImage {
        source: "memory".to_string(),
        pixels,
    }));
    for i in 0..5 {
        canvas.add_object(rect_at(i as f32 * 10.0, 0.0));
    }

    assert_eq!(canvas.remove_all_objects(), 5);
    assert!(canvas.is_empty());
    assert!(canvas.background().is_some());
}

#[test]
fn test_set_background_bumps_generation() {
    let mut canvas = Canvas::new(500, 500);
    let before = canvas.background_generation();
    canvas.set_background_image(None);
    assert_eq!(canvas.background_generation(), before + 1);
}

#[test]
fn test_pan_is_relative() {
    let mut canvas = Canvas::new(500, 500);
    canvas.pan_viewport_by(Vec2::new(30.0, -10.0));
    canvas.pan_viewport_by(Vec2::new(5.0, 5.0));
    assert_eq!(canvas.viewport(), Vec2::new(35.0, -5.0));
    assert_eq!(canvas.to_scene(Vec2::new(35.0, -5.0)), Vec2::ZERO);
    assert_eq!(canvas.to_screen(Vec2::ZERO), Vec2::new(35.0, -5.0));
}

#[test]
fn test_click_selects_topmost() {
    let mut canvas = Canvas::new(500, 500);
    let lower = canvas.add_object(rect_at(0.0, 0.0));
    let upper = canvas.add_object(rect_at(0.0, 0.0));

    canvas.handle_press(Vec2::new(50.0, 50.0), false);
    canvas.handle_release();
    assert!(canvas.is_selected(upper));
    assert!(!canvas.is_selected(lower));
}

#[test]
fn test_shift_click_toggles_selection() {
    let mut canvas = Canvas::new(500, 500);
    let a = canvas.add_object(rect_at(0.0, 0.0));
    let b = canvas.add_object(rect_at(200.0, 200.0));

    canvas.handle_press(Vec2::new(50.0, 50.0), false);
    canvas.handle_release();
    canvas.handle_press(Vec2::new(250.0, 250.0), true);
    canvas.handle_release();
    assert_eq!(canvas.selected_objects(), vec![a, b]);

    canvas.handle_press(Vec2::new(50.0, 50.0), true);
    canvas.handle_release();
    assert_eq!(canvas.selected_objects(), vec![b]);
}

#[test]
fn test_click_on_empty_space_clears_selection() {
    let mut canvas = Canvas::new(500, 500);
    let a = canvas.add_object(rect_at(0.0, 0.0));
    canvas.select(a, false);

    canvas.handle_press(Vec2::new(400.0, 400.0), false);
    canvas.handle_release();
    assert!(canvas.selected_objects().is_empty());
}

#[test]
fn test_markers_are_not_selectable() {
    let mut canvas = Canvas::new(500, 500);
    canvas.add_object(SurfaceObject::vertex_marker(
        Vec2::new(20.0, 20.0),
        Some(Swatch::Red),
    ));
    assert!(canvas.hit_test(Vec2::new(20.0, 20.0)).is_none());
}

#[test]
fn test_drag_moves_selection() {
    let mut canvas = Canvas::new(500, 500);
    let id = canvas.add_object(rect_at(0.0, 0.0));

    canvas.handle_press(Vec2::new(50.0, 50.0), false);
    canvas.handle_drag(Vec2::new(60.0, 55.0), Vec2::new(10.0, 5.0));
    canvas.handle_release();

    match &canvas.object(id).unwrap().shape {
        Shape::Rect { origin, .. } => assert_eq!(*origin, Vec2::new(10.0, 5.0)),
        other => panic!("expected a rect, got {other:?}"),
    }
}

#[test]
fn test_freehand_stroke_becomes_path() {
    let mut canvas = Canvas::new(500, 500);
    canvas.set_freehand_mode(Some(Brush {
        width: 10.0,
        color: Swatch::Green,
    }));
    assert_eq!(canvas.cursor(), SurfaceCursor::Crosshair);

    canvas.handle_press(Vec2::new(10.0, 10.0), false);
    canvas.handle_drag(Vec2::new(11.0, 10.0), Vec2::new(1.0, 0.0));
    canvas.handle_drag(Vec2::new(20.0, 10.0), Vec2::new(9.0, 0.0));
    canvas.handle_drag(Vec2::new(30.0, 20.0), Vec2::new(10.0, 10.0));
    assert_eq!(canvas.current_stroke().map(|p| p.len()), Some(3));

    let id = canvas.handle_release().unwrap();
    let path = canvas.object(id).unwrap();
    assert_eq!(path.style.stroke, Some(Swatch::Green));
    assert_eq!(path.style.stroke_width, 10.0);
    match &path.shape {
        Shape::Path { points } => assert_eq!(points.len(), 3),
        other => panic!("expected a path, got {other:?}"),
    }
    assert!(canvas.current_stroke().is_none());
}

#[test]
fn test_single_point_stroke_is_discarded() {
    let mut canvas = Canvas::new(500, 500);
    canvas.set_freehand_mode(Some(Brush {
        width: 10.0,
        color: Swatch::Red,
    }));
    canvas.handle_press(Vec2::new(10.0, 10.0), false);
    assert!(canvas.handle_release().is_none());
    assert!(canvas.is_empty());
}

#[test]
fn test_leaving_freehand_restores_cursor() {
    let mut canvas = Canvas::new(500, 500);
    canvas.set_freehand_mode(Some(Brush {
        width: 10.0,
        color: Swatch::Red,
    }));
    canvas.set_freehand_mode(None);
    assert!(canvas.brush().is_none());
    assert_eq!(canvas.cursor(), SurfaceCursor::Default);
}

#[test]
fn test_entering_freehand_clears_selection() {
    let mut canvas = Canvas::new(500, 500);
    let a = canvas.add_object(rect_at(0.0, 0.0));
    canvas.select(a, false);
    canvas.set_freehand_mode(Some(Brush {
        width: 10.0,
        color: Swatch::Red,
    }));
    assert!(canvas.selected_objects().is_empty());
}

#[test]
fn test_raster_format_names() {
    assert_eq!(RasterFormat::Jpeg.mime_type(), "image/jpeg");
    assert_eq!(RasterFormat::Jpeg.extension(), "jpeg");
}
