//! Software rasterisation of the canvas for export.
//!
//! The background is composited at its natural size from the scene origin,
//! then every object in insertion order, all shifted by the viewport and
//! cropped to the surface size.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bevy::prelude::*;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgba, RgbaImage};

use super::canvas::Canvas;
use super::error::SurfaceError;
use super::hit_testing::point_in_polygon;
use super::object::{Fill, Shape, SurfaceObject};
use super::RasterFormat;

const BACKDROP: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Render the visible surface into an RGBA image.
pub fn render(canvas: &Canvas) -> RgbaImage {
    let size = canvas.size();
    let mut img = RgbaImage::from_pixel(size.x, size.y, BACKDROP);
    let offset = canvas.viewport();

    if let Some(background) = canvas.background() {
        blit(&mut img, &background.pixels, offset);
    }

    for (_, object) in canvas.objects() {
        draw_object(&mut img, object, offset);
    }

    img
}

/// Encode rendered pixels in the given raster format.
pub fn encode(img: &RgbaImage, format: RasterFormat, quality: f32) -> Result<Vec<u8>, SurfaceError> {
    match format {
        RasterFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(img.clone()).into_rgb8();
            let mut bytes = Vec::new();
            let encoder = JpegEncoder::new_with_quality(&mut bytes, jpeg_quality(quality));
            rgb.write_with_encoder(encoder)
                .map_err(SurfaceError::Encode)?;
            Ok(bytes)
        }
    }
}

/// Map a 0.0 - 1.0 quality to the encoder's 1 - 100 scale.
pub fn jpeg_quality(quality: f32) -> u8 {
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Wrap encoded bytes in a `data:` URL.
pub fn data_url(format: RasterFormat, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes))
}

fn blend(img: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    let pixel = img.get_pixel_mut(x as u32, y as u32);
    let alpha = color[3] as u32;
    if alpha == 255 {
        *pixel = color;
        return;
    }
    for c in 0..3 {
        let src = color[c] as u32;
        let dst = pixel[c] as u32;
        pixel[c] = ((src * alpha + dst * (255 - alpha)) / 255) as u8;
    }
}

fn blit(img: &mut RgbaImage, source: &RgbaImage, offset: Vec2) {
    let (ox, oy) = (offset.x.round() as i64, offset.y.round() as i64);
    for (x, y, pixel) in source.enumerate_pixels() {
        blend(img, x as i64 + ox, y as i64 + oy, *pixel);
    }
}

fn stamp_disc(img: &mut RgbaImage, center: Vec2, radius: f32, color: Rgba<u8>) {
    let r = radius.max(0.5);
    let (min_x, max_x) = ((center.x - r).floor() as i64, (center.x + r).ceil() as i64);
    let (min_y, max_y) = ((center.y - r).floor() as i64, (center.y + r).ceil() as i64);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let pixel_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            if pixel_center.distance(center) <= r {
                blend(img, x, y, color);
            }
        }
    }
}

fn stroke_segment(img: &mut RgbaImage, a: Vec2, b: Vec2, width: f32, color: Rgba<u8>) {
    let steps = (a.distance(b) / 0.5).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        stamp_disc(img, a.lerp(b, t), width / 2.0, color);
    }
}

fn stroke_polyline(img: &mut RgbaImage, points: &[Vec2], closed: bool, width: f32, color: Rgba<u8>) {
    for w in points.windows(2) {
        stroke_segment(img, w[0], w[1], width, color);
    }
    if closed && points.len() > 2 {
        stroke_segment(img, points[points.len() - 1], points[0], width, color);
    }
}

fn fill_region(img: &mut RgbaImage, min: Vec2, max: Vec2, color: Rgba<u8>, inside: impl Fn(Vec2) -> bool) {
    for y in min.y.floor() as i64..=max.y.ceil() as i64 {
        for x in min.x.floor() as i64..=max.x.ceil() as i64 {
            if inside(Vec2::new(x as f32 + 0.5, y as f32 + 0.5)) {
                blend(img, x, y, color);
            }
        }
    }
}

fn draw_object(img: &mut RgbaImage, object: &SurfaceObject, offset: Vec2) {
    let mut shifted = object.clone();
    shifted.translate(offset);

    let fill = match shifted.style.fill {
        Fill::Solid(swatch) => Some(Rgba(swatch.rgba())),
        Fill::Transparent => None,
    };
    let stroke = shifted.style.stroke.map(|swatch| Rgba(swatch.rgba()));
    let width = shifted.style.stroke_width;

    match &shifted.shape {
        Shape::Rect { origin, size } => {
            let corners = [
                *origin,
                *origin + Vec2::new(size.x, 0.0),
                *origin + *size,
                *origin + Vec2::new(0.0, size.y),
            ];
            if let Some(color) = fill {
                let max = *origin + *size;
                fill_region(img, *origin, max, color, |p| {
                    p.x >= origin.x && p.y >= origin.y && p.x <= max.x && p.y <= max.y
                });
            }
            if let Some(color) = stroke {
                stroke_polyline(img, &corners, true, width, color);
            }
        }
        Shape::Circle { center, radius } => {
            if let Some(color) = fill {
                stamp_disc(img, *center, *radius, color);
            }
            if let Some(color) = stroke {
                let (c, r, half) = (*center, *radius, width / 2.0);
                let reach = Vec2::splat(r + half);
                fill_region(img, c - reach, c + reach, color, |p| {
                    (p.distance(c) - r).abs() <= half.max(0.5)
                });
            }
        }
        Shape::Polygon { points } => {
            if let Some(color) = fill
                && let Some((min, max)) = crate::editor::geometry::bounds(points)
            {
                fill_region(img, min, max, color, |p| point_in_polygon(p, points));
            }
            if let Some(color) = stroke {
                stroke_polyline(img, points, true, width, color);
            }
        }
        Shape::Path { points } => {
            if let Some(color) = stroke {
                stroke_polyline(img, points, false, width, color);
            }
        }
    }
}
