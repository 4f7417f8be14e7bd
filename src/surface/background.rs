//! Background image sources and asynchronous loading.
//!
//! Loads run on the IO task pool and are polled each frame. A load that
//! finishes after a newer one simply overwrites the background; nothing is
//! cancelled.

use std::fmt;
use std::io::Read;
use std::path::PathBuf;

use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task};
use futures_lite::future;
use image::RgbaImage;

use super::DrawingSurface;
use super::canvas::Canvas;
use super::error::SurfaceError;

/// Where a background image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundSource {
    Url(String),
    File(PathBuf),
}

impl BackgroundSource {
    /// `http://` and `https://` sources are fetched, anything else is a path.
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            BackgroundSource::Url(trimmed.to_string())
        } else {
            BackgroundSource::File(PathBuf::from(trimmed))
        }
    }

    /// Read the raw encoded bytes of the image.
    pub fn fetch(&self) -> Result<Vec<u8>, SurfaceError> {
        match self {
            BackgroundSource::Url(url) => {
                let response = ureq::get(url)
                    .set("User-Agent", "image-annotator")
                    .call()
                    .map_err(|e| SurfaceError::Fetch {
                        url: url.clone(),
                        message: e.to_string(),
                    })?;

                let mut bytes = Vec::new();
                response
                    .into_reader()
                    .read_to_end(&mut bytes)
                    .map_err(|e| SurfaceError::Fetch {
                        url: url.clone(),
                        message: e.to_string(),
                    })?;
                Ok(bytes)
            }
            BackgroundSource::File(path) => std::fs::read(path).map_err(|source| SurfaceError::Io {
                path: path.clone(),
                source,
            }),
        }
    }
}

impl fmt::Display for BackgroundSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackgroundSource::Url(url) => write!(f, "{}", url),
            BackgroundSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A decoded background, drawn at its natural size from the surface origin.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    pub source: String,
    pub pixels: RgbaImage,
}

impl BackgroundImage {
    pub fn decode(source: impl Into<String>, bytes: &[u8]) -> Result<Self, SurfaceError> {
        let pixels = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self {
            source: source.into(),
            pixels,
        })
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.pixels.width(), self.pixels.height())
    }
}

/// Fetch and decode a background in one step.
pub fn load_background(source: &BackgroundSource) -> Result<BackgroundImage, SurfaceError> {
    let bytes = source.fetch()?;
    BackgroundImage::decode(source.to_string(), &bytes)
}

/// Message asking for the background to be (re)loaded
#[derive(Message, Debug, Clone)]
pub struct LoadBackgroundRequest {
    pub source: BackgroundSource,
}

pub struct BackgroundLoadResult {
    pub source: BackgroundSource,
    pub result: Result<BackgroundImage, SurfaceError>,
}

#[derive(Component)]
pub struct BackgroundLoadTask(pub Task<BackgroundLoadResult>);

/// Starts one async load per request
pub fn start_background_loads(
    mut commands: Commands,
    mut events: MessageReader<LoadBackgroundRequest>,
) {
    for event in events.read() {
        let source = event.source.clone();
        debug!("Loading background from {}", source);

        let task_pool = IoTaskPool::get();
        let task = task_pool.spawn(async move {
            let result = load_background(&source);
            BackgroundLoadResult { source, result }
        });

        commands.spawn(BackgroundLoadTask(task));
    }
}

/// Polls load tasks and applies finished backgrounds to the canvas
pub fn poll_background_loads(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut BackgroundLoadTask)>,
    mut canvas: Option<ResMut<Canvas>>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(loaded) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };
        commands.entity(entity).despawn();

        match loaded.result {
            Ok(background) => {
                let Some(canvas) = canvas.as_deref_mut() else {
                    continue;
                };
                info!(
                    "Background loaded from {} ({}x{})",
                    loaded.source,
                    background.pixels.width(),
                    background.pixels.height()
                );
                canvas.set_background_image(Some(background));
                canvas.request_render();
            }
            // The background stays as it was; there is no retry.
            Err(e) => warn!("Background load failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_parse_urls() {
        assert_eq!(
            BackgroundSource::parse("https://example.com/a.jpeg"),
            BackgroundSource::Url("https://example.com/a.jpeg".to_string())
        );
        assert_eq!(
            BackgroundSource::parse("http://example.com/a.jpeg"),
            BackgroundSource::Url("http://example.com/a.jpeg".to_string())
        );
    }

    #[test]
    fn test_parse_paths() {
        assert_eq!(
            BackgroundSource::parse(" assets/background.jpeg "),
            BackgroundSource::File(PathBuf::from("assets/background.jpeg"))
        );
    }

    #[test]
    fn test_decode_png() {
        let background = BackgroundImage::decode("memory", &encoded_png(8, 4)).unwrap();
        assert_eq!(background.size(), UVec2::new(8, 4));
        assert_eq!(background.source, "memory");
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = BackgroundImage::decode("memory", b"not an image");
        assert!(matches!(result, Err(SurfaceError::Decode(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg.png");
        std::fs::write(&path, encoded_png(3, 3)).unwrap();

        let background = load_background(&BackgroundSource::File(path)).unwrap();
        assert_eq!(background.size(), UVec2::new(3, 3));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_background(&BackgroundSource::File(PathBuf::from(
            "/definitely/not/here.png",
        )));
        assert!(matches!(result, Err(SurfaceError::Io { .. })));
    }
}
