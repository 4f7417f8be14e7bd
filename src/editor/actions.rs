//! Messages sent by the sidebar and the systems that carry them out.

use std::path::PathBuf;

use bevy::prelude::*;
use chrono::NaiveDateTime;

use crate::config::AppConfig;
use crate::surface::{Canvas, RasterFormat, SurfaceError};

use super::controller::{EditorController, Export};
use super::input::EditorResources;
use super::state::EditorEvent;

/// A state event raised outside the pointer systems (buttons, pickers, upload)
#[derive(Message, Debug, Clone)]
pub struct EditorInput(pub EditorEvent);

/// Message to export the surface
#[derive(Message)]
pub struct ExportRequest;

/// Message to remove every object from the surface
#[derive(Message)]
pub struct ClearRequest;

pub fn apply_editor_input(mut events: MessageReader<EditorInput>, mut res: EditorResources) {
    for EditorInput(event) in events.read() {
        res.dispatch(event);
    }
}

pub fn handle_clear_requests(mut events: MessageReader<ClearRequest>, mut res: EditorResources) {
    for _ in events.read() {
        let removed = res.controller.clear(Some(&mut *res.canvas));
        info!("Cleared {} object(s)", removed);
    }
}

/// File name for an export taken at `time`.
pub fn export_file_name(time: NaiveDateTime, format: RasterFormat) -> String {
    format!(
        "annotated-{}.{}",
        time.format("%Y%m%d-%H%M%S"),
        format.extension()
    )
}

fn write_export(export: &Export, dir: PathBuf) -> Result<PathBuf, SurfaceError> {
    std::fs::create_dir_all(&dir).map_err(|source| SurfaceError::Io {
        path: dir.clone(),
        source,
    })?;

    let name = export_file_name(chrono::Local::now().naive_local(), export.format);
    let path = dir.join(name);
    std::fs::write(&path, &export.bytes).map_err(|source| SurfaceError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

pub fn handle_export_requests(
    mut events: MessageReader<ExportRequest>,
    controller: Res<EditorController>,
    canvas: Res<Canvas>,
    config: Res<AppConfig>,
) {
    for _ in events.read() {
        let export = match controller.export(&*canvas, config.data.export.quality) {
            Ok(export) => export,
            Err(e) => {
                error!("Export failed: {}", e);
                continue;
            }
        };

        info!(
            "Exported surface as {} ({} bytes)",
            export.format.mime_type(),
            export.bytes.len()
        );
        debug!("{}", export.data_url);

        if config.data.export.write_files {
            match write_export(&export, crate::paths::exports_dir()) {
                Ok(path) => info!("Export written to {:?}", path),
                Err(e) => error!("Failed to write export: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Swatch;
    use crate::surface::{DrawingSurface, SurfaceObject};
    use chrono::NaiveDate;

    #[test]
    fn test_export_file_name() {
        let time = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap();
        assert_eq!(
            export_file_name(time, RasterFormat::Jpeg),
            "annotated-20240309-140507.jpeg"
        );
    }

    #[test]
    fn test_write_export_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");

        let mut canvas = Canvas::new(32, 32);
        canvas.add_object(SurfaceObject::spawned_rect(Swatch::Red));
        let export = EditorController::default().export(&canvas, 0.8).unwrap();

        let path = write_export(&export, target.clone()).unwrap();
        assert!(path.starts_with(&target));
        assert_eq!(std::fs::read(&path).unwrap(), export.bytes);
    }
}
