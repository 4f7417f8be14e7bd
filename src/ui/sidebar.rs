use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::constants::SIDEBAR_WIDTH;
use crate::editor::{
    ClearRequest, EditorController, EditorEvent, EditorInput, EditorState, ExportRequest, Mode,
    Swatch,
};

use super::upload::UploadState;

const BUTTON_HEIGHT: f32 = 28.0;

fn swatch_color(swatch: Swatch) -> egui::Color32 {
    let [r, g, b, _] = swatch.rgba();
    egui::Color32::from_rgb(r, g, b)
}

/// Color shown as chosen in a mode's picker
fn picked_color(state: &EditorState, mode: Mode) -> Option<Swatch> {
    match mode {
        Mode::Draw => Some(state.drawing_color),
        Mode::Spawn => state.rect_color,
        Mode::Polygon => state.polygon_color,
        Mode::Drag | Mode::None => None,
    }
}

/// Event raised by a mode's picker
fn color_event(mode: Mode, swatch: Swatch) -> Option<EditorEvent> {
    match mode {
        Mode::Draw => Some(EditorEvent::SelectDrawingColor(swatch)),
        Mode::Spawn => Some(EditorEvent::SelectRectColor(swatch)),
        Mode::Polygon => Some(EditorEvent::SelectPolygonColor(swatch)),
        Mode::Drag | Mode::None => None,
    }
}

fn color_picker(ui: &mut egui::Ui, state: &EditorState, mode: Mode) -> Option<EditorEvent> {
    let mut event = None;
    ui.horizontal(|ui| {
        ui.add_space(12.0);
        for swatch in Swatch::all() {
            let selected = picked_color(state, mode) == Some(*swatch);
            let button = egui::Button::new(
                egui::RichText::new(swatch.display_name()).color(swatch_color(*swatch)),
            )
            .selected(selected);
            if ui.add(button).clicked() {
                event = color_event(mode, *swatch);
            }
        }
    });
    event
}

/// Left side panel with the mode toggles, pickers and actions
pub fn sidebar_ui(
    mut contexts: EguiContexts,
    controller: Res<EditorController>,
    mut upload: ResMut<UploadState>,
    mut inputs: MessageWriter<EditorInput>,
    mut export_events: MessageWriter<ExportRequest>,
    mut clear_events: MessageWriter<ClearRequest>,
) -> Result {
    let state = controller.state();
    let mut events = Vec::new();
    let mut export = false;
    let mut clear = false;
    let mut open_upload = false;

    egui::SidePanel::left("sidebar")
        .exact_width(SIDEBAR_WIDTH)
        .resizable(false)
        .show(contexts.ctx_mut()?, |ui| {
            ui.add_space(8.0);
            let width = ui.available_width();

            for mode in Mode::toggles() {
                let button = egui::Button::new(
                    egui::RichText::new(mode.display_name()).size(14.0).strong(),
                )
                .min_size(egui::vec2(width, BUTTON_HEIGHT))
                .selected(state.mode == *mode);
                if ui.add(button).clicked() {
                    events.push(EditorEvent::ToggleMode(*mode));
                }

                if state.mode == *mode
                    && mode.has_color_picker()
                    && let Some(event) = color_picker(ui, state, *mode)
                {
                    events.push(event);
                }
                ui.add_space(4.0);
            }

            // Actions stay pinned to the bottom
            ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
                ui.add_space(8.0);
                let upload_label = if upload.is_pending() {
                    "Choosing..."
                } else {
                    "Upload Img"
                };
                open_upload = ui
                    .add_enabled(
                        !upload.is_pending(),
                        egui::Button::new(upload_label).min_size(egui::vec2(width, BUTTON_HEIGHT)),
                    )
                    .clicked();
                clear = ui
                    .add(egui::Button::new("Clear").min_size(egui::vec2(width, BUTTON_HEIGHT)))
                    .clicked();
                export = ui
                    .add(egui::Button::new("Save").min_size(egui::vec2(width, BUTTON_HEIGHT)))
                    .clicked();
            });
        });

    for event in events {
        inputs.write(EditorInput(event));
    }
    if export {
        export_events.write(ExportRequest);
    }
    if clear {
        clear_events.write(ClearRequest);
    }
    if open_upload {
        upload.open_dialog();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picker_events_per_mode() {
        assert_eq!(
            color_event(Mode::Draw, Swatch::Green),
            Some(EditorEvent::SelectDrawingColor(Swatch::Green))
        );
        assert_eq!(
            color_event(Mode::Spawn, Swatch::Red),
            Some(EditorEvent::SelectRectColor(Swatch::Red))
        );
        assert_eq!(
            color_event(Mode::Polygon, Swatch::Red),
            Some(EditorEvent::SelectPolygonColor(Swatch::Red))
        );
        assert_eq!(color_event(Mode::Drag, Swatch::Red), None);
    }

    #[test]
    fn test_draw_picker_highlights_drawing_color() {
        let state = EditorState::default();
        assert_eq!(picked_color(&state, Mode::Draw), Some(Swatch::Red));
        assert_eq!(picked_color(&state, Mode::Spawn), None);
    }

    #[test]
    fn test_swatch_colors() {
        assert_eq!(swatch_color(Swatch::Red), egui::Color32::from_rgb(255, 0, 0));
        assert_eq!(swatch_color(Swatch::Green), egui::Color32::from_rgb(0, 128, 0));
    }
}
